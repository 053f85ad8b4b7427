//! `health.*` configuration (spec.md §6: `health.port`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { enabled: defaults::enabled(), port: defaults::port() }
    }
}

impl HealthConfig {
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

mod defaults {
    pub const fn enabled() -> bool {
        true
    }

    pub const fn port() -> u16 {
        8080
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listen_address_uses_default_port() {
        assert_eq!(HealthConfig::default().listen_address(), "0.0.0.0:8080");
    }
}
