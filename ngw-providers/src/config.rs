//! Configuration shapes for provider adapters and the customer resolver
//! (spec.md §6 `channels.email.providers` / `channels.sms.providers` /
//! `resolver.*`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One configured provider entry: `{name, enabled, ...credentials...}`.
///
/// Credentials are kept as a free-form string map rather than named
/// fields: each provider's wire protocol is opaque to the gateway
/// (spec.md §1 "Provider adapters"), so the adapter constructor is the
/// only code that interprets `credentials`' keys.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-adapter HTTP timeout (DESIGN.md Open Question 2: exposed here
    /// rather than left adapter-internal).
    #[serde(default = "defaults::timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

/// `channels.email.providers` / `channels.sms.providers`: an ordered list,
/// leftmost is primary (spec.md §3 "Adapter list").
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChannelProvidersConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// `resolver.*`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolverConfig {
    Mock,
    Http {
        base_url: String,
        #[serde(default = "defaults::timeout_ms")]
        timeout_ms: u64,
    },
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::Mock
    }
}

mod defaults {
    pub const fn enabled() -> bool {
        true
    }

    pub const fn timeout_ms() -> u64 {
        5_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_config_defaults_to_mock() {
        assert!(matches!(ResolverConfig::default(), ResolverConfig::Mock));
    }

    #[test]
    fn provider_config_defaults_enabled_and_timeout() {
        let json = r#"{"name":"sendgrid"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert!(config.enabled);
        assert_eq!(config.timeout_ms, 5_000);
    }
}
