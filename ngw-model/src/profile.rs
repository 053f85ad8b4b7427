//! The customer profile resolved for one event's `accountId`.

use serde::{Deserialize, Serialize};

/// A resolved customer profile. Immutable; looked up fresh per event, never
/// cached (see `ngw-providers::ProfileResolver`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: i64,
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl CustomerProfile {
    /// True iff `email` is non-empty and non-blank.
    #[must_use]
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// True iff `phone` is non-empty and non-blank.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: &str, phone: &str) -> CustomerProfile {
        CustomerProfile {
            customer_id: 1,
            account_id: 1,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn blank_contact_fields_are_not_present() {
        let p = profile("   ", "");
        assert!(!p.has_email());
        assert!(!p.has_phone());
    }

    #[test]
    fn non_blank_contact_fields_are_present() {
        let p = profile("a@b.com", "+15555550123");
        assert!(p.has_email());
        assert!(p.has_phone());
    }
}
