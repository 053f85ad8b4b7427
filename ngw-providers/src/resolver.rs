//! The customer-profile resolver contract (spec.md §3, §6 "Customer
//! resolver contract"): `resolve(accountId) -> profile?`, with "not found"
//! as the sole permanent-skip outcome the core distinguishes.

use async_trait::async_trait;
use ngw_model::CustomerProfile;

/// Resolves an `accountId` to the profile the dispatcher needs.
///
/// A transport error at the resolver boundary is surfaced as "not found"
/// (spec.md §6) — the core never retries resolution itself.
#[async_trait]
pub trait ProfileResolver: Send + Sync + std::fmt::Debug {
    async fn resolve(&self, account_id: i64) -> Option<CustomerProfile>;
}

/// Static in-memory resolver, for local runs and tests. Looks up
/// `accountId` in a fixed map built at construction.
#[derive(Debug, Default)]
pub struct MockResolver {
    profiles: std::collections::HashMap<i64, CustomerProfile>,
}

impl MockResolver {
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = CustomerProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.account_id, p)).collect(),
        }
    }
}

#[async_trait]
impl ProfileResolver for MockResolver {
    async fn resolve(&self, account_id: i64) -> Option<CustomerProfile> {
        self.profiles.get(&account_id).cloned()
    }
}

/// HTTP-backed resolver: `GET {baseUrl}/accounts/{accountId}/profile`,
/// treating any non-2xx response or transport error as "not found" per the
/// resolver contract (spec.md §6).
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResolver {
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be built
    /// with the given timeout.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ProfileResolver for HttpResolver {
    async fn resolve(&self, account_id: i64) -> Option<CustomerProfile> {
        let url = format!("{}/accounts/{account_id}/profile", self.base_url.trim_end_matches('/'));

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(account_id, %error, "resolver transport error, treating as not found");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(account_id, status = %response.status(), "resolver returned non-success, treating as not found");
            return None;
        }

        match response.json::<CustomerProfile>().await {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(account_id, %error, "resolver response failed to decode, treating as not found");
                None
            }
        }
    }
}
