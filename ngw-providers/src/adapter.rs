//! The channel adapter contract (spec.md §3 "Adapter list", §6 "Adapter
//! contract"): the one capability the dispatch engine depends on but never
//! implements a transport for itself.

use async_trait::async_trait;
use ngw_model::{Channel, CustomerProfile, DeliveryResult, NotificationEvent};

/// One provider integration for one channel.
///
/// Implementations MUST NOT panic out of `send`; a thrown error is a bug in
/// the adapter, not a `FAILURE` result — the retry executor catches panics
/// defensively (spec.md §4.1 point 5), but adapters should return
/// `DeliveryResult::failure` themselves whenever possible so the error
/// message is meaningful.
#[async_trait]
pub trait ChannelAdapter: Send + Sync + std::fmt::Debug {
    /// Stable identifier used in logs and `DeliveryResult::provider`.
    fn provider_name(&self) -> &str;

    /// The channel this adapter serves. An adapter never serves both.
    fn channel_type(&self) -> Channel;

    /// Startup filter: adapters failing this check are never added to a
    /// channel's ordered list (spec.md §4.2 "Fallback walk" operates only
    /// over configured adapters).
    fn is_configured(&self) -> bool;

    /// Send one event to one resolved profile.
    async fn send(&self, event: &NotificationEvent, profile: &CustomerProfile) -> DeliveryResult;

    /// Idempotent release of any held resources (HTTP client pools,
    /// credentials, etc). Called exactly once at shutdown, in configured
    /// order, regardless of whether `send` was ever called.
    async fn close(&self) {}
}
