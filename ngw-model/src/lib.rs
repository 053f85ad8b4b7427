//! Shared data types passed between the bus loop, dispatcher, retry executor
//! and provider adapters of the notification gateway.

pub mod event;
pub mod profile;
pub mod result;

pub use event::{ChannelHint, NotificationEvent, NotificationType, Severity};
pub use result::{Channel, DeliveryResult, DeliveryStatus};
pub use profile::CustomerProfile;
