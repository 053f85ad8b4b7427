//! C3: the dispatcher. Computes required channels for an event and walks
//! each required channel's ordered adapter list through the retry executor
//! until a terminal outcome.

pub mod dispatcher;
pub mod routing;

pub use dispatcher::Dispatcher;
pub use routing::{RequiredChannels, RoutingConfig, required_channels};
