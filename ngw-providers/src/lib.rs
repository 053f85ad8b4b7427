//! Provider adapters and the customer-profile resolver: the two "opaque,
//! named-only-by-interface" collaborators the dispatch engine is built
//! against.

pub mod adapter;
pub mod config;
pub mod http;
pub mod mock;
pub mod resolver;
pub mod testing;

pub use adapter::ChannelAdapter;
pub use config::{ChannelProvidersConfig, ProviderConfig, ResolverConfig};
pub use http::HttpChannelAdapter;
pub use mock::MockAdapter;
pub use resolver::{HttpResolver, MockResolver, ProfileResolver};
