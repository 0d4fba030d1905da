//! Process and routing configuration.

mod error;
mod routing;
mod server;

pub use error::ConfigError;
pub use routing::RoutingConfig;
pub use server::{EPHEMERAL_PORTS, RENDEZVOUS_PORT, ServerConfig};
