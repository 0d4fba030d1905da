//! State shared by the rendezvous listener and every session.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::network::Network;
use crate::planner::Planner;
use crate::stations::StationIndex;

use super::keys::SessionKeys;

/// Shared server state.
///
/// Cloning is cheap; every field is behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Station lookup by name and id
    pub index: Arc<StationIndex>,

    /// Route planner
    pub planner: Arc<Planner>,

    /// Outstanding session keys
    pub keys: Arc<SessionKeys>,

    /// Process configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the index and planner over `network`.
    pub fn new(network: Arc<Network>, config: ServerConfig) -> Self {
        let index = StationIndex::new(Arc::clone(&network));
        let planner = Planner::new(network, config.routing.clone());

        Self {
            index: Arc::new(index),
            planner: Arc::new(planner),
            keys: Arc::new(SessionKeys::new()),
            config: Arc::new(config),
        }
    }
}
