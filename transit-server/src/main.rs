use std::sync::Arc;

use tracing::error;

use transit_server::config::ServerConfig;
use transit_server::logging::init_logging;
use transit_server::network::{Network, load_records};
use transit_server::server::{AppState, RendezvousServer};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    init_logging(config.verbosity);

    let records = match load_records(&config.network_path) {
        Ok(records) => records,
        Err(err) => {
            error!(path = %config.network_path.display(), error = %err, "Failed to load network");
            std::process::exit(1);
        }
    };

    let network = Arc::new(Network::build(records, &config.routing));
    let state = AppState::new(network, config);
    RendezvousServer::bind(state).await.run().await;
}
