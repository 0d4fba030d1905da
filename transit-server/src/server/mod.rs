//! TCP server: the rendezvous listener and per-client sessions.
//!
//! Clients first bind on the rendezvous port, which hands them a private
//! session port and a single-use secret. Each session runs in its own task
//! and serves station lookups and routes over the text protocol.

mod error;
mod keys;
mod rendezvous;
mod session;
mod state;


pub use error::ServerError;
pub use keys::{SECRET_LEN, SessionKeys, checksum};
pub use rendezvous::RendezvousServer;
pub use session::{Phase, Session};
pub use state::AppState;
