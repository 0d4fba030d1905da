//! Transit route server.
//!
//! Loads a station network, answers "how do I get from here to there?" with
//! a shortest-path search, and serves lookups and routes to clients over a
//! small framed text protocol on per-client session ports.

pub mod client;
pub mod config;
pub mod logging;
pub mod network;
pub mod planner;
pub mod protocol;
pub mod server;
pub mod stations;
