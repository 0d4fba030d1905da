//! Transit network model and graph builder.
//!
//! A network is a set of stations, each split into one platform node per line
//! it serves. Track edges join platforms on the same line at neighbouring
//! stations; transfer edges join the platforms of a single station.

mod builder;
mod error;
mod graph;
mod loader;
mod model;
mod neighbour;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::NetworkError;
pub use graph::Network;
pub use loader::{StationRecord, load_records, parse_records};
pub use model::{Edge, EdgeKind, Node, NodeId, Station, StationId, StationIdx, Weight};
pub use neighbour::NeighbourLink;
