//! The station/node arena.

use std::collections::HashMap;

use super::model::{Edge, EdgeKind, Node, NodeId, Station, StationId, StationIdx, Weight};

/// The transit network: every station, every platform node, and the edges
/// between nodes.
///
/// Built once by [`Network::build`](Network::build) and read-only afterwards,
/// so it can be shared across sessions behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(super) stations: Vec<Station>,
    pub(super) nodes: Vec<Node>,
    pub(super) by_id: HashMap<StationId, StationIdx>,
}

impl Network {
    pub fn station(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Station that owns a node.
    pub fn station_of(&self, id: NodeId) -> &Station {
        self.station(self.node(id).station())
    }

    pub fn station_idx(&self, id: StationId) -> Option<StationIdx> {
        self.by_id.get(&id).copied()
    }

    pub fn station_by_id(&self, id: StationId) -> Option<&Station> {
        self.station_idx(id).map(|idx| self.station(idx))
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Stations paired with their arena index.
    pub fn indexed_stations(&self) -> impl Iterator<Item = (StationIdx, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(i, s)| (StationIdx(i), s))
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub(super) fn add_station(&mut self, station: Station) -> StationIdx {
        let idx = StationIdx(self.stations.len());
        self.by_id.insert(station.id, idx);
        self.stations.push(station);
        idx
    }

    /// Give a station a platform on `line`. Returns `None` if it already has one.
    pub(super) fn add_line(&mut self, station: StationIdx, line: String) -> Option<NodeId> {
        if self.stations[station.0].serves(&line) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(station, line.clone()));
        self.stations[station.0].push_line(line, id);
        Some(id)
    }

    /// Connect two nodes in both directions with the same weight.
    ///
    /// A direction that already has an edge to its target is left alone.
    /// Returns true if any edge was added.
    pub(super) fn connect(&mut self, a: NodeId, b: NodeId, weight: Weight, kind: EdgeKind) -> bool {
        if a == b {
            return false;
        }
        let mut added = false;
        for (from, to) in [(a, b), (b, a)] {
            let node = &mut self.nodes[from.0];
            if !node.has_edge_to(to) {
                node.push_edge(Edge { to, weight, kind });
                added = true;
            }
        }
        added
    }
}
