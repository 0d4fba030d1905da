//! Stations, platform nodes and weighted edges.
//!
//! Stations and nodes live in two flat arenas owned by [`Network`](super::Network).
//! A node refers back to its station by index, and a station lists its nodes by
//! index, so neither owns the other.

use std::fmt;
use std::ops::Add;

/// External station identifier, as it appears in the network description
/// and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Position of a station in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationIdx(pub usize);

/// Position of a platform node in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A non-negative edge or path cost, stored in hundredths.
///
/// Keeping the value as an integer makes rounding to two decimal places exact
/// and gives costs a total order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(u32);

impl Weight {
    pub const ZERO: Weight = Weight(0);

    /// Build a weight from a raw count of hundredths.
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Weight(hundredths)
    }

    /// Round a floating point cost to two decimal places.
    ///
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Weight::ZERO;
        }
        let hundredths = (value * 100.0).round();
        if hundredths >= f64::from(u32::MAX) {
            Weight(u32::MAX)
        } else {
            Weight(hundredths as u32)
        }
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Weight {
        Weight(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// What an edge models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Travel between neighbouring stations on the same line.
    Track,
    /// A line change between two platforms of the same station.
    Transfer,
}

/// A directed, weighted edge to another platform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: NodeId,
    pub weight: Weight,
    pub kind: EdgeKind,
}

/// A platform node: one station served by one line.
///
/// The pair (owning station, line) is unique across the network.
#[derive(Debug, Clone)]
pub struct Node {
    station: StationIdx,
    line: String,
    edges: Vec<Edge>,
}

impl Node {
    pub(super) fn new(station: StationIdx, line: String) -> Self {
        Self {
            station,
            line,
            edges: Vec::new(),
        }
    }

    /// Index of the station that owns this node.
    pub fn station(&self) -> StationIdx {
        self.station
    }

    /// Line label served at this platform.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Outgoing edges, track edges first, then transfers.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(super) fn has_edge_to(&self, to: NodeId) -> bool {
        self.edges.iter().any(|e| e.to == to)
    }

    pub(super) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

/// A station on the network.
///
/// Every line in `lines` has exactly one platform node in `nodes`, at the
/// same position. A station without nodes cannot be routed to or from.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    lines: Vec<String>,
    nodes: Vec<NodeId>,
}

impl Station {
    pub(super) fn new(id: StationId, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
            lines: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The node searches start from and arrive at.
    pub fn first_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn is_routable(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn serves(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    pub(super) fn push_line(&mut self, line: String, node: NodeId) {
        self.lines.push(line);
        self.nodes.push(node);
    }

    /// Node for `line`, if this station serves it.
    pub fn node_on_line(&self, line: &str) -> Option<NodeId> {
        self.lines
            .iter()
            .position(|l| l == line)
            .map(|pos| self.nodes[pos])
    }
}

/// The descriptor sent to clients in prefix-search replies.
impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Id: {}, Name: {}, Lines: {}]",
            self.id,
            self.name,
            self.lines.join(",")
        )
    }
}
