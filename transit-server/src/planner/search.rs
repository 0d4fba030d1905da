//! Shortest-path search over platform nodes.
//!
//! Costs are edge weights plus a fixed penalty for every hop, so among
//! equally long rides the one with fewer stops and changes wins.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use priority_queue::PriorityQueue;
use tracing::{debug, warn};

use crate::config::RoutingConfig;
use crate::network::{Network, NodeId, StationId, Weight};

use super::leg::{Route, RouteLeg, minify, trim_same_station};

/// Route planner over a built network.
///
/// Holds no per-query state, so one planner can serve every session.
#[derive(Debug, Clone)]
pub struct Planner {
    network: Arc<Network>,
    config: RoutingConfig,
}

impl Planner {
    pub fn new(network: Arc<Network>, config: RoutingConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Plan a route between two stations.
    ///
    /// Returns an empty route when `start == end`, and `None` when either
    /// station is unknown, the destination cannot be reached, or every hop
    /// stays within one station name.
    pub fn route(&self, start: StationId, end: StationId) -> Option<Route> {
        let Some(from) = self.network.station_by_id(start) else {
            warn!(station = %start, "Cannot route from unknown station");
            return None;
        };
        let Some(to) = self.network.station_by_id(end) else {
            warn!(station = %end, "Cannot route to unknown station");
            return None;
        };

        if start == end {
            return Some(Route::empty());
        }

        let (Some(source), Some(target)) = (from.first_node(), to.first_node()) else {
            warn!(%start, %end, "Station serves no lines, no route possible");
            return None;
        };

        let Some((cost, path)) = self.shortest_path(source, target) else {
            warn!(%start, %end, "Could not find a route");
            return None;
        };

        let legs = path
            .windows(2)
            .map(|pair| {
                let boarded = self.network.station_of(pair[0]);
                let arrived = self.network.node(pair[1]);
                RouteLeg::new(
                    boarded.name.as_str(),
                    self.network.station(arrived.station()).name.as_str(),
                    arrived.line(),
                )
            })
            .collect();
        let legs = minify(trim_same_station(legs));
        if legs.is_empty() {
            warn!(%start, %end, "Route has no legs once same-station hops are dropped");
            return None;
        }

        debug!(%start, %end, %cost, legs = legs.len(), "Planned route");
        Some(Route { legs, cost })
    }

    /// Dijkstra from `source`, stopping once `target` is settled.
    ///
    /// Returns the cost and the node path, both ends included.
    fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<(Weight, Vec<NodeId>)> {
        let stop = self.config.stop();
        let mut queue = PriorityQueue::<NodeId, Reverse<Weight>>::new();
        let mut best = HashMap::<NodeId, Weight>::new();
        let mut previous = HashMap::<NodeId, NodeId>::new();
        let mut settled = HashSet::<NodeId>::new();

        queue.push(source, Reverse(Weight::ZERO));
        best.insert(source, Weight::ZERO);

        while let Some((node, Reverse(cost))) = queue.pop() {
            if node == target {
                debug!(settled = settled.len(), "Found a path");
                return Some((cost, walk_back(&previous, target)));
            }
            settled.insert(node);

            for edge in self.network.node(node).edges() {
                if settled.contains(&edge.to) {
                    continue;
                }
                let candidate = cost + edge.weight + stop;
                if best.get(&edge.to).is_none_or(|&known| candidate < known) {
                    best.insert(edge.to, candidate);
                    previous.insert(edge.to, node);
                    queue.push_increase(edge.to, Reverse(candidate));
                }
            }
        }

        debug!(settled = settled.len(), "Didn't find a path");
        None
    }
}

/// Follow predecessors back from `target`, returning the path in travel
/// order.
fn walk_back(previous: &HashMap<NodeId, NodeId>, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&before) = previous.get(&current) {
        path.push(before);
        current = before;
    }
    path.reverse();
    path
}
