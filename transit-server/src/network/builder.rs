//! Turning station records into the connected node/edge graph.

use tracing::{debug, error, info, warn};

use crate::config::RoutingConfig;
use crate::logging::SUCCESS;

use super::graph::Network;
use super::loader::StationRecord;
use super::model::{EdgeKind, NodeId, Station, StationId, StationIdx};
use super::neighbour::NeighbourLink;
use super::NetworkError;

impl Network {
    /// Build the network from station records.
    ///
    /// Runs in three passes: create stations and one platform node per line,
    /// add symmetric track edges from every neighbour descriptor, then add a
    /// full mesh of transfer edges inside every station. Bad entries are
    /// logged and skipped; the build itself never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::config::RoutingConfig;
    /// use transit_server::network::{Network, StationId, StationRecord};
    ///
    /// let records = vec![
    ///     StationRecord::new(1, "Test St", 0.0, 0.0).with_lines(&["A"]).with_neighbours(&["2"]),
    ///     StationRecord::new(2, "Fake Road", 0.003, 0.004).with_lines(&["A"]),
    /// ];
    /// let network = Network::build(records, &RoutingConfig::default());
    ///
    /// assert_eq!(network.station_count(), 2);
    /// assert_eq!(network.edge_count(), 2); // one each way
    /// assert!(network.station_by_id(StationId(2)).is_some());
    /// ```
    pub fn build(records: Vec<StationRecord>, config: &RoutingConfig) -> Self {
        let mut network = Network::default();
        let mut pending: Vec<(StationIdx, Vec<String>)> = Vec::with_capacity(records.len());

        for record in records {
            let id = StationId(record.id);
            if network.by_id.contains_key(&id) {
                let err = NetworkError::DuplicateStation(id);
                error!(name = %record.name, error = %err, "Skipping station record");
                continue;
            }

            let idx = network.add_station(Station::new(
                id,
                record.name,
                record.latitude,
                record.longitude,
            ));
            for line in record.lines {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if network.add_line(idx, line.clone()).is_none() {
                    debug!(station = %id, line = %line, "Ignoring repeated line");
                }
            }
            pending.push((idx, record.neighbours));
        }

        for (idx, descriptors) in pending {
            for descriptor in descriptors {
                match network.link(idx, &descriptor, config) {
                    Ok(0) => {
                        debug!(
                            station = %network.station(idx).id,
                            descriptor = %descriptor,
                            "Neighbour shares no line"
                        );
                    }
                    Ok(_) => {}
                    Err(err @ NetworkError::UnknownNeighbour { .. }) => {
                        warn!(error = %err, "Skipping neighbour link");
                    }
                    Err(err) => {
                        error!(
                            station = %network.station(idx).id,
                            error = %err,
                            "Skipping neighbour link"
                        );
                    }
                }
            }
        }

        let transfer = config.transfer();
        for s in 0..network.stations.len() {
            let nodes: Vec<NodeId> = network.stations[s].nodes().to_vec();
            for (i, &a) in nodes.iter().enumerate() {
                for &b in &nodes[i + 1..] {
                    network.connect(a, b, transfer, EdgeKind::Transfer);
                }
            }
        }

        for station in network.stations.iter().filter(|s| !s.is_routable()) {
            warn!(station = %station.id, name = %station.name, "Station serves no lines and is unroutable");
        }

        info!(
            target: SUCCESS,
            stations = network.station_count(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "Built transit network"
        );

        network
    }

    /// Add track edges for one neighbour descriptor of station `from`.
    ///
    /// Returns how many node pairs were linked.
    fn link(
        &mut self,
        from: StationIdx,
        descriptor: &str,
        config: &RoutingConfig,
    ) -> Result<usize, NetworkError> {
        let link = NeighbourLink::parse(descriptor)?;
        let station = self.station(from);
        let to = self
            .station_idx(link.station)
            .ok_or(NetworkError::UnknownNeighbour {
                station: station.id,
                neighbour: link.station,
            })?;
        let neighbour = self.station(to);

        let weight = config.track_weight(
            station.latitude - neighbour.latitude,
            station.longitude - neighbour.longitude,
        );

        let pairs: Vec<(NodeId, NodeId)> = station
            .nodes()
            .iter()
            .filter_map(|&node| {
                let line = self.node(node).line();
                if !link.serves(line) {
                    return None;
                }
                neighbour.node_on_line(line).map(|other| (node, other))
            })
            .collect();

        for &(a, b) in &pairs {
            self.connect(a, b, weight, EdgeKind::Track);
        }

        Ok(pairs.len())
    }
}
