//! Sorted station lookup by name, name prefix, and id.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::logging::SUCCESS;
use crate::network::{Network, Station, StationId, StationIdx};

use super::ordering::{compare_names, normalise};

/// Most stations a prefix search returns.
pub const PREFIX_RESULTS: usize = 5;

/// Iteration ceiling for the binary search. Guarantees termination even if
/// the comparator and the sort disagree.
const MAX_SEARCH_ITERATIONS: usize = 500;

/// Stations sorted by [`compare_names`], plus id lookup.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct StationIndex {
    network: Arc<Network>,
    sorted: Vec<StationIdx>,
}

impl StationIndex {
    /// Sort the network's stations by name.
    pub fn new(network: Arc<Network>) -> Self {
        let mut sorted: Vec<StationIdx> = network.indexed_stations().map(|(idx, _)| idx).collect();
        // `sort_by` is a stable merge sort, so stations sharing a name keep
        // their input order.
        sorted.sort_by(|a, b| compare_names(&network.station(*a).name, &network.station(*b).name));

        info!(target: SUCCESS, stations = sorted.len(), "Sorted station index");

        Self { network, sorted }
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Stations in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.sorted.iter().map(|idx| self.network.station(*idx))
    }

    fn at(&self, pos: usize) -> &Station {
        self.network.station(self.sorted[pos])
    }

    /// Binary search for any position whose station satisfies `matches`,
    /// steering by the order of `query`.
    ///
    /// The order ignores spaces and case, so `matches` can be stricter than
    /// the comparator. Landing on a name that `in_block` accepts (the same
    /// as `query` once normalised) switches to a scan of that block instead
    /// of steering past it.
    fn anchor(
        &self,
        query: &str,
        matches: impl Fn(&str) -> bool,
        in_block: impl Fn(&str) -> bool,
    ) -> Option<usize> {
        let mut low = 0;
        let mut high = self.sorted.len();
        let mut budget = MAX_SEARCH_ITERATIONS;

        while budget > 0 {
            budget -= 1;
            if low >= high {
                return None;
            }
            let mid = low + (high - low) / 2;
            let name = &self.at(mid).name;

            if matches(name) {
                return Some(mid);
            }
            if in_block(name) {
                return self.scan_block(query, mid, budget, &matches, &in_block);
            }
            match compare_names(name, query) {
                Ordering::Less => low = mid + 1,
                Ordering::Equal | Ordering::Greater => high = mid,
            }
        }

        warn!(query, "Station search hit the iteration ceiling");
        None
    }

    /// Walk outwards from `mid` while names stay in the block, returning the
    /// first that `matches`.
    fn scan_block(
        &self,
        query: &str,
        mid: usize,
        mut budget: usize,
        matches: &impl Fn(&str) -> bool,
        in_block: &impl Fn(&str) -> bool,
    ) -> Option<usize> {
        let mut offset = 1;
        loop {
            let probes = [
                mid.checked_add(offset).filter(|&p| p < self.sorted.len()),
                mid.checked_sub(offset),
            ];
            let mut inside = false;
            for pos in probes.into_iter().flatten() {
                if budget == 0 {
                    warn!(query, "Station search hit the iteration ceiling");
                    return None;
                }
                budget -= 1;

                let name = &self.at(pos).name;
                if !in_block(name) {
                    continue;
                }
                inside = true;
                if matches(name) {
                    return Some(pos);
                }
            }
            if !inside {
                return None;
            }
            offset += 1;
        }
    }

    /// The station called exactly `name`.
    ///
    /// Returns `None` if no station has the name, or if several do; callers
    /// must then disambiguate by id.
    pub fn find_exact(&self, name: &str) -> Option<&Station> {
        if name.trim().is_empty() {
            return None;
        }
        let anchor = self.anchor(name, |candidate| candidate == name, same_key(name))?;

        let same_name = |pos: usize| self.at(pos).name == name;
        let before = (0..anchor).rev().take_while(|&p| same_name(p)).count();
        let after = (anchor + 1..self.sorted.len())
            .take_while(|&p| same_name(p))
            .count();

        if before + after > 0 {
            debug!(name, matches = before + after + 1, "Station name is ambiguous");
            return None;
        }
        Some(self.at(anchor))
    }

    /// Whether at least one station is called exactly `name`.
    pub fn is_valid_name(&self, name: &str) -> bool {
        !name.trim().is_empty()
            && self
                .anchor(name, |candidate| candidate == name, same_key(name))
                .is_some()
    }

    /// Up to [`PREFIX_RESULTS`] stations whose name starts with `prefix`.
    ///
    /// Finds one match by binary search, then probes its neighbours in the
    /// order +1, -1, +2, -2, ... An empty or blank prefix matches nothing.
    pub fn find_prefix(&self, prefix: &str) -> Vec<&Station> {
        if prefix.trim().is_empty() {
            return Vec::new();
        }
        let key = normalise(prefix);
        let in_block = |candidate: &str| normalise(candidate).starts_with(&key);
        let Some(anchor) = self.anchor(prefix, |candidate| candidate.starts_with(prefix), in_block) else {
            return Vec::new();
        };

        let mut found = vec![self.at(anchor)];
        for offset in 1..PREFIX_RESULTS {
            let probes = [anchor.checked_add(offset), anchor.checked_sub(offset)];
            for pos in probes.into_iter().flatten() {
                if found.len() == PREFIX_RESULTS || pos >= self.sorted.len() {
                    continue;
                }
                let station = self.at(pos);
                if station.name.starts_with(prefix) {
                    found.push(station);
                }
            }
        }
        found
    }

    /// Station with the given id. A miss is logged, not an error.
    pub fn by_id(&self, id: StationId) -> Option<&Station> {
        let station = self.network.station_by_id(id);
        if station.is_none() {
            warn!(station = %id, "Could not find station");
        }
        station
    }
}

/// Block test for exact lookups: names equal to `name` once normalised.
fn same_key(name: &str) -> impl Fn(&str) -> bool {
    let key = normalise(name);
    move |candidate: &str| normalise(candidate) == key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfig;
    use crate::network::{StationRecord, fixtures};

    fn index() -> StationIndex {
        StationIndex::new(fixtures::network())
    }

    fn ids(stations: &[&Station]) -> Vec<u32> {
        let mut ids: Vec<u32> = stations.iter().map(|s| s.id.0).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn sorted_by_name_order() {
        let index = index();
        let names: Vec<&str> = index.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(index.len(), fixtures::records().len());
        assert_eq!(&names[..6], &["3 Av", "8 Av", "9 Av", "25 St", "36 St", "45 St"]);
        assert_eq!(names.last(), Some(&"Tottenville"));
        for pair in names.windows(2) {
            assert_ne!(compare_names(pair[0], pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn exact_match() {
        let index = index();

        assert_eq!(index.find_exact("45 St").map(|s| s.id), Some(StationId(33)));
        assert_eq!(index.find_exact("Graham Av").map(|s| s.id), Some(StationId(280)));
        assert_eq!(index.find_exact("Tottenville").map(|s| s.id), Some(StationId(522)));
        assert_eq!(
            index.find_exact("Grand Central-42 St").map(|s| s.id),
            Some(StationId(469))
        );
    }

    #[test]
    fn exact_match_misses() {
        let index = index();

        assert!(index.find_exact("Oxford Circus").is_none());
        assert!(index.find_exact("").is_none());
        assert!(index.find_exact(" ").is_none());
        // Prefix of a real name is not an exact match
        assert!(index.find_exact("Grand").is_none());
    }

    #[test]
    fn exact_match_rejects_shared_names() {
        let index = index();

        assert!(index.find_exact("Grand St").is_none());
        assert!(index.is_valid_name("Grand St"));
    }

    #[test]
    fn validity() {
        let index = index();

        assert!(index.is_valid_name("Arthur Kill"));
        assert!(index.is_valid_name("36 St"));
        assert!(index.is_valid_name("Grand Central-42 St"));
        assert!(!index.is_valid_name("001 St"));
        assert!(!index.is_valid_name("arthur kill"));
        assert!(!index.is_valid_name(""));
        assert!(!index.is_valid_name(" "));
    }

    #[test]
    fn prefix_finds_both_grand_sts() {
        let index = index();

        let found = index.find_prefix("Grand St");
        assert_eq!(ids(&found), vec![231, 279]);
    }

    #[test]
    fn prefix_results_are_capped() {
        let index = index();

        let found = index.find_prefix("A");
        assert_eq!(found.len(), PREFIX_RESULTS);
        assert!(found.iter().all(|s| s.name.starts_with('A')));
    }

    #[test]
    fn prefix_variants() {
        let index = index();

        assert_eq!(ids(&index.find_prefix("Grand")), vec![231, 279, 469]);
        assert_eq!(ids(&index.find_prefix("Grand Central")), vec![469]);
        assert_eq!(ids(&index.find_prefix("Avenue")), vec![48, 49, 50, 52]);
        assert!(ids(&index.find_prefix("3")).contains(&120));
    }

    fn index_of(names: &[&str]) -> StationIndex {
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| StationRecord::new(i as u32 + 1, name, 0.0, 0.0))
            .collect();
        StationIndex::new(Arc::new(Network::build(records, &RoutingConfig::default())))
    }

    #[test]
    fn prefix_with_trailing_space() {
        let index = index_of(&["Grand Central", "Grand St", "Grandview Av", "Grandview", "Grandville"]);

        let mut names: Vec<&str> = index.find_prefix("Grand ").iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Grand Central", "Grand St"]);
        assert_eq!(index.find_prefix("Grand S").len(), 1);
        assert_eq!(index.find_prefix("Grandv").len(), 3);
    }

    #[test]
    fn exact_match_among_names_equal_but_for_spacing() {
        let index = index_of(&["Canal St", "CanalSt", "canal st", "Bowery", "Delancey St"]);

        for name in ["Canal St", "CanalSt", "canal st"] {
            assert_eq!(index.find_exact(name).map(|s| s.name.as_str()), Some(name));
        }
        assert!(!index.is_valid_name("CANAL ST"));
    }

    #[test]
    fn prefix_misses() {
        let index = index();

        assert!(index.find_prefix("Oxford Circus").is_empty());
        assert!(index.find_prefix("").is_empty());
        assert!(index.find_prefix("   ").is_empty());
    }

    #[test]
    fn by_id_lookup() {
        let index = index();

        assert_eq!(index.by_id(StationId(522)).map(|s| s.name.as_str()), Some("Tottenville"));
        assert!(index.by_id(StationId(415)).is_none());
    }

    #[test]
    fn empty_index() {
        let index = StationIndex::new(Arc::new(Network::default()));

        assert!(index.is_empty());
        assert!(index.find_prefix("A").is_empty());
        assert!(index.find_exact("A").is_none());
    }
}
