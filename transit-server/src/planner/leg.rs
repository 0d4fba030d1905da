//! Route legs and their post-processing.

use serde::{Deserialize, Serialize};

use crate::network::Weight;

/// One uninterrupted ride on a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Boarding station name.
    #[serde(rename = "getOn")]
    pub get_on: String,

    /// Alighting station name.
    #[serde(rename = "getOff")]
    pub get_off: String,

    /// Number of stops ridden, at least 1.
    pub stops: u32,

    /// Line label.
    pub train: String,
}

impl RouteLeg {
    /// A single-stop leg.
    pub fn new(get_on: impl Into<String>, get_off: impl Into<String>, train: impl Into<String>) -> Self {
        Self {
            get_on: get_on.into(),
            get_off: get_off.into(),
            stops: 1,
            train: train.into(),
        }
    }

    /// Whether the leg starts and ends at the same station, as a line change
    /// does.
    pub fn is_same_station(&self) -> bool {
        self.get_on == self.get_off
    }

    /// Whether `next` carries straight on from this leg on the same line.
    fn continues_into(&self, next: &RouteLeg) -> bool {
        self.get_off == next.get_on && self.train == next.train
    }
}

/// A planned route.
///
/// No legs means the traveller is already at the destination; an unreachable
/// destination is represented by the planner returning `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub legs: Vec<RouteLeg>,

    /// Total search cost, including per-stop penalties.
    pub cost: Weight,
}

impl Route {
    /// The route from a station to itself.
    pub fn empty() -> Self {
        Self {
            legs: Vec::new(),
            cost: Weight::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Total stops over every leg.
    pub fn stops(&self) -> u32 {
        self.legs.iter().map(|leg| leg.stops).sum()
    }
}

/// Merge neighbouring legs that continue on the same line, summing their
/// stops.
///
/// A single pass reaches the fixed point: a merged leg keeps its line and is
/// compared against the next leg straight away.
pub fn minify(legs: Vec<RouteLeg>) -> Vec<RouteLeg> {
    let mut merged: Vec<RouteLeg> = Vec::with_capacity(legs.len());

    for leg in legs {
        match merged.last_mut() {
            Some(last) if last.continues_into(&leg) => {
                last.get_off = leg.get_off;
                last.stops += leg.stops;
            }
            _ => merged.push(leg),
        }
    }

    merged
}

/// Drop legs that never leave their station.
///
/// Line changes show up as same-station legs; they carry no information for
/// the traveller, and at either end of a route they are pure noise.
pub fn trim_same_station(legs: Vec<RouteLeg>) -> Vec<RouteLeg> {
    legs.into_iter().filter(|leg| !leg.is_same_station()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(on: &str, off: &str, train: &str) -> RouteLeg {
        RouteLeg::new(on, off, train)
    }

    #[test]
    fn serialises_with_wire_names() {
        let json = serde_json::to_string(&leg("45 St", "36 St", "R")).unwrap();
        assert_eq!(
            json,
            r#"{"getOn":"45 St","getOff":"36 St","stops":1,"train":"R"}"#
        );
    }

    #[test]
    fn deserialises_wire_names() {
        let parsed: RouteLeg =
            serde_json::from_str(r#"{"getOn":"A","getOff":"B","stops":3,"train":"Q"}"#).unwrap();
        assert_eq!(parsed.get_on, "A");
        assert_eq!(parsed.get_off, "B");
        assert_eq!(parsed.stops, 3);
        assert_eq!(parsed.train, "Q");
    }

    #[test]
    fn minify_merges_a_ride() {
        let legs = vec![leg("A", "B", "R"), leg("B", "C", "R"), leg("C", "D", "R")];

        let merged = minify(legs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get_on, "A");
        assert_eq!(merged[0].get_off, "D");
        assert_eq!(merged[0].stops, 3);
    }

    #[test]
    fn minify_keeps_line_changes() {
        let legs = vec![leg("A", "B", "R"), leg("B", "C", "D"), leg("C", "D", "D")];

        let merged = minify(legs);
        assert_eq!(
            merged,
            vec![
                leg("A", "B", "R"),
                RouteLeg {
                    stops: 2,
                    ..leg("B", "D", "D")
                },
            ]
        );
    }

    #[test]
    fn minify_needs_contiguous_legs() {
        let legs = vec![leg("A", "B", "R"), leg("C", "D", "R")];
        assert_eq!(minify(legs.clone()), legs);
    }

    #[test]
    fn minify_empty() {
        assert!(minify(Vec::new()).is_empty());
    }

    #[test]
    fn trim_drops_line_changes() {
        let legs = vec![
            leg("A", "A", "D"),
            leg("A", "B", "D"),
            leg("B", "B", "N"),
            leg("B", "C", "N"),
            leg("C", "C", "R"),
        ];

        assert_eq!(
            trim_same_station(legs),
            vec![leg("A", "B", "D"), leg("B", "C", "N")]
        );
    }

    #[test]
    fn trimming_before_minifying_keeps_stop_counts() {
        // A change onto D at B, then one stop on D
        let legs = vec![leg("A", "B", "R"), leg("B", "B", "D"), leg("B", "C", "D")];

        let legs = minify(trim_same_station(legs));
        assert_eq!(legs, vec![leg("A", "B", "R"), leg("B", "C", "D")]);
    }

    #[test]
    fn empty_route() {
        let route = Route::empty();
        assert!(route.is_empty());
        assert_eq!(route.stops(), 0);
        assert_eq!(route.cost, Weight::ZERO);
    }
}
