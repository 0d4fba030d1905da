//! Cost model shared by the graph builder and the planner.

use crate::network::Weight;

/// Constants that turn geometry and line changes into edge weights.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Average train speed used to turn coordinate distance into time.
    pub average_speed: f64,

    /// Multiplier applied after dividing by speed.
    pub distance_scale: f64,

    /// Cost of changing between two platforms of the same station.
    pub transfer_weight: f64,

    /// Cost added for every hop the planner takes.
    pub stop_weight: f64,
}

impl RoutingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        average_speed: f64,
        distance_scale: f64,
        transfer_weight: f64,
        stop_weight: f64,
    ) -> Self {
        Self {
            average_speed,
            distance_scale,
            transfer_weight,
            stop_weight,
        }
    }

    /// Weight of a track edge between two stations.
    ///
    /// This is `round(hypot(Δlat, Δlong) / average_speed * distance_scale, 2)`:
    /// a geometric proxy for travel time, not a timetable value.
    pub fn track_weight(&self, delta_lat: f64, delta_long: f64) -> Weight {
        let distance = delta_lat.hypot(delta_long);
        Weight::from_f64(distance / self.average_speed * self.distance_scale)
    }

    pub fn transfer(&self) -> Weight {
        Weight::from_f64(self.transfer_weight)
    }

    pub fn stop(&self) -> Weight {
        Weight::from_f64(self.stop_weight)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            average_speed: 17.4, // mph, NYC subway average
            distance_scale: 10_000.0,
            transfer_weight: 2.0,
            stop_weight: 1.0,
        }
    }
}
