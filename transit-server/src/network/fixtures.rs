//! A small Brooklyn-flavoured network shared by unit tests.
//!
//! Coordinates are picked so track weights come out round: a step of
//! 0.00348 degrees costs exactly 2.00.
//!
//! ```text
//!                 30 Prospect Av (R)
//!                  |
//!                 31 25 St (R)
//!                  |
//!  71 8 Av (N) -- 32 36 St (D,N,R) -- 59 9 Av (D)
//!                  |
//!                 33 45 St (R)
//!
//!  48 Avenue H - 49 Avenue J - 50 Avenue M - 52 Avenue U   (Q)
//!  522 Tottenville - 523 Arthur Kill                       (SIR)
//!  279 Grand St - 280 Graham Av                            (L)
//! ```
//!
//! Plus unconnected stations: 231 Grand St, 469 Grand Central-42 St,
//! 2 Astoria Blvd, 3 Atlantic Av, 120 3 Av and 900 Lonely Halt (no lines).

use std::sync::Arc;

use crate::config::RoutingConfig;

use super::{Network, StationRecord};

const STEP: f64 = 0.00348;

pub(crate) fn records() -> Vec<StationRecord> {
    vec![
        // R, D and N around 36 St
        StationRecord::new(33, "45 St", 0.0, 0.0)
            .with_lines(&["R"])
            .with_neighbours(&["32"]),
        StationRecord::new(32, "36 St", STEP, 0.0)
            .with_lines(&["D", "N", "R"])
            .with_neighbours(&["33[R]", "31[R]", "59[D]", "71[N]"]),
        StationRecord::new(31, "25 St", 2.0 * STEP, 0.0)
            .with_lines(&["R"])
            .with_neighbours(&["32", "30"]),
        StationRecord::new(30, "Prospect Av", 3.0 * STEP, 0.0)
            .with_lines(&["R"])
            .with_neighbours(&["31"]),
        StationRecord::new(59, "9 Av", STEP, STEP)
            .with_lines(&["D"])
            .with_neighbours(&["32"]),
        StationRecord::new(71, "8 Av", STEP, -2.0 * STEP)
            .with_lines(&["N"])
            .with_neighbours(&["32"]),
        // Q
        StationRecord::new(48, "Avenue H", 1.0, 0.0)
            .with_lines(&["Q"])
            .with_neighbours(&["49"]),
        StationRecord::new(49, "Avenue J", 1.0 + STEP, 0.0)
            .with_lines(&["Q"])
            .with_neighbours(&["48", "50"]),
        StationRecord::new(50, "Avenue M", 1.0 + 2.0 * STEP, 0.0)
            .with_lines(&["Q"])
            .with_neighbours(&["49", "52"]),
        StationRecord::new(52, "Avenue U", 1.0 + 3.0 * STEP, 0.0)
            .with_lines(&["Q"])
            .with_neighbours(&["50"]),
        // Staten Island, unconnected to everything else
        StationRecord::new(522, "Tottenville", 2.0, 0.0)
            .with_lines(&["SIR"])
            .with_neighbours(&["523"]),
        StationRecord::new(523, "Arthur Kill", 2.0 + STEP, 0.0)
            .with_lines(&["SIR"])
            .with_neighbours(&["522"]),
        // Two stations called Grand St
        StationRecord::new(231, "Grand St", 3.0, 0.0).with_lines(&["B", "D"]),
        StationRecord::new(279, "Grand St", 4.0, 0.0)
            .with_lines(&["L"])
            .with_neighbours(&["280"]),
        StationRecord::new(280, "Graham Av", 4.0 + STEP, 0.0)
            .with_lines(&["L"])
            .with_neighbours(&["279"]),
        StationRecord::new(469, "Grand Central-42 St", 5.0, 0.0).with_lines(&["S", "7"]),
        StationRecord::new(2, "Astoria Blvd", 6.0, 0.0).with_lines(&["N", "W"]),
        StationRecord::new(3, "Atlantic Av", 7.0, 0.0).with_lines(&["B", "Q"]),
        StationRecord::new(120, "3 Av", 8.0, 0.0).with_lines(&["L"]),
        StationRecord::new(900, "Lonely Halt", 9.0, 0.0),
    ]
}

pub(crate) fn network() -> Arc<Network> {
    Arc::new(Network::build(records(), &RoutingConfig::default()))
}
