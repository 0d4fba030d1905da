//! Station lookup by name.
//!
//! Stations are kept sorted by a custom name order so exact and prefix
//! queries can binary search instead of scanning the whole network.

mod index;
mod ordering;

pub use index::{PREFIX_RESULTS, StationIndex};
pub use ordering::compare_names;
