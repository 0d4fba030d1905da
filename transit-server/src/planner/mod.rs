//! Route planning over the transit network.
//!
//! The planner answers "how do I get from this station to that one?" with
//! a shortest-path search over platform nodes, then folds the per-hop result
//! into rides on a single line.

mod leg;
mod search;


pub use leg::{Route, RouteLeg, minify, trim_same_station};
pub use search::Planner;
