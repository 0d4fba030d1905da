//! Log severity thresholds and subscriber setup.
//!
//! The server logs through `tracing`. Verbosity is a five-step threshold:
//! errors are always emitted, and each step admits one more severity.
//! "Success" milestones are `info!` events on the [`SUCCESS`] target so they
//! can be admitted before ordinary info.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Target for success milestones (network built, listener started, key
/// accepted).
pub const SUCCESS: &str = "transit_server::success";

/// How much the server logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Errors = 1,
    Warnings = 2,
    Successes = 3,
    Info = 4,
    #[default]
    Debug = 5,
}

/// Error returned when parsing a verbosity level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid log level {0:?}: expected a number from 1 to 5")]
pub struct InvalidVerbosity(String);

impl Verbosity {
    /// `EnvFilter` directives for this threshold.
    pub fn directives(self) -> &'static str {
        match self {
            Verbosity::Errors => "error",
            Verbosity::Warnings => "warn",
            Verbosity::Successes => "warn,transit_server::success=info",
            Verbosity::Info => "warn,transit_server=info",
            Verbosity::Debug => "warn,transit_server=debug",
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

impl FromStr for Verbosity {
    type Err = InvalidVerbosity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Verbosity::Errors),
            "2" => Ok(Verbosity::Warnings),
            "3" => Ok(Verbosity::Successes),
            "4" => Ok(Verbosity::Info),
            "5" => Ok(Verbosity::Debug),
            other => Err(InvalidVerbosity(other.to_string())),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.level().fmt(f)
    }
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
