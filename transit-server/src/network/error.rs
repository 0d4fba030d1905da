//! Network description and build errors.

use std::path::PathBuf;

use super::StationId;

/// Errors raised while loading or building the network.
///
/// Only `Io` and `Json` abort a load. The remaining variants describe a
/// single bad entry, which the builder logs and skips.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The description file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The description file is not valid JSON for the expected shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A neighbour descriptor could not be parsed
    #[error("malformed neighbour descriptor {descriptor:?}: {reason}")]
    MalformedNeighbour {
        descriptor: String,
        reason: &'static str,
    },

    /// A neighbour descriptor names a station that does not exist
    #[error("station {station} lists unknown neighbour {neighbour}")]
    UnknownNeighbour {
        station: StationId,
        neighbour: StationId,
    },

    /// Two records share a station id
    #[error("duplicate station id {0}")]
    DuplicateStation(StationId),
}
