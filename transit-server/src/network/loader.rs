//! Reading the network description.
//!
//! The description is a JSON document:
//!
//! ```json
//! { "stations": [
//!     { "id": 522, "name": "Tottenville", "latitude": 40.512764, "longitude": -74.251961,
//!       "lines": ["SIR"], "neighbours": ["523"] }
//! ] }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::NetworkError;

/// One station as described in the input, before the graph is built.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Lines serving the station, one platform node each.
    #[serde(default)]
    pub lines: Vec<String>,

    /// Raw neighbour descriptors: `"<id>"` or `"<id>[L1,L2]"`.
    #[serde(default)]
    pub neighbours: Vec<String>,
}

impl StationRecord {
    /// Convenience constructor, mostly for fixtures.
    pub fn new(id: u32, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            latitude,
            longitude,
            lines: Vec::new(),
            neighbours: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn with_neighbours(mut self, neighbours: &[&str]) -> Self {
        self.neighbours = neighbours.iter().map(|n| (*n).to_string()).collect();
        self
    }
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    stations: Vec<StationRecord>,
}

/// Load station records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<StationRecord>, NetworkError> {
    let content = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&content)
}

/// Parse station records from a JSON string.
///
/// Records without a name are dropped.
pub fn parse_records(json: &str) -> Result<Vec<StationRecord>, NetworkError> {
    let file: NetworkFile = serde_json::from_str(json)?;

    Ok(file
        .stations
        .into_iter()
        .filter(|record| {
            let keep = !record.name.trim().is_empty();
            if !keep {
                warn!(station = record.id, "Skipping station record with no name");
            }
            keep
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "stations": [
            { "id": 522, "name": "Tottenville", "latitude": 40.512764, "longitude": -74.251961,
              "lines": ["SIR"], "neighbours": ["523"] },
            { "id": 523, "name": "Arthur Kill", "latitude": 40.516578, "longitude": -74.242096,
              "lines": ["SIR"], "neighbours": ["522", "521[SIR]"] },
            { "id": 9, "name": "Lonely Halt", "latitude": 0.0, "longitude": 0.0 }
        ]
    }"#;

    #[test]
    fn parse_sample() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, 522);
        assert_eq!(records[0].name, "Tottenville");
        assert_eq!(records[0].lines, vec!["SIR".to_string()]);
        assert_eq!(records[1].neighbours, vec!["522", "521[SIR]"]);

        // Missing lines and neighbours default to empty
        assert!(records[2].lines.is_empty());
        assert!(records[2].neighbours.is_empty());
    }

    #[test]
    fn drops_nameless_records() {
        let json = r#"{ "stations": [
            { "id": 1, "name": "  ", "latitude": 0.0, "longitude": 0.0 },
            { "id": 2, "name": "Real St", "latitude": 0.0, "longitude": 0.0 }
        ] }"#;

        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_records("{ \"stations\": [ { \"id\": \"x\" } ] }").unwrap_err();
        assert!(matches!(err, NetworkError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
