//! Neighbour descriptors: `"<id>"` or `"<id>[L1,L2]"`.

use super::{NetworkError, StationId};

/// A parsed link from one station to a neighbouring station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourLink {
    pub station: StationId,
    /// Lines the link is restricted to, or `None` for every shared line.
    pub lines: Option<Vec<String>>,
}

impl NeighbourLink {
    /// Parse a raw neighbour descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::network::{NeighbourLink, StationId};
    ///
    /// let link = NeighbourLink::parse("12[A,C]").unwrap();
    /// assert_eq!(link.station, StationId(12));
    /// assert!(link.serves("C"));
    /// assert!(!link.serves("E"));
    ///
    /// let link = NeighbourLink::parse("40").unwrap();
    /// assert!(link.serves("anything"));
    /// ```
    pub fn parse(descriptor: &str) -> Result<Self, NetworkError> {
        let malformed = |reason| NetworkError::MalformedNeighbour {
            descriptor: descriptor.to_string(),
            reason,
        };

        let trimmed = descriptor.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if digits_end == 0 {
            return Err(malformed("must start with a station id"));
        }

        let id: u32 = trimmed[..digits_end]
            .parse()
            .map_err(|_| malformed("station id out of range"))?;

        let rest = trimmed[digits_end..].trim();
        if rest.is_empty() {
            return Ok(Self {
                station: StationId(id),
                lines: None,
            });
        }

        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| malformed("line restriction must be a bracketed list"))?;

        let lines: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            return Err(malformed("line restriction is empty"));
        }

        Ok(Self {
            station: StationId(id),
            lines: Some(lines),
        })
    }

    /// Whether this link applies to platforms on `line`.
    pub fn serves(&self, line: &str) -> bool {
        match &self.lines {
            Some(lines) => lines.iter().any(|l| l == line),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id() {
        let link = NeighbourLink::parse("523").unwrap();
        assert_eq!(link.station, StationId(523));
        assert_eq!(link.lines, None);
    }

    #[test]
    fn restricted_lines() {
        let link = NeighbourLink::parse("36[N, R]").unwrap();
        assert_eq!(link.station, StationId(36));
        assert_eq!(link.lines, Some(vec!["N".to_string(), "R".to_string()]));
        assert!(link.serves("R"));
        assert!(!link.serves("W"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let link = NeighbourLink::parse("  7 ").unwrap();
        assert_eq!(link.station, StationId(7));
    }

    #[test]
    fn rejects_missing_id() {
        assert!(NeighbourLink::parse("").is_err());
        assert!(NeighbourLink::parse("[A]").is_err());
        assert!(NeighbourLink::parse("abc").is_err());
    }

    #[test]
    fn rejects_bad_restriction() {
        assert!(NeighbourLink::parse("12A").is_err());
        assert!(NeighbourLink::parse("12[A").is_err());
        assert!(NeighbourLink::parse("12[]").is_err());
        assert!(NeighbourLink::parse("12[ , ]").is_err());
    }

    #[test]
    fn rejects_overflowing_id() {
        assert!(NeighbourLink::parse("99999999999").is_err());
    }
}
