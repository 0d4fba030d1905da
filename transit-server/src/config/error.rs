//! Configuration error types.

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::Invalid {
            var: "TRANSIT_ADDR",
            value: "nowhere".into(),
            reason: "invalid socket address syntax".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"nowhere\" for TRANSIT_ADDR: invalid socket address syntax"
        );
    }
}
