//! Server error types.

/// Errors raised while handing off a session.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Socket operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every port in the session range is taken
    #[error("No free session port in {low}-{high}")]
    PortsExhausted { low: u16, high: u16 },
}
