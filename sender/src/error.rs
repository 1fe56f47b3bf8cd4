use std::io;

/// Errors raised while building or sending segments
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    #[error("Failed to create raw socket: {0}")]
    SocketCreation(#[source] io::Error),

    #[error("Error setting IP_HDRINCL: {0}")]
    Configuration(#[source] io::Error),

    #[error("sendto failed: {0}")]
    Transmission(#[source] io::Error),

    #[error("{what} too short: need {needed} bytes, got {got}")]
    Truncated {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("payload of {0} bytes does not fit in a single IPv4 datagram")]
    PayloadTooLarge(usize),
}

impl SenderError {
    /// Socket setup failures end the process; a failed send does not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SenderError::Transmission(_))
    }
}

pub type Result<T> = std::result::Result<T, SenderError>;
