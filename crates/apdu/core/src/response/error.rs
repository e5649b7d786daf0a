//! Error types specific to APDU responses

use thiserror::Error;

use super::status::StatusWord;

/// Error raised while splitting a raw frame into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Frame is too short to hold the mandatory fields
    #[error("Frame too short: {len} bytes")]
    TooShort {
        /// Length of the rejected frame
        len: usize,
    },
}

/// Card answered with a status word other than the expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatusError {
    /// Unexpected status word
    #[error("Unexpected status word {0} ({desc})", desc = .0.description())]
    Unexpected(StatusWord),
}

impl StatusError {
    /// Create a new status error from individual bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self::Unexpected(StatusWord::new(sw1, sw2))
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        match self {
            Self::Unexpected(sw) => *sw,
        }
    }
}
