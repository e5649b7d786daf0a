//! Error types specific to card transport

use thiserror::Error;

/// Transport error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No card in the field when an exchange was attempted
    #[error("No card present")]
    NoCard,

    /// Card left the field during the exchange
    #[error("Card removed during exchange")]
    CardRemoved,

    /// Reader returned a response whose length cannot be a valid frame
    #[error("Malformed response length: {len} bytes")]
    MalformedResponse {
        /// Length reported by the reader
        len: usize,
    },

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// The medium does not implement the requested operation
    #[error("Unsupported by transport: {0}")]
    Unsupported(&'static str),

    /// Reader or driver failure
    #[error("Reader error: {0}")]
    Reader(String),
}

impl TransportError {
    /// Create a reader error from any displayable driver error
    pub fn reader(error: impl std::fmt::Display) -> Self {
        Self::Reader(error.to_string())
    }

    /// Whether the error means the card is gone and a new presentation is needed
    pub const fn is_card_lost(&self) -> bool {
        matches!(self, Self::NoCard | Self::CardRemoved)
    }
}
