//! Error types specific to APDU commands

use thiserror::Error;

/// Error raised while encoding a command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Payload does not fit into a single short Lc byte
    #[error("Payload too large: {len} bytes (max 255)")]
    PayloadTooLarge {
        /// Length of the rejected payload
        len: usize,
    },
}
