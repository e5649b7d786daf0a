use cryptnox_apdu_core::{DecodeError, EncodeError, StatusError, StatusWord, TransportError};

use crate::crypto::KeyGenError;
use crate::session::{HandshakeState, HandshakeStep};

/// Result type for Cryptnox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cryptnox operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-related errors
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command frame could not be encoded
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Response frame could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Card answered with a non-success status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Ephemeral key generation failed
    #[error(transparent)]
    KeyGen(#[from] KeyGenError),

    /// A handshake step was invoked from the wrong state
    #[error("Cannot run {step} from state {state}")]
    InvalidState {
        /// Step that was attempted
        step: HandshakeStep,
        /// State the session was in
        state: HandshakeState,
    },

    /// Pairing index collides with the reserved fallback slot
    #[error("Invalid pairing slot index: {0:#04X}")]
    InvalidPairingSlot(u8),

    /// A handshake aborted at the given step
    #[error("Handshake failed during {step}: {source}")]
    Handshake {
        /// Step that failed
        step: HandshakeStep,
        /// Underlying failure
        source: Box<Self>,
    },
}

impl Error {
    /// Wrap an error with the step it aborted
    pub fn at_step(self, step: HandshakeStep) -> Self {
        Self::Handshake {
            step,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping handshake step wrappers
    pub fn root(&self) -> &Self {
        match self {
            Self::Handshake { source, .. } => source.root(),
            other => other,
        }
    }

    /// Status word returned by the card, if that is what failed
    pub fn status_word(&self) -> Option<StatusWord> {
        match self.root() {
            Self::Status(e) => Some(e.status_word()),
            _ => None,
        }
    }

    /// Whether the failure came from the transport reporting a lost card
    pub fn is_card_lost(&self) -> bool {
        matches!(self.root(), Self::Transport(e) if e.is_card_lost())
    }
}
