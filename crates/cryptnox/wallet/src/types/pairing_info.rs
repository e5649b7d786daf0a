use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::PUK_FALLBACK_SLOT;
use crate::crypto::derive_pairing_key;

/// Card-side pairing slot selected by P1 of OPEN SECURE CHANNEL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PairingSlot {
    /// A slot populated by a previous pairing, `0x00..=0xFE`
    Paired(u8),
    /// The reserved slot `0xFF` keyed by the PUK-derived pairing key
    #[default]
    PukFallback,
}

impl PairingSlot {
    /// Slot for a paired index, rejecting the reserved fallback value
    pub fn paired(index: u8) -> crate::Result<Self> {
        if index == PUK_FALLBACK_SLOT {
            return Err(crate::Error::InvalidPairingSlot(index));
        }
        Ok(Self::Paired(index))
    }

    /// Interpret a raw P1 value
    pub const fn from_p1(p1: u8) -> Self {
        if p1 == PUK_FALLBACK_SLOT {
            Self::PukFallback
        } else {
            Self::Paired(p1)
        }
    }

    /// P1 value sent on the wire
    pub const fn p1(&self) -> u8 {
        match self {
            Self::Paired(index) => *index,
            Self::PukFallback => PUK_FALLBACK_SLOT,
        }
    }
}

impl fmt::Display for PairingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paired(index) => write!(f, "slot {}", index),
            Self::PukFallback => write!(f, "PUK fallback slot (0xFF)"),
        }
    }
}

/// 32-byte pairing key derived from a PUK
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PairingKey([u8; 32]);

impl PairingKey {
    /// Derive the fallback pairing key from a PUK
    pub fn from_puk(puk: &[u8]) -> Self {
        Self(*derive_pairing_key(puk))
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PairingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PairingKey(..)")
    }
}
