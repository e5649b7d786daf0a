use bytes::Bytes;

use crate::constants::CRYPTNOX_AID;
use crate::types::PairingSlot;

/// Parameters of a secure channel handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Application identifier sent with SELECT
    pub aid: Bytes,
    /// Slot placed in P1 of OPEN SECURE CHANNEL
    pub pairing_slot: PairingSlot,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            aid: Bytes::from_static(CRYPTNOX_AID),
            pairing_slot: PairingSlot::PukFallback,
        }
    }
}

impl HandshakeConfig {
    /// Select a different application
    pub fn with_aid(mut self, aid: impl Into<Bytes>) -> Self {
        self.aid = aid.into();
        self
    }

    /// Open the channel on a specific pairing slot
    pub const fn with_pairing_slot(mut self, pairing_slot: PairingSlot) -> Self {
        self.pairing_slot = pairing_slot;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HandshakeConfig::default();
        assert_eq!(config.aid.as_ref(), CRYPTNOX_AID);
        assert_eq!(config.pairing_slot, PairingSlot::PukFallback);

        let config = config.with_pairing_slot(PairingSlot::Paired(1)).with_aid(vec![0xA0]);
        assert_eq!(config.pairing_slot.p1(), 0x01);
        assert_eq!(config.aid.as_ref(), &[0xA0]);
    }
}
