use bytes::Bytes;
use cryptnox_apdu_core::{Command, Response};

use super::{CLA_PROPRIETARY, CardCommand, INS_OPEN_SECURE_CHANNEL, success_payload};
use crate::constants::UNCOMPRESSED_PUBLIC_KEY_LEN;
use crate::session::HandshakeStep;
use crate::types::PairingSlot;

/// OPEN SECURE CHANNEL carrying the host's ephemeral public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSecureChannelCommand {
    pairing_slot: PairingSlot,
    public_key: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
}

impl OpenSecureChannelCommand {
    /// Create the command for a pairing slot and an uncompressed public key
    pub const fn with_pairing_slot_and_key(
        pairing_slot: PairingSlot,
        public_key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
    ) -> Self {
        Self {
            pairing_slot,
            public_key: *public_key,
        }
    }

    /// Slot placed in P1
    pub const fn pairing_slot(&self) -> PairingSlot {
        self.pairing_slot
    }
}

/// Successful OPEN SECURE CHANNEL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSecureChannelOk {
    /// Card ephemeral contribution and authentication material
    pub payload: Bytes,
}

impl CardCommand for OpenSecureChannelCommand {
    type Ok = OpenSecureChannelOk;

    const STEP: HandshakeStep = HandshakeStep::OpenSecureChannel;

    fn to_command(&self) -> Command {
        Command::new_with_data(
            CLA_PROPRIETARY,
            INS_OPEN_SECURE_CHANNEL,
            self.pairing_slot.p1(),
            0x00,
            Bytes::copy_from_slice(&self.public_key),
        )
    }

    fn parse_response(response: Response) -> crate::Result<Self::Ok> {
        success_payload(response).map(|payload| OpenSecureChannelOk { payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let mut key = [0xAB; UNCOMPRESSED_PUBLIC_KEY_LEN];
        key[0] = 0x04;
        key
    }

    #[test]
    fn test_open_secure_channel_fallback_frame() {
        let frame = OpenSecureChannelCommand::with_pairing_slot_and_key(
            PairingSlot::PukFallback,
            &sample_key(),
        )
        .to_command()
        .to_bytes()
        .unwrap();

        assert_eq!(&frame[..6], &[0x80, 0x10, 0xFF, 0x00, 0x41, 0x04]);
        assert_eq!(frame.len(), 5 + 65);
        assert!(frame[6..].iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn test_open_secure_channel_paired_slot() {
        let cmd = OpenSecureChannelCommand::with_pairing_slot_and_key(
            PairingSlot::Paired(2),
            &sample_key(),
        );
        assert_eq!(cmd.to_command().p1(), 0x02);
    }

    #[test]
    fn test_open_secure_channel_rejected() {
        let err = OpenSecureChannelCommand::parse_response(Response::error((0x6A, 0x86)))
            .unwrap_err();
        assert_eq!(err.status_word().map(|sw| sw.to_u16()), Some(0x6A86));
    }
}
