use bytes::Bytes;
use cryptnox_apdu_core::{Command, Response};

use super::{CLA_PROPRIETARY, CardCommand, INS_GET_CARD_CERTIFICATE, success_payload};
use crate::constants::CHALLENGE_NONCE_LEN;
use crate::session::HandshakeStep;

/// GET CARD CERTIFICATE with a host challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCardCertificateCommand {
    nonce: [u8; CHALLENGE_NONCE_LEN],
}

impl GetCardCertificateCommand {
    /// Challenge the card with `nonce`
    pub const fn with_nonce(nonce: [u8; CHALLENGE_NONCE_LEN]) -> Self {
        Self { nonce }
    }

    /// Challenge nonce carried by the command
    pub const fn nonce(&self) -> &[u8; CHALLENGE_NONCE_LEN] {
        &self.nonce
    }
}

/// Successful GET CARD CERTIFICATE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCardCertificateOk {
    /// Certificate material, not interpreted further
    pub certificate: Bytes,
}

impl CardCommand for GetCardCertificateCommand {
    type Ok = GetCardCertificateOk;

    const STEP: HandshakeStep = HandshakeStep::RequestCertificate;

    fn to_command(&self) -> Command {
        Command::new_with_data(
            CLA_PROPRIETARY,
            INS_GET_CARD_CERTIFICATE,
            0x00,
            0x00,
            Bytes::copy_from_slice(&self.nonce),
        )
    }

    fn parse_response(response: Response) -> crate::Result<Self::Ok> {
        success_payload(response).map(|certificate| GetCardCertificateOk { certificate })
    }
}
