//! Command/response pairs of the secure channel handshake
//!
//! Each type builds exactly one command frame and knows how to interpret the
//! card's answer to it.

use bytes::Bytes;
use cryptnox_apdu_core::{Command, Response};

use crate::session::HandshakeStep;

mod get_card_certificate;
pub use get_card_certificate::*;
mod open_secure_channel;
pub use open_secure_channel::*;
mod select;
pub use select::*;

/// Interindustry class byte
pub const CLA_ISO: u8 = 0x00;
/// Proprietary class byte used by the wallet applet
pub const CLA_PROPRIETARY: u8 = 0x80;

/// SELECT instruction
pub const INS_SELECT: u8 = 0xA4;
/// P1 of SELECT: select by DF name
pub const P1_SELECT_BY_NAME: u8 = 0x04;
/// GET CARD CERTIFICATE instruction
pub const INS_GET_CARD_CERTIFICATE: u8 = 0xF8;
/// OPEN SECURE CHANNEL instruction
pub const INS_OPEN_SECURE_CHANNEL: u8 = 0x10;

/// A single handshake exchange
pub trait CardCommand {
    /// Parsed success response
    type Ok;

    /// Handshake step this command performs
    const STEP: HandshakeStep;

    /// Command frame to send
    fn to_command(&self) -> Command;

    /// Interpret the card's answer; anything but `90 00` is an error
    fn parse_response(response: Response) -> crate::Result<Self::Ok>;
}

/// Strip the status word from a successful response
pub(crate) fn success_payload(response: Response) -> crate::Result<Bytes> {
    Ok(response.into_payload()?)
}
