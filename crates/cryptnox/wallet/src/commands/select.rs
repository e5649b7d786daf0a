use bytes::Bytes;
use cryptnox_apdu_core::{Command, Response};

use super::{CLA_ISO, CardCommand, INS_SELECT, P1_SELECT_BY_NAME, success_payload};
use crate::constants::CRYPTNOX_AID;
use crate::session::HandshakeStep;

/// SELECT of an application by its identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCommand {
    aid: Bytes,
}

impl SelectCommand {
    /// Select the application with the given AID
    pub fn with_aid(aid: impl Into<Bytes>) -> Self {
        Self { aid: aid.into() }
    }

    /// Select the Cryptnox wallet applet
    pub const fn cryptnox() -> Self {
        Self {
            aid: Bytes::from_static(CRYPTNOX_AID),
        }
    }

    /// AID being selected
    pub const fn aid(&self) -> &Bytes {
        &self.aid
    }
}

/// Successful SELECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOk {
    /// File control information returned by the applet, possibly empty
    pub fci: Bytes,
}

impl CardCommand for SelectCommand {
    type Ok = SelectOk;

    const STEP: HandshakeStep = HandshakeStep::Select;

    fn to_command(&self) -> Command {
        Command::new_with_data(CLA_ISO, INS_SELECT, P1_SELECT_BY_NAME, 0x00, self.aid.clone())
    }

    fn parse_response(response: Response) -> crate::Result<Self::Ok> {
        success_payload(response).map(|fci| SelectOk { fci })
    }
}
