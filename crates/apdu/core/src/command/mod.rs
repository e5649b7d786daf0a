//! APDU command definitions
//!
//! Commands are always encoded as ISO/IEC 7816-4 short "case 3" frames:
//! a four byte header, a one byte Lc and exactly Lc bytes of data.

pub mod error;

use bytes::{BufMut, Bytes, BytesMut};

pub use error::EncodeError;

/// Largest payload a short command frame can carry
pub const MAX_APDU_PAYLOAD: usize = 255;

/// Length of the `CLA | INS | P1 | P2 | Lc` header
pub const HEADER_LEN: usize = 5;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data, possibly empty
    pub data: Bytes,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Bytes::new(),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: data.into(),
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = data.into();
        self
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the serialized frame
    pub fn command_length(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// Serialize to raw APDU bytes
    ///
    /// The Lc byte is always written, even for an empty payload.
    pub fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        let len = self.data.len();
        if len > MAX_APDU_PAYLOAD {
            return Err(EncodeError::PayloadTooLarge { len });
        }

        let mut buffer = BytesMut::with_capacity(self.command_length());
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);
        buffer.put_u8(len as u8);
        buffer.put_slice(&self.data);

        Ok(buffer.freeze())
    }
}

/// Encode a command into its wire frame
pub fn encode(command: &Command) -> Result<Bytes, EncodeError> {
    command.to_bytes()
}
