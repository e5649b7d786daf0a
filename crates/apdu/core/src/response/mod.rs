//! APDU response definitions
//!
//! This module provides the decoded form of a response frame according to
//! ISO/IEC 7816-4: everything before the trailing status word is payload.

pub mod error;
pub mod status;

use bytes::Bytes;
use tracing::trace;

use error::{DecodeError, StatusError};
use status::StatusWord;

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data (possibly empty)
    payload: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
        }
    }

    /// Create a success response
    pub const fn success(payload: Bytes) -> Self {
        Self {
            payload,
            status: status::common::SUCCESS,
        }
    }

    /// Create an error response from a status word
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self {
            payload: Bytes::new(),
            status: status.into(),
        }
    }

    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let len = data.len();
        if len < 2 {
            return Err(DecodeError::TooShort { len });
        }

        let status = StatusWord::new(data[len - 2], data[len - 1]);
        let payload = Bytes::copy_from_slice(&data[..len - 2]);

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.len(),
            "Parsed APDU response"
        );

        Ok(Self { payload, status })
    }

    /// Get the response payload data
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Get the status word as a tuple (SW1, SW2)
    pub const fn status_tuple(&self) -> (u8, u8) {
        (self.status.sw1, self.status.sw2)
    }

    /// Check if the response carries the success status word
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Return the payload if the status word equals `expected`
    pub fn expect_status(self, expected: StatusWord) -> Result<Bytes, StatusError> {
        if self.status == expected {
            Ok(self.payload)
        } else {
            Err(StatusError::Unexpected(self.status))
        }
    }

    /// Return the payload of a `90 00` response
    pub fn into_payload(self) -> Result<Bytes, StatusError> {
        self.expect_status(status::common::SUCCESS)
    }
}

/// Decode a raw response frame
pub fn decode(raw: &[u8]) -> Result<Response, DecodeError> {
    Response::from_bytes(raw)
}
