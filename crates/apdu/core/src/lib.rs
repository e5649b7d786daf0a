//! Core types for talking APDU (Application Protocol Data Unit) to Cryptnox cards
//!
//! This crate provides the wire-level building blocks used by the secure channel
//! handshake according to ISO/IEC 7816-4:
//!
//! - Encoding short command frames (`CLA | INS | P1 | P2 | Lc | data`)
//! - Decoding response frames (`data | SW1 | SW2`) and comparing status words
//! - The [`CardTransport`] trait every physical medium implements
//! - Card presence classification and reader firmware information
//!
//! Everything here is synchronous and free of protocol state.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

pub mod command;
pub mod response;
pub mod transport;

pub use command::{Command, EncodeError, MAX_APDU_PAYLOAD, encode};
pub use response::error::{DecodeError, StatusError};
pub use response::status::{StatusWord, status_ok};
pub use response::{Response, decode};
pub use transport::firmware::{FirmwareFeatures, FirmwareVersion};
pub use transport::{CardPresence, CardTransport, TransportError};
