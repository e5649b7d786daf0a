//! Transport traits for APDU communication with cards
//!
//! This module provides the abstraction every physical medium (PC/SC reader,
//! PN532 over I2C/SPI/UART, an emulator) implements. The protocol layer is
//! written once against [`CardTransport`].

pub mod error;
pub mod firmware;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

use firmware::FirmwareVersion;

/// What the reader currently sees in its field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardPresence {
    /// Nothing in the field
    None,
    /// A tag without an ISO 14443-4 layer; only its UID is readable
    SimpleTag(Bytes),
    /// A card able to exchange APDUs
    IsoDepCapable,
}

impl CardPresence {
    /// Whether APDUs can be exchanged with the detected card
    pub const fn is_iso_dep(&self) -> bool {
        matches!(self, Self::IsoDepCapable)
    }
}

/// Trait for basic card transports
///
/// A transport is responsible for sending and receiving raw APDU bytes.
/// It has no knowledge of command structure or protocol details.
pub trait CardTransport: Send + Sync + fmt::Debug {
    /// Send raw APDU bytes to card and return response bytes
    ///
    /// The exchange blocks until the card answers or the medium reports a
    /// failure. Implementations override [`CardTransport::do_transmit_raw`].
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = %e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Determine what kind of card, if any, is in the field
    fn detect_card(&mut self) -> CardPresence;

    /// Query the reader chip firmware, if the medium supports it
    fn firmware_version(&mut self) -> Result<FirmwareVersion, TransportError> {
        Err(TransportError::Unsupported("firmware version query"))
    }
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn detect_card(&mut self) -> CardPresence {
        (**self).detect_card()
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, TransportError> {
        (**self).firmware_version()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    /// Mock responses to return, in order
    pub(crate) responses: Vec<Result<Bytes, TransportError>>,
    /// Commands that were sent
    pub(crate) commands: Vec<Bytes>,
    /// Presence reported by detect_card
    pub(crate) presence: CardPresence,
}

#[cfg(test)]
impl MockTransport {
    pub(crate) fn new(responses: Vec<Result<Bytes, TransportError>>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            presence: CardPresence::IsoDepCapable,
        }
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::NoCard);
        }
        self.responses.remove(0)
    }

    fn detect_card(&mut self) -> CardPresence {
        self.presence.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_raw_records_and_replays() {
        let mut transport = MockTransport::new(vec![
            Ok(Bytes::from_static(&[0x90, 0x00])),
            Err(TransportError::CardRemoved),
        ]);

        let resp = transport.transmit_raw(&[0x00, 0xA4, 0x04, 0x00, 0x00]).unwrap();
        assert_eq!(resp.as_ref(), &[0x90, 0x00]);

        let err = transport.transmit_raw(&[0x80, 0xF8, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, TransportError::CardRemoved);

        assert_eq!(transport.commands.len(), 2);
    }

    #[test]
    fn test_default_firmware_is_unsupported() {
        let mut transport = MockTransport::new(vec![]);
        assert!(matches!(
            transport.firmware_version(),
            Err(TransportError::Unsupported(_))
        ));
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        let mut transport = MockTransport::new(vec![]);
        transport.presence = CardPresence::SimpleTag(Bytes::from_static(&[0x04, 0xA1]));

        fn detect<T: CardTransport>(mut transport: T) -> CardPresence {
            transport.detect_card()
        }

        let presence = detect(&mut transport);
        assert_eq!(
            presence,
            CardPresence::SimpleTag(Bytes::from_static(&[0x04, 0xA1]))
        );
        assert!(!presence.is_iso_dep());
    }
}
