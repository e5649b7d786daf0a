//! Cryptnox card processing
//!
//! [`CryptnoxWallet`] owns a transport and a random source. For each card
//! presented it decides whether to report a tag UID or to run the secure
//! channel handshake.

use bytes::Bytes;
use cryptnox_apdu_core::{CardPresence, CardTransport, FirmwareVersion};
use tracing::{debug, info};

use crate::Result;
use crate::config::HandshakeConfig;
use crate::random::{RandomSource, SystemRandom};
use crate::secure_channel::{Handshake, SecureChannel};

/// What happened to the card currently in the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    /// The field was empty
    NoCard,
    /// A simple tag was read; no APDUs were sent
    SimpleTag {
        /// Tag UID
        uid: Bytes,
    },
    /// An ISO-DEP card completed the handshake
    SecureChannel(Handshake),
}

/// Host side of the Cryptnox wallet protocol
#[derive(Debug)]
pub struct CryptnoxWallet<T: CardTransport, R: RandomSource = SystemRandom> {
    transport: T,
    rng: R,
    config: HandshakeConfig,
}

impl<T: CardTransport> CryptnoxWallet<T> {
    /// Use the system random generator and default configuration
    pub fn new(transport: T) -> Self {
        Self::with_rng(transport, SystemRandom::new())
    }
}

impl<T: CardTransport, R: RandomSource> CryptnoxWallet<T, R> {
    /// Use an explicit random source
    pub fn with_rng(transport: T, rng: R) -> Self {
        Self {
            transport,
            rng,
            config: HandshakeConfig::default(),
        }
    }

    /// Replace the handshake configuration
    pub fn with_config(mut self, config: HandshakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Handshake configuration in use
    pub const fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// Begin a fresh handshake attempt for step-by-step control
    pub fn secure_channel(&mut self) -> SecureChannel<'_, T, R> {
        SecureChannel::new(&mut self.transport, &mut self.rng, self.config.clone())
    }

    /// Run a complete handshake with whatever card is present
    pub fn open_secure_channel(&mut self) -> Result<Handshake> {
        self.secure_channel().establish()
    }

    /// Detect the card and either read its UID or run the handshake
    pub fn process_card(&mut self) -> Result<CardOutcome> {
        match self.transport.detect_card() {
            CardPresence::None => {
                debug!("No card in field");
                Ok(CardOutcome::NoCard)
            }
            CardPresence::SimpleTag(uid) => {
                info!(uid = %hex::encode(&uid), "Simple tag detected");
                Ok(CardOutcome::SimpleTag { uid })
            }
            CardPresence::IsoDepCapable => {
                info!("ISO-DEP card detected, opening secure channel");
                let handshake = self.open_secure_channel()?;
                info!(
                    certificate_len = handshake.certificate.data.len(),
                    slot = %handshake.channel.pairing_slot,
                    "Secure channel opened"
                );
                Ok(CardOutcome::SecureChannel(handshake))
            }
        }
    }

    /// Reader firmware, if the transport can report it
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion> {
        Ok(self.transport.firmware_version()?)
    }

    /// Borrow the transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }
}
