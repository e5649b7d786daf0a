//! Secure channel handshake driver
//!
//! [`SecureChannel`] borrows a transport and a random source for one attempt
//! and walks the [`Session`] through SELECT, GET CARD CERTIFICATE and OPEN
//! SECURE CHANNEL. Every step performs exactly one exchange. Any failure
//! leaves the session in [`HandshakeState::Failed`]; a retry needs a new
//! `SecureChannel`.

use bytes::Bytes;
use cryptnox_apdu_core::{CardTransport, Response, StatusWord};
use tracing::{Level, debug, info, warn};

use crate::Result;
use crate::commands::{
    CardCommand, GetCardCertificateCommand, OpenSecureChannelCommand, SelectCommand, SelectOk,
};
use crate::config::HandshakeConfig;
use crate::constants::{CHALLENGE_NONCE_LEN, UNCOMPRESSED_PUBLIC_KEY_LEN};
use crate::crypto::KeyPair;
use crate::random::RandomSource;
use crate::session::{HandshakeState, HandshakeStep, Session};
use crate::types::PairingSlot;

/// Answer to the certificate challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCertificate {
    /// Nonce sent to the card
    pub nonce: [u8; CHALLENGE_NONCE_LEN],
    /// Certificate material returned by the card
    pub data: Bytes,
}

/// Result of a successful OPEN SECURE CHANNEL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOpened {
    /// Slot the channel was opened on
    pub pairing_slot: PairingSlot,
    /// Host ephemeral public key sent to the card
    pub host_public_key: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
    /// Card ephemeral contribution and authentication material, uninterpreted
    pub card_response: Bytes,
}

/// Everything learned during a completed handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// Response to SELECT
    pub select_response: SelectOk,
    /// Certificate challenge and answer
    pub certificate: CardCertificate,
    /// Channel parameters
    pub channel: ChannelOpened,
}

/// One handshake attempt over a borrowed transport
pub struct SecureChannel<'a, T: CardTransport + ?Sized, R: RandomSource + ?Sized> {
    transport: &'a mut T,
    rng: &'a mut R,
    config: HandshakeConfig,
    session: Session,
}

impl<T: CardTransport + ?Sized, R: RandomSource + ?Sized> std::fmt::Debug
    for SecureChannel<'_, T, R>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureChannel")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<'a, T: CardTransport + ?Sized, R: RandomSource + ?Sized> SecureChannel<'a, T, R> {
    /// Start an attempt in the idle state
    pub fn new(transport: &'a mut T, rng: &'a mut R, config: HandshakeConfig) -> Self {
        Self {
            transport,
            rng,
            config,
            session: Session::new(),
        }
    }

    /// Session of this attempt
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current state of this attempt
    pub const fn state(&self) -> HandshakeState {
        self.session.state()
    }

    /// Select the wallet application: `Idle → Selected`
    pub fn select(&mut self) -> Result<SelectOk> {
        let command = SelectCommand::with_aid(self.config.aid.clone());
        self.run(&command)
    }

    /// Send a fresh certificate challenge: `Selected → CertificateRequested`
    pub fn request_certificate(&mut self) -> Result<CardCertificate> {
        let step = HandshakeStep::RequestCertificate;
        self.session.ensure_ready(step)?;

        let mut nonce = [0u8; CHALLENGE_NONCE_LEN];
        self.rng.fill(&mut nonce);
        debug!(nonce = %hex::encode(nonce), "Generated certificate challenge");

        let command = GetCardCertificateCommand::with_nonce(nonce);
        let ok = self.run(&command)?;
        Ok(CardCertificate {
            nonce,
            data: ok.certificate,
        })
    }

    /// Send a fresh ephemeral public key: `CertificateRequested → ChannelOpen`
    ///
    /// The private scalar is wiped before this returns, whatever the outcome.
    pub fn open(&mut self) -> Result<ChannelOpened> {
        let step = HandshakeStep::OpenSecureChannel;
        self.session.ensure_ready(step)?;

        let key_pair = match KeyPair::generate(&mut *self.rng) {
            Ok(key_pair) => key_pair,
            Err(e) => {
                warn!(error = %e, "Ephemeral key generation failed");
                self.session.fail(step);
                return Err(e.into());
            }
        };
        let host_public_key = self.session.hold_ephemeral(key_pair).uncompressed_public_key();

        let pairing_slot = self.config.pairing_slot;
        let command =
            OpenSecureChannelCommand::with_pairing_slot_and_key(pairing_slot, &host_public_key);
        let result = self.run(&command);
        self.session.discard_ephemeral();

        Ok(ChannelOpened {
            pairing_slot,
            host_public_key,
            card_response: result?.payload,
        })
    }

    /// Run all three steps in order
    ///
    /// Errors are wrapped with the step they aborted.
    pub fn establish(&mut self) -> Result<Handshake> {
        let select_response = self
            .select()
            .map_err(|e| e.at_step(HandshakeStep::Select))?;
        let certificate = self
            .request_certificate()
            .map_err(|e| e.at_step(HandshakeStep::RequestCertificate))?;
        let channel = self
            .open()
            .map_err(|e| e.at_step(HandshakeStep::OpenSecureChannel))?;

        Ok(Handshake {
            select_response,
            certificate,
            channel,
        })
    }

    /// Perform the exchange for `command` and advance or fail the session
    fn run<C: CardCommand>(&mut self, command: &C) -> Result<C::Ok> {
        let step = C::STEP;
        self.session.ensure_ready(step)?;
        debug!(%step, "Running handshake step");

        match self.exchange(command) {
            Ok(ok) => {
                self.session.complete(step);
                Ok(ok)
            }
            Err(e) => {
                self.session.fail(step);
                Err(e)
            }
        }
    }

    fn exchange<C: CardCommand>(&mut self, command: &C) -> Result<C::Ok> {
        let frame = command.to_command().to_bytes()?;
        let raw = self.transport.transmit_raw(&frame)?;
        let response = Response::from_bytes(&raw)?;

        if !response.is_success() {
            log_status(C::STEP, response.status());
        }
        C::parse_response(response)
    }
}

fn log_status(step: HandshakeStep, status: StatusWord) {
    let level = status.tracing_level();
    let description = status.description();
    if level == Level::WARN {
        warn!(%step, %status, description, "Card rejected command");
    } else if level == Level::INFO {
        info!(%step, %status, description, "Card returned warning");
    } else {
        debug!(%step, %status, description, "Card returned status");
    }
}
