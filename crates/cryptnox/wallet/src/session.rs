//! Per-attempt handshake state.
//!
//! A [`Session`] lives for exactly one handshake attempt. It records how far
//! the attempt got and briefly owns the host's ephemeral key pair while the
//! OPEN SECURE CHANNEL exchange is in flight.

use derive_more::Display;
use tracing::trace;
use zeroize::Zeroize;

use crate::crypto::KeyPair;

/// Position in the secure channel state machine
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeState {
    /// Nothing sent yet
    #[display("idle")]
    Idle,
    /// Wallet application selected
    #[display("selected")]
    Selected,
    /// Certificate challenge answered
    #[display("certificate requested")]
    CertificateRequested,
    /// Card accepted the host public key
    #[display("channel open")]
    ChannelOpen,
    /// A step failed; the session accepts no further steps
    #[display("failed")]
    Failed,
}

/// Transition of the state machine; each performs one transport exchange
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeStep {
    /// `Idle → Selected`
    #[display("SELECT")]
    Select,
    /// `Selected → CertificateRequested`
    #[display("GET CARD CERTIFICATE")]
    RequestCertificate,
    /// `CertificateRequested → ChannelOpen`
    #[display("OPEN SECURE CHANNEL")]
    OpenSecureChannel,
}

impl HandshakeStep {
    /// State the session must be in before this step
    pub const fn required_state(&self) -> HandshakeState {
        match self {
            Self::Select => HandshakeState::Idle,
            Self::RequestCertificate => HandshakeState::Selected,
            Self::OpenSecureChannel => HandshakeState::CertificateRequested,
        }
    }

    /// State reached when this step succeeds
    pub const fn target_state(&self) -> HandshakeState {
        match self {
            Self::Select => HandshakeState::Selected,
            Self::RequestCertificate => HandshakeState::CertificateRequested,
            Self::OpenSecureChannel => HandshakeState::ChannelOpen,
        }
    }
}

/// Transient state of one handshake attempt
#[derive(Debug)]
pub struct Session {
    state: HandshakeState,
    selected: bool,
    certificate_challenge_sent: bool,
    channel_open: bool,
    failed_step: Option<HandshakeStep>,
    ephemeral: Option<KeyPair>,
    ephemeral_wiped: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session in the idle state
    pub const fn new() -> Self {
        Self {
            state: HandshakeState::Idle,
            selected: false,
            certificate_challenge_sent: false,
            channel_open: false,
            failed_step: None,
            ephemeral: None,
            ephemeral_wiped: false,
        }
    }

    /// Current state
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// Whether SELECT succeeded
    pub const fn selected(&self) -> bool {
        self.selected
    }

    /// Whether the certificate challenge was answered
    pub const fn certificate_challenge_sent(&self) -> bool {
        self.certificate_challenge_sent
    }

    /// Whether the card accepted the host public key
    pub const fn channel_open(&self) -> bool {
        self.channel_open
    }

    /// Step that moved the session to [`HandshakeState::Failed`]
    pub const fn failed_step(&self) -> Option<HandshakeStep> {
        self.failed_step
    }

    /// Whether any key material is still held by the session
    pub const fn holds_secrets(&self) -> bool {
        self.ephemeral.is_some()
    }

    /// Whether the last ephemeral key released by this session had its
    /// private scalar zeroed
    pub const fn ephemeral_wiped(&self) -> bool {
        self.ephemeral_wiped
    }

    /// Check that `step` may run now
    pub(crate) fn ensure_ready(&self, step: HandshakeStep) -> crate::Result<()> {
        if self.state == step.required_state() {
            Ok(())
        } else {
            Err(crate::Error::InvalidState {
                step,
                state: self.state,
            })
        }
    }

    /// Record a successful step
    pub(crate) fn complete(&mut self, step: HandshakeStep) {
        match step {
            HandshakeStep::Select => self.selected = true,
            HandshakeStep::RequestCertificate => self.certificate_challenge_sent = true,
            HandshakeStep::OpenSecureChannel => self.channel_open = true,
        }
        self.state = step.target_state();
        trace!(state = %self.state, "Handshake advanced");
    }

    /// Record a failed step; secrets are wiped immediately
    pub(crate) fn fail(&mut self, step: HandshakeStep) {
        self.discard_ephemeral();
        self.failed_step = Some(step);
        self.state = HandshakeState::Failed;
    }

    /// Take ownership of the ephemeral key pair for the duration of an exchange
    pub(crate) fn hold_ephemeral(&mut self, key_pair: KeyPair) -> &KeyPair {
        self.discard_ephemeral();
        self.ephemeral_wiped = false;
        self.ephemeral.insert(key_pair)
    }

    /// Zeroize and drop the ephemeral key pair
    pub(crate) fn discard_ephemeral(&mut self) {
        if let Some(mut key_pair) = self.ephemeral.take() {
            key_pair.zeroize();
            self.ephemeral_wiped = key_pair.is_cleared();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.discard_ephemeral();
    }
}
