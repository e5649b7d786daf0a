//! Secure channel establishment with Cryptnox hardware wallet cards
//!
//! The handshake selects the wallet application, exchanges a certificate
//! challenge and sends a freshly generated P-256 public key to open a secure
//! channel. Everything runs over any [`CardTransport`](cryptnox_apdu_core::CardTransport).
//!
//! ```no_run
//! # fn run<T: cryptnox_apdu_core::CardTransport>(transport: T) -> cryptnox_wallet::Result<()> {
//! use cryptnox_wallet::{CardOutcome, CryptnoxWallet};
//!
//! let mut wallet = CryptnoxWallet::new(transport);
//! match wallet.process_card()? {
//!     CardOutcome::SecureChannel(handshake) => {
//!         println!("certificate: {} bytes", handshake.certificate.data.len());
//!     }
//!     CardOutcome::SimpleTag { uid } => println!("tag uid: {:02X?}", uid.as_ref()),
//!     CardOutcome::NoCard => println!("no card"),
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

mod application;
mod commands;
mod config;
mod constants;
mod crypto;
mod error;
mod random;
mod secure_channel;
mod session;
mod types;

pub use application::{CardOutcome, CryptnoxWallet};
pub use commands::*;
pub use config::HandshakeConfig;
pub use constants::*;
pub use crypto::{KeyGenError, KeyPair, derive_pairing_key};
pub use error::{Error, Result};
pub use random::{RandomSource, SystemRandom};
pub use secure_channel::{CardCertificate, ChannelOpened, Handshake, SecureChannel};
pub use session::{HandshakeState, HandshakeStep, Session};
pub use types::{PairingKey, PairingSlot};
