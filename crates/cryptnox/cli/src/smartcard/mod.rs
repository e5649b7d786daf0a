//! PC/SC reader transport

mod config;
mod transport;

pub(crate) use config::{PcscConfig, ShareMode};
pub(crate) use transport::{PcscTransport, list_readers};
