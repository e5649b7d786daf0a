use std::ffi::{CStr, CString};
use std::fmt;

use cryptnox_apdu_core::{Bytes, CardPresence, CardTransport, FirmwareVersion, TransportError};
use pcsc::{Attribute, Card, Context, Disposition, Protocols, Scope, ShareMode, State};
use tracing::{debug, info};

use super::config::PcscConfig;
use crate::reader::{
    GET_FIRMWARE_VERSION, GET_UID, is_storage_card_atr, parse_firmware_response, parse_uid,
};

/// Control code of the CCID escape command used to talk to the reader chip
const IOCTL_CCID_ESCAPE: u32 = 3500;

/// Largest response of a short APDU plus status word
const RESPONSE_BUFFER_LEN: usize = 258;

fn map_pcsc_error(error: pcsc::Error) -> TransportError {
    match error {
        pcsc::Error::NoSmartcard => TransportError::NoCard,
        pcsc::Error::RemovedCard | pcsc::Error::ResetCard => TransportError::CardRemoved,
        pcsc::Error::Timeout => TransportError::Timeout,
        other => TransportError::reader(other),
    }
}

/// Reader name and whether a card sits on it
pub(crate) fn list_readers() -> Result<Vec<(String, bool)>, TransportError> {
    let context = Context::establish(Scope::User).map_err(map_pcsc_error)?;
    let readers = context.list_readers_owned().map_err(map_pcsc_error)?;

    let mut states: Vec<_> = readers
        .iter()
        .map(|name| pcsc::ReaderState::new(name.as_c_str(), State::UNAWARE))
        .collect();
    if !states.is_empty() {
        context
            .get_status_change(None, &mut states)
            .map_err(map_pcsc_error)?;
    }

    Ok(states
        .iter()
        .map(|state| {
            (
                state.name().to_string_lossy().into_owned(),
                state.event_state().contains(State::PRESENT),
            )
        })
        .collect())
}

/// Transport over a PC/SC contactless reader
pub(crate) struct PcscTransport {
    context: Context,
    reader_name: CString,
    config: PcscConfig,
    card: Option<Card>,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Open the configured reader, or the first reader holding a card
    pub(crate) fn open(config: PcscConfig) -> Result<Self, TransportError> {
        let context = Context::establish(Scope::User).map_err(map_pcsc_error)?;

        let reader_name = match &config.reader {
            Some(name) => CString::new(name.as_str())
                .map_err(|_| TransportError::reader(format!("invalid reader name: {name}")))?,
            None => {
                let readers = list_readers()?;
                let (name, _) = readers
                    .into_iter()
                    .find(|(_, has_card)| *has_card)
                    .ok_or(TransportError::NoCard)?;
                CString::new(name).map_err(TransportError::reader)?
            }
        };
        info!(reader = %reader_name.to_string_lossy(), "Using reader");

        Ok(Self {
            context,
            reader_name,
            config,
            card: None,
        })
    }

    /// Name of the reader in use
    pub(crate) fn reader_name(&self) -> &CStr {
        &self.reader_name
    }

    fn connect_card(&mut self) -> Result<&Card, TransportError> {
        if self.card.is_none() {
            let card = self
                .context
                .connect(
                    &self.reader_name,
                    self.config.share_mode.into(),
                    self.config.protocols,
                )
                .map_err(map_pcsc_error)?;
            self.card = Some(card);
        }
        self.card.as_ref().ok_or(TransportError::NoCard)
    }

    fn atr(&mut self) -> Result<Vec<u8>, TransportError> {
        self.connect_card()?
            .get_attribute_owned(Attribute::AtrString)
            .map_err(map_pcsc_error)
    }

    /// Query the reader chip directly when no card is in the field
    fn escape(&self, command: &[u8]) -> Result<Bytes, TransportError> {
        let reader = self
            .context
            .connect(&self.reader_name, ShareMode::Direct, Protocols::UNDEFINED)
            .map_err(map_pcsc_error)?;

        let mut buffer = [0u8; RESPONSE_BUFFER_LEN];
        let response = reader
            .control(pcsc::ctl_code(IOCTL_CCID_ESCAPE.into()), command, &mut buffer)
            .map(Bytes::copy_from_slice)
            .map_err(map_pcsc_error);
        let _ = reader.disconnect(Disposition::LeaveCard);
        response
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        let mut buffer = [0u8; RESPONSE_BUFFER_LEN];
        let result = self
            .connect_card()?
            .transmit(command, &mut buffer)
            .map(Bytes::copy_from_slice)
            .map_err(map_pcsc_error);

        if matches!(result, Err(TransportError::CardRemoved)) {
            self.card = None;
        }
        result
    }

    fn detect_card(&mut self) -> CardPresence {
        let atr = match self.atr() {
            Ok(atr) => atr,
            Err(e) => {
                debug!(error = %e, "No card detected");
                self.card = None;
                return CardPresence::None;
            }
        };
        debug!(atr = %hex::encode(&atr), "Card detected");

        if !is_storage_card_atr(&atr) {
            return CardPresence::IsoDepCapable;
        }

        match self.transmit_raw(&GET_UID).and_then(|raw| parse_uid(&raw)) {
            Ok(uid) => CardPresence::SimpleTag(Bytes::from(uid)),
            Err(e) => {
                debug!(error = %e, "Failed to read tag UID");
                CardPresence::None
            }
        }
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, TransportError> {
        let raw = match self.transmit_raw(&GET_FIRMWARE_VERSION) {
            Ok(raw) => raw,
            Err(TransportError::NoCard) => self.escape(&GET_FIRMWARE_VERSION)?,
            Err(e) => return Err(e),
        };
        parse_firmware_response(&raw)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
