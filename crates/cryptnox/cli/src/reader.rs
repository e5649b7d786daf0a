//! Reader-level frames that never reach the card applet

use cryptnox_apdu_core::{FirmwareVersion, Response, StatusWord, TransportError};

/// PC/SC GET DATA pseudo APDU returning the UID of the card in the field
pub(crate) const GET_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// ACR122-style direct transmit wrapping the PN532 `GetFirmwareVersion` frame
pub(crate) const GET_FIRMWARE_VERSION: [u8; 7] = [0xFF, 0x00, 0x00, 0x00, 0x02, 0xD4, 0x02];

/// Registered application provider identifier of PC/SC part 3
const PCSC_RID: [u8; 5] = [0xA0, 0x00, 0x00, 0x03, 0x06];

/// Whether `atr` is the synthetic ATR a PC/SC reader builds for a storage card
///
/// Such cards (MIFARE Classic, Ultralight, NTAG, FeliCa) have no ISO 14443-4
/// layer and cannot run the wallet applet. The layout is
/// `3B 8n 80 01 80 4F len RID(5) standard name(2) ...`.
pub(crate) fn is_storage_card_atr(atr: &[u8]) -> bool {
    atr.len() >= 12
        && atr[0] == 0x3B
        && atr[1] & 0xF0 == 0x80
        && atr[2..5] == [0x80, 0x01, 0x80]
        && atr[5] == 0x4F
        && atr[7..12] == PCSC_RID
}

/// Payload of a successful UID read
pub(crate) fn parse_uid(raw: &[u8]) -> Result<Vec<u8>, TransportError> {
    let response = Response::from_bytes(raw).map_err(|_| TransportError::MalformedResponse {
        len: raw.len(),
    })?;
    match response.into_payload() {
        Ok(uid) if !uid.is_empty() => Ok(uid.to_vec()),
        Ok(_) => Err(TransportError::reader("empty UID")),
        Err(e) => Err(TransportError::reader(e)),
    }
}

/// Decode `D5 03 IC Ver Rev Support` followed by `90 00`
pub(crate) fn parse_firmware_response(raw: &[u8]) -> Result<FirmwareVersion, TransportError> {
    let response = Response::from_bytes(raw).map_err(|_| TransportError::MalformedResponse {
        len: raw.len(),
    })?;
    if response.status() != StatusWord::new(0x90, 0x00) {
        return Err(TransportError::reader(format!(
            "firmware query rejected with {}",
            response.status()
        )));
    }

    match response.payload().as_ref() {
        [0xD5, 0x03, ic, major, minor, flags] => {
            Ok(FirmwareVersion::from_bytes([*ic, *major, *minor, *flags]))
        }
        other => Err(TransportError::MalformedResponse { len: other.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_card_atr() {
        // MIFARE Classic 1K behind an ACR122U
        let classic = hex::decode("3B8F8001804F0CA000000306030001000000006A").unwrap();
        assert!(is_storage_card_atr(&classic));

        // NTAG213 / Ultralight
        let ultralight = hex::decode("3B8F8001804F0CA0000003060300030000000068").unwrap();
        assert!(is_storage_card_atr(&ultralight));
    }

    #[test]
    fn test_iso_dep_atr() {
        // Generic ISO 14443-4 card reported by a contactless reader
        let iso_dep = hex::decode("3B8880010000000000718100F9").unwrap();
        assert!(!is_storage_card_atr(&iso_dep));
        assert!(!is_storage_card_atr(&[0x3B]));
        assert!(!is_storage_card_atr(&[]));
    }

    #[test]
    fn test_parse_uid() {
        assert_eq!(
            parse_uid(&[0x04, 0xA2, 0x3B, 0x11, 0x90, 0x00]).unwrap(),
            vec![0x04, 0xA2, 0x3B, 0x11]
        );
        assert!(parse_uid(&[0x63, 0x00]).is_err());
        assert!(parse_uid(&[0x90, 0x00]).is_err());
        assert!(matches!(
            parse_uid(&[0x90]),
            Err(TransportError::MalformedResponse { len: 1 })
        ));
    }

    #[test]
    fn test_parse_firmware_response() {
        let firmware =
            parse_firmware_response(&[0xD5, 0x03, 0x32, 0x01, 0x06, 0x07, 0x90, 0x00]).unwrap();
        assert!(firmware.is_pn532());
        assert_eq!(firmware.to_u32(), 0x3201_0607);

        assert!(parse_firmware_response(&[0xD5, 0x03, 0x32, 0x90, 0x00]).is_err());
        assert!(parse_firmware_response(&[0x6A, 0x81]).is_err());
    }
}
