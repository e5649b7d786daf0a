/// Application identifier of the Cryptnox wallet applet
pub const CRYPTNOX_AID: &[u8] = b"\xA0\x00\x00\x10\x00\x01\x12";

/// Length of the certificate challenge nonce
pub const CHALLENGE_NONCE_LEN: usize = 8;

/// Pairing slot that authenticates with the PUK-derived pairing key
pub const PUK_FALLBACK_SLOT: u8 = 0xFF;

/// Number of SHA-256 applications when deriving a pairing key from a PUK
pub const PAIRING_KEY_ITERATIONS: usize = 32;

/// Attempts at sampling a valid P-256 scalar before giving up
pub const KEYGEN_ATTEMPTS: usize = 3;

/// SEC1 tag of an uncompressed curve point
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Length of an uncompressed P-256 public key (tag, X, Y)
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
