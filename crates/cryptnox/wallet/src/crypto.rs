use std::fmt;

use p256::SecretKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::{
    KEYGEN_ATTEMPTS, PAIRING_KEY_ITERATIONS, UNCOMPRESSED_POINT_TAG, UNCOMPRESSED_PUBLIC_KEY_LEN,
};
use crate::random::RandomSource;

/// Key generation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyGenError {
    /// Every sampled scalar was rejected by the curve
    #[error("Entropy failure: no valid P-256 scalar after {} attempts", KEYGEN_ATTEMPTS)]
    EntropyFailure,
}

/// Ephemeral NIST P-256 key pair
///
/// The private scalar is wiped when the key pair is dropped or explicitly
/// zeroized. It never appears in `Debug` output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    private_scalar: [u8; 32],
    public_point: [u8; 64],
}

impl KeyPair {
    /// Generate a key pair using `rng` as the only entropy input.
    ///
    /// Scalars outside `[1, n)` are redrawn, at most [`KEYGEN_ATTEMPTS`] times.
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Self, KeyGenError> {
        for attempt in 1..=KEYGEN_ATTEMPTS {
            let mut scalar = Zeroizing::new([0u8; 32]);
            rng.fill(scalar.as_mut_slice());

            let Ok(secret) = SecretKey::from_slice(scalar.as_slice()) else {
                debug!(attempt, "Sampled scalar rejected by curve");
                continue;
            };

            let point = secret.public_key().to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                debug!(attempt, "Public point has no affine coordinates");
                continue;
            };

            let mut public_point = [0u8; 64];
            public_point[..32].copy_from_slice(x);
            public_point[32..].copy_from_slice(y);

            return Ok(Self {
                private_scalar: *scalar,
                public_point,
            });
        }

        Err(KeyGenError::EntropyFailure)
    }

    /// Private scalar, big-endian
    pub const fn private_scalar(&self) -> &[u8; 32] {
        &self.private_scalar
    }

    /// Public point as `X ‖ Y`
    pub const fn public_point(&self) -> &[u8; 64] {
        &self.public_point
    }

    /// SEC1 uncompressed public key: `0x04 ‖ X ‖ Y`
    pub fn uncompressed_public_key(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let mut encoded = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        encoded[0] = UNCOMPRESSED_POINT_TAG;
        encoded[1..].copy_from_slice(&self.public_point);
        encoded
    }

    /// Whether the private scalar has been wiped
    pub fn is_cleared(&self) -> bool {
        self.private_scalar.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_point", &hex::encode(self.public_point))
            .finish_non_exhaustive()
    }
}

/// Derive the fallback pairing key from a PUK.
///
/// SHA-256 is applied to the PUK and then to its own output, for
/// [`PAIRING_KEY_ITERATIONS`] applications in total. Every intermediate
/// digest is wiped, as is the returned key once dropped.
pub fn derive_pairing_key(puk: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut digest = Zeroizing::new(<[u8; 32]>::from(Sha256::digest(puk)));
    for _ in 1..PAIRING_KEY_ITERATIONS {
        let next = Zeroizing::new(<[u8; 32]>::from(Sha256::digest(digest.as_slice())));
        digest = next;
    }
    digest
}
