//! Entropy for challenge nonces and ephemeral keys.

use std::fmt;

use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};

/// Source of cryptographically secure random bytes
///
/// Every cryptographic RNG from `rand` is a `RandomSource`, which lets tests
/// substitute a seeded `StdRng` for the system generator.
pub trait RandomSource {
    /// Fill every byte of `buffer` with fresh randomness
    fn fill(&mut self, buffer: &mut [u8]);
}

impl<R: RngCore + CryptoRng + ?Sized> RandomSource for R {
    fn fill(&mut self, buffer: &mut [u8]) {
        self.fill_bytes(buffer);
    }
}

/// Thread-local CSPRNG seeded from, and periodically reseeded by, the OS
#[derive(Clone, Default)]
pub struct SystemRandom(ThreadRng);

impl SystemRandom {
    /// Handle to the current thread's generator
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl fmt::Debug for SystemRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SystemRandom")
    }
}

impl RngCore for SystemRandom {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.0.fill_bytes(dst);
    }
}

impl CryptoRng for SystemRandom {}
