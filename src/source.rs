//! Randomness sources.
//!
//! Two seams feed the engine: an [`IndexSource`] picks positions in a
//! character pool, a [`ByteSource`] supplies raw secure bytes. Sources are
//! built per call or handed in by the caller; nothing here is global.

use crate::error::{KeyGenError, Result};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::{OsRng, ThreadRng};
use rand::{Rng, RngCore};
use zeroize::Zeroizing;

const KEYSTREAM_BLOCK: usize = 1024;

/// Uniform index selection for pool sampling. Not required to be
/// cryptographically secure.
pub trait IndexSource {
    /// Returns a value in `0..bound`. Callers never pass a zero bound.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Secure random bytes.
pub trait ByteSource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// Thread-local PRNG from `rand`. The default index source.
#[derive(Debug, Clone, Default)]
pub struct ThreadRngSource(ThreadRng);

impl ThreadRngSource {
    pub fn new() -> Self {
        Self(rand::thread_rng())
    }
}

impl IndexSource for ThreadRngSource {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Operating system CSPRNG. The default byte source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngSource;

impl ByteSource for OsRngSource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| KeyGenError::EntropySource(e.to_string()))
    }
}

/// Deterministic ChaCha20 keystream keyed by a 32-byte seed.
///
/// The same seed always yields the same indices and bytes. Index selection
/// uses rejection sampling, so there is no modulo bias.
pub struct KeystreamSource {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamSource {
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut cipher = ChaCha20::new(seed.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; KEYSTREAM_BLOCK]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    fn refill(&mut self) {
        self.buffer.fill(0);
        self.cipher.apply_keystream(&mut self.buffer);
        self.pos = 0;
    }

    fn next_byte(&mut self) -> u8 {
        if self.pos >= self.buffer.len() {
            self.refill();
        }

        let byte = self.buffer[self.pos];
        self.pos += 1;
        byte
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        for b in bytes.iter_mut() {
            *b = self.next_byte();
        }
        u64::from_le_bytes(bytes)
    }
}

impl IndexSource for KeystreamSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        let rejection_threshold = (u64::MAX / bound) * bound;

        loop {
            let value = self.next_u64();
            if value < rejection_threshold {
                return (value % bound) as usize;
            }
        }
    }
}

impl ByteSource for KeystreamSource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
        Ok(())
    }
}

impl std::fmt::Debug for KeystreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystreamSource")
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}
