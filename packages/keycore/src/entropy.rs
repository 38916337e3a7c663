//! Random byte source backing key generation, handles and padding
//!
//! The default source reseeds a ChaCha-based generator from the operating
//! system for every request. The seeded source replays a fixed stream and
//! exists for deterministic tests only.

use crate::{KeyError, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use zeroize::Zeroizing;

/// Cryptographically secure random source
pub enum EntropySource {
    /// Fresh OS-seeded generator per request
    Os,
    /// Single generator replaying the stream of a fixed seed
    Seeded(Mutex<StdRng>),
}

impl EntropySource {
    /// OS-backed source
    #[must_use]
    pub fn os() -> Self {
        Self::Os
    }

    /// Deterministic source for reproducible test vectors.
    ///
    /// Never use outside tests: every key and padding block derived from it
    /// is predictable from the seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    /// Whether this source replays a fixed seed
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }

    /// Run `f` with exclusive access to a secure generator
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` if the operating system refuses to
    /// provide seed material.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T> {
        match self {
            Self::Os => {
                let mut rng = StdRng::try_from_os_rng().map_err(|e| {
                    KeyError::generation(format!("system random source unavailable: {e}"))
                })?;
                Ok(f(&mut rng))
            }
            Self::Seeded(rng) => {
                let mut guard = rng.lock();
                Ok(f(&mut guard))
            }
        }
    }

    /// Generate `len` random bytes, wiped when dropped
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` if the random source is unavailable.
    pub fn generate_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        self.with_rng(|rng| rng.fill_bytes(&mut bytes))?;
        Ok(bytes)
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::os()
    }
}

impl std::fmt::Debug for EntropySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Os => f.write_str("EntropySource::Os"),
            Self::Seeded(_) => f.write_str("EntropySource::Seeded"),
        }
    }
}
