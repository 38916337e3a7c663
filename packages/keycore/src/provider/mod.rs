//! Cryptographic provider seam
//!
//! The core never performs primitive arithmetic itself. Everything it needs
//! from a backend is on [`CryptoProvider`], so a different backend (an HSM
//! binding, or a post-quantum suite) can be swapped in without touching the
//! `KeyStore` contract.

mod rust_crypto;

pub use rust_crypto::RustCryptoProvider;

use crate::Result;
use crate::algorithm::{EcCurve, Padding};
use crate::material::RawKeyPair;
use zeroize::Zeroizing;

/// Capabilities a backend must offer to the key core
///
/// Implementations translate every backend error into a [`crate::KeyError`].
/// `rsa_decrypt` must only ever fail with `KeyError::DecryptionFailure`.
pub trait CryptoProvider: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Cryptographically secure random bytes
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` if the random source is unavailable.
    fn random_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>>;

    /// Generate an RSA key pair with a modulus of `bits` bits
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` on backend or entropy failure.
    fn generate_rsa(&self, bits: u32) -> Result<RawKeyPair>;

    /// Generate an EC key pair on `curve`
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` on backend or entropy failure.
    fn generate_ec(&self, curve: EcCurve) -> Result<RawKeyPair>;

    /// Encrypt `plaintext` to the RSA public component
    ///
    /// # Errors
    ///
    /// Returns `ProviderFailure` if the public component cannot be used.
    fn rsa_encrypt(&self, public: &[u8], padding: Padding, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` with the RSA private component
    ///
    /// # Errors
    ///
    /// Returns `DecryptionFailure`, and nothing else, on any failure.
    fn rsa_decrypt(&self, private: &[u8], padding: Padding, ciphertext: &[u8]) -> Result<Vec<u8>>;
}
