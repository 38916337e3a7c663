//! RSA encryption and decryption over owned key material

use crate::algorithm::{KeyAlgorithm, Padding};
use crate::material::KeyMaterial;
use crate::provider::CryptoProvider;
use crate::{KeyError, Result};
use std::sync::Arc;

/// Encrypts and decrypts with RSA [`KeyMaterial`]
///
/// Only lengths are ever logged, never payload or key bytes.
pub struct CipherEngine<P> {
    provider: Arc<P>,
}

impl<P: CryptoProvider> CipherEngine<P> {
    /// Create an engine delegating primitives to `provider`
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Largest plaintext `material` can encrypt under `padding`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` for non-RSA material.
    pub fn max_plaintext_len(&self, material: &KeyMaterial, padding: Padding) -> Result<usize> {
        let modulus_len = rsa_modulus_len(material, "encrypt")?;
        Ok(padding.max_plaintext_len(modulus_len))
    }

    /// Encrypt `plaintext` to the public half of `material`
    ///
    /// The ciphertext is exactly one modulus long. OAEP output is randomized;
    /// PKCS#1 v1.5 output is reproducible only under a seeded provider.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` for EC material, `PayloadTooLarge` if
    /// the plaintext exceeds capacity, and `ProviderFailure` if the provider
    /// rejects the request.
    pub fn encrypt(
        &self,
        material: &KeyMaterial,
        padding: Padding,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let modulus_len = rsa_modulus_len(material, "encrypt")?;
        let max = padding.max_plaintext_len(modulus_len);
        if plaintext.len() > max {
            return Err(KeyError::PayloadTooLarge {
                len: plaintext.len(),
                max,
            });
        }

        let ciphertext = self
            .provider
            .rsa_encrypt(material.public_component(), padding, plaintext)?;
        if ciphertext.len() != modulus_len {
            return Err(KeyError::provider(format!(
                "provider returned {} ciphertext bytes for a {modulus_len}-byte modulus",
                ciphertext.len()
            )));
        }

        tracing::debug!(%padding, plaintext_len = plaintext.len(), "encrypted payload");
        Ok(ciphertext)
    }

    /// Decrypt `ciphertext` with the private half of `material`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` for EC material. Every other failure,
    /// including a ciphertext of the wrong length, is the opaque
    /// `DecryptionFailure`.
    pub fn decrypt(
        &self,
        material: &KeyMaterial,
        padding: Padding,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        let modulus_len = rsa_modulus_len(material, "decrypt")?;
        if ciphertext.len() != modulus_len {
            return Err(KeyError::DecryptionFailure);
        }

        let plaintext = self
            .provider
            .rsa_decrypt(material.private_component(), padding, ciphertext)
            .map_err(|_| KeyError::DecryptionFailure)?;

        tracing::debug!(%padding, ciphertext_len = ciphertext.len(), "decrypted payload");
        Ok(plaintext)
    }
}

fn rsa_modulus_len(material: &KeyMaterial, operation: &'static str) -> Result<usize> {
    match (material.algorithm(), material.modulus_len()) {
        (KeyAlgorithm::Rsa, Some(len)) => Ok(len),
        (algorithm, _) => Err(KeyError::UnsupportedOperation {
            algorithm,
            operation,
        }),
    }
}
