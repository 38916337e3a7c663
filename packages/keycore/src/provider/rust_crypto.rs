//! Pure-Rust provider built on the RustCrypto `rsa`, `p256` and `p384` crates

use super::CryptoProvider;
use crate::algorithm::{EcCurve, Padding};
use crate::entropy::EntropySource;
use crate::material::RawKeyPair;
use crate::{KeyError, Result};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::sha2::Sha256;
use rsa::traits::{RandomizedDecryptor, RandomizedEncryptor};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

/// Attempts at drawing a valid EC scalar before giving up.
///
/// A uniformly random candidate is out of range with probability below
/// 2^-32 for both supported curves.
const EC_SCALAR_ATTEMPTS: usize = 8;

/// Default provider backed by RustCrypto implementations
#[derive(Debug, Default)]
pub struct RustCryptoProvider {
    entropy: EntropySource,
}

impl RustCryptoProvider {
    /// Provider drawing randomness from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self {
            entropy: EntropySource::os(),
        }
    }

    /// Provider replaying a fixed random stream.
    ///
    /// Keys, handles and padding produced through it are reproducible from
    /// `seed`; intended for test vectors only.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            entropy: EntropySource::seeded(seed),
        }
    }

    /// Whether the provider replays a fixed seed
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.entropy.is_deterministic()
    }

    fn generate_p256(&self) -> Result<RawKeyPair> {
        use p256::pkcs8::{EncodePrivateKey, EncodePublicKey};

        let secret = self.random_scalar(EcCurve::P256, |bytes| {
            p256::SecretKey::from_slice(bytes).ok()
        })?;
        let private = secret
            .to_pkcs8_der()
            .map_err(|e| KeyError::generation(format!("P-256 private key encoding failed: {e}")))?;
        let public = secret
            .public_key()
            .to_public_key_der()
            .map_err(|e| KeyError::generation(format!("P-256 public key encoding failed: {e}")))?;

        Ok(RawKeyPair {
            private: Zeroizing::new(private.as_bytes().to_vec()),
            public: public.as_bytes().to_vec(),
        })
    }

    fn generate_p384(&self) -> Result<RawKeyPair> {
        use p384::pkcs8::{EncodePrivateKey, EncodePublicKey};

        let secret = self.random_scalar(EcCurve::P384, |bytes| {
            p384::SecretKey::from_slice(bytes).ok()
        })?;
        let private = secret
            .to_pkcs8_der()
            .map_err(|e| KeyError::generation(format!("P-384 private key encoding failed: {e}")))?;
        let public = secret
            .public_key()
            .to_public_key_der()
            .map_err(|e| KeyError::generation(format!("P-384 public key encoding failed: {e}")))?;

        Ok(RawKeyPair {
            private: Zeroizing::new(private.as_bytes().to_vec()),
            public: public.as_bytes().to_vec(),
        })
    }

    /// Draw candidate scalars from the entropy source until `parse` accepts one
    fn random_scalar<K>(&self, curve: EcCurve, parse: impl Fn(&[u8]) -> Option<K>) -> Result<K> {
        for _ in 0..EC_SCALAR_ATTEMPTS {
            let candidate = self.entropy.generate_bytes(curve.scalar_len())?;
            if let Some(key) = parse(&candidate) {
                return Ok(key);
            }
        }
        Err(KeyError::generation(format!(
            "no valid {curve} scalar after {EC_SCALAR_ATTEMPTS} attempts"
        )))
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn name(&self) -> &'static str {
        "rustcrypto"
    }

    fn random_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        self.entropy.generate_bytes(len)
    }

    fn generate_rsa(&self, bits: u32) -> Result<RawKeyPair> {
        let private_key = self
            .entropy
            .with_rng(|rng| RsaPrivateKey::new(rng, bits as usize))?
            .map_err(|e| KeyError::generation(format!("RSA key generation failed: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| KeyError::generation(format!("RSA private key encoding failed: {e}")))?;
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| KeyError::generation(format!("RSA public key encoding failed: {e}")))?;

        Ok(RawKeyPair {
            private: Zeroizing::new(private_der.as_bytes().to_vec()),
            public: public_der.as_bytes().to_vec(),
        })
    }

    fn generate_ec(&self, curve: EcCurve) -> Result<RawKeyPair> {
        match curve {
            EcCurve::P256 => self.generate_p256(),
            EcCurve::P384 => self.generate_p384(),
        }
    }

    fn rsa_encrypt(&self, public: &[u8], padding: Padding, plaintext: &[u8]) -> Result<Vec<u8>> {
        let public_key = RsaPublicKey::from_public_key_der(public)
            .map_err(|e| KeyError::provider(format!("invalid RSA public key: {e}")))?;

        let ciphertext = match padding {
            Padding::Pkcs1 => {
                let key = rsa::pkcs1v15::EncryptingKey::new(public_key);
                self.entropy.with_rng(|rng| key.encrypt_with_rng(rng, plaintext))?
            }
            Padding::Oaep => {
                let key = rsa::oaep::EncryptingKey::<Sha256>::new(public_key);
                self.entropy.with_rng(|rng| key.encrypt_with_rng(rng, plaintext))?
            }
        };

        ciphertext.map_err(|e| KeyError::provider(format!("RSA {padding} encryption failed: {e}")))
    }

    fn rsa_decrypt(&self, private: &[u8], padding: Padding, ciphertext: &[u8]) -> Result<Vec<u8>> {
        // Every failure below collapses into the same opaque error
        let private_key =
            RsaPrivateKey::from_pkcs8_der(private).map_err(|_| KeyError::DecryptionFailure)?;

        let plaintext = match padding {
            Padding::Pkcs1 => {
                let key = rsa::pkcs1v15::DecryptingKey::new(private_key);
                self.entropy.with_rng(|rng| key.decrypt_with_rng(rng, ciphertext))
            }
            Padding::Oaep => {
                let key = rsa::oaep::DecryptingKey::<Sha256>::new(private_key);
                self.entropy.with_rng(|rng| key.decrypt_with_rng(rng, ciphertext))
            }
        };

        match plaintext {
            Ok(Ok(plaintext)) => Ok(plaintext),
            _ => Err(KeyError::DecryptionFailure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_pairs_are_der_encoded() {
        let provider = RustCryptoProvider::new();
        let pair = provider.generate_ec(EcCurve::P256).unwrap();
        // SEQUENCE tag for both PKCS#8 and SPKI
        assert_eq!(pair.private[0], 0x30);
        assert_eq!(pair.public[0], 0x30);

        let pair = provider.generate_ec(EcCurve::P384).unwrap();
        assert_eq!(pair.private[0], 0x30);
        assert!(pair.public.len() > 90);
    }

    #[test]
    fn test_seeded_provider_reproduces_ec_keys() {
        let a = RustCryptoProvider::seeded(99).generate_ec(EcCurve::P256).unwrap();
        let b = RustCryptoProvider::seeded(99).generate_ec(EcCurve::P256).unwrap();
        assert_eq!(a.public, b.public);
        assert_eq!(*a.private, *b.private);
    }

    #[test]
    fn test_decrypt_with_garbage_key_is_opaque() {
        let provider = RustCryptoProvider::new();
        let err = provider
            .rsa_decrypt(&[0u8; 16], Padding::Oaep, &[0u8; 256])
            .unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[test]
    fn test_encrypt_with_garbage_public_key_is_provider_failure() {
        let provider = RustCryptoProvider::new();
        let err = provider
            .rsa_encrypt(&[0u8; 16], Padding::Pkcs1, b"hello")
            .unwrap_err();
        assert!(matches!(err, KeyError::ProviderFailure(_)));
    }
}
