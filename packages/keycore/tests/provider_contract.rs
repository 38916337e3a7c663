//! A misbehaving backend behind the `CryptoProvider` seam never leaks an
//! untyped error or a panic through the store

use keycore::prelude::*;
use keycore::{CryptoProvider, RawKeyPair, RustCryptoProvider};
use zeroize::Zeroizing;

/// Fault a [`FaultyProvider`] injects; everything else is delegated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    ShortRandom,
    RepeatedRandom,
    TruncatedCiphertext,
    GenerateFails,
    DecryptFails,
}

struct FaultyProvider {
    inner: RustCryptoProvider,
    fault: Fault,
}

impl FaultyProvider {
    fn store(fault: Fault) -> KeyStore<Self> {
        KeyStore::builder()
            .with_provider(Self {
                inner: RustCryptoProvider::new(),
                fault,
            })
            .build()
            .unwrap()
    }
}

impl CryptoProvider for FaultyProvider {
    fn name(&self) -> &'static str {
        "faulty"
    }

    fn random_bytes(&self, len: usize) -> keycore::Result<Zeroizing<Vec<u8>>> {
        match self.fault {
            Fault::ShortRandom => Ok(Zeroizing::new(vec![0x11; len / 2])),
            Fault::RepeatedRandom => Ok(Zeroizing::new(vec![0x22; len])),
            _ => self.inner.random_bytes(len),
        }
    }

    fn generate_rsa(&self, bits: u32) -> keycore::Result<RawKeyPair> {
        match self.fault {
            Fault::GenerateFails => Err(KeyError::InvalidParameters("backend refused".into())),
            _ => self.inner.generate_rsa(bits),
        }
    }

    fn generate_ec(&self, curve: EcCurve) -> keycore::Result<RawKeyPair> {
        match self.fault {
            Fault::GenerateFails => Err(KeyError::ProviderFailure("backend offline".into())),
            _ => self.inner.generate_ec(curve),
        }
    }

    fn rsa_encrypt(
        &self,
        public: &[u8],
        padding: Padding,
        plaintext: &[u8],
    ) -> keycore::Result<Vec<u8>> {
        let mut ciphertext = self.inner.rsa_encrypt(public, padding, plaintext)?;
        if self.fault == Fault::TruncatedCiphertext {
            ciphertext.truncate(ciphertext.len() - 1);
        }
        Ok(ciphertext)
    }

    fn rsa_decrypt(
        &self,
        private: &[u8],
        padding: Padding,
        ciphertext: &[u8],
    ) -> keycore::Result<Vec<u8>> {
        match self.fault {
            Fault::DecryptFails => Err(KeyError::InvalidParameters("bad block type 0x02".into())),
            _ => self.inner.rsa_decrypt(private, padding, ciphertext),
        }
    }
}

fn p256() -> KeyParameters {
    KeyParameters::Curve(EcCurve::P256)
}

#[test]
fn test_custom_provider_roundtrip() {
    let store = FaultyProvider::store(Fault::None);
    let handle = store
        .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
        .unwrap();

    let ciphertext = store.encrypt(handle, Padding::Oaep, b"swapped backend").unwrap();
    assert_eq!(
        store.decrypt(handle, Padding::Oaep, &ciphertext).unwrap(),
        b"swapped backend"
    );
    assert_eq!(format!("{store:?}"), "KeyStore { provider: \"faulty\", live_keys: 1 }");
}

#[test]
fn test_short_random_buffer_is_generation_failure() {
    let store = FaultyProvider::store(Fault::ShortRandom);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.create(KeyAlgorithm::Ec, p256())
    }));
    let err = result.expect("create panicked").unwrap_err();
    assert!(matches!(err, KeyError::GenerationFailure(_)), "unexpected {err:?}");

    // The write lock was released on the error path
    assert!(store.is_empty());
    assert!(store.handles().is_empty());
}

#[test]
fn test_repeated_handles_exhaust_attempts() {
    let store = FaultyProvider::store(Fault::RepeatedRandom);

    let first = store.create(KeyAlgorithm::Ec, p256()).unwrap();
    assert_eq!(first.as_bytes(), &[0x22; 16]);

    let err = store.create(KeyAlgorithm::Ec, p256()).unwrap_err();
    assert!(matches!(err, KeyError::GenerationFailure(_)), "unexpected {err:?}");
    assert_eq!(store.handles(), vec![first]);

    // Freeing the colliding handle makes the token usable again
    store.destroy(first).unwrap();
    assert_eq!(store.create(KeyAlgorithm::Ec, p256()).unwrap(), first);
}

#[test]
fn test_provider_generation_errors_become_generation_failure() {
    let store = FaultyProvider::store(Fault::GenerateFails);

    for (algorithm, parameters) in [
        (KeyAlgorithm::Ec, p256()),
        (KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048)),
    ] {
        let err = store.create(algorithm, parameters).unwrap_err();
        assert!(matches!(err, KeyError::GenerationFailure(_)), "unexpected {err:?}");
    }
    assert!(store.is_empty());

    // Policy rejections happen before the provider is consulted
    let err = store
        .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(1024))
        .unwrap_err();
    assert!(err.is_invalid_parameters());
}

#[test]
fn test_wrong_length_ciphertext_is_provider_failure() {
    let store = FaultyProvider::store(Fault::TruncatedCiphertext);
    let handle = store
        .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
        .unwrap();

    for padding in [Padding::Pkcs1, Padding::Oaep] {
        let err = store.encrypt(handle, padding, b"short").unwrap_err();
        assert!(matches!(err, KeyError::ProviderFailure(_)), "unexpected {err:?}");
    }
}

#[test]
fn test_provider_decrypt_errors_are_opaque() {
    let store = FaultyProvider::store(Fault::DecryptFails);
    let handle = store
        .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
        .unwrap();
    let ciphertext = store.encrypt(handle, Padding::Pkcs1, b"opaque").unwrap();

    let err = store.decrypt(handle, Padding::Pkcs1, &ciphertext).unwrap_err();
    assert!(err.is_decryption_failure(), "unexpected {err:?}");
    assert_eq!(err.to_string(), "Decryption failed");
}
