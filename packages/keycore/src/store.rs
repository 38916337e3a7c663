//! Handle-indexed key store
//!
//! The store owns every [`KeyMaterial`] it creates. The handle map is the
//! only mutable shared state and sits behind one `RwLock`: create and destroy
//! take the write side briefly, lookups take the read side just long enough
//! to clone an `Arc`. Generation and cipher work run with no lock held, so a
//! slow RSA operation on one handle never blocks another.
//!
//! Destroying a handle removes it from the map at once. The material itself
//! is wiped when the last in-flight operation holding it finishes, so a
//! caller racing a destroy either completes against intact material or gets
//! `HandleNotFound`.

use crate::algorithm::{KeyAlgorithm, KeyParameters, Padding, QuantumRisk};
use crate::config::KeyStoreConfig;
use crate::engine::CipherEngine;
use crate::generator::KeyGenerator;
use crate::handle::{HANDLE_LEN, Handle};
use crate::material::KeyMaterial;
use crate::provider::{CryptoProvider, RustCryptoProvider};
use crate::{KeyError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Draws of a fresh handle before giving up on a collision streak
const HANDLE_ATTEMPTS: usize = 4;

/// Public description of a live key; contains no secret material
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    /// Handle the key is registered under
    pub handle: Handle,
    /// Algorithm family
    pub algorithm: KeyAlgorithm,
    /// Modulus length or curve
    pub parameters: KeyParameters,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the public component
    pub fingerprint: String,
    /// Quantum exposure of the algorithm
    pub quantum_risk: QuantumRisk,
    /// Post-quantum replacement for the algorithm
    pub migration_target: &'static str,
    /// Plaintext capacity with PKCS#1 v1.5 padding, `None` if encryption is unsupported
    pub max_plaintext_pkcs1: Option<usize>,
    /// Plaintext capacity with OAEP padding, `None` if encryption is unsupported
    pub max_plaintext_oaep: Option<usize>,
}

/// Owns key material by handle and mediates generation and cipher requests
///
/// ```no_run
/// use keycore::{KeyAlgorithm, KeyParameters, KeyStore, Padding};
///
/// # fn main() -> keycore::Result<()> {
/// let store = KeyStore::new();
/// let handle = store.create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))?;
///
/// let ciphertext = store.encrypt(handle, Padding::Oaep, b"hello")?;
/// assert_eq!(store.decrypt(handle, Padding::Oaep, &ciphertext)?, b"hello");
///
/// store.destroy(handle)?;
/// # Ok(())
/// # }
/// ```
pub struct KeyStore<P: CryptoProvider = RustCryptoProvider> {
    provider: Arc<P>,
    generator: KeyGenerator<P>,
    engine: CipherEngine<P>,
    keys: RwLock<HashMap<Handle, Arc<KeyMaterial>>>,
}

impl KeyStore<RustCryptoProvider> {
    /// Store with the default policy and the OS-backed RustCrypto provider
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Arc::new(RustCryptoProvider::new()), KeyStoreConfig::default())
    }

    /// Start configuring a store
    #[must_use]
    pub fn builder() -> KeyStoreBuilder<RustCryptoProvider> {
        KeyStoreBuilder::new()
    }
}

impl Default for KeyStore<RustCryptoProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CryptoProvider> KeyStore<P> {
    fn from_parts(provider: Arc<P>, config: KeyStoreConfig) -> Self {
        Self {
            generator: KeyGenerator::new(Arc::clone(&provider), config),
            engine: CipherEngine::new(Arc::clone(&provider)),
            provider,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Generate a key pair and register it under a fresh handle
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for rejected parameters and
    /// `GenerationFailure` if the provider or random source fails.
    pub fn create(&self, algorithm: KeyAlgorithm, parameters: KeyParameters) -> Result<Handle> {
        let material = Arc::new(self.generator.generate(algorithm, parameters)?);

        let handle = {
            let mut keys = self.keys.write();
            let handle = self.fresh_handle(&keys)?;
            keys.insert(handle, material);
            handle
        };

        tracing::info!(%handle, %algorithm, %parameters, "created key");
        let warn = self.generator.config().warn_quantum_vulnerable;
        if warn && algorithm.quantum_risk().is_vulnerable() {
            tracing::warn!(
                %handle,
                %algorithm,
                migration_target = algorithm.migration_target(),
                "created quantum-vulnerable key"
            );
        }
        Ok(handle)
    }

    /// Encrypt `plaintext` with the key behind `handle`
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound`, `UnsupportedOperation` for EC keys,
    /// `PayloadTooLarge`, or `ProviderFailure`.
    pub fn encrypt(&self, handle: Handle, padding: Padding, plaintext: &[u8]) -> Result<Vec<u8>> {
        let material = self.lookup(handle)?;
        self.engine.encrypt(&material, padding, plaintext)
    }

    /// Decrypt `ciphertext` with the key behind `handle`
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound`, `UnsupportedOperation` for EC keys, or the
    /// opaque `DecryptionFailure`.
    pub fn decrypt(&self, handle: Handle, padding: Padding, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let material = self.lookup(handle)?;
        self.engine.decrypt(&material, padding, ciphertext)
    }

    /// Encrypt with the configured default padding
    ///
    /// # Errors
    ///
    /// Same as [`KeyStore::encrypt`].
    pub fn encrypt_default(&self, handle: Handle, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.encrypt(handle, self.generator.config().default_padding, plaintext)
    }

    /// Decrypt with the configured default padding
    ///
    /// # Errors
    ///
    /// Same as [`KeyStore::decrypt`].
    pub fn decrypt_default(&self, handle: Handle, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decrypt(handle, self.generator.config().default_padding, ciphertext)
    }

    /// Unregister `handle` and wipe its key material
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound` if the handle is unknown or already destroyed.
    pub fn destroy(&self, handle: Handle) -> Result<()> {
        let removed = self.keys.write().remove(&handle);
        match removed {
            Some(material) => {
                // Wiped here, or by the last in-flight operation still holding it
                drop(material);
                tracing::info!(%handle, "destroyed key");
                Ok(())
            }
            None => Err(KeyError::HandleNotFound(handle)),
        }
    }

    /// Public component (SPKI DER) of the key behind `handle`
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound` for unknown handles.
    pub fn public_key(&self, handle: Handle) -> Result<Vec<u8>> {
        Ok(self.lookup(handle)?.public_component().to_vec())
    }

    /// Describe the key behind `handle`
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound` for unknown handles.
    pub fn describe(&self, handle: Handle) -> Result<KeyInfo> {
        let material = self.lookup(handle)?;
        let algorithm = material.algorithm();
        let capacity = |padding: Padding| self.engine.max_plaintext_len(&material, padding).ok();

        Ok(KeyInfo {
            handle,
            algorithm,
            parameters: material.parameters(),
            created_at: material.created_at(),
            fingerprint: material.fingerprint(),
            quantum_risk: algorithm.quantum_risk(),
            migration_target: algorithm.migration_target(),
            max_plaintext_pkcs1: capacity(Padding::Pkcs1),
            max_plaintext_oaep: capacity(Padding::Oaep),
        })
    }

    /// Whether `handle` refers to a live key
    pub fn contains(&self, handle: Handle) -> bool {
        self.keys.read().contains_key(&handle)
    }

    /// Handles of all live keys, in no particular order
    pub fn handles(&self) -> Vec<Handle> {
        self.keys.read().keys().copied().collect()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Destroy every live key, returning how many were removed
    pub fn clear(&self) -> usize {
        let drained = std::mem::take(&mut *self.keys.write());
        let count = drained.len();
        drop(drained);
        if count > 0 {
            tracing::info!(count, "destroyed all keys");
        }
        count
    }

    /// Policy in force
    pub fn config(&self) -> &KeyStoreConfig {
        self.generator.config()
    }

    /// Provider backing this store
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn lookup(&self, handle: Handle) -> Result<Arc<KeyMaterial>> {
        self.keys
            .read()
            .get(&handle)
            .cloned()
            .ok_or(KeyError::HandleNotFound(handle))
    }

    fn fresh_handle(&self, live: &HashMap<Handle, Arc<KeyMaterial>>) -> Result<Handle> {
        for _ in 0..HANDLE_ATTEMPTS {
            let bytes = self.provider.random_bytes(HANDLE_LEN)?;
            let token: [u8; HANDLE_LEN] = bytes.as_slice().try_into().map_err(|_| {
                KeyError::generation(format!(
                    "random source returned {} bytes for a {HANDLE_LEN}-byte handle",
                    bytes.len()
                ))
            })?;
            let handle = Handle::from_bytes(token);
            if !live.contains_key(&handle) {
                return Ok(handle);
            }
        }
        Err(KeyError::generation("random source keeps repeating handles"))
    }
}

impl<P: CryptoProvider> std::fmt::Debug for KeyStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("provider", &self.provider.name())
            .field("live_keys", &self.len())
            .finish()
    }
}

/// Builder for [`KeyStore`]
pub struct KeyStoreBuilder<P> {
    provider: Arc<P>,
    config: KeyStoreConfig,
}

impl KeyStoreBuilder<RustCryptoProvider> {
    /// Builder with the default policy and provider
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: Arc::new(RustCryptoProvider::new()),
            config: KeyStoreConfig::default(),
        }
    }
}

impl Default for KeyStoreBuilder<RustCryptoProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CryptoProvider> KeyStoreBuilder<P> {
    /// Replace the policy
    #[must_use]
    pub fn with_config(mut self, config: KeyStoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the provider
    pub fn with_provider<Q: CryptoProvider>(self, provider: Q) -> KeyStoreBuilder<Q> {
        KeyStoreBuilder {
            provider: Arc::new(provider),
            config: self.config,
        }
    }

    /// Validate the policy and build the store
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if the policy fails validation.
    pub fn build(self) -> Result<KeyStore<P>> {
        self.config.validate()?;
        tracing::debug!(provider = self.provider.name(), "building key store");
        Ok(KeyStore::from_parts(self.provider, self.config))
    }
}
