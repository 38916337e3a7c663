//! # Keycore
//!
//! Handle-based asymmetric key management with RSA encryption.
//!
//! ## Features
//!
//! - **Key Generation**: RSA (2048/3072/4096) and EC (P-256/P-384) under an approval policy
//! - **Handle Store**: keys are owned by the store and addressed by random 128-bit handles
//! - **RSA Encryption**: PKCS#1 v1.5 and OAEP-SHA256 with explicit capacity checks
//! - **Zeroization**: private components are wiped when a key is destroyed
//! - **Pluggable Providers**: primitives come from a [`CryptoProvider`] implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keycore::prelude::*;
//!
//! # fn main() -> keycore::Result<()> {
//! let store = KeyStore::new();
//! let handle = store.create(KeyAlgorithm::Rsa, KeyParameters::rsa(3072u32.bits()))?;
//!
//! let ciphertext = store.encrypt(handle, Padding::Oaep, b"hello")?;
//! let plaintext = store.decrypt(handle, Padding::Oaep, &ciphertext)?;
//! assert_eq!(plaintext, b"hello");
//!
//! store.destroy(handle)?;
//! # Ok(())
//! # }
//! ```
//!
//! RSA and EC are both broken by a large quantum computer. Every key reports
//! its [`QuantumRisk`] and the post-quantum algorithm that replaces it.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod algorithm;
pub mod bits;
pub mod config;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod generator;
pub mod handle;
pub mod material;
pub mod provider;
pub mod store;

// Re-export core types
pub use algorithm::{EcCurve, KeyAlgorithm, KeyParameters, Padding, QuantumRisk};
pub use config::KeyStoreConfig;
pub use engine::CipherEngine;
pub use error::{KeyError, Result};
pub use generator::KeyGenerator;
pub use handle::Handle;
pub use material::{KeyMaterial, RawKeyPair};
pub use provider::{CryptoProvider, RustCryptoProvider};
pub use store::{KeyInfo, KeyStore, KeyStoreBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EcCurve, Handle, KeyAlgorithm, KeyError, KeyParameters, KeyStore, KeyStoreConfig,
        Padding, Result,
        bits::{BitSize, Bits},
    };
}
