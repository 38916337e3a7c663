//! Owned asymmetric key pairs

use crate::algorithm::{KeyAlgorithm, KeyParameters};
use crate::bits::BitSize;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

/// Encoded key pair as returned by a provider
///
/// The private half is PKCS#8 DER and the public half SPKI DER for every
/// algorithm the bundled provider supports.
pub struct RawKeyPair {
    /// Private component, wiped on drop
    pub private: Zeroizing<Vec<u8>>,
    /// Public component
    pub public: Vec<u8>,
}

impl fmt::Debug for RawKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawKeyPair")
            .field("private", &"<redacted>")
            .field("public_len", &self.public.len())
            .finish()
    }
}

/// A single asymmetric key pair, immutable after creation
///
/// The private component never leaves this type except by reference to the
/// cipher engine, and it is overwritten with zeros when the material drops.
/// The type is deliberately not `Clone`.
pub struct KeyMaterial {
    parameters: KeyParameters,
    private_component: Zeroizing<Vec<u8>>,
    public_component: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl KeyMaterial {
    pub(crate) fn new(parameters: KeyParameters, pair: RawKeyPair) -> Self {
        let RawKeyPair { private, public } = pair;
        Self {
            parameters,
            private_component: private,
            public_component: public,
            created_at: Utc::now(),
        }
    }

    /// Algorithm family
    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.parameters.algorithm()
    }

    /// Modulus length or curve
    #[must_use]
    pub fn parameters(&self) -> KeyParameters {
        self.parameters
    }

    /// Public component (SPKI DER)
    #[must_use]
    pub fn public_component(&self) -> &[u8] {
        &self.public_component
    }

    /// Creation timestamp
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// RSA modulus length in bytes, `None` for EC keys
    #[must_use]
    pub fn modulus_len(&self) -> Option<usize> {
        match self.parameters {
            KeyParameters::ModulusBits(bits) => Some(BitSize::new(bits).modulus_len()),
            KeyParameters::Curve(_) => None,
        }
    }

    /// Lowercase hex SHA-256 of the public component
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.public_component))
    }

    pub(crate) fn private_component(&self) -> &[u8] {
        &self.private_component
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("parameters", &self.parameters)
            .field("private_component", &"<redacted>")
            .field("fingerprint", &self.fingerprint())
            .field("created_at", &self.created_at)
            .finish()
    }
}
