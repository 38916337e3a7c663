//! Algorithm, parameter and padding enums

use crate::bits::BitSize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the SHA-256 digest used by OAEP padding
const OAEP_DIGEST_LEN: usize = 32;

/// Fixed overhead of PKCS#1 v1.5 encryption padding
const PKCS1_OVERHEAD: usize = 11;

/// Asymmetric key algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// RSA over a composite modulus
    #[serde(rename = "rsa")]
    Rsa,
    /// Elliptic curve over a named NIST curve
    #[serde(rename = "ec")]
    Ec,
}

impl KeyAlgorithm {
    /// Whether keys of this family can encrypt directly
    #[must_use]
    pub fn supports_encryption(&self) -> bool {
        matches!(self, Self::Rsa)
    }

    /// Exposure of this family to a cryptographically relevant quantum computer
    #[must_use]
    pub fn quantum_risk(&self) -> QuantumRisk {
        // Both families fall to Shor's algorithm
        match self {
            Self::Rsa | Self::Ec => QuantumRisk::Vulnerable,
        }
    }

    /// Post-quantum algorithm that replaces this family
    #[must_use]
    pub fn migration_target(&self) -> &'static str {
        match self {
            Self::Rsa => "ML-KEM-768",
            Self::Ec => "ML-DSA-65",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa => write!(f, "RSA"),
            Self::Ec => write!(f, "EC"),
        }
    }
}

/// Quantum exposure classification of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantumRisk {
    /// Broken by Shor's algorithm
    #[serde(rename = "vulnerable")]
    Vulnerable,
    /// No known efficient quantum attack
    ///
    /// Neither built-in algorithm reports this; it is the classification a
    /// post-quantum provider's algorithms would report.
    #[serde(rename = "resistant")]
    Resistant,
}

impl QuantumRisk {
    /// Check if the classification is `Vulnerable`
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Self::Vulnerable)
    }
}

/// Named elliptic curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1)
    #[serde(rename = "P-256")]
    P256,
    /// NIST P-384 (secp384r1)
    #[serde(rename = "P-384")]
    P384,
}

impl EcCurve {
    /// Size of a private scalar in bytes
    #[must_use]
    pub fn scalar_len(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P256 => write!(f, "P-256"),
            Self::P384 => write!(f, "P-384"),
        }
    }
}

/// Generation parameters: modulus length for RSA, curve for EC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum KeyParameters {
    /// RSA modulus length in bits
    #[serde(rename = "modulus_bits")]
    ModulusBits(u32),
    /// Named EC curve
    #[serde(rename = "curve")]
    Curve(EcCurve),
}

impl KeyParameters {
    /// RSA parameters from a bit size, e.g. `KeyParameters::rsa(3072u32.bits())`
    #[must_use]
    pub fn rsa(size: BitSize) -> Self {
        Self::ModulusBits(size.get())
    }

    /// EC parameters for a named curve
    #[must_use]
    pub fn curve(curve: EcCurve) -> Self {
        Self::Curve(curve)
    }

    /// Algorithm family these parameters belong to
    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::ModulusBits(_) => KeyAlgorithm::Rsa,
            Self::Curve(_) => KeyAlgorithm::Ec,
        }
    }
}

impl fmt::Display for KeyParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModulusBits(bits) => write!(f, "{}", BitSize::new(*bits)),
            Self::Curve(curve) => write!(f, "{curve}"),
        }
    }
}

/// RSA encryption padding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Padding {
    /// PKCS#1 v1.5 encryption padding
    #[serde(rename = "pkcs1")]
    Pkcs1,
    /// OAEP with SHA-256 for both digest and MGF1
    #[serde(rename = "oaep")]
    #[default]
    Oaep,
}

impl Padding {
    /// Bytes of the modulus consumed by padding
    #[must_use]
    pub fn overhead(&self) -> usize {
        match self {
            Self::Pkcs1 => PKCS1_OVERHEAD,
            Self::Oaep => 2 * OAEP_DIGEST_LEN + 2,
        }
    }

    /// Largest plaintext that fits a modulus of `modulus_bytes`
    #[must_use]
    pub fn max_plaintext_len(&self, modulus_bytes: usize) -> usize {
        modulus_bytes.saturating_sub(self.overhead())
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pkcs1 => write!(f, "PKCS1"),
            Self::Oaep => write!(f, "OAEP-SHA256"),
        }
    }
}
