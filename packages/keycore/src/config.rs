//! Key store configuration

use crate::algorithm::{EcCurve, Padding};
use crate::bits::BitSize;
use crate::{KeyError, Result};
use serde::{Deserialize, Serialize};

/// Absolute floor for RSA modulus length; configuration cannot go lower
pub const MIN_RSA_BITS: u32 = 2048;

/// Policy and defaults for a `KeyStore`
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// use keycore::KeyStoreConfig;
///
/// let config = KeyStoreConfig::from_json_str(r#"{ "min_rsa_bits": 3072 }"#).unwrap();
/// assert_eq!(config.rsa_bit_sizes, vec![3072, 4096]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyStoreConfig {
    /// Smallest RSA modulus accepted, in bits
    pub min_rsa_bits: u32,
    /// Approved RSA modulus lengths, in bits
    pub rsa_bit_sizes: Vec<u32>,
    /// Approved EC curves
    pub approved_curves: Vec<EcCurve>,
    /// Padding used by `encrypt_default` and `decrypt_default`
    pub default_padding: Padding,
    /// Emit a warning when a quantum-vulnerable key is created
    pub warn_quantum_vulnerable: bool,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            min_rsa_bits: MIN_RSA_BITS,
            rsa_bit_sizes: vec![2048, 3072, 4096],
            approved_curves: vec![EcCurve::P256, EcCurve::P384],
            default_padding: Padding::Oaep,
            warn_quantum_vulnerable: true,
        }
    }
}

impl KeyStoreConfig {
    /// Parse a JSON document and validate it.
    ///
    /// Sizes below `min_rsa_bits` are dropped from the default size list so
    /// that raising the floor alone yields a consistent policy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for malformed JSON or an invalid policy.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| KeyError::invalid_parameters(format!("malformed config: {e}")))?;
        let explicit_sizes = value.get("rsa_bit_sizes").is_some();

        let mut config: Self = serde_json::from_value(value)
            .map_err(|e| KeyError::invalid_parameters(format!("malformed config: {e}")))?;
        if !explicit_sizes {
            let floor = config.min_rsa_bits;
            config.rsa_bit_sizes.retain(|bits| *bits >= floor);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.min_rsa_bits < MIN_RSA_BITS {
            return Err(KeyError::invalid_parameters(format!(
                "min_rsa_bits {} is below the {MIN_RSA_BITS}-bit floor",
                self.min_rsa_bits
            )));
        }
        if self.rsa_bit_sizes.is_empty() {
            return Err(KeyError::invalid_parameters("rsa_bit_sizes must not be empty"));
        }
        if let Some(bits) = self
            .rsa_bit_sizes
            .iter()
            .find(|bits| {
                **bits < self.min_rsa_bits || !BitSize::new(**bits).is_byte_aligned()
            })
        {
            return Err(KeyError::invalid_parameters(format!(
                "RSA size {bits} must be a multiple of 8 and at least {}",
                self.min_rsa_bits
            )));
        }
        if self.approved_curves.is_empty() {
            return Err(KeyError::invalid_parameters("approved_curves must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KeyStoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_padding, Padding::Oaep);
    }

    #[test]
    fn test_config_from_json() {
        let config = KeyStoreConfig::from_json_str(
            r#"{
                "rsa_bit_sizes": [4096],
                "approved_curves": ["P-384"],
                "default_padding": "pkcs1",
                "warn_quantum_vulnerable": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.min_rsa_bits, 2048);
        assert_eq!(config.rsa_bit_sizes, vec![4096]);
        assert_eq!(config.approved_curves, vec![EcCurve::P384]);
        assert_eq!(config.default_padding, Padding::Pkcs1);
        assert!(!config.warn_quantum_vulnerable);
    }

    #[test]
    fn test_config_rejects_weak_floor() {
        let err = KeyStoreConfig::from_json_str(r#"{ "min_rsa_bits": 1024 }"#).unwrap_err();
        assert!(err.is_invalid_parameters());
    }

    #[test]
    fn test_config_rejects_size_below_floor() {
        let err = KeyStoreConfig::from_json_str(
            r#"{ "min_rsa_bits": 3072, "rsa_bit_sizes": [2048] }"#,
        )
        .unwrap_err();
        assert!(err.is_invalid_parameters());
    }

    #[test]
    fn test_config_rejects_unknown_curve_and_garbage() {
        assert!(KeyStoreConfig::from_json_str(r#"{ "approved_curves": ["P-192"] }"#).is_err());
        assert!(KeyStoreConfig::from_json_str("not json").is_err());
        assert!(KeyStoreConfig::from_json_str(r#"{ "approved_curves": [] }"#).is_err());
    }
}
