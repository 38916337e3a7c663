//! Key pair generation under an approval policy

use crate::algorithm::{KeyAlgorithm, KeyParameters};
use crate::bits::BitSize;
use crate::config::{KeyStoreConfig, MIN_RSA_BITS};
use crate::material::KeyMaterial;
use crate::provider::CryptoProvider;
use crate::{KeyError, Result};
use std::sync::Arc;

/// Produces [`KeyMaterial`] for approved algorithm/parameter combinations
///
/// Holds no state besides the policy and the provider; every call draws
/// fresh entropy.
pub struct KeyGenerator<P> {
    provider: Arc<P>,
    config: KeyStoreConfig,
}

impl<P: CryptoProvider> KeyGenerator<P> {
    /// Create a generator enforcing `config`
    pub fn new(provider: Arc<P>, config: KeyStoreConfig) -> Self {
        Self { provider, config }
    }

    /// Generate a key pair
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if `parameters` do not belong to
    /// `algorithm` or are outside the approved set, and
    /// `GenerationFailure` if the provider fails.
    pub fn generate(
        &self,
        algorithm: KeyAlgorithm,
        parameters: KeyParameters,
    ) -> Result<KeyMaterial> {
        self.check(algorithm, parameters)?;

        let pair = match parameters {
            KeyParameters::ModulusBits(bits) => self.provider.generate_rsa(bits),
            KeyParameters::Curve(curve) => self.provider.generate_ec(curve),
        }
        .map_err(|e| match e {
            KeyError::GenerationFailure(_) => e,
            other => KeyError::generation(other.to_string()),
        })?;

        tracing::debug!(
            provider = self.provider.name(),
            %algorithm,
            %parameters,
            "generated key pair"
        );
        Ok(KeyMaterial::new(parameters, pair))
    }

    /// Validate a request against the policy without generating anything
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` describing the rejected input.
    pub fn check(&self, algorithm: KeyAlgorithm, parameters: KeyParameters) -> Result<()> {
        if parameters.algorithm() != algorithm {
            return Err(KeyError::invalid_parameters(format!(
                "{parameters} parameters do not apply to {algorithm} keys"
            )));
        }

        match parameters {
            KeyParameters::ModulusBits(bits) => {
                // The absolute floor holds even under a policy that skipped validation
                if !BitSize::new(bits).is_usable() {
                    return Err(KeyError::invalid_parameters(format!(
                        "RSA modulus of {bits} bits must be byte-aligned and at least {MIN_RSA_BITS} bits"
                    )));
                }
                if bits < self.config.min_rsa_bits {
                    return Err(KeyError::invalid_parameters(format!(
                        "RSA modulus of {bits} bits is below the {}-bit minimum",
                        self.config.min_rsa_bits
                    )));
                }
                if !self.config.rsa_bit_sizes.contains(&bits) {
                    return Err(KeyError::invalid_parameters(format!(
                        "RSA modulus of {bits} bits is not an approved size (approved: {:?})",
                        self.config.rsa_bit_sizes
                    )));
                }
            }
            KeyParameters::Curve(curve) => {
                if !self.config.approved_curves.contains(&curve) {
                    return Err(KeyError::invalid_parameters(format!(
                        "curve {curve} is not approved"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Policy in force
    pub fn config(&self) -> &KeyStoreConfig {
        &self.config
    }
}
