//! Error taxonomy for key management and cipher operations

use crate::algorithm::KeyAlgorithm;
use crate::handle::Handle;
use thiserror::Error;

/// Key management and cipher errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Requested bit-length, curve or configuration is not acceptable
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The provider could not produce a key pair
    #[error("Key generation failed: {0}")]
    GenerationFailure(String),

    /// The key's algorithm does not support the requested operation
    #[error("Unsupported operation: {operation} is not available for {algorithm} keys")]
    UnsupportedOperation {
        /// Algorithm of the key the operation was attempted on
        algorithm: KeyAlgorithm,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Plaintext exceeds what the key and padding can carry
    #[error("Payload too large: {len} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Length of the rejected payload
        len: usize,
        /// Maximum payload length for this key and padding
        max: usize,
    },

    /// Decryption failed.
    ///
    /// Carries no detail on purpose: a length mismatch and a padding check
    /// failure are indistinguishable to the caller.
    #[error("Decryption failed")]
    DecryptionFailure,

    /// No live key is registered under the handle
    #[error("Handle not found: {0}")]
    HandleNotFound(Handle),

    /// Provider fault outside of generation and decryption
    #[error("Provider failure: {0}")]
    ProviderFailure(String),
}

impl KeyError {
    /// Create an `InvalidParameters` error
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Create a `GenerationFailure` error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailure(msg.into())
    }

    /// Create a `ProviderFailure` error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::ProviderFailure(msg.into())
    }

    /// Check if the error indicates an unknown or destroyed handle
    #[must_use]
    pub fn is_handle_not_found(&self) -> bool {
        matches!(self, Self::HandleNotFound(_))
    }

    /// Check if the error was caused by caller-supplied parameters
    #[must_use]
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }

    /// Check if the error is the opaque decryption failure
    #[must_use]
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailure)
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
