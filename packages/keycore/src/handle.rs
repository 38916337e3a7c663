//! Opaque key handles

use crate::error::{KeyError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a handle token in bytes (128 bits)
pub const HANDLE_LEN: usize = 16;

/// Opaque caller-facing reference to key material held by a `KeyStore`
///
/// Handles are random 128-bit tokens. A handle is unique among live keys and
/// is never handed out again while its key is live.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle([u8; HANDLE_LEN]);

impl Handle {
    /// Build a handle from raw token bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; HANDLE_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw token bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HANDLE_LEN] {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({self})")
    }
}

impl FromStr for Handle {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| KeyError::invalid_parameters(format!("malformed handle: {e}")))?;
        let token: [u8; HANDLE_LEN] = bytes.try_into().map_err(|_| {
            KeyError::invalid_parameters(format!("handle must be {HANDLE_LEN} bytes"))
        })?;
        Ok(Self(token))
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
