//! RSA modulus sizes

use crate::config::MIN_RSA_BITS;

/// Length of an RSA modulus in bits
///
/// Only byte-aligned sizes at or above [`MIN_RSA_BITS`] can ever back a key;
/// [`BitSize::is_usable`] is the check the generator applies before any
/// configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitSize(u32);

impl BitSize {
    /// Wrap a raw bit count
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit count
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether the size is a whole number of bytes
    #[must_use]
    pub const fn is_byte_aligned(self) -> bool {
        self.0 % 8 == 0
    }

    /// Whether the size reaches the absolute floor
    #[must_use]
    pub const fn meets_floor(self) -> bool {
        self.0 >= MIN_RSA_BITS
    }

    /// Byte-aligned and at or above the floor
    #[must_use]
    pub const fn is_usable(self) -> bool {
        self.is_byte_aligned() && self.meets_floor()
    }

    /// Modulus length in bytes, which is also the ciphertext length
    #[must_use]
    pub const fn modulus_len(self) -> usize {
        self.0.div_ceil(8) as usize
    }
}

impl From<u32> for BitSize {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl std::fmt::Display for BitSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.0)
    }
}

/// `2048u32.bits()` shorthand
pub trait Bits {
    /// Interpret as a modulus size
    fn bits(self) -> BitSize;
}

impl Bits for u32 {
    fn bits(self) -> BitSize {
        BitSize(self)
    }
}

impl Bits for usize {
    fn bits(self) -> BitSize {
        // Oversized counts saturate and fail the approved-size check
        BitSize(u32::try_from(self).unwrap_or(u32::MAX))
    }
}
