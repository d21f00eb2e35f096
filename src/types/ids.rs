//! Strongly-typed identifiers.
//!
//! `Handle` is the opaque value handed to callers; `NativeDescriptor` is the
//! host descriptor it wraps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native descriptor id as reported by the host OS.
pub type NativeDescriptor = std::os::raw::c_int;

/// Opaque handle: slot index in the low 16 bits, slot generation in the high 16.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// The single value returned whenever no handle was created.
    pub const INVALID: Self = Self(u32::MAX);

    pub fn new(index: u16, generation: u16) -> Self {
        Self((u32::from(generation) << 16) | u32::from(index))
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{:#010x}", self.0)
        } else {
            write!(f, "INVALID_HANDLE_VALUE")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_and_generation_packing() {
        let h = Handle::new(7, 3);
        assert_eq!(h.index(), 7);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.as_u32(), 0x0003_0007);
        assert!(h.is_valid());
    }

    #[test]
    fn test_invalid_sentinel() {
        assert!(!Handle::INVALID.is_valid());
        assert_eq!(Handle::from_raw(u32::MAX), Handle::INVALID);
        assert_eq!(Handle::INVALID.to_string(), "INVALID_HANDLE_VALUE");
    }
}
