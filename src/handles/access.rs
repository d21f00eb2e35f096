//! Access rights and open-mode translation.
//!
//! Converts the host's open-mode bits (`fcntl(F_GETFL)`) into the abstract
//! [`AccessRights`] classification the runtime works with.

use serde::{Deserialize, Serialize};
use std::os::raw::c_int;

/// Runtime-level `GENERIC_READ` access bit.
pub const GENERIC_READ: u32 = 0x8000_0000;
/// Runtime-level `GENERIC_WRITE` access bit.
pub const GENERIC_WRITE: u32 = 0x4000_0000;

#[cfg(unix)]
mod mode {
    use std::os::raw::c_int;

    pub const ACCMODE: c_int = libc::O_ACCMODE;
    pub const RDONLY: c_int = libc::O_RDONLY;
    pub const WRONLY: c_int = libc::O_WRONLY;
    pub const RDWR: c_int = libc::O_RDWR;
}

#[cfg(not(unix))]
mod mode {
    use std::os::raw::c_int;

    pub const ACCMODE: c_int = 0o3;
    pub const RDONLY: c_int = 0o0;
    pub const WRONLY: c_int = 0o1;
    pub const RDWR: c_int = 0o2;
}

/// Abstract access classification.
///
/// `Unknown` means the host mode could not be classified. It is a value,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRights {
    Read,
    Write,
    ReadWrite,
    Unknown,
}

impl AccessRights {
    pub fn can_read(self) -> bool {
        matches!(self, AccessRights::Read | AccessRights::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessRights::Write | AccessRights::ReadWrite)
    }

    /// Drop the write right. A write-only value has nothing left and becomes `Unknown`.
    pub fn without_write(self) -> Self {
        match self {
            AccessRights::ReadWrite | AccessRights::Read => AccessRights::Read,
            AccessRights::Write | AccessRights::Unknown => AccessRights::Unknown,
        }
    }

    /// Whether this is a single-direction request a pipe endpoint may carry.
    pub fn is_single_direction(self) -> bool {
        matches!(self, AccessRights::Read | AccessRights::Write)
    }

    pub fn to_generic_bits(self) -> u32 {
        match self {
            AccessRights::Read => GENERIC_READ,
            AccessRights::Write => GENERIC_WRITE,
            AccessRights::ReadWrite => GENERIC_READ | GENERIC_WRITE,
            AccessRights::Unknown => 0,
        }
    }

    pub fn from_generic_bits(bits: u32) -> Self {
        match (bits & GENERIC_READ != 0, bits & GENERIC_WRITE != 0) {
            (true, false) => AccessRights::Read,
            (false, true) => AccessRights::Write,
            (true, true) => AccessRights::ReadWrite,
            (false, false) => AccessRights::Unknown,
        }
    }
}

/// Translate host open-mode bits into access rights.
///
/// Only the access-mode bits are considered; status flags such as
/// `O_NONBLOCK` or `O_APPEND` are ignored.
pub fn translate(mode_bits: c_int) -> AccessRights {
    let access = match mode_bits & mode::ACCMODE {
        mode::RDONLY => AccessRights::Read,
        mode::WRONLY => AccessRights::Write,
        mode::RDWR => AccessRights::ReadWrite,
        _ => AccessRights::Unknown,
    };
    if access == AccessRights::Unknown {
        tracing::debug!("unclassified open mode: flags={:#x}", mode_bits);
    }
    access
}

/// Open-mode bits equivalent to an access value, for hosts and tests that
/// need to fabricate a mode.
pub fn mode_bits_for(access: AccessRights) -> c_int {
    match access {
        AccessRights::Read => mode::RDONLY,
        AccessRights::Write => mode::WRONLY,
        AccessRights::ReadWrite => mode::RDWR,
        AccessRights::Unknown => mode::ACCMODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    #[test]
    fn test_translate_basic_modes() {
        assert_eq!(translate(mode::RDONLY), AccessRights::Read);
        assert_eq!(translate(mode::WRONLY), AccessRights::Write);
        assert_eq!(translate(mode::RDWR), AccessRights::ReadWrite);
    }

    #[cfg(unix)]
    #[test]
    fn test_translate_ignores_status_flags() {
        assert_eq!(
            translate(libc::O_WRONLY | libc::O_NONBLOCK | libc::O_APPEND),
            AccessRights::Write
        );
        assert_eq!(translate(libc::O_RDONLY | libc::O_NONBLOCK), AccessRights::Read);
    }

    #[test]
    #[traced_test]
    fn test_unclassified_mode_is_reported_not_failed() {
        assert_eq!(translate(mode::ACCMODE), AccessRights::Unknown);
        assert!(logs_contain("unclassified open mode"));
    }

    #[test]
    fn test_without_write() {
        assert_eq!(AccessRights::ReadWrite.without_write(), AccessRights::Read);
        assert_eq!(AccessRights::Read.without_write(), AccessRights::Read);
        assert_eq!(AccessRights::Write.without_write(), AccessRights::Unknown);
        assert_eq!(AccessRights::Unknown.without_write(), AccessRights::Unknown);
        assert!(AccessRights::ReadWrite.without_write().can_read());
        assert!(!AccessRights::ReadWrite.without_write().can_write());
    }

    #[test]
    fn test_generic_bits() {
        assert_eq!(AccessRights::ReadWrite.to_generic_bits(), 0xC000_0000);
        assert_eq!(AccessRights::from_generic_bits(GENERIC_READ), AccessRights::Read);
        assert_eq!(AccessRights::from_generic_bits(0), AccessRights::Unknown);
        for access in [
            AccessRights::Read,
            AccessRights::Write,
            AccessRights::ReadWrite,
            AccessRights::Unknown,
        ] {
            assert_eq!(AccessRights::from_generic_bits(access.to_generic_bits()), access);
        }
    }

    proptest! {
        #[test]
        fn prop_translate_depends_only_on_access_mode(flags in any::<c_int>()) {
            prop_assert_eq!(translate(flags), translate(flags & mode::ACCMODE));
        }

        #[test]
        fn prop_classified_modes_round_trip(flags in any::<c_int>()) {
            let access = translate(flags);
            if access != AccessRights::Unknown {
                prop_assert_eq!(mode_bits_for(access), flags & mode::ACCMODE);
            }
        }
    }
}
