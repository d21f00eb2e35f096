//! Native error code translation.
//!
//! Maps host `errno` values into the runtime's unified [`ErrorCode`]
//! enumeration. The translator is injected into the handle factory so a
//! runtime with its own mapping table can substitute it.

use crate::types::ErrorCode;

/// Translates a native OS error code into the unified error enumeration.
pub trait OsErrorTranslator: Send + Sync + std::fmt::Debug {
    fn translate(&self, errno: i32) -> ErrorCode;
}

/// Default POSIX `errno` translation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixErrorTranslator;

impl OsErrorTranslator for PosixErrorTranslator {
    fn translate(&self, errno: i32) -> ErrorCode {
        match errno {
            libc::EACCES | libc::EPERM | libc::EROFS => ErrorCode::AccessDenied,
            libc::EAGAIN => ErrorCode::SharingViolation,
            libc::EBUSY => ErrorCode::LockViolation,
            libc::EEXIST => ErrorCode::FileExists,
            libc::ENOENT | libc::ENOTDIR | libc::ENXIO => ErrorCode::FileNotFound,
            libc::ENOSPC => ErrorCode::HandleDiskFull,
            libc::ENFILE | libc::EMFILE => ErrorCode::TooManyOpenFiles,
            libc::ENAMETOOLONG => ErrorCode::FilenameExcedRange,
            libc::EINVAL => ErrorCode::InvalidParameter,
            libc::EISDIR => ErrorCode::CannotMake,
            libc::EPIPE => ErrorCode::WriteFault,
            libc::EBADF => ErrorCode::InvalidHandle,
            _ => ErrorCode::GenFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_descriptor_is_invalid_handle() {
        assert_eq!(
            PosixErrorTranslator.translate(libc::EBADF),
            ErrorCode::InvalidHandle
        );
    }

    #[test]
    fn test_permission_family() {
        let t = PosixErrorTranslator;
        assert_eq!(t.translate(libc::EACCES), ErrorCode::AccessDenied);
        assert_eq!(t.translate(libc::EPERM), ErrorCode::AccessDenied);
        assert_eq!(t.translate(libc::EROFS), ErrorCode::AccessDenied);
    }

    #[test]
    fn test_descriptor_exhaustion() {
        let t = PosixErrorTranslator;
        assert_eq!(t.translate(libc::EMFILE), ErrorCode::TooManyOpenFiles);
        assert_eq!(t.translate(libc::ENFILE), ErrorCode::TooManyOpenFiles);
    }

    #[test]
    fn test_unmapped_falls_back_to_gen_failure() {
        assert_eq!(PosixErrorTranslator.translate(0), ErrorCode::GenFailure);
        assert_eq!(PosixErrorTranslator.translate(-1), ErrorCode::GenFailure);
    }
}
