//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Every
//! variant maps onto the runtime's unified error enumeration via
//! [`Error::code`], so callers at the runtime boundary see one error domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{Handle, NativeDescriptor};
use crate::handles::AccessRights;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error code understood by the runtime (Win32 numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    FileNotFound = 2,
    TooManyOpenFiles = 4,
    AccessDenied = 5,
    InvalidHandle = 6,
    InvalidData = 13,
    WriteFault = 29,
    GenFailure = 31,
    SharingViolation = 32,
    LockViolation = 33,
    HandleDiskFull = 39,
    NotSupported = 50,
    FileExists = 80,
    CannotMake = 82,
    InvalidParameter = 87,
    FilenameExcedRange = 206,
}

impl ErrorCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.as_u32())
    }
}

/// Main error enum for handle creation.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested access combination is not supported; no OS call was made.
    #[error("unsupported access request: {requested:?} (only Read or Write allowed)")]
    UnsupportedOperation { requested: AccessRights },

    /// The descriptor is not currently open.
    #[error("invalid descriptor {fd}: errno {errno} ({code})")]
    InvalidHandle {
        fd: NativeDescriptor,
        code: ErrorCode,
        errno: i32,
    },

    /// OS-reported access disagrees with the caller's request.
    #[error("descriptor {fd} opened as {actual:?}, requested {requested:?}")]
    DataMismatch {
        fd: NativeDescriptor,
        requested: AccessRights,
        actual: AccessRights,
    },

    /// The host could not create an anonymous pipe.
    #[error("pipe creation failed: errno {errno} ({code})")]
    PipeCreation { code: ErrorCode, errno: i32 },

    /// The handle table could not register the record.
    #[error("resource exhausted: {0}")]
    ResourceExhaustion(String),

    /// Malformed caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Convert to the runtime's unified error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnsupportedOperation { .. } => ErrorCode::NotSupported,
            Error::InvalidHandle { code, .. } | Error::PipeCreation { code, .. } => *code,
            Error::DataMismatch { .. } => ErrorCode::InvalidData,
            Error::ResourceExhaustion(_) => ErrorCode::GenFailure,
            Error::Validation(_) | Error::Config(_) | Error::Serialization(_) => {
                ErrorCode::InvalidParameter
            }
        }
    }
}

// Convenience constructors
impl Error {
    pub fn resource_exhaustion(msg: impl Into<String>) -> Self {
        Self::ResourceExhaustion(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Handle plus out-of-band error code, the shape the runtime boundary expects.
///
/// On failure the handle is always [`Handle::INVALID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOutcome {
    pub handle: Handle,
    pub error: ErrorCode,
}

impl From<&Result<Handle>> for RawOutcome {
    fn from(result: &Result<Handle>) -> Self {
        match result {
            Ok(handle) => Self {
                handle: *handle,
                error: ErrorCode::Success,
            },
            Err(e) => Self {
                handle: Handle::INVALID,
                error: e.code(),
            },
        }
    }
}

impl From<Result<Handle>> for RawOutcome {
    fn from(result: Result<Handle>) -> Self {
        Self::from(&result)
    }
}
