//! # fdhandle-core - Native Descriptor Handle Layer
//!
//! Wraps native file descriptors (anonymous pipe endpoints and inherited
//! standard streams) into opaque, access-controlled handles for a runtime
//! that expects Windows-style handle semantics on every host:
//! - Open-mode bits translated into abstract access rights
//! - Descriptor liveness probing with interruption retry
//! - Requested vs. OS-granted access reconciliation for pipes
//! - Input-stream write stripping for standard handles
//! - A single uniform error domain and invalid-handle sentinel
//!
//! ## Architecture
//!
//! ```text
//!   fd (+ requested access)
//!          │
//!          ▼
//!   AccessPrecheck
//!   DescriptorValidity     ── DescriptorProbe (fcntl F_GETFL, EINTR retry)
//!   AccessReconciliation   ── access::translate
//!   RecordAssembly         ── HandleRecord
//!   Registration           ── HandleTable::register
//!          │
//!          ▼
//!   Handle | (Handle::INVALID, ErrorCode)
//! ```
//!
//! The handle table, descriptor probe and OS error translator are injected
//! collaborators; defaults are provided for each.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod handles;
pub mod os_error;
pub mod types;

// Internal utilities
pub mod observability;

pub use handles::{
    AccessRights, HandleFactory, HandleKind, HandleRecord, HandleTable, HostCapabilities,
    SlotHandleTable, StandardStream,
};
pub use types::{Config, Error, ErrorCode, Handle, NativeDescriptor, RawOutcome, Result};
