//! Handle factory for pipe endpoints and standard streams.
//!
//! Every creation call runs the same stages, each of which can end the call:
//!
//! ```text
//! AccessPrecheck → DescriptorValidity → AccessReconciliation → RecordAssembly → Registration
//! ```
//!
//! Nothing outside the call is touched before Registration, so a failure at
//! any stage needs no rollback. The record is fully built before the single
//! `register` call.

use std::fmt;
use std::os::raw::c_int;
use std::sync::Arc;

use super::access::{self, AccessRights};
use super::probe::{DescriptorProbe, FcntlProbe, HostCapabilities};
use super::record::{HandleKind, HandleRecord};
use super::standard::{self, StandardStream};
use super::table::{HandleTable, SlotHandleTable};
use crate::os_error::{OsErrorTranslator, PosixErrorTranslator};
use crate::types::{Config, Error, ErrorCode, Handle, NativeDescriptor, Result};

/// Builds handles over native descriptors and registers them with the table.
///
/// Holds no mutable state of its own; concurrent calls on distinct
/// descriptors are independent.
#[derive(Clone)]
pub struct HandleFactory {
    table: Arc<dyn HandleTable>,
    probe: Arc<dyn DescriptorProbe>,
    errors: Arc<dyn OsErrorTranslator>,
    capabilities: HostCapabilities,
}

impl fmt::Debug for HandleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleFactory")
            .field("table", &self.table)
            .field("errors", &self.errors)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl HandleFactory {
    /// Factory with the `fcntl` probe, POSIX error translation and detected
    /// host capabilities.
    pub fn new(table: Arc<dyn HandleTable>) -> Self {
        Self {
            table,
            probe: Arc::new(FcntlProbe),
            errors: Arc::new(PosixErrorTranslator),
            capabilities: HostCapabilities::detect(),
        }
    }

    /// Factory over a fresh [`SlotHandleTable`] sized and configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let table = Arc::new(SlotHandleTable::with_capacity(config.table.capacity));
        Self::new(table).with_capabilities(HostCapabilities::resolve(config))
    }

    pub fn with_probe(mut self, probe: Arc<dyn DescriptorProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_error_translator(mut self, errors: Arc<dyn OsErrorTranslator>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn table(&self) -> &Arc<dyn HandleTable> {
        &self.table
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Wrap one end of an anonymous pipe.
    ///
    /// `requested` must be exactly `Read` or `Write`. With descriptor
    /// introspection the OS-reported mode must match it; the OS is treated
    /// as ground truth.
    pub fn create_pipe_handle(
        &self,
        fd: NativeDescriptor,
        requested: AccessRights,
    ) -> Result<Handle> {
        if !requested.is_single_direction() {
            tracing::debug!(
                "rejecting pipe handle request: fd={}, requested={:?}",
                fd,
                requested
            );
            return Err(Error::UnsupportedOperation { requested });
        }

        tracing::debug!("creating pipe handle: fd={}", fd);

        let access = if self.capabilities.has_descriptor_introspection {
            let actual = access::translate(self.validate(fd)?);
            if actual != requested {
                tracing::debug!(
                    "pipe mode mismatch: fd={}, actual={:?}, requested={:?}",
                    fd,
                    actual,
                    requested
                );
                return Err(Error::DataMismatch {
                    fd,
                    requested,
                    actual,
                });
            }
            actual
        } else {
            requested
        };

        let record = HandleRecord::new(fd, access, HandleRecord::pipe_name(fd));
        self.register(HandleKind::Pipe, record)
    }

    /// Wrap an inherited standard stream under `name`.
    ///
    /// The input descriptor never carries write access.
    pub fn create_standard_handle(&self, fd: NativeDescriptor, name: &str) -> Result<Handle> {
        tracing::debug!("creating standard handle: name={}, fd={}", name, fd);

        let access = if self.capabilities.has_descriptor_introspection {
            access::translate(self.validate(fd)?)
        } else {
            standard::assumed_access(fd)
        };
        let access = standard::restrict_input(fd, access);

        let record = HandleRecord::new(fd, access, name);
        self.register(HandleKind::Console, record)
    }

    /// Wrap one of the canonical standard streams under its default name.
    pub fn create_standard_stream(&self, stream: StandardStream) -> Result<Handle> {
        self.create_standard_handle(stream.fd(), stream.display_name())
    }

    /// Wrap input, output and error, in that order. Each stream succeeds or
    /// fails on its own.
    pub fn create_standard_streams(&self) -> [(StandardStream, Result<Handle>); 3] {
        StandardStream::ALL.map(|stream| (stream, self.create_standard_stream(stream)))
    }

    /// Map a host errno through the configured translator.
    pub fn translate_os_error(&self, errno: i32) -> ErrorCode {
        self.errors.translate(errno)
    }

    fn validate(&self, fd: NativeDescriptor) -> Result<c_int> {
        self.probe.probe(fd).map_err(|e| {
            tracing::debug!("descriptor probe failed: fd={}, error={}", fd, e);
            let (errno, code) = match e.raw_os_error() {
                Some(errno) => (errno, self.errors.translate(errno)),
                None => (0, ErrorCode::InvalidHandle),
            };
            Error::InvalidHandle { fd, code, errno }
        })
    }

    fn register(&self, kind: HandleKind, record: HandleRecord) -> Result<Handle> {
        let fd = record.fd();
        match self.table.register(kind, record) {
            Ok(handle) => {
                tracing::debug!("registered {} handle {} for fd={}", kind, handle, fd);
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!("failed to register {} handle: fd={}, error={}", kind, fd, e);
                Err(Error::resource_exhaustion(format!(
                    "{} handle for fd {}: {}",
                    kind, fd, e
                )))
            }
        }
    }
}
