//! Descriptor validity probing.
//!
//! Confirms a native descriptor is open and reports its open-mode bits.
//! Whether a host can introspect descriptors at all is a [`HostCapabilities`]
//! decision made once, not a per-call fallback on error.

use std::io;
use std::os::raw::c_int;

#[cfg(unix)]
use nix::fcntl::{fcntl, FcntlArg};

use crate::types::{Config, NativeDescriptor};

/// Queries the host for a descriptor's open-mode bits.
///
/// An `Err` means the descriptor is not usable. Implementations absorb
/// `EINTR` themselves (see [`retry_on_interrupt`]).
#[cfg_attr(test, mockall::automock)]
pub trait DescriptorProbe: Send + Sync {
    fn probe(&self, fd: NativeDescriptor) -> io::Result<c_int>;
}

/// Re-issue `op` for as long as it fails with `ErrorKind::Interrupted`.
///
/// There is no retry bound and no cancellation: a caller that is interrupted
/// continuously stalls here. Callers needing bounded latency must impose a
/// timeout externally.
pub fn retry_on_interrupt<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    loop {
        match op() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// `fcntl(fd, F_GETFL)` probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct FcntlProbe;

#[cfg(unix)]
impl DescriptorProbe for FcntlProbe {
    fn probe(&self, fd: NativeDescriptor) -> io::Result<c_int> {
        // Errno::EINTR converts to ErrorKind::Interrupted, so the retry loop sees it.
        retry_on_interrupt(|| fcntl(fd, FcntlArg::F_GETFL).map_err(io::Error::from))
    }
}

#[cfg(not(unix))]
impl DescriptorProbe for FcntlProbe {
    fn probe(&self, _fd: NativeDescriptor) -> io::Result<c_int> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}

/// Host capability switch, resolved once and injected into the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host can query a descriptor's open mode.
    pub has_descriptor_introspection: bool,
}

impl HostCapabilities {
    /// A host with working descriptor introspection.
    pub const FULL: Self = Self {
        has_descriptor_introspection: true,
    };

    /// A sandboxed host where standard streams and pipes exist but cannot be queried.
    pub const LIMITED: Self = Self {
        has_descriptor_introspection: false,
    };

    pub fn detect() -> Self {
        if cfg!(unix) {
            Self::FULL
        } else {
            Self::LIMITED
        }
    }

    /// Configured value if present, otherwise [`HostCapabilities::detect`].
    pub fn resolve(config: &Config) -> Self {
        match config.host.descriptor_introspection {
            Some(has_descriptor_introspection) => Self {
                has_descriptor_introspection,
            },
            None => Self::detect(),
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_retry_absorbs_interrupts() {
        let calls = Cell::new(0);
        let result = retry_on_interrupt(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 4 {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_retry_stops_on_other_errors() {
        let calls = Cell::new(0);
        let result: io::Result<()> = retry_on_interrupt(|| {
            calls.set(calls.get() + 1);
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        });
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(calls.get(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_fcntl_probe_reports_open_mode() {
        use std::os::unix::io::AsRawFd;

        let file = tempfile::tempfile().unwrap();
        let flags = FcntlProbe.probe(file.as_raw_fd()).unwrap();
        assert_eq!(flags & libc::O_ACCMODE, libc::O_RDWR);
    }

    #[cfg(unix)]
    #[test]
    fn test_fcntl_probe_rejects_unopened_descriptor() {
        let err = FcntlProbe.probe(c_int::MAX).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EBADF));
    }

    #[test]
    fn test_capabilities_resolve() {
        let mut config = Config::default();
        assert_eq!(HostCapabilities::resolve(&config), HostCapabilities::detect());

        config.host.descriptor_introspection = Some(false);
        assert_eq!(HostCapabilities::resolve(&config), HostCapabilities::LIMITED);

        config.host.descriptor_introspection = Some(true);
        assert_eq!(HostCapabilities::resolve(&config), HostCapabilities::FULL);
    }
}
