//! Inherited standard streams.

use serde::{Deserialize, Serialize};

use super::access::AccessRights;
use crate::types::NativeDescriptor;

/// Canonical input descriptor.
pub const STDIN_FD: NativeDescriptor = 0;
/// Canonical output descriptor.
pub const STDOUT_FD: NativeDescriptor = 1;
/// Canonical error descriptor.
pub const STDERR_FD: NativeDescriptor = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardStream {
    Input,
    Output,
    Error,
}

impl StandardStream {
    pub const ALL: [StandardStream; 3] = [
        StandardStream::Input,
        StandardStream::Output,
        StandardStream::Error,
    ];

    pub fn fd(self) -> NativeDescriptor {
        match self {
            StandardStream::Input => STDIN_FD,
            StandardStream::Output => STDOUT_FD,
            StandardStream::Error => STDERR_FD,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StandardStream::Input => "<stdin>",
            StandardStream::Output => "<stdout>",
            StandardStream::Error => "<stderr>",
        }
    }
}

/// Access assumed for a standard descriptor on a host that cannot introspect
/// descriptors: the input descriptor reads, anything else writes.
pub fn assumed_access(fd: NativeDescriptor) -> AccessRights {
    if fd == STDIN_FD {
        AccessRights::Read
    } else {
        AccessRights::Write
    }
}

/// Input is never writable through its handle, whatever mode the host reports.
pub fn restrict_input(fd: NativeDescriptor, access: AccessRights) -> AccessRights {
    if fd == STDIN_FD {
        access.without_write()
    } else {
        access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_descriptors() {
        assert_eq!(StandardStream::Input.fd(), 0);
        assert_eq!(StandardStream::Output.fd(), 1);
        assert_eq!(StandardStream::Error.fd(), 2);
        assert_eq!(StandardStream::Error.display_name(), "<stderr>");
    }

    #[test]
    fn test_assumed_access() {
        assert_eq!(assumed_access(STDIN_FD), AccessRights::Read);
        assert_eq!(assumed_access(STDOUT_FD), AccessRights::Write);
        assert_eq!(assumed_access(STDERR_FD), AccessRights::Write);
    }

    #[test]
    fn test_restrict_input_only_touches_stdin() {
        assert_eq!(restrict_input(STDIN_FD, AccessRights::ReadWrite), AccessRights::Read);
        assert_eq!(
            restrict_input(STDOUT_FD, AccessRights::ReadWrite),
            AccessRights::ReadWrite
        );
    }
}
