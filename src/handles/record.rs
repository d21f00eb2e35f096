//! Handle kinds and the record registered for each handle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::access::AccessRights;
use crate::types::NativeDescriptor;

/// Category of resource a handle refers to. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum HandleKind {
    Pipe,
    Console,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Pipe => write!(f, "pipe"),
            HandleKind::Console => write!(f, "console"),
        }
    }
}

/// Security attributes placeholder. Carried through, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityAttributes(pub u32);

/// Share mode placeholder. Carried through, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareMode(pub u32);

/// Attribute flags placeholder. Carried through, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeFlags(pub u32);

/// Payload stored in the handle table.
///
/// Built in one step with every field set; there are no setters, so a record
/// handed to the table is never observed half-initialized or mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleRecord {
    fd: NativeDescriptor,
    access: AccessRights,
    name: String,
    security_attributes: SecurityAttributes,
    share_mode: ShareMode,
    attributes: AttributeFlags,
}

impl HandleRecord {
    /// Record with zeroed security, share-mode and attribute placeholders.
    pub fn new(fd: NativeDescriptor, access: AccessRights, name: impl Into<String>) -> Self {
        Self {
            fd,
            access,
            name: name.into(),
            security_attributes: SecurityAttributes::default(),
            share_mode: ShareMode::default(),
            attributes: AttributeFlags::default(),
        }
    }

    /// Display name for an anonymous pipe endpoint, e.g. `<PIPE:3>`.
    pub fn pipe_name(fd: NativeDescriptor) -> String {
        format!("<PIPE:{}>", fd)
    }

    pub fn fd(&self) -> NativeDescriptor {
        self.fd
    }

    pub fn access(&self) -> AccessRights {
        self.access
    }

    /// Diagnostic name only.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn security_attributes(&self) -> SecurityAttributes {
        self.security_attributes
    }

    pub fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    pub fn attributes(&self) -> AttributeFlags {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroes_placeholders() {
        let record = HandleRecord::new(3, AccessRights::Read, HandleRecord::pipe_name(3));
        assert_eq!(record.fd(), 3);
        assert_eq!(record.access(), AccessRights::Read);
        assert_eq!(record.name(), "<PIPE:3>");
        assert_eq!(record.security_attributes(), SecurityAttributes(0));
        assert_eq!(record.share_mode(), ShareMode(0));
        assert_eq!(record.attributes(), AttributeFlags(0));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(HandleKind::Pipe.to_string(), "pipe");
        assert_eq!(HandleKind::Console.to_string(), "console");
    }
}
