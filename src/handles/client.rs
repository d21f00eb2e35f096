//! Anonymous pipe client endpoints.
//!
//! A pipe server passes its client a handle string of comma-separated
//! descriptor ids. The first id is the communication descriptor, the second
//! a disposal descriptor used to detect the peer going away, and for an
//! outbound client a third drain descriptor used to wait for the reader.
//! The server side lives in [`super::server`].

use serde::{Deserialize, Serialize};

use super::access::AccessRights;
use super::factory::HandleFactory;
use super::table::HandleTable;
use crate::types::{Error, Handle, NativeDescriptor, Result};

/// Direction of the client's communication descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeDirection {
    In,
    Out,
}

impl PipeDirection {
    pub fn access(self) -> AccessRights {
        match self {
            PipeDirection::In => AccessRights::Read,
            PipeDirection::Out => AccessRights::Write,
        }
    }

    /// Number of descriptor ids the handle string carries.
    pub fn descriptor_count(self) -> usize {
        match self {
            PipeDirection::In => 2,
            PipeDirection::Out => 3,
        }
    }
}

/// Handles making up one client endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeEndpoint {
    pub direction: PipeDirection,
    pub handle: Handle,
    pub disposal: Handle,
    /// Present only for `Out` endpoints.
    pub drain: Option<Handle>,
}

impl PipeEndpoint {
    pub fn handles(&self) -> impl Iterator<Item = Handle> {
        [Some(self.handle), Some(self.disposal), self.drain]
            .into_iter()
            .flatten()
    }
}

/// Format descriptor ids as a handle string.
pub fn format_handle_string(fds: &[NativeDescriptor]) -> String {
    fds.iter()
        .map(|fd| fd.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a handle string, checking its length against `direction`.
pub fn parse_handle_string(
    direction: PipeDirection,
    handle_str: &str,
) -> Result<Vec<NativeDescriptor>> {
    if handle_str.trim().is_empty() {
        return Err(Error::validation("pipe handle string is empty"));
    }

    let fds = handle_str
        .split(',')
        .map(|part| {
            part.trim().parse::<NativeDescriptor>().map_err(|_| {
                Error::validation(format!("invalid descriptor {:?} in pipe handle string", part))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if fds.len() != direction.descriptor_count() {
        return Err(Error::validation(format!(
            "{:?} pipe handle string needs {} descriptors, got {}",
            direction,
            direction.descriptor_count(),
            fds.len()
        )));
    }
    Ok(fds)
}

/// Wrap the descriptors named by `handle_str` as a client endpoint.
///
/// Communication and disposal descriptors take the direction's access; the
/// drain descriptor is always read. If any handle fails, those already
/// registered for this endpoint are released before returning.
pub fn open_client_endpoint(
    factory: &HandleFactory,
    direction: PipeDirection,
    handle_str: &str,
) -> Result<PipeEndpoint> {
    let fds = parse_handle_string(direction, handle_str)?;
    let descriptors: Vec<_> = fds
        .iter()
        .enumerate()
        .map(|(i, &fd)| {
            let access = if i == 2 {
                AccessRights::Read
            } else {
                direction.access()
            };
            (fd, access)
        })
        .collect();
    register_endpoint(factory, direction, &descriptors)
}

/// Register `(fd, access)` pairs in endpoint order: communication, disposal,
/// then the optional drain. On failure every handle registered so far is
/// released.
pub(super) fn register_endpoint(
    factory: &HandleFactory,
    direction: PipeDirection,
    descriptors: &[(NativeDescriptor, AccessRights)],
) -> Result<PipeEndpoint> {
    if !(2..=3).contains(&descriptors.len()) {
        return Err(Error::validation(format!(
            "pipe endpoint needs 2 or 3 descriptors, got {}",
            descriptors.len()
        )));
    }

    let mut handles = Vec::with_capacity(descriptors.len());
    for (i, &(fd, access)) in descriptors.iter().enumerate() {
        match factory.create_pipe_handle(fd, access) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                tracing::debug!(
                    "pipe endpoint failed at descriptor {} (fd={}): {}",
                    i,
                    fd,
                    e
                );
                for handle in handles {
                    factory.table().release(handle);
                }
                return Err(e);
            }
        }
    }

    Ok(PipeEndpoint {
        direction,
        handle: handles[0],
        disposal: handles[1],
        drain: handles.get(2).copied(),
    })
}
