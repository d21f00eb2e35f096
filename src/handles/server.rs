//! Anonymous pipe server endpoints.
//!
//! The server creates a communication pipe and a disposal pipe, keeps one end
//! of each and hands the other ends to its client as a handle string (see
//! [`super::client`]). Whichever side writes also gets a drain handle on the
//! reader's communication descriptor.

use std::os::unix::io::{AsRawFd, IntoRawFd, OwnedFd};

use super::access::AccessRights;
use super::client::{format_handle_string, register_endpoint, PipeDirection, PipeEndpoint};
use super::factory::HandleFactory;
use crate::types::{Error, NativeDescriptor, Result};

/// Both ends of one anonymous pipe.
#[derive(Debug)]
struct PipePair {
    read: OwnedFd,
    write: OwnedFd,
}

impl PipePair {
    fn create(factory: &HandleFactory) -> Result<Self> {
        let (read, write) = nix::unistd::pipe().map_err(|errno| {
            let errno = errno as i32;
            tracing::warn!("pipe creation failed: errno={}", errno);
            Error::PipeCreation {
                code: factory.translate_os_error(errno),
                errno,
            }
        })?;
        Ok(Self { read, write })
    }

    fn end(&self, access: AccessRights) -> NativeDescriptor {
        if access.can_read() {
            self.read.as_raw_fd()
        } else {
            self.write.as_raw_fd()
        }
    }

    /// Give up ownership; the descriptors stay open for the registered
    /// handles and the client.
    fn leak(self) {
        let _ = self.read.into_raw_fd();
        let _ = self.write.into_raw_fd();
    }
}

fn peer_access(direction: PipeDirection) -> AccessRights {
    match direction {
        PipeDirection::In => AccessRights::Write,
        PipeDirection::Out => AccessRights::Read,
    }
}

/// Create a pipe server endpoint.
///
/// `direction` is the server's own direction: an `In` server reads and its
/// client writes. Returns the server's registered handles and the handle
/// string to pass to the client, which opens it with the opposite direction.
///
/// On failure no handle stays registered and both pipes are closed. On
/// success the descriptors are left open; closing them is up to whoever
/// releases the handles and the client.
pub fn open_server_endpoint(
    factory: &HandleFactory,
    direction: PipeDirection,
) -> Result<(PipeEndpoint, String)> {
    let comm = PipePair::create(factory)?;
    let disposal = PipePair::create(factory)?;

    let server_access = direction.access();
    let client_access = peer_access(direction);

    let mut server_fds = vec![
        (comm.end(server_access), server_access),
        (disposal.end(server_access), server_access),
    ];
    let mut client_fds = vec![comm.end(client_access), disposal.end(client_access)];
    match direction {
        PipeDirection::Out => server_fds.push((comm.end(client_access), AccessRights::Read)),
        PipeDirection::In => client_fds.push(comm.end(server_access)),
    }

    tracing::debug!(
        "opening {:?} pipe server: comm={}/{}, disposal={}/{}",
        direction,
        comm.read.as_raw_fd(),
        comm.write.as_raw_fd(),
        disposal.read.as_raw_fd(),
        disposal.write.as_raw_fd()
    );

    let endpoint = register_endpoint(factory, direction, &server_fds)?;
    let handle_str = format_handle_string(&client_fds);

    comm.leak();
    disposal.leak();
    Ok((endpoint, handle_str))
}
