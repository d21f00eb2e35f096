//! Handle construction over native descriptors.
//!
//! - `access`: open-mode bits → [`AccessRights`]
//! - `probe`: descriptor liveness and the host capability switch
//! - `record`: [`HandleKind`] and the immutable [`HandleRecord`]
//! - `table`: the [`HandleTable`] seam and its default slot implementation
//! - `factory`: pipe and standard-stream handle creation
//! - `standard`, `client`, `server`: standard stream defaults and pipe endpoints

pub mod access;
pub mod client;
pub mod factory;
pub mod probe;
pub mod record;
#[cfg(unix)]
pub mod server;
pub mod standard;
pub mod table;

pub use access::{translate, AccessRights};
pub use client::{open_client_endpoint, PipeDirection, PipeEndpoint};
pub use factory::HandleFactory;
pub use probe::{DescriptorProbe, FcntlProbe, HostCapabilities};
pub use record::{HandleKind, HandleRecord};
#[cfg(unix)]
pub use server::open_server_endpoint;
pub use standard::StandardStream;
pub use table::{HandleTable, RegisteredHandle, RegistrationError, SlotHandleTable};
