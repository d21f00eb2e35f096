//! Core types for the handle layer.
//!
//! This module provides foundational types used throughout the crate:
//! - **IDs**: The opaque `Handle` and the native descriptor id
//! - **Errors**: Error enum with thiserror derives and the unified error codes
//! - **Config**: Host capability, table and observability configuration

mod config;
mod errors;
mod ids;

pub use config::{Config, HostConfig, ObservabilityConfig, TableConfig};
pub use errors::{Error, ErrorCode, RawOutcome, Result};
pub use ids::{Handle, NativeDescriptor};
