//! Remote stacks backed by the Stackline service.
//!
//! Provides:
//! - `ServiceClient`, the HTTP client for the service API
//! - `CloudBackend` and its service implementation, `ServiceBackend`
//! - `CloudStack`, a stack rebuilt from the service's record of it

pub mod backend;
pub mod client;
pub mod error;
pub mod snapshot;
pub mod stack;

pub use backend::{CloudBackend, ServiceBackend, cloud_console_url};
pub use client::ServiceClient;
pub use error::{CloudError, CloudResult};
pub use snapshot::build_snapshot;
pub use stack::{CloudStack, CloudStackReference, MANAGED_CLOUD_NAME};
