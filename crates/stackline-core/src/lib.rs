//! Core domain types and traits for Stackline.
//!
//! This crate contains:
//! - Stack names, URNs and other tokens
//! - Resource state, property values and snapshots
//! - Records exchanged with the remote service
//! - Engine argument and summary types
//! - The `Stack`, `StackReference` and `Dispatcher` traits

pub mod apitype;
pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod operations;
pub mod resource;
pub mod snapshot;
pub mod tokens;

pub use backend::{CancellationScope, CancellationScopeSource, Dispatcher, Stack, StackReference};
pub use error::{Error, Result};
pub use snapshot::{Manifest, Snapshot};
pub use tokens::{QName, ResourceId, TypeToken, Urn};
