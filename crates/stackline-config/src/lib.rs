//! Configuration for Stackline backends.
//!
//! This crate handles:
//! - Parsing the KDL credentials file
//! - Resolving backend settings from credentials and the environment

pub mod credentials;
pub mod error;
pub mod settings;

pub use credentials::{Account, Credentials, load_credentials, parse_credentials};
pub use error::{ConfigError, ConfigResult};
pub use settings::{BackendSettings, DEFAULT_CLOUD_URL};
