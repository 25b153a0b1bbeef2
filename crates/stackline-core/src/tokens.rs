//! Names and identifiers shared across the stack model.

use derive_more::Display;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{Error, Result};

/// Longest stack name the service accepts.
pub const MAX_STACK_NAME_LEN: usize = 100;

static STACK_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

/// A stack's short name, unique within its owner's namespace.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct QName(String);

impl QName {
    /// Wrap a name without validation. Used for records the service has already accepted.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse a user-supplied stack name.
    ///
    /// Names may only contain alphanumerics, hyphens, underscores, or periods.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::InvalidInput("stack name cannot be empty".to_string()));
        }
        if name.len() > MAX_STACK_NAME_LEN {
            return Err(Error::InvalidInput(format!(
                "stack name '{}' is longer than {} characters",
                name, MAX_STACK_NAME_LEN
            )));
        }
        if !STACK_NAME_REGEX.is_match(name) {
            return Err(Error::InvalidInput(format!(
                "stack name '{}' may only contain alphanumeric, hyphens, underscores, or periods",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for QName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A resource's unique name.
///
/// Shaped `urn:<ns>:<stack>::<project>::<qualified type>::<name>`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Urn(String);

impl Urn {
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits into `[<ns>:<stack>, <project>, <qualified type>, <name>]`.
    fn segments(&self) -> Option<[&str; 4]> {
        let rest = self.0.strip_prefix("urn:")?;
        let mut parts = rest.splitn(4, "::");
        Some([parts.next()?, parts.next()?, parts.next()?, parts.next()?])
    }

    /// Trailing name segment, or `None` if the URN is malformed.
    pub fn name(&self) -> Option<&str> {
        self.segments().map(|s| s[3])
    }

    /// Qualified type segment, or `None` if the URN is malformed.
    pub fn qualified_type(&self) -> Option<&str> {
        self.segments().map(|s| s[2])
    }
}

impl From<String> for Urn {
    fn from(urn: String) -> Self {
        Self(urn)
    }
}

impl From<&str> for Urn {
    fn from(urn: &str) -> Self {
        Self(urn.to_string())
    }
}

/// A resource type token, e.g. `aws:s3/bucket:Bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct TypeToken(String);

impl TypeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// The identifier a provider assigned to a custom resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::str::FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}
