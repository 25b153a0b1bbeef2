//! Stored service credentials.
//!
//! The credentials file lists the service endpoints a user has logged into
//! and which one is current:
//!
//! ```kdl
//! current "https://api.stackline.io"
//!
//! account "https://api.stackline.io" token="sl-abc123"
//! account "https://api.internal.example.com" token="sl-def456" console-domain="console.example.com"
//! ```

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A single logged-in service endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub access_token: Option<String>,
    /// Overrides the console host derived from the API URL.
    pub console_domain: Option<String>,
}

/// All stored credentials, keyed by API URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// The endpoint commands target when none is given.
    pub current: Option<String>,
    pub accounts: HashMap<String, Account>,
}

impl Credentials {
    pub fn account(&self, cloud_url: &str) -> Option<&Account> {
        self.accounts.get(normalize_url(cloud_url))
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current.as_deref().and_then(|url| self.account(url))
    }
}

/// Parse credentials from KDL text.
pub fn parse_credentials(kdl: &str) -> ConfigResult<Credentials> {
    let doc: KdlDocument = kdl.parse()?;
    let mut credentials = Credentials::default();

    for node in doc.nodes() {
        match node.name().value() {
            "current" => {
                let url = get_first_string_arg(node)
                    .ok_or_else(|| ConfigError::MissingField("current URL".to_string()))?;
                credentials.current = Some(normalize_url(&url).to_string());
            }
            "account" => {
                let (url, account) = parse_account(node)?;
                if credentials.accounts.contains_key(&url) {
                    return Err(ConfigError::Duplicate(format!("account '{}'", url)));
                }
                credentials.accounts.insert(url, account);
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(credentials)
}

/// Load credentials from a file. A missing file means no credentials yet.
pub fn load_credentials(path: &Path) -> ConfigResult<Credentials> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_credentials(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Credentials::default()),
        Err(e) => Err(e.into()),
    }
}

fn parse_account(node: &KdlNode) -> ConfigResult<(String, Account)> {
    let url = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::MissingField("account URL".to_string()))?;

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            field: "account URL".to_string(),
            message: format!("'{}' is not an http(s) URL", url),
        });
    }

    let account = Account {
        access_token: get_string_prop(node, "token"),
        console_domain: get_string_prop(node, "console-domain"),
    };

    Ok((normalize_url(&url).to_string(), account))
}

pub(crate) fn normalize_url(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
