//! Deployment snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::resource::ResourceState;
use crate::tokens::Urn;
use crate::{Error, Result};

/// Metadata describing how and when a snapshot was produced.
///
/// Snapshots rebuilt from service records carry the empty default; the
/// service does not report time, version or plugin information yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub time: Option<DateTime<Utc>>,
    pub magic: Option<String>,
    pub version: Option<String>,
    pub plugins: Vec<PluginInfo>,
}

/// A plugin recorded in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub kind: String,
    pub version: Option<String>,
}

/// The last known set of managed resources, in creation/dependency order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    manifest: Manifest,
    resources: Vec<ResourceState>,
}

impl Snapshot {
    pub fn new(manifest: Manifest, resources: Vec<ResourceState>) -> Self {
        Self {
            manifest,
            resources,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn resources(&self) -> &[ResourceState] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Find the live (not pending-delete) resource with this URN.
    pub fn find(&self, urn: &Urn) -> Option<&ResourceState> {
        self.resources.iter().find(|r| !r.delete && &r.urn == urn)
    }

    /// Check that the resource order is self-consistent.
    ///
    /// Parents and dependencies must appear before the resources that
    /// reference them, and live URNs must be unique.
    pub fn verify_integrity(&self) -> Result<()> {
        let mut seen: HashSet<&Urn> = HashSet::new();
        let mut live: HashSet<&Urn> = HashSet::new();

        for res in &self.resources {
            if let Some(parent) = &res.parent {
                if !seen.contains(parent) {
                    return Err(Error::Integrity(format!(
                        "resource {} refers to unknown parent {}",
                        res.urn, parent
                    )));
                }
            }

            for dep in &res.dependencies {
                if !seen.contains(dep) {
                    return Err(Error::Integrity(format!(
                        "resource {} depends on {}, which does not precede it",
                        res.urn, dep
                    )));
                }
            }

            if !res.delete && !live.insert(&res.urn) {
                return Err(Error::Integrity(format!("duplicate resource {}", res.urn)));
            }
            seen.insert(&res.urn);
        }

        Ok(())
    }
}
