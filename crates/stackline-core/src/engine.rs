//! Vocabulary shared with the orchestration engine.
//!
//! The engine itself lives elsewhere; these are the argument and summary
//! types that flow through a stack on their way to it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::backend::CancellationScopeSource;

/// The kind of step the engine took (or would take) for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOp {
    Same,
    Create,
    Update,
    Delete,
    Replace,
    CreateReplacement,
    DeleteReplaced,
    Read,
    Refresh,
}

impl std::fmt::Display for StepOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOp::Same => write!(f, "same"),
            StepOp::Create => write!(f, "create"),
            StepOp::Update => write!(f, "update"),
            StepOp::Delete => write!(f, "delete"),
            StepOp::Replace => write!(f, "replace"),
            StepOp::CreateReplacement => write!(f, "create-replacement"),
            StepOp::DeleteReplaced => write!(f, "delete-replaced"),
            StepOp::Read => write!(f, "read"),
            StepOp::Refresh => write!(f, "refresh"),
        }
    }
}

/// Per-step counts summarizing an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceChanges(BTreeMap<StepOp, usize>);

impl ResourceChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, op: StepOp, count: usize) {
        *self.0.entry(op).or_default() += count;
    }

    pub fn count(&self, op: StepOp) -> usize {
        self.0.get(&op).copied().unwrap_or_default()
    }

    /// True if any step other than `same` has a non-zero count.
    pub fn has_changes(&self) -> bool {
        self.0
            .iter()
            .any(|(op, count)| *op != StepOp::Same && *count > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepOp, usize)> + '_ {
        self.0.iter().map(|(op, count)| (*op, *count))
    }
}

impl FromIterator<(StepOp, usize)> for ResourceChanges {
    fn from_iter<I: IntoIterator<Item = (StepOp, usize)>>(iter: I) -> Self {
        let mut changes = Self::new();
        for (op, count) in iter {
            changes.record(op, count);
        }
        changes
    }
}

/// The project a stack deploys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub runtime: String,
    pub description: Option<String>,
}

/// Descriptive metadata attached to an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMetadata {
    pub message: String,
    pub environment: HashMap<String, String>,
}

/// How progress is rendered while an operation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_config: bool,
    pub show_replacement_steps: bool,
    pub show_sames: bool,
    pub summary_only: bool,
    pub color: bool,
}

/// Knobs for preview/update/refresh/destroy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOptions {
    pub analyzers: Vec<String>,
    /// Maximum concurrent resource operations; 0 lets the engine decide.
    pub parallel: usize,
    pub debug: bool,
    pub auto_approve: bool,
    pub skip_preview: bool,
    pub display: DisplayOptions,
}

/// The per-call arguments of an update-style operation.
#[derive(Clone, Copy)]
pub struct UpdateOperation<'a> {
    pub project: &'a Project,
    pub root: &'a Path,
    pub metadata: &'a UpdateMetadata,
    pub options: &'a UpdateOptions,
    pub scopes: &'a dyn CancellationScopeSource,
}

impl std::fmt::Debug for UpdateOperation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateOperation")
            .field("project", &self.project.name)
            .field("root", &self.root)
            .field("metadata", &self.metadata)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
