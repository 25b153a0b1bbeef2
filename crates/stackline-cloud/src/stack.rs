//! Remote stacks.
//!
//! A [`CloudStack`] is a stack whose authoritative state lives in the
//! service. It is built once from the service's stack record and never
//! mutated afterwards: every lifecycle operation is handed to the
//! [`Dispatcher`] with the stack itself as the subject, and whatever the
//! dispatcher returns comes back unchanged.
//!
//! A stack holds only a weak handle to its backend. Lookups that go through
//! the backend (the current account, the console path) are best-effort
//! enrichment: when they fail, or the backend is gone, the stack falls back
//! to a plain answer instead of reporting an error.

use async_trait::async_trait;
use stackline_core::apitype::{ApiStack, UntypedDeployment};
use stackline_core::config::ConfigMap;
use stackline_core::engine::{ResourceChanges, UpdateOperation};
use stackline_core::operations::{LogEntry, LogQuery};
use stackline_core::{Dispatcher, Error, QName, Result, Snapshot, Stack, StackReference};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::backend::CloudBackend;
use crate::snapshot::build_snapshot;

/// The cloud that owns an organization's managed stacks. Engine operations
/// for stacks in this cloud run on the caller's machine.
pub const MANAGED_CLOUD_NAME: &str = "stackline";

/// A stack's owner-qualified name.
#[derive(Debug, Clone)]
pub struct CloudStackReference {
    owner: String,
    name: QName,
    backend: Weak<dyn CloudBackend>,
}

impl CloudStackReference {
    pub fn new(owner: impl Into<String>, name: QName, backend: &Arc<dyn CloudBackend>) -> Self {
        Self {
            owner: owner.into(),
            name,
            backend: Arc::downgrade(backend),
        }
    }

    /// The organization or user that owns the stack.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Always `owner/name`.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The current account name, or `None` if it cannot be determined.
    async fn current_account(&self) -> Option<String> {
        let Some(backend) = self.backend.upgrade() else {
            debug!(stack = %self, "Backend dropped; cannot resolve current account");
            return None;
        };

        match backend.current_account_name().await {
            Ok(name) => Some(name),
            Err(e) => {
                debug!(stack = %self, error = %e, "Failed to resolve current account");
                None
            }
        }
    }
}

impl fmt::Display for CloudStackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[async_trait]
impl StackReference for CloudStackReference {
    fn stack_name(&self) -> &QName {
        &self.name
    }

    /// The bare name when the stack belongs to the current account,
    /// otherwise `owner/name`. The account is looked up on every call.
    async fn display_name(&self) -> String {
        match self.current_account().await {
            Some(account) if account == self.owner => self.name.to_string(),
            _ => self.qualified_name(),
        }
    }
}

/// A stack whose state lives in the service.
pub struct CloudStack {
    reference: CloudStackReference,
    cloud_url: String,
    org_name: String,
    project_name: String,
    cloud_name: String,
    /// Not fetched from the service yet.
    config: Option<ConfigMap>,
    snapshot: Snapshot,
    backend: Weak<dyn CloudBackend>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl CloudStack {
    /// Build a stack from the service's record of it.
    pub fn new(
        record: ApiStack,
        backend: &Arc<dyn CloudBackend>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        let snapshot = build_snapshot(record.resources);

        Self {
            reference: CloudStackReference::new(record.org_name.clone(), record.stack_name, backend),
            cloud_url: backend.cloud_url().to_string(),
            org_name: record.org_name,
            project_name: record.project_name,
            cloud_name: record.cloud_name,
            config: None,
            snapshot,
            backend: Arc::downgrade(backend),
            dispatcher,
        }
    }

    pub fn cloud_reference(&self) -> &CloudStackReference {
        &self.reference
    }

    /// The owning backend, if it is still alive.
    pub fn backend(&self) -> Option<Arc<dyn CloudBackend>> {
        self.backend.upgrade()
    }

    /// URL of the service holding this stack.
    pub fn cloud_url(&self) -> &str {
        &self.cloud_url
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The cloud in which this stack's operations run.
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// True if previews, updates and destroys for this stack run locally.
    pub fn run_locally(&self) -> bool {
        self.cloud_name == MANAGED_CLOUD_NAME
    }

    /// URL of this stack's page in the web console.
    ///
    /// A failed console path lookup yields an empty URL and no error. A path
    /// the backend cannot turn into a full URL is an error.
    pub async fn console_url(&self) -> Result<String> {
        let Some(backend) = self.backend.upgrade() else {
            debug!(stack = %self.reference, "Backend dropped; no console URL");
            return Ok(String::new());
        };

        let path = match backend.stack_console_path(&self.reference).await {
            Ok(path) => path,
            Err(e) => {
                debug!(stack = %self.reference, error = %e, "Console path lookup failed");
                return Ok(String::new());
            }
        };

        let url = backend.cloud_console_url(&path);
        if url.is_empty() {
            return Err(Error::ConsoleUrlUnavailable);
        }
        Ok(url)
    }
}

impl fmt::Debug for CloudStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudStack")
            .field("reference", &self.reference)
            .field("cloud_url", &self.cloud_url)
            .field("org_name", &self.org_name)
            .field("project_name", &self.project_name)
            .field("cloud_name", &self.cloud_name)
            .field("resources", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stack for CloudStack {
    fn reference(&self) -> &dyn StackReference {
        &self.reference
    }

    fn config(&self) -> Option<&ConfigMap> {
        self.config.as_ref()
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        Some(&self.snapshot)
    }

    async fn preview(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges> {
        debug!(stack = %self.reference, "Dispatching preview");
        self.dispatcher.preview_stack(self, op).await
    }

    async fn update(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges> {
        debug!(stack = %self.reference, "Dispatching update");
        self.dispatcher.update_stack(self, op).await
    }

    async fn refresh(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges> {
        debug!(stack = %self.reference, "Dispatching refresh");
        self.dispatcher.refresh_stack(self, op).await
    }

    async fn destroy(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges> {
        debug!(stack = %self.reference, "Dispatching destroy");
        self.dispatcher.destroy_stack(self, op).await
    }

    async fn remove(&self, force: bool) -> Result<bool> {
        debug!(stack = %self.reference, force, "Dispatching remove");
        self.dispatcher.remove_stack(self, force).await
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        debug!(stack = %self.reference, "Dispatching get logs");
        self.dispatcher.get_stack_logs(self, query).await
    }

    async fn export_deployment(&self) -> Result<UntypedDeployment> {
        debug!(stack = %self.reference, "Dispatching export");
        self.dispatcher.export_stack_deployment(self).await
    }

    async fn import_deployment(&self, deployment: &UntypedDeployment) -> Result<()> {
        debug!(stack = %self.reference, version = deployment.version, "Dispatching import");
        self.dispatcher
            .import_stack_deployment(self, deployment)
            .await
    }
}
