//! Stack and dispatcher traits.
//!
//! A [`Stack`] is anything that carries a deployment's identity and state
//! and can be handed to a [`Dispatcher`], which runs the engine against it.
//! Futures returned from these traits are cancelled by dropping them.

use async_trait::async_trait;
use std::fmt;

use crate::apitype::UntypedDeployment;
use crate::config::ConfigMap;
use crate::engine::{ResourceChanges, UpdateOperation};
use crate::operations::{LogEntry, LogQuery};
use crate::snapshot::Snapshot;
use crate::tokens::QName;
use crate::Result;

/// A name that identifies a stack to its backend.
#[async_trait]
pub trait StackReference: fmt::Debug + Send + Sync {
    /// The stack's short name.
    fn stack_name(&self) -> &QName;

    /// The name to show a user. May consult the backend to decide how much
    /// qualification is needed, so it is resolved on every call.
    async fn display_name(&self) -> String;
}

/// A single cancellation scope opened for one operation.
pub trait CancellationScope: Send + Sync {
    /// True once the user asked for a graceful cancel.
    fn cancel_requested(&self) -> bool;

    /// True once the user asked to stop immediately.
    fn terminate_requested(&self) -> bool;

    /// Release the scope.
    fn close(&self);
}

/// Opens cancellation scopes for engine operations.
pub trait CancellationScopeSource: Send + Sync {
    fn new_scope(&self, is_preview: bool) -> Box<dyn CancellationScope>;
}

/// A deployment and its lifecycle operations.
///
/// Implementations are safe to read from concurrently. Concurrent mutating
/// operations on one stack are not serialized here; that is the
/// dispatcher's responsibility.
#[async_trait]
pub trait Stack: Send + Sync {
    fn reference(&self) -> &dyn StackReference;

    /// The stack's config bag, if it has been loaded.
    fn config(&self) -> Option<&ConfigMap>;

    /// The latest known deployment state.
    fn snapshot(&self) -> Option<&Snapshot>;

    /// Compute an execution plan without applying it.
    async fn preview(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges>;

    /// Apply pending changes.
    async fn update(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges>;

    /// Reconcile recorded state with the real resources.
    async fn refresh(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges>;

    /// Tear down every managed resource.
    async fn destroy(&self, op: UpdateOperation<'_>) -> Result<ResourceChanges>;

    /// Remove the stack itself. `force` skips the dispatcher's safety checks.
    async fn remove(&self, force: bool) -> Result<bool>;

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>>;

    async fn export_deployment(&self) -> Result<UntypedDeployment>;

    async fn import_deployment(&self, deployment: &UntypedDeployment) -> Result<()>;
}

/// Runs engine operations on behalf of a stack.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn preview_stack(
        &self,
        stack: &dyn Stack,
        op: UpdateOperation<'_>,
    ) -> Result<ResourceChanges>;

    async fn update_stack(
        &self,
        stack: &dyn Stack,
        op: UpdateOperation<'_>,
    ) -> Result<ResourceChanges>;

    async fn refresh_stack(
        &self,
        stack: &dyn Stack,
        op: UpdateOperation<'_>,
    ) -> Result<ResourceChanges>;

    async fn destroy_stack(
        &self,
        stack: &dyn Stack,
        op: UpdateOperation<'_>,
    ) -> Result<ResourceChanges>;

    async fn remove_stack(&self, stack: &dyn Stack, force: bool) -> Result<bool>;

    async fn get_stack_logs(&self, stack: &dyn Stack, query: &LogQuery) -> Result<Vec<LogEntry>>;

    async fn export_stack_deployment(&self, stack: &dyn Stack) -> Result<UntypedDeployment>;

    async fn import_stack_deployment(
        &self,
        stack: &dyn Stack,
        deployment: &UntypedDeployment,
    ) -> Result<()>;
}
