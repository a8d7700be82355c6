use crate::{context::MigrationContext, error::TaskError};
use async_trait::async_trait;

/// A one-shot setup/teardown action outside the record-streaming path.
///
/// Tasks run synchronously to completion from the orchestrator's point of
/// view; a long-running task blocks the whole run. Idempotency is the
/// concrete task's responsibility; the engine never retries or dedupes.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    /// Execute the task. `Ok(None)` means the default "OK" outcome;
    /// `Ok(Some(text))` is a human-readable result reported as-is.
    async fn execute(&self, ctx: &MigrationContext) -> Result<Option<String>, TaskError>;
}
