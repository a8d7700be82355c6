use async_trait::async_trait;
use engine_core::{context::MigrationContext, error::TaskError, task::Task};
use futures::future::BoxFuture;
use std::{future::Future, path::PathBuf};

/// Closure-backed task, for setup/teardown steps small enough not to
/// deserve their own type.
pub struct FnTask {
    name: String,
    action: ActionFn,
}

type ActionFn =
    Box<dyn Fn(MigrationContext) -> BoxFuture<'static, Result<Option<String>, TaskError>> + Send + Sync>;

impl FnTask {
    pub fn new<F, Fut>(name: &str, action: F) -> Self
    where
        F: Fn(MigrationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, TaskError>> + Send + 'static,
    {
        FnTask {
            name: name.to_string(),
            action: Box::new(move |ctx| Box::pin(action(ctx))),
        }
    }
}

#[async_trait]
impl Task for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &MigrationContext) -> Result<Option<String>, TaskError> {
        (self.action)(ctx.clone()).await
    }
}

/// Creates a directory (and its parents) before file-based migrators write
/// into it. Safe to re-run: an existing directory is not an error.
pub struct EnsureDirTask {
    name: String,
    path: PathBuf,
}

impl EnsureDirTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        EnsureDirTask {
            name: format!("ensure_dir {}", path.display()),
            path,
        }
    }
}

#[async_trait]
impl Task for EnsureDirTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &MigrationContext) -> Result<Option<String>, TaskError> {
        tokio::fs::create_dir_all(&self.path).await?;
        Ok(Some(format!("ensured {}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::migration::Migration;
    use model::options::Options;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn ctx() -> MigrationContext {
        MigrationContext::new(Arc::new(Migration::builder().build()), "test", Options::new())
    }

    #[tokio::test]
    async fn fn_task_reports_its_result() {
        let task = FnTask::new("seed", |_ctx| async { Ok(Some("seeded 3 rows".into())) });
        let outcome = task.execute(&ctx()).await.expect("task runs");
        assert_eq!(outcome.as_deref(), Some("seeded 3 rows"));
    }

    #[tokio::test]
    async fn ensure_dir_creates_nested_directories() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("a/b/c");

        let task = EnsureDirTask::new(&nested);
        task.execute(&ctx()).await.expect("task runs");
        assert!(nested.is_dir());

        // Idempotent by construction.
        task.execute(&ctx()).await.expect("second run");
    }
}
