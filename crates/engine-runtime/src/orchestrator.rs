use crate::{
    error::MigrationError,
    report::ProgressReporter,
    summary::{MigratorReport, RunSummary, TaskReport},
};
use chrono::Utc;
use engine_core::{
    context::MigrationContext,
    error::ExecuteError,
    migrator::Migrator,
    registry::Registry,
    task::Task,
};
use futures::TryStreamExt;
use model::{
    events::{RunEvent, TaskPhase},
    options::Options,
};
use serde::Serialize;
use std::{fmt, sync::Arc, time::Instant};
use tracing::info;
use uuid::Uuid;

/// Lifecycle of one migration run. `Failed` is terminal and reachable from
/// any running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    NotStarted,
    RunningBeforeTasks,
    RunningMigrators,
    RunningAfterTasks,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::NotStarted => "NotStarted",
            RunState::RunningBeforeTasks => "RunningBeforeTasks",
            RunState::RunningMigrators => "RunningMigrators",
            RunState::RunningAfterTasks => "RunningAfterTasks",
            RunState::Completed => "Completed",
            RunState::Failed => "Failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives full migration runs: before-tasks, then each migrator's streaming
/// loop, then after-tasks, strictly in declaration order and one at a time.
///
/// Any failure stops the run at that step. Migrations are commonly ordered
/// with dependency semantics in mind, so skipping a failed unit and
/// continuing would risk a partially-consistent destination; resumption is
/// an operator decision, not an engine behavior.
pub struct Orchestrator {
    registry: Arc<Registry>,
    reporter: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    pub fn new(registry: Arc<Registry>, reporter: Arc<dyn ProgressReporter>) -> Self {
        Orchestrator { registry, reporter }
    }

    /// Run the migration registered under `name` to completion.
    pub async fn run(&self, name: &str, options: Options) -> Result<RunSummary, MigrationError> {
        let migration = self
            .registry
            .get(name)
            .ok_or_else(|| MigrationError::NotFound {
                name: name.to_string(),
            })?;

        let ctx = MigrationContext::new(migration, name, options);
        MigrationRun::new(ctx, self.reporter.clone()).execute().await
    }
}

struct MigrationRun {
    run_id: String,
    ctx: MigrationContext,
    reporter: Arc<dyn ProgressReporter>,
    state: RunState,
    started: Instant,
    tasks: Vec<TaskReport>,
    migrators: Vec<MigratorReport>,
}

impl MigrationRun {
    fn new(ctx: MigrationContext, reporter: Arc<dyn ProgressReporter>) -> Self {
        MigrationRun {
            run_id: format!("run-{}", Uuid::new_v4()),
            ctx,
            reporter,
            state: RunState::NotStarted,
            started: Instant::now(),
            tasks: Vec::new(),
            migrators: Vec::new(),
        }
    }

    async fn execute(mut self) -> Result<RunSummary, MigrationError> {
        info!(run_id = %self.run_id, migration = self.ctx.name(), "Starting migration run");
        self.reporter.report(&RunEvent::RunStarted {
            run_id: self.run_id.clone(),
            migration: self.ctx.name().to_string(),
            timestamp: Utc::now(),
        });

        if let Err(err) = self.run_phases().await {
            self.state = RunState::Failed;
            self.reporter.report(&RunEvent::RunFailed {
                run_id: self.run_id.clone(),
                migration: self.ctx.name().to_string(),
                step: err.failing_step(),
                error: err.to_string(),
                timestamp: Utc::now(),
            });
            return Err(err);
        }

        self.state = RunState::Completed;
        self.reporter.report(&RunEvent::RunCompleted {
            run_id: self.run_id.clone(),
            migration: self.ctx.name().to_string(),
            timestamp: Utc::now(),
        });

        let duration_ms = self.started.elapsed().as_millis() as u64;
        info!(
            run_id = %self.run_id,
            migration = self.ctx.name(),
            rows = self.migrators.iter().map(|m| m.rows).sum::<u64>(),
            "Migration run completed in {duration_ms}ms"
        );

        Ok(RunSummary {
            run_id: self.run_id,
            migration: self.ctx.name().to_string(),
            state: self.state,
            tasks: self.tasks,
            migrators: self.migrators,
            duration_ms,
        })
    }

    async fn run_phases(&mut self) -> Result<(), MigrationError> {
        let migration = self.ctx.migration();

        self.state = RunState::RunningBeforeTasks;
        self.run_tasks(TaskPhase::Before, migration.before_tasks())
            .await?;

        self.state = RunState::RunningMigrators;
        for migrator in migration.migrators() {
            self.run_migrator(migrator).await?;
        }

        self.state = RunState::RunningAfterTasks;
        self.run_tasks(TaskPhase::After, migration.after_tasks())
            .await?;

        Ok(())
    }

    /// Tasks run synchronously to completion, one after another; the first
    /// failure aborts the remainder of the run.
    async fn run_tasks(
        &mut self,
        phase: TaskPhase,
        tasks: &[Arc<dyn Task>],
    ) -> Result<(), MigrationError> {
        for task in tasks {
            self.reporter.report(&RunEvent::TaskStarted {
                run_id: self.run_id.clone(),
                phase,
                task: task.name().to_string(),
                timestamp: Utc::now(),
            });

            let outcome = task
                .execute(&self.ctx)
                .await
                .map_err(|source| MigrationError::Task {
                    phase,
                    name: task.name().to_string(),
                    source,
                })?
                .unwrap_or_else(|| "OK".to_string());

            self.reporter.report(&RunEvent::TaskCompleted {
                run_id: self.run_id.clone(),
                phase,
                task: task.name().to_string(),
                outcome: outcome.clone(),
                timestamp: Utc::now(),
            });
            self.tasks.push(TaskReport {
                name: task.name().to_string(),
                phase,
                outcome,
            });
        }
        Ok(())
    }

    /// Drain one migrator's progress stream to exhaustion. The next
    /// migrator's puller/pusher are not touched until this one is done.
    async fn run_migrator(&mut self, migrator: &Migrator) -> Result<(), MigrationError> {
        let started = Instant::now();
        let name = migrator.name().to_string();

        let expected = {
            let puller = migrator.puller().lock().await;
            puller
                .count()
                .await
                .map_err(|source| MigrationError::Migrator {
                    name: name.clone(),
                    source: ExecuteError::Pull(source),
                })?
        };

        self.reporter.report(&RunEvent::MigratorStarted {
            run_id: self.run_id.clone(),
            migrator: name.clone(),
            expected,
            timestamp: Utc::now(),
        });

        let mut stream = migrator.executor().execute(
            migrator.puller().clone(),
            migrator.pusher().clone(),
            self.ctx.clone(),
        );

        let mut rows = 0u64;
        let mut batches = 0u64;
        loop {
            let delta = stream
                .try_next()
                .await
                .map_err(|source| MigrationError::Migrator {
                    name: name.clone(),
                    source,
                })?;
            let Some(delta) = delta else {
                break;
            };

            rows += delta;
            batches += 1;
            self.reporter.report(&RunEvent::MigratorProgress {
                run_id: self.run_id.clone(),
                migrator: name.clone(),
                delta,
                total: rows,
                expected,
                timestamp: Utc::now(),
            });
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        self.reporter.report(&RunEvent::MigratorCompleted {
            run_id: self.run_id.clone(),
            migrator: name.clone(),
            rows,
            batches,
            timestamp: Utc::now(),
        });
        self.migrators.push(MigratorReport {
            name,
            expected,
            rows,
            batches,
            duration_ms,
        });

        Ok(())
    }
}
