use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which task list of a migration a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    Before,
    After,
}

impl TaskPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPhase::Before => "before",
            TaskPhase::After => "after",
        }
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted over the lifetime of one migration run.
///
/// The orchestrator publishes these to its progress-reporting collaborator;
/// how they are rendered (log line, progress bar, JSON feed) is up to the
/// consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// Emitted once when a run starts.
    RunStarted {
        run_id: String,
        migration: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted before a before/after task executes.
    TaskStarted {
        run_id: String,
        phase: TaskPhase,
        task: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a task completes; `outcome` is the task's result string
    /// or "OK" when the task reported none.
    TaskCompleted {
        run_id: String,
        phase: TaskPhase,
        task: String,
        outcome: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted before a migrator's streaming loop starts. `expected` is the
    /// puller's advertised count, absent when the source cannot report one.
    MigratorStarted {
        run_id: String,
        migrator: String,
        expected: Option<u64>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted for every progress step: `delta` records pushed since the
    /// previous event, `total` pushed so far for this migrator.
    MigratorProgress {
        run_id: String,
        migrator: String,
        delta: u64,
        total: u64,
        expected: Option<u64>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a migrator's stream is fully drained.
    MigratorCompleted {
        run_id: String,
        migrator: String,
        rows: u64,
        batches: u64,
        timestamp: DateTime<Utc>,
    },

    /// Emitted once when every phase completed.
    RunCompleted {
        run_id: String,
        migration: String,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when any step fails; `step` identifies the failing task or
    /// migrator so an operator can resume manually from that point.
    RunFailed {
        run_id: String,
        migration: String,
        step: Option<String>,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl RunEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            RunEvent::RunStarted { .. } => "run.started",
            RunEvent::TaskStarted { .. } => "task.started",
            RunEvent::TaskCompleted { .. } => "task.completed",
            RunEvent::MigratorStarted { .. } => "migrator.started",
            RunEvent::MigratorProgress { .. } => "migrator.progress",
            RunEvent::MigratorCompleted { .. } => "migrator.completed",
            RunEvent::RunCompleted { .. } => "run.completed",
            RunEvent::RunFailed { .. } => "run.failed",
        }
    }

    pub fn run_id(&self) -> &str {
        match self {
            RunEvent::RunStarted { run_id, .. }
            | RunEvent::TaskStarted { run_id, .. }
            | RunEvent::TaskCompleted { run_id, .. }
            | RunEvent::MigratorStarted { run_id, .. }
            | RunEvent::MigratorProgress { run_id, .. }
            | RunEvent::MigratorCompleted { run_id, .. }
            | RunEvent::RunCompleted { run_id, .. }
            | RunEvent::RunFailed { run_id, .. } => run_id,
        }
    }

    pub fn is_progress(&self) -> bool {
        matches!(self, RunEvent::MigratorProgress { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RunEvent::RunFailed { .. })
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::RunStarted {
                run_id, migration, ..
            } => write!(f, "Run started: {migration} (run={run_id})"),

            RunEvent::TaskStarted {
                phase, task, run_id, ..
            } => write!(f, "{phase} task '{task}' started (run={run_id})"),

            RunEvent::TaskCompleted {
                phase,
                task,
                outcome,
                run_id,
                ..
            } => write!(f, "{phase} task '{task}': {outcome} (run={run_id})"),

            RunEvent::MigratorStarted {
                migrator,
                expected,
                run_id,
                ..
            } => {
                let estimate = expected
                    .map(|n| format!(" (~{n} records)"))
                    .unwrap_or_default();
                write!(f, "Migrator '{migrator}' started{estimate} (run={run_id})")
            }

            RunEvent::MigratorProgress {
                migrator,
                delta,
                total,
                expected,
                run_id,
                ..
            } => {
                let pct = expected
                    .filter(|e| *e > 0)
                    .map(|e| format!(" {:.1}%", *total as f64 * 100.0 / e as f64))
                    .unwrap_or_default();
                write!(
                    f,
                    "Migrator '{migrator}': +{delta} ({total} total{pct}, run={run_id})"
                )
            }

            RunEvent::MigratorCompleted {
                migrator,
                rows,
                batches,
                run_id,
                ..
            } => write!(
                f,
                "Migrator '{migrator}' completed: {rows} records in {batches} batches (run={run_id})"
            ),

            RunEvent::RunCompleted {
                migration, run_id, ..
            } => write!(f, "Run completed: {migration} (run={run_id})"),

            RunEvent::RunFailed {
                migration,
                step,
                error,
                run_id,
                ..
            } => {
                let at = step
                    .as_ref()
                    .map(|s| format!(" at {s}"))
                    .unwrap_or_default();
                write!(f, "Run failed: {migration}{at}: {error} (run={run_id})")
            }
        }
    }
}
