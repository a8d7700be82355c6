use crate::orchestrator::RunState;
use model::events::TaskPhase;
use serde::Serialize;

/// Outcome of one before/after task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub phase: TaskPhase,
    pub outcome: String,
}

/// Outcome of one migrator's streaming loop.
#[derive(Debug, Clone, Serialize)]
pub struct MigratorReport {
    pub name: String,
    /// The puller's advertised count, absent when unknown. May disagree
    /// with `rows`; the advertised count is best-effort only.
    pub expected: Option<u64>,
    pub rows: u64,
    pub batches: u64,
    pub duration_ms: u64,
}

/// Final report for a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub migration: String,
    pub state: RunState,
    pub tasks: Vec<TaskReport>,
    pub migrators: Vec<MigratorReport>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn total_rows(&self) -> u64 {
        self.migrators.iter().map(|m| m.rows).sum()
    }
}
