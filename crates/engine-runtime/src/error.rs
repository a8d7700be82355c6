use engine_core::error::{ExecuteError, TaskError};
use model::events::TaskPhase;
use thiserror::Error;

/// Top-level errors for one migration run.
///
/// Every failure is fatal to the run: the orchestrator stops at the failing
/// step and reports it, never continuing with later migrators or
/// after-tasks. The failing step's identity is carried in the variant so an
/// operator can resume manually from that point.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The requested name is not registered; nothing was executed.
    #[error("no migration registered under '{name}'")]
    NotFound { name: String },

    #[error("{phase} task '{name}' failed: {source}")]
    Task {
        phase: TaskPhase,
        name: String,
        #[source]
        source: TaskError,
    },

    #[error("migrator '{name}' failed: {source}")]
    Migrator {
        name: String,
        #[source]
        source: ExecuteError,
    },
}

impl MigrationError {
    /// Identity of the failing step, when one was reached.
    pub fn failing_step(&self) -> Option<String> {
        match self {
            MigrationError::NotFound { .. } => None,
            MigrationError::Task { phase, name, .. } => Some(format!("{phase} task '{name}'")),
            MigrationError::Migrator { name, .. } => Some(format!("migrator '{name}'")),
        }
    }
}
