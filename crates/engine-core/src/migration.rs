use crate::{migrator::Migrator, task::Task};
use std::sync::Arc;

/// A named unit of migration work: ordered before-tasks, migrators, and
/// after-tasks. Immutable once built; created during startup configuration
/// and read-only for the lifetime of the process.
pub struct Migration {
    before_tasks: Vec<Arc<dyn Task>>,
    migrators: Vec<Migrator>,
    after_tasks: Vec<Arc<dyn Task>>,
}

impl Migration {
    pub fn builder() -> MigrationBuilder {
        MigrationBuilder::default()
    }

    /// Declaration order is execution order.
    pub fn before_tasks(&self) -> &[Arc<dyn Task>] {
        &self.before_tasks
    }

    pub fn migrators(&self) -> &[Migrator] {
        &self.migrators
    }

    pub fn after_tasks(&self) -> &[Arc<dyn Task>] {
        &self.after_tasks
    }

    pub fn is_empty(&self) -> bool {
        self.before_tasks.is_empty() && self.migrators.is_empty() && self.after_tasks.is_empty()
    }
}

#[derive(Default)]
pub struct MigrationBuilder {
    before_tasks: Vec<Arc<dyn Task>>,
    migrators: Vec<Migrator>,
    after_tasks: Vec<Arc<dyn Task>>,
}

impl MigrationBuilder {
    pub fn before_task<T>(mut self, task: T) -> Self
    where
        T: Task + 'static,
    {
        self.before_tasks.push(Arc::new(task));
        self
    }

    pub fn migrator(mut self, migrator: Migrator) -> Self {
        self.migrators.push(migrator);
        self
    }

    pub fn after_task<T>(mut self, task: T) -> Self
    where
        T: Task + 'static,
    {
        self.after_tasks.push(Arc::new(task));
        self
    }

    pub fn build(self) -> Migration {
        Migration {
            before_tasks: self.before_tasks,
            migrators: self.migrators,
            after_tasks: self.after_tasks,
        }
    }
}
