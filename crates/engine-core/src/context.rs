use crate::migration::Migration;
use model::options::Options;
use std::sync::Arc;

/// Read-only snapshot handed to components that need contextual
/// configuration (batch size, filters) without global state.
///
/// Constructed per migration run and discarded at its end; cloning is cheap.
#[derive(Clone)]
pub struct MigrationContext {
    migration: Arc<Migration>,
    name: String,
    options: Options,
}

impl MigrationContext {
    pub fn new(migration: Arc<Migration>, name: &str, options: Options) -> Self {
        MigrationContext {
            migration,
            name: name.to_string(),
            options,
        }
    }

    pub fn migration(&self) -> Arc<Migration> {
        self.migration.clone()
    }

    /// The name the migration was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}
