use crate::error::CliError;
use connectors::{
    file::csv::{CsvPuller, CsvPusher},
    task::EnsureDirTask,
};
use engine_core::{
    executor::BatchExecutor,
    migration::{Migration, MigrationBuilder},
    migrator::Migrator,
    puller::shared_puller,
    pusher::shared_pusher,
    registry::Registry,
};
use model::options::Options;
use serde::Deserialize;
use std::{path::{Path, PathBuf}, sync::Arc};

/// Root of the migration manifest. Configuration loading lives here in the
/// CLI layer; the engine only ever sees the registry built from it.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub migrations: Vec<MigrationManifest>,
}

#[derive(Debug, Deserialize)]
pub struct MigrationManifest {
    pub name: String,

    #[serde(default)]
    pub options: Options,

    #[serde(default)]
    pub before: Vec<TaskManifest>,

    #[serde(default)]
    pub migrators: Vec<MigratorManifest>,

    #[serde(default)]
    pub after: Vec<TaskManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskManifest {
    EnsureDir { path: PathBuf },
}

#[derive(Debug, Deserialize)]
pub struct MigratorManifest {
    pub name: String,
    pub source: CsvEndpoint,
    pub destination: CsvEndpoint,
}

#[derive(Debug, Deserialize)]
pub struct CsvEndpoint {
    pub path: PathBuf,

    #[serde(default)]
    pub delimiter: Option<char>,
}

impl CsvEndpoint {
    fn delimiter_byte(&self) -> Result<Option<u8>, CliError> {
        match self.delimiter {
            None => Ok(None),
            Some(ch) if ch.is_ascii() => Ok(Some(ch as u8)),
            Some(ch) => Err(CliError::InvalidManifest(format!(
                "delimiter '{ch}' is not an ASCII character"
            ))),
        }
    }
}

impl Manifest {
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build the registry this manifest describes. Names are registered in
    /// declaration order; duplicates are rejected.
    pub fn build_registry(&self) -> Result<Registry, CliError> {
        let mut builder = Registry::builder();
        for migration in &self.migrations {
            builder = builder.register(&migration.name, migration.build()?)?;
        }
        Ok(builder.build())
    }

    /// The option bag declared for `name`, empty when the migration has
    /// none.
    pub fn options_for(&self, name: &str) -> Options {
        self.migrations
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.options.clone())
            .unwrap_or_default()
    }
}

impl MigrationManifest {
    fn build(&self) -> Result<Migration, CliError> {
        let mut builder = Migration::builder();
        for task in &self.before {
            builder = task.attach_before(builder);
        }
        for migrator in &self.migrators {
            builder = builder.migrator(migrator.build()?);
        }
        for task in &self.after {
            builder = task.attach_after(builder);
        }
        Ok(builder.build())
    }
}

impl TaskManifest {
    fn attach_before(&self, builder: MigrationBuilder) -> MigrationBuilder {
        match self {
            TaskManifest::EnsureDir { path } => builder.before_task(EnsureDirTask::new(path)),
        }
    }

    fn attach_after(&self, builder: MigrationBuilder) -> MigrationBuilder {
        match self {
            TaskManifest::EnsureDir { path } => builder.after_task(EnsureDirTask::new(path)),
        }
    }
}

impl MigratorManifest {
    fn build(&self) -> Result<Migrator, CliError> {
        let mut puller = CsvPuller::new(&self.source.path).with_entity(&self.name);
        if let Some(delimiter) = self.source.delimiter_byte()? {
            puller = puller.with_delimiter(delimiter);
        }

        let mut pusher = CsvPusher::new(&self.destination.path);
        if let Some(delimiter) = self.destination.delimiter_byte()? {
            pusher = pusher.with_delimiter(delimiter);
        }

        Ok(Migrator::new(
            &self.name,
            shared_puller(puller),
            shared_pusher(pusher),
            Arc::new(BatchExecutor::new()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
    {
        "migrations": [
            {
                "name": "customers_export",
                "options": {"batch_size": 100},
                "before": [{"kind": "ensure_dir", "path": "out"}],
                "migrators": [
                    {
                        "name": "customers",
                        "source": {"path": "data/customers.csv", "delimiter": ";"},
                        "destination": {"path": "out/customers.csv"}
                    }
                ]
            },
            {
                "name": "noop"
            }
        ]
    }
    "#;

    #[test]
    fn manifest_parses_and_builds_a_registry() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).expect("parse manifest");
        let registry = manifest.build_registry().expect("build registry");

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["customers_export", "noop"]);

        let export = registry.get("customers_export").expect("registered");
        assert_eq!(export.before_tasks().len(), 1);
        assert_eq!(export.migrators().len(), 1);
        assert!(export.after_tasks().is_empty());

        assert_eq!(manifest.options_for("customers_export").batch_size(), 100);
        assert!(manifest.options_for("noop").is_empty());
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let endpoint = CsvEndpoint {
            path: PathBuf::from("x.csv"),
            delimiter: Some('→'),
        };
        assert!(matches!(
            endpoint.delimiter_byte(),
            Err(CliError::InvalidManifest(_))
        ));
    }

    #[test]
    fn duplicate_names_fail_registry_construction() {
        let manifest = Manifest {
            migrations: vec![
                MigrationManifest {
                    name: "dup".into(),
                    options: Options::default(),
                    before: Vec::new(),
                    migrators: Vec::new(),
                    after: Vec::new(),
                },
                MigrationManifest {
                    name: "dup".into(),
                    options: Options::default(),
                    before: Vec::new(),
                    migrators: Vec::new(),
                    after: Vec::new(),
                },
            ],
        };
        assert!(matches!(
            manifest.build_registry(),
            Err(CliError::Registry(_))
        ));
    }
}
