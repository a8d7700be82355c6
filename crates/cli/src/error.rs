use engine_core::error::RegistryError;
use engine_runtime::error::MigrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the manifest file: {0}")]
    ManifestRead(#[from] std::io::Error),

    #[error("Failed to parse the manifest as JSON: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Failed to build the migration registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Migration run failed: {0}")]
    Migration(#[from] MigrationError),
}
