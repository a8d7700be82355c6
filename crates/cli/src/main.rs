use crate::{commands::Commands, error::CliError, manifest::Manifest};
use clap::Parser;
use engine_runtime::{orchestrator::Orchestrator, report::LogReporter};
use model::options::{OptionValue, keys};
use std::{path::Path, sync::Arc};
use tracing::Level;

mod commands;
mod error;
mod manifest;
mod output;

#[derive(Parser)]
#[command(name = "gantry", version = "0.1.0", about = "Data migration runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            manifest,
            name,
            batch_size,
            json,
        } => {
            let manifest = Manifest::load(Path::new(&manifest)).await?;
            let registry = Arc::new(manifest.build_registry()?);

            let mut options = manifest.options_for(&name);
            if let Some(batch_size) = batch_size {
                options = options.with(keys::BATCH_SIZE, OptionValue::Int(batch_size));
            }

            let orchestrator = Orchestrator::new(registry, Arc::new(LogReporter));
            let summary = orchestrator.run(&name, options).await?;

            if json {
                output::print_summary_json(&summary)?;
            } else {
                output::print_summary(&summary);
            }
        }

        Commands::List { manifest } => {
            let manifest = Manifest::load(Path::new(&manifest)).await?;
            let registry = manifest.build_registry()?;

            for (name, migration) in registry.iter() {
                println!(
                    "{name}: {} migrator(s), {} before task(s), {} after task(s)",
                    migration.migrators().len(),
                    migration.before_tasks().len(),
                    migration.after_tasks().len()
                );
            }
        }
    }

    Ok(())
}
