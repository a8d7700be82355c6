use crate::error::CliError;
use engine_runtime::summary::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    println!("Migration '{}' ({})", summary.migration, summary.run_id);
    println!("-----------------------------");
    println!("{:<16} {}", "State", summary.state);
    println!("{:<16} {}ms", "Duration", summary.duration_ms);
    println!("{:<16} {}", "Rows", summary.total_rows());

    for task in &summary.tasks {
        println!("{:<16} [{}] {}: {}", "Task", task.phase, task.name, task.outcome);
    }

    for migrator in &summary.migrators {
        let expected = migrator
            .expected
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<16} {}: {} rows in {} batches (expected {expected}, {}ms)",
            "Migrator", migrator.name, migrator.rows, migrator.batches, migrator.duration_ms
        );
    }
}

pub fn print_summary_json(summary: &RunSummary) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
