use anyhow::Result;
use colored::*;
use tusk_core::execution::ConsoleSink;
use tusk_core::manager::TaskManager;

/// Run the selected tasks and return the process exit code
pub async fn execute(manager: &TaskManager, patterns: &[String]) -> Result<i32> {
    let report = manager
        .run(patterns, &ConsoleSink)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run tasks: {}", e))?;

    for failure in report.failures() {
        eprintln!(
            "{} {}",
            "✗".red().bold(),
            format!("{} failed with exit code {}", failure.fqdn, failure.code).red()
        );
    }

    Ok(report.exit_code())
}
