use anyhow::Result;
use colored::*;
use tusk_core::manager::TaskManager;

pub fn execute(manager: &TaskManager) -> Result<()> {
    let result = manager.list_tasks();

    println!("{}", "Tasks".bold().underline());

    if result.tasks.is_empty() {
        println!("  {}", "No tasks found".dimmed());
        return Ok(());
    }

    let width = result
        .tasks
        .iter()
        .map(|task| task.fqdn.len())
        .max()
        .unwrap_or(0);

    for task in &result.tasks {
        let name = format!("{:width$}", task.fqdn, width = width);
        let description = match (&task.description, task.is_meta) {
            (Some(description), _) => description.normal(),
            (None, true) => "(runs dependencies only)".dimmed(),
            (None, false) => "".normal(),
        };
        println!(
            "{}  {}",
            name.color(Color::from(task.color)).bold(),
            description
        );
    }

    Ok(())
}
