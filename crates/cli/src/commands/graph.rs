use anyhow::Result;
use colored::*;
use tusk_core::graph::cycle_path;
use tusk_core::manager::TaskManager;

pub fn execute(manager: &TaskManager) -> Result<()> {
    let tree = &manager.tree;
    let result = manager.dependency_graph();

    println!("{}", "Resolved dependencies".bold().underline());

    for cycle in &result.cycles {
        println!(
            "{} {}",
            "cycle:".yellow().bold(),
            cycle_path(cycle).yellow()
        );
    }

    let mut printed = false;
    for namespace in tree.collect_all(manager.root) {
        let tasks = tree.namespace(namespace).tasks();
        if tasks.is_empty() {
            continue;
        }
        printed = true;

        println!();
        println!("{}", tree.fqdn(namespace).bold());
        for &id in tasks {
            let task = tree.task(id);
            let marker = if task.is_meta() { " (meta)" } else { "" };
            println!(
                "  {}{}",
                task.name().color(Color::from(task.color())),
                marker.dimmed()
            );

            let dependencies = tree.resolve_dependencies(id);
            if dependencies.is_empty() {
                continue;
            }
            let names = dependencies
                .iter()
                .map(|&dep| tree.task(dep).fqdn())
                .collect::<Vec<_>>()
                .join(", ");
            println!("    {} {}", "<-".dimmed(), names);
        }
    }

    if !printed {
        println!("  {}", "No tasks found".dimmed());
    }

    Ok(())
}
