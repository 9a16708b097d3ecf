//! High-level task management interface
//!
//! This module provides the [`TaskManager`] which serves as the primary interface
//! for the command line. It encapsulates loading the definition file, listing
//! tasks, selecting tasks by pattern, and running them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tusk_core::execution::ConsoleSink;
//! use tusk_core::manager::{TaskManager, TaskManagerConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> tusk_core::types::TuskResult<()> {
//! let manager = TaskManager::load(TaskManagerConfig {
//!     definition_file: PathBuf::from("tusk.yml"),
//! })?;
//!
//! // List all tasks
//! let tasks = manager.list_tasks();
//!
//! // Run every task whose fqdn ends in ":build"
//! let report = manager.run(&[":build$".to_string()], &ConsoleSink).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::configs::{parse_definition_file, DependencyDefinition, NamespaceDefinition};
use crate::execution::{Executor, OutputSink};
use crate::graph::{build_dependency_graph, reachable_cycles};
use crate::results::{DependencyGraphResult, RunReport, TaskInfo, TaskListResult};
use crate::task::{TaskConfig, TaskId};
use crate::tree::{NamespaceConfig, NamespaceId, TaskTree};
use crate::types::{TuskError, TuskResult};

/// Default name of the definition file looked up in the current directory
pub const DEFAULT_DEFINITION_FILE: &str = "tusk.yml";

/// Configuration for initializing a task manager
pub struct TaskManagerConfig {
    pub definition_file: PathBuf,
}

/// Owns the task tree loaded from a definition file
pub struct TaskManager {
    pub tree: TaskTree,
    pub root: NamespaceId,
}

impl TaskManager {
    /// Load and build the tree from a definition file
    pub fn load(config: TaskManagerConfig) -> TuskResult<Self> {
        let path = &config.definition_file;
        let content = std::fs::read_to_string(path).map_err(|e| {
            TuskError::UnresolvedModule(format!(
                "Failed to read definition file {}: {}",
                path.display(),
                e
            ))
        })?;

        let definition = parse_definition_file(&content).map_err(|e| {
            TuskError::UnresolvedModule(format!(
                "Failed to parse definition file {}: {}",
                path.display(),
                e
            ))
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        debug!(file = %path.display(), "Loaded task definitions");
        Self::from_definition(&definition, &base_dir)
    }

    /// Build the tree from an already parsed definition. Relative directories
    /// are resolved against `base_dir`.
    pub fn from_definition(definition: &NamespaceDefinition, base_dir: &Path) -> TuskResult<Self> {
        let mut tree = TaskTree::new();
        let root = Self::add_namespace(&mut tree, None, definition, base_dir)?;
        Ok(Self { tree, root })
    }

    /// List every task, pre-order
    pub fn list_tasks(&self) -> TaskListResult {
        let tasks = self
            .tree
            .all_tasks(self.root)
            .into_iter()
            .map(|id| {
                let task = self.tree.task(id);
                TaskInfo {
                    fqdn: task.fqdn().to_string(),
                    description: task.description().map(str::to_string),
                    color: task.color(),
                    is_meta: task.is_meta(),
                }
            })
            .collect();

        TaskListResult { tasks }
    }

    /// Resolve each pattern against the whole tree and union the matches,
    /// keeping the order in which tasks were first matched
    pub fn select(&self, patterns: &[String]) -> TuskResult<Vec<TaskId>> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|source| TuskError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            let matches = self.tree.select(self.root, &regex);
            if matches.is_empty() {
                warn!(pattern = %pattern, "No tasks matched pattern");
            }
            targets.extend(matches.into_iter().filter(|id| seen.insert(*id)));
        }

        Ok(targets)
    }

    /// Get dependency graph information
    pub fn dependency_graph(&self) -> DependencyGraphResult {
        build_dependency_graph(&self.tree, self.root)
    }

    /// Run every task matching `patterns`, all started together
    pub async fn run(&self, patterns: &[String], sink: &dyn OutputSink) -> TuskResult<RunReport> {
        let targets = self.select(patterns)?;

        let cycles = reachable_cycles(&self.tree, &targets);
        if !cycles.is_empty() {
            return Err(TuskError::CircularDependency(cycles.join("; ")));
        }

        Ok(Executor::new(&self.tree, sink).run(&targets).await)
    }

    // Private helper methods

    fn add_namespace(
        tree: &mut TaskTree,
        parent: Option<NamespaceId>,
        definition: &NamespaceDefinition,
        base_dir: &Path,
    ) -> TuskResult<NamespaceId> {
        let mut config = NamespaceConfig::new(definition.name.clone());
        if let Some(directory) = &definition.directory {
            config = config.directory(resolve_directory(base_dir, directory));
        }

        // Attach before registering tasks so their fqdns include the full path
        let namespace = match parent {
            Some(parent) => tree.add_namespace(parent, config)?,
            None => tree.create_namespace(config)?,
        };

        for task in &definition.tasks {
            let mut config = TaskConfig::new(task.name.clone());
            config.command = task.command.clone();
            config.description = task.description.clone();
            config.environment = task.environment.clone();
            config.color = task.color;
            if let Some(directory) = &task.directory {
                config = config.directory(resolve_directory(base_dir, directory));
            }

            for dependency in task.dependencies.iter().flatten() {
                config = match dependency {
                    DependencyDefinition::Pattern(pattern) => config.depends_on_pattern(pattern),
                    DependencyDefinition::Task { task: fqdn } => {
                        let id = tree
                            .find_task(fqdn)
                            .ok_or_else(|| TuskError::UnknownTask(fqdn.clone()))?;
                        config.depends_on(id)
                    }
                };
            }

            tree.register_task(namespace, config)?;
        }

        for child in &definition.namespaces {
            Self::add_namespace(tree, Some(namespace), child, base_dir)?;
        }

        Ok(namespace)
    }
}

fn resolve_directory(base_dir: &Path, directory: &str) -> PathBuf {
    let directory = PathBuf::from(directory);
    if directory.is_relative() {
        base_dir.join(directory)
    } else {
        directory
    }
}
