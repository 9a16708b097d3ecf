//! Tasks: named, optionally command-backed units of work
//!
//! A [`Task`] is created through [`TaskTree::register_task`](crate::tree::TaskTree::register_task)
//! from a [`TaskConfig`]. Its fully-qualified name is fixed at that point and its
//! command runs at most once for the lifetime of the tree, no matter how many
//! dependents ask for it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::sync::OnceCell;

use crate::color::TaskColor;
use crate::tree::NamespaceId;

/// Handle to a task stored in a [`TaskTree`](crate::tree::TaskTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

/// A single dependency edge of a task
#[derive(Debug, Clone)]
pub enum Dependency {
    /// A task handle resolved when the dependent was declared
    Task(TaskId),
    /// A pattern matched against every task fqdn in the tree at spawn time
    Pattern(Regex),
}

/// Dependency as declared in a [`TaskConfig`], before pattern compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredDependency {
    Task(TaskId),
    Pattern(String),
}

/// Builder describing a task to register under a namespace
#[derive(Debug, Clone, Default)]
pub struct TaskConfig {
    pub name: String,
    pub command: Option<Vec<String>>,
    pub dependencies: Vec<DeclaredDependency>,
    pub directory: Option<PathBuf>,
    pub environment: Option<HashMap<String, String>>,
    pub description: Option<String>,
    pub color: Option<TaskColor>,
}

impl TaskConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn command<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = Some(argv.into_iter().map(Into::into).collect());
        self
    }

    pub fn depends_on(mut self, task: TaskId) -> Self {
        self.dependencies.push(DeclaredDependency::Task(task));
        self
    }

    pub fn depends_on_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.dependencies.push(DeclaredDependency::Pattern(pattern.into()));
        self
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: TaskColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// A registered task
#[derive(Debug)]
pub struct Task {
    pub(crate) name: String,
    pub(crate) fqdn: String,
    pub(crate) namespace: NamespaceId,
    pub(crate) command: Option<Vec<String>>,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) directory: Option<PathBuf>,
    pub(crate) environment: Option<HashMap<String, String>>,
    pub(crate) description: Option<String>,
    pub(crate) color: TaskColor,
    /// Exit code of this task's own command, set by whichever caller launches it first
    pub(crate) completion: OnceCell<i32>,
}

impl Task {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    pub fn command(&self) -> Option<&[String]> {
        self.command.as_deref()
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn environment(&self) -> Option<&HashMap<String, String>> {
        self.environment.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn color(&self) -> TaskColor {
        self.color
    }

    /// A meta-task has no command and only sequences its dependencies
    pub fn is_meta(&self) -> bool {
        self.command.is_none()
    }

    /// Exit code of the task's own command, if it has already finished
    pub fn exit_code(&self) -> Option<i32> {
        self.completion.get().copied()
    }
}
