use thiserror::Error;

/// The main error type for Tusk operations
#[derive(Debug, Error)]
pub enum TuskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Another {kind} named '{name}' already exists in '{namespace}'")]
    NameCollision {
        kind: EntryKind,
        name: String,
        namespace: String,
    },

    #[error("Namespace '{0}' is already attached to a parent")]
    AlreadyAttached(String),

    #[error("Adopting '{child}' under '{parent}' would create a cycle")]
    CyclicNamespace { child: String, parent: String },

    #[error("Invalid name '{0}': names must be non-empty and must not contain ':'")]
    InvalidName(String),

    #[error("Invalid task '{task}': {reason}")]
    InvalidTask { task: String, reason: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Unable to load task definitions: {0}")]
    UnresolvedModule(String),
}

/// Which kind of tree entry a [`TuskError::NameCollision`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Namespace,
    Task,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Namespace => write!(f, "namespace"),
            EntryKind::Task => write!(f, "task"),
        }
    }
}

/// Result type alias for Tusk operations
pub type TuskResult<T> = Result<T, TuskError>;
