use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::TaskColor;

/// A dependency entry: a bare string is a pattern, `{ task: fqdn }` is a direct reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DependencyDefinition {
    Pattern(String),
    Task {
        /// Fully-qualified name of a task declared earlier in the file
        task: String,
    },
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Program and arguments; omit for a task that only runs its dependencies
    pub command: Option<Vec<String>>,
    pub dependencies: Option<Vec<DependencyDefinition>>,
    /// Working directory, relative to the definition file
    pub directory: Option<String>,
    pub environment: Option<HashMap<String, String>>,
    pub color: Option<TaskColor>,
}
