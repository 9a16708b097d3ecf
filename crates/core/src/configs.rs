//! Task definition file parsing

pub mod namespace;
pub mod tasks;

pub use namespace::{definition_schema, parse_definition_file, NamespaceDefinition};
pub use tasks::{DependencyDefinition, TaskDefinition};
