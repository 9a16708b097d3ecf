use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskDefinition;
use crate::types::TuskResult;

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamespaceDefinition {
    pub name: String,
    /// Working directory for tasks declared directly in this namespace, relative to the definition file
    pub directory: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDefinition>,
}

pub fn parse_definition_file(yaml_str: &str) -> TuskResult<NamespaceDefinition> {
    let config: NamespaceDefinition = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// JSON Schema describing the definition file, pretty-printed
pub fn definition_schema() -> TuskResult<String> {
    let schema = schemars::schema_for!(NamespaceDefinition);
    Ok(serde_json::to_string_pretty(&schema)?)
}
