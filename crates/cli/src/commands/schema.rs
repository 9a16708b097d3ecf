use anyhow::Result;
use tusk_core::configs::definition_schema;

pub fn execute() -> Result<()> {
    let schema = definition_schema()
        .map_err(|e| anyhow::anyhow!("Failed to generate schema: {}", e))?;
    println!("{}", schema);
    Ok(())
}
