//! Structured output for `-o yaml|json`

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::OutputFormat;
use crate::models::Resource;

/// Serialize `value` as YAML or JSON
///
/// Table output is rendered by each command; asking for it here is a caller bug
/// and reported as an error.
pub fn to_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML"),
        OutputFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Table => Err(anyhow::anyhow!("Table output is not structured")),
    }
}

/// Wrap resources in a `v1/List`, as kubectl does
pub fn resource_list(resources: &[Resource]) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": resources,
    })
}
