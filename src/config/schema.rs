//! Configuration file structure

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace used when `-n` is not given and the kube context has none
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    #[serde(default)]
    pub output: OutputConfig,

    /// Capabilities of the current user that change what is shown
    #[serde(default)]
    pub flags: FeatureFlags,

    /// Kinds fetched for operands whose CSV declares none, as `group~version~kind`
    /// references or builtin kind names. Empty means the builtin defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_resource_kinds: Vec<String>,
}

/// Output rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_false")]
    pub no_headers: bool,

    /// Add the ownership depth column to related tables
    #[serde(default = "default_false")]
    pub show_depth: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Show the bound PersistentVolume on claim details
    #[serde(default = "default_false")]
    pub can_list_persistent_volumes: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown output format '{}' (expected table, yaml or json)",
                s
            )),
        }
    }
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            output: OutputConfig::default(),
            flags: FeatureFlags::default(),
            default_resource_kinds: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            no_headers: default_false(),
            show_depth: default_false(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            can_list_persistent_volumes: default_false(),
        }
    }
}
