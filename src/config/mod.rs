//! Configuration system
//!
//! Layered YAML configuration: built-in defaults, a root file, per-cluster and
//! per-context files, then environment overrides.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use defaults::fallback_resource_kinds;
pub use loader::ConfigLoader;
pub use schema::{Config, FeatureFlags, OutputConfig, OutputFormat};

/// Keys accepted by [`get_config_value`] and [`set_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "defaultNamespace",
    "output.format",
    "output.noHeaders",
    "output.showDepth",
    "flags.canListPersistentVolumes",
    "defaultResourceKinds",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "output.format" => Ok(config.output.format.to_string()),
        "output.noHeaders" => Ok(config.output.no_headers.to_string()),
        "output.showDepth" => Ok(config.output.show_depth.to_string()),
        "flags.canListPersistentVolumes" => {
            Ok(config.flags.can_list_persistent_volumes.to_string())
        }
        "defaultResourceKinds" => serde_yaml::to_string(&config.default_resource_kinds)
            .map_err(|e| anyhow::anyhow!("Failed to serialize defaultResourceKinds: {}", e)),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "output.format" => {
            config.output.format = value.parse()?;
        }
        "output.noHeaders" => {
            config.output.no_headers = value
                .parse()
                .context("output.noHeaders must be 'true' or 'false'")?;
        }
        "output.showDepth" => {
            config.output.show_depth = value
                .parse()
                .context("output.showDepth must be 'true' or 'false'")?;
        }
        "flags.canListPersistentVolumes" => {
            config.flags.can_list_persistent_volumes = value
                .parse()
                .context("flags.canListPersistentVolumes must be 'true' or 'false'")?;
        }
        "defaultResourceKinds" => {
            // YAML array or comma-separated list
            let kinds: Vec<String> = if value.trim_start().starts_with('[') {
                serde_yaml::from_str(value).context(
                    "defaultResourceKinds must be a YAML array (e.g., ['Deployment', 'apps~v1~StatefulSet'])",
                )?
            } else {
                value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            };

            for kind in &kinds {
                crate::models::KindReference::parse(kind)
                    .with_context(|| format!("Invalid resource kind '{}'", kind))?;
            }
            config.default_resource_kinds = kinds;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
