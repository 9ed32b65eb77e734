//! Configuration loading and merging logic
//!
//! Layers are merged key by key, so a cluster file only needs the keys it changes.

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Context-specific config
    /// 3. Cluster-specific config
    /// 4. Root config
    /// 5. Built-in defaults
    pub fn load(cluster: Option<&str>, context: Option<&str>) -> Result<Config> {
        let config = Self::load_layers(&Self::layer_paths(cluster, context))?;
        Ok(Self::apply_env_overrides(config))
    }

    /// Files consulted for a cluster/context, lowest precedence first
    pub fn layer_paths(cluster: Option<&str>, context: Option<&str>) -> Vec<PathBuf> {
        let mut layers = vec![paths::root_config_path()];
        if let Some(cluster_name) = cluster {
            layers.push(paths::cluster_config_path(cluster_name, None));
            if let Some(context_name) = context {
                layers.push(paths::cluster_config_path(cluster_name, Some(context_name)));
            }
        }
        layers
    }

    /// Merge the given files over the defaults; missing files are skipped
    pub fn load_layers(layers: &[PathBuf]) -> Result<Config> {
        let mut merged = serde_yaml::to_value(Self::load_defaults())
            .context("Failed to serialize default configuration")?;

        for path in layers {
            if !path.exists() {
                continue;
            }
            tracing::debug!("Loading config layer {}", path.display());
            let layer = Self::read_value(path)?;
            merge_values(&mut merged, layer);
        }

        serde_yaml::from_value(merged).context("Failed to build merged configuration")
    }

    /// Load a single configuration file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn read_value(path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        // An empty file parses as null
        Ok(if value.is_null() {
            Value::Mapping(Default::default())
        } else {
            value
        })
    }

    /// Validate every existing layer and the merged result
    ///
    /// Fails on invalid YAML, wrong value types and unparseable `defaultResourceKinds`.
    pub fn validate(cluster: Option<&str>, context: Option<&str>) -> Result<()> {
        for path in Self::layer_paths(cluster, context) {
            if path.exists() {
                Self::load_file(&path)?;
            }
        }

        let config = Self::load(cluster, context).context("Failed to load merged configuration")?;
        defaults::fallback_resource_kinds(&config)
            .context("defaultResourceKinds contains an invalid kind")?;
        Ok(())
    }

    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply `OPERAND_VIEW_*` overrides read through `lookup`
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(namespace) = lookup("OPERAND_VIEW_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }

        if let Some(format) = lookup("OPERAND_VIEW_OUTPUT") {
            match format.parse() {
                Ok(format) => config.output.format = format,
                Err(e) => tracing::warn!("Ignoring OPERAND_VIEW_OUTPUT: {}", e),
            }
        }

        if let Some(no_headers) = lookup("OPERAND_VIEW_NO_HEADERS") {
            match no_headers.parse::<bool>() {
                Ok(val) => config.output.no_headers = val,
                Err(_) => tracing::warn!("Ignoring OPERAND_VIEW_NO_HEADERS: {}", no_headers),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }

    pub fn save_cluster(config: &Config, cluster: &str, context: Option<&str>) -> Result<()> {
        Self::save(config, &paths::cluster_config_path(cluster, context))
    }
}

/// Deep-merge `other` into `base`; mappings merge, everything else is replaced
fn merge_values(base: &mut Value, other: Value) {
    match (base, other) {
        (Value::Mapping(base_map), Value::Mapping(other_map)) => {
            for (key, value) in other_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}
