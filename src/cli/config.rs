//! `config` subcommand handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{self, ConfigLoader, paths};
use crate::kube::current_context;

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value, or the whole merged configuration
    Get {
        /// Configuration key (e.g., "defaultNamespace", "output.format")
        key: Option<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "output.showDepth")
        key: String,
        /// Configuration value
        value: String,
        /// Cluster name for cluster-specific config
        #[arg(long)]
        cluster: Option<String>,
        /// Context name for context-specific config
        #[arg(long, requires = "cluster")]
        context: Option<String>,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration files
    Validate,
}

pub async fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    let kube_context = current_context();
    let cluster = kube_context.cluster.as_deref();
    let context = kube_context.context.as_deref();

    match cmd {
        ConfigSubcommand::Get { key } => {
            let config =
                ConfigLoader::load(cluster, context).context("Failed to load configuration")?;
            match key {
                Some(key) => println!("{}", config::get_config_value(&config, &key)?),
                None => print!("{}", to_yaml(&config)?),
            }
        }
        ConfigSubcommand::Set {
            key,
            value,
            cluster,
            context,
        } => {
            // Only the target file's own contents are rewritten, not the merged view
            let path = match cluster.as_deref() {
                Some(cluster_name) => paths::cluster_config_path(cluster_name, context.as_deref()),
                None => paths::root_config_path(),
            };
            let mut config = if path.exists() {
                ConfigLoader::load_file(&path)?
            } else {
                ConfigLoader::load_defaults()
            };

            config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save(&config, &path).context("Failed to save configuration")?;
            match cluster {
                Some(cluster_name) => println!("Configuration saved for cluster: {}", cluster_name),
                None => println!("Configuration saved"),
            }
        }
        ConfigSubcommand::List => {
            let config =
                ConfigLoader::load(cluster, context).context("Failed to load configuration")?;
            print!("{}", to_yaml(&config)?);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
            if let Some(cluster_name) = cluster {
                println!("{}", paths::cluster_config_path(cluster_name, context).display());
            }
        }
        ConfigSubcommand::Validate => {
            ConfigLoader::validate(cluster, context).context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}

fn to_yaml(config: &config::Config) -> Result<String> {
    serde_yaml::to_string(config).context("Failed to serialize configuration")
}
