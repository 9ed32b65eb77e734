//! operand-view: list what an operator created for a custom resource, inspect
//! PersistentVolumeClaims and project details from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use operand_view::cli::{self, ConfigSubcommand, ProjectArgs, PvcArgs, PvcsArgs, RelatedArgs};
use operand_view::config::{Config, ConfigLoader};
use operand_view::kube::{ClusterContext, current_context, prepare_proxy_bypass};

#[derive(Parser, Debug)]
#[command(name = "operand-view")]
#[command(
    about = "Related-resource and storage views for Kubernetes operator operands",
    long_about = None
)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resources transitively owned by an operand
    Related(RelatedArgs),
    /// PersistentVolumeClaim details
    Pvc(PvcArgs),
    /// PersistentVolumeClaims in a namespace
    Pvcs(PvcsArgs),
    /// Project details card
    Project(ProjectArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_path) = cli::init_logging(args.debug) {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    // Proxy variables are process-wide; set them while this is the only thread
    let kube_context = current_context();
    prepare_proxy_bypass(&kube_context);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(run(args.command, &kube_context))
}

async fn run(command: Command, kube_context: &ClusterContext) -> Result<()> {
    match command {
        Command::Config { subcommand } => cli::handle_config_command(subcommand).await,
        Command::Version => {
            cli::display_version();
            Ok(())
        }
        Command::Related(related) => {
            cli::handle_related(related, &load_config(kube_context)).await
        }
        Command::Pvc(pvc) => {
            cli::handle_pvc(pvc, &load_config(kube_context)).await
        }
        Command::Pvcs(pvcs) => {
            cli::handle_pvcs(pvcs, &load_config(kube_context)).await
        }
        Command::Project(project) => {
            cli::handle_project(project, &load_config(kube_context)).await
        }
    }
}

/// Merged configuration for the current kube context, or defaults if it is invalid
fn load_config(kube_context: &ClusterContext) -> Config {
    let config = ConfigLoader::load(
        kube_context.cluster.as_deref(),
        kube_context.context.as_deref(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Warning: invalid configuration, using defaults: {:#}", e);
        ConfigLoader::load_defaults()
    });
    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, output={}",
        config.default_namespace,
        config.output.format
    );
    config
}
