//! `pvc` and `pvcs` commands

use anyhow::Result;
use clap::Args;

use super::output::to_structured;
use crate::config::{Config, OutputFormat};
use crate::display::{PvcDetails, PvcMetrics, TableOptions, pvc_details, pvc_row, render_pvc_table};
use crate::kube::{self as kube_api, fetch};

#[derive(Args, Debug)]
pub struct PvcArgs {
    /// Claim name
    pub name: String,

    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Used bytes reported by volume metrics, if known
    #[arg(long)]
    pub used_bytes: Option<f64>,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

#[derive(Args, Debug)]
pub struct PvcsArgs {
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    #[arg(long)]
    pub no_headers: bool,
}

/// Labelled lines for the claim details view
pub fn render_pvc_details(details: &PvcDetails) -> String {
    let dash = || "-".to_string();
    let mut lines = vec![
        ("Name", details.name.clone()),
        ("Namespace", details.namespace.clone()),
        ("Status", details.status.clone()),
        ("Label Selector", details.label_selector.clone()),
        ("Requested Capacity", details.requested_capacity.clone()),
        ("Capacity", details.capacity.clone().unwrap_or_else(dash)),
        ("Used", details.used.clone().unwrap_or_else(dash)),
        ("Access Modes", details.access_modes.clone().unwrap_or_else(dash)),
        ("Volume Mode", details.volume_mode.clone()),
        ("StorageClass", details.storage_class.clone()),
    ];
    if let Some(volume) = &details.persistent_volume {
        lines.push(("PersistentVolume", volume.clone()));
    }
    if let Some(donut) = &details.donut {
        lines.push(("Chart", format!("{} {}", donut.title, donut.subtitle)));
    }
    if !details.usage_query.is_empty() {
        lines.push(("Usage Query", details.usage_query.clone()));
    }

    let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out: String = lines
        .iter()
        .map(|(label, value)| {
            let label = format!("{}:", label);
            format!("{:<width$}  {}\n", label, value, width = width + 1)
        })
        .collect();

    if !details.conditions.is_empty() {
        out.push_str("Conditions:\n");
        for condition in &details.conditions {
            out.push_str(&format!(
                "  {}={} {}\n",
                condition.type_,
                condition.status,
                condition.reason.as_deref().unwrap_or("")
            ));
        }
    }
    out
}

fn output_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(output) => output.parse(),
        None => Ok(config.output.format),
    }
}

pub async fn handle_pvc(args: PvcArgs, config: &Config) -> Result<()> {
    let format = output_format(args.output.as_deref(), config)?;
    let namespace = kube_api::resolve_namespace(
        args.namespace.as_deref(),
        &kube_api::current_context(),
        &config.default_namespace,
    );

    let client = kube_api::create_client().await?;
    let pvc = fetch::get_pvc(&client, &namespace, &args.name).await?;
    let details = pvc_details(&pvc, args.used_bytes, &config.flags, &[]);

    match format {
        OutputFormat::Table => print!("{}", render_pvc_details(&details)),
        _ => print!("{}", to_structured(&details, format)?),
    }
    Ok(())
}

pub async fn handle_pvcs(args: PvcsArgs, config: &Config) -> Result<()> {
    let format = output_format(args.output.as_deref(), config)?;
    let namespace = kube_api::resolve_namespace(
        args.namespace.as_deref(),
        &kube_api::current_context(),
        &config.default_namespace,
    );

    let client = kube_api::create_client().await?;
    let claims = fetch::list_pvcs(&client, &namespace).await?;
    if claims.is_empty() {
        eprintln!("No PersistentVolumeClaims found in {}", namespace);
        return Ok(());
    }

    // No metrics source is wired in, so usage shows as unknown
    let metrics = PvcMetrics::new();
    let rows: Vec<_> = claims.iter().map(|pvc| pvc_row(pvc, &metrics, &[])).collect();

    match format {
        OutputFormat::Table => {
            let options = TableOptions {
                no_headers: args.no_headers || config.output.no_headers,
                show_depth: false,
            };
            print!("{}", render_pvc_table(&rows, &options));
        }
        _ => print!("{}", to_structured(&rows, format)?),
    }
    Ok(())
}
