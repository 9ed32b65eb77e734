//! `related` command: resources owned by an operand

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::output::{resource_list, to_structured};
use crate::config::{self, Config, OutputFormat};
use crate::display::{OperandRoute, TableOptions, breadcrumb_trail, render_related_table};
use crate::kube::{
    self as kube_api, KubeLister, ResourceLister, fetch_buckets, fetch_object, resolve_kinds,
};
use crate::models::{KindReference, Resource, ResourceBuckets};
use crate::related::{RelatedResource, csv_kind, flatten_with_depth, resource_kinds_or};

#[derive(Args, Debug)]
pub struct RelatedArgs {
    /// Operand kind as `group~version~kind` or a builtin kind name
    #[arg(required_unless_present = "from_file")]
    pub kind: Option<String>,

    /// Operand name
    #[arg(required_unless_present = "from_file")]
    pub name: Option<String>,

    /// Namespace (defaults to the kube context, then `defaultNamespace`)
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// ClusterServiceVersion declaring which kinds the operand creates
    #[arg(long)]
    pub csv: Option<String>,

    /// Read `{parent, buckets}` from a YAML or JSON file instead of the cluster
    #[arg(long, conflicts_with_all = ["kind", "name", "namespace", "csv"])]
    pub from_file: Option<PathBuf>,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Add the ownership depth column
    #[arg(long)]
    pub show_depth: bool,

    #[arg(long)]
    pub no_headers: bool,
}

/// A parent and the buckets its related resources are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub parent: Resource,
    #[serde(default)]
    pub buckets: ResourceBuckets,
}

impl Snapshot {
    /// Load a snapshot; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
        }
    }

    pub fn related(&self) -> Vec<RelatedResource> {
        flatten_with_depth(&self.buckets, &self.parent)
    }
}

/// Fetch the operand, the kinds it may create, and one bucket per kind
///
/// A missing or unreadable CSV falls back to `fallback_kinds`; only failing to
/// fetch the operand itself is an error. Kinds are resolved against the cluster
/// before listing, since CSVs name them without an API group.
pub async fn collect_snapshot(
    lister: &dyn ResourceLister,
    operand: &KindReference,
    name: &str,
    namespace: &str,
    csv_name: Option<&str>,
    fallback_kinds: Vec<KindReference>,
) -> Result<Snapshot> {
    let parent = fetch_object(lister, operand, namespace, name)
        .await
        .with_context(|| format!("Failed to fetch {} {}", operand.kind, name))?;

    let csv = match csv_name {
        Some(csv_name) => match fetch_object(lister, &csv_kind(), namespace, csv_name).await {
            Ok(csv) => Some(csv),
            Err(e) => {
                tracing::warn!("Ignoring CSV {}: {:#}", csv_name, e);
                None
            }
        },
        None => None,
    };

    let declared = resource_kinds_or(csv.as_ref(), &operand.kind, || fallback_kinds);
    let kinds = resolve_kinds(lister, &declared).await;
    tracing::debug!(
        "Fetching {} kinds for {} {}",
        kinds.len(),
        operand.kind,
        name
    );
    let buckets = fetch_buckets(lister, &kinds, namespace).await;

    Ok(Snapshot { parent, buckets })
}

/// Render related resources in the requested format
pub fn render_related(
    related: Vec<RelatedResource>,
    format: OutputFormat,
    options: &TableOptions,
    now: DateTime<Utc>,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_related_table(&related, now, options)),
        _ => {
            let resources: Vec<Resource> = related.into_iter().map(|r| r.resource).collect();
            to_structured(&resource_list(&resources), format)
        }
    }
}

pub async fn handle_related(args: RelatedArgs, config: &Config) -> Result<()> {
    let format = match args.output.as_deref() {
        Some(output) => output.parse()?,
        None => config.output.format,
    };
    let options = TableOptions {
        no_headers: args.no_headers || config.output.no_headers,
        show_depth: args.show_depth || config.output.show_depth,
    };

    let snapshot = match args.from_file {
        Some(path) => Snapshot::from_path(&path)?,
        None => {
            let (Some(kind), Some(name)) = (args.kind.as_deref(), args.name.as_deref()) else {
                return Err(anyhow::anyhow!("KIND and NAME are required without --from-file"));
            };
            let operand = KindReference::parse(kind)?;
            let namespace = kube_api::resolve_namespace(
                args.namespace.as_deref(),
                &kube_api::current_context(),
                &config.default_namespace,
            );

            if let Some(csv) = args.csv.as_deref() {
                let route = OperandRoute {
                    namespace: Some(namespace.clone()),
                    app_name: csv.to_string(),
                    plural: operand.to_string(),
                    name: name.to_string(),
                };
                eprintln!("{}", breadcrumb_trail(&route.breadcrumbs()));
            }

            let client = kube_api::create_client().await?;
            let lister = KubeLister::discover(client).await;
            let fallback = config::fallback_resource_kinds(config)?;
            collect_snapshot(&lister, &operand, name, &namespace, args.csv.as_deref(), fallback)
                .await?
        }
    };

    for kind in snapshot.buckets.failed_kinds() {
        eprintln!("Warning: {} could not be loaded and was skipped", kind);
    }

    let related = snapshot.related();
    if format == OutputFormat::Table && related.is_empty() {
        eprintln!("No related resources found");
        return Ok(());
    }
    print!("{}", render_related(related, format, &options, Utc::now())?);
    Ok(())
}
