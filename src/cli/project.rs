//! `project` command

use anyhow::Result;
use clap::Args;

use super::output::to_structured;
use crate::config::{Config, OutputFormat};
use crate::display::ProjectDetails;
use crate::display::project_details;
use crate::kube::{self as kube_api, fetch};

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project (namespace) name
    pub name: String,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

pub fn render_project_card(details: &ProjectDetails) -> String {
    let labels = if details.labels.is_empty() {
        "No labels".to_string()
    } else {
        let mut shown: Vec<String> = details
            .labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        if details.more_labels {
            shown.push("...".to_string());
        }
        shown.join(", ")
    };

    let mut out = format!(
        "Name:         {}\nRequester:    {}\nLabels:       {}\nDescription:  {}\n",
        details.name,
        details.requester.as_deref().unwrap_or("No requester"),
        labels,
        details.description.as_deref().unwrap_or("No description"),
    );
    if details.service_mesh_enabled {
        out.push_str("Service Mesh: enabled\n");
    }
    out.push_str(&format!("Details:      {}\n", details.details_path));
    out
}

pub async fn handle_project(args: ProjectArgs, config: &Config) -> Result<()> {
    let format = match args.output.as_deref() {
        Some(output) => output.parse()?,
        None => config.output.format,
    };

    let client = kube_api::create_client().await?;
    let namespace = fetch::get_namespace(&client, &args.name).await?;
    let details = project_details(&namespace.metadata);

    match format {
        OutputFormat::Table => print!("{}", render_project_card(&details)),
        _ => print!("{}", to_structured(&details, format)?),
    }
    Ok(())
}
