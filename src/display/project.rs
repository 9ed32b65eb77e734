//! Project dashboard details card

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;

use super::routes::project_details_path;

pub const REQUESTER_ANNOTATION: &str = "openshift.io/requester";
pub const DESCRIPTION_ANNOTATION: &str = "openshift.io/description";
pub const SERVICE_MESH_LABEL: &str = "maistra.io/member-of";

/// Labels shown on the card before linking to the full list
const CARD_LABEL_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub name: String,
    pub requester: Option<String>,
    /// First labels by key
    pub labels: BTreeMap<String, String>,
    /// More labels exist than are shown
    pub more_labels: bool,
    pub description: Option<String>,
    pub service_mesh_enabled: bool,
    pub details_path: String,
}

pub fn project_details(meta: &ObjectMeta) -> ProjectDetails {
    let name = meta.name.clone().unwrap_or_default();
    let all_labels = meta.labels.clone().unwrap_or_default();
    let annotation = |key: &str| {
        meta.annotations
            .as_ref()
            .and_then(|a| a.get(key))
            .filter(|v| !v.is_empty())
            .cloned()
    };

    ProjectDetails {
        requester: annotation(REQUESTER_ANNOTATION),
        description: annotation(DESCRIPTION_ANNOTATION),
        service_mesh_enabled: all_labels
            .get(SERVICE_MESH_LABEL)
            .is_some_and(|v| !v.is_empty()),
        more_labels: all_labels.len() > CARD_LABEL_LIMIT,
        // BTreeMap iterates in key order
        labels: all_labels.into_iter().take(CARD_LABEL_LIMIT).collect(),
        details_path: project_details_path(&name),
        name,
    }
}
