//! Console paths and breadcrumbs

use serde::Serialize;

use crate::models::{KindReference, kind_for_reference};

/// Path segment for operator manifests
pub const CSV_PLURAL: &str = "clusterserviceversions";

/// A breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

/// Route parameters of an operand details page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandRoute {
    /// `None` for the all-namespaces view
    pub namespace: Option<String>,
    /// Name of the operator's CSV
    pub app_name: String,
    /// `group~version~kind` of the operand, or a bare kind
    pub plural: String,
    pub name: String,
}

impl OperandRoute {
    /// Installed Operators / operator / "<Kind> details"
    ///
    /// Built from the route parameters only, so it stays correct when several of them
    /// hold the same string.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let operators = installed_operators_path(self.namespace.as_deref());
        let operand_list = format!("{}/{}/{}", operators, self.app_name, self.plural);
        vec![
            Breadcrumb {
                name: "Installed Operators".to_string(),
                path: operators,
            },
            Breadcrumb {
                name: self.app_name.clone(),
                path: operand_list.clone(),
            },
            Breadcrumb {
                name: format!("{} details", kind_for_reference(&self.plural)),
                path: format!("{}/{}", operand_list, self.name),
            },
        ]
    }
}

fn namespace_prefix(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("/k8s/ns/{}", ns),
        None => "/k8s/all-namespaces".to_string(),
    }
}

pub fn installed_operators_path(namespace: Option<&str>) -> String {
    format!("{}/{}", namespace_prefix(namespace), CSV_PLURAL)
}

/// Creation form path; an unset namespace means `default`
pub fn create_path(namespace: Option<&str>, kind: &KindReference) -> String {
    format!("/k8s/ns/{}/{}/~new", namespace.unwrap_or("default"), kind)
}

pub fn project_details_path(name: &str) -> String {
    format!("/k8s/cluster/projects/{}/details", name)
}

/// Render breadcrumbs as `A > B > C`
pub fn breadcrumb_trail(crumbs: &[Breadcrumb]) -> String {
    crumbs
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}
