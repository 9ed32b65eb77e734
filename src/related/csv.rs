//! Candidate kinds for an operand's related resources
//!
//! An operator's ClusterServiceVersion may declare, per owned CRD, which resource
//! kinds instances of that CRD create. Those are the buckets worth fetching.

use serde_json::Value;

use crate::models::{BuiltinKind, KindReference, Resource};

/// Kinds declared for `operand_kind` in the CSV, or the builtin defaults
pub fn resource_kinds_for(csv: Option<&Resource>, operand_kind: &str) -> Vec<KindReference> {
    resource_kinds_or(csv, operand_kind, default_resource_kinds)
}

/// Kinds declared for `operand_kind` in the CSV, or whatever `fallback` returns
pub fn resource_kinds_or<F>(
    csv: Option<&Resource>,
    operand_kind: &str,
    fallback: F,
) -> Vec<KindReference>
where
    F: FnOnce() -> Vec<KindReference>,
{
    match csv.and_then(|csv| declared_resource_kinds(csv, operand_kind)) {
        Some(kinds) if !kinds.is_empty() => kinds,
        _ => {
            tracing::debug!(
                "No resources declared for {} in CSV, using default kinds",
                operand_kind
            );
            fallback()
        }
    }
}

/// Reference of the ClusterServiceVersion kind
pub fn csv_kind() -> KindReference {
    KindReference::new("operators.coreos.com", "v1alpha1", "ClusterServiceVersion")
}

/// Default kinds as references
pub fn default_resource_kinds() -> Vec<KindReference> {
    BuiltinKind::defaults()
        .iter()
        .map(|kind| KindReference::for_kind(kind.as_str(), None))
        .collect()
}

/// `spec.customresourcedefinitions.owned[kind == operand_kind].resources[]`
///
/// Entries without a kind are skipped; a kind listed twice is only returned once.
fn declared_resource_kinds(csv: &Resource, operand_kind: &str) -> Option<Vec<KindReference>> {
    let owned = csv
        .as_value()
        .get("spec")
        .and_then(|s| s.get("customresourcedefinitions"))
        .and_then(|c| c.get("owned"))
        .and_then(|o| o.as_array())?;

    let crd = owned
        .iter()
        .find(|crd| crd.get("kind").and_then(|k| k.as_str()) == Some(operand_kind))?;

    let resources = crd.get("resources").and_then(|r| r.as_array())?;

    let mut kinds: Vec<KindReference> = Vec::new();
    for entry in resources {
        let Some(kind) = entry.get("kind").and_then(Value::as_str) else {
            tracing::warn!("Ignoring CSV resource entry without kind: {}", entry);
            continue;
        };
        let reference =
            KindReference::for_kind(kind, entry.get("version").and_then(Value::as_str));
        if !kinds.contains(&reference) {
            kinds.push(reference);
        }
    }
    Some(kinds)
}
