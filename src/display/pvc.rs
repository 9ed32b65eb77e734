//! PersistentVolumeClaim list rows, details and capacity donut
//!
//! Usage metrics and permission flags are passed in by the caller; nothing here reads
//! shared state.

use std::collections::HashMap;

use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::Serialize;
use tabled::Tabled;

use super::quantity::{convert_to_base_value, format_number, humanize_binary_bytes, round_to};
use crate::config::FeatureFlags;

/// Status shown when a claim reports no phase
pub const DEFAULT_PHASE: &str = "Pending";

/// A plugin-provided status for claims it recognises
///
/// The applicable override with the highest priority wins over the built-in status.
pub trait PvcStatusOverride {
    fn priority(&self) -> i32;
    fn applies_to(&self, pvc: &PersistentVolumeClaim) -> bool;
    fn status(&self, pvc: &PersistentVolumeClaim) -> String;
}

/// Used bytes per claim, keyed by namespace then name
#[derive(Debug, Clone, Default)]
pub struct PvcMetrics {
    used_bytes: HashMap<String, HashMap<String, f64>>,
}

impl PvcMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: &str, name: &str, used_bytes: f64) {
        self.used_bytes
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), used_bytes);
    }

    pub fn used_bytes(&self, namespace: &str, name: &str) -> Option<f64> {
        self.used_bytes
            .get(namespace)
            .and_then(|claims| claims.get(name))
            .copied()
    }
}

/// Display status of a claim
pub fn pvc_status(pvc: &PersistentVolumeClaim, overrides: &[&dyn PvcStatusOverride]) -> String {
    let mut sorted: Vec<&&dyn PvcStatusOverride> = overrides.iter().collect();
    sorted.sort_by_key(|o| std::cmp::Reverse(o.priority()));
    if let Some(winner) = sorted.into_iter().find(|o| o.applies_to(pvc)) {
        return winner.status(pvc);
    }

    if pvc.metadata.deletion_timestamp.is_some() {
        return "Terminating".to_string();
    }
    pvc.status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| DEFAULT_PHASE.to_string())
}

/// `status.capacity.storage` in bytes
pub fn capacity_bytes(pvc: &PersistentVolumeClaim) -> Option<f64> {
    pvc.status
        .as_ref()
        .and_then(|s| s.capacity.as_ref())
        .and_then(|c| c.get("storage"))
        .and_then(|q| convert_to_base_value(&q.0).ok())
}

/// `spec.resources.requests.storage` in bytes
pub fn requested_bytes(pvc: &PersistentVolumeClaim) -> Option<f64> {
    pvc.spec
        .as_ref()
        .and_then(|s| s.resources.as_ref())
        .and_then(|r| r.requests.as_ref())
        .and_then(|r| r.get("storage"))
        .and_then(|q| convert_to_base_value(&q.0).ok())
}

/// One row of the claims list
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct PvcRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "NAMESPACE")]
    pub namespace: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "VOLUME")]
    pub volume: String,
    #[tabled(rename = "CAPACITY")]
    pub capacity: String,
    #[tabled(rename = "USED")]
    pub used: String,
    #[tabled(rename = "STORAGECLASS")]
    pub storage_class: String,
}

pub fn pvc_row(
    pvc: &PersistentVolumeClaim,
    metrics: &PvcMetrics,
    overrides: &[&dyn PvcStatusOverride],
) -> PvcRow {
    let name = pvc.metadata.name.clone().unwrap_or_default();
    let namespace = pvc.metadata.namespace.clone().unwrap_or_default();
    let spec = pvc.spec.as_ref();

    PvcRow {
        status: pvc_status(pvc, overrides),
        volume: spec
            .and_then(|s| s.volume_name.clone())
            .unwrap_or_else(|| "No PersistentVolume".to_string()),
        capacity: capacity_bytes(pvc)
            .filter(|bytes| *bytes > 0.0)
            .map(|bytes| humanize_binary_bytes(bytes, None).string)
            .unwrap_or_else(|| "-".to_string()),
        used: metrics
            .used_bytes(&namespace, &name)
            .filter(|bytes| *bytes > 0.0)
            .map(|bytes| humanize_binary_bytes(bytes, None).string)
            .unwrap_or_else(|| "-".to_string()),
        storage_class: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_else(|| "-".to_string()),
        name,
        namespace,
    }
}

/// One slice of the capacity donut
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: &'static str,
    pub value: f64,
}

/// Capacity donut: used vs available when usage is known, total otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityDonut {
    pub title: String,
    pub subtitle: &'static str,
    pub unit: &'static str,
    pub slices: Vec<DonutSlice>,
}

/// Build the donut for a claim's total capacity and optional used bytes
///
/// Returns `None` when the total capacity is unknown or zero. All slice values are in
/// the unit chosen for the total.
pub fn capacity_donut(total_bytes: Option<f64>, used_bytes: Option<f64>) -> Option<CapacityDonut> {
    let total_bytes = total_bytes.filter(|t| *t > 0.0)?;
    let total = humanize_binary_bytes(total_bytes, None);

    match used_bytes {
        Some(used_bytes) => {
            let used = humanize_binary_bytes(used_bytes, Some(total.unit));
            let available = humanize_binary_bytes(total_bytes - used_bytes, Some(total.unit));
            Some(CapacityDonut {
                title: format!("{} {}", format_number(round_to(available.value, 1)), total.unit),
                subtitle: "Available",
                unit: total.unit,
                slices: vec![
                    DonutSlice {
                        label: "Used",
                        value: used.value,
                    },
                    DonutSlice {
                        label: "Available",
                        value: available.value,
                    },
                ],
            })
        }
        None => Some(CapacityDonut {
            title: format!("{} {}", format_number(round_to(total.value, 1)), total.unit),
            subtitle: "Total",
            unit: total.unit,
            slices: vec![DonutSlice {
                label: "Total",
                value: total.value,
            }],
        }),
    }
}

/// A condition row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionRow {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

/// Everything the claim details page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvcDetails {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub label_selector: String,
    pub requested_capacity: String,
    pub capacity: Option<String>,
    pub used: Option<String>,
    pub access_modes: Option<String>,
    pub volume_mode: String,
    pub storage_class: String,
    /// Only set when the viewer may list PersistentVolumes
    pub persistent_volume: Option<String>,
    /// Prometheus query for used bytes, empty without name and namespace
    pub usage_query: String,
    pub donut: Option<CapacityDonut>,
    pub conditions: Vec<ConditionRow>,
}

pub fn pvc_details(
    pvc: &PersistentVolumeClaim,
    used_bytes: Option<f64>,
    flags: &FeatureFlags,
    overrides: &[&dyn PvcStatusOverride],
) -> PvcDetails {
    let name = pvc.metadata.name.clone().unwrap_or_default();
    let namespace = pvc.metadata.namespace.clone().unwrap_or_default();
    let spec = pvc.spec.as_ref();
    let status = pvc.status.as_ref();
    let total_bytes = capacity_bytes(pvc);

    let usage_query = if !name.is_empty() && !namespace.is_empty() {
        format!(
            "kubelet_volume_stats_used_bytes{{persistentvolumeclaim='{}',namespace='{}'}}",
            name, namespace
        )
    } else {
        String::new()
    };

    PvcDetails {
        status: pvc_status(pvc, overrides),
        label_selector: spec
            .and_then(|s| s.selector.as_ref())
            .map(format_label_selector)
            .unwrap_or_else(|| "No selector".to_string()),
        requested_capacity: humanize_binary_bytes(requested_bytes(pvc).unwrap_or(0.0), None).string,
        capacity: total_bytes.map(|bytes| humanize_binary_bytes(bytes, None).string),
        used: used_bytes.map(|bytes| humanize_binary_bytes(bytes, None).string),
        access_modes: status
            .and_then(|s| s.access_modes.as_ref())
            .filter(|modes| !modes.is_empty())
            .map(|modes| modes.join(", ")),
        volume_mode: spec
            .and_then(|s| s.volume_mode.clone())
            .unwrap_or_else(|| "Filesystem".to_string()),
        storage_class: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_else(|| "-".to_string()),
        persistent_volume: spec
            .and_then(|s| s.volume_name.clone())
            .filter(|_| flags.can_list_persistent_volumes),
        usage_query,
        donut: capacity_donut(total_bytes, used_bytes),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .map(|c| ConditionRow {
                        type_: c.type_.clone(),
                        status: c.status.clone(),
                        reason: c.reason.clone(),
                        message: c.message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        name,
        namespace,
    }
}

/// `app=db, tier in (a,b)` style rendering of a selector
pub fn format_label_selector(selector: &LabelSelector) -> String {
    let mut parts: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for expr in selector.match_expressions.iter().flatten() {
        let values = expr.values.clone().unwrap_or_default().join(",");
        parts.push(match expr.operator.as_str() {
            "In" => format!("{} in ({})", expr.key, values),
            "NotIn" => format!("{} notin ({})", expr.key, values),
            "Exists" => expr.key.clone(),
            "DoesNotExist" => format!("!{}", expr.key),
            other => format!("{} {} ({})", expr.key, other, values),
        });
    }

    if parts.is_empty() {
        "No selector".to_string()
    } else {
        parts.join(", ")
    }
}
