//! Resource kind definitions
//!
//! `BuiltinKind` covers the Kubernetes kinds the related-resources view knows how to
//! address without discovery. `KindReference` is the `group~version~kind` string the
//! console uses in URLs, and what the fetch layer turns into an `ApiResource`.

use std::fmt;
use std::str::FromStr;

use kube::core::GroupVersionKind;
use serde::{Deserialize, Serialize};

/// Errors from parsing a kind reference
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KindReferenceError {
    #[error("empty kind reference")]
    Empty,

    #[error("invalid kind reference '{0}': expected 'group~version~kind'")]
    Malformed(String),

    #[error("unknown kind '{0}': use the full 'group~version~kind' form")]
    UnknownKind(String),
}

/// Well-known Kubernetes kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Deployment,
    Service,
    ReplicaSet,
    Pod,
    Secret,
    ConfigMap,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    PersistentVolumeClaim,
    ServiceAccount,
    Role,
    RoleBinding,
    Namespace,
}

impl BuiltinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "Deployment",
            BuiltinKind::Service => "Service",
            BuiltinKind::ReplicaSet => "ReplicaSet",
            BuiltinKind::Pod => "Pod",
            BuiltinKind::Secret => "Secret",
            BuiltinKind::ConfigMap => "ConfigMap",
            BuiltinKind::StatefulSet => "StatefulSet",
            BuiltinKind::DaemonSet => "DaemonSet",
            BuiltinKind::Job => "Job",
            BuiltinKind::CronJob => "CronJob",
            BuiltinKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            BuiltinKind::ServiceAccount => "ServiceAccount",
            BuiltinKind::Role => "Role",
            BuiltinKind::RoleBinding => "RoleBinding",
            BuiltinKind::Namespace => "Namespace",
        }
    }

    /// API group, empty for the core group
    pub fn group(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment
            | BuiltinKind::ReplicaSet
            | BuiltinKind::StatefulSet
            | BuiltinKind::DaemonSet => "apps",
            BuiltinKind::Job | BuiltinKind::CronJob => "batch",
            BuiltinKind::Role | BuiltinKind::RoleBinding => "rbac.authorization.k8s.io",
            _ => "",
        }
    }

    pub fn version(&self) -> &'static str {
        "v1"
    }

    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn all() -> &'static [Self] {
        &[
            BuiltinKind::Deployment,
            BuiltinKind::Service,
            BuiltinKind::ReplicaSet,
            BuiltinKind::Pod,
            BuiltinKind::Secret,
            BuiltinKind::ConfigMap,
            BuiltinKind::StatefulSet,
            BuiltinKind::DaemonSet,
            BuiltinKind::Job,
            BuiltinKind::CronJob,
            BuiltinKind::PersistentVolumeClaim,
            BuiltinKind::ServiceAccount,
            BuiltinKind::Role,
            BuiltinKind::RoleBinding,
            BuiltinKind::Namespace,
        ]
    }

    /// Kinds listed when an operator's CSV says nothing about an operand
    pub fn defaults() -> &'static [Self] {
        &[
            BuiltinKind::Deployment,
            BuiltinKind::Service,
            BuiltinKind::ReplicaSet,
            BuiltinKind::Pod,
            BuiltinKind::Secret,
            BuiltinKind::ConfigMap,
        ]
    }

    /// Parse kubectl-style names and short names
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deployment" | "deployments" | "deploy" => Some(BuiltinKind::Deployment),
            "service" | "services" | "svc" => Some(BuiltinKind::Service),
            "replicaset" | "replicasets" | "rs" => Some(BuiltinKind::ReplicaSet),
            "pod" | "pods" | "po" => Some(BuiltinKind::Pod),
            "secret" | "secrets" => Some(BuiltinKind::Secret),
            "configmap" | "configmaps" | "cm" => Some(BuiltinKind::ConfigMap),
            "statefulset" | "statefulsets" | "sts" => Some(BuiltinKind::StatefulSet),
            "daemonset" | "daemonsets" | "ds" => Some(BuiltinKind::DaemonSet),
            "job" | "jobs" => Some(BuiltinKind::Job),
            "cronjob" | "cronjobs" | "cj" => Some(BuiltinKind::CronJob),
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Some(BuiltinKind::PersistentVolumeClaim)
            }
            "serviceaccount" | "serviceaccounts" | "sa" => Some(BuiltinKind::ServiceAccount),
            "role" | "roles" => Some(BuiltinKind::Role),
            "rolebinding" | "rolebindings" => Some(BuiltinKind::RoleBinding),
            "namespace" | "namespaces" | "ns" => Some(BuiltinKind::Namespace),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BuiltinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown builtin kind: {}", s))
    }
}

/// Stands in for the empty core API group in references
pub const CORE_GROUP_ALIAS: &str = "core";

/// A resource type as `group~version~kind`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KindReference {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl KindReference {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Reference for a kind named without its group
    ///
    /// Builtin kinds get their real group. Anything else is left in the core group
    /// with the given version until resolved against the kinds the cluster serves.
    pub fn for_kind(kind: &str, version: Option<&str>) -> Self {
        match BuiltinKind::parse_optional(kind) {
            Some(builtin) => Self::new(
                builtin.group(),
                version.unwrap_or(builtin.version()),
                builtin.as_str(),
            ),
            None => Self::new("", version.unwrap_or("v1"), kind),
        }
    }

    /// Parse `group~version~kind`, or a builtin kind name / short name
    pub fn parse(s: &str) -> Result<Self, KindReferenceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KindReferenceError::Empty);
        }

        if s.contains('~') {
            let parts: Vec<&str> = s.split('~').collect();
            return match parts.as_slice() {
                [group, version, kind] if !version.is_empty() && !kind.is_empty() => {
                    let group = if *group == CORE_GROUP_ALIAS { "" } else { *group };
                    Ok(Self::new(group, *version, *kind))
                }
                _ => Err(KindReferenceError::Malformed(s.to_string())),
            };
        }

        BuiltinKind::from_str_case_insensitive(s)
            .map(|builtin| Self::new(builtin.group(), builtin.version(), builtin.as_str()))
            .ok_or_else(|| KindReferenceError::UnknownKind(s.to_string()))
    }

    /// `apiVersion` as it appears on objects
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&self.group, &self.version, &self.kind)
    }
}

impl fmt::Display for KindReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group.is_empty() {
            CORE_GROUP_ALIAS
        } else {
            &self.group
        };
        write!(f, "{}~{}~{}", group, self.version, self.kind)
    }
}

impl FromStr for KindReference {
    type Err = KindReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Kind segment of a `group~version~kind` reference, or the input unchanged
pub fn kind_for_reference(reference: &str) -> &str {
    reference.rsplit('~').next().unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reference() {
        let reference =
            KindReference::parse("etcd.database.coreos.com~v1beta2~EtcdCluster").unwrap();
        assert_eq!(reference.group, "etcd.database.coreos.com");
        assert_eq!(reference.version, "v1beta2");
        assert_eq!(reference.kind, "EtcdCluster");
        assert_eq!(reference.api_version(), "etcd.database.coreos.com/v1beta2");
        assert_eq!(
            reference.to_string(),
            "etcd.database.coreos.com~v1beta2~EtcdCluster"
        );
    }

    #[test]
    fn test_parse_short_names() {
        let deploy = KindReference::parse("deploy").unwrap();
        assert_eq!(deploy, KindReference::new("apps", "v1", "Deployment"));
        assert_eq!(deploy.api_version(), "apps/v1");

        let pod = KindReference::parse("Pod").unwrap();
        assert_eq!(pod.api_version(), "v1");
        assert_eq!(pod.to_string(), "core~v1~Pod");
        assert_eq!(KindReference::parse("core~v1~Pod").unwrap(), pod);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KindReference::parse("  "), Err(KindReferenceError::Empty));
        assert!(matches!(
            KindReference::parse("a~b"),
            Err(KindReferenceError::Malformed(_))
        ));
        assert!(matches!(
            KindReference::parse("Widget"),
            Err(KindReferenceError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_for_kind_infers_group() {
        assert_eq!(
            KindReference::for_kind("StatefulSet", None),
            KindReference::new("apps", "v1", "StatefulSet")
        );
        assert_eq!(
            KindReference::for_kind("CronJob", Some("v1")),
            KindReference::new("batch", "v1", "CronJob")
        );
        assert_eq!(
            KindReference::for_kind("Widget", Some("v2")),
            KindReference::new("", "v2", "Widget")
        );
    }

    #[test]
    fn test_kind_for_reference() {
        assert_eq!(
            kind_for_reference("testapp.coreos.com~v1alpha1~TestResource"),
            "TestResource"
        );
        assert_eq!(kind_for_reference("example"), "example");
    }

    #[test]
    fn test_defaults_are_builtin() {
        assert_eq!(BuiltinKind::defaults().len(), 6);
        for kind in BuiltinKind::defaults() {
            assert_eq!(BuiltinKind::parse_optional(kind.as_str()), Some(*kind));
        }
    }
}
