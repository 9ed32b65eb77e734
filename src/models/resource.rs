//! Untyped Kubernetes resource wrapper
//!
//! Resources arrive from the API server (or from a snapshot file) as arbitrary JSON.
//! `Resource` keeps the raw value and exposes the few fields the views need, treating
//! anything missing or mistyped as absent instead of failing.

use kube::core::DynamicObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single owner reference from `metadata.ownerReferences`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef<'a> {
    pub uid: &'a str,
    pub kind: Option<&'a str>,
    pub name: Option<&'a str>,
    pub api_version: Option<&'a str>,
    pub controller: bool,
}

/// A Kubernetes object held as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Value);

impl Resource {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(|k| k.as_str())
    }

    pub fn metadata(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.get("metadata").and_then(|m| m.as_object())
    }

    /// `metadata.uid`, ignoring empty strings
    pub fn uid(&self) -> Option<&str> {
        self.metadata_str("uid").filter(|uid| !uid.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    pub fn creation_timestamp(&self) -> Option<&str> {
        self.metadata_str("creationTimestamp")
    }

    /// Owner references with a usable uid, in declaration order
    ///
    /// Entries that are not objects or carry no uid are skipped.
    pub fn owner_refs(&self) -> Vec<OwnerRef<'_>> {
        let Some(refs) = self
            .metadata()
            .and_then(|m| m.get("ownerReferences"))
            .and_then(|o| o.as_array())
        else {
            return Vec::new();
        };

        refs.iter()
            .filter_map(|owner| {
                let uid = owner
                    .get("uid")
                    .and_then(|u| u.as_str())
                    .filter(|u| !u.is_empty())?;
                Some(OwnerRef {
                    uid,
                    kind: owner.get("kind").and_then(|k| k.as_str()),
                    name: owner.get("name").and_then(|n| n.as_str()),
                    api_version: owner.get("apiVersion").and_then(|a| a.as_str()),
                    controller: owner
                        .get("controller")
                        .and_then(|c| c.as_bool())
                        .unwrap_or(false),
                })
            })
            .collect()
    }

    /// `status.phase`, if the resource reports one
    pub fn phase(&self) -> Option<&str> {
        self.0
            .get("status")
            .and_then(|s| s.get("phase"))
            .and_then(|p| p.as_str())
    }

    /// Walk a dotted path of object keys, e.g. `spec.pipelineRef.name`
    pub fn pointer_str(&self, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(&self.0, |value, key| value.get(key))
            .and_then(|v| v.as_str())
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
    }
}

impl From<Value> for Resource {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl TryFrom<DynamicObject> for Resource {
    type Error = serde_json::Error;

    fn try_from(obj: DynamicObject) -> Result<Self, Self::Error> {
        serde_json::to_value(&obj).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_on_complete_object() {
        let pod = Resource::new(json!({
            "kind": "Pod",
            "metadata": {
                "name": "web-0",
                "namespace": "shop",
                "uid": "b",
                "ownerReferences": [
                    {"uid": "a", "kind": "ReplicaSet", "name": "web", "apiVersion": "apps/v1", "controller": true}
                ]
            },
            "status": {"phase": "Running"}
        }));

        assert_eq!(pod.kind(), Some("Pod"));
        assert_eq!(pod.name(), Some("web-0"));
        assert_eq!(pod.namespace(), Some("shop"));
        assert_eq!(pod.uid(), Some("b"));
        assert_eq!(pod.phase(), Some("Running"));

        let owners = pod.owner_refs();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].uid, "a");
        assert_eq!(owners[0].kind, Some("ReplicaSet"));
        assert!(owners[0].controller);
    }

    #[test]
    fn test_malformed_metadata_reads_as_absent() {
        let no_meta = Resource::new(json!({"kind": "Secret"}));
        assert_eq!(no_meta.uid(), None);
        assert!(no_meta.owner_refs().is_empty());

        let bad_meta = Resource::new(json!({"metadata": "oops"}));
        assert_eq!(bad_meta.uid(), None);

        let empty_uid = Resource::new(json!({"metadata": {"uid": ""}}));
        assert_eq!(empty_uid.uid(), None);
    }

    #[test]
    fn test_owner_refs_skip_entries_without_uid() {
        let obj = Resource::new(json!({
            "metadata": {
                "uid": "x",
                "ownerReferences": [{"name": "no-uid"}, 7, {"uid": "p"}]
            }
        }));
        let uids: Vec<&str> = obj.owner_refs().iter().map(|o| o.uid).collect();
        assert_eq!(uids, vec!["p"]);
    }

    #[test]
    fn test_pointer_str() {
        let obj = Resource::new(json!({"spec": {"pipelineRef": {"name": "build"}}}));
        assert_eq!(obj.pointer_str("spec.pipelineRef.name"), Some("build"));
        assert_eq!(obj.pointer_str("spec.missing.name"), None);
    }
}
