//! Related-resource aggregation

use serde::Serialize;

use super::graph::OwnershipGraph;
use crate::models::{Resource, ResourceBuckets};

/// A related resource with its position in the ownership tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedResource {
    /// Bucket (kind name) the resource was listed under
    pub bucket: String,
    /// Owner-reference hops to the parent; 1 means directly owned
    pub depth: usize,
    /// Uid of the owner through which the resource was reached
    pub owner_uid: String,
    pub resource: Resource,
}

/// Resources transitively owned by `parent`, in scan order
///
/// Scan order is bucket order, then the order of each bucket's data. Buckets that
/// are not loaded or carry a load error are ignored. A parent without
/// `metadata.uid` has no related resources.
pub fn flatten(buckets: &ResourceBuckets, parent: &Resource) -> Vec<Resource> {
    flatten_with_depth(buckets, parent)
        .into_iter()
        .map(|related| related.resource)
        .collect()
}

/// Same selection and order as [`flatten`], annotated with ownership depth
pub fn flatten_with_depth(buckets: &ResourceBuckets, parent: &Resource) -> Vec<RelatedResource> {
    let Some(parent_uid) = parent.uid() else {
        tracing::debug!("Parent has no metadata.uid, nothing is related");
        return Vec::new();
    };

    let graph = OwnershipGraph::build(buckets);
    let related: Vec<RelatedResource> = graph
        .reachable_from(parent_uid)
        .into_iter()
        .map(|reach| {
            let node = &graph.nodes[reach.node];
            RelatedResource {
                bucket: node.bucket.to_string(),
                depth: reach.depth,
                owner_uid: reach.via.to_string(),
                resource: node.resource.clone(),
            }
        })
        .collect();

    tracing::debug!(
        "Found {} resources related to {} out of {} candidates",
        related.len(),
        parent_uid,
        graph.nodes.len()
    );
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceBucket;
    use serde_json::json;

    fn obj(kind: &str, uid: &str, owners: &[&str]) -> Resource {
        let refs: Vec<_> = owners
            .iter()
            .map(|o| json!({"uid": o, "kind": "Owner", "name": "owner", "apiVersion": "v1"}))
            .collect();
        Resource::new(json!({
            "kind": kind,
            "metadata": {"uid": uid, "ownerReferences": refs}
        }))
    }

    fn parent() -> Resource {
        Resource::new(json!({"kind": "EtcdCluster", "metadata": {"uid": "P"}}))
    }

    fn uids(resources: &[Resource]) -> Vec<&str> {
        resources.iter().filter_map(|r| r.uid()).collect()
    }

    #[test]
    fn test_direct_and_transitive_children() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Deployment",
            ResourceBucket::loaded(vec![obj("Deployment", "a", &["P"])]),
        );
        buckets.insert(
            "Secret",
            ResourceBucket::loaded(vec![obj("Secret", "c", &[])]),
        );
        buckets.insert("Pod", ResourceBucket::loaded(vec![obj("Pod", "b", &["a"])]));

        let related = flatten(&buckets, &parent());
        assert_eq!(uids(&related), vec!["a", "b"]);
    }

    #[test]
    fn test_depth_annotations() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert("Pod", ResourceBucket::loaded(vec![obj("Pod", "b", &["a"])]));
        buckets.insert(
            "Deployment",
            ResourceBucket::loaded(vec![obj("Deployment", "a", &["P"])]),
        );

        let related = flatten_with_depth(&buckets, &parent());
        assert_eq!(related.len(), 2);
        // Scan order, not discovery order
        assert_eq!(related[0].bucket, "Pod");
        assert_eq!(related[0].depth, 2);
        assert_eq!(related[0].owner_uid, "a");
        assert_eq!(related[1].bucket, "Deployment");
        assert_eq!(related[1].depth, 1);
        assert_eq!(related[1].owner_uid, "P");
    }

    #[test]
    fn test_parent_without_uid() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert("Pod", ResourceBucket::loaded(vec![obj("Pod", "b", &["P"])]));
        let parent = Resource::new(json!({"kind": "EtcdCluster", "metadata": {}}));
        assert!(flatten(&buckets, &parent).is_empty());
    }

    #[test]
    fn test_resources_without_uid_are_excluded() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Pod",
            ResourceBucket::loaded(vec![
                Resource::new(json!({"kind": "Pod", "metadata": {"ownerReferences": [{"uid": "P"}]}})),
                Resource::new(json!({"kind": "Pod"})),
                obj("Pod", "ok", &["P"]),
            ]),
        );
        assert_eq!(uids(&flatten(&buckets, &parent())), vec!["ok"]);
    }

    #[test]
    fn test_multiple_owners_any_path_counts() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "ConfigMap",
            ResourceBucket::loaded(vec![obj("ConfigMap", "cm", &["stranger", "P"])]),
        );
        assert_eq!(uids(&flatten(&buckets, &parent())), vec!["cm"]);
    }
}
