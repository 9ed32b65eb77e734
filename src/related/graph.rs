//! Ownership graph over fetched resources
//!
//! Nodes are the resources of every usable bucket, in scan order. Edges point from an
//! owner uid to a dependent node; the owner does not have to be a node itself (the
//! parent being inspected usually isn't in any bucket).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{Resource, ResourceBuckets};

/// A resource in the ownership graph
#[derive(Debug, Clone)]
pub struct GraphNode<'a> {
    /// `metadata.uid` of the resource
    pub id: &'a str,
    /// Bucket the resource came from
    pub bucket: &'a str,
    pub resource: &'a Resource,
}

/// Type of relationship between owner and dependent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipType {
    /// Plain owner reference
    Owns,
    /// Owner reference with `controller: true`
    Controls,
}

/// Owner uid → dependent node
#[derive(Debug, Clone)]
pub struct GraphEdge<'a> {
    pub from: &'a str,
    pub to: usize,
    pub relationship: RelationshipType,
}

/// How a node was reached from the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reach<'a> {
    /// Index into `OwnershipGraph::nodes`
    pub node: usize,
    /// Number of owner-reference hops from the root
    pub depth: usize,
    /// Owner uid through which the node was first reached
    pub via: &'a str,
}

/// Reverse ownership adjacency for a set of buckets
#[derive(Debug, Clone, Default)]
pub struct OwnershipGraph<'a> {
    pub nodes: Vec<GraphNode<'a>>,
    pub edges: Vec<GraphEdge<'a>>,
    /// uid → node indices; more than one when a uid shows up in several buckets
    pub node_index: HashMap<&'a str, Vec<usize>>,
    dependents: HashMap<&'a str, Vec<usize>>,
}

impl<'a> OwnershipGraph<'a> {
    /// Build the graph from every usable bucket
    ///
    /// Resources without a uid can't take part in ownership and are left out.
    pub fn build(buckets: &'a ResourceBuckets) -> Self {
        let mut graph = Self::default();

        for (kind, bucket) in buckets.iter() {
            if !bucket.is_usable() {
                tracing::debug!(
                    "Skipping bucket {} (loaded={}, error={})",
                    kind,
                    bucket.loaded,
                    bucket.load_error.is_some()
                );
                continue;
            }

            for resource in &bucket.data {
                let Some(uid) = resource.uid() else {
                    tracing::debug!("Skipping {} entry without metadata.uid", kind);
                    continue;
                };
                graph.add_node(GraphNode {
                    id: uid,
                    bucket: kind,
                    resource,
                });
            }
        }

        tracing::debug!(
            "Built ownership graph with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }

    /// Add a node and an edge for each of its owner references
    pub fn add_node(&mut self, node: GraphNode<'a>) {
        let index = self.nodes.len();
        for owner in node.resource.owner_refs() {
            self.add_edge(GraphEdge {
                from: owner.uid,
                to: index,
                relationship: if owner.controller {
                    RelationshipType::Controls
                } else {
                    RelationshipType::Owns
                },
            });
        }
        self.node_index.entry(node.id).or_default().push(index);
        self.nodes.push(node);
    }

    fn add_edge(&mut self, edge: GraphEdge<'a>) {
        let targets = self.dependents.entry(edge.from).or_default();
        // An object listing the same owner twice still has one edge
        if targets.contains(&edge.to) {
            return;
        }
        targets.push(edge.to);
        self.edges.push(edge);
    }

    /// Nodes that name `uid` as an owner, in scan order
    pub fn dependents_of(&self, uid: &str) -> &[usize] {
        self.dependents.get(uid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every node transitively owned by `root`, ordered by node index
    ///
    /// Breadth-first over the reverse adjacency. Each uid is expanded at most once,
    /// so cyclic ownership data terminates. Objects carrying `root`'s own uid are
    /// never returned, even when a cycle leads back to them.
    pub fn reachable_from(&self, root: &'a str) -> Vec<Reach<'a>> {
        let mut reached: Vec<Option<Reach<'a>>> = vec![None; self.nodes.len()];
        let mut visited: HashSet<&'a str> = HashSet::from([root]);
        let mut queue: VecDeque<(&'a str, usize)> = VecDeque::from([(root, 0)]);

        while let Some((uid, depth)) = queue.pop_front() {
            for &index in self.dependents_of(uid) {
                let child = self.nodes[index].id;
                if reached[index].is_some() || child == root {
                    continue;
                }
                reached[index] = Some(Reach {
                    node: index,
                    depth: depth + 1,
                    via: uid,
                });

                if visited.insert(child) {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        reached.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceBucket;
    use serde_json::json;

    fn obj(uid: &str, owners: &[&str]) -> Resource {
        let refs: Vec<_> = owners.iter().map(|o| json!({"uid": o})).collect();
        Resource::new(json!({"metadata": {"uid": uid, "ownerReferences": refs}}))
    }

    #[test]
    fn test_build_indexes_dependents() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Pod",
            ResourceBucket::loaded(vec![obj("p1", &["rs"]), obj("p2", &["rs"])]),
        );
        buckets.insert(
            "ReplicaSet",
            ResourceBucket::loaded(vec![obj("rs", &["d"])]),
        );

        let graph = OwnershipGraph::build(&buckets);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.dependents_of("rs"), &[0, 1]);
        assert_eq!(graph.dependents_of("d"), &[2]);
        assert!(graph.dependents_of("nobody").is_empty());
    }

    #[test]
    fn test_controller_flag_sets_relationship() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Pod",
            ResourceBucket::loaded(vec![Resource::new(json!({
                "metadata": {"uid": "p", "ownerReferences": [{"uid": "rs", "controller": true}]}
            }))]),
        );
        let graph = OwnershipGraph::build(&buckets);
        assert_eq!(graph.edges[0].relationship, RelationshipType::Controls);
    }

    #[test]
    fn test_duplicate_owner_reference_yields_one_edge() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert("Pod", ResourceBucket::loaded(vec![obj("p", &["rs", "rs"])]));
        let graph = OwnershipGraph::build(&buckets);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn test_reachable_records_depth_and_via() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Things",
            ResourceBucket::loaded(vec![obj("c", &["b"]), obj("b", &["a"]), obj("a", &["root"])]),
        );
        let graph = OwnershipGraph::build(&buckets);
        let reach = graph.reachable_from("root");

        assert_eq!(
            reach,
            vec![
                Reach { node: 0, depth: 3, via: "b" },
                Reach { node: 1, depth: 2, via: "a" },
                Reach { node: 2, depth: 1, via: "root" },
            ]
        );
    }

    #[test]
    fn test_reachable_terminates_on_cycles() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Things",
            ResourceBucket::loaded(vec![obj("x", &["root", "y"]), obj("y", &["x"])]),
        );
        let graph = OwnershipGraph::build(&buckets);
        let nodes: Vec<usize> = graph.reachable_from("root").iter().map(|r| r.node).collect();
        assert_eq!(nodes, vec![0, 1]);
    }

    #[test]
    fn test_root_listed_on_a_cycle_is_not_its_own_dependent() {
        let mut buckets = ResourceBuckets::new();
        buckets.insert(
            "Things",
            ResourceBucket::loaded(vec![obj("root", &["x"]), obj("x", &["root"])]),
        );
        let graph = OwnershipGraph::build(&buckets);
        let reach = graph.reachable_from("root");
        assert_eq!(reach, vec![Reach { node: 1, depth: 1, via: "root" }]);
    }
}
