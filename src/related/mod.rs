//! Related-resource discovery
//!
//! Finds every fetched object transitively owned by a parent resource by following
//! `metadata.ownerReferences` uids, the way the operand "Resources" view lists the
//! objects an operator created for a custom resource.

mod csv;
mod flatten;
pub mod graph;

pub use csv::{csv_kind, default_resource_kinds, resource_kinds_for, resource_kinds_or};
pub use flatten::{RelatedResource, flatten, flatten_with_depth};
pub use graph::{GraphEdge, GraphNode, OwnershipGraph, Reach, RelationshipType};
