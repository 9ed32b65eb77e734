//! Related-resource and storage views for Kubernetes operator operands
//!
//! The core is [`related::flatten`]: given a parent object and buckets of fetched
//! objects, it returns every object transitively owned by the parent. The rest of
//! the crate fetches those buckets, formats claims, projects and routes, and drives
//! the `operand-view` CLI.

pub mod cli;
pub mod config;
pub mod display;
pub mod kube;
pub mod models;
pub mod related;

pub use models::{KindReference, Resource, ResourceBucket, ResourceBuckets};
pub use related::{RelatedResource, flatten, flatten_with_depth};
