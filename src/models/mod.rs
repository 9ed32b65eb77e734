//! Resource model layer
//!
//! Structure:
//! - `resource.rs` - Untyped resource wrapper and owner references
//! - `bucket.rs` - Per-kind fetch results with load state
//! - `kind.rs` - Builtin kinds and `group~version~kind` references

pub mod bucket;
pub mod kind;
pub mod resource;

pub use bucket::{ResourceBucket, ResourceBuckets};
pub use kind::{BuiltinKind, KindReference, KindReferenceError, kind_for_reference};
pub use resource::{OwnerRef, Resource};
