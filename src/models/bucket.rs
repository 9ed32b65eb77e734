//! Fetched resource collections keyed by kind
//!
//! A bucket is what one "list resources of kind K" call produced, together with its
//! load state. `ResourceBuckets` keeps buckets in fetch order; serializing to and from
//! a JSON/YAML mapping preserves that order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::resource::Resource;

/// Resources of a single kind plus their load state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBucket {
    #[serde(default)]
    pub data: Vec<Resource>,
    #[serde(default)]
    pub loaded: bool,
    /// Any non-null value marks the bucket as failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<Value>,
}

impl ResourceBucket {
    pub fn loaded(data: Vec<Resource>) -> Self {
        Self {
            data,
            loaded: true,
            load_error: None,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            data: Vec::new(),
            loaded: false,
            load_error: Some(Value::String(error.to_string())),
        }
    }

    /// True when the bucket's data can be trusted
    pub fn is_usable(&self) -> bool {
        self.loaded && self.load_error.is_none()
    }
}

/// Ordered mapping of kind name to bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBuckets {
    entries: Vec<(String, ResourceBucket)>,
}

impl ResourceBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the bucket for `kind`
    ///
    /// Replacing keeps the kind's original position.
    pub fn insert(&mut self, kind: impl Into<String>, bucket: ResourceBucket) {
        let kind = kind.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => *existing = bucket,
            None => self.entries.push((kind, bucket)),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&ResourceBucket> {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, bucket)| bucket)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceBucket)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    /// Resources of every usable bucket, bucket order then in-bucket order
    pub fn usable_resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries
            .iter()
            .filter(|(_, bucket)| bucket.is_usable())
            .flat_map(|(_, bucket)| bucket.data.iter())
    }

    /// Kinds whose bucket failed to load
    pub fn failed_kinds(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, bucket)| bucket.load_error.is_some())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ResourceBucket)> for ResourceBuckets {
    fn from_iter<I: IntoIterator<Item = (String, ResourceBucket)>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for (kind, bucket) in iter {
            buckets.insert(kind, bucket);
        }
        buckets
    }
}

impl Serialize for ResourceBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, bucket) in &self.entries {
            map.serialize_entry(kind, bucket)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceBuckets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketsVisitor;

        impl<'de> Visitor<'de> for BucketsVisitor {
            type Value = ResourceBuckets;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of resource kind to bucket")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut buckets = ResourceBuckets::new();
                while let Some((kind, bucket)) = access.next_entry::<String, ResourceBucket>()? {
                    buckets.insert(kind, bucket);
                }
                Ok(buckets)
            }
        }

        deserializer.deserialize_map(BucketsVisitor)
    }
}
