//! Kinds served by the cluster
//!
//! CSVs name the kinds an operand creates without their API group. Discovery tells
//! us which group serves each kind, its plural, and whether it is namespaced.

use anyhow::{Context, Result};
use kube::Client;
use kube::api::ApiResource;
use kube::discovery::{Discovery, Scope};

use crate::models::KindReference;

/// A kind the API server serves
#[derive(Debug, Clone)]
pub struct ServedKind {
    pub resource: ApiResource,
    pub namespaced: bool,
}

impl ServedKind {
    pub fn reference(&self) -> KindReference {
        KindReference::new(
            &self.resource.group,
            &self.resource.version,
            &self.resource.kind,
        )
    }
}

/// Served kinds, each group's preferred version first
#[derive(Debug, Clone, Default)]
pub struct KindCatalog {
    served: Vec<ServedKind>,
}

impl KindCatalog {
    pub fn new(served: Vec<ServedKind>) -> Self {
        Self { served }
    }

    pub async fn discover(client: Client) -> Result<Self> {
        let discovery = Discovery::new(client)
            .run()
            .await
            .context("Failed to discover API resources")?;
        Ok(Self::from_discovery(&discovery))
    }

    pub fn from_discovery(discovery: &Discovery) -> Self {
        let mut served = Vec::new();
        for group in discovery.groups() {
            let preferred = group.preferred_version_or_latest();
            let mut versions = vec![preferred];
            versions.extend(group.versions().filter(|v| *v != preferred));

            for version in versions {
                for (resource, caps) in group.versioned_resources(version) {
                    served.push(ServedKind {
                        resource,
                        namespaced: caps.scope == Scope::Namespaced,
                    });
                }
            }
        }
        tracing::debug!("Discovered {} served kinds", served.len());
        Self { served }
    }

    pub fn len(&self) -> usize {
        self.served.len()
    }

    pub fn is_empty(&self) -> bool {
        self.served.is_empty()
    }

    /// The served kind for a reference
    ///
    /// An exact match wins, then the same kind in the same group at its preferred
    /// version. A core-group reference the core group does not serve is looked up by
    /// kind name in every group, preferring the requested version.
    pub fn resolve(&self, kind: &KindReference) -> Option<&ServedKind> {
        let in_group = || {
            self.served
                .iter()
                .filter(|s| s.resource.group == kind.group && s.resource.kind == kind.kind)
        };

        in_group()
            .find(|s| s.resource.version == kind.version)
            .or_else(|| in_group().next())
            .or_else(|| {
                if !kind.group.is_empty() {
                    return None;
                }
                let named = || self.served.iter().filter(|s| s.resource.kind == kind.kind);
                named()
                    .find(|s| s.resource.version == kind.version)
                    .or_else(|| named().next())
            })
    }
}
