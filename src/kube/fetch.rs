//! Resource fetching
//!
//! Related-resource buckets are listed through [`ResourceLister`] so the fetch
//! policy can be exercised without a cluster. [`KubeLister`] resolves kinds against
//! discovery when it has a [`KindCatalog`] and lists cluster-scoped kinds cluster-wide.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim};
use kube::api::{ApiResource, ListParams};
use kube::core::{DynamicObject, TypeMeta};
use kube::{Api, Client};

use super::discovery::{KindCatalog, ServedKind};
use crate::models::{KindReference, Resource, ResourceBucket, ResourceBuckets};

/// Lists and gets objects of an arbitrary kind in one namespace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// The reference under which the cluster serves `kind`
    async fn resolve(&self, kind: &KindReference) -> Result<KindReference>;

    async fn list(&self, kind: &KindReference, namespace: &str) -> Result<Vec<Resource>>;

    async fn get(&self, kind: &KindReference, namespace: &str, name: &str) -> Result<Resource>;
}

/// [`ResourceLister`] backed by the dynamic API
pub struct KubeLister {
    client: Client,
    catalog: Option<KindCatalog>,
}

impl KubeLister {
    /// Lister that takes kinds as given and lists them in the namespace
    pub fn new(client: Client) -> Self {
        Self {
            client,
            catalog: None,
        }
    }

    pub fn with_catalog(client: Client, catalog: KindCatalog) -> Self {
        Self {
            client,
            catalog: Some(catalog),
        }
    }

    /// Lister backed by API discovery, or by kinds as given if discovery fails
    pub async fn discover(client: Client) -> Self {
        match KindCatalog::discover(client.clone()).await {
            Ok(catalog) => Self::with_catalog(client, catalog),
            Err(e) => {
                tracing::warn!("{:#}; listing kinds as given", e);
                Self::new(client)
            }
        }
    }

    fn served(&self, kind: &KindReference) -> Option<&ServedKind> {
        self.catalog.as_ref().and_then(|catalog| catalog.resolve(kind))
    }

    fn api(&self, kind: &KindReference, namespace: &str) -> (Api<DynamicObject>, ApiResource) {
        match self.served(kind) {
            Some(served) if !served.namespaced => {
                let api = Api::all_with(self.client.clone(), &served.resource);
                (api, served.resource.clone())
            }
            Some(served) => {
                let api = Api::namespaced_with(self.client.clone(), namespace, &served.resource);
                (api, served.resource.clone())
            }
            None => {
                let api_resource = ApiResource::from_gvk(&kind.gvk());
                let api = Api::namespaced_with(self.client.clone(), namespace, &api_resource);
                (api, api_resource)
            }
        }
    }
}

/// List items come back without type information; restore it so kinds render
fn with_types(mut obj: DynamicObject, api_resource: &ApiResource) -> DynamicObject {
    if obj.types.is_none() {
        obj.types = Some(TypeMeta {
            api_version: api_resource.api_version.clone(),
            kind: api_resource.kind.clone(),
        });
    }
    obj
}

#[async_trait]
impl ResourceLister for KubeLister {
    async fn resolve(&self, kind: &KindReference) -> Result<KindReference> {
        if self.catalog.is_none() {
            return Ok(kind.clone());
        }
        self.served(kind)
            .map(ServedKind::reference)
            .ok_or_else(|| anyhow::anyhow!("{} is not served by the cluster", kind))
    }

    async fn list(&self, kind: &KindReference, namespace: &str) -> Result<Vec<Resource>> {
        let (api, api_resource) = self.api(kind, namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .with_context(|| format!("Failed to list {} in {}", kind, namespace))?;

        list.items
            .into_iter()
            .map(|obj| {
                Resource::try_from(with_types(obj, &api_resource))
                    .with_context(|| format!("Failed to convert {} object", kind))
            })
            .collect()
    }

    async fn get(&self, kind: &KindReference, namespace: &str, name: &str) -> Result<Resource> {
        let (api, api_resource) = self.api(kind, namespace);
        let obj = api
            .get(name)
            .await
            .with_context(|| format!("Failed to fetch {} {}/{}", kind, namespace, name))?;
        Resource::try_from(with_types(obj, &api_resource))
            .with_context(|| format!("Failed to convert {} object", kind))
    }
}

/// Resolve kinds concurrently against what the cluster serves
///
/// Kinds that cannot be resolved are kept as given so their bucket reports the
/// failure. Kinds resolving to the same reference are fetched once.
pub async fn resolve_kinds(
    lister: &dyn ResourceLister,
    kinds: &[KindReference],
) -> Vec<KindReference> {
    let results = join_all(kinds.iter().map(|kind| lister.resolve(kind))).await;

    let mut resolved: Vec<KindReference> = Vec::with_capacity(kinds.len());
    for (kind, result) in kinds.iter().zip(results) {
        let reference = result.unwrap_or_else(|e| {
            tracing::warn!("Could not resolve {}: {:#}", kind, e);
            kind.clone()
        });
        if !resolved.contains(&reference) {
            resolved.push(reference);
        }
    }
    resolved
}

/// List every kind concurrently into buckets keyed by kind reference
///
/// A failed list becomes an unusable bucket carrying the error; the others are
/// unaffected. Bucket order follows `kinds`.
pub async fn fetch_buckets(
    lister: &dyn ResourceLister,
    kinds: &[KindReference],
    namespace: &str,
) -> ResourceBuckets {
    let results = join_all(kinds.iter().map(|kind| lister.list(kind, namespace))).await;

    kinds
        .iter()
        .zip(results)
        .map(|(kind, result)| {
            let bucket = match result {
                Ok(items) => {
                    tracing::debug!("Fetched {} {} objects", items.len(), kind);
                    ResourceBucket::loaded(items)
                }
                Err(e) => {
                    tracing::warn!("Failed to load {} in {}: {:#}", kind, namespace, e);
                    ResourceBucket::failed(format!("{:#}", e))
                }
            };
            (kind.to_string(), bucket)
        })
        .collect()
}

/// Fetch a single object
pub async fn fetch_object(
    lister: &dyn ResourceLister,
    kind: &KindReference,
    namespace: &str,
    name: &str,
) -> Result<Resource> {
    lister.get(kind, namespace, name).await
}

pub async fn list_pvcs(client: &Client, namespace: &str) -> Result<Vec<PersistentVolumeClaim>> {
    let api: Api<PersistentVolumeClaim> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list PersistentVolumeClaims in {}", namespace))?;
    Ok(list.items)
}

pub async fn get_pvc(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<PersistentVolumeClaim> {
    let api: Api<PersistentVolumeClaim> = Api::namespaced(client.clone(), namespace);
    api.get(name).await.with_context(|| {
        format!(
            "Failed to fetch PersistentVolumeClaim {}/{}",
            namespace, name
        )
    })
}

pub async fn get_namespace(client: &Client, name: &str) -> Result<Namespace> {
    let api: Api<Namespace> = Api::all(client.clone());
    api.get(name)
        .await
        .with_context(|| format!("Failed to fetch namespace {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use serde_json::json;

    fn pod(name: &str) -> Resource {
        Resource::new(json!({
            "kind": "Pod",
            "metadata": {"name": name, "uid": format!("{}-uid", name)}
        }))
    }

    #[tokio::test]
    async fn test_fetch_buckets_keeps_order_and_failures() {
        let pods = KindReference::new("", "v1", "Pod");
        let secrets = KindReference::new("", "v1", "Secret");
        let services = KindReference::new("", "v1", "Service");

        let mut lister = MockResourceLister::new();
        lister
            .expect_list()
            .with(eq(pods.clone()), eq("shop"))
            .returning(|_, _| Ok(vec![pod("web-0"), pod("web-1")]));
        lister
            .expect_list()
            .with(eq(secrets.clone()), eq("shop"))
            .returning(|_, _| Err(anyhow::anyhow!("secrets is forbidden")));
        lister
            .expect_list()
            .with(eq(services.clone()), eq("shop"))
            .returning(|_, _| Ok(vec![]));

        let buckets = fetch_buckets(&lister, &[pods, secrets, services], "shop").await;

        let keys: Vec<&str> = buckets.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["core~v1~Pod", "core~v1~Secret", "core~v1~Service"]);

        let pod_bucket = buckets.get("core~v1~Pod").unwrap();
        assert!(pod_bucket.is_usable());
        assert_eq!(pod_bucket.data.len(), 2);

        let secret_bucket = buckets.get("core~v1~Secret").unwrap();
        assert!(!secret_bucket.is_usable());
        assert!(secret_bucket.data.is_empty());
        assert_eq!(buckets.failed_kinds(), vec!["core~v1~Secret"]);

        assert!(buckets.get("core~v1~Service").unwrap().is_usable());
    }

    #[tokio::test]
    async fn test_fetch_object_propagates_errors() {
        let kind = KindReference::new("etcd.database.coreos.com", "v1beta2", "EtcdCluster");
        let mut lister = MockResourceLister::new();
        lister
            .expect_get()
            .with(eq(kind.clone()), eq("shop"), eq("missing"))
            .returning(|_, _, _| Err(anyhow::anyhow!("not found")));

        assert!(fetch_object(&lister, &kind, "shop", "missing").await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_kinds_keeps_unresolved_and_dedupes() {
        let route = KindReference::for_kind("Route", None);
        let service = KindReference::for_kind("Service", None);
        let widget = KindReference::for_kind("Widget", None);
        let served_route = KindReference::new("route.openshift.io", "v1", "Route");

        let mut lister = MockResourceLister::new();
        let resolved_route = served_route.clone();
        lister
            .expect_resolve()
            .with(eq(route.clone()))
            .times(2)
            .returning(move |_| Ok(resolved_route.clone()));
        lister
            .expect_resolve()
            .with(eq(service.clone()))
            .returning(|kind| Ok(kind.clone()));
        lister
            .expect_resolve()
            .with(eq(widget.clone()))
            .returning(|kind| Err(anyhow::anyhow!("{} is not served by the cluster", kind)));

        let kinds = [route.clone(), service.clone(), widget.clone(), route];
        let resolved = resolve_kinds(&lister, &kinds).await;
        assert_eq!(resolved, vec![served_route, service, widget]);
    }

    #[test]
    fn test_with_types_fills_missing_type_meta() {
        let deployment = KindReference::new("apps", "v1", "Deployment");
        let api_resource = ApiResource::from_gvk(&deployment.gvk());
        let mut untyped = DynamicObject::new("web", &api_resource);
        untyped.types = None;

        let typed = with_types(untyped, &api_resource);
        let types = typed.types.unwrap();
        assert_eq!(types.api_version, "apps/v1");
        assert_eq!(types.kind, "Deployment");
    }
}
