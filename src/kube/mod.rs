//! Kubernetes client setup and resource fetching
//!
//! Proxies come from the standard `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY`
//! variables. API servers on internal-looking hosts are added to `NO_PROXY` by
//! [`prepare_proxy_bypass`], which must run before the async runtime starts.

pub mod discovery;
pub mod fetch;

pub use discovery::{KindCatalog, ServedKind};
pub use fetch::{KubeLister, ResourceLister, fetch_buckets, fetch_object, resolve_kinds};

use anyhow::{Context, Result};
use kube::config::Kubeconfig;
use kube::{Client, Config};
use url::Url;

/// Connection details resolved from kubeconfig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContext {
    pub cluster: Option<String>,
    pub context: Option<String>,
    /// Namespace set on the current context
    pub namespace: Option<String>,
    /// API server URL of the context's cluster
    pub server: Option<String>,
}

/// Build a client from in-cluster config, `KUBECONFIG` or `~/.kube/config`
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Add the API server host to `NO_PROXY` when it looks internal
///
/// Changes process environment, so call it from `main` before any other thread
/// exists. Without a kubeconfig server the in-cluster service host is used.
pub fn prepare_proxy_bypass(context: &ClusterContext) {
    let in_cluster = std::env::var("KUBERNETES_SERVICE_HOST").ok();
    if let Some(host) = api_server_host(context.server.as_deref(), in_cluster.as_deref()) {
        ensure_no_proxy_bypass(&host);
    }
}

fn api_server_host(server: Option<&str>, in_cluster_host: Option<&str>) -> Option<String> {
    match server {
        Some(server) => Url::parse(server)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string)),
        None => in_cluster_host
            .filter(|host| !host.is_empty())
            .map(str::to_string),
    }
}

/// Read the current context, its cluster and namespace from kubeconfig
///
/// Missing or unreadable kubeconfig yields an empty context rather than an error,
/// since in-cluster config has none.
pub fn current_context() -> ClusterContext {
    let kubeconfig = match Kubeconfig::read() {
        Ok(kubeconfig) => kubeconfig,
        Err(e) => {
            tracing::debug!("No kubeconfig available: {}", e);
            return ClusterContext {
                cluster: None,
                context: None,
                namespace: None,
                server: None,
            };
        }
    };
    context_from_kubeconfig(&kubeconfig)
}

fn context_from_kubeconfig(kubeconfig: &Kubeconfig) -> ClusterContext {
    let current = kubeconfig.current_context.clone();
    let context = current.as_deref().and_then(|name| {
        kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.context.as_ref())
    });

    let cluster = context.map(|c| c.cluster.clone()).filter(|c| !c.is_empty());
    let server = cluster.as_deref().and_then(|name| {
        kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.cluster.as_ref())
            .and_then(|c| c.server.clone())
    });

    ClusterContext {
        cluster,
        namespace: context.and_then(|c| c.namespace.clone()),
        context: current,
        server,
    }
}

/// Namespace to query: explicit flag, then kube context, then configured default
pub fn resolve_namespace(
    explicit: Option<&str>,
    context: &ClusterContext,
    configured_default: &str,
) -> String {
    explicit
        .or(context.namespace.as_deref())
        .unwrap_or(configured_default)
        .to_string()
}

fn ensure_no_proxy_bypass(host: &str) {
    let current = std::env::var("NO_PROXY")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("no_proxy").ok())
        .unwrap_or_default();

    let Some(updated) = no_proxy_with_host(&current, host) else {
        return;
    };
    tracing::debug!("Adding {} to NO_PROXY", host);

    // SAFETY: only reached from `prepare_proxy_bypass`, which runs on the main
    // thread before the tokio runtime and its workers are started.
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// New NO_PROXY value including `host`, or `None` when nothing needs to change
fn no_proxy_with_host(current: &str, host: &str) -> Option<String> {
    if !is_internal_host(host) || no_proxy_contains(current, host) {
        return None;
    }
    Some(if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    })
}

/// Heuristic for private or internal cluster hosts
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || matches!(host, "localhost" | "127.0.0.1" | "::1")
    {
        return true;
    }

    if host.ends_with(".local") || host.ends_with(".internal") {
        return true;
    }

    let parts: Vec<&str> = host.split('.').collect();
    let Some((_tld, labels)) = parts.split_last() else {
        return false;
    };
    if labels.is_empty() {
        return false;
    }

    // *.corp.tld, *.int.tld
    if matches!(labels[labels.len() - 1], "corp" | "internal" | "int" | "local") {
        return true;
    }

    // Environment-style labels anywhere but the TLD: dev.api.example, testapi.example.com
    const ENV_PREFIXES: &[&str] = &["dev", "test", "staging", "qa", "uat", "internal"];
    labels
        .iter()
        .any(|label| ENV_PREFIXES.iter().any(|prefix| label.starts_with(prefix)))
}

/// Whether a NO_PROXY list already covers `host`
///
/// `.example.com` and `example.com` both match the domain and its subdomains.
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .any(|pattern| {
            let domain = pattern.strip_prefix('.').unwrap_or(pattern);
            host == domain || host.ends_with(&format!(".{}", domain))
        })
}
