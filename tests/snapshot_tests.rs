//! Snapshot tests for rendered tables
//!
//! Run `cargo insta review` to review and accept snapshot changes.

use chrono::{DateTime, TimeZone, Utc};
use insta::assert_snapshot;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use operand_view::cli::{Snapshot, render_related};
use operand_view::config::OutputFormat;
use operand_view::display::{PvcMetrics, TableOptions, pvc_row, render_pvc_table};
use operand_view::{Resource, ResourceBucket, ResourceBuckets};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

fn object(kind: &str, name: &str, created: &str, owner: &str, phase: Option<&str>) -> Resource {
    let mut value = json!({
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": "shop",
            "uid": format!("{}-uid", name),
            "creationTimestamp": created,
            "ownerReferences": [{"apiVersion": "v1", "kind": "Owner", "name": "owner", "uid": owner}]
        }
    });
    if let Some(phase) = phase {
        value["status"] = json!({"phase": phase});
    }
    Resource::new(value)
}

/// An etcd operand owning a deployment, its replica set and a pod
fn etcd_snapshot() -> Snapshot {
    let parent = Resource::new(json!({
        "apiVersion": "etcd.database.coreos.com/v1beta2",
        "kind": "EtcdCluster",
        "metadata": {"name": "example", "namespace": "shop", "uid": "example-uid"}
    }));

    let mut buckets = ResourceBuckets::new();
    buckets.insert(
        "apps~v1~Deployment",
        ResourceBucket::loaded(vec![object(
            "Deployment",
            "example-etcd",
            "2024-05-10T09:00:00Z",
            "example-uid",
            None,
        )]),
    );
    buckets.insert(
        "core~v1~Service",
        ResourceBucket::failed("services is forbidden"),
    );
    buckets.insert(
        "apps~v1~ReplicaSet",
        ResourceBucket::loaded(vec![object(
            "ReplicaSet",
            "example-etcd-7d9f",
            "2024-05-10T11:48:00Z",
            "example-etcd-uid",
            None,
        )]),
    );
    buckets.insert(
        "core~v1~Pod",
        ResourceBucket::loaded(vec![object(
            "Pod",
            "example-etcd-7d9f-abcde",
            "2024-05-10T11:59:15Z",
            "example-etcd-7d9f-uid",
            Some("Running"),
        )]),
    );
    buckets.insert(
        "core~v1~Secret",
        ResourceBucket::loaded(vec![object(
            "Secret",
            "unrelated",
            "2024-05-01T00:00:00Z",
            "someone-else",
            None,
        )]),
    );

    Snapshot { parent, buckets }
}

#[test]
fn test_related_table_with_depth() {
    let options = TableOptions {
        no_headers: false,
        show_depth: true,
    };
    let related = etcd_snapshot().related();
    let out = render_related(related, OutputFormat::Table, &options, now()).unwrap();
    assert_snapshot!(out, @r"
    NAME                      KIND         STATUS    AGE   DEPTH
    example-etcd              Deployment   Created   3h    1
    example-etcd-7d9f         ReplicaSet   Created   12m   2
    example-etcd-7d9f-abcde   Pod          Running   45s   3
    ");
}

#[test]
fn test_related_table_without_headers() {
    let options = TableOptions {
        no_headers: true,
        show_depth: false,
    };
    let related = etcd_snapshot().related();
    let out = render_related(related, OutputFormat::Table, &options, now()).unwrap();
    assert_snapshot!(out, @r"
    example-etcd              Deployment   Created   3h
    example-etcd-7d9f         ReplicaSet   Created   12m
    example-etcd-7d9f-abcde   Pod          Running   45s
    ");
}

#[test]
fn test_pvc_table() {
    let claims: Vec<PersistentVolumeClaim> = vec![
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": {"name": "data", "namespace": "shop"},
            "spec": {"volumeName": "pv-1", "storageClassName": "gp3"},
            "status": {"phase": "Bound", "capacity": {"storage": "10Gi"}}
        }))
        .unwrap(),
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": {"name": "scratch", "namespace": "shop"},
            "spec": {}
        }))
        .unwrap(),
    ];

    let metrics = PvcMetrics::new();
    let rows: Vec<_> = claims.iter().map(|c| pvc_row(c, &metrics, &[])).collect();
    assert_snapshot!(render_pvc_table(&rows, &TableOptions::default()), @r"
    NAME      NAMESPACE   STATUS    VOLUME                CAPACITY   USED   STORAGECLASS
    data      shop        Bound     pv-1                  10 GiB     -      gp3
    scratch   shop        Pending   No PersistentVolume   -          -      -
    ");
}
