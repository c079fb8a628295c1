#![allow(clippy::unwrap_used)]
// Integration tests for `TopologySync` against file-backed and failing controllers.

use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::json;

use tgw_core::{
    ConnectionPair, CoreError, DEFAULT_DOMAIN, DomainName, EDGE_DOMAIN, ReconcileError,
    SHARED_SERVICE_DOMAIN, SecurityDomainApi, SnapshotController, TopologySync,
};

// ── Helpers ─────────────────────────────────────────────────────────

const TGW: &str = "prod-tgw";

fn fresh_gateway() -> serde_json::Value {
    json!({
        "prod-tgw": {
            "domains": [DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN, EDGE_DOMAIN],
            "connections": [
                { "from": DEFAULT_DOMAIN, "to": SHARED_SERVICE_DOMAIN },
                { "from": DEFAULT_DOMAIN, "to": EDGE_DOMAIN },
                { "from": SHARED_SERVICE_DOMAIN, "to": EDGE_DOMAIN }
            ]
        }
    })
}

fn write_snapshot(value: &serde_json::Value) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_string_pretty(value).unwrap()).unwrap();
    file
}

fn declared_domains() -> Vec<DomainName> {
    [DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN, EDGE_DOMAIN, "Prod", "Dev"]
        .map(DomainName::from)
        .to_vec()
}

fn declared_connections() -> Vec<ConnectionPair> {
    vec![
        ConnectionPair::new("Prod", DEFAULT_DOMAIN),
        ConnectionPair::new(DEFAULT_DOMAIN, "Prod"),
        ConnectionPair::new("Dev", SHARED_SERVICE_DOMAIN),
        ConnectionPair::new(DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN),
    ]
}

// ── Sync against a snapshot file ────────────────────────────────────

#[tokio::test]
async fn test_sync_converges_and_persists() {
    let file = write_snapshot(&fresh_gateway());
    let controller = SnapshotController::load(file.path()).await.unwrap();
    let sync = TopologySync::new(&controller, TGW);

    let plan = sync
        .plan(&declared_domains(), &declared_connections(), &[])
        .await
        .unwrap();

    assert_eq!(
        plan.changes.create_domains,
        vec![DomainName::from("Prod"), DomainName::from("Dev")]
    );
    assert_eq!(plan.changes.connect.len(), 2);
    // Default <-> Shared was declared, the other two built-in links were not.
    assert_eq!(
        plan.changes.disconnect,
        vec![
            ConnectionPair::new(DEFAULT_DOMAIN, EDGE_DOMAIN).normalized(),
            ConnectionPair::new(SHARED_SERVICE_DOMAIN, EDGE_DOMAIN).normalized(),
        ]
    );

    let applied = sync.apply(&plan.changes).await.unwrap();
    assert_eq!(applied, 6);
    controller.save().await.unwrap();

    let reloaded = SnapshotController::load(file.path()).await.unwrap();
    let second = TopologySync::new(&reloaded, TGW)
        .plan(&declared_domains(), &declared_connections(), &[])
        .await
        .unwrap();
    assert!(second.changes.is_empty(), "not converged: {:?}", second.changes);
}

#[tokio::test]
async fn test_sync_restores_drifted_links() {
    // Dev was never created, Default <-> Shared and Prod <-> Default were
    // dropped out of band, and a stray Shared <-> Edge link remains.
    let file = write_snapshot(&json!({
        "prod-tgw": {
            "domains": [DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN, EDGE_DOMAIN, "Prod"],
            "connections": [
                { "from": EDGE_DOMAIN, "to": SHARED_SERVICE_DOMAIN }
            ]
        }
    }));
    let controller = SnapshotController::load(file.path()).await.unwrap();
    let sync = TopologySync::new(&controller, TGW);

    let plan = sync
        .plan(&declared_domains(), &declared_connections(), &[])
        .await
        .unwrap();

    assert_eq!(plan.changes.create_domains, vec![DomainName::from("Dev")]);
    assert_eq!(
        plan.changes.connect,
        vec![
            ConnectionPair::new(DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN),
            ConnectionPair::new("Prod", DEFAULT_DOMAIN),
            ConnectionPair::new("Dev", SHARED_SERVICE_DOMAIN),
        ]
    );
    assert_eq!(
        plan.changes.disconnect,
        vec![ConnectionPair::new(SHARED_SERVICE_DOMAIN, EDGE_DOMAIN).normalized()]
    );

    assert_eq!(sync.apply(&plan.changes).await.unwrap(), 5);
    controller.save().await.unwrap();

    let reloaded = SnapshotController::load(file.path()).await.unwrap();
    let second = TopologySync::new(&reloaded, TGW)
        .plan(&declared_domains(), &declared_connections(), &[])
        .await
        .unwrap();
    assert!(second.changes.is_empty(), "not converged: {:?}", second.changes);
    assert!(
        second
            .live
            .is_connected(&ConnectionPair::new(SHARED_SERVICE_DOMAIN, DEFAULT_DOMAIN))
    );
}

#[tokio::test]
async fn test_invalid_declaration_never_reaches_controller() {
    let controller = CountingController::default();
    let sync = TopologySync::new(&controller, TGW);

    let err = sync
        .plan(
            &declared_domains(),
            &[ConnectionPair::new("Prod", "Staging")],
            &[],
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(
        err,
        CoreError::Topology(ReconcileError::UnknownDomainReference { .. })
    ));
    assert_eq!(controller.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_gateway_in_snapshot() {
    let file = write_snapshot(&json!({}));
    let controller = SnapshotController::load(file.path()).await.unwrap();
    let err = TopologySync::new(&controller, TGW)
        .fetch_live()
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::GatewayNotFound { .. }));
}

#[tokio::test]
async fn test_malformed_snapshot() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "not json").unwrap();
    let err = SnapshotController::load(file.path()).await.unwrap_err();
    assert!(matches!(err, CoreError::SnapshotFormat { .. }));
}

// ── Partial failure ─────────────────────────────────────────────────

/// Counts calls and rejects every mutation after the first `allow`.
#[derive(Default)]
struct CountingController {
    calls: AtomicUsize,
    allow: usize,
}

impl CountingController {
    fn mutate(&self) -> Result<(), CoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.allow {
            Ok(())
        } else {
            Err(CoreError::Rejected {
                message: "controller busy".into(),
            })
        }
    }
}

impl SecurityDomainApi for CountingController {
    async fn list_domains(&self, _tgw_name: &str) -> Result<Vec<DomainName>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn list_connections(&self, _tgw_name: &str) -> Result<Vec<ConnectionPair>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn create_domain(&self, _tgw_name: &str, _domain: &DomainName) -> Result<(), CoreError> {
        self.mutate()
    }

    async fn delete_domain(&self, _tgw_name: &str, _domain: &DomainName) -> Result<(), CoreError> {
        self.mutate()
    }

    async fn connect_domains(
        &self,
        _tgw_name: &str,
        _pair: &ConnectionPair,
    ) -> Result<(), CoreError> {
        self.mutate()
    }

    async fn disconnect_domains(
        &self,
        _tgw_name: &str,
        _pair: &ConnectionPair,
    ) -> Result<(), CoreError> {
        self.mutate()
    }
}

#[tokio::test]
async fn test_apply_stops_at_first_failure() {
    let controller = CountingController {
        calls: AtomicUsize::new(0),
        allow: 2,
    };
    let sync = TopologySync::new(&controller, TGW);
    let changes = tgw_core::ChangeSet {
        create_domains: vec!["A".into(), "B".into(), "C".into()],
        ..Default::default()
    };

    let err = sync.apply(&changes).await.unwrap_err();
    match err {
        CoreError::ApplyFailed {
            applied, total, ..
        } => {
            assert_eq!(applied, 2);
            assert_eq!(total, 3);
        }
        other => panic!("expected ApplyFailed, got {other:?}"),
    }
    assert_eq!(controller.calls.load(Ordering::SeqCst), 3);
}
