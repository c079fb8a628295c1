// ── File-backed controller ──
//
// Holds controller state as a JSON document keyed by transit-gateway name.
// Used for offline syncs: load, plan, apply, save. Enforces the same
// preconditions a real controller would reject on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use super::SecurityDomainApi;
use crate::error::CoreError;
use crate::model::{ConnectionPair, DomainName, LiveTopology};

/// A [`SecurityDomainApi`] over an in-memory snapshot, optionally tied to a file.
#[derive(Debug, Default)]
pub struct SnapshotController {
    path: Option<PathBuf>,
    gateways: Mutex<BTreeMap<String, LiveTopology>>,
}

impl SnapshotController {
    /// Build a controller from in-memory state, not tied to any file.
    pub fn from_gateways(gateways: BTreeMap<String, LiveTopology>) -> Self {
        Self {
            path: None,
            gateways: Mutex::new(gateways),
        }
    }

    /// Read a snapshot file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CoreError::SnapshotIo {
                path: path.display().to_string(),
                source,
            })?;
        let parsed: BTreeMap<String, LiveTopology> =
            serde_json::from_str(&raw).map_err(|source| CoreError::SnapshotFormat {
                path: path.display().to_string(),
                source,
            })?;
        // Hand-edited files may list a policy in either direction.
        let gateways: BTreeMap<String, LiveTopology> = parsed
            .into_iter()
            .map(|(name, t)| (name, LiveTopology::new(t.domains, t.connections)))
            .collect();
        debug!(path = %path.display(), gateways = gateways.len(), "loaded snapshot");
        Ok(Self {
            path: Some(path.to_path_buf()),
            gateways: Mutex::new(gateways),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current state of every gateway.
    pub async fn gateways(&self) -> BTreeMap<String, LiveTopology> {
        self.gateways.lock().await.clone()
    }

    /// Write the current state back to the file it was loaded from.
    ///
    /// No-op for controllers built with [`from_gateways`](Self::from_gateways).
    pub async fn save(&self) -> Result<(), CoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let body = {
            let gateways = self.gateways.lock().await;
            serde_json::to_string_pretty(&*gateways).map_err(|source| {
                CoreError::SnapshotFormat {
                    path: path.display().to_string(),
                    source,
                }
            })?
        };
        tokio::fs::write(path, body)
            .await
            .map_err(|source| CoreError::SnapshotIo {
                path: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }

    async fn with_gateway<T>(
        &self,
        tgw_name: &str,
        f: impl FnOnce(&mut LiveTopology) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut gateways = self.gateways.lock().await;
        let topology = gateways
            .get_mut(tgw_name)
            .ok_or_else(|| CoreError::GatewayNotFound {
                name: tgw_name.into(),
            })?;
        f(topology)
    }
}

fn require_domain(topology: &LiveTopology, domain: &DomainName) -> Result<(), CoreError> {
    if topology.has_domain(domain) {
        Ok(())
    } else {
        Err(CoreError::DomainNotFound {
            name: domain.to_string(),
        })
    }
}

impl SecurityDomainApi for SnapshotController {
    async fn list_domains(&self, tgw_name: &str) -> Result<Vec<DomainName>, CoreError> {
        self.with_gateway(tgw_name, |t| Ok(t.domains.iter().cloned().collect()))
            .await
    }

    async fn list_connections(&self, tgw_name: &str) -> Result<Vec<ConnectionPair>, CoreError> {
        self.with_gateway(tgw_name, |t| Ok(t.connections.iter().cloned().collect()))
            .await
    }

    async fn create_domain(&self, tgw_name: &str, domain: &DomainName) -> Result<(), CoreError> {
        self.with_gateway(tgw_name, |t| {
            if !t.domains.insert(domain.clone()) {
                return Err(CoreError::DomainExists {
                    name: domain.to_string(),
                });
            }
            Ok(())
        })
        .await
    }

    async fn delete_domain(&self, tgw_name: &str, domain: &DomainName) -> Result<(), CoreError> {
        self.with_gateway(tgw_name, |t| {
            if domain.is_reserved() {
                return Err(CoreError::Rejected {
                    message: format!("'{domain}' is a built-in domain and cannot be deleted"),
                });
            }
            require_domain(t, domain)?;
            if t.connections.iter().any(|c| c.touches(domain)) {
                return Err(CoreError::Rejected {
                    message: format!("'{domain}' still has connection policies attached"),
                });
            }
            t.domains.remove(domain);
            Ok(())
        })
        .await
    }

    async fn connect_domains(&self, tgw_name: &str, pair: &ConnectionPair) -> Result<(), CoreError> {
        self.with_gateway(tgw_name, |t| {
            require_domain(t, &pair.from)?;
            require_domain(t, &pair.to)?;
            if !t.connections.insert(pair.normalized()) {
                return Err(CoreError::Rejected {
                    message: format!("{pair} is already connected"),
                });
            }
            Ok(())
        })
        .await
    }

    async fn disconnect_domains(
        &self,
        tgw_name: &str,
        pair: &ConnectionPair,
    ) -> Result<(), CoreError> {
        self.with_gateway(tgw_name, |t| {
            if !t.connections.remove(&pair.normalized()) {
                return Err(CoreError::Rejected {
                    message: format!("{pair} is not connected"),
                });
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_DOMAIN;

    fn controller() -> SnapshotController {
        let mut gateways = BTreeMap::new();
        gateways.insert(
            "tgw-1".to_owned(),
            LiveTopology::new([DomainName::from(DEFAULT_DOMAIN)], Vec::<ConnectionPair>::new()),
        );
        SnapshotController::from_gateways(gateways)
    }

    #[tokio::test]
    async fn unknown_gateway_is_reported() {
        let err = controller().list_domains("nope").await.unwrap_err();
        assert!(matches!(err, CoreError::GatewayNotFound { ref name } if name == "nope"));
    }

    #[tokio::test]
    async fn reserved_domain_cannot_be_deleted() {
        let err = controller()
            .delete_domain("tgw-1", &DEFAULT_DOMAIN.into())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Rejected { .. }));
    }

    #[tokio::test]
    async fn connect_requires_both_domains() {
        let ctl = controller();
        let pair = ConnectionPair::new("Prod", DEFAULT_DOMAIN);
        let err = ctl.connect_domains("tgw-1", &pair).await.unwrap_err();
        assert!(matches!(err, CoreError::DomainNotFound { ref name } if name == "Prod"));

        ctl.create_domain("tgw-1", &"Prod".into()).await.unwrap();
        ctl.connect_domains("tgw-1", &pair).await.unwrap();
        assert_eq!(ctl.list_connections("tgw-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn domain_with_connections_cannot_be_deleted() {
        let ctl = controller();
        ctl.create_domain("tgw-1", &"Prod".into()).await.unwrap();
        ctl.connect_domains("tgw-1", &ConnectionPair::new(DEFAULT_DOMAIN, "Prod"))
            .await
            .unwrap();

        let err = ctl.delete_domain("tgw-1", &"Prod".into()).await.unwrap_err();
        assert!(matches!(err, CoreError::Rejected { .. }));

        ctl.disconnect_domains("tgw-1", &ConnectionPair::new("Prod", DEFAULT_DOMAIN))
            .await
            .unwrap();
        ctl.delete_domain("tgw-1", &"Prod".into()).await.unwrap();
    }

    #[tokio::test]
    async fn save_without_path_is_noop() {
        controller().save().await.unwrap();
    }
}
