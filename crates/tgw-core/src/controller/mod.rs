// ── Controller seam ──
//
// The reconciler never talks to a controller directly. Anything that can
// list and mutate security domains on a transit gateway implements
// `SecurityDomainApi`; `TopologySync` drives it.

mod snapshot;

pub use snapshot::SnapshotController;

use std::future::Future;

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{ConnectionPair, DomainName, LiveTopology};
use crate::plan::{ChangeSet, Operation};
use crate::reconcile::{DomainReconciler, Reconciliation};

/// Security-domain operations of a transit-gateway controller.
pub trait SecurityDomainApi: Send + Sync {
    fn list_domains(
        &self,
        tgw_name: &str,
    ) -> impl Future<Output = Result<Vec<DomainName>, CoreError>> + Send;

    fn list_connections(
        &self,
        tgw_name: &str,
    ) -> impl Future<Output = Result<Vec<ConnectionPair>, CoreError>> + Send;

    fn create_domain(
        &self,
        tgw_name: &str,
        domain: &DomainName,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_domain(
        &self,
        tgw_name: &str,
        domain: &DomainName,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn connect_domains(
        &self,
        tgw_name: &str,
        pair: &ConnectionPair,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn disconnect_domains(
        &self,
        tgw_name: &str,
        pair: &ConnectionPair,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// The outcome of planning against a live controller.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub reconciliation: Reconciliation,
    pub live: LiveTopology,
    pub changes: ChangeSet,
}

/// Plans and applies a declared topology on one transit gateway.
pub struct TopologySync<'a, A> {
    api: &'a A,
    tgw_name: String,
}

impl<'a, A: SecurityDomainApi> TopologySync<'a, A> {
    pub fn new(api: &'a A, tgw_name: impl Into<String>) -> Self {
        Self {
            api,
            tgw_name: tgw_name.into(),
        }
    }

    pub fn tgw_name(&self) -> &str {
        &self.tgw_name
    }

    /// Read the gateway's current domains and connection policies.
    pub async fn fetch_live(&self) -> Result<LiveTopology, CoreError> {
        let domains = self.api.list_domains(&self.tgw_name).await?;
        let connections = self.api.list_connections(&self.tgw_name).await?;
        debug!(
            tgw = %self.tgw_name,
            domains = domains.len(),
            connections = connections.len(),
            "fetched live topology"
        );
        Ok(LiveTopology::new(domains, connections))
    }

    /// Validate the declaration and diff it against the live gateway.
    ///
    /// Validation runs first, so an invalid declaration never reaches the
    /// controller.
    pub async fn plan(
        &self,
        domains: &[DomainName],
        connections: &[ConnectionPair],
        isolations: &[ConnectionPair],
    ) -> Result<SyncPlan, CoreError> {
        let reconciliation =
            DomainReconciler::new(domains)?.reconcile_declarations(connections, isolations)?;
        let live = self.fetch_live().await?;
        let changes = ChangeSet::between(domains, &reconciliation, &live);
        Ok(SyncPlan {
            reconciliation,
            live,
            changes,
        })
    }

    /// Execute a change set in order, stopping at the first failure.
    ///
    /// Returns the number of operations applied.
    pub async fn apply(&self, changes: &ChangeSet) -> Result<usize, CoreError> {
        let operations = changes.operations();
        let total = operations.len();

        for (applied, op) in operations.iter().enumerate() {
            if let Err(e) = self.execute(op).await {
                warn!(
                    tgw = %self.tgw_name,
                    op = %op.kind(),
                    target = %op.target(),
                    error = %e,
                    "operation failed"
                );
                return Err(CoreError::ApplyFailed {
                    applied,
                    total,
                    source: Box::new(e),
                });
            }
            info!(tgw = %self.tgw_name, op = %op.kind(), target = %op.target(), "applied");
        }

        Ok(total)
    }

    async fn execute(&self, op: &Operation) -> Result<(), CoreError> {
        let tgw = self.tgw_name.as_str();
        match op {
            Operation::Disconnect { pair } => self.api.disconnect_domains(tgw, pair).await,
            Operation::DeleteDomain { domain } => self.api.delete_domain(tgw, domain).await,
            Operation::CreateDomain { domain } => self.api.create_domain(tgw, domain).await,
            Operation::Connect { pair } => self.api.connect_domains(tgw, pair).await,
        }
    }
}
