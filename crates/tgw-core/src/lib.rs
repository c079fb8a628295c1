//! Security-domain planning for transit gateways.
//!
//! A transit gateway segments traffic into named security domains and
//! only routes between domains that have a connection policy. This crate
//! turns a declared set of domains and policies into controller changes:
//!
//! - **[`DomainReconciler`]** validates a declaration (unknown names, self
//!   connections, contradicting declarations, duplicates) and computes the
//!   [`Reconciliation`]: domains to create, policies to add, and built-in
//!   policies to remove. Pure, no I/O.
//!
//! - **[`ChangeSet`]** diffs a reconciliation against a [`LiveTopology`]
//!   and orders the resulting controller [`Operation`]s.
//!
//! - **[`SecurityDomainApi`]** is the controller seam. [`TopologySync`]
//!   plans and applies through it; [`SnapshotController`] implements it
//!   over a JSON state file for offline use.
//!
//! The three built-in domains (`Default_Domain`, `Shared_Service_Domain`,
//! `Aviatrix_Edge_Domain`) exist on every gateway and are never created or
//! deleted here.

pub mod controller;
pub mod error;
pub mod model;
pub mod plan;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::{SecurityDomainApi, SnapshotController, SyncPlan, TopologySync};
pub use error::{CoreError, ReconcileError};
pub use model::{
    ConnectionPair, DEFAULT_DOMAIN, DomainName, EDGE_DOMAIN, LiveTopology, RESERVED_DOMAINS,
    RESERVED_PAIRS, SHARED_SERVICE_DOMAIN,
};
pub use plan::{ChangeSet, Operation, OperationKind};
pub use reconcile::{DomainReconciler, Reconciliation, validate_and_reconcile};
