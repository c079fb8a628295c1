// ── Core error types ──
//
// `ReconcileError` covers structural problems in a declared topology.
// They are never transient: retrying the same input fails the same way.
// `CoreError` is what controller-facing operations return; it wraps
// reconciliation failures alongside controller and snapshot failures.

use thiserror::Error;

/// A declared topology that cannot be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("no security domains declared")]
    EmptyDomainList,

    #[error("security domain '{name}' is declared more than once")]
    DuplicateDomainName { name: String },

    #[error("connection {from} <-> {to} references unknown security domain '{unknown}'")]
    UnknownDomainReference {
        from: String,
        to: String,
        unknown: String,
    },

    #[error("security domain '{name}' cannot be connected to itself")]
    SelfConnection { name: String },

    #[error("connection between '{first}' and '{second}' is not declared consistently on both sides")]
    AsymmetricMatrix { first: String, second: String },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Topology errors ──────────────────────────────────────────────
    #[error("Invalid topology: {0}")]
    Topology(#[from] ReconcileError),

    // ── Controller errors ────────────────────────────────────────────
    #[error("Transit gateway not found: {name}")]
    GatewayNotFound { name: String },

    #[error("Security domain not found: {name}")]
    DomainNotFound { name: String },

    #[error("Security domain already exists: {name}")]
    DomainExists { name: String },

    #[error("Operation rejected by controller: {message}")]
    Rejected { message: String },

    #[error("Apply stopped after {applied} of {total} operations: {source}")]
    ApplyFailed {
        applied: usize,
        total: usize,
        #[source]
        source: Box<CoreError>,
    },

    // ── Snapshot errors ──────────────────────────────────────────────
    #[error("Snapshot I/O failed for {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {path} is not valid: {source}")]
    SnapshotFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    /// Returns `true` if the error comes from the declared input rather
    /// than the controller.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Topology(_))
    }
}
