// ── Live-state change sets ──
//
// A `Reconciliation` says what the declaration wants. A `ChangeSet` says
// what has to happen on a particular controller to get there, given what
// that controller already has.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{ConnectionPair, DomainName, LiveTopology, RESERVED_PAIRS};
use crate::reconcile::Reconciliation;

/// Kind of a single controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Disconnect,
    DeleteDomain,
    CreateDomain,
    Connect,
}

/// One controller call, in the order [`ChangeSet::operations`] yields it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Disconnect { pair: ConnectionPair },
    DeleteDomain { domain: DomainName },
    CreateDomain { domain: DomainName },
    Connect { pair: ConnectionPair },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Disconnect { .. } => OperationKind::Disconnect,
            Self::DeleteDomain { .. } => OperationKind::DeleteDomain,
            Self::CreateDomain { .. } => OperationKind::CreateDomain,
            Self::Connect { .. } => OperationKind::Connect,
        }
    }

    /// Human-readable target of the operation.
    pub fn target(&self) -> String {
        match self {
            Self::Disconnect { pair } | Self::Connect { pair } => pair.to_string(),
            Self::DeleteDomain { domain } | Self::CreateDomain { domain } => domain.to_string(),
        }
    }
}

/// Controller operations needed to reach a reconciled topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub create_domains: Vec<DomainName>,
    pub delete_domains: Vec<DomainName>,
    pub connect: Vec<ConnectionPair>,
    pub disconnect: Vec<ConnectionPair>,
}

impl ChangeSet {
    /// Diff a reconciliation of `declared` against live controller state.
    ///
    /// Reserved pairs are settled by the reconciler and never reach
    /// `connections_to_add`, so the ones it keeps are reconnected here when
    /// they are missing live.
    pub fn between(
        declared: &[DomainName],
        desired: &Reconciliation,
        live: &LiveTopology,
    ) -> Self {
        let create_domains = desired
            .domains_to_create
            .iter()
            .filter(|d| !live.has_domain(d))
            .cloned()
            .collect();

        let delete_domains: Vec<DomainName> = live
            .domains
            .iter()
            .filter(|d| !d.is_reserved() && !desired.domains_to_create.contains(d))
            .cloned()
            .collect();

        let is_declared = |name: &str| declared.iter().any(|d| d.as_str() == name);
        let kept_reserved = RESERVED_PAIRS
            .iter()
            .filter(|(a, b)| is_declared(a) && is_declared(b))
            .map(|(a, b)| ConnectionPair::new(*a, *b))
            .filter(|pair| {
                !desired
                    .connections_to_remove
                    .iter()
                    .any(|r| r.same_link(pair))
            });

        let connect = kept_reserved
            .chain(desired.connections_to_add.iter().cloned())
            .filter(|pair| !live.is_connected(pair))
            .collect();

        // Live connections are normalized, so each link is visited once.
        let disconnect = live
            .connections
            .iter()
            .filter(|pair| {
                if delete_domains.iter().any(|d| pair.touches(d)) {
                    return true;
                }
                if pair.is_reserved() {
                    return desired
                        .connections_to_remove
                        .iter()
                        .any(|r| r.same_link(pair));
                }
                !desired.connections_to_add.iter().any(|a| a.same_link(pair))
            })
            .cloned()
            .collect();

        Self {
            create_domains,
            delete_domains,
            connect,
            disconnect,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.create_domains.len()
            + self.delete_domains.len()
            + self.connect.len()
            + self.disconnect.len()
    }

    /// Operations in execution order.
    ///
    /// Connections are torn down before the domains they reference are
    /// deleted, and domains exist before connections to them are made.
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(self.len());
        ops.extend(
            self.disconnect
                .iter()
                .map(|pair| Operation::Disconnect { pair: pair.clone() }),
        );
        ops.extend(
            self.delete_domains
                .iter()
                .map(|domain| Operation::DeleteDomain {
                    domain: domain.clone(),
                }),
        );
        ops.extend(
            self.create_domains
                .iter()
                .map(|domain| Operation::CreateDomain {
                    domain: domain.clone(),
                }),
        );
        ops.extend(
            self.connect
                .iter()
                .map(|pair| Operation::Connect { pair: pair.clone() }),
        );
        ops
    }
}
