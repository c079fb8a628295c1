// ── Security-domain reconciliation ──
//
// Turns a declared domain list plus declared connection policies into the
// three deltas a transit gateway needs: domains to create, connection
// policies to add, and reserved connection policies to remove. Pure
// computation; the only side effects are `tracing` events.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReconcileError;
use crate::model::{ConnectionPair, DomainName, RESERVED_PAIRS};

// ── Output ──────────────────────────────────────────────────────────

/// The delta computed from a declared topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Non-reserved domains, in declaration order.
    pub domains_to_create: Vec<DomainName>,
    /// Declared connection policies, one entry per link.
    pub connections_to_add: Vec<ConnectionPair>,
    /// Reserved connection policies the declaration does not ask for.
    pub connections_to_remove: Vec<ConnectionPair>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.domains_to_create.is_empty()
            && self.connections_to_add.is_empty()
            && self.connections_to_remove.is_empty()
    }
}

// ── Adjacency matrix ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    /// No connection.
    Absent,
    /// Requested by a declaration, not yet emitted.
    Declared,
    /// Mandatory or already emitted. Never emitted again.
    Settled,
}

/// Square matrix over domain positions.
///
/// `cells` holds the tri-state connection value for each direction.
/// `isolated` marks directions a caller explicitly declared as not
/// connected; it only feeds the consistency check.
struct AdjacencyMatrix {
    size: usize,
    cells: Vec<Cell>,
    isolated: Vec<bool>,
}

impl AdjacencyMatrix {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Absent; size * size],
            isolated: vec![false; size * size],
        }
    }

    fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.size + col] = cell;
    }

    fn settle(&mut self, a: usize, b: usize) {
        self.set(a, b, Cell::Settled);
        self.set(b, a, Cell::Settled);
    }

    fn isolate(&mut self, row: usize, col: usize) {
        self.isolated[row * self.size + col] = true;
    }

    fn is_isolated(&self, row: usize, col: usize) -> bool {
        self.isolated[row * self.size + col]
    }

    /// First unordered pair whose two directions disagree, if any.
    fn first_asymmetry(&self) -> Option<(usize, usize)> {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let connected =
                    self.get(i, j) == Cell::Declared || self.get(j, i) == Cell::Declared;
                let isolated = self.is_isolated(i, j) || self.is_isolated(j, i);
                if connected && isolated {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

// ── DomainReconciler ────────────────────────────────────────────────

/// Validates declared topologies against one domain list.
///
/// Domain positions follow the input order. A name lookup that misses is
/// reported as `None`, never as position 0.
#[derive(Debug)]
pub struct DomainReconciler<'a> {
    domains: &'a [DomainName],
    positions: IndexSet<&'a str>,
}

impl<'a> DomainReconciler<'a> {
    /// Index the declared domains.
    ///
    /// Fails on an empty list or a name that appears twice.
    pub fn new(domains: &'a [DomainName]) -> Result<Self, ReconcileError> {
        if domains.is_empty() {
            return Err(ReconcileError::EmptyDomainList);
        }

        let mut positions = IndexSet::with_capacity(domains.len());
        for domain in domains {
            if !positions.insert(domain.as_str()) {
                return Err(ReconcileError::DuplicateDomainName {
                    name: domain.to_string(),
                });
            }
        }

        Ok(Self { domains, positions })
    }

    pub fn domains(&self) -> &[DomainName] {
        self.domains
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.positions.get_index_of(name)
    }

    /// Resolve both endpoints of a pair, rejecting unknown names and self pairs.
    fn resolve(&self, pair: &ConnectionPair) -> Result<(usize, usize), ReconcileError> {
        let unknown = |name: &DomainName| ReconcileError::UnknownDomainReference {
            from: pair.from.to_string(),
            to: pair.to.to_string(),
            unknown: name.to_string(),
        };
        let x = self.position(pair.from.as_str()).ok_or_else(|| unknown(&pair.from))?;
        let y = self.position(pair.to.as_str()).ok_or_else(|| unknown(&pair.to))?;
        if x == y {
            return Err(ReconcileError::SelfConnection {
                name: pair.from.to_string(),
            });
        }
        Ok((x, y))
    }

    /// Reconcile declared connections.
    pub fn reconcile(
        &self,
        connections: &[ConnectionPair],
    ) -> Result<Reconciliation, ReconcileError> {
        self.reconcile_declarations(connections, &[])
    }

    /// Reconcile declared connections and declared isolations.
    ///
    /// An isolation `(A, B)` states that `A` does not want a policy to `B`.
    /// It never produces output; it only makes a contradicting connection
    /// declaration an [`ReconcileError::AsymmetricMatrix`].
    pub fn reconcile_declarations(
        &self,
        connections: &[ConnectionPair],
        isolations: &[ConnectionPair],
    ) -> Result<Reconciliation, ReconcileError> {
        let mut matrix = AdjacencyMatrix::new(self.domains.len());

        // Only the declared direction is written. A pair declared once is
        // still treated as bidirectional when it is promoted below.
        for pair in connections {
            let (x, y) = self.resolve(pair)?;
            matrix.set(x, y, Cell::Declared);
        }
        for pair in isolations {
            let (x, y) = self.resolve(pair)?;
            matrix.isolate(x, y);
        }

        if let Some((i, j)) = matrix.first_asymmetry() {
            return Err(ReconcileError::AsymmetricMatrix {
                first: self.domains[i].to_string(),
                second: self.domains[j].to_string(),
            });
        }

        let mut result = Reconciliation::default();

        // Reserved pairs are settled no matter what was declared. Only the
        // cell in reserved order is consulted: a pair declared the other
        // way round is still reported for removal.
        for (a, b) in RESERVED_PAIRS {
            let (Some(x), Some(y)) = (self.position(a), self.position(b)) else {
                debug!(from = a, to = b, "reserved pair skipped, domain not declared");
                continue;
            };
            if matrix.get(x, y) == Cell::Absent {
                result.connections_to_remove.push(ConnectionPair::new(a, b));
            }
            matrix.settle(x, y);
        }

        for pair in connections {
            let (x, y) = self.resolve(pair)?;
            if matrix.get(x, y) == Cell::Declared {
                matrix.settle(x, y);
                result.connections_to_add.push(pair.clone());
            }
        }

        result.domains_to_create = self
            .domains
            .iter()
            .filter(|d| !d.is_reserved())
            .cloned()
            .collect();

        debug!(
            create = result.domains_to_create.len(),
            add = result.connections_to_add.len(),
            remove = result.connections_to_remove.len(),
            "security domains reconciled"
        );

        Ok(result)
    }
}

/// Validate a declared topology and compute its reconciliation delta.
pub fn validate_and_reconcile(
    domains: &[DomainName],
    connections: &[ConnectionPair],
) -> Result<Reconciliation, ReconcileError> {
    DomainReconciler::new(domains)?.reconcile(connections)
}
