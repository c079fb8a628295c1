// ── Live controller state ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{ConnectionPair, DomainName};

/// What a transit gateway currently has configured.
///
/// Connections are stored normalized, so a policy reported as `B <-> A`
/// and one reported as `A <-> B` collapse to a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveTopology {
    #[serde(default)]
    pub domains: BTreeSet<DomainName>,
    #[serde(default)]
    pub connections: BTreeSet<ConnectionPair>,
}

impl LiveTopology {
    pub fn new(
        domains: impl IntoIterator<Item = DomainName>,
        connections: impl IntoIterator<Item = ConnectionPair>,
    ) -> Self {
        Self {
            domains: domains.into_iter().collect(),
            connections: connections
                .into_iter()
                .map(|c| c.normalized())
                .collect(),
        }
    }

    pub fn has_domain(&self, name: &DomainName) -> bool {
        self.domains.contains(name)
    }

    pub fn is_connected(&self, pair: &ConnectionPair) -> bool {
        self.connections.contains(&pair.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_collapse_regardless_of_orientation() {
        let live = LiveTopology::new(
            [DomainName::from("A"), DomainName::from("B")],
            [ConnectionPair::new("B", "A"), ConnectionPair::new("A", "B")],
        );
        assert_eq!(live.connections.len(), 1);
        assert!(live.is_connected(&ConnectionPair::new("A", "B")));
        assert!(live.is_connected(&ConnectionPair::new("B", "A")));
    }
}
