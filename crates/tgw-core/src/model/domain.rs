// ── Security domain identity types ──
//
// DomainName and ConnectionPair are the vocabulary of every topology
// operation. Names are case-sensitive exact matches; the controller
// treats `prod` and `Prod` as different domains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Reserved domains ────────────────────────────────────────────────

pub const DEFAULT_DOMAIN: &str = "Default_Domain";
pub const SHARED_SERVICE_DOMAIN: &str = "Shared_Service_Domain";
pub const EDGE_DOMAIN: &str = "Aviatrix_Edge_Domain";

/// Built-in domains that exist on every transit gateway.
///
/// These are never created or deleted by a sync, and the order here
/// fixes the order of [`RESERVED_PAIRS`].
pub const RESERVED_DOMAINS: [&str; 3] = [DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN, EDGE_DOMAIN];

/// Every combination of two reserved domains.
pub const RESERVED_PAIRS: [(&str, &str); 3] = [
    (DEFAULT_DOMAIN, SHARED_SERVICE_DOMAIN),
    (DEFAULT_DOMAIN, EDGE_DOMAIN),
    (SHARED_SERVICE_DOMAIN, EDGE_DOMAIN),
];

// ── DomainName ──────────────────────────────────────────────────────

/// Name of a security domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the three built-in domains.
    pub fn is_reserved(&self) -> bool {
        is_reserved(&self.0)
    }
}

/// Exact, case-sensitive check against [`RESERVED_DOMAINS`].
pub fn is_reserved(name: &str) -> bool {
    RESERVED_DOMAINS.contains(&name)
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for DomainName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DomainName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DomainName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DomainName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── ConnectionPair ──────────────────────────────────────────────────

/// A connection policy between two security domains.
///
/// The policy itself is bidirectional. The pair keeps the orientation it
/// was declared in so plans echo the caller's wording back; use
/// [`same_link`](Self::same_link) or [`normalized`](Self::normalized)
/// when orientation must not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionPair {
    pub from: DomainName,
    pub to: DomainName,
}

impl ConnectionPair {
    pub fn new(from: impl Into<DomainName>, to: impl Into<DomainName>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Same pair with its endpoints in lexical order.
    pub fn normalized(&self) -> Self {
        if self.from <= self.to {
            self.clone()
        } else {
            self.reversed()
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// True if both pairs name the same two domains, in either order.
    pub fn same_link(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }

    pub fn touches(&self, domain: &DomainName) -> bool {
        self.from == *domain || self.to == *domain
    }

    /// Both endpoints are reserved domains.
    pub fn is_reserved(&self) -> bool {
        self.from.is_reserved() && self.to.is_reserved()
    }
}

impl fmt::Display for ConnectionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.from, self.to)
    }
}

impl<A: Into<DomainName>, B: Into<DomainName>> From<(A, B)> for ConnectionPair {
    fn from((from, to): (A, B)) -> Self {
        Self::new(from, to)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_case_sensitive() {
        assert!(is_reserved("Default_Domain"));
        assert!(!is_reserved("default_domain"));
        assert!(!DomainName::from("Prod").is_reserved());
    }

    #[test]
    fn reserved_pairs_cover_every_combination() {
        for (i, a) in RESERVED_DOMAINS.iter().enumerate() {
            for b in &RESERVED_DOMAINS[i + 1..] {
                assert!(
                    RESERVED_PAIRS.contains(&(*a, *b)),
                    "missing reserved pair {a} / {b}"
                );
            }
        }
    }

    #[test]
    fn pair_same_link_ignores_orientation() {
        let ab = ConnectionPair::new("A", "B");
        assert!(ab.same_link(&ConnectionPair::new("B", "A")));
        assert!(!ab.same_link(&ConnectionPair::new("A", "C")));
    }

    #[test]
    fn pair_normalized_orders_endpoints() {
        let pair = ConnectionPair::new("Prod", "Dev").normalized();
        assert_eq!(pair.from, "Dev");
        assert_eq!(pair.to, "Prod");
    }

    #[test]
    fn pair_display() {
        let pair = ConnectionPair::from(("Prod", "Default_Domain"));
        assert_eq!(pair.to_string(), "Prod <-> Default_Domain");
    }

    #[test]
    fn domain_name_from_str() {
        let name: DomainName = "Shared_Service_Domain".parse().unwrap();
        assert!(name.is_reserved());
    }
}
