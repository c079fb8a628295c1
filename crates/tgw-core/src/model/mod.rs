// ── Domain model ──

pub mod domain;
pub mod topology;

pub use domain::{
    ConnectionPair, DEFAULT_DOMAIN, DomainName, EDGE_DOMAIN, RESERVED_DOMAINS, RESERVED_PAIRS,
    SHARED_SERVICE_DOMAIN, is_reserved,
};
pub use topology::LiveTopology;
