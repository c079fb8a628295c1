//! Topology manifests and CLI settings for tgw.
//!
//! A manifest declares one transit gateway's security domains and which
//! domains each one connects to. Loading goes through `figment` so the
//! gateway name can be overridden from the environment (`TGW_TGW_NAME`).
//! CLI settings live in a separate `config.toml` under the platform
//! config directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tgw_core::{ConnectionPair, DomainName, RESERVED_DOMAINS};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("failed to serialize manifest: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Topology manifest ───────────────────────────────────────────────

/// Declared security-domain topology for one transit gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopologyManifest {
    /// Transit gateway the topology applies to.
    pub tgw_name: String,

    #[serde(default)]
    pub security_domains: Vec<DomainEntry>,
}

/// One `[[security_domains]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainEntry {
    pub name: String,

    /// Full list of domains this one connects to.
    ///
    /// Omitted means the entry makes no statement about its connections.
    /// Present means every declared domain not listed is isolated from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_domains: Option<Vec<String>>,
}

/// Reconciler input derived from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub domains: Vec<DomainName>,
    pub connections: Vec<ConnectionPair>,
    pub isolations: Vec<ConnectionPair>,
}

impl TopologyManifest {
    /// Starter manifest: the built-in domains, fully connected.
    ///
    /// Every entry lists its full `connected_domains`, so each one isolates
    /// any domain it does not name. A new domain that lists
    /// `Default_Domain` must also be added to `Default_Domain`'s list, or
    /// the pair is rejected as asymmetric.
    pub fn starter(tgw_name: impl Into<String>) -> Self {
        let security_domains = RESERVED_DOMAINS
            .iter()
            .map(|name| DomainEntry {
                name: (*name).to_owned(),
                connected_domains: Some(
                    RESERVED_DOMAINS
                        .iter()
                        .filter(|other| *other != name)
                        .map(|other| (*other).to_owned())
                        .collect(),
                ),
            })
            .collect();
        Self {
            tgw_name: tgw_name.into(),
            security_domains,
        }
    }

    /// Reject blank names. Structural problems (unknown references,
    /// duplicates) are left to the reconciler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tgw_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "tgw_name".into(),
                reason: "must not be empty".into(),
            });
        }
        for (i, entry) in self.security_domains.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("security_domains[{i}].name"),
                    reason: "must not be empty".into(),
                });
            }
            let blank = entry
                .connected_domains
                .iter()
                .flatten()
                .any(|c| c.trim().is_empty());
            if blank {
                return Err(ConfigError::Validation {
                    field: format!("security_domains[{i}].connected_domains"),
                    reason: "contains an empty domain name".into(),
                });
            }
        }
        Ok(())
    }

    /// Flatten into domain list, connections, and isolations.
    ///
    /// Each listed neighbour becomes a connection declared from the
    /// entry's side. When an entry lists its neighbours, every other
    /// declared domain becomes an isolation from that side.
    pub fn declarations(&self) -> Declarations {
        let domains: Vec<DomainName> = self
            .security_domains
            .iter()
            .map(|e| DomainName::from(e.name.as_str()))
            .collect();

        let mut out = Declarations {
            domains,
            ..Declarations::default()
        };

        for entry in &self.security_domains {
            let Some(connected) = &entry.connected_domains else {
                continue;
            };
            for other in connected {
                out.connections
                    .push(ConnectionPair::new(entry.name.as_str(), other.as_str()));
            }
            for other in &out.domains {
                if other.as_str() == entry.name {
                    continue;
                }
                if !connected.iter().any(|c| c.as_str() == other.as_str()) {
                    out.isolations
                        .push(ConnectionPair::new(entry.name.as_str(), other.clone()));
                }
            }
        }

        out
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load a manifest file, letting `TGW_TGW_NAME` override the gateway name.
pub fn load_manifest(path: &Path) -> Result<TopologyManifest, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ManifestNotFound {
            path: path.display().to_string(),
        });
    }

    let manifest: TopologyManifest = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TGW_").only(&["tgw_name"]))
        .extract()?;
    manifest.validate()?;

    debug!(
        path = %path.display(),
        tgw = %manifest.tgw_name,
        domains = manifest.security_domains.len(),
        "loaded topology manifest"
    );
    Ok(manifest)
}

/// Serialize a manifest to TOML and write it, creating parent directories.
pub fn write_manifest(path: &Path, manifest: &TopologyManifest) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, manifest.to_toml()?)?;
    Ok(())
}

// ── CLI settings ────────────────────────────────────────────────────

/// User-level defaults for the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Resolve the settings file path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("io", "tgw", "tgw").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tgw");
    p
}

/// Load settings from file + environment (`TGW_OUTPUT`, `TGW_COLOR`).
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TGW_").only(&["output", "color"]))
        .extract()?;
    Ok(settings)
}

/// Load settings from the canonical path, falling back to defaults.
pub fn load_settings_or_default() -> Settings {
    load_settings_from(&settings_path()).unwrap_or_default()
}
