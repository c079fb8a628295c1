//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tgw_config::ConfigError;
use tgw_core::{CoreError, ReconcileError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_TOPOLOGY: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const APPLY: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Topology ─────────────────────────────────────────────────────
    #[error("Invalid topology: {message}")]
    #[diagnostic(
        code(tgw::invalid_topology),
        help(
            "Every connected domain must be declared in security_domains, and a\n\
             domain that lists its connected_domains must list every domain\n\
             that lists it back."
        )
    )]
    InvalidTopology { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(tgw::manifest_not_found),
        help("Create one with: tgw init {path} --tgw-name <NAME>")
    )]
    ManifestNotFound { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tgw::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load configuration: {message}")]
    #[diagnostic(code(tgw::config))]
    Config { message: String },

    #[error("{path} already exists")]
    #[diagnostic(code(tgw::conflict), help("Use --force to overwrite it."))]
    AlreadyExists { path: String },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Transit gateway '{name}' not found in snapshot")]
    #[diagnostic(
        code(tgw::gateway_not_found),
        help("Check tgw_name in the manifest, or override it with TGW_TGW_NAME.")
    )]
    GatewayNotFound { name: String },

    #[error("Controller rejected the request: {message}")]
    #[diagnostic(code(tgw::controller))]
    Controller { message: String },

    #[error("Sync stopped after {applied} of {total} operations: {message}")]
    #[diagnostic(
        code(tgw::apply_failed),
        help("Operations already applied were saved. Run `tgw diff` to see what remains.")
    )]
    ApplyFailed {
        applied: usize,
        total: usize,
        message: String,
    },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tgw::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("Failed to render output: {message}")]
    #[diagnostic(code(tgw::render))]
    Render { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidTopology { .. } => exit_code::INVALID_TOPOLOGY,
            Self::ManifestNotFound { .. } | Self::GatewayNotFound { .. } => exit_code::NOT_FOUND,
            Self::AlreadyExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ApplyFailed { .. } => exit_code::APPLY,
            Self::Config { .. } | Self::Controller { .. } | Self::Render { .. } | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Topology(e) => CliError::InvalidTopology {
                message: e.to_string(),
            },
            CoreError::GatewayNotFound { name } => CliError::GatewayNotFound { name },
            CoreError::ApplyFailed {
                applied,
                total,
                source,
            } => CliError::ApplyFailed {
                applied,
                total,
                message: source.to_string(),
            },
            CoreError::SnapshotIo { path, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    CliError::Validation {
                        field: "live".into(),
                        reason: format!("snapshot not found: {path}"),
                    }
                } else {
                    CliError::Io(source)
                }
            }
            CoreError::SnapshotFormat { path, source } => CliError::Validation {
                field: "live".into(),
                reason: format!("{path}: {source}"),
            },
            other @ (CoreError::DomainNotFound { .. }
            | CoreError::DomainExists { .. }
            | CoreError::Rejected { .. }) => CliError::Controller {
                message: other.to_string(),
            },
        }
    }
}

impl From<ReconcileError> for CliError {
    fn from(err: ReconcileError) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ManifestNotFound { path } => CliError::ManifestNotFound { path },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}
