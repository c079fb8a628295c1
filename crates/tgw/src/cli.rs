//! Clap derive structures for the `tgw` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tgw -- declarative security domains for transit gateways
#[derive(Debug, Parser)]
#[command(
    name = "tgw",
    version,
    about = "Plan and sync transit-gateway security domains",
    long_about = "Validates a declared security-domain topology and computes the\n\
        changes a transit gateway needs: domains to create, connection\n\
        policies to add, and built-in policies to remove.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: from settings, else table]
    #[arg(long, short = 'o', env = "TGW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from settings, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one entry per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a topology manifest without computing changes
    #[command(alias = "check")]
    Validate(ManifestArgs),

    /// Show domains to create and connection policies to add or remove
    Plan(ManifestArgs),

    /// Compare a manifest against a controller snapshot
    Diff(LiveArgs),

    /// Apply a manifest to a controller snapshot file
    #[command(alias = "apply")]
    Sync(LiveArgs),

    /// Write a starter manifest with the built-in domains
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ManifestArgs {
    /// Path to the topology manifest (TOML)
    pub manifest: PathBuf,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Path to the topology manifest (TOML)
    pub manifest: PathBuf,

    /// Controller snapshot (JSON, keyed by transit gateway name)
    #[arg(long, short = 'l', env = "TGW_LIVE")]
    pub live: PathBuf,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the manifest
    pub path: PathBuf,

    /// Transit gateway name to put in the manifest
    #[arg(long, short = 'n')]
    pub tgw_name: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
