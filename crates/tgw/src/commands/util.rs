//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use tgw_config::{Declarations, TopologyManifest};

use crate::error::CliError;

/// Load a manifest and flatten it into reconciler input.
pub fn load_declarations(path: &Path) -> Result<(TopologyManifest, Declarations), CliError> {
    let manifest = tgw_config::load_manifest(path)?;
    let declarations = manifest.declarations();
    Ok((manifest, declarations))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without `--yes`, a non-interactive stdin is an error rather than a
/// silent "no".
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
