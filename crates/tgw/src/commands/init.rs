//! `tgw init`: write a starter manifest.

use tgw_config::TopologyManifest;

use crate::cli::InitArgs;
use crate::commands::Ctx;
use crate::error::CliError;
use crate::output;

const INIT_HINT: &str = "Each domain lists its full connected_domains. When connecting a new \
domain, add it to the other side's list too, or validation reports the \
pair as asymmetric.";

pub fn handle(args: &InitArgs, ctx: &Ctx) -> Result<(), CliError> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists {
            path: args.path.display().to_string(),
        });
    }

    let manifest = TopologyManifest::starter(args.tgw_name.as_str());
    manifest.validate()?;
    tgw_config::write_manifest(&args.path, &manifest)?;

    let message = format!(
        "Wrote {} for transit gateway '{}'",
        args.path.display(),
        manifest.tgw_name
    );
    output::print_output(&output::success(&message, ctx.color), ctx.quiet);
    output::print_output(&output::note(INIT_HINT, ctx.color), ctx.quiet);
    Ok(())
}
