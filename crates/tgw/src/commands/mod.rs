//! Command dispatch and the resolved output context.

pub mod init;
pub mod plan;
pub mod sync;
pub mod util;

use clap::{CommandFactory, ValueEnum};
use tgw_config::Settings;

use crate::cli::{Cli, ColorMode, Command, CompletionsArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Global flags after merging with user settings.
///
/// Precedence: command line (and `TGW_OUTPUT`), then `config.toml`, then
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Ctx {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Ctx {
    pub fn resolve(global: &GlobalOpts, settings: &Settings) -> Result<Self, CliError> {
        let format = match global.output {
            Some(format) => format,
            None => parse_setting("output", &settings.output)?,
        };
        let color_mode = match global.color {
            Some(mode) => mode,
            None => parse_setting::<ColorMode>("color", &settings.color)?,
        };
        Ok(Self {
            format,
            color: output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
        })
    }
}

fn parse_setting<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("unsupported value '{raw}' in settings"),
    })
}

pub async fn dispatch(cmd: Command, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Validate(args) => plan::validate(&args, ctx),
        Command::Plan(args) => plan::plan(&args, ctx),
        Command::Diff(args) => sync::diff(&args, ctx).await,
        Command::Sync(args) => sync::sync(&args, ctx).await,
        Command::Init(args) => init::handle(&args, ctx),
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }
    }
}

/// Write shell completions for `tgw` to stdout.
pub fn completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "tgw", &mut std::io::stdout());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn global(output: Option<OutputFormat>) -> GlobalOpts {
        GlobalOpts {
            output,
            color: Some(ColorMode::Never),
            verbose: 0,
            quiet: false,
            yes: false,
        }
    }

    #[test]
    fn flag_wins_over_settings() {
        let settings = Settings {
            output: "yaml".into(),
            color: "never".into(),
        };
        let ctx = Ctx::resolve(&global(Some(OutputFormat::Json)), &settings).unwrap();
        assert_eq!(ctx.format, OutputFormat::Json);
        assert!(!ctx.color);
    }

    #[test]
    fn settings_fill_missing_flags() {
        let settings = Settings {
            output: "json-compact".into(),
            color: "never".into(),
        };
        let ctx = Ctx::resolve(&global(None), &settings).unwrap();
        assert_eq!(ctx.format, OutputFormat::JsonCompact);
    }

    #[test]
    fn bad_setting_is_a_validation_error() {
        let settings = Settings {
            output: "xml".into(),
            color: "never".into(),
        };
        let err = Ctx::resolve(&global(None), &settings).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "output"));
    }
}
