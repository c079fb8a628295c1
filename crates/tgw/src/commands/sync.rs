//! `tgw diff` and `tgw sync`: compare and apply against a controller
//! snapshot file.

use serde::Serialize;
use tabled::Tabled;

use tgw_core::{ChangeSet, Operation, SnapshotController, SyncPlan, TopologySync};

use crate::cli::{LiveArgs, OutputFormat};
use crate::commands::{Ctx, util};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Operation")]
    op: String,
    #[tabled(rename = "Target")]
    target: String,
}

#[derive(Debug, Serialize)]
struct SyncSummary {
    tgw_name: String,
    applied: usize,
    operations: Vec<Operation>,
}

/// Load the manifest and snapshot, then plan against the named gateway.
async fn plan_against_snapshot(
    args: &LiveArgs,
) -> Result<(SnapshotController, String, SyncPlan), CliError> {
    let (manifest, decl) = util::load_declarations(&args.manifest)?;
    let controller = SnapshotController::load(&args.live).await?;
    let plan = TopologySync::new(&controller, manifest.tgw_name.as_str())
        .plan(&decl.domains, &decl.connections, &decl.isolations)
        .await?;
    Ok((controller, manifest.tgw_name, plan))
}

fn render_changes(changes: &ChangeSet, tgw_name: &str, ctx: &Ctx) -> Result<String, CliError> {
    if changes.is_empty() && ctx.format == OutputFormat::Table {
        return Ok(output::note(
            &format!("'{tgw_name}' is up to date."),
            ctx.color,
        ));
    }
    let operations = changes.operations();
    let mut step = 0;
    output::render_list(
        ctx.format,
        &operations,
        |op| {
            step += 1;
            OperationRow {
                step,
                op: output::paint_action(&op.kind().to_string(), ctx.color),
                target: op.target(),
            }
        },
        |op| format!("{} {}", op.kind(), op.target()),
    )
}

pub async fn diff(args: &LiveArgs, ctx: &Ctx) -> Result<(), CliError> {
    let (_, tgw_name, plan) = plan_against_snapshot(args).await?;
    let out = render_changes(&plan.changes, &tgw_name, ctx)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn sync(args: &LiveArgs, ctx: &Ctx) -> Result<(), CliError> {
    let (controller, tgw_name, plan) = plan_against_snapshot(args).await?;
    let table = ctx.format == OutputFormat::Table;

    if plan.changes.is_empty() {
        let summary = SyncSummary {
            tgw_name,
            applied: 0,
            operations: Vec::new(),
        };
        let out = output::render_single(
            ctx.format,
            &summary,
            |s| output::note(&format!("'{}' is up to date.", s.tgw_name), ctx.color),
            |_| String::new(),
        )?;
        output::print_output(&out, ctx.quiet);
        return Ok(());
    }

    if table {
        output::print_output(&render_changes(&plan.changes, &tgw_name, ctx)?, ctx.quiet);
    }

    let prompt = format!(
        "Apply {} operations to '{tgw_name}'?",
        plan.changes.len()
    );
    if !util::confirm(&prompt, "sync", ctx.yes)? {
        output::print_output(&output::note("Aborted.", ctx.color), ctx.quiet);
        return Ok(());
    }

    let sync = TopologySync::new(&controller, tgw_name.as_str());
    let result = sync.apply(&plan.changes).await;
    // Persist whatever was applied, even on partial failure.
    controller.save().await?;
    let applied = result?;

    let summary = SyncSummary {
        tgw_name,
        applied,
        operations: plan.changes.operations(),
    };
    let out = output::render_single(
        ctx.format,
        &summary,
        |s| {
            output::success(
                &format!("Applied {} operations to '{}'", s.applied, s.tgw_name),
                ctx.color,
            )
        },
        |s| s.applied.to_string(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
