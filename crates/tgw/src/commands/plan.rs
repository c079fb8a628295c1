//! `tgw validate` and `tgw plan`: offline checks against a manifest.

use serde::Serialize;
use tabled::Tabled;

use tgw_core::{DomainReconciler, Reconciliation};

use crate::cli::ManifestArgs;
use crate::commands::{Ctx, util};
use crate::error::CliError;
use crate::output;

// ── Validate ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ValidationSummary {
    tgw_name: String,
    valid: bool,
    domains: usize,
    connections: usize,
    isolations: usize,
}

pub fn validate(args: &ManifestArgs, ctx: &Ctx) -> Result<(), CliError> {
    let (manifest, decl) = util::load_declarations(&args.manifest)?;
    DomainReconciler::new(&decl.domains)?
        .reconcile_declarations(&decl.connections, &decl.isolations)?;

    let summary = ValidationSummary {
        tgw_name: manifest.tgw_name,
        valid: true,
        domains: decl.domains.len(),
        connections: decl.connections.len(),
        isolations: decl.isolations.len(),
    };

    let out = output::render_single(
        ctx.format,
        &summary,
        |s| {
            output::success(
                &format!(
                    "Topology for '{}' is valid: {} domains, {} connection declarations",
                    s.tgw_name, s.domains, s.connections
                ),
                ctx.color,
            )
        },
        |_| "valid".into(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Plan ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PlanReport {
    tgw_name: String,
    #[serde(flatten)]
    reconciliation: Reconciliation,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Target")]
    target: String,
}

/// (action, plain-text target, display target) for every planned change.
fn plan_lines(r: &Reconciliation) -> Vec<(&'static str, String, String)> {
    let mut lines = Vec::with_capacity(
        r.domains_to_create.len() + r.connections_to_add.len() + r.connections_to_remove.len(),
    );
    for domain in &r.domains_to_create {
        lines.push(("create_domain", domain.to_string(), domain.to_string()));
    }
    for pair in &r.connections_to_add {
        lines.push(("add_connection", format!("{} {}", pair.from, pair.to), pair.to_string()));
    }
    for pair in &r.connections_to_remove {
        lines.push((
            "remove_connection",
            format!("{} {}", pair.from, pair.to),
            pair.to_string(),
        ));
    }
    lines
}

pub fn plan(args: &ManifestArgs, ctx: &Ctx) -> Result<(), CliError> {
    let (manifest, decl) = util::load_declarations(&args.manifest)?;
    let reconciliation = DomainReconciler::new(&decl.domains)?
        .reconcile_declarations(&decl.connections, &decl.isolations)?;

    let report = PlanReport {
        tgw_name: manifest.tgw_name,
        reconciliation,
    };

    let out = output::render_single(
        ctx.format,
        &report,
        |r| {
            if r.reconciliation.is_empty() {
                return output::note(
                    &format!("Nothing to do for '{}'.", r.tgw_name),
                    ctx.color,
                );
            }
            let rows: Vec<PlanRow> = plan_lines(&r.reconciliation)
                .into_iter()
                .map(|(action, _, target)| PlanRow {
                    action: output::paint_action(action, ctx.color),
                    target,
                })
                .collect();
            output::render_table(&rows)
        },
        |r| {
            plan_lines(&r.reconciliation)
                .into_iter()
                .map(|(action, target, _)| format!("{action} {target}"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use tgw_core::{ConnectionPair, DEFAULT_DOMAIN, DomainName, EDGE_DOMAIN};

    use super::*;

    #[test]
    fn plan_lines_follow_reconciliation_order() {
        let r = Reconciliation {
            domains_to_create: vec![DomainName::from("Prod")],
            connections_to_add: vec![ConnectionPair::new("Prod", DEFAULT_DOMAIN)],
            connections_to_remove: vec![ConnectionPair::new(DEFAULT_DOMAIN, EDGE_DOMAIN)],
        };
        let actions: Vec<&str> = plan_lines(&r).iter().map(|(a, _, _)| *a).collect();
        assert_eq!(
            actions,
            vec!["create_domain", "add_connection", "remove_connection"]
        );
        assert_eq!(plan_lines(&r)[1].1, "Prod Default_Domain");
    }
}
