//! `homedecl status`: classification only, nothing is changed.

use super::apply::{DomainScope, Orchestrator};
use super::session::Session;
use crate::core::domain::DomainAdapter;
use crate::core::types::{Item, ReconcileResult, Summary};
use crate::error::Result;
use crate::ui as output;
use colored::Colorize;

pub fn run(session: &Session, scope: DomainScope, json: bool) -> Result<()> {
    let packages = session.package_domain();
    let dotfiles = session.dotfile_domain()?;
    let orchestrator = Orchestrator::new(
        vec![&packages as &dyn DomainAdapter, &dotfiles],
        &session.config.hooks,
        session.hook_runner(),
    );

    let summary = orchestrator.reconcile_all(&session.ctx, scope)?;
    if json {
        return super::print_json(&summary);
    }

    render(&summary);
    Ok(())
}

fn render(summary: &Summary) {
    for result in &summary.results {
        render_domain(result);
    }

    output::separator();
    let totals = summary.totals;
    output::keyval(
        "Total",
        &format!(
            "{} managed, {} missing, {} drifted, {} untracked, {} errors",
            totals.managed, totals.missing, totals.drifted, totals.untracked, totals.errors
        ),
    );
    if summary.is_in_sync() {
        output::success("In sync");
    } else {
        output::info("Run 'homedecl apply' to converge");
    }
}

fn render_domain(result: &ReconcileResult) {
    output::header(&format!("{}", result.domain));

    if output::is_verbose() {
        list("managed", &result.managed, |s| s.green());
    }
    list("missing", &result.missing, |s| s.yellow());
    list("drifted", &result.degraded, |s| s.magenta());
    list("untracked", &result.untracked, |s| s.bright_black());

    for item in &result.errors {
        output::indent(
            &format!(
                "{:<10} {} ({})",
                "error".red().bold(),
                item.display_name(),
                item.error.as_deref().unwrap_or("unknown")
            ),
            1,
        );
    }

    let counts = result.counts();
    output::info(&format!(
        "{} managed, {} missing, {} drifted, {} untracked",
        counts.managed, counts.missing, counts.drifted, counts.untracked
    ));
}

fn list(label: &str, items: &[Item], paint: impl Fn(&str) -> colored::ColoredString) {
    for item in items {
        output::indent(&format!("{:<10} {}", paint(label), item.display_name()), 1);
    }
}
