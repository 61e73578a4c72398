//! Reconcile-then-apply across domains.
//!
//! [`Orchestrator`] owns nothing but borrowed adapters and the hook runner.
//! It never prints; [`render_report`] does.

use super::hooks::{HookFailure, HookPhase, HookRunner};
use super::session::Session;
use crate::config::Hooks;
use crate::core::context::ExecContext;
use crate::core::domain::DomainAdapter;
use crate::core::reconcile::reconcile_domain;
use crate::core::types::{ApplyStatus, Domain, Item, ReconcileResult, StateCounts, Summary};
use crate::error::{HomedeclError, Result};
use crate::ui as output;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which domains a command touches. Selecting none selects all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainScope {
    pub packages: bool,
    pub dotfiles: bool,
}

impl DomainScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn includes(&self, domain: Domain) -> bool {
        if !self.packages && !self.dotfiles {
            return true;
        }
        match domain {
            Domain::Packages => self.packages,
            Domain::Dotfiles => self.dotfiles,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub scope: DomainScope,
}

/// Result of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub item: String,
    pub status: ApplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainApplyResult {
    pub domain: Domain,
    /// Classification before anything was applied
    pub state: StateCounts,
    pub outcomes: Vec<ItemOutcome>,
    /// Outcomes per status
    pub counts: BTreeMap<ApplyStatus, usize>,
    /// Set when the domain could not be reconciled at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainApplyResult {
    fn new(domain: Domain, state: StateCounts) -> Self {
        Self {
            domain,
            state,
            outcomes: Vec::new(),
            counts: BTreeMap::new(),
            error: None,
        }
    }

    fn unreconciled(domain: Domain, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(domain, StateCounts::default())
        }
    }

    fn record(&mut self, item: &Item, status: ApplyStatus, message: Option<String>) {
        *self.counts.entry(status).or_insert(0) += 1;
        self.outcomes.push(ItemOutcome {
            item: item.display_name(),
            status,
            message,
        });
    }

    pub fn count(&self, status: ApplyStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Failed items, plus one when the whole domain failed.
    pub fn failures(&self) -> usize {
        self.count(ApplyStatus::Failed) + usize::from(self.error.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<DomainApplyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotfiles: Option<DomainApplyResult>,
    pub hook_failures: Vec<HookFailure>,
}

impl ApplyReport {
    pub fn domains(&self) -> impl Iterator<Item = &DomainApplyResult> {
        self.packages.iter().chain(self.dotfiles.iter())
    }

    pub fn failed(&self) -> usize {
        self.domains().map(DomainApplyResult::failures).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.failed() > 0
    }

    /// `ApplyFailed` when any item or domain failed. Hook failures after
    /// apply are not counted.
    pub fn into_result(self) -> Result<Self> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(HomedeclError::ApplyFailed { failed }),
        }
    }
}

pub struct Orchestrator<'a> {
    adapters: Vec<&'a dyn DomainAdapter>,
    hooks: &'a Hooks,
    runner: HookRunner<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(adapters: Vec<&'a dyn DomainAdapter>, hooks: &'a Hooks, runner: HookRunner<'a>) -> Self {
        Self {
            adapters,
            hooks,
            runner,
        }
    }

    fn adapter(&self, domain: Domain) -> Result<&'a dyn DomainAdapter> {
        self.adapters
            .iter()
            .copied()
            .find(|a| a.domain() == domain)
            .ok_or_else(|| HomedeclError::Other(format!("No adapter registered for {}", domain)))
    }

    pub fn reconcile(&self, ctx: &ExecContext, domain: Domain) -> Result<ReconcileResult> {
        reconcile_domain(self.adapter(domain)?, ctx)
    }

    pub fn reconcile_all(&self, ctx: &ExecContext, scope: DomainScope) -> Result<Summary> {
        let results = self
            .adapters
            .iter()
            .filter(|a| scope.includes(a.domain()))
            .map(|a| reconcile_domain(*a, ctx))
            .collect::<Result<Vec<_>>>()?;
        Ok(Summary::from_results(results))
    }

    /// Pre-apply hooks, every selected domain, then post-apply hooks.
    ///
    /// Item and domain failures are recorded and the pass continues; only a
    /// failing pre-apply hook aborts.
    pub fn apply(&self, ctx: &ExecContext, options: &ApplyOptions) -> Result<ApplyReport> {
        if !options.dry_run {
            self.runner
                .run_required(ctx, HookPhase::PreApply, &self.hooks.pre_apply)?;
        }

        let mut report = ApplyReport {
            dry_run: options.dry_run,
            packages: None,
            dotfiles: None,
            hook_failures: Vec::new(),
        };

        for adapter in self.adapters.iter().filter(|a| options.scope.includes(a.domain())) {
            let result = self
                .apply_domain(ctx, *adapter, options.dry_run)
                .unwrap_or_else(|e| DomainApplyResult::unreconciled(adapter.domain(), e.to_string()));
            match result.domain {
                Domain::Packages => report.packages = Some(result),
                Domain::Dotfiles => report.dotfiles = Some(result),
            }
        }

        if !options.dry_run {
            report.hook_failures =
                self.runner
                    .run_all(ctx, HookPhase::PostApply, &self.hooks.post_apply);
        }

        Ok(report)
    }

    fn apply_domain(
        &self,
        ctx: &ExecContext,
        adapter: &dyn DomainAdapter,
        dry_run: bool,
    ) -> Result<DomainApplyResult> {
        let reconciled = reconcile_domain(adapter, ctx)?;
        let mut result = DomainApplyResult::new(adapter.domain(), reconciled.counts());

        for item in reconciled.actionable() {
            if dry_run {
                result.record(item, adapter.planned(item), None);
                continue;
            }
            if ctx.is_cancelled() {
                result.record(item, ApplyStatus::Skipped, Some("interrupted".to_string()));
                continue;
            }

            output::verbose(&format!("Applying {}", item.display_name()));
            match adapter.apply(ctx, item) {
                Ok(status) => result.record(item, status, None),
                Err(e) => result.record(item, ApplyStatus::Failed, Some(e.to_string())),
            }
        }

        for item in &reconciled.errors {
            let message = item
                .error
                .clone()
                .unwrap_or_else(|| "state could not be determined".to_string());
            result.record(item, ApplyStatus::Failed, Some(message));
        }

        Ok(result)
    }
}

/// `homedecl apply`
pub fn run(session: &Session, options: ApplyOptions, json: bool) -> Result<()> {
    let packages = session.package_domain();
    let dotfiles = session.dotfile_domain()?;
    let orchestrator = Orchestrator::new(
        vec![&packages as &dyn DomainAdapter, &dotfiles],
        &session.config.hooks,
        session.hook_runner(),
    );

    let report = orchestrator.apply(&session.ctx, &options)?;
    if json {
        super::print_json(&report)?;
    } else {
        render_report(&report);
    }

    if session.ctx.is_cancelled() {
        return Err(HomedeclError::Interrupted);
    }
    let report = report.into_result()?;
    if !json && !report.dry_run && report.domains().all(|d| d.outcomes.is_empty() && d.error.is_none()) {
        output::success("Everything is up to date");
    }
    Ok(())
}

/// Print every outcome and a one-line summary per domain.
pub fn render_report(report: &ApplyReport) {
    for domain in report.domains() {
        output::header(&format!("{}{}", capitalize(domain.domain), dry_run_suffix(report)));

        if let Some(error) = &domain.error {
            output::error(&format!("{} could not be reconciled: {}", domain.domain, error));
            continue;
        }
        if domain.outcomes.is_empty() {
            output::success("Nothing to do");
            continue;
        }

        for outcome in &domain.outcomes {
            let status = match outcome.status {
                ApplyStatus::Failed => outcome.status.as_str().red().bold(),
                ApplyStatus::Skipped => outcome.status.as_str().yellow(),
                s if s.is_planned() => s.as_str().cyan(),
                s => s.as_str().green(),
            };
            match &outcome.message {
                Some(message) => output::indent(&format!("{:<14} {} ({})", status, outcome.item, message), 1),
                None => output::indent(&format!("{:<14} {}", status, outcome.item), 1),
            }
        }

        let summary = domain
            .counts
            .iter()
            .map(|(status, count)| format!("{} {}", count, status))
            .collect::<Vec<_>>()
            .join(", ");
        output::info(&summary);
    }

    for failure in &report.hook_failures {
        output::warning(&format!(
            "{} hook '{}' failed: {}",
            failure.phase, failure.command, failure.reason
        ));
    }
}

fn dry_run_suffix(report: &ApplyReport) -> &'static str {
    if report.dry_run { " (dry run)" } else { "" }
}

fn capitalize(domain: Domain) -> String {
    let name = domain.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}
