//! `homedecl search`

use super::session::Session;
use crate::error::{HomedeclError, Result};
use crate::packages::SearchResult;
use crate::ui as output;
use colored::Colorize;

pub struct SearchOptions {
    pub query: String,
    /// Managers to ask; every searchable manager when empty
    pub managers: Vec<String>,
    pub limit: Option<usize>,
    pub json: bool,
}

pub fn run(session: &Session, options: &SearchOptions) -> Result<()> {
    let managers: Vec<String> = if options.managers.is_empty() {
        session
            .registry
            .list_managers()
            .into_iter()
            .filter(|m| session.registry.supports_search(m))
            .map(str::to_string)
            .collect()
    } else {
        for manager in &options.managers {
            if !session.registry.contains(manager) {
                return Err(HomedeclError::UnsupportedManager(manager.clone()));
            }
        }
        options.managers.clone()
    };

    let mut results: Vec<SearchResult> = Vec::new();
    for manager in &managers {
        let runtime = session.registry.resolve(manager)?;
        if !runtime.is_available(&session.ctx).unwrap_or(false) {
            output::verbose(&format!("Skipping {}: not available", manager));
            continue;
        }

        match runtime.search(&session.ctx, &options.query) {
            Ok(mut hits) => {
                if let Some(limit) = options.limit {
                    hits.truncate(limit);
                }
                results.append(&mut hits);
            }
            Err(e) => output::warning(&e.to_string()),
        }
    }

    if options.json {
        return super::print_json(&results);
    }

    if results.is_empty() {
        output::info(&format!("No results for '{}'", options.query));
        return Ok(());
    }

    output::header(&format!("Results for '{}'", options.query));
    for hit in &results {
        let version = hit.version.as_deref().map(|v| format!(" {}", v)).unwrap_or_default();
        output::indent(
            &format!(
                "{}:{}{}",
                hit.manager.bright_black(),
                hit.name.bold(),
                version.green()
            ),
            1,
        );
        if let Some(description) = &hit.description {
            output::indent(description, 3);
        }
    }
    Ok(())
}
