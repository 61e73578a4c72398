//! `homedecl managers`: known managers and whether they can be used here.

use super::session::Session;
use crate::error::Result;
use crate::ui as output;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ManagerRow {
    name: String,
    available: bool,
    search: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    install_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help_url: Option<String>,
}

pub fn run(session: &Session, json: bool) -> Result<()> {
    let mut rows = Vec::new();
    for name in session.registry.list_managers() {
        let runtime = session.registry.resolve(name)?;
        let available = match runtime.is_available(&session.ctx) {
            Ok(available) => available,
            Err(e) => {
                output::verbose(&format!("{}: {}", name, e));
                false
            }
        };
        let descriptor = session.registry.descriptor(name);

        rows.push(ManagerRow {
            name: name.to_string(),
            available,
            search: session.registry.supports_search(name),
            description: descriptor.and_then(|d| d.description.clone()),
            install_hint: descriptor.and_then(|d| d.install_hint.clone()),
            help_url: descriptor.and_then(|d| d.help_url.clone()),
        });
    }

    if json {
        return super::print_json(&rows);
    }

    output::header("Package managers");
    for row in &rows {
        let mark = if row.available {
            "✓".green().bold()
        } else {
            "✗".bright_black()
        };
        let description = row.description.as_deref().unwrap_or("");
        output::indent(&format!("{} {:<8} {}", mark, row.name.bold(), description), 1);
        if !row.available
            && let Some(hint) = &row.install_hint
        {
            output::indent(&hint.bright_black().to_string(), 3);
        }
        if output::is_verbose()
            && let Some(url) = &row.help_url
        {
            output::indent(&url.bright_black().to_string(), 3);
        }
    }
    Ok(())
}
