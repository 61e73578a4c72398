//! `homedecl info manager:name`

use super::session::Session;
use crate::error::Result;
use crate::state::DesiredStore;
use crate::ui as output;

pub fn run(session: &Session, package: &str, json: bool) -> Result<()> {
    let spec = session.parse_spec(package)?;
    let runtime = session.registry.resolve(&spec.manager)?;
    let info = runtime.info(&session.ctx, &spec.name)?;

    if json {
        return super::print_json(&info);
    }

    let declared = session.store.load()?.contains(&spec.manager, &spec.name);

    output::header(&spec.to_string());
    output::keyval("Installed", if info.installed { "yes" } else { "no" });
    output::keyval("Declared", if declared { "yes" } else { "no" });
    for (key, value) in &info.fields {
        output::keyval(key, value);
    }
    Ok(())
}
