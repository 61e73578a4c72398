//! Command implementations. Only this layer and `cli` print.

pub mod add;
pub mod apply;
pub mod hooks;
pub mod info;
pub mod managers;
pub mod search;
pub mod session;
pub mod status;
pub mod upgrade;

pub use session::Session;

use crate::error::Result;
use serde::Serialize;

/// Pretty JSON on stdout, for `--json`.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
