//! Subcommand implementations

pub mod catalog;
pub mod recommend;
pub mod system;

use serde::Serialize;

/// Print any serializable snapshot as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
