pub mod budget;
pub mod config;
pub mod goal;
pub mod summary;
pub mod system;
pub mod transaction;

use crate::cli::{errors::CommandError, registry::CommandEntry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(summary::definitions());
    commands.extend(transaction::definitions());
    commands.extend(budget::definitions());
    commands.extend(goal::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Splits `<id> field=value...` for edit commands.
pub(crate) fn id_and_fields<'a, 'b>(
    args: &'a [&'b str],
    usage: &str,
) -> Result<(&'b str, &'a [&'b str]), CommandError> {
    match args.split_first() {
        Some((id, fields)) if !fields.is_empty() => Ok((*id, fields)),
        _ => Err(CommandError::usage(usage)),
    }
}

pub(crate) fn single_id<'b>(args: &[&'b str], usage: &str) -> Result<&'b str, CommandError> {
    match args {
        [id] => Ok(*id),
        _ => Err(CommandError::usage(usage)),
    }
}
