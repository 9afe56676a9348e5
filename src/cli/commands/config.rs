use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    config::FIELDS,
};

const USAGE: &str = "config [show|set <field> <value>]";

/// Settings read once at startup.
const RESTART_FIELDS: &[&str] = &["key_prefix", "data_dir", "log_filter"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", field, value] => set(context, field, value),
        ["set", ..] => Err(CommandError::InvalidArguments(format!(
            "usage: config set <field> <value> (fields: {})",
            FIELDS.join(", ")
        ))),
        _ => Err(CommandError::usage(USAGE)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    let mut table = Table::new(vec![Column::left("Field"), Column::left("Value")]);
    for (field, value) in context.config().entries() {
        table.push(vec![field.to_string(), value]);
    }
    output::info(table.render());
    output::hint(format!(
        "Stored at {}",
        context.config_manager().config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, field: &str, value: &str) -> CommandResult {
    let field = field.to_ascii_lowercase();
    context.set_config_value(&field, value)?;
    output::success(format!("Set {field}."));
    if RESTART_FIELDS.contains(&field.as_str()) {
        output::hint("This setting takes effect the next time the shell starts.");
    }
    Ok(())
}
