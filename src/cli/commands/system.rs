use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    utils::build_info,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let needle = name.to_ascii_lowercase();
        if let Some(entry) = context.registry.get(&needle) {
            output::section(entry.name);
            output::info(entry.description);
            output::info(format!("usage: {}", entry.usage));
        } else {
            context.suggest_command(name);
        }
        return Ok(());
    }

    output::section("Commands");
    let mut table = Table::new(vec![Column::left("Command"), Column::left("Description")]);
    for entry in context.registry.iter() {
        table.push(vec![entry.name.to_string(), entry.description.to_string()]);
    }
    output::info(table.render());
    output::hint("Type `help <command>` for usage.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let metadata = build_info::current();
    output::info(metadata);
    let mut table = Table::new(vec![Column::left("Field"), Column::left("Value")]);
    for (label, value) in metadata.rows() {
        table.push(vec![label.to_string(), value.to_string()]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
