use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        format::format_date,
        forms::BudgetForm,
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    domain::{category, Displayable},
};

use super::{id_and_fields, single_id};

const USAGE: &str = "budget <list|add field=value...|edit <id> field=value...|remove <id>>";
const ADD_USAGE: &str =
    "budget add category=<tag> amount=<n> [period=weekly|monthly|annual] [start=YYYY-MM-DD] [end=YYYY-MM-DD] [id=<id>]";
const EDIT_USAGE: &str = "budget edit <id> field=value...";
const REMOVE_USAGE: &str = "budget remove <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "List, add, edit or remove budgets",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" | "ls" => handle_list(context),
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "rm" | "delete" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{other}`"
        ))),
    }
}

fn handle_list(context: &ShellContext) -> CommandResult {
    let budgets = context.store().budgets();
    output::section("Budgets");
    if budgets.is_empty() {
        output::info("No budgets defined.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Category"),
        Column::right("Amount"),
        Column::left("Period"),
        Column::left("Start"),
        Column::left("End"),
    ]);
    for budget in budgets {
        let info = category::lookup(&budget.category);
        table.push(vec![
            budget.id.clone(),
            format!("{} {}", info.glyph, budget.category),
            context.money().format(budget.amount),
            budget.period.to_string(),
            format_date(budget.start_date),
            budget.end_date.map(format_date).unwrap_or_else(|| "-".into()),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let form = BudgetForm::parse(args)?;
    let today = context.store().clock().today();
    let next_id = context.next_id(context.store().budgets().iter().map(|b| b.id.as_str()));
    let budget = form.build(|| next_id, today)?;
    let message = format!(
        "Added {} budget `{}` for {} ({}).",
        budget.period,
        budget.id,
        budget.category,
        context.money().format(budget.amount)
    );
    context.store_mut().add_budget(budget)?;
    output::success(message);
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, fields) = id_and_fields(args, EDIT_USAGE)?;
    let form = BudgetForm::parse(fields)?;
    let existing = context.store().find_budget(id).ok_or_else(|| not_found(id))?;
    let updated = form.apply_to(existing)?;
    let label = updated.display_label();
    context.store_mut().update_budget(updated)?;
    output::success(format!("Updated budget `{id}`: {label}."));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = single_id(args, REMOVE_USAGE)?;
    if !context.store_mut().delete_budget(id)? {
        return Err(not_found(id));
    }
    output::success(format!("Removed budget `{id}`."));
    Ok(())
}

fn not_found(id: &str) -> CommandError {
    CommandError::NotFound {
        kind: "budget",
        id: id.to_string(),
    }
}
