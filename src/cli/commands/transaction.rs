use colored::Colorize;

use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        format::format_date,
        forms::TransactionForm,
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    core::metrics::{self, RecentFilter},
    domain::{category, Displayable, Transaction},
};

use super::{id_and_fields, single_id};

const USAGE: &str = "transaction <list [all|income|expense]|add field=value...|edit <id> field=value...|remove <id>>";
const ADD_USAGE: &str =
    "transaction add description=<text> amount=<n> [type=income|expense] [category=<tag>] [date=YYYY-MM-DD] [id=<id>]";
const EDIT_USAGE: &str = "transaction edit <id> field=value...";
const REMOVE_USAGE: &str = "transaction remove <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "transaction",
        "List, add, edit or remove transactions",
        USAGE,
        cmd_transaction,
    )]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" | "ls" => handle_list(context, rest),
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "rm" | "delete" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown transaction subcommand `{other}`"
        ))),
    }
}

fn handle_list(context: &ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args.first() {
        Some(raw) => raw.parse::<RecentFilter>().map_err(CommandError::InvalidArguments)?,
        None => RecentFilter::All,
    };
    let transactions = context.store().transactions();
    let rows = metrics::recent(transactions, filter, transactions.len());
    output::section(format!("Transactions ({filter})"));
    if rows.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }
    output::info(render_transactions(context, &rows));
    Ok(())
}

pub(crate) fn render_transactions(context: &ShellContext, rows: &[&Transaction]) -> String {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Date"),
        Column::left("Description").truncated(28),
        Column::left("Category"),
        Column::right("Amount"),
    ]);
    for txn in rows {
        let info = category::lookup(&txn.category);
        let amount = context.money().format_signed(txn.amount);
        let amount = if txn.is_income() {
            amount.green().to_string()
        } else if txn.is_expense() {
            amount.red().to_string()
        } else {
            amount
        };
        table.push(vec![
            txn.id.clone(),
            format_date(txn.date),
            txn.description.clone(),
            format!("{} {}", info.glyph, txn.category),
            amount,
        ]);
    }
    table.render()
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let form = TransactionForm::parse(args)?;
    let today = context.store().clock().today();
    let next_id = context.next_id(context.store().transactions().iter().map(|t| t.id.as_str()));
    let transaction = form.build(|| next_id, today)?;
    let summary = format!(
        "Added transaction `{}` ({} {}).",
        transaction.id,
        transaction.description,
        context.money().format_signed(transaction.amount)
    );
    let tag = transaction.category.clone();
    context.store_mut().add_transaction(transaction)?;
    output::success(summary);
    if tag != category::DEFAULT_CATEGORY.tag && !category::is_known(&tag) {
        output::hint(format!("`{tag}` is not a known category; it will show as Other."));
    }
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, fields) = id_and_fields(args, EDIT_USAGE)?;
    let form = TransactionForm::parse(fields)?;
    let existing = context
        .store()
        .find_transaction(id)
        .ok_or_else(|| not_found(id))?;
    let updated = form.apply_to(existing)?;
    let label = updated.display_label();
    context.store_mut().update_transaction(updated)?;
    output::success(format!("Updated transaction `{id}`: {label}."));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = single_id(args, REMOVE_USAGE)?;
    if !context.store_mut().delete_transaction(id)? {
        return Err(not_found(id));
    }
    output::success(format!("Removed transaction `{id}`."));
    Ok(())
}

fn not_found(id: &str) -> CommandError {
    CommandError::NotFound {
        kind: "transaction",
        id: id.to_string(),
    }
}
