use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        format::format_date,
        forms::GoalForm,
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    domain::{Displayable, FinancialGoal},
};

use super::{id_and_fields, single_id};

const USAGE: &str = "goal <list|add field=value...|edit <id> field=value...|remove <id>>";
const ADD_USAGE: &str =
    "goal add name=<text> target=<n> [current=<n>] [deadline=YYYY-MM-DD] [notes=<text>] [id=<id>]";
const EDIT_USAGE: &str = "goal edit <id> field=value...";
const REMOVE_USAGE: &str = "goal remove <id>";
const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "List, add, edit or remove savings goals",
        USAGE,
        cmd_goal,
    )]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" | "ls" => handle_list(context),
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "rm" | "delete" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown goal subcommand `{other}`"
        ))),
    }
}

fn handle_list(context: &ShellContext) -> CommandResult {
    output::section("Goals");
    let goals = context.store().goals();
    if goals.is_empty() {
        output::info("No goals yet.");
        return Ok(());
    }
    output::info(render_goals(context, goals));
    Ok(())
}

pub(crate) fn render_goals(context: &ShellContext, goals: &[FinancialGoal]) -> String {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Name").truncated(24),
        Column::right("Saved"),
        Column::right("Target"),
        Column::right("Left"),
        Column::left("Progress"),
        Column::left("Deadline"),
    ]);
    for goal in goals {
        table.push(vec![
            goal.id.clone(),
            goal.name.clone(),
            context.money().format(goal.current_amount),
            context.money().format(goal.target_amount),
            context.money().format(goal.remaining()),
            if goal.is_complete() {
                "done".to_string()
            } else {
                progress_label(goal.progress_percent())
            },
            goal.deadline.map(format_date).unwrap_or_else(|| "-".into()),
        ]);
    }
    table.render()
}

/// `[#####...............]  25%`, or `n/a` when the goal has no usable target.
pub(crate) fn progress_label(percent: Option<u8>) -> String {
    let Some(percent) = percent else {
        return "n/a".to_string();
    };
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let form = GoalForm::parse(args)?;
    let next_id = context.next_id(context.store().goals().iter().map(|g| g.id.as_str()));
    let goal = form.build(|| next_id)?;
    let message = format!(
        "Added goal `{}` ({} of {}).",
        goal.id,
        context.money().format(goal.current_amount),
        context.money().format(goal.target_amount)
    );
    context.store_mut().add_goal(goal)?;
    output::success(message);
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, fields) = id_and_fields(args, EDIT_USAGE)?;
    let form = GoalForm::parse(fields)?;
    let existing = context.store().find_goal(id).ok_or_else(|| not_found(id))?;
    let updated = form.apply_to(existing)?;
    let label = updated.display_label();
    context.store_mut().update_goal(updated)?;
    output::success(format!("Updated goal `{id}`: {label}."));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = single_id(args, REMOVE_USAGE)?;
    if !context.store_mut().delete_goal(id)? {
        return Err(not_found(id));
    }
    output::success(format!("Removed goal `{id}`."));
    Ok(())
}

fn not_found(id: &str) -> CommandError {
    CommandError::NotFound {
        kind: "goal",
        id: id.to_string(),
    }
}
