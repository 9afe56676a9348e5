use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output,
        registry::CommandEntry,
        table::{Column, Table},
    },
    core::metrics::{self, RecentFilter},
    domain::category,
};

use super::{goal::render_goals, transaction::render_transactions};

const USAGE: &str = "summary [all|income|expense]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Show balance, monthly totals, recent activity and goals",
        USAGE,
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args {
        [] => RecentFilter::All,
        [raw] => raw.parse::<RecentFilter>().map_err(CommandError::InvalidArguments)?,
        _ => return Err(CommandError::usage(USAGE)),
    };

    // Re-reads the clock so a month rollover since the last mutation is reflected.
    let figures = context.store_mut().refresh_metrics();
    let context: &ShellContext = context;
    let money = context.money();

    output::section("Overview");
    let mut overview = Table::new(vec![Column::left("Metric"), Column::right("Amount")]);
    overview.push(vec!["Total balance".into(), money.format(figures.total_balance)]);
    overview.push(vec!["Income this month".into(), money.format(figures.monthly_income)]);
    overview.push(vec!["Expenses this month".into(), money.format(figures.monthly_expenses)]);
    overview.push(vec!["Net this month".into(), money.format_signed(figures.monthly_net())]);
    output::info(overview.render());

    let store = context.store();
    let rows = metrics::recent(store.transactions(), filter, context.config().recent_limit);
    output::section(format!("Recent transactions ({filter})"));
    if rows.is_empty() {
        output::info("No transactions match.");
    } else {
        output::info(render_transactions(context, &rows));
    }

    let breakdown = metrics::category_breakdown(store.transactions(), store.clock().now());
    if !breakdown.is_empty() {
        output::section("Spending by category");
        let mut table = Table::new(vec![
            Column::left("Category"),
            Column::right("Spent"),
            Column::right("Share"),
        ]);
        for spend in &breakdown {
            let info = category::lookup(&spend.category);
            table.push(vec![
                format!("{} {}", info.glyph, info.label),
                money.format(spend.total),
                format!("{}%", spend.share),
            ]);
        }
        output::info(table.render());
    }

    if !store.goals().is_empty() {
        output::section("Goals");
        output::info(render_goals(context, store.goals()));
    }
    Ok(())
}
