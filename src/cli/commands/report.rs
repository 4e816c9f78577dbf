use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::services::TransactionService;
use crate::ledger::ExpenseCategory;

use super::expense::print_grouped;

const BAR_WIDTH: usize = 24;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Show totals, savings rate, budgets, and recent expenses",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "breakdown",
            "Show spending per category",
            "breakdown",
            cmd_breakdown,
        ),
        CommandEntry::new(
            "trend",
            "Show daily spending for the last seven days",
            "trend",
            cmd_trend,
        ),
        CommandEntry::new(
            "categories",
            "List expense categories",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.tracker.dashboard();
    output_section(format!("Dashboard ({})", context.tracker.owner()));
    io::print_info(format!(
        "  Total budget : {}",
        context.format_amount(totals.total_budget)
    ));
    io::print_info(format!(
        "  Total spent  : {}",
        context.format_amount(totals.total_spent)
    ));
    io::print_info(format!(
        "  Remaining    : {}",
        context.format_amount(totals.remaining)
    ));
    io::print_info(format!("  Savings rate : {:.1}%", totals.savings_rate));

    let statuses = context.tracker.budget_statuses();
    if !statuses.is_empty() {
        output_section("Budget progress");
        for status in &statuses {
            let line = format!(
                "  {:<22} {:>3}% {}",
                status.budget.category.display_name(),
                status.percentage_used,
                bar(f64::from(status.percentage_used), 100.0)
            );
            if status.over_budget {
                let over = status.budget.spent - status.budget.amount;
                io::print_warning(format!(
                    "{} over by {}",
                    line.trim_start(),
                    context.format_amount(over)
                ));
            } else {
                io::print_info(line);
            }
        }
    }

    output_section("Recent expenses");
    let recent = TransactionService::recent(context.tracker.ledger(), context.config.recent_limit);
    if recent.is_empty() {
        io::print_info("  No expenses recorded yet.");
    } else {
        print_grouped(context, &recent);
    }
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.tracker.category_spending();
    if rows.is_empty() {
        io::print_info("No spending to break down yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
        TableColumn::left(""),
    ]);
    for row in &rows {
        table.push(vec![
            row.category.display_name().to_string(),
            context.format_amount(row.amount),
            format!("{:.1}%", row.percentage),
            bar(row.percentage, 100.0),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let points = context.tracker.spending_over_time();
    let peak = points.iter().map(|point| point.amount).fold(0.0, f64::max);
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::right("Amount"),
        TableColumn::left(""),
    ]);
    for point in &points {
        table.push(vec![
            point.date.clone(),
            context.format_amount(point.amount),
            bar(point.amount, peak),
        ]);
    }
    table.print();
    let total = points
        .iter()
        .map(|point| point.amount)
        .fold(0.0, |acc, value| acc + value);
    io::print_info(format!("7-day total: {}", context.format_amount(total)));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut table = Table::new(vec![
        TableColumn::left("Key"),
        TableColumn::left("Name"),
        TableColumn::left("Color"),
        TableColumn::left("Budget"),
    ]);
    for category in ExpenseCategory::ALL {
        let info = category.info();
        let budget = context
            .tracker
            .ledger()
            .budget_for_category(category)
            .map(|budget| context.format_amount(budget.amount))
            .unwrap_or_else(|| "-".into());
        table.push(vec![
            category.key().to_string(),
            info.name.to_string(),
            info.color.to_string(),
            budget,
        ]);
    }
    table.print();
    Ok(())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round().clamp(1.0, BAR_WIDTH as f64);
    "#".repeat(filled as usize)
}

#[cfg(test)]
mod tests {
    use super::bar;

    #[test]
    fn bars_scale_to_peak() {
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(10.0, 10.0).len(), 24);
        assert_eq!(bar(5.0, 10.0).len(), 12);
        assert_eq!(bar(0.01, 10.0).len(), 1);
    }
}
