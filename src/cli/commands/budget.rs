use uuid::Uuid;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::services::BudgetService;
use crate::core::validation::{parse_amount, parse_category};
use crate::ledger::{short_id, BudgetPatch, BudgetPeriod, ExpenseCategory};

use super::{split_subcommand, ParsedArgs};

const USAGE: &str = "budget add <category> <amount> [monthly|weekly]
budget list
budget update <id|category> [--amount <amount>] [--category <category>] [--period <period>]
budget delete <id|category>
budget available";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage per-category spending limits",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => add(context, rest),
        "list" | "ls" => list(context),
        "update" | "edit" => update(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        "available" => available(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `budget {}`",
            other
        ))),
    }
}

fn parse_period(raw: &str) -> Result<BudgetPeriod, CommandError> {
    raw.parse().map_err(CommandError::InvalidArguments)
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (category, amount, period) = if args.is_empty() && context.can_prompt() {
        match prompt_budget(context)? {
            Some(values) => values,
            None => return Ok(()),
        }
    } else {
        let [category, amount, rest @ ..] = args else {
            return Err(CommandError::InvalidArguments(
                "usage: budget add <category> <amount> [monthly|weekly]".into(),
            ));
        };
        let period = match rest.first() {
            Some(raw) => parse_period(raw)?,
            None => BudgetPeriod::default(),
        };
        (parse_category(category)?, parse_amount(amount)?, period)
    };

    let budget = context.tracker.add_budget(category, amount, period)?;
    io::print_success(format!(
        "{} budget of {} ({}) created [{}]; {} already spent.",
        category.display_name(),
        context.format_amount(budget.amount),
        budget.period,
        short_id(budget.id),
        context.format_amount(budget.spent)
    ));
    Ok(())
}

fn prompt_budget(
    context: &ShellContext,
) -> Result<Option<(ExpenseCategory, f64, BudgetPeriod)>, CommandError> {
    let open = BudgetService::available_categories(context.tracker.ledger());
    if open.is_empty() {
        io::print_info("Every category already has a budget.");
        return Ok(None);
    }
    let names: Vec<&str> = open.iter().map(|category| category.display_name()).collect();
    let category = open[io::select_index(&context.theme, "Category", &names)?];
    let amount = parse_amount(&io::prompt_text(&context.theme, "Limit")?)?;
    let periods = [BudgetPeriod::Monthly, BudgetPeriod::Weekly];
    let labels: Vec<&str> = periods.iter().map(|period| period.label()).collect();
    let period = periods[io::select_index(&context.theme, "Period", &labels)?];
    Ok(Some((category, amount, period)))
}

fn list(context: &mut ShellContext) -> CommandResult {
    let statuses = context.tracker.budget_statuses();
    if statuses.is_empty() {
        io::print_info("No budgets yet. Use `budget add <category> <amount>`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Category"),
        TableColumn::left("Period"),
        TableColumn::right("Spent"),
        TableColumn::right("Limit"),
        TableColumn::right("Left"),
        TableColumn::right("Used"),
        TableColumn::left("Status"),
    ]);
    for status in &statuses {
        let budget = &status.budget;
        table.push(vec![
            short_id(budget.id),
            budget.category.display_name().to_string(),
            budget.period.to_string(),
            context.format_amount(budget.spent),
            context.format_amount(budget.amount),
            context.format_amount(status.remaining),
            format!("{}%", status.percentage_used),
            if status.over_budget { "OVER" } else { "ok" }.to_string(),
        ]);
    }
    table.print();
    Ok(())
}

/// Accepts a category key or name before falling back to an id prefix.
fn resolve(context: &ShellContext, input: &str) -> Result<Option<Uuid>, CommandError> {
    if let Ok(category) = input.parse::<ExpenseCategory>() {
        return Ok(context
            .tracker
            .ledger()
            .budget_for_category(category)
            .map(|budget| budget.id));
    }
    context.resolve_budget(input)
}

fn update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["amount", "category", "period"])?;
    let Some(input) = parsed.positional.first().copied() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget update <id|category> [--amount <amount>] [--category <category>] [--period <period>]"
                .into(),
        ));
    };
    let patch = BudgetPatch {
        category: parsed.flag("category").map(parse_category).transpose()?,
        amount: parsed.flag("amount").map(parse_amount).transpose()?,
        period: parsed.flag("period").map(parse_period).transpose()?,
        spent: None,
    };
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to update; pass --amount, --category, or --period".into(),
        ));
    }
    let Some(id) = resolve(context, input)? else {
        io::print_warning(format!("No budget matches `{}`.", input));
        return Ok(());
    };
    if context.tracker.update_budget(id, patch)? {
        if let Some(budget) = context.tracker.ledger().budget(id) {
            io::print_success(format!(
                "{} budget now {} ({}); {} spent.",
                budget.category.display_name(),
                context.format_amount(budget.amount),
                budget.period,
                context.format_amount(budget.spent)
            ));
        }
    } else {
        io::print_warning(format!("No budget matches `{}`.", input));
    }
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(input) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget delete <id|category>".into(),
        ));
    };
    let Some(id) = resolve(context, input)? else {
        io::print_warning(format!("No budget matches `{}`.", input));
        return Ok(());
    };
    if let Some(budget) = context.tracker.ledger().budget(id) {
        let prompt = format!("Delete the {} budget?", budget.category.display_name());
        if !context.confirm(&prompt)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }
    match context.tracker.delete_budget(id)? {
        Some(removed) => io::print_success(format!(
            "Deleted the {} budget.",
            removed.category.display_name()
        )),
        None => io::print_warning(format!("No budget matches `{}`.", input)),
    }
    Ok(())
}

fn available(context: &mut ShellContext) -> CommandResult {
    let open = BudgetService::available_categories(context.tracker.ledger());
    if open.is_empty() {
        io::print_info("Every category already has a budget.");
        return Ok(());
    }
    io::print_info("Categories without a budget:");
    for category in open {
        io::print_info(format!("  {:<14} {}", category.key(), category.display_name()));
    }
    Ok(())
}
