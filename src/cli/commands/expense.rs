use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::reconciliation;
use crate::core::services::{TransactionQuery, TransactionService};
use crate::core::validation::{parse_amount, parse_category, parse_date};
use crate::ledger::{ExpenseCategory, NewTransaction, Transaction};

use super::{split_subcommand, ParsedArgs};

const USAGE: &str = "expense add <amount> <category> <description> [--date YYYY-MM-DD]
expense list [--search <text>] [--category <category>]
expense recent [count]
expense delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "expense",
        "Record, list, and delete expenses",
        USAGE,
        cmd_expense,
    )]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => add(context, rest),
        "list" | "ls" => list(context, rest),
        "recent" => recent(context, rest),
        "delete" | "remove" | "rm" => delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `expense {}`",
            other
        ))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.can_prompt() {
        prompt_expense(context)?
    } else {
        parse_expense(context, args)?
    };
    let recorded = context.tracker.add_transaction(draft)?;
    io::print_success(format!(
        "Recorded {} for {} on {} [{}].",
        context.format_amount(recorded.amount),
        recorded.category.display_name(),
        recorded.date,
        recorded.short_id()
    ));
    print_budget_line(context, recorded.category);
    Ok(())
}

fn parse_expense(context: &ShellContext, args: &[&str]) -> Result<NewTransaction, CommandError> {
    let parsed = ParsedArgs::parse(args, &["date"])?;
    let [amount, category, description @ ..] = parsed.positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense add <amount> <category> <description> [--date YYYY-MM-DD]".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let category = parse_category(category)?;
    let date = match parsed.flag("date") {
        Some(raw) => parse_date(raw)?,
        None => context.tracker.today(),
    };
    Ok(NewTransaction::new(
        amount,
        category,
        description.join(" "),
        date,
    ))
}

fn prompt_expense(context: &ShellContext) -> Result<NewTransaction, CommandError> {
    let amount = parse_amount(&io::prompt_text(&context.theme, "Amount")?)?;
    let names: Vec<&str> = ExpenseCategory::ALL
        .iter()
        .map(|category| category.display_name())
        .collect();
    let category = ExpenseCategory::ALL[io::select_index(&context.theme, "Category", &names)?];
    let description = io::prompt_text(&context.theme, "Description")?;
    let today = context.tracker.today().format("%Y-%m-%d").to_string();
    let date = parse_date(&io::prompt_text_with_default(
        &context.theme,
        "Date (YYYY-MM-DD)",
        &today,
    )?)?;
    Ok(NewTransaction::new(amount, category, description, date))
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["search", "category"])?;
    let mut search = parsed.flag("search").map(str::to_string);
    if search.is_none() && !parsed.positional.is_empty() {
        search = Some(parsed.positional.join(" "));
    }
    let query = TransactionQuery {
        search,
        category: parsed.flag("category").map(parse_category).transpose()?,
    };

    let rows = TransactionService::list(context.tracker.ledger(), &query);
    if rows.is_empty() {
        io::print_info("No expenses found.");
        return Ok(());
    }
    let total = rows
        .iter()
        .map(|txn| txn.amount)
        .fold(0.0, |acc, value| acc + value);
    print_grouped(context, &rows);
    io::print_info(format!(
        "{} expense(s), {} total.",
        rows.len(),
        context.format_amount(total)
    ));
    Ok(())
}

fn recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments("usage: expense recent [count]".into())
        })?,
        None => context.config.recent_limit,
    };
    let rows = TransactionService::recent(context.tracker.ledger(), limit);
    if rows.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    print_grouped(context, &rows);
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(input) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense delete <id>".into(),
        ));
    };
    let Some(id) = context.resolve_transaction(input)? else {
        io::print_warning(format!("No expense matches `{}`.", input));
        return Ok(());
    };
    if let Some(txn) = context.tracker.ledger().transaction(id) {
        let prompt = format!(
            "Delete {} ({}) from {}?",
            context.format_amount(txn.amount),
            txn.description,
            txn.date
        );
        if !context.confirm(&prompt)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }
    match context.tracker.delete_transaction(id)? {
        Some(removed) => {
            io::print_success(format!(
                "Deleted {} for {} [{}].",
                context.format_amount(removed.amount),
                removed.category.display_name(),
                removed.short_id()
            ));
            print_budget_line(context, removed.category);
        }
        None => io::print_warning(format!("No expense matches `{}`.", input)),
    }
    Ok(())
}

/// One table, rows grouped by day; the date is printed on the first row of each day.
pub(crate) fn print_grouped(context: &ShellContext, rows: &[&Transaction]) {
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("ID"),
        TableColumn::left("Category"),
        TableColumn::left("Description"),
        TableColumn::right("Amount"),
    ]);
    for (date, items) in TransactionService::group_by_date(rows) {
        for (idx, txn) in items.iter().enumerate() {
            table.push(vec![
                if idx == 0 {
                    date.to_string()
                } else {
                    String::new()
                },
                txn.short_id(),
                txn.category.display_name().to_string(),
                txn.description.clone(),
                context.format_amount(txn.amount),
            ]);
        }
    }
    table.print();
}

fn print_budget_line(context: &ShellContext, category: ExpenseCategory) {
    if let Some(budget) = context.tracker.ledger().budget_for_category(category) {
        let line = format!(
            "{} budget: {} of {} spent.",
            category.display_name(),
            context.format_amount(budget.spent),
            context.format_amount(budget.amount)
        );
        if budget.is_over_budget() {
            io::print_warning(format!("{} Over budget.", line));
        } else {
            io::print_info(line);
        }
    } else if reconciliation::category_total(context.tracker.ledger(), category) > 0.0 {
        io::print_hint(format!(
            "No budget tracks {} yet. Try `budget add {} <amount>`.",
            category.display_name(),
            category.key()
        ));
    }
}
