use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reconcile",
            "Recompute budget spending from the recorded expenses",
            "reconcile",
            cmd_reconcile,
        ),
        CommandEntry::new(
            "reload",
            "Reload expenses and budgets from the store",
            "reload",
            cmd_reload,
        ),
        CommandEntry::new(
            "backup",
            "Snapshot the data file",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "backups",
            "List data file snapshots, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace the data file with a snapshot",
            "restore <name>",
            cmd_restore,
        ),
    ]
}

fn cmd_reconcile(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let drift = context.tracker.reconcile();
    if drift.is_empty() {
        io::print_success("Budgets are in sync with recorded expenses.");
        return Ok(());
    }
    for item in &drift {
        io::print_warning(format!(
            "{} budget corrected: {} -> {}",
            item.category.display_name(),
            context.format_amount(item.recorded),
            context.format_amount(item.actual)
        ));
    }
    io::print_info(format!("{} budget(s) corrected.", drift.len()));
    Ok(())
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.tracker.reload()?;
    io::print_success(format!(
        "Loaded {} expense(s) and {} budget(s).",
        context.tracker.transactions().len(),
        context.tracker.budgets().len()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };
    let name = context.store.backup(note.as_deref())?;
    io::print_success(format!("Backup written: {}", name));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.store.list_backups()?;
    if names.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    for (idx, name) in names.iter().enumerate() {
        io::print_info(format!("  {:>2}. {}", idx + 1, name));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args.first() {
        Some(raw) => resolve_backup(context, raw)?,
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: restore <name|number>".into(),
            ))
        }
    };
    if !context.confirm(&format!("Replace the current data with {}?", name))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.store.restore_backup(&name)?;
    context.tracker.reload()?;
    io::print_success(format!(
        "Restored {}: {} expense(s), {} budget(s).",
        name,
        context.tracker.transactions().len(),
        context.tracker.budgets().len()
    ));
    Ok(())
}

/// Accepts a backup file name or its 1-based position in `backups`.
fn resolve_backup(context: &ShellContext, raw: &str) -> Result<String, CommandError> {
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => {
            let names = context.store.list_backups()?;
            names.into_iter().nth(position - 1).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no backup at position {}", position))
            })
        }
        _ => Ok(raw.to_string()),
    }
}
