use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

const USAGE: &str = "config [show]
config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            let [_, key, value @ ..] = args else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            };
            if value.is_empty() {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set {} <value>",
                    key
                )));
            }
            set(context, key, &value.join(" "))
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `config {}`",
            other
        ))),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    output_section("Preferences");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<17}: {}", key, value));
    }
    io::print_info(format!(
        "  {:<17}: {}",
        "config_file",
        context.config_manager.path().display()
    ));
    io::print_info(format!("  {:<17}: {}", "backend", context.tracker.backend().describe()));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let previous = context.config.clone();
    context.config.set(key, value)?;
    if context.config == previous {
        io::print_info("Nothing changed.");
        return Ok(());
    }

    // The live tracker switches first; the file is only written once it has.
    let needs_reopen = context.config.owner != previous.owner
        || context.config.backup_retention != previous.backup_retention;
    if needs_reopen {
        if let Err(err) = context.reopen() {
            context.config = previous;
            return Err(err);
        }
    } else {
        context.tracker.set_policy(context.config.sync_policy);
    }
    if let Err(err) = context.persist_config() {
        context.config = previous;
        if needs_reopen {
            context.reopen()?;
        } else {
            context.tracker.set_policy(context.config.sync_policy);
        }
        return Err(err);
    }

    io::print_success(format!("Updated {}.", key.to_ascii_lowercase()));
    if context.config.owner != previous.owner {
        io::print_info(format!(
            "Now tracking {} expense(s) and {} budget(s) for `{}`.",
            context.tracker.transactions().len(),
            context.tracker.budgets().len(),
            context.config.owner
        ));
    }
    Ok(())
}
