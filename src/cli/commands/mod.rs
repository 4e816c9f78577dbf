pub mod budget;
pub mod config;
pub mod data;
pub mod expense;
pub mod report;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in expense::definitions()
        .into_iter()
        .chain(budget::definitions())
        .chain(report::definitions())
        .chain(data::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Splits `args` into its lowercased subcommand and the remaining arguments.
pub(crate) fn split_subcommand<'a, 'b>(
    args: &'a [&'b str],
    usage: &str,
) -> Result<(String, &'a [&'b str]), CommandError> {
    match args.split_first() {
        Some((sub, rest)) => Ok((sub.to_ascii_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    }
}

/// Positional arguments plus `--flag value` pairs.
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub flags: Vec<(String, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str], known_flags: &[&str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(name) = arg.strip_prefix("--") {
                let name = name.to_ascii_lowercase();
                if !known_flags.contains(&name.as_str()) {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown option `--{}`",
                        name
                    )));
                }
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{}` needs a value", name))
                })?;
                flags.push((name, *value));
            } else {
                positional.push(*arg);
            }
        }
        Ok(Self { positional, flags })
    }

    pub fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| flag == name)
            .map(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_args_split_flags() {
        let parsed =
            ParsedArgs::parse(&["12", "food", "--date", "2026-10-01", "Lunch"], &["date"]).unwrap();
        assert_eq!(parsed.positional, vec!["12", "food", "Lunch"]);
        assert_eq!(parsed.flag("date"), Some("2026-10-01"));
        assert!(ParsedArgs::parse(&["--colour", "red"], &["date"]).is_err());
        assert!(ParsedArgs::parse(&["--date"], &["date"]).is_err());
    }
}
