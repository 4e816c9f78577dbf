//! Fixed registry of expense categories and their display metadata.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Classification tag applied to every transaction and budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Health,
    Education,
    Shopping,
    Other,
}

/// Display metadata attached to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub color: &'static str,
}

impl ExpenseCategory {
    /// Every category in registry order.
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Health,
        ExpenseCategory::Education,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ];

    /// Stable lowercase key used in storage and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn info(self) -> CategoryInfo {
        let (name, color) = match self {
            ExpenseCategory::Food => ("Food & Dining", "expense-food"),
            ExpenseCategory::Transport => ("Transportation", "expense-transport"),
            ExpenseCategory::Housing => ("Housing", "expense-housing"),
            ExpenseCategory::Utilities => ("Utilities", "expense-utilities"),
            ExpenseCategory::Entertainment => ("Entertainment", "expense-entertainment"),
            ExpenseCategory::Health => ("Healthcare", "expense-health"),
            ExpenseCategory::Education => ("Education", "expense-education"),
            ExpenseCategory::Shopping => ("Shopping", "expense-shopping"),
            ExpenseCategory::Other => ("Other", "expense-other"),
        };
        CategoryInfo { name, color }
    }

    pub fn display_name(self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when a string does not name any registered category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for ExpenseCategory {
    type Err = UnknownCategory;

    /// Accepts either the key (`food`) or the display name (`Food & Dining`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| {
                category.key().eq_ignore_ascii_case(needle)
                    || category.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}
