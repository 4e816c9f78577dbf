use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::ExpenseCategory;

/// A single recorded expense. Immutable once created; only deletion removes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        amount: f64,
        category: ExpenseCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), amount, category, description, date)
    }

    pub fn with_id(
        id: Uuid,
        amount: f64,
        category: ExpenseCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    pub fn short_id(&self) -> String {
        short_id(self.id)
    }
}

/// Input for a transaction that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(
        amount: f64,
        category: ExpenseCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    pub fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction::with_id(id, self.amount, self.category, self.description, self.date)
    }
}

/// First eight hex digits of an identifier, used for compact listings.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
