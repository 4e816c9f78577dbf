//! Persistence backend contract and the bundled implementations.

pub mod database;
pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::{Budget, BudgetPatch, BudgetPeriod, ExpenseCategory, Transaction};

pub use database::{Database, CURRENT_SCHEMA_VERSION};
pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Row of the `transactions` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionRecord {
    pub fn from_transaction(owner: &str, transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            user_id: owner.to_string(),
            amount: transaction.amount,
            category: transaction.category,
            description: transaction.description.clone(),
            date: transaction.date,
        }
    }

    pub fn into_transaction(self) -> Transaction {
        Transaction::with_id(self.id, self.amount, self.category, self.description, self.date)
    }
}

/// Row of the `budgets` table. `spent` is intentionally absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetRecord {
    pub id: Uuid,
    pub user_id: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl BudgetRecord {
    pub fn from_budget(owner: &str, budget: &Budget) -> Self {
        Self {
            id: budget.id,
            user_id: owner.to_string(),
            category: budget.category,
            amount: budget.amount,
            period: budget.period,
        }
    }

    pub fn into_budget(self) -> Budget {
        Budget::with_id(self.id, self.category, self.amount, self.period)
    }

    pub fn apply_patch(&mut self, patch: &BudgetPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
    }
}

/// Remote-style data store reachable through list/insert/update/delete calls,
/// scoped by the owning user id.
///
/// Inserting a record whose id is nil asks the backend to assign one.
pub trait PersistenceBackend: Send + Sync {
    fn list_transactions(&self, owner: &str) -> Result<Vec<TransactionRecord>>;
    fn insert_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord>;
    fn delete_transaction(&self, id: Uuid) -> Result<()>;

    fn list_budgets(&self, owner: &str) -> Result<Vec<BudgetRecord>>;
    fn insert_budget(&self, record: BudgetRecord) -> Result<BudgetRecord>;
    fn update_budget(&self, id: Uuid, patch: &BudgetPatch) -> Result<()>;
    fn delete_budget(&self, id: Uuid) -> Result<()>;

    /// Short human-readable label for status output.
    fn describe(&self) -> String {
        "custom backend".into()
    }
}
