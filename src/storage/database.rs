use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BudgetRecord, TransactionRecord};
use crate::errors::{Result, TrackerError};
use crate::ledger::{BudgetPatch, ExpenseCategory};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Table contents shared by the bundled backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default = "Database::schema_version_default")]
    pub schema_version: u32,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub budgets: Vec<BudgetRecord>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
            budgets: Vec::new(),
        }
    }
}

impl Database {
    pub fn schema_version_default() -> u32 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn ensure_supported(&self) -> Result<()> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(TrackerError::Persistence(format!(
                "store schema v{} is newer than supported v{}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    pub fn transactions_for(&self, owner: &str) -> Vec<TransactionRecord> {
        self.transactions
            .iter()
            .filter(|record| record.user_id == owner)
            .cloned()
            .collect()
    }

    pub fn budgets_for(&self, owner: &str) -> Vec<BudgetRecord> {
        self.budgets
            .iter()
            .filter(|record| record.user_id == owner)
            .cloned()
            .collect()
    }

    pub fn insert_transaction(&mut self, mut record: TransactionRecord) -> Result<TransactionRecord> {
        if record.id.is_nil() {
            record.id = Uuid::new_v4();
        } else if self.transactions.iter().any(|row| row.id == record.id) {
            return Err(duplicate("transaction", record.id));
        }
        self.transactions.push(record.clone());
        Ok(record)
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        let index = self
            .transactions
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| missing("transaction", id))?;
        self.transactions.remove(index);
        Ok(())
    }

    pub fn insert_budget(&mut self, mut record: BudgetRecord) -> Result<BudgetRecord> {
        if record.id.is_nil() {
            record.id = Uuid::new_v4();
        } else if self.budgets.iter().any(|row| row.id == record.id) {
            return Err(duplicate("budget", record.id));
        }
        self.ensure_category_free(&record.user_id, record.category, record.id)?;
        self.budgets.push(record.clone());
        Ok(record)
    }

    pub fn update_budget(&mut self, id: Uuid, patch: &BudgetPatch) -> Result<()> {
        if let Some(category) = patch.category {
            let owner = self
                .budgets
                .iter()
                .find(|row| row.id == id)
                .map(|row| row.user_id.clone())
                .ok_or_else(|| missing("budget", id))?;
            self.ensure_category_free(&owner, category, id)?;
        }
        let record = self
            .budgets
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| missing("budget", id))?;
        record.apply_patch(patch);
        Ok(())
    }

    pub fn delete_budget(&mut self, id: Uuid) -> Result<()> {
        let index = self
            .budgets
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| missing("budget", id))?;
        self.budgets.remove(index);
        Ok(())
    }

    /// One budget per owner and category; `id` is the row allowed to hold it.
    fn ensure_category_free(&self, owner: &str, category: ExpenseCategory, id: Uuid) -> Result<()> {
        let taken = self
            .budgets
            .iter()
            .any(|row| row.user_id == owner && row.category == category && row.id != id);
        if taken {
            return Err(TrackerError::Persistence(format!(
                "a budget for `{}` already exists",
                category
            )));
        }
        Ok(())
    }
}

fn missing(table: &str, id: Uuid) -> TrackerError {
    TrackerError::Persistence(format!("{} {} not found", table, id))
}

fn duplicate(table: &str, id: Uuid) -> TrackerError {
    TrackerError::Persistence(format!("{} {} already exists", table, id))
}
