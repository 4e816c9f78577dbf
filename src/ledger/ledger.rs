use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{budget::Budget, category::ExpenseCategory, transaction::Transaction};

/// In-memory snapshot of one owner's transactions and budgets.
///
/// The raw collection helpers here do no bookkeeping beyond `updated_at`;
/// keeping `Budget::spent` aligned is the job of the reconciliation layer.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub owner: String,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            owner: owner.into(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts at the front so the newest entry comes first.
    pub fn prepend_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.insert(0, transaction);
        self.touch();
        id
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    /// Puts a previously removed transaction back at its original position.
    pub fn restore_transaction(&mut self, index: usize, transaction: Transaction) {
        let index = index.min(self.transactions.len());
        self.transactions.insert(index, transaction);
        self.touch();
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn push_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        let removed = self.budgets.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn restore_budget(&mut self, index: usize, budget: Budget) {
        let index = index.min(self.budgets.len());
        self.budgets.insert(index, budget);
        self.touch();
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn budget_position(&self, id: Uuid) -> Option<usize> {
        self.budgets.iter().position(|budget| budget.id == id)
    }

    /// First budget tracking `category`. At most one exists when budgets are
    /// created through the budget service.
    pub fn budget_for_category(&self, category: ExpenseCategory) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|budget| budget.category == category)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut ledger = Ledger::new("tester");
        let first = ledger.prepend_transaction(Transaction::new(
            10.0,
            ExpenseCategory::Food,
            "first",
            day(1),
        ));
        let second = ledger.prepend_transaction(Transaction::new(
            20.0,
            ExpenseCategory::Food,
            "second",
            day(2),
        ));
        assert_eq!(ledger.transactions[0].id, second);
        assert_eq!(ledger.transactions[1].id, first);
    }

    #[test]
    fn restore_transaction_reinserts_at_index() {
        let mut ledger = Ledger::new("tester");
        for n in 1..=3 {
            ledger.prepend_transaction(Transaction::new(
                n as f64,
                ExpenseCategory::Other,
                format!("txn {n}"),
                day(n),
            ));
        }
        let target = ledger.transactions[1].id;
        let index = ledger.transaction_position(target).unwrap();
        let removed = ledger.remove_transaction(target).unwrap();
        ledger.restore_transaction(index, removed);
        assert_eq!(ledger.transactions[1].id, target);
        assert_eq!(ledger.transaction_count(), 3);
    }
}
