//! Ledger store operations for expense transactions.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::reconciliation;
use crate::ledger::{ExpenseCategory, Ledger, NewTransaction, Transaction};

use super::{resolve_prefix, ServiceResult};

/// Filters applied when listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Case-insensitive substring matched against the description.
    pub search: Option<String>,
    pub category: Option<ExpenseCategory>,
}

impl TransactionQuery {
    pub fn matches(&self, txn: &Transaction) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => txn
                .description
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let matches_category = self.category.map_or(true, |cat| txn.category == cat);
        matches_search && matches_category
    }
}

/// Append/remove helpers for the ledger. Every mutation forwards the signed
/// amount to the reconciliation layer so budget spend stays aligned.
pub struct TransactionService;

impl TransactionService {
    /// Records a new transaction under a fresh identifier.
    pub fn add(ledger: &mut Ledger, transaction: NewTransaction) -> Transaction {
        Self::insert(ledger, transaction.into_transaction(Uuid::new_v4()))
    }

    /// Records a transaction that already carries its identifier.
    pub fn insert(ledger: &mut Ledger, transaction: Transaction) -> Transaction {
        let (category, amount) = (transaction.category, transaction.amount);
        ledger.prepend_transaction(transaction.clone());
        reconciliation::apply_delta(ledger, category, amount);
        transaction
    }

    /// Removes the transaction identified by `id`. Unknown ids are a no-op.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Option<Transaction> {
        let removed = ledger.remove_transaction(id)?;
        reconciliation::apply_delta(ledger, removed.category, -removed.amount);
        Some(removed)
    }

    /// Re-inserts a removed transaction at `index`, re-applying its amount.
    pub fn restore(ledger: &mut Ledger, index: usize, transaction: Transaction) {
        let (category, amount) = (transaction.category, transaction.amount);
        ledger.restore_transaction(index, transaction);
        reconciliation::apply_delta(ledger, category, amount);
    }

    /// Filtered view sorted by date, newest first.
    pub fn list<'a>(ledger: &'a Ledger, query: &TransactionQuery) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| query.matches(txn))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    pub fn recent(ledger: &Ledger, limit: usize) -> Vec<&Transaction> {
        let mut rows = Self::list(ledger, &TransactionQuery::default());
        rows.truncate(limit);
        rows
    }

    /// Groups consecutive rows by day, keeping the incoming order.
    pub fn group_by_date<'a>(
        rows: &[&'a Transaction],
    ) -> Vec<(NaiveDate, Vec<&'a Transaction>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Transaction>)> = Vec::new();
        for &txn in rows {
            match groups.iter_mut().find(|(date, _)| *date == txn.date) {
                Some((_, items)) => items.push(txn),
                None => groups.push((txn.date, vec![txn])),
            }
        }
        groups
    }

    pub fn resolve_id(ledger: &Ledger, input: &str) -> ServiceResult<Option<Uuid>> {
        resolve_prefix(ledger.transactions.iter().map(|txn| txn.id), input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn seeded() -> Ledger {
        let mut ledger = Ledger::new("tester");
        TransactionService::add(
            &mut ledger,
            NewTransaction::new(12.99, ExpenseCategory::Food, "Lunch at Cafe", date(9)),
        );
        TransactionService::add(
            &mut ledger,
            NewTransaction::new(35.5, ExpenseCategory::Transport, "Uber ride", date(8)),
        );
        TransactionService::add(
            &mut ledger,
            NewTransaction::new(850.0, ExpenseCategory::Housing, "Monthly rent", date(1)),
        );
        TransactionService::add(
            &mut ledger,
            NewTransaction::new(8.0, ExpenseCategory::Food, "Coffee beans", date(9)),
        );
        ledger
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut ledger = seeded();
        let before = ledger.transactions.clone();
        assert!(TransactionService::remove(&mut ledger, Uuid::new_v4()).is_none());
        assert_eq!(ledger.transactions, before);
    }

    #[test]
    fn list_filters_and_sorts_newest_first() {
        let ledger = seeded();
        let query = TransactionQuery {
            search: Some("CAFE".into()),
            category: None,
        };
        let rows = TransactionService::list(&ledger, &query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Lunch at Cafe");

        let all = TransactionService::list(&ledger, &TransactionQuery::default());
        let dates: Vec<_> = all.iter().map(|txn| txn.date).collect();
        assert_eq!(dates, vec![date(9), date(9), date(8), date(1)]);
    }

    #[test]
    fn category_filter_limits_rows() {
        let ledger = seeded();
        let query = TransactionQuery {
            search: None,
            category: Some(ExpenseCategory::Food),
        };
        let rows = TransactionService::list(&ledger, &query);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|txn| txn.category == ExpenseCategory::Food));
    }

    #[test]
    fn groups_rows_by_day() {
        let ledger = seeded();
        let rows = TransactionService::list(&ledger, &TransactionQuery::default());
        let groups = TransactionService::group_by_date(&rows);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, date(9));
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn recent_truncates() {
        let ledger = seeded();
        assert_eq!(TransactionService::recent(&ledger, 2).len(), 2);
        assert_eq!(TransactionService::recent(&ledger, 10).len(), 4);
    }
}
