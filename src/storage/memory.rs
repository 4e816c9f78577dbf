use std::sync::{
    atomic::{AtomicBool, Ordering},
    RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use uuid::Uuid;

use crate::errors::{Result, TrackerError};
use crate::ledger::BudgetPatch;

use super::{BudgetRecord, Database, PersistenceBackend, TransactionRecord};

/// In-process tables for tests and throwaway sessions.
///
/// `set_offline(true)` makes every call fail with a persistence error, which
/// is how the sync policies are exercised without a real remote.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Database>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(transactions: Vec<TransactionRecord>, budgets: Vec<BudgetRecord>) -> Self {
        Self {
            tables: RwLock::new(Database {
                transactions,
                budgets,
                ..Database::default()
            }),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Copy of the raw tables, for assertions.
    pub fn snapshot(&self) -> Result<Database> {
        Ok(self.read()?.clone())
    }

    fn check_online(&self) -> Result<()> {
        if self.is_offline() {
            return Err(TrackerError::Persistence("memory store is offline".into()));
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Database>> {
        self.tables
            .read()
            .map_err(|_| TrackerError::Persistence("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Database>> {
        self.check_online()?;
        self.tables
            .write()
            .map_err(|_| TrackerError::Persistence("memory store lock poisoned".into()))
    }
}

impl PersistenceBackend for MemoryStore {
    fn list_transactions(&self, owner: &str) -> Result<Vec<TransactionRecord>> {
        self.check_online()?;
        Ok(self.read()?.transactions_for(owner))
    }

    fn insert_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.write()?.insert_transaction(record)
    }

    fn delete_transaction(&self, id: Uuid) -> Result<()> {
        self.write()?.delete_transaction(id)
    }

    fn list_budgets(&self, owner: &str) -> Result<Vec<BudgetRecord>> {
        self.check_online()?;
        Ok(self.read()?.budgets_for(owner))
    }

    fn insert_budget(&self, record: BudgetRecord) -> Result<BudgetRecord> {
        self.write()?.insert_budget(record)
    }

    fn update_budget(&self, id: Uuid, patch: &BudgetPatch) -> Result<()> {
        self.write()?.update_budget(id, patch)
    }

    fn delete_budget(&self, id: Uuid) -> Result<()> {
        self.write()?.delete_budget(id)
    }

    fn describe(&self) -> String {
        "in-memory store".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BudgetPeriod, ExpenseCategory};

    fn budget(owner: &str, category: ExpenseCategory) -> BudgetRecord {
        BudgetRecord {
            id: Uuid::nil(),
            user_id: owner.into(),
            category,
            amount: 100.0,
            period: BudgetPeriod::Weekly,
        }
    }

    #[test]
    fn lists_are_scoped_by_owner() {
        let store = MemoryStore::new();
        store.insert_budget(budget("a", ExpenseCategory::Food)).unwrap();
        store.insert_budget(budget("b", ExpenseCategory::Health)).unwrap();
        let rows = store.list_budgets("a").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, ExpenseCategory::Food);
    }

    #[test]
    fn offline_store_rejects_calls() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store
            .insert_budget(budget("a", ExpenseCategory::Food))
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(store.list_transactions("a").is_err());

        store.set_offline(false);
        assert!(store.insert_budget(budget("a", ExpenseCategory::Food)).is_ok());
        assert_eq!(store.snapshot().unwrap().budgets.len(), 1);
    }

    #[test]
    fn duplicate_explicit_id_is_rejected() {
        let store = MemoryStore::new();
        let mut record = budget("a", ExpenseCategory::Food);
        record.id = Uuid::new_v4();
        store.insert_budget(record.clone()).unwrap();
        assert!(store.insert_budget(record).is_err());
    }

    #[test]
    fn one_budget_per_owner_and_category() {
        let store = MemoryStore::new();
        store.insert_budget(budget("a", ExpenseCategory::Food)).unwrap();
        let err = store
            .insert_budget(budget("a", ExpenseCategory::Food))
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(store.insert_budget(budget("b", ExpenseCategory::Food)).is_ok());

        let health = store
            .insert_budget(budget("a", ExpenseCategory::Health))
            .unwrap();
        let onto_food = BudgetPatch {
            category: Some(ExpenseCategory::Food),
            ..BudgetPatch::default()
        };
        assert!(store.update_budget(health.id, &onto_food).is_err());
        let amount_only = BudgetPatch {
            amount: Some(10.0),
            ..BudgetPatch::default()
        };
        assert!(store.update_budget(health.id, &amount_only).is_ok());
        assert_eq!(store.list_budgets("a").unwrap().len(), 2);
    }
}
