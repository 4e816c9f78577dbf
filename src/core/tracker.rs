//! Owned application state: the loaded ledger plus the backend it mirrors.

use std::{fmt, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::reconciliation;
use crate::core::services::{BudgetService, SummaryService, TransactionService};
use crate::core::time::Clock;
use crate::core::validation;
use crate::errors::Result;
use crate::ledger::{
    Budget, BudgetDrift, BudgetPatch, BudgetPeriod, BudgetStatus, CategorySummary,
    DashboardTotals, ExpenseCategory, Ledger, NewTransaction, TimeSeriesPoint, Transaction,
};
use crate::storage::{BudgetRecord, PersistenceBackend, TransactionRecord};

/// Ordering between the backend call and the local mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    /// Backend first; local state changes only after the call succeeds.
    #[default]
    WriteThrough,
    /// Local first; a failed backend call is compensated by undoing the local change.
    Optimistic,
}

impl SyncPolicy {
    pub fn label(self) -> &'static str {
        match self {
            SyncPolicy::WriteThrough => "write-through",
            SyncPolicy::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SyncPolicy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "write-through" | "writethrough" | "sync" => Ok(SyncPolicy::WriteThrough),
            "optimistic" => Ok(SyncPolicy::Optimistic),
            other => Err(format!(
                "unknown sync policy `{}` (use write-through or optimistic)",
                other
            )),
        }
    }
}

/// Single write surface over one owner's transactions and budgets.
pub struct FinanceTracker {
    ledger: Ledger,
    backend: Arc<dyn PersistenceBackend>,
    policy: SyncPolicy,
    clock: Arc<dyn Clock>,
}

impl FinanceTracker {
    /// Loads every record owned by `owner` and derives budget spend from it.
    pub fn open(
        backend: Arc<dyn PersistenceBackend>,
        owner: impl Into<String>,
        policy: SyncPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let ledger = load_ledger(backend.as_ref(), owner.into())?;
        info!(
            owner = %ledger.owner,
            transactions = ledger.transactions.len(),
            budgets = ledger.budgets.len(),
            backend = %backend.describe(),
            "tracker opened"
        );
        Ok(Self {
            ledger,
            backend,
            policy,
            clock,
        })
    }

    /// Replaces in-memory state with a fresh read of the backend.
    pub fn reload(&mut self) -> Result<()> {
        self.ledger = load_ledger(self.backend.as_ref(), self.ledger.owner.clone())?;
        info!(owner = %self.ledger.owner, "tracker reloaded");
        Ok(())
    }

    pub fn owner(&self) -> &str {
        &self.ledger.owner
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SyncPolicy) {
        self.policy = policy;
    }

    pub fn backend(&self) -> &dyn PersistenceBackend {
        self.backend.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn add_transaction(&mut self, transaction: NewTransaction) -> Result<Transaction> {
        validation::validate_transaction(&transaction)?;
        let owner = self.ledger.owner.clone();
        let recorded = match self.policy {
            SyncPolicy::WriteThrough => {
                let draft = transaction.into_transaction(Uuid::nil());
                let saved = self
                    .backend
                    .insert_transaction(TransactionRecord::from_transaction(&owner, &draft))?;
                TransactionService::insert(&mut self.ledger, saved.into_transaction())
            }
            SyncPolicy::Optimistic => {
                let local = TransactionService::add(&mut self.ledger, transaction);
                let record = TransactionRecord::from_transaction(&owner, &local);
                if let Err(err) = self.backend.insert_transaction(record) {
                    TransactionService::remove(&mut self.ledger, local.id);
                    warn!(id = %local.id, error = %err, "transaction insert rolled back");
                    return Err(err);
                }
                local
            }
        };
        info!(
            id = %recorded.id,
            category = %recorded.category,
            amount = recorded.amount,
            "transaction recorded"
        );
        Ok(recorded)
    }

    /// Removes a transaction. Unknown ids return `Ok(None)` without touching the backend.
    pub fn delete_transaction(&mut self, id: Uuid) -> Result<Option<Transaction>> {
        let Some(position) = self.ledger.transaction_position(id) else {
            return Ok(None);
        };
        let removed = match self.policy {
            SyncPolicy::WriteThrough => {
                self.backend.delete_transaction(id)?;
                TransactionService::remove(&mut self.ledger, id)
            }
            SyncPolicy::Optimistic => {
                let removed = TransactionService::remove(&mut self.ledger, id);
                if let Err(err) = self.backend.delete_transaction(id) {
                    if let Some(txn) = removed {
                        TransactionService::restore(&mut self.ledger, position, txn);
                    }
                    warn!(%id, error = %err, "transaction delete rolled back");
                    return Err(err);
                }
                removed
            }
        };
        info!(%id, "transaction deleted");
        Ok(removed)
    }

    pub fn add_budget(
        &mut self,
        category: ExpenseCategory,
        amount: f64,
        period: BudgetPeriod,
    ) -> Result<Budget> {
        validation::check_amount(amount)?;
        BudgetService::ensure_category_free(&self.ledger, category, None)?;
        let owner = self.ledger.owner.clone();
        let budget = match self.policy {
            SyncPolicy::WriteThrough => {
                let draft = Budget::with_id(Uuid::nil(), category, amount, period);
                let saved = self
                    .backend
                    .insert_budget(BudgetRecord::from_budget(&owner, &draft))?;
                BudgetService::insert(&mut self.ledger, saved.into_budget())?
            }
            SyncPolicy::Optimistic => {
                let local = BudgetService::add(&mut self.ledger, category, amount, period)?;
                if let Err(err) = self
                    .backend
                    .insert_budget(BudgetRecord::from_budget(&owner, &local))
                {
                    BudgetService::remove(&mut self.ledger, local.id);
                    warn!(id = %local.id, error = %err, "budget insert rolled back");
                    return Err(err);
                }
                local
            }
        };
        info!(id = %budget.id, %category, amount, spent = budget.spent, "budget created");
        Ok(budget)
    }

    /// Merges `patch` into a budget. Unknown ids return `Ok(false)`.
    pub fn update_budget(&mut self, id: Uuid, patch: BudgetPatch) -> Result<bool> {
        validation::validate_budget_patch(&patch)?;
        let Some(previous) = self.ledger.budget(id).cloned() else {
            return Ok(false);
        };
        if let Some(category) = patch.category {
            BudgetService::ensure_category_free(&self.ledger, category, Some(id))?;
        }
        let remote = patch.has_persisted_fields();
        match self.policy {
            SyncPolicy::WriteThrough => {
                if remote {
                    self.backend.update_budget(id, &patch)?;
                }
                BudgetService::update(&mut self.ledger, id, &patch)?;
            }
            SyncPolicy::Optimistic => {
                BudgetService::update(&mut self.ledger, id, &patch)?;
                if remote {
                    if let Err(err) = self.backend.update_budget(id, &patch) {
                        BudgetService::merge(&mut self.ledger, id, &snapshot_patch(&previous));
                        warn!(%id, error = %err, "budget update rolled back");
                        return Err(err);
                    }
                }
            }
        }
        info!(%id, "budget updated");
        Ok(true)
    }

    /// Removes a budget. Unknown ids return `Ok(None)` without touching the backend.
    pub fn delete_budget(&mut self, id: Uuid) -> Result<Option<Budget>> {
        let Some(position) = self.ledger.budget_position(id) else {
            return Ok(None);
        };
        let removed = match self.policy {
            SyncPolicy::WriteThrough => {
                self.backend.delete_budget(id)?;
                BudgetService::remove(&mut self.ledger, id)
            }
            SyncPolicy::Optimistic => {
                let removed = BudgetService::remove(&mut self.ledger, id);
                if let Err(err) = self.backend.delete_budget(id) {
                    if let Some(budget) = removed {
                        self.ledger.restore_budget(position, budget);
                    }
                    warn!(%id, error = %err, "budget delete rolled back");
                    return Err(err);
                }
                removed
            }
        };
        info!(%id, "budget deleted");
        Ok(removed)
    }

    /// Recomputes every budget's spend from the ledger, returning what drifted.
    pub fn reconcile(&mut self) -> Vec<BudgetDrift> {
        reconciliation::recompute_all(&mut self.ledger)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    pub fn total_spent(&self) -> f64 {
        SummaryService::total_spent(&self.ledger)
    }

    pub fn total_budget(&self) -> f64 {
        SummaryService::total_budget(&self.ledger)
    }

    pub fn category_spending(&self) -> Vec<CategorySummary> {
        SummaryService::category_spending(&self.ledger)
    }

    /// Seven daily totals ending on the clock's current date.
    pub fn spending_over_time(&self) -> Vec<TimeSeriesPoint> {
        SummaryService::spending_over_time(&self.ledger, self.clock.today())
    }

    pub fn dashboard(&self) -> DashboardTotals {
        SummaryService::dashboard(&self.ledger)
    }

    pub fn budget_statuses(&self) -> Vec<BudgetStatus> {
        BudgetService::statuses(&self.ledger)
    }
}

impl fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("owner", &self.ledger.owner)
            .field("transactions", &self.ledger.transactions.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("policy", &self.policy)
            .finish()
    }
}

fn load_ledger(backend: &dyn PersistenceBackend, owner: String) -> Result<Ledger> {
    let mut transactions: Vec<Transaction> = backend
        .list_transactions(&owner)?
        .into_iter()
        .map(TransactionRecord::into_transaction)
        .collect();
    // Later inserts come first among equal dates, matching prepend order.
    transactions.reverse();
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    let budgets = backend.list_budgets(&owner)?;
    let mut ledger = Ledger::new(owner);
    ledger.transactions = transactions;
    for record in budgets {
        if let Some(kept) = ledger.budget_for_category(record.category) {
            warn!(
                skipped = %record.id,
                kept = %kept.id,
                category = %record.category,
                "duplicate budget for category ignored"
            );
            continue;
        }
        let mut budget = record.into_budget();
        budget.spent = reconciliation::category_total(&ledger, budget.category);
        ledger.push_budget(budget);
    }
    Ok(ledger)
}

/// Patch that puts every field of `budget` back, spend included.
fn snapshot_patch(budget: &Budget) -> BudgetPatch {
    BudgetPatch {
        category: Some(budget.category),
        amount: Some(budget.amount),
        period: Some(budget.period),
        spent: Some(budget.spent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::storage::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn tracker(store: Arc<MemoryStore>, policy: SyncPolicy) -> FinanceTracker {
        FinanceTracker::open(store, "me", policy, Arc::new(FixedClock::on(today())))
            .expect("open tracker")
    }

    fn lunch(amount: f64) -> NewTransaction {
        NewTransaction::new(amount, ExpenseCategory::Food, "Lunch", today())
    }

    #[test]
    fn sync_policy_parses_labels() {
        assert_eq!("write-through".parse::<SyncPolicy>(), Ok(SyncPolicy::WriteThrough));
        assert_eq!("Optimistic".parse::<SyncPolicy>(), Ok(SyncPolicy::Optimistic));
        assert!("eventually".parse::<SyncPolicy>().is_err());
        assert_eq!(SyncPolicy::default(), SyncPolicy::WriteThrough);
    }

    #[test]
    fn write_through_uses_backend_assigned_ids() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store.clone(), SyncPolicy::WriteThrough);
        let txn = tracker.add_transaction(lunch(12.0)).unwrap();
        let stored = store.snapshot().unwrap();
        assert_eq!(stored.transactions.len(), 1);
        assert_eq!(stored.transactions[0].id, txn.id);
        assert_eq!(tracker.transactions()[0].id, txn.id);
    }

    #[test]
    fn invalid_input_never_reaches_backend() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store.clone(), SyncPolicy::WriteThrough);
        let err = tracker.add_transaction(lunch(0.0)).unwrap_err();
        assert!(err.is_validation());
        assert!(tracker.add_budget(ExpenseCategory::Food, -5.0, BudgetPeriod::Monthly).is_err());
        let stored = store.snapshot().unwrap();
        assert!(stored.transactions.is_empty());
        assert!(stored.budgets.is_empty());
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store.clone(), SyncPolicy::WriteThrough);
        store.set_offline(true);
        assert_eq!(tracker.delete_transaction(Uuid::new_v4()).unwrap(), None);
        assert_eq!(tracker.delete_budget(Uuid::new_v4()).unwrap(), None);
        assert!(!tracker
            .update_budget(Uuid::new_v4(), BudgetPatch::default())
            .unwrap());
    }

    #[test]
    fn optimistic_budget_update_rolls_back() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store.clone(), SyncPolicy::Optimistic);
        tracker.add_transaction(lunch(40.0)).unwrap();
        let budget = tracker
            .add_budget(ExpenseCategory::Food, 100.0, BudgetPeriod::Monthly)
            .unwrap();

        store.set_offline(true);
        let patch = BudgetPatch {
            category: Some(ExpenseCategory::Health),
            amount: Some(300.0),
            ..BudgetPatch::default()
        };
        assert!(tracker.update_budget(budget.id, patch).is_err());
        let current = &tracker.budgets()[0];
        assert_eq!(current.category, ExpenseCategory::Food);
        assert_eq!(current.amount, 100.0);
        assert_eq!(current.spent, 40.0);
    }

    #[test]
    fn spend_only_patch_stays_local() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store.clone(), SyncPolicy::WriteThrough);
        let budget = tracker
            .add_budget(ExpenseCategory::Food, 100.0, BudgetPeriod::Monthly)
            .unwrap();
        store.set_offline(true);
        assert!(tracker.update_budget(budget.id, BudgetPatch::spent(7.0)).unwrap());
        assert_eq!(tracker.budgets()[0].spent, 7.0);
        assert_eq!(tracker.reconcile().len(), 1);
        assert_eq!(tracker.budgets()[0].spent, 0.0);
    }

    #[test]
    fn trend_uses_clock_date() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker(store, SyncPolicy::WriteThrough);
        tracker.add_transaction(lunch(9.0)).unwrap();
        let points = tracker.spending_over_time();
        assert_eq!(points.last().unwrap().date, "2026-10-16");
        assert_eq!(points.last().unwrap().amount, 9.0);
    }
}
