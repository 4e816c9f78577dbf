//! Keeps each budget's `spent` consistent with the transaction ledger.
//!
//! Normal operation is incremental: every ledger insert or removal adjusts the
//! matching budget by the signed transaction amount. A full recompute runs
//! only when budgets are created, when a ledger is loaded, and on an explicit
//! reconcile pass.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::services::BudgetService;
use crate::ledger::{BudgetDrift, BudgetPatch, ExpenseCategory, Ledger};

const DRIFT_TOLERANCE: f64 = 1e-9;

/// Adjusts the budget tracking `category` by `delta`.
///
/// Returns the adjusted budget id, or `None` when no budget tracks the
/// category.
pub fn apply_delta(ledger: &mut Ledger, category: ExpenseCategory, delta: f64) -> Option<Uuid> {
    let budget = ledger.budget_for_category(category)?;
    let (id, spent) = (budget.id, budget.spent + delta);
    BudgetService::merge(ledger, id, &BudgetPatch::spent(spent));
    debug!(%category, delta, spent, budget = %id, "budget spend adjusted");
    Some(id)
}

/// Sum of every ledger amount recorded under `category`.
pub fn category_total(ledger: &Ledger, category: ExpenseCategory) -> f64 {
    ledger
        .transactions
        .iter()
        .filter(|txn| txn.category == category)
        .map(|txn| txn.amount)
        .fold(0.0, |acc, value| acc + value)
}

/// Recomputes every budget from the ledger and reports the ones that drifted.
pub fn recompute_all(ledger: &mut Ledger) -> Vec<BudgetDrift> {
    let targets: Vec<(Uuid, ExpenseCategory, f64)> = ledger
        .budgets
        .iter()
        .map(|budget| (budget.id, budget.category, budget.spent))
        .collect();

    let mut drift = Vec::new();
    for (id, category, recorded) in targets {
        let actual = category_total(ledger, category);
        if (actual - recorded).abs() > DRIFT_TOLERANCE {
            drift.push(BudgetDrift {
                budget_id: id,
                category,
                recorded,
                actual,
            });
        }
        BudgetService::merge(ledger, id, &BudgetPatch::spent(actual));
    }

    if !drift.is_empty() {
        warn!(count = drift.len(), "budget spend drift corrected");
    }
    drift
}
