//! Budget store operations and budget progress reporting.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::core::reconciliation;
use crate::ledger::{Budget, BudgetPatch, BudgetPeriod, BudgetStatus, ExpenseCategory, Ledger};

use super::{resolve_prefix, ServiceError, ServiceResult};

/// Create/update/remove helpers for budgets. Enforces one budget per category.
pub struct BudgetService;

impl BudgetService {
    /// Creates a budget whose `spent` starts at the category's current ledger total.
    pub fn add(
        ledger: &mut Ledger,
        category: ExpenseCategory,
        amount: f64,
        period: BudgetPeriod,
    ) -> ServiceResult<Budget> {
        Self::insert(ledger, Budget::new(category, amount, period))
    }

    /// Inserts a budget that already carries its identifier.
    pub fn insert(ledger: &mut Ledger, mut budget: Budget) -> ServiceResult<Budget> {
        Self::ensure_category_free(ledger, budget.category, None)?;
        budget.spent = reconciliation::category_total(ledger, budget.category);
        ledger.push_budget(budget.clone());
        Ok(budget)
    }

    /// Merges `patch` into the budget identified by `id`.
    ///
    /// Returns `Ok(false)` when the id is unknown. Moving a budget to another
    /// category re-derives its spend unless the patch sets `spent` itself.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: &BudgetPatch) -> ServiceResult<bool> {
        let Some(current) = ledger.budget(id) else {
            return Ok(false);
        };
        let mut patch = patch.clone();
        if let Some(category) = patch.category.filter(|cat| *cat != current.category) {
            Self::ensure_category_free(ledger, category, Some(id))?;
            if patch.spent.is_none() {
                patch.spent = Some(reconciliation::category_total(ledger, category));
            }
        }
        Ok(Self::merge(ledger, id, &patch))
    }

    /// Applies a patch without any checks. Used by reconciliation for spend
    /// adjustments and by rollbacks.
    pub(crate) fn merge(ledger: &mut Ledger, id: Uuid, patch: &BudgetPatch) -> bool {
        match ledger.budget_mut(id) {
            Some(budget) => {
                patch.apply(budget);
                ledger.touch();
                true
            }
            None => false,
        }
    }

    /// Removes the budget identified by `id`. Unknown ids are a no-op.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Option<Budget> {
        ledger.remove_budget(id)
    }

    /// Categories that do not have a budget yet, in registry order.
    pub fn available_categories(ledger: &Ledger) -> Vec<ExpenseCategory> {
        ExpenseCategory::ALL
            .into_iter()
            .filter(|category| ledger.budget_for_category(*category).is_none())
            .collect()
    }

    /// Progress for every budget, most consumed first.
    pub fn statuses(ledger: &Ledger) -> Vec<BudgetStatus> {
        let mut budgets: Vec<&Budget> = ledger.budgets.iter().collect();
        budgets.sort_by(|a, b| {
            b.spend_ratio()
                .partial_cmp(&a.spend_ratio())
                .unwrap_or(Ordering::Equal)
        });
        budgets.into_iter().map(BudgetStatus::from_budget).collect()
    }

    pub fn resolve_id(ledger: &Ledger, input: &str) -> ServiceResult<Option<Uuid>> {
        resolve_prefix(ledger.budgets.iter().map(|budget| budget.id), input)
    }

    pub(crate) fn ensure_category_free(
        ledger: &Ledger,
        category: ExpenseCategory,
        except: Option<Uuid>,
    ) -> ServiceResult<()> {
        match ledger.budget_for_category(category) {
            Some(existing) if Some(existing.id) != except => {
                Err(ServiceError::DuplicateBudget(category))
            }
            _ => Ok(()),
        }
    }
}
