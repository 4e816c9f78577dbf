//! Transient report types computed from a [`Ledger`](super::Ledger) snapshot.

use serde::Serialize;
use uuid::Uuid;

use super::{budget::Budget, category::ExpenseCategory};

/// Spending for one category and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub percentage: f64,
}

/// Daily spending total; `date` is rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub amount: f64,
}

/// Progress of a single budget against its limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    /// Whole percent of the limit used, capped at 100.
    pub percentage_used: u32,
    pub remaining: f64,
    pub over_budget: bool,
}

impl BudgetStatus {
    pub fn from_budget(budget: &Budget) -> Self {
        let percentage_used = if budget.amount > 0.0 {
            (budget.spent / budget.amount * 100.0).round().clamp(0.0, 100.0) as u32
        } else {
            0
        };
        Self {
            budget: budget.clone(),
            percentage_used,
            remaining: (budget.amount - budget.spent).max(0.0),
            over_budget: budget.is_over_budget(),
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardTotals {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub savings_rate: f64,
}

impl DashboardTotals {
    pub fn new(total_budget: f64, total_spent: f64) -> Self {
        let remaining = total_budget - total_spent;
        let savings_rate = if total_budget > 0.0 {
            remaining / total_budget * 100.0
        } else {
            0.0
        };
        Self {
            total_budget,
            total_spent,
            remaining,
            savings_rate,
        }
    }
}

/// A budget whose stored `spent` disagreed with the ledger during a recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetDrift {
    pub budget_id: Uuid,
    pub category: ExpenseCategory,
    pub recorded: f64,
    pub actual: f64,
}

impl BudgetDrift {
    pub fn delta(&self) -> f64 {
        self.actual - self.recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BudgetPeriod;

    #[test]
    fn status_caps_percentage_and_floors_remaining() {
        let mut budget = Budget::new(ExpenseCategory::Housing, 1000.0, BudgetPeriod::Monthly);
        budget.spent = 1250.0;
        let status = BudgetStatus::from_budget(&budget);
        assert_eq!(status.percentage_used, 100);
        assert_eq!(status.remaining, 0.0);
        assert!(status.over_budget);
    }

    #[test]
    fn status_rounds_percentage() {
        let mut budget = Budget::new(ExpenseCategory::Food, 400.0, BudgetPeriod::Monthly);
        budget.spent = 245.25;
        let status = BudgetStatus::from_budget(&budget);
        assert_eq!(status.percentage_used, 61);
        assert!((status.remaining - 154.75).abs() < 1e-9);
        assert!(!status.over_budget);
    }

    #[test]
    fn savings_rate_is_zero_without_budget() {
        let totals = DashboardTotals::new(0.0, 42.0);
        assert_eq!(totals.savings_rate, 0.0);
        assert_eq!(totals.remaining, -42.0);
    }
}
