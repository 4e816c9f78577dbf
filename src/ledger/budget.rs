use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::ExpenseCategory;

/// A spending limit for one category.
///
/// `spent` is derived from the ledger and is never serialized; it is rebuilt
/// by reconciliation whenever budgets are loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category: ExpenseCategory,
    pub amount: f64,
    #[serde(skip)]
    pub spent: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(category: ExpenseCategory, amount: f64, period: BudgetPeriod) -> Self {
        Self::with_id(Uuid::new_v4(), category, amount, period)
    }

    pub fn with_id(id: Uuid, category: ExpenseCategory, amount: f64, period: BudgetPeriod) -> Self {
        Self {
            id,
            category,
            amount,
            spent: 0.0,
            period,
        }
    }

    /// Fraction of the limit consumed, `0.0` for a zero limit.
    pub fn spend_ratio(&self) -> f64 {
        if self.amount > 0.0 {
            self.spent / self.amount
        } else {
            0.0
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }
}

/// Advisory cadence label. It does not bound the `spent` computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Weekly => "weekly",
        };
        f.write_str(key)
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            other => Err(format!("unknown budget period `{}` (use monthly or weekly)", other)),
        }
    }
}

/// Partial update merged into an existing budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    #[serde(skip)]
    pub spent: Option<f64>,
}

impl BudgetPatch {
    pub fn spent(spent: f64) -> Self {
        Self {
            spent: Some(spent),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.period.is_none()
            && self.spent.is_none()
    }

    /// True when the patch touches fields that live in the persistence layer.
    pub fn has_persisted_fields(&self) -> bool {
        self.category.is_some() || self.amount.is_some() || self.period.is_some()
    }

    pub fn apply(&self, budget: &mut Budget) {
        if let Some(category) = self.category {
            budget.category = category;
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(period) = self.period {
            budget.period = period;
        }
        if let Some(spent) = self.spent {
            budget.spent = spent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_given_fields() {
        let mut budget = Budget::new(ExpenseCategory::Food, 200.0, BudgetPeriod::Monthly);
        let patch = BudgetPatch {
            amount: Some(250.0),
            ..BudgetPatch::default()
        };
        patch.apply(&mut budget);
        assert_eq!(budget.amount, 250.0);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.category, ExpenseCategory::Food);
    }

    #[test]
    fn spent_is_not_serialized() {
        let mut budget = Budget::new(ExpenseCategory::Food, 200.0, BudgetPeriod::Weekly);
        budget.spent = 75.0;
        let json = serde_json::to_string(&budget).unwrap();
        assert!(!json.contains("spent"));
        assert!(json.contains("\"weekly\""));
    }

    #[test]
    fn parses_period_labels() {
        assert_eq!("Weekly".parse::<BudgetPeriod>(), Ok(BudgetPeriod::Weekly));
        assert!("yearly".parse::<BudgetPeriod>().is_err());
    }
}
