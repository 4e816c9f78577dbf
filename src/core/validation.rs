//! Input checks applied before any ledger or budget mutation.

use chrono::NaiveDate;

use crate::errors::{Result, TrackerError};
use crate::ledger::{BudgetPatch, ExpenseCategory, NewTransaction};

/// Parses a user-entered amount, rejecting blanks, non-numbers, and values <= 0.
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        return Err(TrackerError::Validation("amount is required".into()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| TrackerError::Validation(format!("`{}` is not a valid amount", input)))?;
    check_amount(value)?;
    Ok(value)
}

pub fn check_amount(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::Validation(
            "amount must be a positive number".into(),
        ));
    }
    Ok(())
}

pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn parse_category(input: &str) -> Result<ExpenseCategory> {
    require_text("category", input)?;
    Ok(input.parse::<ExpenseCategory>()?)
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        TrackerError::Validation(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub fn validate_transaction(transaction: &NewTransaction) -> Result<()> {
    check_amount(transaction.amount)?;
    require_text("description", &transaction.description)
}

pub fn validate_budget_patch(patch: &BudgetPatch) -> Result<()> {
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }
    if patch
        .spent
        .is_some_and(|spent| !spent.is_finite() || spent < 0.0)
    {
        return Err(TrackerError::Validation(
            "spent must be a finite, non-negative number".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parsing_rules() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
        assert_eq!(parse_amount(" $7 ").unwrap(), 7.0);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn transaction_requires_description() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let blank = NewTransaction::new(5.0, ExpenseCategory::Food, "  ", date);
        let err = validate_transaction(&blank).expect_err("blank description");
        assert!(err.is_validation());
    }

    #[test]
    fn budget_patch_spent_cannot_go_negative() {
        let patch = |spent: f64| BudgetPatch {
            spent: Some(spent),
            ..BudgetPatch::default()
        };
        for bad in [-0.01, -50.0, f64::NAN, f64::INFINITY] {
            let err = validate_budget_patch(&patch(bad)).expect_err("bad spent");
            assert!(err.is_validation(), "{bad} should fail validation");
        }
        assert!(validate_budget_patch(&patch(0.0)).is_ok());
        assert!(validate_budget_patch(&patch(12.5)).is_ok());
    }

    #[test]
    fn category_and_date_parsing() {
        assert_eq!(parse_category("Food").unwrap(), ExpenseCategory::Food);
        assert!(parse_category("").is_err());
        assert!(parse_category("pets").is_err());
        assert!(parse_date("2026-02-30").is_err());
        assert_eq!(
            parse_date("2026-10-16").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
    }
}
