//! Aggregates over a ledger snapshot. Nothing here is cached; every call
//! walks the current collections.

use chrono::{Duration, NaiveDate};

use crate::ledger::{CategorySummary, DashboardTotals, ExpenseCategory, Ledger, TimeSeriesPoint};

/// Number of trailing days covered by [`SummaryService::spending_over_time`].
pub const TREND_DAYS: i64 = 7;

pub struct SummaryService;

impl SummaryService {
    pub fn total_spent(ledger: &Ledger) -> f64 {
        ledger
            .transactions
            .iter()
            .map(|txn| txn.amount)
            .fold(0.0, |acc, value| acc + value)
    }

    pub fn total_budget(ledger: &Ledger) -> f64 {
        ledger
            .budgets
            .iter()
            .map(|budget| budget.amount)
            .fold(0.0, |acc, value| acc + value)
    }

    /// Spending per category, in order of first appearance in the ledger.
    /// Categories without transactions are omitted.
    pub fn category_spending(ledger: &Ledger) -> Vec<CategorySummary> {
        let total = Self::total_spent(ledger);
        let mut grouped: Vec<(ExpenseCategory, f64)> = Vec::new();
        for txn in &ledger.transactions {
            match grouped.iter_mut().find(|(category, _)| *category == txn.category) {
                Some((_, amount)) => *amount += txn.amount,
                None => grouped.push((txn.category, txn.amount)),
            }
        }
        grouped
            .into_iter()
            .map(|(category, amount)| CategorySummary {
                category,
                amount,
                percentage: if total != 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Daily totals for `today - 6 ..= today`, oldest first.
    pub fn spending_over_time(ledger: &Ledger, today: NaiveDate) -> Vec<TimeSeriesPoint> {
        (0..TREND_DAYS)
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                let amount = ledger
                    .transactions
                    .iter()
                    .filter(|txn| txn.date == day)
                    .map(|txn| txn.amount)
                    .fold(0.0, |acc, value| acc + value);
                TimeSeriesPoint {
                    date: day.format("%Y-%m-%d").to_string(),
                    amount,
                }
            })
            .collect()
    }

    pub fn dashboard(ledger: &Ledger) -> DashboardTotals {
        DashboardTotals::new(Self::total_budget(ledger), Self::total_spent(ledger))
    }
}
