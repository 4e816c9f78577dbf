//! Ledger domain models: categories, transactions, budgets, and report types.

pub mod budget;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod summary;
pub mod transaction;

pub use budget::{Budget, BudgetPatch, BudgetPeriod};
pub use category::{CategoryInfo, ExpenseCategory, UnknownCategory};
pub use ledger::Ledger;
pub use summary::{BudgetDrift, BudgetStatus, CategorySummary, DashboardTotals, TimeSeriesPoint};
pub use transaction::{short_id, NewTransaction, Transaction};
