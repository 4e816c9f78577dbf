pub mod budget_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use summary_service::SummaryService;
pub use transaction_service::{TransactionQuery, TransactionService};

use uuid::Uuid;

use crate::ledger::ExpenseCategory;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("a budget for `{0}` already exists")]
    DuplicateBudget(ExpenseCategory),
    #[error("{0}")]
    Invalid(String),
}

/// Resolves a full identifier or a unique leading fragment of one.
///
/// Returns `Ok(None)` when nothing matches and an error when the fragment is
/// ambiguous.
pub(crate) fn resolve_prefix<I>(ids: I, input: &str) -> ServiceResult<Option<Uuid>>
where
    I: IntoIterator<Item = Uuid>,
{
    let needle: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    if needle.is_empty() {
        return Err(ServiceError::Invalid("identifier must not be empty".into()));
    }
    let mut matches = ids
        .into_iter()
        .filter(|id| id.simple().to_string().starts_with(&needle));
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(ServiceError::Invalid(format!(
            "identifier `{}` is ambiguous; type more characters",
            input.trim()
        )));
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_unique_prefix() {
        let a = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000001").unwrap();
        let b = Uuid::parse_str("a1ffffff-0000-4000-8000-000000000002").unwrap();
        assert_eq!(resolve_prefix([a, b], "a1b2").unwrap(), Some(a));
        assert_eq!(resolve_prefix([a, b], &b.to_string()).unwrap(), Some(b));
        assert_eq!(resolve_prefix([a, b], "ff").unwrap(), None);
        assert!(resolve_prefix([a, b], "a1").is_err());
    }
}
