mod common;

use common::{days_ago, memory_tracker, today};
use expense_tracker::{
    core::SyncPolicy,
    ledger::{BudgetPatch, BudgetPeriod, ExpenseCategory, NewTransaction},
};
use uuid::Uuid;

fn expense(amount: f64, category: ExpenseCategory, description: &str) -> NewTransaction {
    NewTransaction::new(amount, category, description, today())
}

#[test]
fn budget_spend_follows_the_ledger() {
    for policy in [SyncPolicy::WriteThrough, SyncPolicy::Optimistic] {
        let (mut tracker, _store) = memory_tracker(policy);

        let groceries = tracker
            .add_transaction(expense(50.0, ExpenseCategory::Food, "Groceries"))
            .unwrap();
        let budget = tracker
            .add_budget(ExpenseCategory::Food, 200.0, BudgetPeriod::Monthly)
            .unwrap();
        assert_eq!(budget.spent, 50.0, "new budget picks up existing spend");

        tracker
            .add_transaction(expense(30.0, ExpenseCategory::Food, "Dinner"))
            .unwrap();
        assert_eq!(tracker.ledger().budget(budget.id).unwrap().spent, 80.0);

        tracker
            .add_transaction(expense(12.0, ExpenseCategory::Transport, "Bus"))
            .unwrap();
        assert_eq!(
            tracker.ledger().budget(budget.id).unwrap().spent,
            80.0,
            "other categories leave the budget alone"
        );

        let removed = tracker.delete_transaction(groceries.id).unwrap();
        assert_eq!(removed.map(|txn| txn.amount), Some(50.0));
        assert_eq!(tracker.ledger().budget(budget.id).unwrap().spent, 30.0);

        assert!(tracker.delete_transaction(Uuid::new_v4()).unwrap().is_none());
        assert_eq!(tracker.ledger().budget(budget.id).unwrap().spent, 30.0);
        assert_eq!(tracker.transactions().len(), 2);
        assert!(tracker.reconcile().is_empty());
    }
}

#[test]
fn new_transactions_are_listed_first() {
    let (mut tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    tracker
        .add_transaction(expense(1.0, ExpenseCategory::Other, "first"))
        .unwrap();
    tracker
        .add_transaction(expense(2.0, ExpenseCategory::Other, "second"))
        .unwrap();
    let descriptions: Vec<&str> = tracker
        .transactions()
        .iter()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["second", "first"]);
}

#[test]
fn invalid_amounts_are_rejected() {
    let (mut tracker, store) = memory_tracker(SyncPolicy::WriteThrough);
    for amount in [0.0, -4.0, f64::NAN] {
        let err = tracker
            .add_transaction(expense(amount, ExpenseCategory::Food, "bad"))
            .unwrap_err();
        assert!(err.is_validation(), "{amount} should fail validation");
    }
    let err = tracker
        .add_budget(ExpenseCategory::Food, 0.0, BudgetPeriod::Monthly)
        .unwrap_err();
    assert!(err.is_validation());
    assert!(tracker.transactions().is_empty());
    assert!(store.snapshot().unwrap().transactions.is_empty());
}

#[test]
fn one_budget_per_category() {
    let (mut tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    tracker
        .add_budget(ExpenseCategory::Housing, 900.0, BudgetPeriod::Monthly)
        .unwrap();
    assert!(tracker
        .add_budget(ExpenseCategory::Housing, 100.0, BudgetPeriod::Weekly)
        .is_err());
    assert_eq!(tracker.budgets().len(), 1);
}

#[test]
fn budget_category_change_rederives_spend() {
    let (mut tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    tracker
        .add_transaction(expense(40.0, ExpenseCategory::Entertainment, "Concert"))
        .unwrap();
    let budget = tracker
        .add_budget(ExpenseCategory::Shopping, 100.0, BudgetPeriod::Monthly)
        .unwrap();
    assert_eq!(budget.spent, 0.0);

    let patch = BudgetPatch {
        category: Some(ExpenseCategory::Entertainment),
        amount: Some(150.0),
        ..BudgetPatch::default()
    };
    assert!(tracker.update_budget(budget.id, patch).unwrap());
    let updated = tracker.ledger().budget(budget.id).unwrap();
    assert_eq!(updated.category, ExpenseCategory::Entertainment);
    assert_eq!(updated.amount, 150.0);
    assert_eq!(updated.spent, 40.0);
}

#[test]
fn deleting_a_budget_keeps_transactions() {
    let (mut tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    tracker
        .add_transaction(expense(25.0, ExpenseCategory::Health, "Pharmacy"))
        .unwrap();
    let budget = tracker
        .add_budget(ExpenseCategory::Health, 60.0, BudgetPeriod::Monthly)
        .unwrap();
    assert!(tracker.delete_budget(budget.id).unwrap().is_some());
    assert!(tracker.delete_budget(budget.id).unwrap().is_none());
    assert_eq!(tracker.transactions().len(), 1);
    assert_eq!(tracker.total_budget(), 0.0);
}

#[test]
fn analytics_over_the_ledger() {
    let (mut tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    tracker
        .add_budget(ExpenseCategory::Food, 300.0, BudgetPeriod::Monthly)
        .unwrap();
    tracker
        .add_budget(ExpenseCategory::Transport, 100.0, BudgetPeriod::Monthly)
        .unwrap();
    tracker
        .add_transaction(expense(60.0, ExpenseCategory::Food, "Market"))
        .unwrap();
    tracker
        .add_transaction(NewTransaction::new(
            20.0,
            ExpenseCategory::Transport,
            "Train",
            days_ago(3),
        ))
        .unwrap();
    tracker
        .add_transaction(NewTransaction::new(
            20.0,
            ExpenseCategory::Utilities,
            "Water",
            days_ago(10),
        ))
        .unwrap();

    assert_eq!(tracker.total_spent(), 100.0);
    assert_eq!(tracker.total_budget(), 400.0);

    let breakdown = tracker.category_spending();
    assert_eq!(breakdown.len(), 3);
    let share: f64 = breakdown.iter().map(|row| row.percentage).sum();
    assert!((share - 100.0).abs() < 1e-9);
    assert_eq!(breakdown[0].category, ExpenseCategory::Utilities);
    assert_eq!(breakdown[0].percentage, 20.0);

    let trend = tracker.spending_over_time();
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[6].date, "2026-10-16");
    assert_eq!(trend[6].amount, 60.0);
    assert_eq!(trend[3].amount, 20.0);
    let week: f64 = trend.iter().map(|point| point.amount).sum();
    assert_eq!(week, 80.0, "spend from ten days ago falls outside the window");

    let totals = tracker.dashboard();
    assert_eq!(totals.remaining, 300.0);
    assert_eq!(totals.savings_rate, 75.0);

    let statuses = tracker.budget_statuses();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|status| !status.over_budget));
}

#[test]
fn empty_tracker_reports_zeroes() {
    let (tracker, _store) = memory_tracker(SyncPolicy::WriteThrough);
    assert!(tracker.category_spending().is_empty());
    let totals = tracker.dashboard();
    assert_eq!(totals.total_spent, 0.0);
    assert_eq!(totals.savings_rate, 0.0);
    assert!(tracker
        .spending_over_time()
        .iter()
        .all(|point| point.amount == 0.0));
}
