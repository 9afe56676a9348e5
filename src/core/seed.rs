//! Built-in demo data used when a collection has never been persisted.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{Budget, BudgetPeriod, FinancialGoal, Transaction};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// `cents` with two implied decimal places.
fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn transactions() -> Vec<Transaction> {
    vec![
        Transaction::new("1", "Salary", money(425_000), "salary", date(2023, 10, 1)),
        Transaction::new("2", "Grocery shopping", money(-12_050), "shopping", date(2023, 10, 3)),
        Transaction::new("3", "Restaurant dinner", money(-8_520), "food", date(2023, 10, 5)),
        Transaction::new("4", "Rent payment", money(-120_000), "bills", date(2023, 10, 1)),
        Transaction::new("5", "Uber rides", money(-4_575), "transport", date(2023, 10, 8)),
        Transaction::new("6", "Freelance work", money(85_000), "salary", date(2023, 10, 15)),
        Transaction::new("7", "Amazon purchase", money(-12_999), "shopping", date(2023, 10, 10)),
    ]
}

pub fn budgets() -> Vec<Budget> {
    let start = date(2023, 10, 1);
    vec![
        Budget::new("1", "food", money(50_000), BudgetPeriod::Monthly, start),
        Budget::new("2", "shopping", money(30_000), BudgetPeriod::Monthly, start),
        Budget::new("3", "entertainment", money(20_000), BudgetPeriod::Monthly, start),
    ]
}

pub fn goals() -> Vec<FinancialGoal> {
    let deadline = date(2023, 12, 31);
    vec![
        FinancialGoal::new("1", "Emergency Fund", money(1_000_000), money(520_000))
            .with_deadline(deadline),
        FinancialGoal::new("2", "Vacation", money(300_000), money(150_000)).with_deadline(deadline),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_transactions_cover_income_and_four_expense_categories() {
        let seed = transactions();
        assert_eq!(seed.len(), 7);
        let expense_categories: HashSet<_> = seed
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.category.as_str())
            .collect();
        assert_eq!(expense_categories.len(), 4);
        assert!(seed.iter().any(|txn| txn.is_income()));
    }

    #[test]
    fn seed_ids_are_unique_per_collection() {
        let txn_ids: HashSet<_> = transactions().into_iter().map(|t| t.id).collect();
        let budget_ids: HashSet<_> = budgets().into_iter().map(|b| b.id).collect();
        let goal_ids: HashSet<_> = goals().into_iter().map(|g| g.id).collect();
        assert_eq!(txn_ids.len(), 7);
        assert_eq!(budget_ids.len(), 3);
        assert_eq!(goal_ids.len(), 2);
    }
}
