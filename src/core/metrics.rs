//! Figures derived from the transactions collection.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::Transaction;

/// Summary metrics for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetrics {
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
}

impl AccountMetrics {
    /// Balance over every transaction; income and expenses over the calendar month containing `now`.
    ///
    /// Sums saturate at the `Decimal` range instead of overflowing.
    pub fn compute(transactions: &[Transaction], now: DateTime<Utc>) -> Self {
        let mut metrics = AccountMetrics::default();
        let mut saturated = false;
        for txn in transactions {
            saturated |= accumulate(&mut metrics.total_balance, txn.amount);
            if !txn.in_month_of(now) {
                continue;
            }
            if txn.is_income() {
                saturated |= accumulate(&mut metrics.monthly_income, txn.amount);
            } else if txn.is_expense() {
                saturated |= accumulate(&mut metrics.monthly_expenses, txn.amount.abs());
            }
        }
        if saturated {
            tracing::warn!(
                transactions = transactions.len(),
                "metric totals exceed the decimal range and were clamped"
            );
        }
        metrics
    }

    /// Signed result of the current month (`income - expenses`).
    pub fn monthly_net(&self) -> Decimal {
        self.monthly_income.saturating_sub(self.monthly_expenses)
    }
}

/// Adds `value` to `total`, clamping at the decimal range. Returns true when clamped.
fn accumulate(total: &mut Decimal, value: Decimal) -> bool {
    match total.checked_add(value) {
        Some(sum) => {
            *total = sum;
            false
        }
        None => {
            *total = total.saturating_add(value);
            true
        }
    }
}

/// Current-month spending attributed to one category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    pub category: String,
    pub total: Decimal,
    /// Share of the month's expenses, rounded to whole percent.
    pub share: u8,
}

/// Groups the current month's expenses by category, largest first.
pub fn category_breakdown(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<CategorySpend> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for txn in transactions
        .iter()
        .filter(|txn| txn.is_expense() && txn.in_month_of(now))
    {
        let total = totals.entry(txn.category.to_ascii_lowercase()).or_default();
        accumulate(total, txn.amount.abs());
    }
    let grand_total = totals
        .values()
        .fold(Decimal::ZERO, |acc, total| acc.saturating_add(*total));
    let mut rows: Vec<CategorySpend> = totals
        .into_iter()
        .map(|(category, total)| CategorySpend {
            share: share_of(total, grand_total),
            category,
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    rows
}

fn share_of(part: Decimal, whole: Decimal) -> u8 {
    use rust_decimal::prelude::ToPrimitive;

    if whole <= Decimal::ZERO {
        return 0;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED)
        .round()
        .min(Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

/// Filter options for the recent transactions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecentFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl RecentFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            RecentFilter::All => true,
            RecentFilter::Income => txn.is_income(),
            RecentFilter::Expense => txn.is_expense(),
        }
    }
}

impl fmt::Display for RecentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecentFilter::All => "all",
            RecentFilter::Income => "income",
            RecentFilter::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for RecentFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(RecentFilter::All),
            "income" => Ok(RecentFilter::Income),
            "expense" | "expenses" => Ok(RecentFilter::Expense),
            other => Err(format!(
                "unknown filter `{other}` (expected all, income or expense)"
            )),
        }
    }
}

/// First `limit` transactions in collection order that pass `filter`.
pub fn recent(transactions: &[Transaction], filter: RecentFilter, limit: usize) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|txn| filter.matches(txn))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed;
    use chrono::TimeZone;

    fn october_2023() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn seed_balance_is_exact() {
        let metrics = AccountMetrics::compute(&seed::transactions(), october_2023());
        assert_eq!(metrics.total_balance, "3518.56".parse::<Decimal>().unwrap());
        assert_eq!(metrics.monthly_income, Decimal::from(5100));
        assert_eq!(metrics.monthly_expenses, "1581.44".parse::<Decimal>().unwrap());
        assert_eq!(metrics.monthly_net(), metrics.total_balance);
    }

    #[test]
    fn other_months_only_count_toward_balance() {
        let later = Utc.with_ymd_and_hms(2023, 11, 2, 0, 0, 0).unwrap();
        let metrics = AccountMetrics::compute(&seed::transactions(), later);
        assert_eq!(metrics.total_balance, "3518.56".parse::<Decimal>().unwrap());
        assert_eq!(metrics.monthly_income, Decimal::ZERO);
        assert_eq!(metrics.monthly_expenses, Decimal::ZERO);
    }

    #[test]
    fn breakdown_orders_categories_by_spend() {
        let rows = category_breakdown(&seed::transactions(), october_2023());
        let order: Vec<&str> = rows.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(order, vec!["bills", "shopping", "food", "transport"]);
        assert_eq!(rows[1].total, "250.49".parse::<Decimal>().unwrap());
        assert_eq!(rows[0].share, 76);
    }

    #[test]
    fn recent_applies_filter_then_limit() {
        let seed = seed::transactions();
        let income = recent(&seed, RecentFilter::Income, 10);
        assert_eq!(income.len(), 2);
        let expenses = recent(&seed, RecentFilter::Expense, 3);
        let ids: Vec<&str> = expenses.iter().map(|txn| txn.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
        assert_eq!("Expenses".parse::<RecentFilter>(), Ok(RecentFilter::Expense));
    }

    #[test]
    fn totals_clamp_instead_of_overflowing() {
        let now = october_2023();
        let mut txns = seed::transactions();
        txns.push(Transaction::new("big", "Jackpot", Decimal::MAX, "salary", now));
        txns.push(Transaction::new("huge", "Yacht", Decimal::MIN, "shopping", now));
        txns.push(Transaction::new("more", "Fees", Decimal::MIN, "bills", now));

        let metrics = AccountMetrics::compute(&txns, now);
        assert_eq!(metrics.monthly_income, Decimal::MAX);
        assert_eq!(metrics.monthly_expenses, Decimal::MAX);
        assert_eq!(metrics.monthly_net(), Decimal::ZERO);

        let rows = category_breakdown(&txns, now);
        assert_eq!(rows[0].total, Decimal::MAX);
        assert!(rows.iter().all(|row| row.share <= 100));
    }
}
