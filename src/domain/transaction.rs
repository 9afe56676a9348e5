//! Income and expense records.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A single signed money movement. Positive amounts are income, negative amounts are expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        TransactionKind::of(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// True when the transaction date shares the calendar month and year of `reference`.
    ///
    /// Both instants are compared in UTC, not in the host's local zone.
    pub fn in_month_of(&self, reference: DateTime<Utc>) -> bool {
        self.date.year() == reference.year() && self.date.month() == reference.month()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} ({})", self.description, self.category)
    }
}

/// Direction of a transaction, derived from the sign of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Neutral,
}

impl TransactionKind {
    pub fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            TransactionKind::Income
        } else if amount < Decimal::ZERO {
            TransactionKind::Expense
        } else {
            TransactionKind::Neutral
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Neutral => "neutral",
        };
        f.write_str(label)
    }
}
