use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A declarative spending target for one category.
///
/// Budgets are never reconciled against transactions by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        period: BudgetPeriod,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            amount,
            period,
            start_date,
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!("{} ({})", self.category, self.period)
    }
}

/// Cadence a budget amount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Annual,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Annual => "annual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBudgetPeriodError(pub String);

impl fmt::Display for ParseBudgetPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown budget period `{}` (expected weekly, monthly or annual)",
            self.0
        )
    }
}

impl std::error::Error for ParseBudgetPeriodError {}

impl FromStr for BudgetPeriod {
    type Err = ParseBudgetPeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            "annual" | "yearly" | "year" => Ok(BudgetPeriod::Annual),
            _ => Err(ParseBudgetPeriodError(value.to_string())),
        }
    }
}
