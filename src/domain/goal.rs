use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

const FULL_PROGRESS: u8 = 100;

/// A savings target tracked on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FinancialGoal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target_amount: Decimal,
        current_amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_amount,
            current_amount,
            deadline: None,
            notes: None,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Completion percentage rounded half away from zero and capped at 100.
    ///
    /// Returns `None` when the target is not positive, since no meaningful ratio exists.
    pub fn progress_percent(&self) -> Option<u8> {
        if self.target_amount <= Decimal::ZERO {
            return None;
        }
        if self.current_amount <= Decimal::ZERO {
            return Some(0);
        }
        let ratio = self
            .current_amount
            .checked_div(self.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
        let Some(ratio) = ratio else {
            // overflow only happens for ratios far beyond 100%
            return Some(FULL_PROGRESS);
        };
        let rounded = ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let percent = rounded
            .min(Decimal::from(FULL_PROGRESS))
            .to_u8()
            .unwrap_or(FULL_PROGRESS);
        Some(percent)
    }

    /// Amount still missing to reach the target, never negative.
    pub fn remaining(&self) -> Decimal {
        self.target_amount
            .saturating_sub(self.current_amount)
            .max(Decimal::ZERO)
    }

    pub fn is_complete(&self) -> bool {
        self.progress_percent() == Some(FULL_PROGRESS)
    }
}

impl Identifiable for FinancialGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for FinancialGoal {
    fn display_label(&self) -> String {
        match self.progress_percent() {
            Some(percent) => format!("{} ({}%)", self.name, percent),
            None => format!("{} (no target)", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: i64, current: i64) -> FinancialGoal {
        FinancialGoal::new("g", "Goal", Decimal::from(target), Decimal::from(current))
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(goal(10_000, 5_200).progress_percent(), Some(52));
        assert_eq!(goal(3, 1).progress_percent(), Some(33));
        assert_eq!(goal(200, 1).progress_percent(), Some(1));
        // 1/8 = 12.5% rounds up
        assert_eq!(goal(8, 1).progress_percent(), Some(13));
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        assert_eq!(goal(3_000, 3_000).progress_percent(), Some(100));
        assert_eq!(goal(3_000, 9_000).progress_percent(), Some(100));
        assert!(goal(3_000, 9_000).is_complete());
    }

    #[test]
    fn zero_target_reports_no_progress_instead_of_dividing() {
        assert_eq!(goal(0, 500).progress_percent(), None);
        assert_eq!(goal(0, 0).progress_percent(), None);
        assert!(!goal(0, 500).is_complete());
    }

    #[test]
    fn negative_balance_reports_zero_progress() {
        assert_eq!(goal(1_000, -50).progress_percent(), Some(0));
        assert_eq!(goal(1_000, -50).remaining(), Decimal::from(1_050));
    }

    #[test]
    fn remaining_clamps_at_decimal_range() {
        let extreme = FinancialGoal::new("g", "Goal", Decimal::MAX, Decimal::MIN);
        assert_eq!(extreme.remaining(), Decimal::MAX);
        assert_eq!(extreme.progress_percent(), Some(0));
    }

    #[test]
    fn optional_fields_round_trip_through_json() {
        let mut original = goal(3_000, 1_500);
        original.notes = Some("Lisbon".into());
        let json = serde_json::to_string(&original).expect("encode goal");
        assert!(json.contains("\"targetAmount\""));
        assert!(!json.contains("deadline"));
        let decoded: FinancialGoal = serde_json::from_str(&json).expect("decode goal");
        assert_eq!(decoded, original);
    }
}
