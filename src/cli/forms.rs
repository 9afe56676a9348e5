//! `field=value` argument forms for creating and editing entities.
//!
//! The store accepts whatever it is given, so every check on user input lives here.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{Budget, BudgetPeriod, FinancialGoal, Transaction};

const DEFAULT_CATEGORY: &str = "other";
const CLEAR_WORDS: &[&str] = &["", "none", "-"];
/// Largest amount a form accepts: one trillion.
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

pub const TRANSACTION_FIELDS: &[&str] = &["id", "description", "amount", "type", "category", "date"];
pub const BUDGET_FIELDS: &[&str] = &["id", "category", "amount", "period", "start", "end"];
pub const GOAL_FIELDS: &[&str] = &["id", "name", "target", "current", "deadline", "notes"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("expected `field=value`, got `{0}`")]
    Malformed(String),
    #[error("unknown field `{field}` (expected one of: {expected})")]
    UnknownField { field: String, expected: String },
    #[error("`{0}` was given more than once")]
    Repeated(String),
    #[error("`{0}` is required")]
    Missing(&'static str),
    #[error("`{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> FormError {
    FormError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Parsed `field=value` pairs, restricted to a known field list.
#[derive(Debug, Default)]
pub struct FieldArgs {
    values: BTreeMap<&'static str, String>,
}

impl FieldArgs {
    pub fn parse(args: &[&str], allowed: &[&'static str]) -> Result<Self, FormError> {
        let mut values = BTreeMap::new();
        for arg in args {
            let (raw_field, value) = arg
                .split_once('=')
                .ok_or_else(|| FormError::Malformed((*arg).to_string()))?;
            let normalized = raw_field.trim().to_ascii_lowercase();
            let field = allowed
                .iter()
                .copied()
                .find(|candidate| *candidate == normalized)
                .ok_or_else(|| FormError::UnknownField {
                    field: raw_field.trim().to_string(),
                    expected: allowed.join(", "),
                })?;
            if values.insert(field, value.trim().to_string()).is_some() {
                return Err(FormError::Repeated(field.to_string()));
            }
        }
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn take(&mut self, field: &'static str) -> Option<String> {
        self.values.remove(field)
    }

    fn take_text(&mut self, field: &'static str) -> Result<Option<String>, FormError> {
        match self.take(field) {
            Some(value) if value.is_empty() => Err(invalid(field, "cannot be empty")),
            other => Ok(other),
        }
    }

    fn take_amount(&mut self, field: &'static str) -> Result<Option<Decimal>, FormError> {
        self.take(field)
            .map(|raw| parse_amount(field, &raw))
            .transpose()
    }

    fn take_date(&mut self, field: &'static str) -> Result<Option<DateTime<Utc>>, FormError> {
        self.take(field).map(|raw| parse_date(field, &raw)).transpose()
    }

    /// `None` when absent, `Some(None)` when explicitly cleared.
    fn take_optional_date(
        &mut self,
        field: &'static str,
    ) -> Result<Option<Option<DateTime<Utc>>>, FormError> {
        match self.take(field) {
            None => Ok(None),
            Some(raw) if is_clear(&raw) => Ok(Some(None)),
            Some(raw) => parse_date(field, &raw).map(|date| Some(Some(date))),
        }
    }

    fn take_optional_text(&mut self, field: &'static str) -> Option<Option<String>> {
        self.take(field)
            .map(|raw| if is_clear(&raw) { None } else { Some(raw) })
    }
}

fn is_clear(raw: &str) -> bool {
    CLEAR_WORDS.contains(&raw.to_ascii_lowercase().as_str())
}

/// Parses a non-negative amount. Thousands separators (`,`) and a leading `$` are tolerated.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, FormError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| invalid(field, format!("`{raw}` is not a number")))?;
    if amount < Decimal::ZERO {
        return Err(invalid(
            field,
            "must not be negative (use type=expense for spending)",
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(invalid(field, format!("must not exceed {MAX_AMOUNT}")));
    }
    Ok(amount.normalize())
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(field: &'static str, raw: &str) -> Result<DateTime<Utc>, FormError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| invalid(field, format!("`{raw}` is not a YYYY-MM-DD date")))
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Direction chosen on the transaction form; the stored amount carries it as a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    fn of(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            EntryType::Expense
        } else {
            EntryType::Income
        }
    }

    fn apply(self, magnitude: Decimal) -> Decimal {
        match self {
            EntryType::Income => magnitude.abs(),
            EntryType::Expense => -magnitude.abs(),
        }
    }
}

impl FromStr for EntryType {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(EntryType::Income),
            "expense" | "out" => Ok(EntryType::Expense),
            other => Err(invalid(
                "type",
                format!("`{other}` is not income or expense"),
            )),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Income => f.write_str("income"),
            EntryType::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Debug, Default)]
pub struct TransactionForm {
    id: Option<String>,
    description: Option<String>,
    amount: Option<Decimal>,
    entry_type: Option<EntryType>,
    category: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl TransactionForm {
    pub fn parse(args: &[&str]) -> Result<Self, FormError> {
        let mut fields = FieldArgs::parse(args, TRANSACTION_FIELDS)?;
        Ok(Self {
            id: fields.take_text("id")?,
            description: fields.take_text("description")?,
            amount: fields.take_amount("amount")?,
            entry_type: fields.take("type").map(|raw| raw.parse()).transpose()?,
            category: fields.take("category").map(normalize_category),
            date: fields.take_date("date")?,
        })
    }

    /// Builds a new transaction. Missing type means expense, missing category means `other`,
    /// missing date means `today`.
    pub fn build(
        self,
        next_id: impl FnOnce() -> String,
        today: NaiveDate,
    ) -> Result<Transaction, FormError> {
        let description = self.description.ok_or(FormError::Missing("description"))?;
        let magnitude = self.amount.ok_or(FormError::Missing("amount"))?;
        let entry_type = self.entry_type.unwrap_or(EntryType::Expense);
        Ok(Transaction::new(
            self.id.unwrap_or_else(next_id),
            description,
            entry_type.apply(magnitude),
            self.category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            self.date.unwrap_or_else(|| start_of_day(today)),
        ))
    }

    /// Overlays the given fields on `existing`. The id cannot change.
    pub fn apply_to(self, existing: &Transaction) -> Result<Transaction, FormError> {
        reject_id_change(self.id.as_deref(), &existing.id)?;
        let mut updated = existing.clone();
        if let Some(description) = self.description {
            updated.description = description;
        }
        let magnitude = self.amount.unwrap_or_else(|| existing.amount.abs());
        let entry_type = self
            .entry_type
            .unwrap_or_else(|| EntryType::of(existing.amount));
        updated.amount = entry_type.apply(magnitude);
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        Ok(updated)
    }
}

#[derive(Debug, Default)]
pub struct BudgetForm {
    id: Option<String>,
    category: Option<String>,
    amount: Option<Decimal>,
    period: Option<BudgetPeriod>,
    start: Option<DateTime<Utc>>,
    end: Option<Option<DateTime<Utc>>>,
}

impl BudgetForm {
    pub fn parse(args: &[&str]) -> Result<Self, FormError> {
        let mut fields = FieldArgs::parse(args, BUDGET_FIELDS)?;
        let period = fields
            .take("period")
            .map(|raw| {
                raw.parse::<BudgetPeriod>()
                    .map_err(|err| invalid("period", err.to_string()))
            })
            .transpose()?;
        Ok(Self {
            id: fields.take_text("id")?,
            category: fields
                .take_text("category")?
                .map(normalize_category),
            amount: fields.take_amount("amount")?,
            period,
            start: fields.take_date("start")?,
            end: fields.take_optional_date("end")?,
        })
    }

    pub fn build(self, next_id: impl FnOnce() -> String, today: NaiveDate) -> Result<Budget, FormError> {
        let category = self.category.ok_or(FormError::Missing("category"))?;
        let amount = self.amount.ok_or(FormError::Missing("amount"))?;
        let start = self.start.unwrap_or_else(|| start_of_day(today));
        let end = self.end.flatten();
        check_window(start, end)?;
        let mut budget = Budget::new(
            self.id.unwrap_or_else(next_id),
            category,
            amount,
            self.period.unwrap_or_default(),
            start,
        );
        budget.end_date = end;
        Ok(budget)
    }

    pub fn apply_to(self, existing: &Budget) -> Result<Budget, FormError> {
        reject_id_change(self.id.as_deref(), &existing.id)?;
        let mut updated = existing.clone();
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(period) = self.period {
            updated.period = period;
        }
        if let Some(start) = self.start {
            updated.start_date = start;
        }
        if let Some(end) = self.end {
            updated.end_date = end;
        }
        check_window(updated.start_date, updated.end_date)?;
        Ok(updated)
    }
}

#[derive(Debug, Default)]
pub struct GoalForm {
    id: Option<String>,
    name: Option<String>,
    target: Option<Decimal>,
    current: Option<Decimal>,
    deadline: Option<Option<DateTime<Utc>>>,
    notes: Option<Option<String>>,
}

impl GoalForm {
    pub fn parse(args: &[&str]) -> Result<Self, FormError> {
        let mut fields = FieldArgs::parse(args, GOAL_FIELDS)?;
        let target = fields.take_amount("target")?;
        if target.is_some_and(|value| value.is_zero()) {
            return Err(invalid("target", "must be greater than zero"));
        }
        Ok(Self {
            id: fields.take_text("id")?,
            name: fields.take_text("name")?,
            target,
            current: fields.take_amount("current")?,
            deadline: fields.take_optional_date("deadline")?,
            notes: fields.take_optional_text("notes"),
        })
    }

    pub fn build(self, next_id: impl FnOnce() -> String) -> Result<FinancialGoal, FormError> {
        let name = self.name.ok_or(FormError::Missing("name"))?;
        let target = self.target.ok_or(FormError::Missing("target"))?;
        let mut goal = FinancialGoal::new(
            self.id.unwrap_or_else(next_id),
            name,
            target,
            self.current.unwrap_or(Decimal::ZERO),
        );
        goal.deadline = self.deadline.flatten();
        goal.notes = self.notes.flatten();
        Ok(goal)
    }

    pub fn apply_to(self, existing: &FinancialGoal) -> Result<FinancialGoal, FormError> {
        reject_id_change(self.id.as_deref(), &existing.id)?;
        let mut updated = existing.clone();
        if let Some(name) = self.name {
            updated.name = name;
        }
        if let Some(target) = self.target {
            updated.target_amount = target;
        }
        if let Some(current) = self.current {
            updated.current_amount = current;
        }
        if let Some(deadline) = self.deadline {
            updated.deadline = deadline;
        }
        if let Some(notes) = self.notes {
            updated.notes = notes;
        }
        Ok(updated)
    }
}

fn normalize_category(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

fn reject_id_change(requested: Option<&str>, current: &str) -> Result<(), FormError> {
    match requested {
        Some(id) if id != current => Err(invalid("id", "ids cannot be changed")),
        _ => Ok(()),
    }
}

fn check_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), FormError> {
    match end {
        Some(end) if end < start => Err(invalid("end", "must not be before the start date")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 20).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn transaction_form_applies_sign_and_defaults() {
        let form = TransactionForm::parse(&["description=Coffee beans", "amount=12.40"]).unwrap();
        let txn = form.build(|| "42".into(), today()).unwrap();
        assert_eq!(txn.id, "42");
        assert_eq!(txn.amount, dec("-12.40"));
        assert_eq!(txn.category, "other");
        assert_eq!(txn.date, Utc.with_ymd_and_hms(2023, 10, 20, 0, 0, 0).unwrap());

        let form = TransactionForm::parse(&[
            "description=Bonus",
            "amount=1,000",
            "type=income",
            "category=Salary",
            "date=2023-10-02",
        ])
        .unwrap();
        let txn = form.build(|| "43".into(), today()).unwrap();
        assert_eq!(txn.amount, dec("1000"));
        assert_eq!(txn.category, "salary");
    }

    #[test]
    fn amounts_are_capped_at_one_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
        assert_eq!(parse_amount("amount", "1,000,000,000,000"), Ok(MAX_AMOUNT));
        assert_eq!(
            TransactionForm::parse(&["amount=79228162514264337593543950335"]).unwrap_err(),
            invalid("amount", "must not exceed 1000000000000")
        );
        assert!(matches!(
            GoalForm::parse(&["target=1000000000000.01"]),
            Err(FormError::Invalid { field: "target", .. })
        ));
    }

    #[test]
    fn transaction_form_rejects_bad_input() {
        assert_eq!(
            TransactionForm::parse(&["amount=-5"]).unwrap_err(),
            invalid("amount", "must not be negative (use type=expense for spending)")
        );
        assert!(matches!(
            TransactionForm::parse(&["colour=red"]),
            Err(FormError::UnknownField { .. })
        ));
        assert!(matches!(
            TransactionForm::parse(&["date=10/05/2023"]),
            Err(FormError::Invalid { field: "date", .. })
        ));
        assert_eq!(
            TransactionForm::parse(&["amount=5"])
                .unwrap()
                .build(|| "1".into(), today())
                .unwrap_err(),
            FormError::Missing("description")
        );
        assert!(matches!(
            TransactionForm::parse(&["amount"]),
            Err(FormError::Malformed(_))
        ));
    }

    #[test]
    fn editing_type_flips_sign_and_keeps_magnitude() {
        let existing = Transaction::new(
            "9",
            "Refund",
            dec("-20"),
            "shopping",
            Utc.with_ymd_and_hms(2023, 10, 4, 0, 0, 0).unwrap(),
        );
        let updated = TransactionForm::parse(&["type=income"])
            .unwrap()
            .apply_to(&existing)
            .unwrap();
        assert_eq!(updated.amount, dec("20"));
        assert_eq!(updated.description, "Refund");

        let updated = TransactionForm::parse(&["amount=35"])
            .unwrap()
            .apply_to(&existing)
            .unwrap();
        assert_eq!(updated.amount, dec("-35"));

        assert!(TransactionForm::parse(&["id=10"])
            .unwrap()
            .apply_to(&existing)
            .is_err());
    }

    #[test]
    fn budget_form_checks_window_and_clears_end() {
        let form = BudgetForm::parse(&["category=travel", "amount=400", "period=annual", "start=2024-01-01", "end=2023-12-01"]).unwrap();
        assert!(matches!(
            form.build(|| "b".into(), today()),
            Err(FormError::Invalid { field: "end", .. })
        ));

        let existing = Budget::new("b", "travel", dec("400"), BudgetPeriod::Annual, start_of_day(today()))
            .with_end_date(Utc.with_ymd_and_hms(2024, 10, 20, 0, 0, 0).unwrap());
        let cleared = BudgetForm::parse(&["end=none", "period=weekly"])
            .unwrap()
            .apply_to(&existing)
            .unwrap();
        assert_eq!(cleared.end_date, None);
        assert_eq!(cleared.period, BudgetPeriod::Weekly);
    }

    #[test]
    fn goal_form_requires_positive_target() {
        assert!(GoalForm::parse(&["target=0"]).is_err());
        let goal = GoalForm::parse(&["name=Car", "target=8000", "notes=used is fine"])
            .unwrap()
            .build(|| "g".into())
            .unwrap();
        assert_eq!(goal.current_amount, Decimal::ZERO);
        assert_eq!(goal.notes.as_deref(), Some("used is fine"));
        assert_eq!(goal.progress_percent(), Some(0));
    }
}
