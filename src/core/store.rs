use std::fmt;

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    core::{
        errors::Result,
        metrics::AccountMetrics,
        seed,
        time::{Clock, SystemClock},
    },
    domain::{Budget, FinancialGoal, Identifiable, Transaction},
    storage::{codec, KeyValueStore, StorageKeys},
};

/// Where a collection's initial state came from when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationSource {
    /// Decoded from the current persisted layout.
    Persisted,
    /// Decoded from an older layout and rewritten in the current one.
    Migrated { from: u32 },
    /// Nothing was stored under the key; the seed was written.
    Seeded,
    /// The stored value could not be decoded; it was quarantined and the seed was written.
    Recovered { reason: String },
}

impl fmt::Display for HydrationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrationSource::Persisted => f.write_str("persisted"),
            HydrationSource::Migrated { from } => write!(f, "migrated from v{from}"),
            HydrationSource::Seeded => f.write_str("seeded"),
            HydrationSource::Recovered { reason } => write!(f, "recovered ({reason})"),
        }
    }
}

/// Per-collection outcome of [`AccountStore::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub transactions: HydrationSource,
    pub budgets: HydrationSource,
    pub goals: HydrationSource,
}

impl BootstrapReport {
    /// Human-readable notes for every collection that needed recovery.
    pub fn warnings(&self) -> Vec<String> {
        [
            ("transactions", &self.transactions),
            ("budgets", &self.budgets),
            ("goals", &self.goals),
        ]
        .into_iter()
        .filter_map(|(name, source)| match source {
            HydrationSource::Recovered { reason } => Some(format!(
                "stored {name} were unreadable and were replaced with demo data: {reason}"
            )),
            _ => None,
        })
        .collect()
    }
}

/// Owns transactions, budgets and goals, keeps the derived metrics current, and writes every
/// mutation through to the key-value backend.
pub struct AccountStore {
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    keys: StorageKeys,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<FinancialGoal>,
    metrics: AccountMetrics,
    report: BootstrapReport,
}

impl AccountStore {
    /// Hydrates each collection from `storage`, seeding any that are missing or unreadable.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        keys: StorageKeys,
    ) -> Result<Self> {
        let (transactions, txn_source) =
            hydrate(storage.as_ref(), &keys.transactions, seed::transactions)?;
        let (budgets, budget_source) = hydrate(storage.as_ref(), &keys.budgets, seed::budgets)?;
        let (goals, goal_source) = hydrate(storage.as_ref(), &keys.goals, seed::goals)?;

        let metrics = AccountMetrics::compute(&transactions, clock.now());
        let report = BootstrapReport {
            transactions: txn_source,
            budgets: budget_source,
            goals: goal_source,
        };
        tracing::info!(
            transactions = %report.transactions,
            budgets = %report.budgets,
            goals = %report.goals,
            "account store ready"
        );

        Ok(Self {
            storage,
            clock,
            keys,
            transactions,
            budgets,
            goals,
            metrics,
            report,
        })
    }

    /// Opens with the system clock and the default `squareone_*` keys.
    pub fn with_storage(storage: Box<dyn KeyValueStore>) -> Result<Self> {
        Self::open(storage, Box::new(SystemClock), StorageKeys::default())
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn bootstrap_report(&self) -> &BootstrapReport {
        &self.report
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn goals(&self) -> &[FinancialGoal] {
        &self.goals
    }

    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        find(&self.transactions, id)
    }

    pub fn find_budget(&self, id: &str) -> Option<&Budget> {
        find(&self.budgets, id)
    }

    pub fn find_goal(&self, id: &str) -> Option<&FinancialGoal> {
        find(&self.goals, id)
    }

    pub fn metrics(&self) -> AccountMetrics {
        self.metrics
    }

    pub fn total_balance(&self) -> Decimal {
        self.metrics.total_balance
    }

    pub fn monthly_income(&self) -> Decimal {
        self.metrics.monthly_income
    }

    pub fn monthly_expenses(&self) -> Decimal {
        self.metrics.monthly_expenses
    }

    /// Recomputes metrics against the clock's current month without touching storage.
    pub fn refresh_metrics(&mut self) -> AccountMetrics {
        self.metrics = AccountMetrics::compute(&self.transactions, self.clock.now());
        self.metrics
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<()> {
        warn_on_duplicate(&self.transactions, &transaction, "transaction");
        tracing::debug!(id = %transaction.id, amount = %transaction.amount, "adding transaction");
        self.transactions.insert(0, transaction);
        self.refresh_metrics();
        self.persist_transactions()
    }

    /// Replaces every transaction sharing `transaction.id`. Returns `false` when none matched.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<bool> {
        let replaced = replace_matching(&mut self.transactions, &transaction);
        log_outcome("update", "transaction", transaction.id(), replaced);
        self.refresh_metrics();
        self.persist_transactions()?;
        Ok(replaced > 0)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let removed = remove_matching(&mut self.transactions, id);
        log_outcome("delete", "transaction", id, removed);
        self.refresh_metrics();
        self.persist_transactions()?;
        Ok(removed > 0)
    }

    pub fn add_budget(&mut self, budget: Budget) -> Result<()> {
        warn_on_duplicate(&self.budgets, &budget, "budget");
        tracing::debug!(id = %budget.id, category = %budget.category, "adding budget");
        self.budgets.push(budget);
        self.persist_budgets()
    }

    pub fn update_budget(&mut self, budget: Budget) -> Result<bool> {
        let replaced = replace_matching(&mut self.budgets, &budget);
        log_outcome("update", "budget", budget.id(), replaced);
        self.persist_budgets()?;
        Ok(replaced > 0)
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<bool> {
        let removed = remove_matching(&mut self.budgets, id);
        log_outcome("delete", "budget", id, removed);
        self.persist_budgets()?;
        Ok(removed > 0)
    }

    pub fn add_goal(&mut self, goal: FinancialGoal) -> Result<()> {
        warn_on_duplicate(&self.goals, &goal, "goal");
        tracing::debug!(id = %goal.id, name = %goal.name, "adding goal");
        self.goals.push(goal);
        self.persist_goals()
    }

    pub fn update_goal(&mut self, goal: FinancialGoal) -> Result<bool> {
        let replaced = replace_matching(&mut self.goals, &goal);
        log_outcome("update", "goal", goal.id(), replaced);
        self.persist_goals()?;
        Ok(replaced > 0)
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<bool> {
        let removed = remove_matching(&mut self.goals, id);
        log_outcome("delete", "goal", id, removed);
        self.persist_goals()?;
        Ok(removed > 0)
    }

    fn persist_transactions(&self) -> Result<()> {
        write_collection(self.storage.as_ref(), &self.keys.transactions, &self.transactions)
    }

    fn persist_budgets(&self) -> Result<()> {
        write_collection(self.storage.as_ref(), &self.keys.budgets, &self.budgets)
    }

    fn persist_goals(&self) -> Result<()> {
        write_collection(self.storage.as_ref(), &self.keys.goals, &self.goals)
    }
}

impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore")
            .field("keys", &self.keys)
            .field("transactions", &self.transactions.len())
            .field("budgets", &self.budgets.len())
            .field("goals", &self.goals.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

fn hydrate<T>(
    storage: &dyn KeyValueStore,
    key: &str,
    seed: fn() -> Vec<T>,
) -> Result<(Vec<T>, HydrationSource)>
where
    T: Serialize + DeserializeOwned,
{
    let Some(raw) = storage.get(key)? else {
        let items = seed();
        write_collection(storage, key, &items)?;
        tracing::info!(key, count = items.len(), "no stored collection, wrote seed data");
        return Ok((items, HydrationSource::Seeded));
    };

    match codec::decode::<T>(&raw) {
        Ok(decoded) if decoded.is_current() => Ok((decoded.items, HydrationSource::Persisted)),
        Ok(decoded) => {
            write_collection(storage, key, &decoded.items)?;
            tracing::info!(key, from = decoded.version, "upgraded stored collection layout");
            Ok((
                decoded.items,
                HydrationSource::Migrated {
                    from: decoded.version,
                },
            ))
        }
        Err(err) => {
            let quarantine = StorageKeys::quarantine(key);
            tracing::warn!(key, quarantine = %quarantine, error = %err, "stored collection unreadable, falling back to seed data");
            storage.set(&quarantine, &raw)?;
            let items = seed();
            write_collection(storage, key, &items)?;
            Ok((
                items,
                HydrationSource::Recovered {
                    reason: err.to_string(),
                },
            ))
        }
    }
}

fn write_collection<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<()> {
    let raw = codec::encode(items)?;
    if let Err(err) = storage.set(key, &raw) {
        tracing::error!(key, error = %err, "failed to persist collection");
        return Err(err);
    }
    tracing::debug!(key, count = items.len(), "persisted collection");
    Ok(())
}

fn find<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

fn replace_matching<T: Identifiable + Clone>(items: &mut [T], entity: &T) -> usize {
    let mut replaced = 0;
    for slot in items.iter_mut().filter(|item| item.id() == entity.id()) {
        *slot = entity.clone();
        replaced += 1;
    }
    replaced
}

fn remove_matching<T: Identifiable>(items: &mut Vec<T>, id: &str) -> usize {
    let before = items.len();
    items.retain(|item| item.id() != id);
    before - items.len()
}

fn warn_on_duplicate<T: Identifiable>(items: &[T], entity: &T, kind: &str) {
    if find(items, entity.id()).is_some() {
        tracing::warn!(id = entity.id(), kind, "adding entity with an id already in use");
    }
}

fn log_outcome(action: &str, kind: &str, id: &str, matched: usize) {
    if matched == 0 {
        tracing::debug!(action, kind, id, "no entity with this id, collection unchanged");
    } else {
        tracing::debug!(action, kind, id, matched, "collection updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::time::{FixedClock, ManualClock},
        domain::BudgetPeriod,
        storage::MemoryStore,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;

    fn october() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 20, 12, 0, 0).unwrap()
    }

    fn open_with(backend: Arc<MemoryStore>, now: DateTime<Utc>) -> AccountStore {
        AccountStore::open(
            Box::new(backend),
            Box::new(FixedClock(now)),
            StorageKeys::default(),
        )
        .unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn empty_backend_is_seeded_and_persisted() {
        let backend = Arc::new(MemoryStore::new());
        let store = open_with(Arc::clone(&backend), october());

        assert_eq!(store.transactions().len(), 7);
        assert_eq!(store.budgets().len(), 3);
        assert_eq!(store.goals().len(), 2);
        assert_eq!(store.bootstrap_report().transactions, HydrationSource::Seeded);
        assert!(store.bootstrap_report().warnings().is_empty());
        for key in ["squareone_transactions", "squareone_budgets", "squareone_goals"] {
            assert!(backend.get(key).unwrap().is_some(), "{key} not written");
        }
        assert_eq!(store.total_balance(), dec("3518.56"));
        assert_eq!(store.monthly_income(), dec("5100"));
        assert_eq!(store.monthly_expenses(), dec("1581.44"));
    }

    #[test]
    fn transactions_are_prepended_and_others_appended() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(backend, october());

        store
            .add_transaction(Transaction::new("t-new", "Coffee", dec("-3.50"), "food", october()))
            .unwrap();
        store
            .add_budget(Budget::new("b-new", "transport", dec("120"), BudgetPeriod::Weekly, october()))
            .unwrap();
        store
            .add_goal(FinancialGoal::new("g-new", "Laptop", dec("2000"), dec("0")))
            .unwrap();

        assert_eq!(store.transactions()[0].id, "t-new");
        assert_eq!(store.budgets().last().unwrap().id, "b-new");
        assert_eq!(store.goals().last().unwrap().id, "g-new");
        assert_eq!(store.monthly_expenses(), dec("1584.94"));
        assert_eq!(store.total_balance(), dec("3515.06"));
    }

    #[test]
    fn update_keeps_position_and_reports_misses() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(backend, october());

        let mut edited = store.find_transaction("4").unwrap().clone();
        edited.amount = dec("-1100");
        assert!(store.update_transaction(edited.clone()).unwrap());
        assert_eq!(store.transactions()[3], edited);
        assert_eq!(store.total_balance(), dec("3618.56"));

        let before = store.goals().to_vec();
        let ghost = FinancialGoal::new("missing", "Ghost", dec("1"), dec("1"));
        assert!(!store.update_goal(ghost).unwrap());
        assert_eq!(store.goals(), before.as_slice());
    }

    #[test]
    fn update_replaces_every_duplicate() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(backend, october());
        let twin = Budget::new("1", "rent", dec("900"), BudgetPeriod::Monthly, october());
        store.add_budget(twin).unwrap();

        let merged = Budget::new("1", "food", dec("650"), BudgetPeriod::Monthly, october());
        assert!(store.update_budget(merged.clone()).unwrap());
        let matches: Vec<_> = store.budgets().iter().filter(|b| b.id == "1").collect();
        assert_eq!(matches, vec![&merged, &merged]);
        assert_eq!(store.budgets()[0], merged);
    }

    #[test]
    fn delete_is_idempotent() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(backend, october());

        assert!(store.delete_budget("2").unwrap());
        let after_first = store.budgets().to_vec();
        assert!(!store.delete_budget("2").unwrap());
        assert_eq!(store.budgets(), after_first.as_slice());
        assert!(!store.delete_transaction("nope").unwrap());
        assert_eq!(store.transactions().len(), 7);
    }

    #[test]
    fn duplicate_add_is_kept() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(backend, october());
        let dup = Transaction::new("1", "Bonus", dec("100"), "salary", october());
        store.add_transaction(dup).unwrap();
        assert_eq!(store.transactions().iter().filter(|t| t.id == "1").count(), 2);

        assert!(store.delete_transaction("1").unwrap());
        assert!(store.find_transaction("1").is_none());
    }

    #[test]
    fn metrics_follow_the_clock_month() {
        let backend = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(october()));
        let mut store = AccountStore::open(
            Box::new(backend),
            Box::new(Arc::clone(&clock)),
            StorageKeys::default(),
        )
        .unwrap();
        assert_eq!(store.monthly_income(), dec("5100"));

        clock.set(Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap());
        let metrics = store.refresh_metrics();
        assert_eq!(metrics.monthly_income, Decimal::ZERO);
        assert_eq!(metrics.monthly_expenses, Decimal::ZERO);
        assert_eq!(metrics.total_balance, dec("3518.56"));

        let zero = Transaction::new("z", "Refund net", Decimal::ZERO, "other", clock.now());
        store.add_transaction(zero).unwrap();
        assert_eq!(store.monthly_income(), Decimal::ZERO);
        assert_eq!(store.monthly_expenses(), Decimal::ZERO);
    }

    #[test]
    fn extreme_amounts_clamp_metrics_instead_of_panicking() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_with(Arc::clone(&backend), october());
        let jackpot = Transaction::new("a", "Jackpot", Decimal::MAX, "salary", october());
        store.add_transaction(jackpot).unwrap();
        assert_eq!(store.total_balance(), Decimal::MAX);
        assert_eq!(store.monthly_income(), Decimal::MAX);
        assert_eq!(store.transactions()[0].id, "a");
    }

    #[test]
    fn persisted_totals_beyond_decimal_range_still_open() {
        let raw = r#"{"version":1,"items":[
            {"id":"a","description":"x","amount":"79228162514264337593543950335","category":"salary","date":"2023-10-02T00:00:00Z"},
            {"id":"b","description":"y","amount":"1","category":"salary","date":"2023-10-03T00:00:00Z"}
        ]}"#;
        let backend = Arc::new(MemoryStore::with_entries([(
            "squareone_transactions".to_string(),
            raw.to_string(),
        )]));
        let store = open_with(backend, october());
        assert_eq!(store.bootstrap_report().transactions, HydrationSource::Persisted);
        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.total_balance(), Decimal::MAX);
        assert_eq!(store.monthly_expenses(), Decimal::ZERO);
    }

    #[test]
    fn failed_write_keeps_memory_state_and_surfaces_error() {
        struct ReadOnly(MemoryStore);

        impl KeyValueStore for ReadOnly {
            fn get(&self, key: &str) -> Result<Option<String>> {
                self.0.get(key)
            }
            fn set(&self, key: &str, _value: &str) -> Result<()> {
                Err(crate::core::errors::StoreError::Storage(format!("{key} is read-only")))
            }
            fn remove(&self, key: &str) -> Result<()> {
                self.0.remove(key)
            }
            fn keys(&self) -> Result<Vec<String>> {
                self.0.keys()
            }
        }

        let seeded = Arc::new(MemoryStore::new());
        drop(open_with(Arc::clone(&seeded), october()));
        let snapshot: Vec<(String, String)> = seeded
            .keys()
            .unwrap()
            .into_iter()
            .map(|key| {
                let value = seeded.get(&key).unwrap().unwrap();
                (key, value)
            })
            .collect();

        let mut store = AccountStore::open(
            Box::new(ReadOnly(MemoryStore::with_entries(snapshot))),
            Box::new(FixedClock(october())),
            StorageKeys::default(),
        )
        .unwrap();
        let err = store.delete_goal("1").unwrap_err();
        assert!(err.to_string().contains("read-only"));
        assert_eq!(store.goals().len(), 1);
    }
}
