//! Pure data types for the dashboard's three entity collections.
//! No I/O and no storage; only models, enums and derived per-entity values.

pub mod budget;
pub mod category;
pub mod common;
pub mod goal;
pub mod transaction;

pub use budget::{Budget, BudgetPeriod, ParseBudgetPeriodError};
pub use category::{CategoryInfo, DEFAULT_CATEGORY, KNOWN_CATEGORIES};
pub use common::{Displayable, Identifiable};
pub use goal::FinancialGoal;
pub use transaction::{Transaction, TransactionKind};
