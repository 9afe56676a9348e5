//! The account state store and the pieces it is assembled from.

pub mod errors;
pub mod ids;
pub mod metrics;
pub mod seed;
pub mod store;
pub mod time;

pub use errors::{Result, StoreError};
pub use metrics::{AccountMetrics, CategorySpend, RecentFilter};
pub use store::{AccountStore, BootstrapReport, HydrationSource};
pub use time::{Clock, FixedClock, ManualClock, SystemClock};
