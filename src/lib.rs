#![doc(test(attr(deny(warnings))))]

//! SquareOne keeps a personal-finance dashboard's transactions, budgets and goals in memory,
//! derives balance and monthly figures from them, and writes every change through to a
//! string-keyed store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{AccountMetrics, AccountStore, StoreError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup log.
pub fn init() {
    init_with_filter(None);
}

/// Same as [`init`], using `directive` when `RUST_LOG` is unset.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!(version = utils::build_info::VERSION, "SquareOne tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
