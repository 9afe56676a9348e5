//! Line-oriented shell over the account store.

pub mod commands;
pub mod context;
pub mod errors;
pub mod format;
pub mod forms;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError, CommandResult};
pub use shell::{run_cli, SCRIPT_ENV};
