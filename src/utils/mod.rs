pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_DIRECTIVE: &str = "squareone=info";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber once.
///
/// `RUST_LOG` wins when set; otherwise `directive` (or `squareone=info`) is used.
/// Logs go to stderr so script-mode stdout stays clean.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let fallback = directive.unwrap_or(DEFAULT_LOG_DIRECTIVE);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
