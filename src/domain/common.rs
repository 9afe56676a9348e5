//! Shared traits for the dashboard's entity collections.

/// Exposes the caller-assigned identifier every stored entity carries.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde;
