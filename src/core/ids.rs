//! Identifier helpers for callers creating new entities.
//!
//! The store never assigns ids. Presentation code picks one of these before calling `add_*`.

use crate::core::time::Clock;

/// Milliseconds since the Unix epoch, rendered as a decimal string.
///
/// Two calls within the same millisecond produce the same id; the store does not detect this.
pub fn timestamp_id(clock: &dyn Clock) -> String {
    clock.now().timestamp_millis().to_string()
}

/// [`timestamp_id`], stepped forward one millisecond at a time while `taken` reports a clash.
pub fn unique_timestamp_id(clock: &dyn Clock, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = clock.now().timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !taken(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}
