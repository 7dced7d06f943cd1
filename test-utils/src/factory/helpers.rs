//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created entity gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Builds a Discord snowflake string whose embedded timestamp is `moment`.
///
/// Useful for request interaction ids whose mint time anchors the expiry
/// window.
pub fn snowflake_at(moment: chrono::DateTime<chrono::Utc>) -> String {
    let discord_epoch_millis = 1_420_070_400_000;
    let millis = moment.timestamp_millis() - discord_epoch_millis;
    ((millis as u64) << 22).to_string()
}
