use chrono::{DateTime, TimeZone, Utc};

/// First second of 2015, the epoch Discord snowflakes count from.
const DISCORD_EPOCH_MILLIS: i64 = 1_420_070_400_000;

/// Extracts the mint timestamp embedded in a Discord snowflake id.
///
/// Snowflakes carry their creation time in the upper 42 bits, measured in
/// milliseconds since the Discord epoch. Returns `None` when the value does
/// not parse as a snowflake.
///
/// # Arguments
/// - `id` - Snowflake id as its decimal string representation
///
/// # Returns
/// - `Some(DateTime<Utc>)` - Moment the id was minted
/// - `None` - The string is not a valid snowflake
pub fn minted_at(id: &str) -> Option<DateTime<Utc>> {
    let raw = id.parse::<u64>().ok()?;
    let millis = (raw >> 22) as i64 + DISCORD_EPOCH_MILLIS;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Builds a snowflake string minted at the given moment.
    fn snowflake_at(moment: DateTime<Utc>) -> String {
        let millis = moment.timestamp_millis() - DISCORD_EPOCH_MILLIS;
        ((millis as u64) << 22).to_string()
    }

    #[test]
    fn extracts_embedded_timestamp() {
        let moment = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        let id = snowflake_at(moment);

        let minted = minted_at(&id).unwrap();

        assert!((minted - moment).abs() < Duration::seconds(1));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(minted_at("not-a-snowflake").is_none());
    }
}
