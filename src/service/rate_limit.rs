//! Sliding-window admission limiter with escalating lockouts.
//!
//! Every identity gets a bucket of hit timestamps inside a sliding window.
//! Exceeding the window capacity locks the identity out; the lockout length
//! grows with the density of the burst and with every repeated denial, capped
//! at 28 days. Buckets are pure in-memory state: a restart clears all
//! limiters, which is accepted.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Ceiling for a single lockout.
const MAX_BLOCK_DAYS: i64 = 28;

/// Saturation point for the repeat-offender multiplier.
const REPEAT_OFFENDER_CAP: u32 = 5;

/// Admission state of a single identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitBucket {
    /// Hits recorded inside the sliding window, oldest first.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Until when the identity is locked out, if it is.
    pub blocked_end_at: Option<DateTime<Utc>>,
    /// How often the identity has been denied; grows monotonically and
    /// lengthens every subsequent lockout.
    pub blocked_count: u32,
}

impl RateLimitBucket {
    fn prune(&mut self, now: DateTime<Utc>, window: Duration) {
        self.timestamps.retain(|ts| *ts > now - window);
    }

    /// Lengthens the lockout after a denial.
    ///
    /// The clustering score awards 2 points to a hit with no neighbor within
    /// one second and 1 point otherwise, so sparse probing locks out longer
    /// per hit than a single dense burst. The score scales a base span of
    /// `round(window / (capacity / 2))` milliseconds, multiplied by the
    /// number of denials so far (saturating at 5) and capped at 28 days.
    /// The lockout end never moves backwards.
    fn escalate(&mut self, now: DateTime<Utc>, window_millis: i64, capacity: usize) {
        let mut score: i64 = 0;
        for (i, ts) in self.timestamps.iter().enumerate() {
            let isolated = self
                .timestamps
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || (*other - *ts).abs() > Duration::seconds(1));
            score += if isolated { 2 } else { 1 };
        }

        let base = (window_millis as f64 / (capacity as f64 / 2.0)).round() as i64;

        self.blocked_count += 1;
        let multiplier = i64::from(self.blocked_count.min(REPEAT_OFFENDER_CAP));

        let blocked_millis = (score * base)
            .saturating_mul(multiplier)
            .min(Duration::days(MAX_BLOCK_DAYS).num_milliseconds());

        let candidate = now + Duration::milliseconds(blocked_millis);
        self.blocked_end_at = Some(match self.blocked_end_at {
            Some(previous) if previous > candidate => previous,
            _ => candidate,
        });
    }
}

/// Admission limiter keyed by arbitrary string identities.
pub struct RateLimiter {
    window_millis: i64,
    capacity: usize,
    buckets: Mutex<HashMap<String, RateLimitBucket>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `capacity` hits per identity inside a
    /// sliding window of `window_millis` milliseconds.
    pub fn new(window_millis: i64, capacity: usize) -> Self {
        Self {
            window_millis,
            capacity,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a snapshot of the identity's bucket, creating it if missing.
    pub fn get(&self, id: &str) -> RateLimitBucket {
        let mut buckets = self.lock_buckets();
        buckets.entry(id.to_string()).or_default().clone()
    }

    /// Records a hit if capacity remains and returns the admission decision.
    ///
    /// Denials escalate the identity's lockout; while a lockout is active
    /// every call is denied immediately without recording a hit, but still
    /// counts as a denial and can extend the lockout further.
    pub fn is_allowed(&self, id: &str) -> bool {
        self.check_at(id, Utc::now())
    }

    /// How many hits the identity has left inside the current window.
    pub fn remaining(&self, id: &str) -> usize {
        let now = Utc::now();
        let mut buckets = self.lock_buckets();
        let bucket = buckets.entry(id.to_string()).or_default();
        bucket.prune(now, Duration::milliseconds(self.window_millis));

        self.capacity.saturating_sub(bucket.timestamps.len())
    }

    /// Admission check against an explicit instant.
    pub(crate) fn check_at(&self, id: &str, now: DateTime<Utc>) -> bool {
        let mut buckets = self.lock_buckets();
        let bucket = buckets.entry(id.to_string()).or_default();
        bucket.prune(now, Duration::milliseconds(self.window_millis));

        if bucket.blocked_end_at.is_some_and(|end| end > now) {
            bucket.escalate(now, self.window_millis, self.capacity);
            return false;
        }

        if bucket.timestamps.len() < self.capacity {
            bucket.timestamps.push(now);
            true
        } else {
            bucket.escalate(now, self.window_millis, self.capacity);
            false
        }
    }

    fn lock_buckets(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateLimitBucket>> {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    /// Tests that hits inside capacity are admitted and the overflowing hit
    /// is denied with a lockout in the future.
    #[test]
    fn denies_once_capacity_is_exhausted() {
        let limiter = RateLimiter::new(120_000, 5);
        let now = instant();

        for _ in 0..5 {
            assert!(limiter.check_at("42", now));
        }
        assert!(!limiter.check_at("42", now));

        let bucket = limiter.get("42");
        assert_eq!(bucket.blocked_count, 1);
        assert!(bucket.blocked_end_at.unwrap() > now);
    }

    /// Tests that a denial while already locked out records no hit but still
    /// increments the denial count.
    #[test]
    fn blocked_calls_count_denials_without_recording_hits() {
        let limiter = RateLimiter::new(120_000, 5);
        let now = instant();

        for _ in 0..5 {
            assert!(limiter.check_at("42", now));
        }
        assert!(!limiter.check_at("42", now));
        let hits_after_first_denial = limiter.get("42").timestamps.len();

        assert!(!limiter.check_at("42", now + Duration::seconds(1)));

        let bucket = limiter.get("42");
        assert_eq!(bucket.timestamps.len(), hits_after_first_denial);
        assert_eq!(bucket.blocked_count, 2);
    }

    /// Tests that the lockout end never moves backwards across repeated
    /// denials, even once the window has pruned all recorded hits.
    #[test]
    fn lockout_is_monotonically_non_decreasing() {
        let limiter = RateLimiter::new(120_000, 5);
        let now = instant();

        for _ in 0..5 {
            assert!(limiter.check_at("42", now));
        }
        assert!(!limiter.check_at("42", now));

        let mut previous_end = limiter.get("42").blocked_end_at.unwrap();
        for i in 1..=3 {
            assert!(!limiter.check_at("42", now + Duration::seconds(i)));
            let end = limiter.get("42").blocked_end_at.unwrap();
            assert!(end >= previous_end);
            previous_end = end;
        }
    }

    /// Tests that hits older than the window are pruned and free capacity
    /// again when no lockout is active.
    #[test]
    fn window_pruning_frees_capacity() {
        let limiter = RateLimiter::new(120_000, 5);
        let now = instant();

        for _ in 0..5 {
            assert!(limiter.check_at("42", now));
        }
        assert!(limiter.check_at("42", now + Duration::milliseconds(120_001)));
    }

    /// Tests that isolated hits score higher than clustered ones, producing
    /// a longer lockout for the sparse burst.
    #[test]
    fn sparse_hits_lock_out_longer_than_dense_ones() {
        let window = 600_000;
        let dense = RateLimiter::new(window, 3);
        let sparse = RateLimiter::new(window, 3);
        let now = instant();

        for _ in 0..3 {
            assert!(dense.check_at("42", now));
        }
        assert!(!dense.check_at("42", now));

        for i in 0..3 {
            assert!(sparse.check_at("42", now + Duration::seconds(i * 10)));
        }
        assert!(!sparse.check_at("42", now + Duration::seconds(30)));

        let dense_lockout = dense.get("42").blocked_end_at.unwrap() - now;
        let sparse_lockout =
            sparse.get("42").blocked_end_at.unwrap() - (now + Duration::seconds(30));
        assert!(sparse_lockout > dense_lockout);
    }

    /// Tests the 28 day ceiling on a single lockout.
    #[test]
    fn lockout_is_capped_at_twenty_eight_days() {
        let limiter = RateLimiter::new(10_000_000_000, 2);
        let now = instant();

        assert!(limiter.check_at("42", now));
        assert!(limiter.check_at("42", now));
        assert!(!limiter.check_at("42", now));

        let end = limiter.get("42").blocked_end_at.unwrap();
        assert_eq!(end, now + Duration::days(28));
    }

    /// Tests that buckets are independent per identity.
    #[test]
    fn identities_do_not_share_buckets() {
        let limiter = RateLimiter::new(120_000, 1);
        let now = instant();

        assert!(limiter.check_at("a", now));
        assert!(limiter.check_at("b", now));
        assert!(!limiter.check_at("a", now));
        assert_eq!(limiter.get("b").blocked_count, 0);
    }
}
