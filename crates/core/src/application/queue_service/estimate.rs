// Wait-time arithmetic

use super::constants::{
    LARGE_PARTY_MULTIPLIER, LARGE_PARTY_THRESHOLD, LOAD_BLOCK_SIZE, LOAD_BLOCK_SURCHARGE,
};
use crate::domain::entry::MILLIS_PER_MINUTE;
use crate::domain::Minutes;

/// Estimate the wait for a party about to join.
///
/// Formula:
/// estimate = round(historical_average * party_multiplier * queue_size_multiplier)
///
/// - party_multiplier = 1.5 for parties larger than 4, else 1
/// - queue_size_multiplier = ceil(current_size / 5) * 0.1 + 1
///
/// `current_size` is the queue counter before the new party is added.
pub fn estimate_wait_time(historical_average: Minutes, party_size: u32, current_size: u32) -> Minutes {
    let party_multiplier = if party_size > LARGE_PARTY_THRESHOLD {
        LARGE_PARTY_MULTIPLIER
    } else {
        1.0
    };

    let load_blocks = (current_size as f64 / LOAD_BLOCK_SIZE as f64).ceil();
    let queue_size_multiplier = load_blocks * LOAD_BLOCK_SURCHARGE + 1.0;

    (historical_average as f64 * party_multiplier * queue_size_multiplier).round() as Minutes
}

/// Whole minutes between two epoch-ms timestamps
pub fn elapsed_minutes(from_millis: i64, to_millis: i64) -> Minutes {
    ((to_millis - from_millis) as f64 / MILLIS_PER_MINUTE).round() as Minutes
}

/// Two-point moving average used for the queue's rolling wait time.
///
/// Not a true running mean: the latest sample always weighs half.
pub fn rolling_average(previous: Minutes, sample: Minutes) -> Minutes {
    ((previous + sample) as f64 / 2.0).round() as Minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_uses_historical_average() {
        assert_eq!(estimate_wait_time(30, 2, 0), 30);
        assert_eq!(estimate_wait_time(30, 4, 0), 30);
    }

    #[test]
    fn test_large_party_multiplier() {
        assert_eq!(estimate_wait_time(30, 5, 0), 45);
        assert_eq!(estimate_wait_time(30, 8, 0), 45);
    }

    #[test]
    fn test_load_blocks_round_up() {
        // 1..=5 queued parties is one block, 6..=10 two blocks
        assert_eq!(estimate_wait_time(30, 2, 1), 33);
        assert_eq!(estimate_wait_time(30, 2, 5), 33);
        assert_eq!(estimate_wait_time(30, 2, 6), 36);
        assert_eq!(estimate_wait_time(20, 2, 1), 22);
    }

    #[test]
    fn test_multipliers_combine() {
        // 30 * 1.5 * 1.2
        assert_eq!(estimate_wait_time(30, 6, 10), 54);
    }

    #[test]
    fn test_elapsed_minutes_rounds() {
        assert_eq!(elapsed_minutes(0, 20 * 60_000), 20);
        assert_eq!(elapsed_minutes(0, 20 * 60_000 + 29_000), 20);
        assert_eq!(elapsed_minutes(0, 20 * 60_000 + 30_000), 21);
    }

    #[test]
    fn test_rolling_average() {
        assert_eq!(rolling_average(30, 20), 25);
        assert_eq!(rolling_average(25, 0), 13);
        assert_eq!(rolling_average(10, 10), 10);
    }
}
