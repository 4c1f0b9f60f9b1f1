//! Usage Aggregator.
//!
//! Rolls a user's ledger events up into the counts and averages shown on the
//! dashboard and fed to the credit policy.

use serde::{Deserialize, Serialize};

use crate::period::BillingPeriod;
use crate::usage::UsageEvent;

/// Rollup of one user's usage events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRollup {
    /// Lifetime event count.
    pub total_events: u64,

    /// Events inside the billing period.
    pub events_this_period: u64,

    /// Lifetime mean of scored events, rounded half up. `None` without scored events.
    pub average_score: Option<u32>,
}

/// Summarize events against a billing period.
///
/// Input order does not affect the result.
#[must_use]
pub fn summarize<'a, I>(events: I, period: &BillingPeriod) -> UsageRollup
where
    I: IntoIterator<Item = &'a UsageEvent>,
{
    let mut total_events = 0u64;
    let mut events_this_period = 0u64;
    let mut score_sum = 0u64;
    let mut scored = 0u64;

    for event in events {
        total_events += 1;
        if period.contains(event.occurred_at) {
            events_this_period += 1;
        }
        if let Some(score) = event.score_value {
            score_sum += u64::from(score);
            scored += 1;
        }
    }

    UsageRollup {
        total_events,
        events_this_period,
        average_score: rounded_mean(score_sum, scored),
    }
}

/// Integer mean rounded half up: `floor(sum / n + 1/2)`.
fn rounded_mean(sum: u64, n: u64) -> Option<u32> {
    if n == 0 {
        return None;
    }
    let mean = (sum.saturating_mul(2) + n) / (n * 2);
    Some(u32::try_from(mean).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn period() -> BillingPeriod {
        BillingPeriod::new(
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn event_at(user_id: UserId, at: DateTime<Utc>, score: Option<u32>) -> UsageEvent {
        UsageEvent::analysis(user_id, score).with_occurred_at(at)
    }

    fn scored(scores: &[u32]) -> Vec<UsageEvent> {
        let user_id = UserId::generate();
        let at = period().start();
        scores
            .iter()
            .map(|s| event_at(user_id, at, Some(*s)))
            .collect()
    }

    #[test]
    fn empty_input_yields_zeros_and_no_average() {
        let rollup = summarize(std::iter::empty(), &period());

        assert_eq!(rollup.total_events, 0);
        assert_eq!(rollup.events_this_period, 0);
        assert_eq!(rollup.average_score, None);
    }

    #[test]
    fn average_of_whole_scores() {
        let rollup = summarize(&scored(&[80, 90, 100]), &period());
        assert_eq!(rollup.average_score, Some(90));
    }

    #[test]
    fn average_rounds_half_up() {
        let rollup = summarize(&scored(&[80, 81]), &period());
        assert_eq!(rollup.average_score, Some(81));

        let rollup = summarize(&scored(&[80, 80, 81]), &period());
        assert_eq!(rollup.average_score, Some(80));
    }

    #[test]
    fn zero_scores_are_not_missing_scores() {
        let rollup = summarize(&scored(&[0, 0]), &period());
        assert_eq!(rollup.average_score, Some(0));
    }

    #[test]
    fn unscored_events_count_but_do_not_average() {
        let user_id = UserId::generate();
        let at = period().start();
        let events = vec![
            event_at(user_id, at, None),
            event_at(user_id, at, Some(70)),
            event_at(user_id, at, None),
        ];

        let rollup = summarize(&events, &period());
        assert_eq!(rollup.total_events, 3);
        assert_eq!(rollup.average_score, Some(70));

        let rollup = summarize(&events[..1], &period());
        assert_eq!(rollup.average_score, None);
    }

    #[test]
    fn period_window_is_half_open() {
        let user_id = UserId::generate();
        let period = period();
        let events = vec![
            event_at(user_id, period.start() - Duration::seconds(1), None),
            event_at(user_id, period.start(), None),
            event_at(user_id, period.end() - Duration::seconds(1), None),
            event_at(user_id, period.end(), None),
        ];

        let rollup = summarize(&events, &period);
        assert_eq!(rollup.total_events, 4);
        assert_eq!(rollup.events_this_period, 2);
    }

    #[test]
    fn result_is_order_independent() {
        let user_id = UserId::generate();
        let period = period();
        let events = vec![
            event_at(user_id, period.start() - Duration::days(3), Some(55)),
            event_at(user_id, period.start(), Some(91)),
            event_at(user_id, period.start() + Duration::days(2), None),
            event_at(user_id, period.end(), Some(78)),
            event_at(user_id, period.start() + Duration::hours(5), Some(100)),
        ];
        let expected = summarize(&events, &period);

        let mut permutation: Vec<usize> = (0..events.len()).collect();
        loop {
            let reordered: Vec<&UsageEvent> = permutation.iter().map(|&i| &events[i]).collect();
            assert_eq!(summarize(reordered, &period), expected);
            if !next_permutation(&mut permutation) {
                break;
            }
        }
    }

    /// Advance to the next lexicographic permutation; false once exhausted.
    fn next_permutation(items: &mut [usize]) -> bool {
        let Some(pivot) = (1..items.len()).rev().find(|&i| items[i - 1] < items[i]) else {
            return false;
        };
        let swap = (pivot..items.len())
            .rev()
            .find(|&j| items[j] > items[pivot - 1])
            .unwrap();
        items.swap(pivot - 1, swap);
        items[pivot..].reverse();
        true
    }
}
