use std::collections::BTreeSet;

use proptest::prelude::*;

use footfall_core::day::day_of;
use footfall_core::merge::{merge_daily, record_count};
use footfall_core::model::{CountSnapshot, DailyMetric};
use footfall_core::retention::prune_series;

// Days drawn from a two-year window so generated series actually
// collide on timestamps.
fn arb_day_start() -> impl Strategy<Value = String> + Clone {
    (2024u32..2026, 1u32..13, 1u32..29)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}T00:00:00Z"))
}

fn arb_metric() -> impl Strategy<Value = DailyMetric> + Clone {
    (arb_day_start(), 0u64..100_000, 0u64..10_000).prop_map(|(timestamp, count, uniques)| {
        DailyMetric {
            timestamp,
            count,
            uniques,
        }
    })
}

fn arb_series() -> impl Strategy<Value = Vec<DailyMetric>> + Clone {
    prop::collection::vec(arb_metric(), 0..30)
}

fn arb_floor() -> impl Strategy<Value = String> + Clone {
    (2024u32..2026, 1u32..13, 1u32..29)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}"))
}

fn timestamps(series: &[DailyMetric]) -> Vec<String> {
    series.iter().map(|entry| entry.timestamp.clone()).collect()
}

proptest! {
    // 10,000 cases is cheap for string-keyed merges of small series.
    #![proptest_config(proptest::test_runner::Config::with_cases(10000))]

    #[test]
    fn merged_series_is_strictly_sorted(existing in arb_series(), incoming in arb_series()) {
        let merged = merge_daily(&existing, &incoming, None);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn merged_keys_are_the_union_of_inputs(existing in arb_series(), incoming in arb_series()) {
        let merged = merge_daily(&existing, &incoming, None);
        let expected: BTreeSet<String> = timestamps(&existing)
            .into_iter()
            .chain(timestamps(&incoming))
            .collect();
        let got: BTreeSet<String> = timestamps(&merged).into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn merge_is_idempotent(existing in arb_series(), incoming in arb_series()) {
        let once = merge_daily(&existing, &incoming, None);
        let twice = merge_daily(&once, &incoming, None);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn last_incoming_entry_wins_its_timestamp(existing in arb_series(), incoming in arb_series()) {
        let merged = merge_daily(&existing, &incoming, None);
        for entry in incoming.iter().rev() {
            // Only the last incoming occurrence of a timestamp is binding.
            let last_for_key = incoming
                .iter()
                .rev()
                .find(|candidate| candidate.timestamp == entry.timestamp)
                .expect("entry exists in its own series");
            let in_merged = merged
                .iter()
                .find(|candidate| candidate.timestamp == entry.timestamp)
                .expect("incoming timestamp must be admitted without a floor");
            prop_assert_eq!(in_merged, last_for_key);
        }
    }

    #[test]
    fn floor_admits_nothing_earlier(existing in arb_series(), incoming in arb_series(), floor in arb_floor()) {
        let merged = merge_daily(&existing, &incoming, Some(&floor));

        // Every pre-floor merged entry must come from existing history;
        // the floor gates admission, not retention.
        let existing_keys: BTreeSet<String> = timestamps(&existing).into_iter().collect();
        for entry in &merged {
            if day_of(&entry.timestamp) < floor.as_str() {
                prop_assert!(existing_keys.contains(&entry.timestamp));
            }
        }

        // And all existing keys survive, floored or not.
        let merged_keys: BTreeSet<String> = timestamps(&merged).into_iter().collect();
        for key in &existing_keys {
            prop_assert!(merged_keys.contains(key));
        }
    }

    #[test]
    fn prune_retains_exactly_the_window(series in arb_series(), cutoff in arb_floor()) {
        let mut pruned = series.clone();
        let removed = prune_series(&mut pruned, &cutoff);

        prop_assert_eq!(removed, series.len() - pruned.len());
        for entry in &pruned {
            prop_assert!(day_of(&entry.timestamp) >= cutoff.as_str());
        }
        // Pruning again removes nothing.
        let mut again = pruned.clone();
        prop_assert_eq!(prune_series(&mut again, &cutoff), 0);
    }

    #[test]
    fn repeated_count_snapshots_stay_unique_per_day(days in prop::collection::vec(arb_day_start(), 1..20)) {
        let mut series: Vec<CountSnapshot> = Vec::new();
        for (value, day) in days.iter().enumerate() {
            record_count(&mut series, day, value as u64);
        }
        let unique_days: BTreeSet<&str> = days.iter().map(|day| day_of(day)).collect();
        prop_assert_eq!(series.len(), unique_days.len());
        for pair in series.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
