//! Proptest strategies for event logs

use chrono::Duration;
use proptest::prelude::*;

use super::{activity, day};
use process_mining::models::Activity;
use process_mining::ActivityName;

pub fn activity_name_strategy() -> impl Strategy<Value = ActivityName> {
    prop::sample::select(ActivityName::ALL.to_vec())
}

pub fn case_id_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]).prop_map(str::to_string)
}

/// Random event logs: unique ids, timestamps within one week
pub fn event_log_strategy() -> impl Strategy<Value = Vec<Activity>> {
    prop::collection::vec(
        (case_id_strategy(), activity_name_strategy(), 0i64..10_080),
        0..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (case_id, name, minutes))| {
                let mut row = activity(index as i64 + 1, &case_id, name, day(1), 0);
                row.timestamp = day(1) + Duration::minutes(minutes);
                row
            })
            .collect()
    })
}

/// (total, page_size, page) triples for pagination
pub fn pagination_strategy() -> impl Strategy<Value = (usize, u64, u64)> {
    (0usize..200, 1u64..50, 1u64..20)
}
