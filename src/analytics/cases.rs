//! # Case Explorer
//!
//! Per-case summaries, single-case timelines and the attribute metadata the
//! dashboard uses to populate its filter widgets.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::variants::build_traces;
use crate::constants::ActivityName;
use crate::models::Activity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub name: ActivityName,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub case: String,
    pub activity_count: u64,
    pub throughput_time_seconds: f64,
    pub first_activity: ActivityPoint,
    pub last_activity: ActivityPoint,
}

/// One summary per case present in `activities`, ordered by case id
pub fn summarize_cases(activities: &[Activity]) -> Vec<CaseSummary> {
    build_traces(activities)
        .into_iter()
        .filter_map(|trace| {
            let first = *trace.activities.first()?;
            let last = *trace.activities.last()?;
            Some(CaseSummary {
                activity_count: trace.activities.len() as u64,
                throughput_time_seconds: trace.throughput_seconds(),
                first_activity: ActivityPoint {
                    name: first,
                    timestamp: trace.started_at,
                },
                last_activity: ActivityPoint {
                    name: last,
                    timestamp: trace.ended_at,
                },
                case: trace.case_id,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub name: ActivityName,
    pub timestamp: DateTime<Utc>,
    pub time_since_first_seconds: f64,
}

/// Timeline of a single case's activities in timestamp order
pub fn case_timeline(activities: &[Activity]) -> Vec<TimelineEntry> {
    let mut ordered: Vec<&Activity> = activities.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

    let Some(first) = ordered.first().map(|a| a.timestamp) else {
        return Vec::new();
    };

    ordered
        .into_iter()
        .map(|activity| TimelineEntry {
            name: activity.name,
            timestamp: activity.timestamp,
            time_since_first_seconds: activity.seconds_since(first),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataAttribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub distincts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub attributes: Vec<MetadataAttribute>,
}

impl Metadata {
    pub fn new(case_ids: Vec<String>, names: Vec<ActivityName>) -> Self {
        Self {
            attributes: vec![
                MetadataAttribute {
                    name: "case",
                    kind: "str",
                    distincts: case_ids,
                },
                MetadataAttribute {
                    name: "timestamp",
                    kind: "date",
                    distincts: Vec::new(),
                },
                MetadataAttribute {
                    name: "name",
                    kind: "str",
                    distincts: names.iter().map(|n| n.as_str().to_string()).collect(),
                },
            ],
        }
    }
}
