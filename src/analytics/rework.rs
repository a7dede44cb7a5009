//! # Rework Detection
//!
//! A rework is an activity type that occurs more than once within a case.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{round_percent, ActivityName};
use crate::models::Activity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rework {
    #[serde(rename = "case")]
    pub case_id: String,
    pub activity: ActivityName,
    pub occurrences: u64,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

/// Reworks ordered by case id, then by first occurrence
pub fn detect_reworks(activities: &[Activity]) -> Vec<Rework> {
    let mut groups: BTreeMap<(&str, ActivityName), Vec<DateTime<Utc>>> = BTreeMap::new();
    for activity in activities {
        groups
            .entry((activity.case_id.as_str(), activity.name))
            .or_default()
            .push(activity.timestamp);
    }

    let mut reworks: Vec<Rework> = groups
        .into_iter()
        .filter(|(_, stamps)| stamps.len() > 1)
        .filter_map(|((case_id, activity), stamps)| {
            let first_at = *stamps.iter().min()?;
            let last_at = *stamps.iter().max()?;
            Some(Rework {
                case_id: case_id.to_string(),
                activity,
                occurrences: stamps.len() as u64,
                first_at,
                last_at,
            })
        })
        .collect();

    reworks.sort_by(|a, b| {
        a.case_id
            .cmp(&b.case_id)
            .then(a.first_at.cmp(&b.first_at))
            .then_with(|| a.activity.as_str().cmp(b.activity.as_str()))
    });
    reworks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReworkStatus {
    ReworkDominant,
    ReworkUnderControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReworkSummary {
    pub total_cases: u64,
    pub rework_cases: u64,
    pub non_rework_cases: u64,
    /// Percentage of cases with at least one rework
    pub rework_rate: f64,
    pub status: ReworkStatus,
    pub message: String,
}

/// Summarize rework over the cases present in `activities`
pub fn summarize_reworks(activities: &[Activity]) -> ReworkSummary {
    let cases: BTreeSet<&str> = activities.iter().map(|a| a.case_id.as_str()).collect();
    let total_cases = cases.len() as u64;

    let mut rework_case_ids: Vec<String> = detect_reworks(activities)
        .into_iter()
        .map(|r| r.case_id)
        .collect();
    rework_case_ids.dedup();
    let rework_cases = rework_case_ids.len() as u64;
    let non_rework_cases = total_cases - rework_cases;

    let rework_rate = if total_cases == 0 {
        0.0
    } else {
        round_percent(rework_cases as f64 * 100.0 / total_cases as f64)
    };

    let (status, message) = if rework_cases > non_rework_cases {
        (
            ReworkStatus::ReworkDominant,
            format!(
                "Rework is dominant: {rework_cases} of {total_cases} cases repeated at least one activity."
            ),
        )
    } else {
        (
            ReworkStatus::ReworkUnderControl,
            format!(
                "Rework is under control: {rework_cases} of {total_cases} cases repeated an activity."
            ),
        )
    };

    ReworkSummary {
        total_cases,
        rework_cases,
        non_rework_cases,
        rework_rate,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ActivityName::*;

    fn activity(id: i64, case_id: &str, name: ActivityName, offset_seconds: i64) -> Activity {
        Activity {
            id,
            case_id: case_id.to_string(),
            name,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + Duration::seconds(offset_seconds),
            tpt: 0.0,
            user: String::new(),
            user_type: String::new(),
            automatic: false,
            rework: false,
            case_index: String::new(),
        }
    }

    #[test]
    fn test_repeated_activity_is_rework() {
        let activities = vec![
            activity(1, "A", Create, 0),
            activity(2, "A", Review, 10),
            activity(3, "A", Review, 50),
            activity(4, "A", Review, 90),
            activity(5, "B", Create, 0),
        ];

        let reworks = detect_reworks(&activities);

        assert_eq!(reworks.len(), 1);
        assert_eq!(reworks[0].case_id, "A");
        assert_eq!(reworks[0].activity, Review);
        assert_eq!(reworks[0].occurrences, 3);
        assert_eq!((reworks[0].last_at - reworks[0].first_at).num_seconds(), 80);
    }

    #[test]
    fn test_summary_status() {
        let activities = vec![
            activity(1, "A", Review, 0),
            activity(2, "A", Review, 1),
            activity(3, "B", Create, 0),
            activity(4, "C", Create, 0),
        ];

        let summary = summarize_reworks(&activities);
        assert_eq!(summary.total_cases, 3);
        assert_eq!(summary.rework_cases, 1);
        assert_eq!(summary.non_rework_cases, 2);
        assert_eq!(summary.rework_rate, 33.33);
        assert_eq!(summary.status, ReworkStatus::ReworkUnderControl);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "rework-under-control");
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = summarize_reworks(&[]);
        assert_eq!(summary.total_cases, 0);
        assert_eq!(summary.rework_rate, 0.0);
    }
}
