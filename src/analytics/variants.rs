//! # Variant Aggregation
//!
//! Groups cases by the ordered sequence of their activity names.
//!
//! Variants are ranked by case count (descending); ties keep the order in
//! which the sequence first appears when cases are walked in case-id order.
//! A variant's `id` is its 1-based rank in the unfiltered listing, so ids
//! stay stable when the listing is filtered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::constants::{round_percent, ActivityName};
use crate::models::Activity;

/// How a case's activities are turned into a sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceMode {
    /// Distinct names in order of first occurrence
    #[default]
    Distinct,
    /// Consecutive repeats collapsed
    Consecutive,
    /// Every activity
    Full,
}

impl SequenceMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Distinct => "distinct",
            Self::Consecutive => "consecutive",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for SequenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SequenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distinct" => Ok(Self::Distinct),
            "consecutive" => Ok(Self::Consecutive),
            "full" => Ok(Self::Full),
            _ => Err(format!(
                "Invalid variant mode: {s}. Use distinct, consecutive or full"
            )),
        }
    }
}

/// The activities of one case in timestamp order
#[derive(Debug, Clone, PartialEq)]
pub struct CaseTrace {
    pub case_id: String,
    pub activities: Vec<ActivityName>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl CaseTrace {
    pub fn throughput_seconds(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn sequence(&self, mode: SequenceMode) -> Vec<ActivityName> {
        match mode {
            SequenceMode::Full => self.activities.clone(),
            SequenceMode::Consecutive => {
                let mut sequence = self.activities.clone();
                sequence.dedup();
                sequence
            }
            SequenceMode::Distinct => {
                let mut sequence: Vec<ActivityName> = Vec::with_capacity(self.activities.len());
                for name in &self.activities {
                    if !sequence.contains(name) {
                        sequence.push(*name);
                    }
                }
                sequence
            }
        }
    }

    /// Whether every name in `names` occurs in the case
    pub fn contains_all(&self, names: &[ActivityName]) -> bool {
        names.iter().all(|name| self.activities.contains(name))
    }
}

/// Build one trace per case, ordered by case id.
///
/// Activities within a case are ordered by timestamp, then id.
pub fn build_traces(activities: &[Activity]) -> Vec<CaseTrace> {
    let mut by_case: BTreeMap<&str, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        by_case.entry(&activity.case_id).or_default().push(activity);
    }

    by_case
        .into_iter()
        .filter_map(|(case_id, mut rows)| {
            rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
            let first = rows.first()?;
            let last = rows.last()?;
            Some(CaseTrace {
                case_id: case_id.to_string(),
                started_at: first.timestamp,
                ended_at: last.timestamp,
                activities: rows.iter().map(|a| a.name).collect(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub id: u64,
    pub activities: Vec<ActivityName>,
    pub cases: Vec<String>,
    pub number_cases: u64,
    /// Share of the case population, rounded to two decimals
    pub percentage: f64,
    /// Mean case throughput time in seconds
    pub avg_time: f64,
}

/// Group traces into ranked variants
pub fn compute_variants(traces: &[CaseTrace], mode: SequenceMode) -> Vec<Variant> {
    let total = traces.len();
    if total == 0 {
        return Vec::new();
    }

    let mut positions: HashMap<Vec<ActivityName>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<ActivityName>, Vec<&CaseTrace>)> = Vec::new();

    for trace in traces {
        let sequence = trace.sequence(mode);
        match positions.get(&sequence) {
            Some(&index) => groups[index].1.push(trace),
            None => {
                positions.insert(sequence.clone(), groups.len());
                groups.push((sequence, vec![trace]));
            }
        }
    }

    // Stable sort keeps first-appearance order between equal counts
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    groups
        .into_iter()
        .enumerate()
        .map(|(rank, (activities, members))| {
            let number_cases = members.len();
            let total_seconds: f64 = members.iter().map(|t| t.throughput_seconds()).sum();
            Variant {
                id: rank as u64 + 1,
                activities,
                cases: members.iter().map(|t| t.case_id.clone()).collect(),
                number_cases: number_cases as u64,
                percentage: round_percent(number_cases as f64 * 100.0 / total as f64),
                avg_time: total_seconds / number_cases as f64,
            }
        })
        .collect()
}

/// Replace ranks of a filtered listing with the ids of the same sequences in the global listing
pub fn assign_global_ids(filtered: &mut [Variant], global: &[Variant]) {
    let ids: HashMap<&[ActivityName], u64> = global
        .iter()
        .map(|v| (v.activities.as_slice(), v.id))
        .collect();

    for variant in filtered.iter_mut() {
        if let Some(id) = ids.get(variant.activities.as_slice()) {
            variant.id = *id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ActivityName::*;

    fn trace(case_id: &str, names: &[ActivityName], seconds: i64) -> CaseTrace {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CaseTrace {
            case_id: case_id.to_string(),
            activities: names.to_vec(),
            started_at: start,
            ended_at: start + Duration::seconds(seconds),
        }
    }

    #[test]
    fn test_two_to_one_split() {
        let traces = vec![
            trace("A", &[Create, Update, Close], 100),
            trace("B", &[Create, Update, Close], 300),
            trace("C", &[Create, Close], 50),
        ];

        let variants = compute_variants(&traces, SequenceMode::Distinct);

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].id, 1);
        assert_eq!(variants[0].activities, vec![Create, Update, Close]);
        assert_eq!(variants[0].cases, vec!["A", "B"]);
        assert_eq!(variants[0].number_cases, 2);
        assert_eq!(variants[0].percentage, 66.67);
        assert_eq!(variants[0].avg_time, 200.0);
        assert_eq!(variants[1].id, 2);
        assert_eq!(variants[1].percentage, 33.33);
        assert_eq!(variants[1].avg_time, 50.0);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let traces = vec![
            trace("A", &[Create, Close], 1),
            trace("B", &[Create, Cancel], 1),
            trace("C", &[Create, Cancel], 1),
            trace("D", &[Create, Close], 1),
            trace("E", &[Create], 1),
        ];

        let variants = compute_variants(&traces, SequenceMode::Distinct);
        let sequences: Vec<_> = variants.iter().map(|v| v.activities.clone()).collect();
        assert_eq!(
            sequences,
            vec![vec![Create, Close], vec![Create, Cancel], vec![Create]]
        );
    }

    #[test]
    fn test_sequence_modes() {
        let t = trace("A", &[Create, Update, Update, Review, Update, Close], 1);

        assert_eq!(t.sequence(SequenceMode::Distinct), vec![Create, Update, Review, Close]);
        assert_eq!(
            t.sequence(SequenceMode::Consecutive),
            vec![Create, Update, Review, Update, Close]
        );
        assert_eq!(t.sequence(SequenceMode::Full).len(), 6);
    }

    #[test]
    fn test_global_ids_survive_filtering() {
        let traces = vec![
            trace("A", &[Create, Update, Close], 1),
            trace("B", &[Create, Update, Close], 1),
            trace("C", &[Create, Close], 1),
        ];
        let global = compute_variants(&traces, SequenceMode::Distinct);

        let mut filtered = compute_variants(&traces[2..], SequenceMode::Distinct);
        assert_eq!(filtered[0].id, 1);
        assert_eq!(filtered[0].percentage, 100.0);

        assign_global_ids(&mut filtered, &global);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_empty_population() {
        assert!(compute_variants(&[], SequenceMode::Full).is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("FULL".parse::<SequenceMode>(), Ok(SequenceMode::Full));
        assert!("sometimes".parse::<SequenceMode>().is_err());
    }
}
