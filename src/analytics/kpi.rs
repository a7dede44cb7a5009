//! # Transition KPIs
//!
//! Elapsed time between consecutive activities of a case, aggregated per
//! `(from, to)` edge. Callers apply any date window to the activities before
//! handing them over, so transitions only form between surviving activities.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::constants::ActivityName;
use crate::models::Activity;

/// Statistics for one transition edge.
///
/// An edge without samples reports `samples = 0` and null statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeKpi {
    pub from: ActivityName,
    pub to: ActivityName,
    pub samples: u64,
    pub mean_seconds: Option<f64>,
    pub min_seconds: Option<f64>,
    pub max_seconds: Option<f64>,
}

impl EdgeKpi {
    fn empty(from: ActivityName, to: ActivityName) -> Self {
        Self {
            from,
            to,
            samples: 0,
            mean_seconds: None,
            min_seconds: None,
            max_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub edges: Vec<EdgeKpi>,
}

#[derive(Debug, Default)]
struct Accumulator {
    samples: u64,
    total: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn record(&mut self, seconds: f64) {
        if self.samples == 0 {
            self.min = seconds;
            self.max = seconds;
        } else {
            self.min = self.min.min(seconds);
            self.max = self.max.max(seconds);
        }
        self.samples += 1;
        self.total += seconds;
    }

    fn into_edge(self, from: ActivityName, to: ActivityName) -> EdgeKpi {
        if self.samples == 0 {
            return EdgeKpi::empty(from, to);
        }
        EdgeKpi {
            from,
            to,
            samples: self.samples,
            mean_seconds: Some(self.total / self.samples as f64),
            min_seconds: Some(self.min),
            max_seconds: Some(self.max),
        }
    }
}

/// Seconds between each pair of consecutive activities, per case
pub fn transitions(activities: &[Activity]) -> Vec<(ActivityName, ActivityName, f64)> {
    let mut by_case: BTreeMap<&str, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        by_case.entry(&activity.case_id).or_default().push(activity);
    }

    let mut result = Vec::new();
    for rows in by_case.values_mut() {
        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        for pair in rows.windows(2) {
            result.push((pair[0].name, pair[1].name, pair[1].seconds_since(pair[0].timestamp)));
        }
    }
    result
}

/// Aggregate transition statistics.
///
/// With `edge` set, only that edge is reported, and it is reported even
/// when it has no samples.
pub fn compute_kpis(
    activities: &[Activity],
    edge: Option<(ActivityName, ActivityName)>,
) -> KpiReport {
    let mut accumulators: HashMap<(ActivityName, ActivityName), Accumulator> = HashMap::new();

    for (from, to, seconds) in transitions(activities) {
        if edge.is_some_and(|selected| selected != (from, to)) {
            continue;
        }
        accumulators.entry((from, to)).or_default().record(seconds);
    }

    if let Some((from, to)) = edge {
        let edge = accumulators
            .remove(&(from, to))
            .unwrap_or_default()
            .into_edge(from, to);
        return KpiReport { edges: vec![edge] };
    }

    let mut edges: Vec<EdgeKpi> = accumulators
        .into_iter()
        .map(|((from, to), acc)| acc.into_edge(from, to))
        .collect();
    edges.sort_by(|a, b| {
        b.samples
            .cmp(&a.samples)
            .then_with(|| a.from.as_str().cmp(b.from.as_str()))
            .then_with(|| a.to.as_str().cmp(b.to.as_str()))
    });

    KpiReport { edges }
}
