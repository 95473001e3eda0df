use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How many candidates make up the leading set.
pub const LEADING_SET_SIZE: usize = 10;

/// Column labels of the five vote buckets, in sheet order.
pub const BUCKET_LABELS: [&str; 5] = ["920", "1005", "1165", "1285", "1670"];

/// Per-category vote counts. Field names on the wire are the bucket labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VoteBuckets {
    #[serde(rename = "920", default)]
    pub b920: u64,
    #[serde(rename = "1005", default)]
    pub b1005: u64,
    #[serde(rename = "1165", default)]
    pub b1165: u64,
    #[serde(rename = "1285", default)]
    pub b1285: u64,
    #[serde(rename = "1670", default)]
    pub b1670: u64,
}

impl VoteBuckets {
    pub fn from_counts(counts: [u64; 5]) -> Self {
        let [b920, b1005, b1165, b1285, b1670] = counts;
        Self {
            b920,
            b1005,
            b1165,
            b1285,
            b1670,
        }
    }

    /// `(label, count)` pairs in sheet order.
    pub fn entries(&self) -> [(&'static str, u64); 5] {
        [
            (BUCKET_LABELS[0], self.b920),
            (BUCKET_LABELS[1], self.b1005),
            (BUCKET_LABELS[2], self.b1165),
            (BUCKET_LABELS[3], self.b1285),
            (BUCKET_LABELS[4], self.b1670),
        ]
    }
}

/// One ranked contestant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    /// Surviving-row index from the source, assigned before ranking.
    pub id: u64,
    pub name: String,
    pub flat: String,
    pub total_count: u64,
    pub total_value: f64,
    pub votes: VoteBuckets,
    /// 1-based position after sorting by `total_value` descending.
    #[serde(rename = "position")]
    pub rank: usize,
}

/// Which list the projector is showing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Leaders,
    Remaining,
}

impl ViewState {
    /// The other view. Toggling twice lands back where it started.
    pub fn next(self) -> Self {
        match self {
            ViewState::Leaders => ViewState::Remaining,
            ViewState::Remaining => ViewState::Leaders,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewState::Leaders => "Top 10",
            ViewState::Remaining => "Remaining",
        }
    }
}

/// What the presentation layer should show for the data area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardStatus {
    Loading,
    /// A fetch failed; the candidates are the fallback list.
    ErrorWithFallback(String),
    Live,
}

/// Read-only copy of the scheduler state, taken under one lock.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub rev: u64,
    pub candidates: Arc<[CandidateRecord]>,
    pub view: ViewState,
    pub countdown_secs: u64,
    pub refresh_count: u64,
    pub loading: bool,
    pub last_error: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
}

impl DashboardSnapshot {
    /// First `LEADING_SET_SIZE` candidates by rank.
    pub fn leading_set(&self) -> &[CandidateRecord] {
        leading_set(&self.candidates)
    }

    /// Everything after the leading set.
    pub fn remaining_set(&self) -> &[CandidateRecord] {
        remaining_set(&self.candidates)
    }

    /// The candidates belonging to the current view.
    pub fn visible(&self) -> &[CandidateRecord] {
        match self.view {
            ViewState::Leaders => self.leading_set(),
            ViewState::Remaining => self.remaining_set(),
        }
    }

    pub fn status(&self) -> DashboardStatus {
        if self.loading {
            DashboardStatus::Loading
        } else if let Some(err) = &self.last_error {
            DashboardStatus::ErrorWithFallback(err.clone())
        } else {
            DashboardStatus::Live
        }
    }
}

pub fn leading_set(candidates: &[CandidateRecord]) -> &[CandidateRecord] {
    &candidates[..candidates.len().min(LEADING_SET_SIZE)]
}

pub fn remaining_set(candidates: &[CandidateRecord]) -> &[CandidateRecord] {
    candidates.get(LEADING_SET_SIZE..).unwrap_or(&[])
}

/// Whole seconds left until the next rotation, never negative.
pub fn countdown_secs(period: Duration, since_switch: Duration) -> u64 {
    period.as_secs().saturating_sub(since_switch.as_secs())
}
