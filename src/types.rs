//! Core types for the analytics event log
//!
//! All types use camelCase JSON serialization so snapshots stay
//! compatible with previously recorded dashboard blobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary user judgment on one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
}

/// One recorded question/answer exchange
///
/// Created atomically at record time; the only mutation afterwards is
/// a single rating assignment. Never deleted individually — the log is
/// cleared wholesale or not at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEvent {
    /// Question text, stored verbatim (duplicates included)
    pub query: String,

    /// Creation time, immutable once set
    pub timestamp: DateTime<Utc>,

    /// Seconds between dispatch and answer arrival
    pub response_time: f64,

    /// Answer relevance in [0, 100]; absent means not scored
    ///
    /// A score of exactly 0 is recorded for failed answer attempts so
    /// they show up in volume metrics without skewing the relevance
    /// average (aggregation treats 0 as unscored).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,

    /// User rating; unset until the user reacts, set at most once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl QueryEvent {
    /// Create a new event stamped with the current time
    pub fn new(
        query: impl Into<String>,
        response_time: f64,
        relevance_score: Option<f64>,
    ) -> Self {
        Self {
            query: query.into(),
            timestamp: Utc::now(),
            response_time,
            relevance_score,
            rating: None,
        }
    }
}

/// Summary statistics over the whole event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Total recorded events
    pub total_questions: u64,

    /// Events rated positive
    pub positive_ratings: u64,

    /// Events rated negative
    pub negative_ratings: u64,

    /// Mean relevance over scored events (score present and nonzero),
    /// rounded to 1 decimal; 0 if none qualify
    pub average_relevance: f64,

    /// Events recorded on the current local calendar day
    pub questions_today: u64,

    /// Mean response time over all events, rounded to 1 decimal;
    /// 0 for an empty log
    pub response_time: f64,
}

impl Metrics {
    /// Share of rated events that were positive, as a percentage
    ///
    /// 0 when nothing has been rated yet.
    pub fn satisfaction_rate(&self) -> f64 {
        let rated = self.positive_ratings + self.negative_ratings;
        if rated == 0 {
            return 0.0;
        }
        self.positive_ratings as f64 / rated as f64 * 100.0
    }
}

/// One day in the trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// Zero-padded `dd/mm` label for the local calendar day
    pub date: String,

    /// Questions recorded that day
    pub questions: u64,

    /// Percentage of that day's rated events that were positive,
    /// rounded to the nearest integer; 0 when no rated events
    pub positive_rate: u32,
}

/// One entry in the top-queries ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStat {
    /// Exact question text the group collapses on
    pub query: String,

    /// Events sharing that exact text
    pub count: u64,

    /// Mean rating over rated group members (positive = 5, negative = 1);
    /// 0 when none are rated
    pub avg_rating: f64,
}
