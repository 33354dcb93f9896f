//! Append-only query event log
//!
//! `QueryLog` is the raw fact store behind the analytics API: an ordered
//! list of [`QueryEvent`]s. Creation appends; the only permitted mutation
//! afterwards is a single rating assignment per event. The log owns event
//! lifetime exclusively — callers see slices, never mutable access.

use crate::types::{QueryEvent, Rating};

/// Ordered, append-only record of query events
#[derive(Debug, Default, Clone)]
pub struct QueryLog {
    events: Vec<QueryEvent>,
}

impl QueryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new event stamped with the current time
    ///
    /// The query text is stored verbatim — no trimming, no dedup.
    /// Validation (e.g. rejecting empty queries) is the caller's job.
    pub fn record(
        &mut self,
        query: impl Into<String>,
        response_time: f64,
        relevance_score: Option<f64>,
    ) {
        self.events
            .push(QueryEvent::new(query, response_time, relevance_score));
    }

    /// Assign a rating to the first unrated event with exactly this query text
    ///
    /// First-match-wins: scans in insertion order and rates the first event
    /// whose text is equal and whose rating is still unset. Returns whether
    /// a rating was applied; no match is a silent no-op, not an error, so a
    /// second rating attempt on the same answer changes nothing.
    pub fn rate(&mut self, query: &str, rating: Rating) -> bool {
        match self
            .events
            .iter_mut()
            .find(|e| e.query == query && e.rating.is_none())
        {
            Some(event) => {
                event.rating = Some(rating);
                true
            }
            None => false,
        }
    }

    /// Discard all events, resetting to an empty log. Irreversible.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// All events in insertion order
    pub fn events(&self) -> &[QueryEvent] {
        &self.events
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replace the whole log with a restored snapshot
    ///
    /// Used by the load-on-start persistence hook.
    pub fn replace(&mut self, events: Vec<QueryEvent>) {
        self.events = events;
    }
}
