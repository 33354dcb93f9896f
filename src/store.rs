//! High-level analytics store
//!
//! `AnalyticsStore` wraps the append-only [`QueryLog`] with locking,
//! optional snapshot persistence, and the aggregation read API. It is
//! meant to be constructed once at the composition root and passed by
//! reference to whichever component records or reads analytics.

use crate::error::Result;
use crate::log::QueryLog;
use crate::metrics;
use crate::state::StateStore;
use crate::types::{DailyPoint, Metrics, QueryStat, Rating};
use tokio::sync::RwLock;

/// Thread-safe analytics store over the query event log
///
/// Mutations (`record`, `rate`, `clear`) take the write lock and persist
/// a snapshot afterwards when a state store is configured. Reads take the
/// read lock, so they may run concurrently with each other but always see
/// a fully applied state — never a half-finished mutation.
pub struct AnalyticsStore {
    log: RwLock<QueryLog>,
    state: Option<Box<dyn StateStore>>,
}

impl AnalyticsStore {
    /// Create an empty store without persistence
    pub fn new() -> Self {
        Self {
            log: RwLock::new(QueryLog::new()),
            state: None,
        }
    }

    /// Create a store backed by a state store
    ///
    /// Loads the last saved snapshot immediately; a corrupt or unreadable
    /// snapshot is a real fault and surfaces as an error. A missing
    /// snapshot loads as an empty log.
    pub fn with_state_store(state: impl StateStore + 'static) -> Result<Self> {
        let events = state.load()?;
        let mut log = QueryLog::new();
        log.replace(events);

        tracing::info!(count = log.len(), "Analytics store restored from snapshot");

        Ok(Self {
            log: RwLock::new(log),
            state: Some(Box::new(state)),
        })
    }

    /// Record a completed question/answer exchange
    ///
    /// Called after every answer attempt, failed ones included (those
    /// carry a relevance score of 0 so they count toward volume but not
    /// toward the relevance average).
    pub async fn record(
        &self,
        query: &str,
        response_time: f64,
        relevance_score: Option<f64>,
    ) -> Result<()> {
        let mut log = self.log.write().await;
        log.record(query, response_time, relevance_score);

        tracing::debug!(
            query = %query,
            response_time,
            relevance_score,
            total = log.len(),
            "Query recorded"
        );

        self.persist(&log)
    }

    /// Apply a user rating to the first unrated event with this query text
    ///
    /// A query with no unrated matching event is a silent no-op — the
    /// user may react twice to the same answer, or to a transcript entry
    /// whose event was cleared.
    pub async fn rate(&self, query: &str, rating: Rating) -> Result<()> {
        let mut log = self.log.write().await;

        if log.rate(query, rating) {
            tracing::debug!(query = %query, ?rating, "Rating applied");
            self.persist(&log)
        } else {
            tracing::debug!(query = %query, ?rating, "No unrated event matched; rating ignored");
            Ok(())
        }
    }

    /// Discard all recorded events
    pub async fn clear(&self) -> Result<()> {
        let mut log = self.log.write().await;
        log.clear();

        tracing::info!("Analytics log cleared");

        self.persist(&log)
    }

    /// Summary statistics over the whole log
    pub async fn summary(&self) -> Metrics {
        let log = self.log.read().await;
        metrics::summary(log.events())
    }

    /// Daily trend series for the last `window_days` days, ending today
    pub async fn daily_series(&self, window_days: usize) -> Vec<DailyPoint> {
        let log = self.log.read().await;
        metrics::daily_series(log.events(), window_days)
    }

    /// Top queries by occurrence count, truncated to `limit`
    pub async fn top_queries(&self, limit: usize) -> Vec<QueryStat> {
        let log = self.log.read().await;
        metrics::top_queries(log.events(), limit)
    }

    /// Number of recorded events
    pub async fn total_events(&self) -> usize {
        let log = self.log.read().await;
        log.len()
    }

    /// Save a snapshot if a state store is configured
    ///
    /// Runs under the write lock so snapshots never interleave. The
    /// in-memory mutation has already applied when this fails — the
    /// caller loses durability, not the write.
    fn persist(&self, log: &QueryLog) -> Result<()> {
        if let Some(state) = &self.state {
            state.save(log.events()).map_err(|e| {
                tracing::warn!(error = %e, "Failed to persist analytics snapshot");
                e
            })?;
        }
        Ok(())
    }
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::new()
    }
}
