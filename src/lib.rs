//! # rag-analytics
//!
//! Query event log and rolling usage metrics for a RAG Q&A chat service.
//!
//! ## Overview
//!
//! `rag-analytics` records every question/answer exchange (timing,
//! relevance, user rating) in an append-only log and derives dashboard
//! metrics from it on demand: summary totals, a satisfaction rate, a
//! daily trend series, and a top-queries ranking. Snapshots persist
//! through a pluggable [`StateStore`] so the log survives restarts.
//!
//! ## Quick Start
//!
//! ```rust
//! use rag_analytics::{AnalyticsStore, Rating};
//!
//! # async fn example() -> rag_analytics::Result<()> {
//! let store = AnalyticsStore::new();
//!
//! // Record an answered question, then the user's reaction to it
//! store.record("what is a vector store?", 1.2, Some(85.0)).await?;
//! store.rate("what is a vector store?", Rating::Positive).await?;
//!
//! let metrics = store.summary().await;
//! assert_eq!(metrics.total_questions, 1);
//! assert_eq!(metrics.satisfaction_rate(), 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **QueryLog** — append-only record of [`QueryEvent`]s; the only
//!   mutation after creation is a single rating assignment per event
//! - **metrics** — pure aggregation functions, recomputed per call
//! - **AnalyticsStore** — lock-guarded store combining the log, the
//!   aggregation reads, and the save-on-mutation persistence hook
//! - **StateStore** trait — snapshot persistence backends (JSON file,
//!   in-memory)

pub mod error;
pub mod log;
pub mod metrics;
pub mod state;
pub mod store;
pub mod types;

// Re-export core types
pub use error::{AnalyticsError, Result};
pub use log::QueryLog;
pub use metrics::{TOP_QUERIES_LIMIT, TREND_WINDOW_DAYS};
pub use state::{FileStateStore, MemoryStateStore, StateStore, STORAGE_KEY};
pub use store::AnalyticsStore;
pub use types::{DailyPoint, Metrics, QueryEvent, QueryStat, Rating};
