//! Error types for rag-analytics

use thiserror::Error;

/// Errors that can occur in the analytics store
///
/// The in-memory log and the aggregation functions never fail; errors
/// only arise at the persistence seam (snapshot save/load).
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// State store read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
