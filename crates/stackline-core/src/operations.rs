//! Operational log queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filters for retrieving a stack's operational logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Only entries at or after this time.
    pub start_time: Option<DateTime<Utc>>,
    /// Only entries before this time.
    pub end_time: Option<DateTime<Utc>>,
    /// Only entries whose resource name matches this filter.
    pub resource_filter: Option<String>,
}

/// A single log line emitted by a managed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
