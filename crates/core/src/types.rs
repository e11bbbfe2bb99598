//! Call log and thread statistics types.
//!
//! A [`CallRecord`] is one logged execution span. Calls where
//! `id == turn_id` are *turns*: the root of one request/response exchange
//! within a conversation thread. Descendant calls (tool calls, sub-ops)
//! share the parent's `turn_id` and are excluded from thread statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a project that owns calls and objects.
///
/// Projects partition the call log; every query is scoped to one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a project id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        ProjectId(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// One logged call: a span of execution with inputs, output, and lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Unique call id
    pub id: String,
    /// Trace this call belongs to
    pub trace_id: String,
    /// Id of the turn this call is part of (equals `id` for the turn itself)
    pub turn_id: String,
    /// Conversation thread, if any. `None` or `""` means "no thread".
    pub thread_id: Option<String>,
    /// Parent call, if this is a descendant
    pub parent_id: Option<String>,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// End timestamp; `None` while the call is still running
    pub ended_at: Option<DateTime<Utc>>,
    /// Call inputs
    pub inputs: serde_json::Value,
    /// Call output, if finished
    pub output: Option<serde_json::Value>,
    /// Post-hoc summary payload
    pub summary: Option<serde_json::Value>,
    /// Free-form attributes
    pub attributes: serde_json::Value,
}

impl CallRecord {
    /// A call is a turn iff it is its own turn root.
    pub fn is_turn(&self) -> bool {
        self.id == self.turn_id
    }

    /// Whether this call belongs to a thread.
    ///
    /// Both `None` and the empty string mean "no thread"; such calls are
    /// excluded from thread aggregation.
    pub fn in_thread(&self) -> bool {
        matches!(&self.thread_id, Some(t) if !t.is_empty())
    }
}

/// Sentinel value for percentile columns a backend cannot compute.
///
/// The row-store dialect has no percentile aggregate, so it emits this
/// constant. Callers must treat it as "unavailable", never as a duration.
pub const PERCENTILE_UNAVAILABLE: f64 = -1.0;

/// Per-thread conversation statistics, derived from the call log.
///
/// Never stored: this is the row shape produced by executing a compiled
/// thread query against either backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadStatsRow {
    /// The thread these statistics describe
    pub thread_id: String,
    /// Number of turn calls in the thread
    pub turn_count: u64,
    /// Earliest turn start
    pub start_time: DateTime<Utc>,
    /// Latest turn end
    pub last_updated: DateTime<Utc>,
    /// Id of the turn with the earliest start
    pub first_turn_id: String,
    /// Id of the turn with the latest end
    pub last_turn_id: String,
    /// 50th percentile turn duration, or [`PERCENTILE_UNAVAILABLE`]
    pub p50_turn_duration_ms: f64,
    /// 99th percentile turn duration, or [`PERCENTILE_UNAVAILABLE`]
    pub p99_turn_duration_ms: f64,
}

impl ThreadStatsRow {
    /// Whether the percentile columns carry real values.
    pub fn has_percentiles(&self) -> bool {
        self.p50_turn_duration_ms != PERCENTILE_UNAVAILABLE
            && self.p99_turn_duration_ms != PERCENTILE_UNAVAILABLE
    }
}
