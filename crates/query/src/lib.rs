//! Query compilation for TraceVault.
//!
//! This crate turns a thread-statistics request into `(sql, params)` for one
//! of two backends:
//!
//! - [`Dialect::ClickHouse`] — the analytical column store. Its call table
//!   is populated by a background merge, so one logical call may transiently
//!   exist as several partial rows. The compiler emits a two-level
//!   aggregation that collapses partial rows per call before grouping by
//!   thread.
//! - [`Dialect::Sqlite`] — the embedded row store. Single-writer and
//!   immediately consistent, so a single `GROUP BY thread_id` suffices.
//!
//! The compiler is a pure, synchronous text/parameter generator: it performs
//! no query execution and has no side effects. Every literal value reaching
//! the SQL text goes through a parameter builder ([`param`]); only
//! placeholder tokens are ever concatenated.

pub mod param;
pub mod threads;

pub use param::{ClickHouseParams, ParamValue, SqlitePositionalParams};
pub use threads::{
    compile_threads_query, CompiledQuery, Dialect, QueryParams, SortBy, SortDirection,
    ThreadsQueryFilter, THREAD_SORT_FIELDS,
};
