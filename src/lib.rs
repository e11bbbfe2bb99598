//! # TraceVault
//!
//! Storage and query core for an LLM-observability platform.
//!
//! TraceVault persists execution traces ("calls"), versioned
//! content-addressed objects, and evaluation artifacts, and compiles
//! aggregate queries over them for two interchangeable SQL backends: an
//! append-heavy analytical column store and an embedded row store.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracevault::prelude::*;
//!
//! let vault = TraceVault::new();
//!
//! // Evaluation entity graph
//! let class = vault.evals.create_model_class(CreateModelClassReq {
//!     name: "chat-large".into(),
//!     provider: "acme".into(),
//!     description: None,
//! })?;
//!
//! // Compile a per-thread statistics query for the column store
//! let compiled = vault.threads_query(
//!     Dialect::ClickHouse,
//!     &ProjectId::new("proj-1"),
//!     &ThreadsQueryFilter::default(),
//!     &[SortBy::desc("last_updated")],
//!     Some(50),
//!     None,
//! )?;
//! // compiled.sql + compiled.params go to the external SQL engine
//! ```
//!
//! ## Pieces
//!
//! - [`tracevault_core`] — digests, refs, call/thread types, errors
//! - [`tracevault_query`] — the dual-dialect thread query compiler
//! - [`tracevault_evals`] — the in-memory evaluation entity graph

#![warn(missing_docs)]

mod vault;

pub mod prelude;

// Re-export main entry point
pub use vault::TraceVault;

// Re-export the core surface
pub use tracevault_core::{
    CallRecord, Digest, Error, ObjectRef, ProjectId, Result, ThreadStatsRow,
    PERCENTILE_UNAVAILABLE,
};

// Re-export query compilation
pub use tracevault_query::{
    compile_threads_query, CompiledQuery, Dialect, ParamValue, QueryParams, SortBy,
    SortDirection, ThreadsQueryFilter, THREAD_SORT_FIELDS,
};

// Re-export the evaluation graph
pub use tracevault_evals::{api, entities, EvalGraphService};
