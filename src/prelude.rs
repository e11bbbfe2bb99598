//! Convenient imports for TraceVault.
//!
//! Re-exports the most commonly used types so you can get started with a
//! single import:
//!
//! ```ignore
//! use tracevault::prelude::*;
//!
//! let vault = TraceVault::new();
//! ```

// Main entry point
pub use crate::vault::TraceVault;

// Error handling
pub use tracevault_core::{Error, Result};

// Core types
pub use tracevault_core::{
    CallRecord, Digest, ObjectRef, ProjectId, ThreadStatsRow, PERCENTILE_UNAVAILABLE,
};

// Query compilation
pub use tracevault_query::{
    compile_threads_query, CompiledQuery, Dialect, SortBy, SortDirection, ThreadsQueryFilter,
};

// Evaluation graph service and its wire shapes
pub use tracevault_evals::api::*;
pub use tracevault_evals::entities::*;
pub use tracevault_evals::EvalGraphService;
