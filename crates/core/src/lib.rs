//! Core types for the TraceVault storage engine.
//!
//! This crate holds the pieces every other layer builds on:
//! - [`error`]: the canonical error taxonomy and `Result` alias
//! - [`types`]: call records, project ids, and derived thread statistics
//! - [`digest`]: deterministic content digests for addressing and dedup
//! - [`refs`]: fully-qualified references to immutable object versions
//!
//! Everything in this crate is pure data and pure functions: no I/O, no
//! locks, no global state.

pub mod digest;
pub mod error;
pub mod refs;
pub mod types;

pub use digest::Digest;
pub use error::{Error, Result};
pub use refs::ObjectRef;
pub use types::{CallRecord, ProjectId, ThreadStatsRow, PERCENTILE_UNAVAILABLE};
