//! Evaluation entity graph for TraceVault.
//!
//! An in-memory reference implementation of the eleven-entity evaluation
//! model; a real backend must preserve these semantics exactly:
//!
//! - [`store::EntityStore`] — generic create/get/update/soft-delete store
//!   with an append-only id namespace (tombstoning never frees an id)
//! - [`entities`] — the eleven entity types, split into immutable and
//!   mutable properties
//! - [`api`] — the Create/Get/Update/Delete request and response shapes an
//!   external RPC layer would expose
//! - [`service::EvalGraphService`] — one store per entity type, with
//!   referential-integrity checks at creation time and explicit
//!   non-cascading deletes

pub mod api;
pub mod entities;
pub mod service;
pub mod store;

pub use service::EvalGraphService;
pub use store::EntityStore;
