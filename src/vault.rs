//! Main entry point for TraceVault.

use tracevault_core::{ProjectId, Result};
use tracevault_evals::EvalGraphService;
use tracevault_query::{compile_threads_query, CompiledQuery, Dialect, SortBy, ThreadsQueryFilter};

/// The TraceVault engine.
///
/// Owns the evaluation entity graph and fronts query compilation. Construct
/// once and share by reference; every operation is safe to call from
/// concurrent logical tasks.
///
/// # Example
///
/// ```ignore
/// use tracevault::prelude::*;
///
/// let vault = TraceVault::new();
/// let created = vault.evals.create_model_class(CreateModelClassReq {
///     name: "chat-large".into(),
///     provider: "acme".into(),
///     description: None,
/// })?;
/// ```
#[derive(Debug, Default)]
pub struct TraceVault {
    /// The evaluation entity graph
    pub evals: EvalGraphService,
}

impl TraceVault {
    /// Create an empty engine.
    pub fn new() -> Self {
        TraceVault {
            evals: EvalGraphService::new(),
        }
    }

    /// Compile a per-thread statistics query for one backend.
    ///
    /// Pure text/parameter generation; execution belongs to the external
    /// SQL engine. See [`tracevault_query::compile_threads_query`].
    pub fn threads_query(
        &self,
        dialect: Dialect,
        project: &ProjectId,
        filter: &ThreadsQueryFilter,
        sort_by: &[SortBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<CompiledQuery> {
        compile_threads_query(dialect, project, filter, sort_by, limit, offset)
    }
}
