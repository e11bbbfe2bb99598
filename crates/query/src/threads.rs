//! Thread-statistics query compiler.
//!
//! Aggregates a project's call log into one row per conversation thread:
//! turn count, start/last-updated timestamps, first/last turn ids, and turn
//! duration percentiles. Only *turns* count (calls with `id == turn_id`);
//! descendant calls share the turn's `turn_id` and are excluded, as are
//! calls with a null or empty `thread_id`.
//!
//! ## Why the ClickHouse query is two-level
//!
//! The column store's `calls_merged` table is filled by a background merge:
//! until the merge completes, one logical call can exist as several partial
//! rows (one carrying `thread_id` with null timing, another carrying timing
//! with null `thread_id`). A naive `GROUP BY thread_id` over raw rows would
//! double-count such calls. The inner query therefore groups by
//! `(project_id, id)` first, reconstituting one row per call with
//! `any()`/`min()`/`max()`, and only then does the outer query group by
//! thread. The turn and thread-membership filters live in the inner query's
//! `HAVING` clause because `thread_id` is only known after that collapse;
//! date-range filters stay in the inner `WHERE` so the engine can prune
//! granules before aggregating.
//!
//! The row store has no partial-row problem, so its query is a single
//! `GROUP BY thread_id` with all filters in `WHERE`. It also has no
//! arg-min/arg-max or percentile aggregates: first/last turn ids come from
//! correlated subqueries and percentile columns are emitted as the `-1`
//! sentinel ("not computed by this backend").

use crate::param::{ClickHouseParams, ParamValue, SqlitePositionalParams};
use chrono::{DateTime, Utc};
use tracevault_core::{Error, ProjectId, Result};

/// The two SQL backends a thread query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Analytical column store; eventually consistent under background merge
    ClickHouse,
    /// Embedded row store; single-writer, immediately consistent
    Sqlite,
}

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One `(field, direction)` sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    /// Output column to sort by; must be one of [`THREAD_SORT_FIELDS`]
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortBy {
    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        SortBy {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        SortBy {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Filters for a thread query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadsQueryFilter {
    /// Keep only these thread ids. `Some(vec![])` means "no rows match".
    pub thread_ids: Option<Vec<String>>,
    /// Keep calls with `sortable_datetime` strictly after this instant
    pub sortable_datetime_after: Option<DateTime<Utc>>,
    /// Keep calls with `sortable_datetime` strictly before this instant
    pub sortable_datetime_before: Option<DateTime<Utc>>,
}

/// Sortable output columns of a thread query.
///
/// `first_turn_id` / `last_turn_id` are identifiers, not metrics, and are
/// deliberately absent.
pub const THREAD_SORT_FIELDS: [&str; 6] = [
    "thread_id",
    "turn_count",
    "start_time",
    "last_updated",
    "p50_turn_duration_ms",
    "p99_turn_duration_ms",
];

/// Bound parameters of a compiled query, in the target dialect's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParams {
    /// `(name, value)` bindings for typed named placeholders
    Named(Vec<(String, ParamValue)>),
    /// Ordered values for positional `?` placeholders
    Positional(Vec<ParamValue>),
}

/// The compiler's product: SQL text plus its bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Query text in the target dialect
    pub sql: String,
    /// Bindings matching every placeholder in `sql`
    pub params: QueryParams,
}

/// Format used for the pre-computed `sortable_datetime` column.
const SORTABLE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

fn format_sortable(ts: &DateTime<Utc>) -> String {
    ts.format(SORTABLE_DATETIME_FORMAT).to_string()
}

/// Validate sort keys and render the `ORDER BY` body.
///
/// Falls back to `last_updated DESC` when no keys are given. Any field
/// outside [`THREAD_SORT_FIELDS`] fails with a validation error that
/// enumerates the allowed set.
fn order_by_clause(sort_by: &[SortBy]) -> Result<String> {
    if sort_by.is_empty() {
        return Ok("last_updated DESC".to_string());
    }
    let mut keys = Vec::with_capacity(sort_by.len());
    for sort in sort_by {
        if !THREAD_SORT_FIELDS.contains(&sort.field.as_str()) {
            return Err(Error::Validation(format!(
                "Unsupported sort field: {}. Supported fields: [{}]",
                sort.field,
                THREAD_SORT_FIELDS.join(", ")
            )));
        }
        keys.push(format!("{} {}", sort.field, sort.direction.as_sql()));
    }
    Ok(keys.join(", "))
}

/// Compile a thread-statistics query for one backend.
///
/// Pure and synchronous: the result is handed to an external SQL engine for
/// execution. `limit`/`offset` are bound as parameters when present.
///
/// # Errors
///
/// [`Error::Validation`] for a sort field outside [`THREAD_SORT_FIELDS`].
/// An empty `thread_ids` filter is not an error; it compiles to a
/// constant-false predicate.
pub fn compile_threads_query(
    dialect: Dialect,
    project: &ProjectId,
    filter: &ThreadsQueryFilter,
    sort_by: &[SortBy],
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<CompiledQuery> {
    let order_by = order_by_clause(sort_by)?;
    tracing::trace!(?dialect, %project, "compiling threads query");
    match dialect {
        Dialect::ClickHouse => compile_clickhouse(project, filter, &order_by, limit, offset),
        Dialect::Sqlite => compile_sqlite(project, filter, &order_by, limit, offset),
    }
}

fn compile_clickhouse(
    project: &ProjectId,
    filter: &ThreadsQueryFilter,
    order_by: &str,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<CompiledQuery> {
    let mut pb = ClickHouseParams::new();

    // Inner WHERE: pre-aggregation predicates only. The date range prunes
    // granules before the merge-collapse and is not re-applied outside.
    let mut inner_where = vec![format!(
        "project_id = {}",
        pb.add(ParamValue::Str(project.as_str().to_string()))
    )];
    if let Some(after) = &filter.sortable_datetime_after {
        inner_where.push(format!(
            "sortable_datetime > {}",
            pb.add(ParamValue::Str(format_sortable(after)))
        ));
    }
    if let Some(before) = &filter.sortable_datetime_before {
        inner_where.push(format!(
            "sortable_datetime < {}",
            pb.add(ParamValue::Str(format_sortable(before)))
        ));
    }

    // Inner HAVING: post-aggregation predicates. `thread_id` and the turn
    // test only exist once partial rows are collapsed per call.
    let mut inner_having = vec![
        "id = any(turn_id)".to_string(),
        "thread_id IS NOT NULL".to_string(),
        "thread_id != ''".to_string(),
    ];
    match &filter.thread_ids {
        Some(ids) if ids.is_empty() => {
            // Filtering on an empty set matches nothing.
            inner_having.push("1 = 0".to_string());
        }
        Some(ids) => {
            inner_having.push(format!(
                "thread_id IN {}",
                pb.add(ParamValue::StrList(ids.clone()))
            ));
        }
        None => {}
    }

    let mut sql = format!(
        "SELECT\n  \
           thread_id,\n  \
           count() AS turn_count,\n  \
           min(call_start) AS start_time,\n  \
           max(call_end) AS last_updated,\n  \
           argMin(id, call_start) AS first_turn_id,\n  \
           argMax(id, call_end) AS last_turn_id,\n  \
           quantile(0.5)(duration_ms) AS p50_turn_duration_ms,\n  \
           quantile(0.99)(duration_ms) AS p99_turn_duration_ms\n\
         FROM (\n  \
           SELECT\n    \
             id,\n    \
             any(thread_id) AS thread_id,\n    \
             min(started_at) AS call_start,\n    \
             max(ended_at) AS call_end,\n    \
             dateDiff('millisecond', min(started_at), max(ended_at)) AS duration_ms\n  \
           FROM calls_merged\n  \
           WHERE {inner_where}\n  \
           GROUP BY project_id, id\n  \
           HAVING {inner_having}\n\
         ) AS turns\n\
         GROUP BY thread_id\n\
         ORDER BY {order_by}",
        inner_where = inner_where.join("\n    AND "),
        inner_having = inner_having.join("\n    AND "),
        order_by = order_by,
    );

    if let Some(limit) = limit {
        sql.push_str(&format!(
            "\nLIMIT {}",
            pb.add(ParamValue::Int(limit as i64))
        ));
    }
    if let Some(offset) = offset {
        sql.push_str(&format!(
            "\nOFFSET {}",
            pb.add(ParamValue::Int(offset as i64))
        ));
    }

    Ok(CompiledQuery {
        sql,
        params: QueryParams::Named(pb.into_bindings()),
    })
}

fn compile_sqlite(
    project: &ProjectId,
    filter: &ThreadsQueryFilter,
    order_by: &str,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<CompiledQuery> {
    let mut pb = SqlitePositionalParams::new();

    // Single-level aggregation: rows are already consolidated, so the turn
    // and thread-membership tests go straight into WHERE.
    let mut where_clauses = vec![
        format!(
            "project_id = {}",
            pb.add(ParamValue::Str(project.as_str().to_string()))
        ),
        "id = turn_id".to_string(),
        "thread_id IS NOT NULL".to_string(),
        "thread_id != ''".to_string(),
    ];
    match &filter.thread_ids {
        Some(ids) if ids.is_empty() => {
            where_clauses.push("1 = 0".to_string());
        }
        Some(ids) => {
            where_clauses.push(format!("thread_id IN ({})", pb.add_list(ids)));
        }
        None => {}
    }
    if let Some(after) = &filter.sortable_datetime_after {
        where_clauses.push(format!(
            "sortable_datetime > {}",
            pb.add(ParamValue::Str(format_sortable(after)))
        ));
    }
    if let Some(before) = &filter.sortable_datetime_before {
        where_clauses.push(format!(
            "sortable_datetime < {}",
            pb.add(ParamValue::Str(format_sortable(before)))
        ));
    }

    // No argMin/argMax here: first/last turn ids come from correlated
    // subqueries over the same project + thread. Percentiles are not
    // computable in this dialect and are emitted as the -1 sentinel.
    let mut sql = format!(
        "SELECT\n  \
           thread_id,\n  \
           COUNT(id) AS turn_count,\n  \
           MIN(started_at) AS start_time,\n  \
           MAX(ended_at) AS last_updated,\n  \
           (SELECT t2.id FROM calls t2\n     \
              WHERE t2.project_id = calls.project_id\n       \
                AND t2.thread_id = calls.thread_id\n       \
                AND t2.id = t2.turn_id\n     \
              ORDER BY t2.started_at ASC LIMIT 1) AS first_turn_id,\n  \
           (SELECT t3.id FROM calls t3\n     \
              WHERE t3.project_id = calls.project_id\n       \
                AND t3.thread_id = calls.thread_id\n       \
                AND t3.id = t3.turn_id\n     \
              ORDER BY t3.ended_at DESC LIMIT 1) AS last_turn_id,\n  \
           -1 AS p50_turn_duration_ms,\n  \
           -1 AS p99_turn_duration_ms\n\
         FROM calls\n\
         WHERE {where_clauses}\n\
         GROUP BY thread_id\n\
         ORDER BY {order_by}",
        where_clauses = where_clauses.join("\n  AND "),
        order_by = order_by,
    );

    // SQLite requires a LIMIT before OFFSET; -1 means unbounded.
    match (limit, offset) {
        (Some(limit), _) => {
            sql.push_str(&format!(
                "\nLIMIT {}",
                pb.add(ParamValue::Int(limit as i64))
            ));
        }
        (None, Some(_)) => {
            sql.push_str("\nLIMIT -1");
        }
        (None, None) => {}
    }
    if let Some(offset) = offset {
        sql.push_str(&format!(
            "\nOFFSET {}",
            pb.add(ParamValue::Int(offset as i64))
        ));
    }

    Ok(CompiledQuery {
        sql,
        params: QueryParams::Positional(pb.into_values()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn project() -> ProjectId {
        ProjectId::new("proj-1")
    }

    fn named(q: &CompiledQuery) -> &[(String, ParamValue)] {
        match &q.params {
            QueryParams::Named(b) => b,
            QueryParams::Positional(_) => panic!("expected named params"),
        }
    }

    fn positional(q: &CompiledQuery) -> &[ParamValue] {
        match &q.params {
            QueryParams::Positional(v) => v,
            QueryParams::Named(_) => panic!("expected positional params"),
        }
    }

    // ===== Sort validation =====

    #[test]
    fn test_default_sort_is_last_updated_desc() {
        for dialect in [Dialect::ClickHouse, Dialect::Sqlite] {
            let q = compile_threads_query(
                dialect,
                &project(),
                &ThreadsQueryFilter::default(),
                &[],
                None,
                None,
            )
            .unwrap();
            assert!(q.sql.contains("ORDER BY last_updated DESC"));
        }
    }

    #[test]
    fn test_multi_key_sort() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter::default(),
            &[SortBy::asc("turn_count"), SortBy::desc("thread_id")],
            None,
            None,
        )
        .unwrap();
        assert!(q.sql.contains("ORDER BY turn_count ASC, thread_id DESC"));
    }

    #[test]
    fn test_unknown_sort_field_lists_allowed_set() {
        let err = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter::default(),
            &[SortBy::asc("bogus")],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported sort field: bogus. Supported fields: [thread_id, turn_count, \
             start_time, last_updated, p50_turn_duration_ms, p99_turn_duration_ms]"
        );
    }

    #[test]
    fn test_turn_id_columns_are_not_sortable() {
        for field in ["first_turn_id", "last_turn_id"] {
            for dialect in [Dialect::ClickHouse, Dialect::Sqlite] {
                let err = compile_threads_query(
                    dialect,
                    &project(),
                    &ThreadsQueryFilter::default(),
                    &[SortBy::desc(field)],
                    None,
                    None,
                )
                .unwrap_err();
                assert!(err.is_validation());
                assert!(err.to_string().starts_with(&format!(
                    "Unsupported sort field: {}. Supported fields: [",
                    field
                )));
            }
        }
    }

    // ===== ClickHouse shape =====

    #[test]
    fn test_clickhouse_is_two_level_aggregation() {
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter::default(),
            &[],
            None,
            None,
        )
        .unwrap();
        assert!(q.sql.contains("GROUP BY project_id, id"));
        assert!(q.sql.contains("GROUP BY thread_id"));
        assert!(q.sql.contains("any(thread_id) AS thread_id"));
        assert!(q.sql.contains("argMin(id, call_start) AS first_turn_id"));
        assert!(q.sql.contains("argMax(id, call_end) AS last_turn_id"));
        assert!(q.sql.contains("quantile(0.5)(duration_ms)"));
        assert!(q.sql.contains("quantile(0.99)(duration_ms)"));
    }

    #[test]
    fn test_clickhouse_turn_and_thread_filters_live_in_having() {
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter {
                thread_ids: Some(vec!["t1".into()]),
                ..Default::default()
            },
            &[],
            None,
            None,
        )
        .unwrap();
        let having_at = q.sql.find("HAVING").unwrap();
        let having = &q.sql[having_at..];
        assert!(having.contains("id = any(turn_id)"));
        assert!(having.contains("thread_id IS NOT NULL"));
        assert!(having.contains("thread_id != ''"));
        assert!(having.contains("thread_id IN {pb_1:Array(String)}"));

        // Nothing turn- or thread-related before the aggregation.
        let where_at = q.sql.find("WHERE").unwrap();
        let where_clause = &q.sql[where_at..having_at];
        assert!(!where_clause.contains("turn_id"));
        assert!(!where_clause.contains("thread_id"));
    }

    #[test]
    fn test_clickhouse_date_range_only_in_inner_where() {
        let after = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter {
                sortable_datetime_after: Some(after),
                sortable_datetime_before: Some(before),
                ..Default::default()
            },
            &[],
            None,
            None,
        )
        .unwrap();
        // Applied once, before aggregation; never re-applied outside.
        assert_eq!(q.sql.matches("sortable_datetime >").count(), 1);
        assert_eq!(q.sql.matches("sortable_datetime <").count(), 1);
        let outer_group = q.sql.rfind("GROUP BY thread_id").unwrap();
        assert!(!q.sql[outer_group..].contains("sortable_datetime"));

        let bindings = named(&q);
        assert_eq!(bindings.len(), 3); // project + after + before
        assert_eq!(bindings[1].1, ParamValue::Str("2024-05-01 00:00:00.000000".into()));
        assert_eq!(bindings[2].1, ParamValue::Str("2024-06-01 00:00:00.000000".into()));
    }

    #[test]
    fn test_clickhouse_every_placeholder_has_a_binding() {
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter {
                thread_ids: Some(vec!["t1".into(), "t2".into()]),
                sortable_datetime_after: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
            &[],
            Some(50),
            Some(100),
        )
        .unwrap();
        let bindings = named(&q);
        assert_eq!(q.sql.matches("{pb_").count(), bindings.len());
        for (name, _) in bindings {
            assert!(q.sql.contains(&format!("{{{}:", name)), "missing {}", name);
        }
        assert_eq!(bindings.last().unwrap().1, ParamValue::Int(100));
    }

    #[test]
    fn test_clickhouse_empty_thread_filter_matches_nothing() {
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter {
                thread_ids: Some(vec![]),
                ..Default::default()
            },
            &[],
            None,
            None,
        )
        .unwrap();
        assert!(q.sql.contains("1 = 0"));
        assert!(!q.sql.contains("IN {"));
        assert_eq!(named(&q).len(), 1); // just the project id
    }

    #[test]
    fn test_clickhouse_limit_offset_are_bound() {
        let q = compile_threads_query(
            Dialect::ClickHouse,
            &project(),
            &ThreadsQueryFilter::default(),
            &[],
            Some(25),
            Some(50),
        )
        .unwrap();
        assert!(q.sql.contains("LIMIT {pb_1:Int64}"));
        assert!(q.sql.contains("OFFSET {pb_2:Int64}"));
        let bindings = named(&q);
        assert_eq!(bindings[1].1, ParamValue::Int(25));
        assert_eq!(bindings[2].1, ParamValue::Int(50));
    }

    // ===== SQLite shape =====

    #[test]
    fn test_sqlite_is_single_level_with_where_filters() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter::default(),
            &[],
            None,
            None,
        )
        .unwrap();
        assert_eq!(q.sql.matches("GROUP BY thread_id").count(), 1);
        assert!(!q.sql.contains("HAVING"));
        let where_at = q.sql.find("\nWHERE").unwrap();
        let group_at = q.sql.find("GROUP BY thread_id").unwrap();
        let where_clause = &q.sql[where_at..group_at];
        assert!(where_clause.contains("id = turn_id"));
        assert!(where_clause.contains("thread_id IS NOT NULL"));
        assert!(where_clause.contains("thread_id != ''"));
    }

    #[test]
    fn test_sqlite_uses_correlated_subqueries_and_sentinels() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter::default(),
            &[],
            None,
            None,
        )
        .unwrap();
        assert!(q.sql.contains("ORDER BY t2.started_at ASC LIMIT 1) AS first_turn_id"));
        assert!(q.sql.contains("ORDER BY t3.ended_at DESC LIMIT 1) AS last_turn_id"));
        assert!(q.sql.contains("-1 AS p50_turn_duration_ms"));
        assert!(q.sql.contains("-1 AS p99_turn_duration_ms"));
        assert!(!q.sql.contains("argMin"));
        assert!(!q.sql.contains("quantile"));
    }

    #[test]
    fn test_sqlite_placeholder_count_matches_values() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter {
                thread_ids: Some(vec!["t1".into(), "t2".into(), "t3".into()]),
                sortable_datetime_after: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                sortable_datetime_before: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
            &[],
            Some(10),
            Some(20),
        )
        .unwrap();
        let values = positional(&q);
        // project + 3 thread ids + 2 datetimes + limit + offset
        assert_eq!(values.len(), 8);
        assert_eq!(q.sql.matches('?').count(), values.len());
        assert_eq!(values[0], ParamValue::Str("proj-1".into()));
        assert_eq!(values[7], ParamValue::Int(20));
    }

    #[test]
    fn test_sqlite_empty_thread_filter_matches_nothing() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter {
                thread_ids: Some(vec![]),
                ..Default::default()
            },
            &[],
            None,
            None,
        )
        .unwrap();
        assert!(q.sql.contains("1 = 0"));
        assert_eq!(positional(&q).len(), 1);
    }

    #[test]
    fn test_sqlite_offset_without_limit_is_unbounded() {
        let q = compile_threads_query(
            Dialect::Sqlite,
            &project(),
            &ThreadsQueryFilter::default(),
            &[],
            None,
            Some(5),
        )
        .unwrap();
        assert!(q.sql.contains("LIMIT -1\nOFFSET ?"));
        assert_eq!(positional(&q).len(), 2); // project + offset
    }
}
