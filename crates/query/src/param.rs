//! Parameter-safe SQL building.
//!
//! Both dialects share one discipline: callers never concatenate a value
//! into SQL text. They hand the value to a builder, get back a placeholder
//! token, and concatenate only the token. The builder owns binding order,
//! so the final `(sql, params)` pair always lines up.
//!
//! Two flavors:
//! - [`ClickHouseParams`] emits typed named placeholders (`{pb_0:String}`)
//!   with a `(name, value)` binding list.
//! - [`SqlitePositionalParams`] emits positional `?` placeholders with a
//!   parallel ordered value list.

/// A value bound into a compiled query.
///
/// Only the binding types the thread query needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String binding
    Str(String),
    /// 64-bit integer binding
    Int(i64),
    /// 64-bit float binding
    Float(f64),
    /// String-array binding (ClickHouse `Array(String)`; expanded to one
    /// `?` per element on SQLite)
    StrList(Vec<String>),
}

impl ParamValue {
    /// ClickHouse type name for the typed placeholder.
    fn clickhouse_type(&self) -> &'static str {
        match self {
            ParamValue::Str(_) => "String",
            ParamValue::Int(_) => "Int64",
            ParamValue::Float(_) => "Float64",
            ParamValue::StrList(_) => "Array(String)",
        }
    }
}

/// Named, typed parameter builder for the ClickHouse dialect.
///
/// Placeholders are `{pb_N:Type}`, numbered in binding order.
#[derive(Debug, Default)]
pub struct ClickHouseParams {
    bindings: Vec<(String, ParamValue)>,
}

impl ClickHouseParams {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, returning the placeholder token to concatenate.
    pub fn add(&mut self, value: ParamValue) -> String {
        let name = format!("pb_{}", self.bindings.len());
        let token = format!("{{{}:{}}}", name, value.clickhouse_type());
        self.bindings.push((name, value));
        token
    }

    /// The ordered `(name, value)` bindings accumulated so far.
    pub fn bindings(&self) -> &[(String, ParamValue)] {
        &self.bindings
    }

    /// Consume the builder, yielding the bindings.
    pub fn into_bindings(self) -> Vec<(String, ParamValue)> {
        self.bindings
    }
}

/// Positional parameter builder for the SQLite dialect.
///
/// Every binding is a `?`; list bindings expand to one `?` per element.
#[derive(Debug, Default)]
pub struct SqlitePositionalParams {
    values: Vec<ParamValue>,
}

impl SqlitePositionalParams {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scalar value, returning `?`.
    pub fn add(&mut self, value: ParamValue) -> String {
        self.values.push(value);
        "?".to_string()
    }

    /// Bind a list as individual scalars, returning `?, ?, …` (one per
    /// element) for use inside an `IN (…)` clause.
    pub fn add_list(&mut self, items: &[String]) -> String {
        let tokens: Vec<&str> = items
            .iter()
            .map(|item| {
                self.values.push(ParamValue::Str(item.clone()));
                "?"
            })
            .collect();
        tokens.join(", ")
    }

    /// The ordered values accumulated so far.
    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    /// Consume the builder, yielding the ordered values.
    pub fn into_values(self) -> Vec<ParamValue> {
        self.values
    }
}
