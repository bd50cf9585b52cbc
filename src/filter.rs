//! Item Filter Compiler
//!
//! Turns sparse, optional search criteria into a parameterized SQL predicate.
//! Only populated criteria contribute a fragment; placeholders are numbered
//! from `?1` in the order the fields are examined, and the argument list
//! follows the same order.

use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use serde::{Deserialize, Deserializer};

/// Criteria accepted by the item listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemFilter {
    /// Exact category match
    #[serde(default, alias = "category", deserialize_with = "blank_as_none")]
    pub category_id: Option<i64>,
    /// Case-sensitive substring of the item title
    #[serde(default)]
    pub search: Option<String>,
}

/// Query-string integer where an empty value means "not given"
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Positional query argument produced by the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterArg {
    Int(i64),
    Text(String),
}

impl From<i64> for FilterArg {
    fn from(v: i64) -> Self {
        FilterArg::Int(v)
    }
}

impl From<&str> for FilterArg {
    fn from(v: &str) -> Self {
        FilterArg::Text(v.to_string())
    }
}

impl ToSql for FilterArg {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FilterArg::Int(v) => v.to_sql(),
            FilterArg::Text(v) => v.to_sql(),
        }
    }
}

/// Predicate clause plus the arguments bound to its placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    pub clause: String,
    pub args: Vec<FilterArg>,
}

impl CompiledFilter {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// `WHERE` suffix to append to a select, or nothing for empty criteria
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("\nWHERE {}", self.clause)
        }
    }
}

impl ItemFilter {
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Search term if present and non-empty
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn compile(&self) -> CompiledFilter {
        let mut fragments: Vec<String> = Vec::new();
        let mut args: Vec<FilterArg> = Vec::new();

        if let Some(category_id) = self.category_id {
            args.push(FilterArg::Int(category_id));
            fragments.push(format!("items.category = ?{}", args.len()));
        }

        if let Some(term) = self.search_term() {
            args.push(FilterArg::Text(term.to_string()));
            fragments.push(format!("instr(items.title, ?{}) > 0", args.len()));
        }

        CompiledFilter {
            clause: fragments.join(" AND "),
            args,
        }
    }
}
