//! Configuration module
//!
//! Handles CLI argument parsing, JSON/TOML configuration files, and validation.
//!
//! A configuration is an ordered list of weighted query entries plus a list of
//! named query groups:
//!
//! ```json
//! {
//!   "queries": [
//!     { "frequency": 3, "query": "select * from users where id = :id",
//!       "parameters": { "id": [1, 2, 3] } },
//!     { "frequency": 1, "queryGroup": "checkout",
//!       "parameters": { "user": [7, 8] } }
//!   ],
//!   "queryGroups": [
//!     { "name": "checkout", "queries": ["begin", "update carts set done = 1 where user_id = :user", "commit"] }
//!   ]
//! }
//! ```

pub mod cli;
pub mod json;
pub mod toml;
pub mod validator;

use ::toml::value::Datetime;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Candidate values per placeholder name
pub type ParameterPool = BTreeMap<String, Vec<ParamValue>>;

/// Complete query mix configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Weighted query entries, in selection order
    #[serde(default)]
    pub queries: Vec<QueryEntry>,
    /// Named, reusable lists of queries
    #[serde(default)]
    pub query_groups: Vec<QueryGroup>,
}

impl Config {
    /// Queries of every group named `name`, in configuration order
    ///
    /// Returns `None` when no group has that name. Duplicate definitions are
    /// concatenated, so the result may be empty only if all of them are.
    pub fn group_queries(&self, name: &str) -> Option<Vec<&str>> {
        let mut groups = self.query_groups.iter().filter(|g| g.name == name).peekable();
        groups.peek()?;
        Some(groups.flat_map(|g| g.queries.iter().map(String::as_str)).collect())
    }
}

/// One weighted unit of work: a direct query or a reference to a query group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEntry {
    /// Relative selection weight (0 = never selected)
    #[serde(default)]
    pub frequency: u64,
    /// Direct query text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Name of a configured query group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_group: Option<String>,
    /// Parameter pool used to render this entry's queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterPool>,
}

impl QueryEntry {
    /// Create an entry for a single query
    pub fn direct(frequency: u64, query: impl Into<String>) -> Self {
        Self {
            frequency,
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Create an entry that references a query group
    pub fn group(frequency: u64, name: impl Into<String>) -> Self {
        Self {
            frequency,
            query_group: Some(name.into()),
            ..Default::default()
        }
    }

    /// Add candidate values for a placeholder
    pub fn with_parameter<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.parameters
            .get_or_insert_with(ParameterPool::new)
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Direct query text, if set and non-empty
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Referenced group name, if set and non-empty
    pub fn group_name(&self) -> Option<&str> {
        self.query_group.as_deref().filter(|g| !g.is_empty())
    }
}

/// Named list of queries sharing the referencing entry's parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryGroup {
    pub name: String,
    #[serde(default)]
    pub queries: Vec<String>,
}

impl QueryGroup {
    pub fn new<I, S>(name: impl Into<String>, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            queries: queries.into_iter().map(Into::into).collect(),
        }
    }
}

/// A scalar parameter value
///
/// Values keep the type they were configured with and render using their
/// default text representation (`42`, `2.5`, `true`, `2024-01-31`).
/// Integers above `i64::MAX` land in `UInt`; native TOML dates and times in `Date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Date(Datetime),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::UInt(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Date(v) => write!(f, "{}", v),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(ParamValue::UInt(v), ParamValue::Int)
    }
}

impl From<Datetime> for ParamValue {
    fn from(v: Datetime) -> Self {
        ParamValue::Date(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Load a configuration file, picking the format from its extension
///
/// `.toml` files are parsed as TOML; anything else is parsed as JSON.
pub fn load_config(path: &Path) -> Result<Config> {
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        self::toml::parse_toml_file(path)
    } else {
        self::json::parse_json_file(path)
    }
}
