//! Query primitives understood by every store backend: filters, patterns, sort and paging.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::StoreError;

/// A validated, case-insensitive regular expression.
///
/// Keeps the source text for backends that evaluate the pattern themselves
/// (Postgres `~*`) next to the compiled form used in-process.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` as a case-insensitive pattern.
    pub fn case_insensitive(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Only strings can match. Numbers, booleans and missing values never do.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match value {
            Some(Value::String(s)) => self.regex.is_match(s),
            _ => false,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Document filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// `field` is present and equal to `value`.
    Eq { field: String, value: Value },
    /// `field` is a string matched by `pattern`.
    Matches { field: String, pattern: Pattern },
    /// Any of the nested filters. An empty list matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn matches(field: &str, pattern: Pattern) -> Self {
        Self::Matches {
            field: field.to_string(),
            pattern,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering on a single top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Sort, skip and limit applied to a find, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<SortSpec>,
    pub skip: i64,
    /// `None` returns everything after `skip`. `Some(0)` returns nothing.
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.skip < 0 {
            return Err(StoreError::InvalidOptions(format!(
                "skip must be non-negative, got {}",
                self.skip
            )));
        }
        if let Some(limit) = self.limit {
            if limit < 0 {
                return Err(StoreError::InvalidOptions(format!(
                    "limit must be non-negative, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
