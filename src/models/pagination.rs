//! Pagination, sorting and search parameters of the transaction listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::transaction::Transaction;
use crate::store::{Filter, FindOptions, Pattern, SortDirection, SortSpec};

/// Raw query string parameters, before any interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    /// JSON object such as `{"field":"userId","sort":"desc"}`.
    pub sort: Option<String>,
    pub search: Option<String>,
}

/// Parsed `sort` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParam {
    pub field: String,
    /// Requested direction. Listing order is always ascending on `field`.
    pub ascending: bool,
}

impl SortParam {
    /// Parse the JSON-encoded `sort` parameter. It must be an object with a
    /// non-empty string `field`. Only `"sort": "desc"` requests descending.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let parsed: Value =
            serde_json::from_str(raw).map_err(|e| AppError::InvalidSort(e.to_string()))?;
        let Value::Object(object) = parsed else {
            return Err(AppError::InvalidSort(format!("expected a JSON object, got {raw}")));
        };

        let field = object
            .get("field")
            .and_then(Value::as_str)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::InvalidSort("missing sort field".to_string()))?;

        let descending = object
            .get("sort")
            .and_then(Value::as_str)
            .is_some_and(|direction| direction.eq_ignore_ascii_case("desc"));

        Ok(Self {
            field: field.to_string(),
            ascending: !descending,
        })
    }

    /// Store ordering for this parameter. The direction is pinned to ascending.
    pub fn to_spec(&self) -> SortSpec {
        SortSpec {
            field: self.field.clone(),
            direction: SortDirection::Ascending,
        }
    }
}

/// Validated transaction listing query.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub page: i64,
    pub page_size: i64,
    pub sort: Option<SortParam>,
    pub search: Pattern,
}

impl TransactionQuery {
    const DEFAULT_PAGE: i64 = 1;
    const DEFAULT_PAGE_SIZE: i64 = 20;

    pub fn from_params(params: &TransactionParams) -> Result<Self, AppError> {
        let page = parse_integer("page", params.page.as_deref(), Self::DEFAULT_PAGE)?;
        let page_size =
            parse_integer("pageSize", params.page_size.as_deref(), Self::DEFAULT_PAGE_SIZE)?;

        let sort = match params.sort.as_deref() {
            Some(raw) if !raw.is_empty() => Some(SortParam::parse(raw)?),
            _ => None,
        };

        let search = Pattern::case_insensitive(params.search.as_deref().unwrap_or(""))?;

        Ok(Self {
            page,
            page_size,
            sort,
            search,
        })
    }

    /// Records skipped before the page: `page * pageSize`.
    pub fn offset(&self) -> Result<i64, AppError> {
        self.page.checked_mul(self.page_size).ok_or_else(|| {
            AppError::InvalidPagination(format!(
                "offset overflows for page {} and pageSize {}",
                self.page, self.page_size
            ))
        })
    }

    pub fn find_options(&self) -> Result<FindOptions, AppError> {
        Ok(FindOptions {
            sort: self.sort.as_ref().map(SortParam::to_spec),
            skip: self.offset()?,
            limit: Some(self.page_size),
        })
    }

    /// Filter for the listed transactions: `cost` or `userId` matches the search.
    pub fn filter(&self) -> Filter {
        Filter::Or(vec![
            Filter::matches("cost", self.search.clone()),
            Filter::matches("userId", self.search.clone()),
        ])
    }

    /// Filter for `total`: `name` matches the search.
    pub fn total_filter(&self) -> Filter {
        Filter::matches("name", self.search.clone())
    }
}

/// One page of transactions with the `total` count.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
}

/// Missing or blank values take the default. Anything else must be an integer.
fn parse_integer(name: &str, raw: Option<&str>, default: i64) -> Result<i64, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            AppError::InvalidPagination(format!("{name} must be an integer, got {value:?}"))
        }),
    }
}
