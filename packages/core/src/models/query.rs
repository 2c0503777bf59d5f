//! Query Specification
//!
//! Immutable description of a paginated query: text, named parameters and
//! page size. Validation happens here, at construction, so a cursor built
//! from a `QuerySpec` never needs to re-check its inputs.

use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::num::NonZeroUsize;

/// Named query parameters
pub type Params = Map<String, Value>;

/// Page size used when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Reserved parameter carrying the `SKIP` offset of a windowed query
pub const SKIP_PARAM: &str = "cursor_skip";

/// Reserved parameter carrying the `LIMIT` of a windowed query
pub const LIMIT_PARAM: &str = "cursor_limit";

/// Number of rows per page; always greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, DatabaseError> {
        NonZeroUsize::new(size).map(Self).ok_or_else(|| {
            DatabaseError::construction(format!("page size must be positive, got {size}"))
        })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<i64> for PageSize {
    type Error = DatabaseError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        let size = usize::try_from(size).map_err(|_| {
            DatabaseError::construction(format!("page size must be positive, got {size}"))
        })?;
        Self::new(size)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query text, parameters and page size of one cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    text: String,
    params: Params,
    page_size: PageSize,
}

impl QuerySpec {
    /// Build a specification, rejecting blank query text
    pub fn new(
        text: impl Into<String>,
        params: Params,
        page_size: PageSize,
    ) -> Result<Self, DatabaseError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DatabaseError::construction("query text must not be empty"));
        }

        Ok(Self {
            text,
            params,
            page_size,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }
}

/// Append `SKIP`/`LIMIT` clauses to a query
///
/// Each clause is added on its own line, and only when its bound is given, so
/// a trailing `//` comment in `text` cannot swallow it. The bounds travel as
/// the reserved [`SKIP_PARAM`] and [`LIMIT_PARAM`] parameters, merged over a
/// copy of `params`. A trailing semicolon on `text` is dropped.
///
/// ```rust
/// use neo4j_mcp_core::models::{apply_window, Params};
///
/// let (text, params) = apply_window("MATCH (n) RETURN n;", &Params::new(), Some(20), Some(10));
/// assert_eq!(text, "MATCH (n) RETURN n\nSKIP $cursor_skip\nLIMIT $cursor_limit");
/// assert_eq!(params["cursor_skip"], 20);
/// ```
pub fn apply_window(
    text: &str,
    params: &Params,
    skip: Option<u64>,
    limit: Option<u64>,
) -> (String, Params) {
    let mut windowed = text.trim_end().trim_end_matches(';').trim_end().to_string();
    let mut params = params.clone();

    if let Some(skip) = skip {
        windowed.push_str(&format!("\nSKIP ${SKIP_PARAM}"));
        params.insert(SKIP_PARAM.to_string(), Value::from(skip));
    }
    if let Some(limit) = limit {
        windowed.push_str(&format!("\nLIMIT ${LIMIT_PARAM}"));
        params.insert(LIMIT_PARAM.to_string(), Value::from(limit));
    }

    (windowed, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_page_size_rejects_zero_and_negative() {
        assert_eq!(PageSize::new(0).unwrap_err().kind(), ErrorKind::ConstructionError);
        assert_eq!(
            PageSize::try_from(-5_i64).unwrap_err().kind(),
            ErrorKind::ConstructionError
        );
        assert_eq!(PageSize::try_from(10_i64).unwrap().get(), 10);
    }

    #[test]
    fn test_page_size_default() {
        assert_eq!(PageSize::default().get(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_deserialization_validates() {
        let size: PageSize = serde_json::from_value(json!(15)).unwrap();
        assert_eq!(size.get(), 15);
        assert!(serde_json::from_value::<PageSize>(json!(0)).is_err());
        assert!(serde_json::from_value::<PageSize>(json!(-1)).is_err());
    }

    #[test]
    fn test_query_spec_rejects_blank_text() {
        let err = QuerySpec::new("   ", Params::new(), PageSize::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstructionError);
    }

    #[test]
    fn test_apply_window_keeps_caller_params() {
        let mut params = Params::new();
        params.insert("min_age".to_string(), json!(25));

        let (text, windowed) = apply_window("MATCH (p) RETURN p", &params, None, Some(5));

        assert_eq!(text, "MATCH (p) RETURN p\nLIMIT $cursor_limit");
        assert_eq!(windowed["min_age"], 25);
        assert_eq!(windowed["cursor_limit"], 5);
        assert!(!windowed.contains_key("cursor_skip"));
        // Caller's map is untouched
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_apply_window_survives_trailing_line_comment() {
        let (text, _) = apply_window("MATCH (n) RETURN n // every node", &Params::new(), Some(10), Some(10));

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("MATCH (n) RETURN n // every node"));
        assert_eq!(lines.next(), Some("SKIP $cursor_skip"));
        assert_eq!(lines.next(), Some("LIMIT $cursor_limit"));
        assert_eq!(lines.next(), None);
    }
}
