//! Query parameters for the admin endpoints.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of the List operation. `limit` is carried as a string so
/// that validation produces the admin envelope instead of a rejection from
/// the query extractor.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct ListQuery {
    /// Opaque continuation token from a previous page; empty or absent means
    /// "from the beginning".
    pub cursor: Option<String>,

    /// Maximum number of records to return; 0 or absent means the authority
    /// default.
    pub limit: Option<String>,
}

/// Query parameters of the Get and Delete operations.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct ResolveQuery {
    /// Resolve by provisioner ID instead of the name path parameter.
    pub id: Option<String>,
}

impl ResolveQuery {
    /// The `id` parameter, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Error)]
#[error("limit '{value}' is not an integer: {source}")]
pub struct ParseLimitError {
    value: String,
    source: ParseIntError,
}

/// Extracts the pagination window from the List query. The cursor passes
/// through verbatim; the limit must be a non-negative decimal integer.
pub fn parse_cursor(query: &ListQuery) -> Result<(String, usize), ParseLimitError> {
    let cursor = query.cursor.clone().unwrap_or_default();
    let limit = match query.limit.as_deref() {
        None | Some("") => 0,
        Some(value) => value.parse().map_err(|source| ParseLimitError {
            value: value.to_string(),
            source,
        })?,
    };
    Ok((cursor, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cursor_defaults() {
        let (cursor, limit) = parse_cursor(&ListQuery::default()).unwrap();
        assert_eq!(cursor, "");
        assert_eq!(limit, 0);
    }

    #[test]
    fn parse_cursor_reads_both_values() {
        let query = ListQuery {
            cursor: Some("nextCursorValue".into()),
            limit: Some("30".into()),
        };
        let (cursor, limit) = parse_cursor(&query).unwrap();
        assert_eq!(cursor, "nextCursorValue");
        assert_eq!(limit, 30);
    }

    #[test]
    fn parse_cursor_treats_empty_limit_as_unset() {
        let query = ListQuery {
            cursor: None,
            limit: Some(String::new()),
        };
        assert_eq!(parse_cursor(&query).unwrap(), (String::new(), 0));
    }

    #[test]
    fn parse_cursor_rejects_non_integer_limits() {
        let query = ListQuery {
            cursor: None,
            limit: Some("X".into()),
        };
        let err = parse_cursor(&query).unwrap_err();
        assert!(err.to_string().starts_with("limit 'X' is not an integer"));

        let query = ListQuery {
            cursor: None,
            limit: Some("-1".into()),
        };
        assert!(parse_cursor(&query).is_err());
    }

    #[test]
    fn resolve_query_ignores_empty_ids() {
        assert_eq!(ResolveQuery { id: None }.id(), None);
        assert_eq!(
            ResolveQuery {
                id: Some(String::new())
            }
            .id(),
            None
        );
        assert_eq!(
            ResolveQuery {
                id: Some("provID".into())
            }
            .id(),
            Some("provID")
        );
    }
}
