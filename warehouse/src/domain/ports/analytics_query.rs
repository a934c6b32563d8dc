//! Port abstraction for executing read-only analytical SQL.
//!
//! Runners never raise: connection and execution failures are folded into
//! [`QueryOutcome::Failed`] so callers can report them as text.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

/// Column names plus the decoded rows of a row-returning statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    /// Column names in select-list order.
    pub columns: Vec<String>,
    /// One entry per row, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

/// Result of executing a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The statement returned rows.
    Rows(RowSet),
    /// The statement returned no rows; carries the affected-rows message.
    Status(String),
    /// Connecting or executing failed; carries the `Error: ...` message.
    Failed(String),
}

impl QueryOutcome {
    /// Build the status outcome for a statement that affected `rows` rows.
    #[must_use]
    pub fn affected(rows: u64) -> Self {
        Self::Status(format!("Query executed successfully. Rows affected: {rows}"))
    }

    /// Build the failure outcome for an error message.
    #[must_use]
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::Failed(format!("Error: {message}"))
    }

    /// Return the row set, if any.
    #[must_use]
    pub const fn rows(&self) -> Option<&RowSet> {
        match self {
            Self::Rows(row_set) => Some(row_set),
            Self::Status(_) | Self::Failed(_) => None,
        }
    }
}

/// Bind parameter for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// 64-bit integer.
    Int(i64),
    /// Double-precision real.
    Real(f64),
    /// Boolean.
    Bool(bool),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
}

/// Port for executing SQL against the warehouse.
#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsQueryRunner {
    /// Execute `sql` with positional `params` (`$1`, `$2`, ...).
    fn execute(&self, sql: &str, params: &[QueryParam]) -> QueryOutcome;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn affected_uses_status_wording() {
        assert_eq!(
            QueryOutcome::affected(3),
            QueryOutcome::Status("Query executed successfully. Rows affected: 3".to_owned())
        );
    }

    #[rstest]
    fn failed_prefixes_error() {
        let outcome = QueryOutcome::failed("relation \"dim_topics\" does not exist");
        assert_eq!(
            outcome,
            QueryOutcome::Failed("Error: relation \"dim_topics\" does not exist".to_owned())
        );
        assert!(outcome.rows().is_none());
    }
}
