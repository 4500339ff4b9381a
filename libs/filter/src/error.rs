//! Error types for filter decoding.

use thiserror::Error;

use crate::op::Op;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding query parameters into a filter.
///
/// All variants are validation errors raised against the client input,
/// except [`Error::UnknownParser`] which indicates a configuration bug and
/// is raised eagerly when the schema is built.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("unknown operator: {token}")]
    UnknownOperator { token: String },

    #[error("operator '{op}' is not permitted on field '{field}'")]
    OperatorNotPermitted { field: String, op: Op },

    #[error(
        "'{op}' on field '{field}' must be followed by one of true, false, null or unknown, got '{value}'"
    )]
    InvalidIsValue { field: String, op: Op, value: String },

    #[error("conjunction value must be wrapped in parentheses: {token}")]
    InvalidConjunction { token: String },

    #[error("operator '{op}' on field '{field}' accepts a single value")]
    TooManyValues { field: String, op: Op },

    #[error("field '{field}' was filtered more than once with operator '{op}'")]
    MultipleOperator { field: String, op: Op },

    #[error("no parser registered for semantic type '{semantic_type}'")]
    UnknownParser { semantic_type: String },

    #[error("bad value '{value}' for field '{field}'")]
    BadValue {
        field: String,
        value: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("conjunction nesting exceeds the maximum depth of {max}")]
    MaxNestingExceeded { max: usize },

    #[error("invalid sort direction: {token}")]
    InvalidSortDirection { token: String },

    #[error("invalid sort option: {token}")]
    InvalidSortOption { token: String },

    #[error("invalid {key} value: {value}")]
    InvalidPagination { key: String, value: String },
}
