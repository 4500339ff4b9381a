//! Typed values produced by the per-field parsers.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A decoded, typed filter value.
///
/// Leaves of the filter tree carry either one `Value` or an ordered list of
/// them, depending on the operator and the field's array-ness.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    Date(NaiveDate),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Decodes an `is`/`isnot` vocabulary word into its marker value.
    ///
    /// The caller has already validated the word against the vocabulary.
    /// `unknown` maps to the null marker; for booleans SQL treats IS UNKNOWN
    /// and IS NULL identically.
    pub(crate) fn from_is_word(word: &str) -> Value {
        match word.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" | "y" | "yes" => Value::Bool(true),
            "0" | "f" | "false" | "n" | "no" => Value::Bool(false),
            _ => Value::Null,
        }
    }
}
