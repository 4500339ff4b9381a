//! Semantic-type parsers.
//!
//! Every field descriptor names a semantic type (`int`, `string`,
//! `timestamp`, ...); decoding a raw query value dispatches to the parser
//! registered for that name. The default set below can be extended with
//! custom types through [`crate::schema::SchemaBuilder::parser`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::Value;

/// The error type parsers return; wrapped into
/// [`crate::error::Error::BadValue`] with field context by the decoder.
pub type ParserError = Box<dyn std::error::Error + Send + Sync>;

/// A registered parser for one semantic type.
pub type ParserFn = Arc<dyn Fn(&str) -> Result<Value, ParserError> + Send + Sync>;

fn parser<F>(f: F) -> ParserFn
where
    F: Fn(&str) -> Result<Value, ParserError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The parsers registered for every schema before custom registrations.
pub(crate) fn default_parsers() -> HashMap<String, ParserFn> {
    let mut parsers: HashMap<String, ParserFn> = HashMap::new();
    parsers.insert("string".into(), parser(parse_string));
    parsers.insert("int".into(), parser(parse_int));
    parsers.insert("float".into(), parser(parse_float));
    parsers.insert("decimal".into(), parser(parse_decimal));
    parsers.insert("bool".into(), parser(parse_bool));
    parsers.insert("timestamp".into(), parser(parse_timestamp));
    parsers.insert("date".into(), parser(parse_date));
    parsers.insert("uuid".into(), parser(parse_uuid));
    parsers.insert("json".into(), parser(parse_json));
    parsers
}

fn parse_string(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Text(raw.to_string()))
}

fn parse_int(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Int(raw.parse::<i64>()?))
}

fn parse_float(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Float(raw.parse::<f64>()?))
}

fn parse_decimal(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Decimal(raw.parse::<Decimal>()?))
}

/// Accepts the usual spellings: `1`, `t`, `true`, `0`, `f`, `false`, in any
/// case.
fn parse_bool(raw: &str) -> Result<Value, ParserError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(Value::Bool(true)),
        "0" | "f" | "false" => Ok(Value::Bool(false)),
        _ => Err(format!("not a boolean: {raw}").into()),
    }
}

/// RFC 3339 timestamps, offset preserved.
fn parse_timestamp(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Timestamp(DateTime::parse_from_rfc3339(raw)?))
}

fn parse_date(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Date(raw.parse::<NaiveDate>()?))
}

fn parse_uuid(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Uuid(Uuid::parse_str(raw)?))
}

fn parse_json(raw: &str) -> Result<Value, ParserError> {
    Ok(Value::Json(serde_json::from_str(raw)?))
}
