//! The decoder: field value decoding, conjunction resolution and top-level
//! filter assembly.
//!
//! A [`Decoder`] is built once from a [`Schema`] and a [`DecoderConfig`] and
//! is read-only afterwards; `decode` is a pure function of its input and may
//! be called concurrently from multiple threads.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lexer::{split_csv, split_first, split_outside_brackets, unquote};
use crate::op::{in_is_vocabulary, Op};
use crate::order::{parse_orders, Order};
use crate::query::{tokenize, Query};
use crate::schema::Schema;
use crate::value::Value;

/// A node in the decoded filter tree: a typed leaf comparison or a
/// conjunction of child nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    Cond(Cond),
    And(Vec<FieldSet>),
    Or(Vec<FieldSet>),
}

/// A leaf comparison: one field, one operator, one decoded value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cond {
    pub field: String,
    pub op: Op,
    pub value: FieldValue,
}

/// The decoded value a leaf carries: a scalar, or an ordered list for
/// list-capable operators and array fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(Value),
    Many(Vec<Value>),
}

/// The decode result.
///
/// `and` holds the implicit top-level conjunction: bare-key leaves plus the
/// flattened children of every `and=` occurrence. `or` holds one OR group
/// per `or=` occurrence. `limit`/`offset` stay `None` when the client did
/// not send them; `None` is distinguishable from an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Filter {
    pub and: Vec<FieldSet>,
    pub or: Vec<FieldSet>,
    pub sort: Vec<Order>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Decoder tuning knobs. The defaults match the common deployment: `sort_by`
/// plus `limit`/`offset` keys, limits clamped into `1..=20`, conjunctions at
/// most 32 levels deep.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub sort_key: String,
    pub limit_key: String,
    pub offset_key: String,
    pub limit_min: i64,
    pub limit_max: i64,
    /// Ceiling on `and.(...)`/`or.(...)` nesting; bounds stack usage on
    /// adversarial input.
    pub max_nesting: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            sort_key: "sort_by".to_string(),
            limit_key: "limit".to_string(),
            offset_key: "offset".to_string(),
            limit_min: 1,
            limit_max: 20,
            max_nesting: 32,
        }
    }
}

const AND_KEY: &str = "and";
const OR_KEY: &str = "or";

#[derive(Clone, Copy, PartialEq)]
enum GroupKind {
    And,
    Or,
}

type Seen = HashSet<(String, Op)>;

/// Decodes flat query parameter maps into [`Filter`] values.
pub struct Decoder {
    schema: Schema,
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(schema: Schema) -> Self {
        Decoder {
            schema,
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(schema: Schema, config: DecoderConfig) -> Self {
        Decoder { schema, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a multi-valued parameter map, e.g. the output of a query
    /// string parser.
    pub fn decode(&self, params: &HashMap<String, Vec<String>>) -> Result<Filter> {
        let mut items = Vec::new();
        for (key, values) in params {
            for value in values {
                items.push((key.clone(), value.clone()));
            }
        }
        self.decode_items(&items)
    }

    /// Decodes ordered `(key, value)` items.
    pub fn decode_items(&self, items: &[(String, String)]) -> Result<Filter> {
        trace!(items = items.len(), "decoding filter");

        let reserved: HashSet<&str> = HashSet::from([
            AND_KEY,
            OR_KEY,
            self.config.sort_key.as_str(),
            self.config.limit_key.as_str(),
            self.config.offset_key.as_str(),
        ]);

        // Bare keys become implicit top-level AND leaves. The duplicate
        // tracker is shared with explicit `and=` membership below.
        let mut seen = Seen::new();
        let mut and = Vec::new();
        for query in tokenize(items, &reserved)? {
            and.push(FieldSet::Cond(self.decode_field(&query, Some(&mut seen))?));
        }

        for token in values_of(items, AND_KEY) {
            let children = self.resolve_group(GroupKind::And, token, 0, &mut seen)?;
            and.extend(children);
        }

        let mut or = Vec::new();
        for token in values_of(items, OR_KEY) {
            let mut group_seen = Seen::new();
            let children = self.resolve_group(GroupKind::Or, token, 0, &mut group_seen)?;
            or.push(FieldSet::Or(children));
        }

        let sort = self.parse_sort(items)?;
        let limit = self
            .parse_pagination(items, &self.config.limit_key)?
            .map(|n| n.clamp(self.config.limit_min, self.config.limit_max));
        let offset = self
            .parse_pagination(items, &self.config.offset_key)?
            .map(|n| n.max(0));

        let filter = Filter {
            and,
            or,
            sort,
            limit,
            offset,
        };
        debug!(
            and = filter.and.len(),
            or = filter.or.len(),
            sort = filter.sort.len(),
            "decoded filter"
        );
        Ok(filter)
    }

    /// Decodes one query against the schema into a typed leaf.
    fn decode_field(&self, query: &Query, seen: Option<&mut Seen>) -> Result<Cond> {
        let field = self
            .schema
            .field(&query.field)
            .ok_or_else(|| Error::UnknownField {
                field: query.field.clone(),
            })?;

        if !field.allowed_ops().contains(query.op) {
            return Err(Error::OperatorNotPermitted {
                field: query.field.clone(),
                op: query.op,
            });
        }

        if let Some(seen) = seen {
            if !seen.insert((query.field.clone(), query.op)) {
                return Err(Error::MultipleOperator {
                    field: query.field.clone(),
                    op: query.op,
                });
            }
        }

        // `is`/`isnot` compare against a fixed vocabulary and bypass the
        // field's parser entirely.
        if matches!(query.op, Op::Is | Op::IsNot) {
            if query.values.len() != 1 {
                return Err(Error::TooManyValues {
                    field: query.field.clone(),
                    op: query.op,
                });
            }
            let raw = &query.values[0];
            if !in_is_vocabulary(raw) {
                return Err(Error::InvalidIsValue {
                    field: query.field.clone(),
                    op: query.op,
                    value: raw.clone(),
                });
            }
            return Ok(Cond {
                field: query.field.clone(),
                op: query.op,
                value: FieldValue::One(Value::from_is_word(raw)),
            });
        }

        let parser = self
            .schema
            .parser(&field.semantic_type)
            .ok_or_else(|| Error::UnknownParser {
                semantic_type: field.semantic_type.clone(),
            })?;

        let value = if query.op.takes_list() || field.array {
            let mut decoded = Vec::new();
            for raw in &query.values {
                // A brace-wrapped value is an inline comma list; anything
                // else is a single element (the repeated-key form).
                let (inner, wrapped) = unquote(raw, '{', '}');
                if wrapped {
                    for element in split_csv(inner) {
                        decoded.push(run_parser(parser, &query.field, &element)?);
                    }
                } else {
                    decoded.push(run_parser(parser, &query.field, raw)?);
                }
            }
            FieldValue::Many(decoded)
        } else {
            if query.values.len() != 1 {
                return Err(Error::TooManyValues {
                    field: query.field.clone(),
                    op: query.op,
                });
            }
            // Strip one layer of double quotes so values containing commas
            // or dots pass through conjunction contexts unambiguously.
            let (raw, _) = unquote(&query.values[0], '"', '"');
            FieldValue::One(run_parser(parser, &query.field, raw)?)
        };

        Ok(Cond {
            field: query.field.clone(),
            op: query.op,
            value,
        })
    }

    /// Resolves one `(...)`-wrapped conjunction token into its children.
    ///
    /// Duplicate `(field, operator)` pairs are tracked per AND scope: the
    /// top-level scope is shared with the bare keys, nested groups each get
    /// a fresh scope, and OR children are alternatives and never checked.
    fn resolve_group(
        &self,
        kind: GroupKind,
        token: &str,
        depth: usize,
        seen: &mut Seen,
    ) -> Result<Vec<FieldSet>> {
        if depth >= self.config.max_nesting {
            return Err(Error::MaxNestingExceeded {
                max: self.config.max_nesting,
            });
        }

        let token = token.trim();
        let (body, wrapped) = unquote(token, '(', ')');
        if !wrapped {
            return Err(Error::InvalidConjunction {
                token: token.to_string(),
            });
        }

        let mut children = Vec::new();
        for sub in split_outside_brackets(body) {
            let sub = sub.trim();
            if sub.is_empty() {
                continue;
            }

            if let Some(rest) = sub.strip_prefix("and.") {
                let mut nested = Seen::new();
                children.push(FieldSet::And(self.resolve_group(
                    GroupKind::And,
                    rest,
                    depth + 1,
                    &mut nested,
                )?));
            } else if let Some(rest) = sub.strip_prefix("or.") {
                let mut nested = Seen::new();
                children.push(FieldSet::Or(self.resolve_group(
                    GroupKind::Or,
                    rest,
                    depth + 1,
                    &mut nested,
                )?));
            } else {
                let query = parse_leaf_token(sub)?;
                let cond = match kind {
                    GroupKind::And => self.decode_field(&query, Some(seen))?,
                    GroupKind::Or => self.decode_field(&query, None)?,
                };
                children.push(FieldSet::Cond(cond));
            }
        }

        Ok(children)
    }

    fn parse_sort(&self, items: &[(String, String)]) -> Result<Vec<Order>> {
        let mut orders = Vec::new();
        for value in values_of(items, &self.config.sort_key) {
            let tokens: Vec<&str> = value.split(',').collect();
            orders.extend(parse_orders(&tokens)?);
        }

        // Client-supplied sort fields that do not apply are dropped, not
        // rejected.
        orders.retain(|order| {
            let keep = self.schema.is_sortable(&order.field);
            if !keep {
                trace!(field = %order.field, "dropping unsortable sort field");
            }
            keep
        });
        Ok(orders)
    }

    fn parse_pagination(&self, items: &[(String, String)], key: &str) -> Result<Option<i64>> {
        match values_of(items, key).next() {
            Some(value) => {
                let n = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| Error::InvalidPagination {
                        key: key.to_string(),
                        value: value.clone(),
                    })?;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }
}

fn values_of<'a>(
    items: &'a [(String, String)],
    key: &'a str,
) -> impl Iterator<Item = &'a String> {
    items
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v)
}

/// Parses a conjunction leaf token: `field.op:value` or `field.op=value`.
fn parse_leaf_token(token: &str) -> Result<Query> {
    let (key, value) = match token.find(|c: char| c == ':' || c == '=') {
        Some(i) => (&token[..i], &token[i + 1..]),
        None => (token, ""),
    };

    let (field, op_token) = split_first(key, '.');
    if field.is_empty() {
        return Err(Error::UnknownField {
            field: token.to_string(),
        });
    }
    let op = Op::parse(op_token).ok_or_else(|| Error::UnknownOperator {
        token: key.to_string(),
    })?;

    Ok(Query {
        field: field.to_string(),
        op,
        values: vec![value.to_string()],
    })
}

fn run_parser(
    parser: &crate::parsers::ParserFn,
    field: &str,
    raw: &str,
) -> Result<Value> {
    parser(raw).map_err(|source| Error::BadValue {
        field: field.to_string(),
        value: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_token_colon_and_equals_separators() {
        let q = parse_leaf_token("age.gt:13").unwrap();
        assert_eq!((q.field.as_str(), q.op), ("age", Op::Gt));
        assert_eq!(q.values, vec!["13"]);

        let q = parse_leaf_token("age.gt=13").unwrap();
        assert_eq!(q.values, vec!["13"]);

        // The split is on the first separator only.
        let q = parse_leaf_token("created_at.gt:2024-03-01T10:30:00Z").unwrap();
        assert_eq!(q.values, vec!["2024-03-01T10:30:00Z"]);
    }

    #[test]
    fn leaf_token_without_value_keeps_empty_string() {
        let q = parse_leaf_token("name.eq").unwrap();
        assert_eq!(q.values, vec![""]);
    }

    #[test]
    fn leaf_token_errors() {
        assert!(matches!(
            parse_leaf_token(".eq:1"),
            Err(Error::UnknownField { .. })
        ));
        assert!(matches!(
            parse_leaf_token("age.zz:1"),
            Err(Error::UnknownOperator { .. })
        ));
    }
}
