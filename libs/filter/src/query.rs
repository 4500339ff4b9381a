//! Query tokenization: raw `key=value` pairs into normalized atomic queries.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::lexer::split_first;
use crate::op::Op;

/// One `(field, operator, raw values)` unit extracted from the parameter
/// map, before any type decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub field: String,
    pub op: Op,
    /// Raw values in input order, duplicates preserved.
    pub values: Vec<String>,
}

/// Converts ordered `(key, value)` items into a list of queries.
///
/// Keys in `reserved` (the conjunction, sort and pagination keys) are
/// skipped. Each remaining key encodes `field.operator`; repeated keys
/// collect into one query's value list. The result is sorted by
/// `(field, operator token)` so decode output does not depend on the
/// parameter map's iteration order.
pub fn tokenize(items: &[(String, String)], reserved: &HashSet<&str>) -> Result<Vec<Query>> {
    let mut queries: Vec<Query> = Vec::new();

    for (key, value) in items {
        if reserved.contains(key.as_str()) {
            continue;
        }

        let (field, op_token) = split_first(key, '.');
        if field.is_empty() {
            return Err(Error::UnknownField {
                field: key.clone(),
            });
        }

        let op = Op::parse(op_token).ok_or_else(|| Error::UnknownOperator {
            token: key.clone(),
        })?;

        match queries
            .iter_mut()
            .find(|q| q.field == field && q.op == op)
        {
            Some(query) => query.values.push(value.clone()),
            None => queries.push(Query {
                field: field.to_string(),
                op,
                values: vec![value.clone()],
            }),
        }
    }

    queries.sort_by(|a, b| {
        a.field
            .cmp(&b.field)
            .then_with(|| a.op.as_str().cmp(b.op.as_str()))
    });

    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_reserved() -> HashSet<&'static str> {
        HashSet::new()
    }

    #[test]
    fn splits_field_and_operator_on_first_dot() {
        let queries = tokenize(&items(&[("age.gt", "13")]), &no_reserved()).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].field, "age");
        assert_eq!(queries[0].op, Op::Gt);
        assert_eq!(queries[0].values, vec!["13"]);
    }

    #[test]
    fn repeated_keys_collect_into_one_query() {
        let queries = tokenize(
            &items(&[("name.in", "alice"), ("name.in", "bob")]),
            &no_reserved(),
        )
        .unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].values, vec!["alice", "bob"]);
    }

    #[test]
    fn reserved_keys_are_skipped() {
        let reserved: HashSet<&str> = ["and", "or", "sort_by"].into();
        let queries = tokenize(
            &items(&[("and", "(age.gt:1)"), ("sort_by", "age"), ("age.lt", "9")]),
            &reserved,
        )
        .unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].field, "age");
    }

    #[test]
    fn output_order_is_deterministic() {
        let forward = tokenize(
            &items(&[("b.eq", "1"), ("a.gt", "2"), ("a.eq", "3")]),
            &no_reserved(),
        )
        .unwrap();
        let backward = tokenize(
            &items(&[("a.eq", "3"), ("a.gt", "2"), ("b.eq", "1")]),
            &no_reserved(),
        )
        .unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward[0].field, "a");
        assert_eq!(forward[0].op, Op::Eq);
        assert_eq!(forward[1].op, Op::Gt);
        assert_eq!(forward[2].field, "b");
    }

    #[test]
    fn missing_field_name_is_rejected() {
        let err = tokenize(&items(&[(".eq", "x")]), &no_reserved()).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn unknown_or_missing_operator_is_rejected() {
        let err = tokenize(&items(&[("age.zz", "1")]), &no_reserved()).unwrap_err();
        assert!(matches!(err, Error::UnknownOperator { token } if token == "age.zz"));

        let err = tokenize(&items(&[("age", "1")]), &no_reserved()).unwrap_err();
        assert!(matches!(err, Error::UnknownOperator { .. }));
    }
}
