//! Sort token parsing.
//!
//! Grammar: `field [ "." direction [ "." nulls_option ] ]`. The default
//! direction is ascending; the default null placement follows the SQL
//! pairing (ascending puts nulls last, descending puts them first).

use serde::Serialize;

use crate::error::{Error, Result};
use crate::lexer::split_first;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(token: &str) -> Option<Direction> {
        match token.to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }

    /// The SQL-standard null placement for this direction.
    const fn default_nulls(self) -> NullsOrder {
        match self {
            Direction::Asc => NullsOrder::Last,
            Direction::Desc => NullsOrder::First,
        }
    }
}

/// Where nulls sort relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    fn parse(token: &str) -> Option<NullsOrder> {
        match token.to_ascii_lowercase().as_str() {
            "nullsfirst" => Some(NullsOrder::First),
            "nullslast" => Some(NullsOrder::Last),
            _ => None,
        }
    }
}

/// One ordered sort key. Sort priority is positional: the first parsed
/// order is the primary sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
    pub nulls: NullsOrder,
}

/// Parses a single `field.direction.nullsOption` token.
pub fn parse_order(token: &str) -> Result<Order> {
    let (field, rest) = split_first(token.trim(), '.');
    let (direction_token, nulls_token) = split_first(rest, '.');

    let direction = match direction_token {
        "" => Direction::Asc,
        t => Direction::parse(t).ok_or_else(|| Error::InvalidSortDirection {
            token: t.to_string(),
        })?,
    };

    let nulls = match nulls_token {
        "" => direction.default_nulls(),
        t => NullsOrder::parse(t).ok_or_else(|| Error::InvalidSortOption {
            token: t.to_string(),
        })?,
    };

    Ok(Order {
        field: field.to_string(),
        direction,
        nulls,
    })
}

/// Parses each non-empty token independently, preserving input order.
pub fn parse_orders<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Order>> {
    let mut orders = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        orders.push(parse_order(token)?);
    }
    Ok(orders)
}
