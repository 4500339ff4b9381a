//! sift-filter — decodes flat, multi-valued URL query parameters into a
//! typed, validated filter expression tree.
//!
//! The input is the kind of map a query-string parser produces; the output
//! is a [`Filter`]: boolean AND/OR conjunctions of typed leaf comparisons,
//! ordered sort keys and clamped pagination bounds, ready to drive a query
//! builder.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use sift_filter::{Decoder, Field, Schema};
//!
//! let schema = Schema::builder()
//!     .field(Field::new("age", "int").sortable())
//!     .field(Field::new("name", "string"))
//!     .build()
//!     .unwrap();
//! let decoder = Decoder::new(schema);
//!
//! let mut params: HashMap<String, Vec<String>> = HashMap::new();
//! params.insert("age.gt".into(), vec!["13".into()]);
//! params.insert("sort_by".into(), vec!["age.desc".into()]);
//!
//! let filter = decoder.decode(&params).unwrap();
//! assert_eq!(filter.and.len(), 1);
//! assert_eq!(filter.sort.len(), 1);
//! ```
//!
//! The filter grammar in one screen:
//!
//! ```text
//! age.gt=13                  field.operator=value
//! name.in={a,b,"c,d"}        brace-wrapped comma list, quotes keep commas
//! and=(age.gt:13,or.(name.eq:john,name.neq:jane))
//!                            nested boolean groups
//! sort_by=age.desc,name      direction and null placement per key
//! limit=20&offset=40         clamped pagination
//! ```

pub mod decoder;
pub mod error;
pub mod lexer;
pub mod op;
pub mod order;
pub mod parsers;
pub mod query;
pub mod schema;
pub mod value;

// Re-export main types
pub use decoder::{Cond, Decoder, DecoderConfig, FieldSet, FieldValue, Filter};
pub use error::{Error, Result};
pub use op::{Op, OpSet};
pub use order::{Direction, NullsOrder, Order};
pub use parsers::{ParserError, ParserFn};
pub use query::Query;
pub use schema::{Field, Schema, SchemaBuilder};
pub use value::Value;
