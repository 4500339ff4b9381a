//! Field descriptors and the schema a decoder is built from.
//!
//! The schema is resolved configuration: a map from field name to
//! descriptor, plus the semantic-type parser registry. It is constructed
//! once through [`SchemaBuilder`], validated eagerly, and read-only
//! afterwards, so it can be shared freely across threads.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::op::OpSet;
use crate::parsers::{default_parsers, ParserError, ParserFn};
use crate::value::Value;

/// Metadata for one filterable field.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) semantic_type: String,
    pub(crate) nullable: bool,
    pub(crate) array: bool,
    pub(crate) sortable: bool,
    ops: Option<OpSet>,
}

impl Field {
    pub fn new(name: impl Into<String>, semantic_type: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            semantic_type: semantic_type.into(),
            nullable: false,
            array: false,
            sortable: false,
            ops: None,
        }
    }

    /// Marks the field nullable, adding the `is`/`isnot` operators.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the field as an array column, adding the range operators.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Allows the field in sort tokens.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Replaces the derived operator set with an explicit one.
    pub fn with_ops(mut self, ops: OpSet) -> Self {
        self.ops = Some(ops);
        self
    }

    /// The operators this field accepts: the explicit override if set,
    /// otherwise derived from the field's shape.
    pub(crate) fn allowed_ops(&self) -> OpSet {
        match self.ops {
            Some(ops) => ops,
            None => {
                let mut ops = OpSet::COMPARABLE;
                if self.nullable {
                    ops = ops | OpSet::NULLABLE;
                }
                if self.array {
                    ops = ops | OpSet::RANGE;
                }
                if self.semantic_type == "string" {
                    ops = ops | OpSet::PATTERN | OpSet::FULL_TEXT;
                }
                ops
            }
        }
    }
}

/// The resolved field map plus parser registry a [`crate::Decoder`] consumes.
pub struct Schema {
    fields: HashMap<String, Field>,
    parsers: HashMap<String, ParserFn>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            fields: Vec::new(),
            parsers: default_parsers(),
        }
    }

    pub(crate) fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub(crate) fn parser(&self, semantic_type: &str) -> Option<&ParserFn> {
        self.parsers.get(semantic_type)
    }

    /// Whether `field` is known and marked sortable.
    pub fn is_sortable(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|f| f.sortable)
    }
}

// Parser closures are opaque, so print the registered semantic types
// instead of deriving.
impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        fields.sort_unstable();
        let mut parsers: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        parsers.sort_unstable();
        f.debug_struct("Schema")
            .field("fields", &fields)
            .field("parsers", &parsers)
            .finish()
    }
}

/// Builds a [`Schema`]; the only place fields and parsers can be registered.
pub struct SchemaBuilder {
    fields: Vec<Field>,
    parsers: HashMap<String, ParserFn>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Registers (or replaces) the parser for a semantic type.
    pub fn parser<F>(mut self, semantic_type: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Value, ParserError> + Send + Sync + 'static,
    {
        self.parsers
            .insert(semantic_type.into(), std::sync::Arc::new(parse));
        self
    }

    /// Finalizes the schema.
    ///
    /// Fails with [`Error::UnknownParser`] if any field names a semantic
    /// type without a registered parser; a missing parser is a setup bug
    /// and must not be deferred to decode time.
    pub fn build(self) -> Result<Schema> {
        let mut fields = HashMap::with_capacity(self.fields.len());
        for field in self.fields {
            if !self.parsers.contains_key(&field.semantic_type) {
                return Err(Error::UnknownParser {
                    semantic_type: field.semantic_type,
                });
            }
            fields.insert(field.name.clone(), field);
        }

        Ok(Schema {
            fields,
            parsers: self.parsers,
        })
    }
}
