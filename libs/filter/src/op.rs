//! Filter operators and operator capability sets.
//!
//! Every operator has exactly one canonical token (`eq`, `notin`, `plfts`,
//! ...) and token matching is case-insensitive. Operators are grouped into
//! named capability sets (`OpSet`) so a field descriptor can declare which
//! operators it accepts with cheap bitwise containment checks.

use std::fmt;
use std::ops::BitOr;

use serde::Serialize;

/// A filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Op {
    // Equality family
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    // Membership
    In,
    NotIn,

    // Pattern family
    Like,
    Ilike,
    NotLike,
    NotIlike,

    // Null-aware comparison, e.g. `height.is=null`
    Is,
    IsNot,

    // Full-text search family
    Fts,
    PlFts,
    PhFts,
    WFts,

    // Range / set family (array columns)
    Cs,
    Cd,
    Ov,
    Sl,
    Sr,
    Nxr,
    Nxl,
    Adj,

    // Conjunction markers
    And,
    Or,
    Not,
}

static OP_TOKENS: phf::Map<&'static str, Op> = phf::phf_map! {
    "eq" => Op::Eq,
    "neq" => Op::Neq,
    "lt" => Op::Lt,
    "lte" => Op::Lte,
    "gt" => Op::Gt,
    "gte" => Op::Gte,
    "in" => Op::In,
    "notin" => Op::NotIn,
    "like" => Op::Like,
    "ilike" => Op::Ilike,
    "notlike" => Op::NotLike,
    "notilike" => Op::NotIlike,
    "is" => Op::Is,
    "isnot" => Op::IsNot,
    "fts" => Op::Fts,
    "plfts" => Op::PlFts,
    "phfts" => Op::PhFts,
    "wfts" => Op::WFts,
    "cs" => Op::Cs,
    "cd" => Op::Cd,
    "ov" => Op::Ov,
    "sl" => Op::Sl,
    "sr" => Op::Sr,
    "nxr" => Op::Nxr,
    "nxl" => Op::Nxl,
    "adj" => Op::Adj,
    "and" => Op::And,
    "or" => Op::Or,
    "not" => Op::Not,
};

/// All operators, in declaration order. Used for exhaustive checks in tests.
pub const ALL_OPS: [Op; 29] = [
    Op::Eq,
    Op::Neq,
    Op::Lt,
    Op::Lte,
    Op::Gt,
    Op::Gte,
    Op::In,
    Op::NotIn,
    Op::Like,
    Op::Ilike,
    Op::NotLike,
    Op::NotIlike,
    Op::Is,
    Op::IsNot,
    Op::Fts,
    Op::PlFts,
    Op::PhFts,
    Op::WFts,
    Op::Cs,
    Op::Cd,
    Op::Ov,
    Op::Sl,
    Op::Sr,
    Op::Nxr,
    Op::Nxl,
    Op::Adj,
    Op::And,
    Op::Or,
    Op::Not,
];

impl Op {
    /// Parse an operator token, case-insensitively. Unknown tokens yield
    /// `None`; the caller decides which error to surface.
    pub fn parse(token: &str) -> Option<Op> {
        OP_TOKENS.get(token.to_ascii_lowercase().as_str()).copied()
    }

    /// The canonical token for this operator. Round-trips through
    /// [`Op::parse`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::In => "in",
            Op::NotIn => "notin",
            Op::Like => "like",
            Op::Ilike => "ilike",
            Op::NotLike => "notlike",
            Op::NotIlike => "notilike",
            Op::Is => "is",
            Op::IsNot => "isnot",
            Op::Fts => "fts",
            Op::PlFts => "plfts",
            Op::PhFts => "phfts",
            Op::WFts => "wfts",
            Op::Cs => "cs",
            Op::Cd => "cd",
            Op::Ov => "ov",
            Op::Sl => "sl",
            Op::Sr => "sr",
            Op::Nxr => "nxr",
            Op::Nxl => "nxl",
            Op::Adj => "adj",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
        }
    }

    const fn mask(self) -> u32 {
        1 << (self as u32)
    }

    /// Whether the operator compares against a list of values rather than a
    /// single scalar (`in`, `notin` and the pattern family).
    pub const fn takes_list(self) -> bool {
        OpSet::MEMBERSHIP.contains(self) || OpSet::PATTERN.contains(self)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of operators, backed by a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpSet(u32);

impl OpSet {
    pub const EMPTY: OpSet = OpSet(0);

    /// Operators every field accepts.
    pub const COMPARABLE: OpSet = OpSet(
        Op::Eq.mask()
            | Op::Neq.mask()
            | Op::Lt.mask()
            | Op::Lte.mask()
            | Op::Gt.mask()
            | Op::Gte.mask()
            | Op::In.mask()
            | Op::NotIn.mask(),
    );

    /// Null-aware operators, added for nullable fields.
    pub const NULLABLE: OpSet = OpSet(Op::Is.mask() | Op::IsNot.mask());

    /// Pattern-matching operators, added for string fields.
    pub const PATTERN: OpSet = OpSet(
        Op::Like.mask() | Op::Ilike.mask() | Op::NotLike.mask() | Op::NotIlike.mask(),
    );

    /// Full-text-search operators, added for string fields.
    pub const FULL_TEXT: OpSet =
        OpSet(Op::Fts.mask() | Op::PlFts.mask() | Op::PhFts.mask() | Op::WFts.mask());

    /// Range and set operators, added for array fields.
    pub const RANGE: OpSet = OpSet(
        Op::Cs.mask()
            | Op::Cd.mask()
            | Op::Ov.mask()
            | Op::Sl.mask()
            | Op::Sr.mask()
            | Op::Nxr.mask()
            | Op::Nxl.mask()
            | Op::Adj.mask(),
    );

    pub(crate) const MEMBERSHIP: OpSet = OpSet(Op::In.mask() | Op::NotIn.mask());

    pub const fn contains(self, op: Op) -> bool {
        self.0 & op.mask() != 0
    }

    pub const fn with(self, op: Op) -> OpSet {
        OpSet(self.0 | op.mask())
    }

    pub const fn union(self, other: OpSet) -> OpSet {
        OpSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Op> for OpSet {
    fn from(op: Op) -> Self {
        OpSet(op.mask())
    }
}

impl BitOr for OpSet {
    type Output = OpSet;

    fn bitor(self, rhs: OpSet) -> OpSet {
        self.union(rhs)
    }
}

impl BitOr<Op> for OpSet {
    type Output = OpSet;

    fn bitor(self, rhs: Op) -> OpSet {
        self.with(rhs)
    }
}

/// The value vocabulary accepted by `is`/`isnot`, independent of the field's
/// semantic type.
pub(crate) fn in_is_vocabulary(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "1"
            | "f"
            | "t"
            | "false"
            | "true"
            | "null"
            | "unknown"
            | "yes"
            | "no"
            | "y"
            | "n"
    )
}
