use crate::types::Ty;
use bigdecimal::BigDecimal;
use std::fmt::{Display, Formatter};

/// A primitive constant value: literal leaves, optional-parameter defaults and
/// constant fields all carry one.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Char(char),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
}

impl Literal {
    pub fn ty(&self) -> Ty {
        match self {
            Literal::Null => Ty::object(),
            Literal::Bool(_) => Ty::bool(),
            Literal::Char(_) => Ty::char(),
            Literal::Int32(_) => Ty::int32(),
            Literal::UInt32(_) => Ty::uint32(),
            Literal::Int64(_) => Ty::int64(),
            Literal::UInt64(_) => Ty::uint64(),
            Literal::Single(_) => Ty::single(),
            Literal::Double(_) => Ty::double(),
            Literal::Decimal(_) => Ty::decimal(),
            Literal::String(_) => Ty::string(),
        }
    }

    pub fn string(s: impl Into<String>) -> Literal {
        Literal::String(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "'{}'", c),
            Literal::Int32(v) => write!(f, "{}", v),
            Literal::UInt32(v) => write!(f, "{}U", v),
            Literal::Int64(v) => write!(f, "{}L", v),
            Literal::UInt64(v) => write!(f, "{}UL", v),
            Literal::Single(v) => write!(f, "{}F", v),
            Literal::Double(v) => write!(f, "{:?}", v),
            Literal::Decimal(v) => write!(f, "{}M", v),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}
