use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Names of the types the engine itself relies on.
pub mod well_known {
    pub const OBJECT: &str = "Object";
    pub const VOID: &str = "Void";
    pub const BOOLEAN: &str = "Boolean";
    pub const CHAR: &str = "Char";
    pub const INT32: &str = "Int32";
    pub const UINT32: &str = "UInt32";
    pub const INT64: &str = "Int64";
    pub const UINT64: &str = "UInt64";
    pub const SINGLE: &str = "Single";
    pub const DOUBLE: &str = "Double";
    pub const DECIMAL: &str = "Decimal";
    pub const STRING: &str = "String";
    pub const TYPE: &str = "Type";
    pub const ARRAY: &str = "Array";
    pub const EXPRESSION: &str = "Expression";
    pub const FUNC: &str = "Func";
    pub const ACTION: &str = "Action";
    pub const IENUMERABLE: &str = "IEnumerable";
    pub const LIST: &str = "List";
    pub const IOBSERVABLE: &str = "IObservable";
}

use well_known::*;

/// A structural type descriptor. Metadata (members, base types, ...) lives in
/// the type oracle, keyed by [`Ty::def_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ty {
    Named(TypeName),
    Array(Box<Ty>),
    /// An open generic parameter such as `T`.
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Ty>,
}

impl Ty {
    pub fn named(name: impl Into<String>) -> Ty {
        Ty::Named(TypeName {
            name: name.into(),
            args: vec![],
        })
    }
    pub fn generic(name: impl Into<String>, args: Vec<Ty>) -> Ty {
        Ty::Named(TypeName {
            name: name.into(),
            args,
        })
    }
    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }
    pub fn param(name: impl Into<String>) -> Ty {
        Ty::Param(name.into())
    }

    pub fn object() -> Ty {
        Ty::named(OBJECT)
    }
    pub fn void() -> Ty {
        Ty::named(VOID)
    }
    pub fn bool() -> Ty {
        Ty::named(BOOLEAN)
    }
    pub fn char() -> Ty {
        Ty::named(CHAR)
    }
    pub fn int32() -> Ty {
        Ty::named(INT32)
    }
    pub fn uint32() -> Ty {
        Ty::named(UINT32)
    }
    pub fn int64() -> Ty {
        Ty::named(INT64)
    }
    pub fn uint64() -> Ty {
        Ty::named(UINT64)
    }
    pub fn single() -> Ty {
        Ty::named(SINGLE)
    }
    pub fn double() -> Ty {
        Ty::named(DOUBLE)
    }
    pub fn decimal() -> Ty {
        Ty::named(DECIMAL)
    }
    pub fn string() -> Ty {
        Ty::named(STRING)
    }
    pub fn expression() -> Ty {
        Ty::named(EXPRESSION)
    }
    /// `Func<params..., ret>`
    pub fn func(params: Vec<Ty>, ret: Ty) -> Ty {
        let mut args = params;
        args.push(ret);
        Ty::generic(FUNC, args)
    }
    /// `Action<params...>`, or plain `Action` without parameters.
    pub fn action(params: Vec<Ty>) -> Ty {
        Ty::generic(ACTION, params)
    }
    /// Delegate type for a signature: `Action` when it returns `Void`.
    pub fn delegate(params: Vec<Ty>, ret: Ty) -> Ty {
        if ret.is_void() {
            Ty::action(params)
        } else {
            Ty::func(params, ret)
        }
    }
    pub fn enumerable(elem: Ty) -> Ty {
        Ty::generic(IENUMERABLE, vec![elem])
    }
    pub fn list(elem: Ty) -> Ty {
        Ty::generic(LIST, vec![elem])
    }

    pub fn name(&self) -> &str {
        match self {
            Ty::Named(named) => &named.name,
            Ty::Array(_) => ARRAY,
            Ty::Param(name) => name,
        }
    }

    /// Key of the generic definition: `List\`1` for `List<Int32>`, `Array\`1`
    /// for any array, the plain name otherwise.
    pub fn def_key(&self) -> String {
        match self {
            Ty::Named(named) if named.args.is_empty() => named.name.clone(),
            Ty::Named(named) => format!("{}`{}", named.name, named.args.len()),
            Ty::Array(_) => format!("{}`1", ARRAY),
            Ty::Param(name) => name.clone(),
        }
    }

    /// Generic arguments; the element type for arrays.
    pub fn type_args(&self) -> &[Ty] {
        match self {
            Ty::Named(named) => &named.args,
            Ty::Array(elem) => std::slice::from_ref(elem.as_ref()),
            Ty::Param(_) => &[],
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, Ty::Named(named) if named.name == name && named.args.is_empty())
    }
    pub fn is_void(&self) -> bool {
        self.is_named(VOID)
    }
    pub fn is_object(&self) -> bool {
        self.is_named(OBJECT)
    }
    pub fn is_param(&self) -> bool {
        matches!(self, Ty::Param(_))
    }
    pub fn is_array(&self) -> bool {
        matches!(self, Ty::Array(_))
    }
    pub fn element_type(&self) -> Option<&Ty> {
        match self {
            Ty::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// True when the type mentions a generic parameter anywhere.
    pub fn is_open(&self) -> bool {
        match self {
            Ty::Param(_) => true,
            Ty::Array(elem) => elem.is_open(),
            Ty::Named(named) => named.args.iter().any(Ty::is_open),
        }
    }

    /// Same generic definition (ignores arguments).
    pub fn same_definition(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Array(_), Ty::Array(_)) => true,
            (Ty::Named(a), Ty::Named(b)) => a.name == b.name && a.args.len() == b.args.len(),
            (Ty::Param(a), Ty::Param(b)) => a == b,
            _ => false,
        }
    }

    /// Replaces bound parameters; unbound ones stay open.
    pub fn substitute(&self, map: &HashMap<String, Ty>) -> Ty {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Ty::Param(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Ty::Array(elem) => Ty::Array(Box::new(elem.substitute(map))),
            Ty::Named(named) => Ty::Named(TypeName {
                name: named.name.clone(),
                args: named.args.iter().map(|arg| arg.substitute(map)).collect(),
            }),
        }
    }

    /// Collects the generic parameter names mentioned, in first-seen order.
    pub fn collect_params(&self, out: &mut Vec<String>) {
        match self {
            Ty::Param(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Ty::Array(elem) => elem.collect_params(out),
            Ty::Named(named) => named.args.iter().for_each(|arg| arg.collect_params(out)),
        }
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Named(named) if named.args.is_empty() => f.write_str(&named.name),
            Ty::Named(named) => write!(f, "{}<{}>", named.name, named.args.iter().join(", ")),
            Ty::Array(elem) => write!(f, "{}[]", elem),
            Ty::Param(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Ty {
    fn from(name: &str) -> Self {
        Ty::named(name)
    }
}
