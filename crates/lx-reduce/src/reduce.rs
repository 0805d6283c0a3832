use crate::{dispatch, identifier, lambda, list, number, quote, vector};
use lx_core::ast::{ConstValue, Constant, Node, NodeKind, SyntaxTree};
use lx_core::types::{Literal, Ty};
use lx_core::{Result, SymbolTable};

/// Outcome of one variant-specific reduction step.
pub(crate) enum Step {
    /// Reduced to another, already reduced node.
    To(Node),
    /// The node is its own target form from now on.
    Terminal,
    /// Not enough type information yet; the node stays reducible.
    Deferred,
}

/// Reduces `node` toward `expected`.
///
/// Terminal nodes come back unchanged (modulo an implicit conversion to
/// `expected`); everything else is reduced once per expected type. Both are
/// cached, so repeated calls with the same expected type return the same node.
pub fn reduce(node: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Result<Node> {
    if let Some(hit) = node.cached(expected) {
        lx_core::trace!("cache hit for #{}", node.id());
        return Ok(hit);
    }
    if !node.can_reduce() {
        return Ok(settle(node, symbols, expected));
    }
    let result = match reduce_step(node, symbols, expected)? {
        Step::To(reduced) if reduced.ptr_eq(node) => {
            node.mark_terminal();
            return Ok(settle(node, symbols, expected));
        }
        Step::To(reduced) => coerce(&reduced, symbols, expected),
        Step::Terminal => {
            node.mark_terminal();
            return Ok(settle(node, symbols, expected));
        }
        Step::Deferred => return Ok(node.clone()),
    };
    node.store(expected, &result);
    Ok(result)
}

/// A terminal node converted toward `expected`. The conversion wraps the
/// node, so it is cached weakly.
fn settle(node: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Node {
    let result = coerce(node, symbols, expected);
    node.store_weak(expected, &result);
    result
}

/// Speculative reduction: failures are logged and become `None`.
pub fn try_reduce(node: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Option<Node> {
    match reduce(node, symbols, expected) {
        Ok(reduced) => Some(reduced),
        Err(err) => {
            lx_core::trace!("speculative reduction of {} failed: {}", node, err);
            None
        }
    }
}

fn reduce_step(node: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Result<Step> {
    match node.kind() {
        NodeKind::Identifier(ident) => {
            identifier::reduce_identifier(node, &ident.name, symbols, expected)
        }
        NodeKind::List(items) => list::reduce_list(node, items, symbols, expected),
        NodeKind::Vector(items) => vector::reduce_vector(node, items, symbols, expected),
        NodeKind::Dispatch(_) => dispatch::reduce_dispatch(node, symbols, expected),
        NodeKind::AmbiguousLambda(_) | NodeKind::LambdaList(_) => {
            lambda::reduce_lambda(node, symbols, expected)
        }
        NodeKind::AmbiguousParameter(param) => Ok(match (&param.name, &param.ty) {
            (Some(name), Some(ty)) if param.is_fixed() => {
                Step::To(Node::parameter(name.clone(), ty.clone()))
            }
            _ => Step::Deferred,
        }),
        NodeKind::Quoted(inner) => quote::reduce_quoted(inner, symbols, expected),
        NodeKind::Number(number) => Ok(Step::To(Node::constant(number::parse_number(
            &number.text,
        )?))),
        NodeKind::Text(text) => Ok(Step::To(Node::constant(Literal::string(text.clone())))),
        NodeKind::Serialized(value) => {
            let syntax = SyntaxTree::from_json(value.clone())?;
            Ok(Step::To(reduce(&syntax.to_node(), symbols, expected)?))
        }
        _ => Ok(Step::Terminal),
    }
}

/// Wraps `node` in an implicit conversion when its type differs from a
/// closed `expected` type it converts to.
pub(crate) fn coerce(node: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Node {
    let Some(expected) = expected else {
        return node.clone();
    };
    if !symbols.config().implicit_conversions || expected.is_open() {
        return node.clone();
    }
    let Some(actual) = node.ty() else {
        return node.clone();
    };
    if &actual == expected {
        return node.clone();
    }
    let oracle = symbols.oracle();
    if is_null_constant(node) && !oracle.is_value_type(expected) {
        return Node::typed_constant(Literal::Null, expected.clone());
    }
    if oracle.is_implicitly_convertible(&actual, expected) {
        return Node::convert(node.clone(), expected.clone(), false);
    }
    node.clone()
}

pub(crate) fn is_null_constant(node: &Node) -> bool {
    matches!(
        node.kind(),
        NodeKind::Constant(Constant {
            value: ConstValue::Literal(Literal::Null),
            ..
        })
    )
}

/// Whether `node` is usable as a value of type `ty` without an explicit cast.
pub(crate) fn fits(node: &Node, symbols: &SymbolTable, ty: &Ty) -> bool {
    match node.ty() {
        Some(actual) => {
            &actual == ty
                || symbols.oracle().is_implicitly_convertible(&actual, ty)
                || (is_null_constant(node) && !symbols.oracle().is_value_type(ty))
        }
        None => false,
    }
}
