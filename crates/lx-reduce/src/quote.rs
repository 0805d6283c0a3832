use crate::lambda::expression_body;
use crate::reduce::{reduce, Step};
use lx_core::ast::{Node, NodeKind};
use lx_core::types::Ty;
use lx_core::{Result, SymbolTable};

/// `'x`: the expression itself as data, or an expression tree for lambdas.
pub(crate) fn reduce_quoted(
    inner: &Node,
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    if inner.is_ambiguous_lambda() {
        let delegate = expected.map(|ty| expression_body(ty).unwrap_or(ty));
        let lambda = reduce(inner, symbols, delegate)?;
        return Ok(match lambda.kind() {
            NodeKind::Lambda(_) => Step::To(Node::new(NodeKind::Quote(lambda))),
            _ => Step::Deferred,
        });
    }
    if let NodeKind::Lambda(_) = inner.kind() {
        return Ok(Step::To(Node::new(NodeKind::Quote(inner.clone()))));
    }
    Ok(Step::To(Node::expr_constant(inner.clone())))
}
