//! Ambiguous lambdas: lambdas whose parameter types are fixed late, by the
//! delegate type expected at the use site.

use crate::reduce::{fits, reduce, Step};
use lx_core::ast::{AmbiguousLambda, Lambda, Node, NodeKind};
use lx_core::error::Error;
use lx_core::types::well_known::EXPRESSION;
use lx_core::types::{Signature, Ty, TypeOracle};
use lx_core::{Result, SymbolTable};

/// Signature of a delegate type, looking through `Expression<TDelegate>`.
pub(crate) fn delegate_signature(oracle: &dyn TypeOracle, ty: &Ty) -> Option<Signature> {
    oracle.delegate_signature(expression_body(ty).unwrap_or(ty))
}

/// `TDelegate` of an `Expression<TDelegate>`.
pub(crate) fn expression_body(ty: &Ty) -> Option<&Ty> {
    match ty {
        Ty::Named(named) if named.name == EXPRESSION && named.args.len() == 1 => named.args.first(),
        _ => None,
    }
}

/// Highest `$n` referenced by a lambda list body, plus one.
fn implicit_arity(items: &[Node]) -> usize {
    fn visit(node: &Node, max: &mut usize) {
        if let Some(n) = node
            .as_identifier()
            .and_then(|name| name.strip_prefix('$'))
            .and_then(|digits| digits.parse::<usize>().ok())
        {
            *max = (*max).max(n + 1);
        }
        // Nested lambda lists number their own parameters.
        if matches!(node.kind(), NodeKind::LambdaList(_)) {
            return;
        }
        for child in node.children() {
            visit(&child, max);
        }
    }
    let mut max = 0;
    for item in items {
        visit(item, &mut max);
    }
    max
}

/// Whether a lambda-shaped argument can take `arity` parameters.
pub(crate) fn accepts_arity(node: &Node, arity: usize) -> bool {
    match node.kind() {
        NodeKind::AmbiguousLambda(lambda) => lambda.params.len() == arity,
        NodeKind::LambdaList(items) => implicit_arity(items) <= arity,
        _ => true,
    }
}

/// Rewrites a lambda list as an ambiguous lambda over `$0..$arity`.
fn expand_lambda_list(node: &Node, items: &[Node], arity: usize) -> Node {
    let params = (0..arity)
        .map(|i| Node::ambiguous_parameter(Some(format!("${}", i)), None))
        .collect();
    let kind = NodeKind::AmbiguousLambda(AmbiguousLambda {
        params,
        body: vec![Node::with_span(NodeKind::List(items.to_vec()), node.span())],
    });
    match node.symbols() {
        Some(captured) => Node::with_symbols(kind, node.span(), captured),
        None => Node::with_span(kind, node.span()),
    }
}

/// The ambiguous lambda `node` stands for, given an optional arity hint.
pub(crate) fn as_ambiguous(node: &Node, arity: Option<usize>) -> Option<Node> {
    match node.kind() {
        NodeKind::AmbiguousLambda(_) => Some(node.clone()),
        NodeKind::LambdaList(items) => {
            let arity = arity.unwrap_or_else(|| implicit_arity(items));
            Some(expand_lambda_list(node, items, arity))
        }
        _ => None,
    }
}

pub(crate) fn reduce_lambda(
    node: &Node,
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    let quoted = expected.and_then(expression_body);
    let delegate = quoted.or(expected);
    let signature = delegate.and_then(|ty| symbols.oracle().delegate_signature(ty));

    let Some(lambda) = as_ambiguous(node, signature.as_ref().map(Signature::arity)) else {
        return Ok(Step::Terminal);
    };
    let NodeKind::AmbiguousLambda(ambiguous) = lambda.kind() else {
        return Ok(Step::Terminal);
    };

    if let Some(signature) = &signature {
        if signature.arity() != ambiguous.params.len() {
            return Err(Error::dispatch_failed(
                format!(
                    "lambda of {} parameters as {}",
                    ambiguous.params.len(),
                    delegate.map(Ty::to_string).unwrap_or_default()
                ),
                Some(node.span()),
            ));
        }
    }

    let mut param_types = vec![];
    for (i, param) in ambiguous.params.iter().enumerate() {
        let declared = param
            .as_ambiguous_parameter()
            .and_then(|p| p.ty.clone())
            .filter(|ty| !ty.is_open());
        let from_signature = signature
            .as_ref()
            .and_then(|sig| sig.params.get(i))
            .filter(|ty| !ty.is_open())
            .cloned();
        match declared.or(from_signature) {
            Some(ty) => param_types.push(ty),
            None => return Ok(Step::Deferred),
        }
    }

    let ret = signature
        .as_ref()
        .map(|sig| sig.ret.clone())
        .filter(|ret| !ret.is_open());
    let ty = delegate.filter(|ty| !ty.is_open()).cloned();
    let typed = specialize(&lambda, symbols, &param_types, ret.as_ref(), ty)?;
    if quoted.is_some() {
        return Ok(Step::To(Node::new(NodeKind::Quote(typed))));
    }
    Ok(Step::To(typed))
}

/// Builds the typed lambda for concrete parameter types.
///
/// The body is re-reduced from scratch: its caches are keyed by expected type
/// only, and identifiers in it resolved against the previous parameter types.
pub(crate) fn specialize(
    lambda: &Node,
    symbols: &SymbolTable,
    param_types: &[Ty],
    ret: Option<&Ty>,
    ty: Option<Ty>,
) -> Result<Node> {
    let NodeKind::AmbiguousLambda(ambiguous) = lambda.kind() else {
        return Err(Error::unreducible(lambda.to_string(), Some(lambda.span())));
    };
    let scope = lambda.symbols().unwrap_or_else(|| symbols.clone()).child();
    let mut params = vec![];
    for (i, (param, param_ty)) in ambiguous.params.iter().zip(param_types).enumerate() {
        let info = param.as_ambiguous_parameter();
        if let Some(declared) = info.and_then(|p| p.ty.as_ref()).filter(|ty| !ty.is_open()) {
            if declared != param_ty {
                return Err(Error::dispatch_failed(
                    format!("parameter {} declared {} used as {}", i, declared, param_ty),
                    Some(lambda.span()),
                ));
            }
        }
        let name = info
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| format!("_{}", i));
        let node = Node::parameter(name.clone(), param_ty.clone());
        scope.add_literal(name, node.clone());
        params.push(node);
    }

    for expr in &ambiguous.body {
        expr.clear_cache();
    }
    let body: Vec<&Node> = ambiguous.body.iter().filter(|e| !e.is_ignored()).collect();
    let value_ret = ret.filter(|ret| !ret.is_void());
    let body = match body.as_slice() {
        [single] => reduce(single, &scope, value_ret)?,
        exprs => {
            let mut reduced = vec![];
            for (i, expr) in exprs.iter().enumerate() {
                let expected = if i + 1 == exprs.len() { value_ret } else { None };
                reduced.push(reduce(expr, &scope, expected)?);
            }
            Node::block(reduced)
        }
    };
    let Some(body_ty) = body.ty() else {
        return Err(Error::unreducible(body.to_string(), Some(lambda.span())));
    };
    if let Some(ret) = value_ret {
        if !fits(&body, &scope, ret) {
            return Err(Error::dispatch_failed(
                format!("lambda returning {} as {}", body_ty, ret),
                Some(lambda.span()),
            ));
        }
    }
    let ty = ty.unwrap_or_else(|| Ty::delegate(param_types.to_vec(), body_ty));
    Ok(Node::with_span(
        NodeKind::Lambda(Lambda { params, body, ty }),
        lambda.span(),
    ))
}
