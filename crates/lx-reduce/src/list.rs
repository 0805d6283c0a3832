use crate::lambda::delegate_signature;
use crate::macro_eval::evaluate_macro;
use crate::reduce::{reduce, try_reduce, Step};
use lx_core::ast::{DispatchKind, DispatchNode, Invoke, Node, NodeKind};
use lx_core::error::Error;
use lx_core::types::Ty;
use lx_core::{Result, SymbolTable};

/// Application form `(head args...)`.
///
/// Precedence: macro, delegate invocation, constructor, named function,
/// singleton passthrough, error.
pub(crate) fn reduce_list(
    node: &Node,
    items: &[Node],
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    let Some((head, rest)) = items.split_first() else {
        return Ok(Step::To(Node::void()));
    };
    let head_name = head.as_identifier();

    let speculate = match head_name {
        None => true,
        Some(name) => symbols.resolve_match(DispatchKind::MEMBER, name).is_some(),
    };
    let head_value = if speculate {
        try_reduce(head, symbols, None)
    } else {
        None
    };

    if let Some(value) = &head_value {
        if value.as_macro().is_some() {
            return Ok(Step::To(evaluate_macro(value, symbols, rest, expected)?));
        }
        if let Some(ty) = value.ty() {
            if let Some(signature) = delegate_signature(symbols.oracle(), &ty) {
                if signature.arity() != rest.len() {
                    return Err(Error::dispatch_failed(
                        format!("{} with {} arguments", ty, rest.len()),
                        Some(node.span()),
                    ));
                }
                let args = rest
                    .iter()
                    .zip(&signature.params)
                    .map(|(arg, param)| reduce(arg, symbols, Some(param)))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Step::To(Node::new(NodeKind::Invoke(Invoke {
                    target: value.clone(),
                    args,
                    ty: signature.ret,
                }))));
            }
        }
        if value.as_type_candidate().is_some() {
            let dispatch = dispatch_node(
                node,
                DispatchKind::CONSTRUCTOR,
                Some(value.clone()),
                None,
                rest,
            );
            return Ok(Step::To(reduce(&dispatch, symbols, expected)?));
        }
    }

    if let Some(name) = head_name {
        let bound = symbols.resolve_match(DispatchKind::METHOD, name).is_some();
        if bound || symbols.has_custom_missing() {
            let dispatch = dispatch_node(node, DispatchKind::METHOD, None, Some(name), rest);
            return Ok(Step::To(reduce(&dispatch, symbols, expected)?));
        }
    }

    match head_value {
        Some(value) if items.len() == 1 => Ok(Step::To(value)),
        _ => Err(Error::unreducible(node.to_string(), Some(node.span()))),
    }
}

fn dispatch_node(
    list: &Node,
    kind: DispatchKind,
    left: Option<Node>,
    name: Option<&str>,
    args: &[Node],
) -> Node {
    Node::with_span(
        NodeKind::Dispatch(DispatchNode {
            kind,
            left,
            name: name.map(str::to_string),
            type_args: vec![],
            args: args.to_vec(),
        }),
        list.span(),
    )
}
