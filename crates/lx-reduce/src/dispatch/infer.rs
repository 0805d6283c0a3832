//! Generic method type-argument inference.

use crate::lambda::{as_ambiguous, delegate_signature, expression_body, specialize};
use lx_core::types::{MethodInfo, Ty};
use lx_core::{Node, SymbolTable};
use lx_typing::unify;
use std::collections::HashMap;

/// An argument as seen by inference.
pub(crate) enum Evidence<'a> {
    /// A reduced argument of known type.
    Value(Ty),
    /// Reduced elements packed into the param array.
    Elements(Vec<Ty>),
    /// A lambda whose parameter types are not known yet.
    Lambda(&'a Node),
    None,
}

/// Infers the type arguments of the generic method definition `method` from
/// what each parameter position received, and closes it over them.
///
/// Runs to a fixed point, bounded by the configured number of rounds: lambdas
/// can only be typed once the parameters of their delegate type are bound,
/// and typing them may bind more.
pub(crate) fn infer(
    symbols: &SymbolTable,
    method: &MethodInfo,
    explicit: &[Ty],
    evidence: &[Evidence<'_>],
) -> Option<MethodInfo> {
    let oracle = symbols.oracle();
    let mut map: HashMap<String, Ty> = method
        .generic_params
        .iter()
        .cloned()
        .zip(explicit.iter().cloned())
        .collect();
    let bound = |map: &HashMap<String, Ty>| {
        method.generic_params.iter().all(|p| map.contains_key(p))
    };

    let rounds = symbols.config().max_inference_rounds;
    for round in 0..rounds {
        let before = map.len();
        for (param, evidence) in method.params.iter().zip(evidence) {
            let ok = match evidence {
                Evidence::Value(ty) => unify(oracle, &param.ty, ty, &mut map),
                Evidence::Elements(types) => match param.ty.element_type() {
                    Some(elem) => types.iter().all(|ty| unify(oracle, elem, ty, &mut map)),
                    None => false,
                },
                Evidence::Lambda(node) => infer_from_lambda(symbols, node, &param.ty, &mut map)?,
                Evidence::None => true,
            };
            if !ok {
                lx_core::trace!("inference for {} failed at {}", method, param.name);
                return None;
            }
        }
        if bound(&map) {
            lx_core::trace!("inferred {} in {} rounds", method, round + 1);
            break;
        }
        if map.len() == before {
            break;
        }
    }

    let args = method
        .generic_params
        .iter()
        .map(|p| map.get(p).cloned())
        .collect::<Option<Vec<_>>>()?;
    Some(method.make_generic(&args))
}

/// Types `node` against the delegate type `pattern` as far as it is bound.
///
/// `Some(true)` when the lambda could not be typed yet; `None` when it does
/// not fit the delegate at all.
fn infer_from_lambda(
    symbols: &SymbolTable,
    node: &Node,
    pattern: &Ty,
    map: &mut HashMap<String, Ty>,
) -> Option<bool> {
    let delegate = pattern.substitute(map);
    let signature = delegate_signature(symbols.oracle(), &delegate)?;
    if signature.params.iter().any(Ty::is_open) {
        return Some(true);
    }
    let lambda = as_ambiguous(node, Some(signature.arity()))?;
    let typed = match specialize(&lambda, symbols, &signature.params, None, None) {
        Ok(typed) => typed,
        Err(err) => {
            lx_core::trace!("lambda {} rejected for {}: {}", node, delegate, err);
            return None;
        }
    };
    let pattern = expression_body(pattern).unwrap_or(pattern);
    Some(unify(symbols.oracle(), pattern, &typed.ty()?, map))
}
