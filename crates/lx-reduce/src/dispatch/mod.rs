//! Overload resolution for dispatch sites.
//!
//! A site names a member of a receiver (or of a static type reference), a
//! constructor of a type, or a function bound in the symbol table. Members
//! are enumerated, each is tried against the arguments (parameter mapping,
//! speculative argument reduction, generic inference), the applicable ones
//! are ranked and the best one becomes a typed expression.

mod build;
mod candidate;
mod failback;
mod infer;
mod members;
mod params;
mod rank;

use crate::reduce::{reduce, try_reduce, Step};
use candidate::{candidates, Site};
use itertools::Itertools;
use lx_core::ast::{DispatchKind, DispatchNode, Node};
use lx_core::error::Error;
use lx_core::types::Ty;
use lx_core::{Result, SymbolTable};
use members::Receiver;
use params::Arg;

pub(crate) fn reduce_dispatch(
    node: &Node,
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    let Some(dispatch) = node.as_dispatch() else {
        return Ok(Step::Terminal);
    };
    let Some(left) = &dispatch.left else {
        return reduce_function(node, dispatch, symbols, expected);
    };

    let receiver = receiver_of(left, symbols)?;
    if dispatch.kind.contains(DispatchKind::CONSTRUCTOR) && !receiver.is_static() {
        return Err(Error::UnsupportedDispatchShape(format!(
            "constructor dispatch on a value: {}",
            node
        )));
    }

    let found = members::enumerate(symbols, &receiver, dispatch.kind, dispatch.name.as_deref());
    let args: Vec<Arg> = dispatch
        .args
        .iter()
        .map(|arg| Arg::split(&as_lambda(arg, symbols)))
        .collect();
    let site = Site {
        symbols,
        instance: receiver.instance(),
        type_args: &dispatch.type_args,
        args: &args,
    };
    let applicable: Vec<_> = found
        .iter()
        .flat_map(|found| candidates(&site, found))
        .collect();
    lx_core::debug!(
        "{}: {} members, {} applicable",
        node,
        found.len(),
        applicable.len()
    );
    lx_core::trace!(
        "candidates: [{}]",
        applicable.iter().map(|c| &c.member).join(", ")
    );

    match rank::select(symbols.oracle(), applicable) {
        Some(winner) => {
            lx_core::debug!("{} resolved to {}", node, winner.member);
            Ok(Step::To(build::build(node, symbols, winner)?))
        }
        None => Ok(Step::To(failback::failback(
            node,
            symbols,
            dispatch.kind,
            &receiver,
            &dispatch.args,
        )?)),
    }
}

/// `(name args...)` on a name bound as a function, or handled by the table's
/// missing handler.
fn reduce_function(
    node: &Node,
    dispatch: &DispatchNode,
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    let Some(name) = dispatch.name.as_deref() else {
        return Err(Error::UnsupportedDispatchShape(format!(
            "dispatch without receiver or name: {}",
            node
        )));
    };
    if !dispatch.kind.contains(DispatchKind::METHOD) {
        return Err(Error::UnsupportedDispatchShape(format!(
            "member dispatch without a receiver: {}",
            node
        )));
    }
    if let Some(definition) = symbols.resolve_match(DispatchKind::METHOD, name) {
        if let Some(value) = definition.invoke(node, symbols, expected)? {
            return Ok(Step::To(reduce(&value, symbols, expected)?));
        }
    }
    if let Some(value) = symbols.missing(node, expected)? {
        return Ok(Step::To(reduce(&value, symbols, expected)?));
    }
    Err(Error::dispatch_failed(node.to_string(), Some(node.span())))
}

fn receiver_of(left: &Node, symbols: &SymbolTable) -> Result<Receiver> {
    let value = reduce(left, symbols, None)?;
    if let Some(candidate) = value.as_type_candidate() {
        return Ok(Receiver::Static(candidate.types.clone()));
    }
    match value.ty() {
        Some(ty) => Ok(Receiver::Instance(value, ty)),
        None => Err(Error::unreducible(left.to_string(), Some(left.span()))),
    }
}

/// Exposes lambda-producing forms such as `(fn (x) ...)`, and names bound to
/// lambdas, as the lambda itself so candidates can be filtered by arity.
fn as_lambda(arg: &Node, symbols: &SymbolTable) -> Node {
    let is_form = arg
        .as_list()
        .map(|items| items.first().and_then(Node::as_identifier).is_some())
        .unwrap_or(false);
    let is_name = arg.as_identifier().is_some();
    if !(is_form || is_name) || arg.as_named_argument().is_some() {
        return arg.clone();
    }
    match try_reduce(arg, symbols, None) {
        Some(value) if value.is_ambiguous_lambda() => value,
        _ => arg.clone(),
    }
}
