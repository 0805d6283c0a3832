//! Macro application.
//!
//! A macro receives its arguments as syntax: every argument that is not
//! already an expression value is bound quoted, the body is reduced in a child
//! scope over those bindings, and the resulting expression is then reduced
//! again at the call site.

use crate::reduce::{coerce, reduce};
use lx_core::ast::Node;
use lx_core::error::Error;
use lx_core::types::Ty;
use lx_core::{Result, SymbolTable};

/// Binds the parameters of `macro_node` to `args` in a child of `symbols`.
pub fn bind_macro_arguments(
    macro_node: &Node,
    symbols: &SymbolTable,
    args: &[Node],
) -> Result<SymbolTable> {
    let Some(mac) = macro_node.as_macro() else {
        return Err(Error::unreducible(macro_node.to_string(), Some(macro_node.span())));
    };
    if args.len() > mac.params.len() {
        return Err(Error::dispatch_failed(
            format!("macro of {} parameters with {} arguments", mac.params.len(), args.len()),
            Some(macro_node.span()),
        ));
    }

    let oracle = symbols.oracle();
    let expression = Ty::expression();
    let scope = symbols.child();
    for (i, param) in mac.params.iter().enumerate() {
        let Some(info) = param.as_ambiguous_parameter() else {
            return Err(Error::unreducible(param.to_string(), Some(param.span())));
        };
        let name = info.name.clone().unwrap_or_else(|| format!("${}", i));
        let Some(arg) = args.get(i) else {
            return Err(Error::MacroParameterMismatch {
                parameter: name,
                expected: info.ty.clone().unwrap_or_else(Ty::expression),
                found: "no argument".to_string(),
            });
        };

        let (value, value_ty) = match arg.ty() {
            Some(ty) if oracle.is_assignable(&ty, &expression) => (arg.clone(), ty),
            _ => (Node::quoted(arg.clone()), expression.clone()),
        };
        if let Some(declared) = &info.ty {
            if !declared.is_open() && !oracle.is_assignable(&value_ty, declared) {
                return Err(Error::MacroParameterMismatch {
                    parameter: name,
                    expected: declared.clone(),
                    found: value_ty.to_string(),
                });
            }
        }
        lx_core::trace!("macro parameter {} bound to {}", name, value);
        scope.add_literal(name, value);
    }
    Ok(scope)
}

/// Applies `macro_node` to the unreduced `args`.
pub fn evaluate_macro(
    macro_node: &Node,
    symbols: &SymbolTable,
    args: &[Node],
    expected: Option<&Ty>,
) -> Result<Node> {
    let scope = bind_macro_arguments(macro_node, symbols, args)?;
    let Some(mac) = macro_node.as_macro() else {
        return Err(Error::unreducible(macro_node.to_string(), Some(macro_node.span())));
    };
    // The body is shared by every application; earlier bindings are stale.
    mac.body.clear_cache();
    let expansion = reduce(&mac.body, &scope, None)?;
    eval_expression(&expansion, symbols, expected)
}

/// The `eval` adapter: an expression held as data is reduced in `symbols`,
/// anything else is already a value.
pub fn eval_expression(value: &Node, symbols: &SymbolTable, expected: Option<&Ty>) -> Result<Node> {
    match value.as_quoted_expr() {
        Some(expr) => reduce(expr, symbols, expected),
        None => Ok(coerce(value, symbols, expected)),
    }
}
