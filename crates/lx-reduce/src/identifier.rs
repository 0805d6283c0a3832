use crate::reduce::{reduce, Step};
use lx_core::ast::{DispatchKind, Node};
use lx_core::error::Error;
use lx_core::types::Ty;
use lx_core::{Result, SymbolTable};

/// Resolves an identifier through the symbol chain, falling back to the
/// table's missing handler.
pub(crate) fn reduce_identifier(
    node: &Node,
    name: &str,
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    if let Some(definition) = symbols.resolve_match(DispatchKind::MEMBER, name) {
        if let Some(value) = definition.invoke(node, symbols, expected)? {
            return Ok(Step::To(reduce(&value, symbols, expected)?));
        }
    }
    if let Some(value) = symbols.missing(node, expected)? {
        return Ok(Step::To(reduce(&value, symbols, expected)?));
    }
    Err(Error::unknown_identifier(name, Some(node.span())))
}
