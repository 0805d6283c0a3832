use crate::dispatch::members::Receiver;
use crate::reduce::reduce;
use lx_core::ast::{DispatchKind, TypeCandidate};
use lx_core::error::Error;
use lx_core::{Node, Result, SymbolTable};

/// Fallbacks for constructor sites no constructor accepted: a value type's
/// default value, or a cast for a single argument.
pub(crate) fn failback(
    site: &Node,
    symbols: &SymbolTable,
    kind: DispatchKind,
    receiver: &Receiver,
    args: &[Node],
) -> Result<Node> {
    let failed = || Error::dispatch_failed(site.to_string(), Some(site.span()));
    if !kind.contains(DispatchKind::CONSTRUCTOR) {
        return Err(failed());
    }
    let Receiver::Static(types) = receiver else {
        return Err(failed());
    };
    let candidate = TypeCandidate::new(types.clone());
    let Some(target) = candidate.elected() else {
        return Err(failed());
    };
    let oracle = symbols.oracle();

    match args {
        [] if oracle.is_value_type(target) => {
            lx_core::debug!("default value for {}", target);
            Ok(Node::default_value(target.clone()))
        }
        [arg] => {
            let value = reduce(arg, symbols, None)?;
            match value.ty() {
                Some(ty) if &ty == target => Ok(value),
                Some(ty) if oracle.is_explicitly_convertible(&ty, target) => {
                    lx_core::debug!("cast from {} to {}", ty, target);
                    Ok(Node::convert(value, target.clone(), true))
                }
                _ => Err(failed()),
            }
        }
        _ => Err(failed()),
    }
}
