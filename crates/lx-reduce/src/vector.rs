use crate::reduce::{coerce, reduce, Step};
use lx_core::ast::{NewArray, Node, NodeKind};
use lx_core::types::{Ty, TypeOracle};
use lx_core::{Result, SymbolTable};

/// `[a b c]`: an array literal over the narrowest common element type.
pub(crate) fn reduce_vector(
    node: &Node,
    items: &[Node],
    symbols: &SymbolTable,
    expected: Option<&Ty>,
) -> Result<Step> {
    let items: Vec<&Node> = items.iter().filter(|item| !item.is_ignored()).collect();

    if let Some(elem) = expected
        .and_then(Ty::element_type)
        .filter(|elem| !elem.is_open())
    {
        let elements = items
            .iter()
            .map(|item| reduce(item, symbols, Some(elem)))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Step::To(new_array(node, elem.clone(), elements)));
    }

    let mut elements = vec![];
    let mut types = vec![];
    for item in items {
        let element = reduce(item, symbols, None)?;
        match element.ty() {
            Some(ty) => types.push(ty),
            None => return Ok(Step::Deferred),
        }
        elements.push(element);
    }
    let elem = common_type(symbols.oracle(), &types);
    lx_core::trace!("vector of {} elements typed {}[]", elements.len(), elem);
    let elements = elements
        .iter()
        .map(|element| coerce(element, symbols, Some(&elem)))
        .collect();
    Ok(Step::To(new_array(node, elem, elements)))
}

fn new_array(node: &Node, elem: Ty, elements: Vec<Node>) -> Node {
    Node::with_span(NodeKind::NewArray(NewArray { elem, elements }), node.span())
}

/// Narrowest type every one of `types` converts to implicitly.
///
/// Among the shared conversion targets, the one converting to all the others
/// wins; failing that the most derived non-`Object` target; failing that
/// `Object`.
pub fn common_type(oracle: &dyn TypeOracle, types: &[Ty]) -> Ty {
    let Some((first, rest)) = types.split_first() else {
        return Ty::object();
    };
    let mut shared = oracle.convertible_types(first);
    for ty in rest {
        let targets = oracle.convertible_types(ty);
        shared.retain(|candidate| targets.contains(candidate));
    }

    let narrowest: Vec<&Ty> = shared
        .iter()
        .filter(|candidate| {
            shared.iter().all(|other| {
                other == *candidate || oracle.is_implicitly_convertible(candidate, other)
            })
        })
        .collect();
    if let [only] = narrowest.as_slice() {
        return (*only).clone();
    }

    let mut best: Option<(&Ty, usize)> = None;
    for candidate in shared.iter().filter(|ty| !ty.is_object()) {
        let depth = oracle.inheritance_depth(candidate);
        if best.map_or(true, |(_, best_depth)| depth > best_depth) {
            best = Some((candidate, depth));
        }
    }
    best.map(|(ty, _)| ty.clone()).unwrap_or_else(Ty::object)
}
