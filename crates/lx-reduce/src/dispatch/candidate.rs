use crate::dispatch::infer::{infer, Evidence};
use crate::dispatch::members::Found;
use crate::dispatch::params::{Arg, ParamMap, Slot};
use crate::lambda::{accepts_arity, delegate_signature};
use crate::reduce::{coerce, fits, try_reduce};
use lx_core::ast::{Convert, NewArray, NodeKind};
use lx_core::types::{Literal, Member, Ty};
use lx_core::{Node, SymbolTable};

/// A member that accepts the call-site arguments, with the arguments reduced
/// against its parameter types.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// Closed over inferred type arguments for generic methods.
    pub member: Member,
    pub instance: Option<Node>,
    pub extension: bool,
    pub expanded: bool,
    /// Declared parameter types after inference.
    pub params: Vec<Ty>,
    pub args: Vec<Node>,
    pub defaults: usize,
}

impl Candidate {
    /// Arguments that only fit through an implicit conversion.
    pub fn conversions(&self) -> usize {
        self.args
            .iter()
            .filter(|arg| matches!(arg.kind(), NodeKind::Convert(Convert { explicit: false, .. })))
            .count()
    }
}

/// Call-site data shared by every member considered.
pub(crate) struct Site<'a> {
    pub symbols: &'a SymbolTable,
    pub instance: Option<&'a Node>,
    pub type_args: &'a [Ty],
    pub args: &'a [Arg],
}

/// Every applicable form of `found`: the normal form and, for members with a
/// param array, the expanded one.
pub(crate) fn candidates(site: &Site<'_>, found: &Found) -> Vec<Candidate> {
    let mut args = site.args.to_vec();
    if found.extension {
        let Some(instance) = site.instance else {
            return vec![];
        };
        args.insert(0, Arg::positional(instance.clone()));
    }

    let generic = match &found.member {
        Member::Method(method) => {
            if !site.type_args.is_empty()
                && site.type_args.len() != method.generic_params.len()
            {
                return vec![];
            }
            method.is_generic_definition()
        }
        _ if !site.type_args.is_empty() => return vec![],
        _ => false,
    };

    let params = found.member.params();
    let has_params_array = params.last().map(|p| p.is_params).unwrap_or(false);
    let forms: &[bool] = if has_params_array { &[false, true] } else { &[false] };
    forms
        .iter()
        .filter_map(|&expanded| ParamMap::build(params, &args, expanded))
        .filter_map(|map| apply(site, found, map, generic))
        .collect()
}

fn apply(site: &Site<'_>, found: &Found, map: ParamMap, generic: bool) -> Option<Candidate> {
    let symbols = site.symbols;
    let oracle = symbols.oracle();

    for (param, slot) in &map.slots {
        if let Slot::Arg(node) = slot {
            if node.is_ambiguous_lambda() {
                let signature = delegate_signature(oracle, &param.ty)?;
                if !accepts_arity(node, signature.arity()) {
                    return None;
                }
            }
        }
    }

    let member = if generic {
        let method = found.member.as_method()?;
        let evidence = map
            .slots
            .iter()
            .map(|(param, slot)| gather(symbols, &param.ty, slot))
            .collect::<Option<Vec<_>>>()?;
        Member::Method(infer(symbols, method, site.type_args, &evidence)?)
    } else {
        found.member.clone()
    };

    let params: Vec<Ty> = member.params().iter().map(|p| p.ty.clone()).collect();
    if params.iter().any(Ty::is_open) {
        return None;
    }
    let args = map
        .slots
        .iter()
        .zip(&params)
        .map(|((_, slot), ty)| materialize(symbols, slot, ty))
        .collect::<Option<Vec<_>>>()?;

    Some(Candidate {
        member,
        instance: site.instance.cloned(),
        extension: found.extension,
        expanded: map.expanded,
        params,
        defaults: map.defaults(),
        args,
    })
}

/// Speculatively reduces a slot for inference. Positions with a closed
/// parameter type are reduced toward it, open ones toward nothing.
fn gather<'a>(symbols: &SymbolTable, param: &Ty, slot: &'a Slot) -> Option<Evidence<'a>> {
    let expected = Some(param).filter(|ty| !ty.is_open());
    Some(match slot {
        Slot::Arg(node) if node.is_ambiguous_lambda() && expected.is_none() => {
            Evidence::Lambda(node)
        }
        Slot::Arg(node) => match try_reduce(node, symbols, expected)?.ty() {
            Some(ty) => Evidence::Value(ty),
            None => Evidence::None,
        },
        Slot::Packed(nodes) => {
            let elem = param.element_type().filter(|ty| !ty.is_open());
            let mut types = vec![];
            for node in nodes {
                types.extend(try_reduce(node, symbols, elem)?.ty());
            }
            Evidence::Elements(types)
        }
        Slot::Default(_) => Evidence::None,
    })
}

/// Final value of a slot for the closed parameter type `ty`.
fn materialize(symbols: &SymbolTable, slot: &Slot, ty: &Ty) -> Option<Node> {
    match slot {
        Slot::Arg(node) => {
            let value = try_reduce(node, symbols, Some(ty))?;
            fits(&value, symbols, ty).then_some(value)
        }
        Slot::Packed(nodes) => {
            let elem = ty.element_type()?;
            let mut elements = vec![];
            for node in nodes {
                let value = try_reduce(node, symbols, Some(elem))?;
                if !fits(&value, symbols, elem) {
                    return None;
                }
                elements.push(value);
            }
            Some(Node::new(NodeKind::NewArray(NewArray {
                elem: elem.clone(),
                elements,
            })))
        }
        Slot::Default(Literal::Null) => Some(Node::typed_constant(Literal::Null, ty.clone())),
        Slot::Default(literal) => {
            let value = coerce(&Node::constant(literal.clone()), symbols, Some(ty));
            fits(&value, symbols, ty).then_some(value)
        }
    }
}
