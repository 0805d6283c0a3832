use lx_core::ast::{DispatchKind, NodeKind};
use lx_core::types::{Member, Ty, TypeOracle};
use lx_core::{Node, SymbolTable};
use lx_typing::unify;
use std::collections::HashMap;

/// What a dispatch site is applied to.
#[derive(Debug, Clone)]
pub(crate) enum Receiver {
    /// A type reference: static members, constructors.
    Static(Vec<Ty>),
    /// A value of a known type: instance members and extension methods.
    Instance(Node, Ty),
}

impl Receiver {
    /// Types whose members are searched: the elected type of a static
    /// reference when there is one, all of its types otherwise.
    pub fn targets(&self) -> Vec<Ty> {
        match self {
            Receiver::Static(types) => {
                let candidate = lx_core::ast::TypeCandidate::new(types.clone());
                match candidate.elected() {
                    Some(elected) => vec![elected.clone()],
                    None => types.clone(),
                }
            }
            Receiver::Instance(_, ty) => vec![ty.clone()],
        }
    }

    pub fn instance(&self) -> Option<&Node> {
        match self {
            Receiver::Instance(node, _) => Some(node),
            Receiver::Static(_) => None,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Receiver::Static(_))
    }
}

/// A member found for a dispatch site.
#[derive(Debug, Clone)]
pub(crate) struct Found {
    pub member: Member,
    /// Extension method applied to an instance receiver.
    pub extension: bool,
}

pub(crate) fn enumerate(
    symbols: &SymbolTable,
    receiver: &Receiver,
    kind: DispatchKind,
    name: Option<&str>,
) -> Vec<Found> {
    let oracle = symbols.oracle();
    let targets = receiver.targets();

    if kind.contains(DispatchKind::CONSTRUCTOR) {
        return targets
            .iter()
            .filter(|ty| !ty.is_open())
            .flat_map(|ty| {
                oracle.members(ty).into_iter().filter(move |member| {
                    matches!(member, Member::Constructor(ctor) if &ctor.declaring == ty)
                })
            })
            .map(|member| Found {
                member,
                extension: false,
            })
            .collect();
    }

    let mut searched = targets.clone();
    if !targets.is_empty() && targets.iter().all(|ty| oracle.is_interface(ty)) {
        searched.push(Ty::object());
    }

    let mut found = vec![];
    if kind.contains(DispatchKind::MEMBER) {
        for ty in &searched {
            let default_member = oracle.type_def(ty).and_then(|def| def.default_member.clone());
            let wanted = name.or(default_member.as_deref());
            for member in oracle.members(ty) {
                let is_value_member = !matches!(member, Member::Method(_) | Member::Constructor(_));
                if is_value_member
                    && member.name() == wanted
                    && member.is_static() == receiver.is_static()
                {
                    push_unique(&mut found, member, false);
                }
            }
        }
    }
    if !found.is_empty() || !kind.contains(DispatchKind::METHOD) {
        return found;
    }
    let Some(name) = name else {
        return found;
    };

    for ty in &searched {
        for member in oracle.members(ty) {
            if let Member::Method(method) = &member {
                // Extension methods called through their declaring type are
                // plain static methods.
                let static_match = method.is_static == receiver.is_static();
                let extension_ok = !method.is_extension || receiver.is_static();
                if method.name == name && static_match && extension_ok {
                    push_unique(&mut found, member, false);
                }
            }
        }
    }
    if let Receiver::Instance(_, ty) = receiver {
        for member in extensions(symbols, name, ty) {
            push_unique(&mut found, member, true);
        }
    }
    found
}

fn push_unique(found: &mut Vec<Found>, member: Member, extension: bool) {
    if !found.iter().any(|f| f.member == member) {
        found.push(Found { member, extension });
    }
}

/// Extension methods named `name`, declared on types bound in `symbols`,
/// whose receiver parameter accepts `ty`.
fn extensions(symbols: &SymbolTable, name: &str, ty: &Ty) -> Vec<Member> {
    let oracle = symbols.oracle();
    let mut out = vec![];
    for (_, value) in symbols.all_literals() {
        let NodeKind::TypeCandidate(candidate) = value.kind() else {
            continue;
        };
        for declaring in &candidate.types {
            for member in oracle.members(declaring) {
                let applies = match &member {
                    Member::Method(method) if method.is_extension && method.name == name => method
                        .params
                        .first()
                        .map(|receiver| accepts(oracle, &receiver.ty, ty))
                        .unwrap_or(false),
                    _ => false,
                };
                if applies && !out.contains(&member) {
                    out.push(member);
                }
            }
        }
    }
    out
}

fn accepts(oracle: &dyn TypeOracle, param: &Ty, ty: &Ty) -> bool {
    if param.is_open() {
        let mut map = HashMap::new();
        unify(oracle, param, ty, &mut map)
    } else {
        oracle.is_implicitly_convertible(ty, param)
    }
}
