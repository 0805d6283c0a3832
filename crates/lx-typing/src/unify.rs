//! Structural unification of generic type shapes.
//!
//! A declared parameter type such as `Func<IEnumerable<T>, T>` is matched
//! against an argument type such as `Func<List<Int32>, Int32>` by walking both
//! trees in lockstep, binding open parameters as they are met.

use lx_core::types::{Ty, TypeOracle};
use std::cell::OnceCell;
use std::collections::HashMap;

/// A type whose generic arguments are expanded into child nodes on demand.
#[derive(Debug)]
pub struct TypeNode {
    ty: Ty,
    children: OnceCell<Vec<TypeNode>>,
}

impl TypeNode {
    pub fn new(ty: Ty) -> Self {
        Self {
            ty,
            children: OnceCell::new(),
        }
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn children(&self) -> &[TypeNode] {
        self.children.get_or_init(|| {
            self.ty
                .type_args()
                .iter()
                .cloned()
                .map(TypeNode::new)
                .collect()
        })
    }

    pub fn is_open(&self) -> bool {
        self.ty.is_open()
    }

    /// The closest type in `self`'s ancestry sharing `pattern`'s generic
    /// definition: itself, a base class or an implemented interface.
    fn lift_to(&self, oracle: &dyn TypeOracle, pattern: &Ty) -> Option<TypeNode> {
        if self.ty.same_definition(pattern) {
            return Some(TypeNode::new(self.ty.clone()));
        }
        let mut current = oracle.base_type(&self.ty);
        while let Some(base) = current {
            if base.same_definition(pattern) {
                return Some(TypeNode::new(base));
            }
            current = oracle.base_type(&base);
        }
        oracle
            .interfaces(&self.ty)
            .into_iter()
            .find(|interface| interface.same_definition(pattern))
            .map(TypeNode::new)
    }

    /// Unifies `self` as the pattern against `actual`, extending `map`.
    ///
    /// Returns false when the shapes cannot line up, or when a parameter is
    /// seen again with a type incompatible with its earlier binding.
    pub fn unify(
        &self,
        oracle: &dyn TypeOracle,
        actual: &TypeNode,
        map: &mut HashMap<String, Ty>,
    ) -> bool {
        match &self.ty {
            Ty::Param(name) => {
                if actual.is_open() {
                    return true;
                }
                match map.get(name) {
                    Some(bound) => {
                        bound == actual.ty() || oracle.is_implicitly_convertible(actual.ty(), bound)
                    }
                    None => {
                        map.insert(name.clone(), actual.ty.clone());
                        true
                    }
                }
            }
            _ if !self.is_open() => true,
            _ => {
                if actual.ty().is_param() {
                    return true;
                }
                let Some(lifted) = actual.lift_to(oracle, &self.ty) else {
                    return false;
                };
                let patterns = self.children();
                let actuals = lifted.children();
                if patterns.len() != actuals.len() {
                    return false;
                }
                let mut ok = true;
                for (pattern, actual) in patterns.iter().zip(actuals) {
                    ok &= pattern.unify(oracle, actual, map);
                }
                ok
            }
        }
    }
}

/// Unifies `pattern` against `actual`; see [`TypeNode::unify`].
pub fn unify(
    oracle: &dyn TypeOracle,
    pattern: &Ty,
    actual: &Ty,
    map: &mut HashMap<String, Ty>,
) -> bool {
    TypeNode::new(pattern.clone()).unify(oracle, &TypeNode::new(actual.clone()), map)
}
