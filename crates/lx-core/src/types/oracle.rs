use crate::types::{Member, Signature, Ty, TypeDef};
use std::sync::Arc;

/// The type-metadata service the reduction and dispatch engines query.
///
/// Member and compatibility questions are answered for constructed types:
/// members of `List<Int32>` come back with `T` already replaced by `Int32`.
pub trait TypeOracle: Send + Sync {
    /// Definition backing `ty` (the generic definition for constructed types).
    fn type_def(&self, ty: &Ty) -> Option<Arc<TypeDef>>;

    /// Public members declared on `ty` and inherited from its base chain.
    fn members(&self, ty: &Ty) -> Vec<Member>;

    /// Identity, inheritance, interface implementation and boxing to `Object`.
    fn is_assignable(&self, from: &Ty, to: &Ty) -> bool;

    /// Assignability plus the implicit numeric widening table.
    fn is_implicitly_convertible(&self, from: &Ty, to: &Ty) -> bool;

    /// Implicit conversions plus numeric narrowing and downcasts.
    fn is_explicitly_convertible(&self, from: &Ty, to: &Ty) -> bool;

    /// Every type `ty` converts to implicitly, starting with `ty` itself.
    fn convertible_types(&self, ty: &Ty) -> Vec<Ty>;

    fn delegate_signature(&self, ty: &Ty) -> Option<Signature>;

    fn is_value_type(&self, ty: &Ty) -> bool;

    fn is_interface(&self, ty: &Ty) -> bool;

    fn base_type(&self, ty: &Ty) -> Option<Ty>;

    /// All implemented interfaces, including inherited ones.
    fn interfaces(&self, ty: &Ty) -> Vec<Ty>;

    /// Length of the base-class chain; `Object` is 0.
    fn inheritance_depth(&self, ty: &Ty) -> usize {
        let mut depth = 0;
        let mut current = self.base_type(ty);
        while let Some(base) = current {
            depth += 1;
            current = self.base_type(&base);
        }
        depth
    }

    /// Whether the reactive event-subscription adapter is available.
    fn supports_event_adapter(&self) -> bool {
        false
    }
}
