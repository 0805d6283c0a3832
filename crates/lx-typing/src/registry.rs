use crate::builtins;
use crate::conversions::{is_numeric_cast, is_numeric_widening, widening_targets};
use lx_core::types::{Member, Signature, Ty, TypeDef, TypeKind, TypeOracle};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Central registry of type definitions, keyed by generic definition key
/// (`List\`1`, `Array\`1`, `Int32`).
#[derive(Debug, Default)]
pub struct TypeRegistry {
    defs: RwLock<HashMap<String, Arc<TypeDef>>>,
    event_adapter: bool,
}

impl TypeRegistry {
    /// An empty registry. Most callers want [`TypeRegistry::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for def in builtins::builtin_types() {
            registry.register(def);
        }
        registry
    }

    /// Marks the reactive event adapter as available.
    pub fn with_event_adapter(mut self, available: bool) -> Self {
        self.event_adapter = available;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<TypeDef>>> {
        match self.defs.read() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<TypeDef>>> {
        match self.defs.write() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }

    /// Adds or replaces a definition.
    pub fn register(&self, def: TypeDef) -> Ty {
        let ty = def.self_ty();
        let key = def.key();
        tracing::trace!("registering type {}", key);
        self.write().insert(key, Arc::new(def));
        ty
    }

    pub fn lookup(&self, key: &str) -> Option<Arc<TypeDef>> {
        self.read().get(key).cloned()
    }

    /// Definitions sharing a name, in any arity (`List`, `List\`1`, ...).
    pub fn lookup_by_name(&self, name: &str) -> Vec<Arc<TypeDef>> {
        let mut defs: Vec<_> = self
            .read()
            .values()
            .filter(|def| def.name == name)
            .cloned()
            .collect();
        defs.sort_by_key(|def| def.generic_params.len());
        defs
    }

    /// Names of every registered definition, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().values().map(|def| def.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    fn bound_def(&self, ty: &Ty) -> Option<(Arc<TypeDef>, HashMap<String, Ty>)> {
        let def = self.type_def(ty)?;
        let bindings = def.bindings_for(ty);
        Some((def, bindings))
    }

    fn ancestors(&self, ty: &Ty) -> Vec<Ty> {
        let mut out = vec![];
        let mut current = self.base_type(ty);
        while let Some(base) = current {
            current = self.base_type(&base);
            out.push(base);
        }
        out
    }
}

impl TypeOracle for TypeRegistry {
    fn type_def(&self, ty: &Ty) -> Option<Arc<TypeDef>> {
        if ty.is_param() {
            return None;
        }
        self.lookup(&ty.def_key())
    }

    fn members(&self, ty: &Ty) -> Vec<Member> {
        let mut members = vec![];
        let mut visited = vec![];
        let mut pending = vec![ty.clone()];
        while let Some(current) = pending.pop() {
            if visited.contains(&current) {
                continue;
            }
            let Some((def, bindings)) = self.bound_def(&current) else {
                visited.push(current);
                continue;
            };
            members.extend(
                def.members
                    .iter()
                    .filter(|member| member.is_public())
                    .map(|member| member.substitute(&bindings)),
            );
            // Interfaces inherit their parents' members; classes their base's.
            if def.is_interface() {
                pending.extend(def.interfaces.iter().map(|i| i.substitute(&bindings)).rev());
            } else if let Some(base) = self.base_type(&current) {
                pending.push(base);
            }
            visited.push(current);
        }
        members
    }

    fn is_assignable(&self, from: &Ty, to: &Ty) -> bool {
        if from == to || to.is_object() {
            return true;
        }
        if from.is_param() || to.is_param() {
            return false;
        }
        self.ancestors(from).contains(to) || self.interfaces(from).contains(to)
    }

    fn is_implicitly_convertible(&self, from: &Ty, to: &Ty) -> bool {
        self.is_assignable(from, to) || is_numeric_widening(from, to)
    }

    fn is_explicitly_convertible(&self, from: &Ty, to: &Ty) -> bool {
        self.is_implicitly_convertible(from, to)
            || is_numeric_cast(from, to)
            || self.is_assignable(to, from)
            || (self.is_interface(to) && !self.is_value_type(from))
    }

    fn convertible_types(&self, ty: &Ty) -> Vec<Ty> {
        let mut out = vec![ty.clone()];
        let mut push = |candidate: Ty| {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        };
        for name in widening_targets(ty.name()) {
            if ty.type_args().is_empty() {
                push(Ty::named(*name));
            }
        }
        for base in self.ancestors(ty) {
            if !base.is_object() {
                push(base);
            }
        }
        for interface in self.interfaces(ty) {
            push(interface);
        }
        push(Ty::object());
        out
    }

    fn delegate_signature(&self, ty: &Ty) -> Option<Signature> {
        let (def, bindings) = self.bound_def(ty)?;
        def.signature().map(|sig| sig.substitute(&bindings))
    }

    fn is_value_type(&self, ty: &Ty) -> bool {
        self.type_def(ty).map(|def| def.is_value_type()).unwrap_or(false)
    }

    fn is_interface(&self, ty: &Ty) -> bool {
        self.type_def(ty).map(|def| def.is_interface()).unwrap_or(false)
    }

    fn base_type(&self, ty: &Ty) -> Option<Ty> {
        if ty.is_object() || ty.is_param() {
            return None;
        }
        let Some((def, bindings)) = self.bound_def(ty) else {
            return Some(Ty::object());
        };
        match (&def.base, &def.kind) {
            (Some(base), _) => Some(base.substitute(&bindings)),
            (None, TypeKind::Interface) => None,
            (None, _) => Some(Ty::object()),
        }
    }

    fn interfaces(&self, ty: &Ty) -> Vec<Ty> {
        let mut out: Vec<Ty> = vec![];
        let mut pending = vec![ty.clone()];
        pending.extend(self.ancestors(ty));
        while let Some(current) = pending.pop() {
            let Some((def, bindings)) = self.bound_def(&current) else {
                continue;
            };
            for interface in &def.interfaces {
                let interface = interface.substitute(&bindings);
                if !out.contains(&interface) {
                    out.push(interface.clone());
                    pending.push(interface);
                }
            }
        }
        out
    }

    fn supports_event_adapter(&self) -> bool {
        self.event_adapter
    }
}
