//! Chained, mutable name environments.
//!
//! A [`SymbolTable`] is one scope in a parent-linked chain. Lookups walk from
//! the innermost scope outward; additions only ever touch the scope they are
//! made on, so child scopes shadow their parents without mutating them.

use crate::ast::{DispatchKind, Node};
use crate::collections::ConcurrentMap;
use crate::config::ReduceConfig;
use crate::error::{Error, Result};
use crate::types::{Ty, TypeOracle};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

/// Reduces a node that resolved to a symbol. `Ok(None)` means "no match here".
///
/// Member symbols receive the identifier node, Method symbols the function
/// dispatch node (whose arguments are the call-site arguments).
pub type SymbolFn =
    Arc<dyn Fn(&Node, &SymbolTable, Option<&Ty>) -> Result<Option<Node>> + Send + Sync>;

#[derive(Clone)]
pub struct SymbolDefinition {
    pub kind: DispatchKind,
    /// Set for literal symbols: the value returned regardless of call site.
    literal: Option<Node>,
    func: SymbolFn,
}

impl SymbolDefinition {
    pub fn function(kind: DispatchKind, func: SymbolFn) -> Self {
        Self {
            kind,
            literal: None,
            func,
        }
    }

    pub fn literal(value: Node) -> Self {
        let captured = value.clone();
        Self {
            kind: DispatchKind::MEMBER,
            literal: Some(value),
            func: Arc::new(move |_, _, _| Ok(Some(captured.clone()))),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }

    pub fn literal_value(&self) -> Option<&Node> {
        self.literal.as_ref()
    }

    pub fn invoke(
        &self,
        node: &Node,
        symbols: &SymbolTable,
        expected: Option<&Ty>,
    ) -> Result<Option<Node>> {
        (self.func)(node, symbols, expected)
    }
}

impl Debug for SymbolDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolDefinition")
            .field("kind", &self.kind)
            .field("literal", &self.literal)
            .finish()
    }
}

struct SymbolScope {
    parent: Option<SymbolTable>,
    /// Newest definition last.
    symbols: ConcurrentMap<String, Vec<SymbolDefinition>>,
    missing: Option<SymbolFn>,
    oracle: Arc<dyn TypeOracle>,
    config: ReduceConfig,
}

#[derive(Clone)]
pub struct SymbolTable(Arc<SymbolScope>);

/// Non-owning handle to a [`SymbolTable`].
#[derive(Clone)]
pub struct WeakSymbolTable(Weak<SymbolScope>);

impl WeakSymbolTable {
    pub fn upgrade(&self) -> Option<SymbolTable> {
        self.0.upgrade().map(SymbolTable)
    }
}

impl SymbolTable {
    /// A root scope over the given type-metadata service.
    pub fn new(oracle: Arc<dyn TypeOracle>, config: ReduceConfig) -> Self {
        Self(Arc::new(SymbolScope {
            parent: None,
            symbols: ConcurrentMap::new(),
            missing: None,
            oracle,
            config,
        }))
    }

    fn derive(&self, missing: Option<SymbolFn>) -> SymbolTable {
        Self(Arc::new(SymbolScope {
            parent: Some(self.clone()),
            symbols: ConcurrentMap::new(),
            missing,
            oracle: self.0.oracle.clone(),
            config: self.0.config.clone(),
        }))
    }

    pub fn child(&self) -> SymbolTable {
        self.derive(None)
    }

    /// A child scope whose fallback handler replaces the default
    /// unknown-identifier failure.
    pub fn child_with_missing(&self, missing: SymbolFn) -> SymbolTable {
        self.derive(Some(missing))
    }

    pub fn parent(&self) -> Option<&SymbolTable> {
        self.0.parent.as_ref()
    }

    pub fn oracle(&self) -> &dyn TypeOracle {
        self.0.oracle.as_ref()
    }

    pub fn shared_oracle(&self) -> Arc<dyn TypeOracle> {
        self.0.oracle.clone()
    }

    pub fn config(&self) -> &ReduceConfig {
        &self.0.config
    }

    pub fn ptr_eq(&self, other: &SymbolTable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakSymbolTable {
        WeakSymbolTable(Arc::downgrade(&self.0))
    }

    /// Whether this table is `ancestor` or one of its descendants.
    pub fn is_within(&self, ancestor: &SymbolTable) -> bool {
        let mut scope = Some(self);
        while let Some(table) = scope {
            if table.ptr_eq(ancestor) {
                return true;
            }
            scope = table.parent();
        }
        false
    }

    pub fn add(&self, name: impl Into<String>, definition: SymbolDefinition) {
        self.0
            .symbols
            .update_or_default(name.into(), |defs| defs.push(definition));
    }

    /// Binds `name` to a value. A value that captured this scope (a lambda
    /// bound by `let`) is stored with a weak capture so the scope does not
    /// own itself.
    pub fn add_literal(&self, name: impl Into<String>, value: Node) {
        let value = if value.captures(self) {
            value.with_weak_capture()
        } else {
            value
        };
        self.add(name, SymbolDefinition::literal(value));
    }

    pub fn add_function<F>(&self, name: impl Into<String>, kind: DispatchKind, func: F)
    where
        F: Fn(&Node, &SymbolTable, Option<&Ty>) -> Result<Option<Node>>
            + Send
            + Sync
            + 'static,
    {
        self.add(name, SymbolDefinition::function(kind, Arc::new(func)));
    }

    fn lookup_local(&self, kind: DispatchKind, name: &str) -> Option<SymbolDefinition> {
        let defs = self.0.symbols.get_cloned(&name.to_string())?;
        defs.into_iter().rev().find(|def| def.kind.intersects(kind))
    }

    /// First definition, innermost scope first, whose kind intersects `kind`.
    pub fn resolve_match(&self, kind: DispatchKind, name: &str) -> Option<SymbolDefinition> {
        let mut scope = Some(self);
        while let Some(table) = scope {
            if let Some(def) = table.lookup_local(kind, name) {
                return Some(def);
            }
            scope = table.parent();
        }
        None
    }

    /// Value bound to `name`; fails with `UnknownIdentifier` when nothing in the
    /// chain produces one.
    pub fn resolve(&self, name: &str) -> Result<Node> {
        self.try_resolve(name)?
            .ok_or_else(|| Error::unknown_identifier(name, None))
    }

    pub fn try_resolve(&self, name: &str) -> Result<Option<Node>> {
        let Some(def) = self.resolve_match(DispatchKind::MEMBER, name) else {
            return Ok(None);
        };
        if let Some(value) = def.literal_value() {
            return Ok(Some(value.clone()));
        }
        def.invoke(&Node::identifier(name), self, None)
    }

    /// Flattened literal bindings; inner scopes shadow outer ones.
    pub fn all_literals(&self) -> Vec<(String, Node)> {
        let mut seen = HashSet::new();
        let mut literals = vec![];
        let mut scope = Some(self);
        while let Some(table) = scope {
            let mut local = vec![];
            table.0.symbols.for_each(|name, defs| {
                let member = defs
                    .iter()
                    .rev()
                    .find(|def| def.kind.contains(DispatchKind::MEMBER));
                if let Some(def) = member {
                    local.push((name.clone(), def.clone()));
                }
            });
            local.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, def) in local {
                if !seen.insert(name.clone()) {
                    continue;
                }
                if let Some(value) = def.literal_value() {
                    literals.push((name, value.clone()));
                }
            }
            scope = table.parent();
        }
        literals
    }

    fn custom_missing(&self) -> Option<&SymbolFn> {
        let mut scope = Some(self);
        while let Some(table) = scope {
            if let Some(missing) = &table.0.missing {
                return Some(missing);
            }
            scope = table.parent();
        }
        None
    }

    pub fn has_custom_missing(&self) -> bool {
        self.custom_missing().is_some()
    }

    /// Fallback for names nothing in the chain defines.
    pub fn missing(&self, node: &Node, expected: Option<&Ty>) -> Result<Option<Node>> {
        match self.custom_missing() {
            Some(missing) => missing(node, self, expected),
            None => Ok(None),
        }
    }

    /// Number of names bound in this scope alone.
    pub fn local_len(&self) -> usize {
        self.0.symbols.len()
    }
}

impl Debug for SymbolTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut depth = 0;
        let mut scope = self.parent();
        while let Some(table) = scope {
            depth += 1;
            scope = table.parent();
        }
        f.debug_struct("SymbolTable")
            .field("local", &self.local_len())
            .field("depth", &depth)
            .finish()
    }
}
