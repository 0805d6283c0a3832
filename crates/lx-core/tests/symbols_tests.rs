use lx_core::ast::{DispatchKind, Node};
use lx_core::types::{Literal, Member, Signature, Ty, TypeDef, TypeOracle};
use lx_core::{ReduceConfig, SymbolTable};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Knows nothing beyond identity conversions.
struct BareOracle;

impl TypeOracle for BareOracle {
    fn type_def(&self, _ty: &Ty) -> Option<Arc<TypeDef>> {
        None
    }
    fn members(&self, _ty: &Ty) -> Vec<Member> {
        vec![]
    }
    fn is_assignable(&self, from: &Ty, to: &Ty) -> bool {
        from == to || to.is_object()
    }
    fn is_implicitly_convertible(&self, from: &Ty, to: &Ty) -> bool {
        self.is_assignable(from, to)
    }
    fn is_explicitly_convertible(&self, from: &Ty, to: &Ty) -> bool {
        self.is_assignable(from, to)
    }
    fn convertible_types(&self, ty: &Ty) -> Vec<Ty> {
        vec![ty.clone(), Ty::object()]
    }
    fn delegate_signature(&self, _ty: &Ty) -> Option<Signature> {
        None
    }
    fn is_value_type(&self, _ty: &Ty) -> bool {
        false
    }
    fn is_interface(&self, _ty: &Ty) -> bool {
        false
    }
    fn base_type(&self, _ty: &Ty) -> Option<Ty> {
        None
    }
    fn interfaces(&self, _ty: &Ty) -> Vec<Ty> {
        vec![]
    }
}

fn root() -> SymbolTable {
    SymbolTable::new(Arc::new(BareOracle), ReduceConfig::default())
}

fn int(value: i32) -> Node {
    Node::constant(Literal::Int32(value))
}

#[test]
fn resolve_walks_outward() -> lx_core::Result<()> {
    let root = root();
    root.add_literal("x", int(1));
    let child = root.child().child();
    let value = child.resolve("x")?;
    assert_eq!(value.to_string(), "1");
    Ok(())
}

#[test]
fn child_shadows_without_touching_parent() -> lx_core::Result<()> {
    let root = root();
    root.add_literal("x", int(1));
    let child = root.child();
    child.add_literal("x", int(2));

    assert_eq!(child.resolve("x")?.to_string(), "2");
    assert_eq!(root.resolve("x")?.to_string(), "1");
    assert_eq!(root.local_len(), 1);
    Ok(())
}

#[test]
fn unknown_identifier_is_reported() {
    let err = root().child().resolve("nope").unwrap_err();
    assert!(matches!(err, lx_core::Error::UnknownIdentifier { ref name, .. } if name == "nope"));
}

#[test]
fn resolve_match_filters_by_kind() {
    let root = root();
    root.add_function("f", DispatchKind::METHOD, |_, _, _| Ok(None));
    assert!(root.resolve_match(DispatchKind::METHOD, "f").is_some());
    assert!(root.resolve_match(DispatchKind::MEMBER, "f").is_none());

    // A member binding in an inner scope does not hide the outer method.
    let child = root.child();
    child.add_literal("f", int(3));
    assert!(child.resolve_match(DispatchKind::METHOD, "f").is_some());
    assert!(child
        .resolve_match(DispatchKind::MEMBER, "f")
        .is_some_and(|def| def.is_literal()));
}

#[test]
fn all_literals_prefers_inner_bindings() {
    let root = root();
    root.add_literal("a", int(1));
    root.add_literal("b", int(2));
    root.add_function("g", DispatchKind::MEMBER, |_, _, _| Ok(None));
    let child = root.child();
    child.add_literal("a", int(10));

    let literals: Vec<(String, String)> = child
        .all_literals()
        .into_iter()
        .map(|(name, node)| (name, node.to_string()))
        .collect();
    assert_eq!(
        literals,
        vec![
            ("a".to_string(), "10".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn custom_missing_is_inherited() -> lx_core::Result<()> {
    let root = root();
    assert!(!root.has_custom_missing());
    let scoped = root.child_with_missing(Arc::new(|node, _, _| {
        Ok(node.as_identifier().map(|name| Node::constant(Literal::string(name))))
    }));
    let inner = scoped.child();
    assert!(inner.has_custom_missing());
    let value = inner.missing(&Node::identifier("hello"), None)?;
    assert_eq!(value.map(|v| v.to_string()), Some("\"hello\"".to_string()));
    Ok(())
}

#[test]
fn children_inherit_config() {
    let root = SymbolTable::new(
        Arc::new(BareOracle),
        ReduceConfig::default().with_max_inference_rounds(4),
    );
    assert_eq!(root.child().child().config().max_inference_rounds, 4);
}
