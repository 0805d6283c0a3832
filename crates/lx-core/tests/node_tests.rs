use lx_core::ast::{Node, SyntaxTree};
use lx_core::error::Error;
use lx_core::span::Span;
use lx_core::types::{Literal, Ty};
use pretty_assertions::assert_eq;

#[test]
fn syntax_forms_are_reducible_and_typed_forms_are_terminal() {
    assert!(Node::identifier("x").can_reduce());
    assert!(Node::list(vec![]).can_reduce());
    assert!(Node::number("1").can_reduce());
    assert!(!Node::constant(Literal::Int32(1)).can_reduce());
    assert!(!Node::default_value(Ty::int32()).can_reduce());
}

#[test]
fn cache_keeps_only_the_latest_expected_type() {
    let node = Node::number("1");
    let as_int = Node::constant(Literal::Int32(1));
    let as_long = Node::constant(Literal::Int64(1));

    node.store(Some(&Ty::int32()), &as_int);
    assert!(node.cached(Some(&Ty::int32())).is_some_and(|n| n.ptr_eq(&as_int)));

    node.store(Some(&Ty::int64()), &as_long);
    assert!(node.cached(Some(&Ty::int32())).is_none());
    assert!(node.cached(Some(&Ty::int64())).is_some_and(|n| n.ptr_eq(&as_long)));
}

#[test]
fn clear_cache_reaches_descendants() {
    let leaf = Node::number("2");
    let list = Node::list(vec![Node::identifier("f"), leaf.clone()]);
    leaf.store(None, &Node::constant(Literal::Int32(2)));
    list.mark_terminal();

    list.clear_cache();
    assert!(leaf.cached(None).is_none());
    assert!(list.can_reduce());
}

#[test]
fn named_argument_shape() {
    let arg = Node::list(vec![
        Node::identifier(":"),
        Node::identifier("count"),
        Node::number("3"),
    ]);
    let (name, value) = arg.as_named_argument().expect("named argument");
    assert_eq!(name, "count");
    assert_eq!(value.to_string(), "3");
}

#[test]
fn pretty_prints_as_s_expression() {
    let node = Node::list(vec![
        Node::identifier("+"),
        Node::number("1"),
        Node::vector(vec![Node::text("a")]),
    ]);
    assert_eq!(node.to_string(), "(+ 1 [\"a\"])");
}

#[test]
fn block_takes_type_of_last_expression() {
    let block = Node::block(vec![
        Node::constant(Literal::Bool(true)),
        Node::constant(Literal::string("x")),
    ]);
    assert_eq!(block.ty(), Some(Ty::string()));
    assert_eq!(Node::block(vec![]).ty(), Some(Ty::void()));
}

#[test]
fn syntax_tree_survives_json() -> lx_core::Result<()> {
    let node = Node::list(vec![
        Node::identifier("f"),
        Node::quoted(Node::identifier("x")),
        Node::lambda_list(vec![Node::identifier("$0")]),
    ]);
    let tree = SyntaxTree::from_node(&node)?;
    let json = tree.to_json()?;
    let back = SyntaxTree::from_json(json)?.to_node();
    assert_eq!(back.to_string(), node.to_string());
    Ok(())
}

#[test]
fn typed_nodes_do_not_serialize() {
    let err = SyntaxTree::from_node(&Node::constant(Literal::Null)).unwrap_err();
    assert!(err.to_string().contains("cannot serialize non-syntax node"));
}

#[test]
fn malformed_json_names_what_failed() {
    let json = serde_json::json!({ "Nope": 1 });
    let err = SyntaxTree::from_json(json).unwrap_err();
    assert!(matches!(
        &err,
        Error::Generic(message) if message.contains("malformed serialized syntax")
    ));
}

#[test]
fn span_union_ignores_null() {
    let a = Span::new(1, 4, 9);
    assert_eq!(a.union(Span::null()), a);
    assert_eq!(a.union(Span::new(1, 2, 5)), Span::new(1, 2, 9));
}
