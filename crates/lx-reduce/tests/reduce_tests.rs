mod common;

use common::{called, eval, eval_in, symbols_with};
use lx_core::ast::{ConstValue, Constant, Node, NodeKind, SyntaxTree};
use lx_core::error::Error;
use lx_core::types::{Literal, Ty};
use lx_core::{ReduceConfig, Result};
use lx_reduce::{default_symbols, reduce, try_reduce};
use pretty_assertions::assert_eq;

fn literal(node: &Node) -> Option<&Literal> {
    match node.kind() {
        NodeKind::Constant(Constant {
            value: ConstValue::Literal(literal),
            ..
        }) => Some(literal),
        _ => None,
    }
}

#[test]
fn terminal_nodes_reduce_to_themselves() -> Result<()> {
    let symbols = default_symbols();
    let constant = Node::constant(Literal::Int32(1));
    assert!(reduce(&constant, &symbols, None)?.ptr_eq(&constant));
    assert!(reduce(&constant, &symbols, Some(&Ty::int32()))?.ptr_eq(&constant));
    Ok(())
}

#[test]
fn conversions_of_terminal_nodes_are_cached() -> Result<()> {
    let symbols = default_symbols();
    let constant = Node::constant(Literal::Int32(1));
    let first = reduce(&constant, &symbols, Some(&Ty::int64()))?;
    let second = reduce(&constant, &symbols, Some(&Ty::int64()))?;
    assert!(matches!(first.kind(), NodeKind::Convert(_)));
    assert!(first.ptr_eq(&second));

    let back = reduce(&constant, &symbols, None)?;
    assert!(back.ptr_eq(&constant));
    Ok(())
}

#[test]
fn repeated_reduction_hits_the_cache() -> Result<()> {
    let symbols = default_symbols();
    let node = lx_lang::read_one("(+ 1 2)")?;
    let first = reduce(&node, &symbols, None)?;
    let second = reduce(&node, &symbols, None)?;
    assert!(first.ptr_eq(&second));

    let widened = reduce(&node, &symbols, Some(&Ty::int64()))?;
    assert!(!widened.ptr_eq(&first));
    assert!(reduce(&node, &symbols, Some(&Ty::int64()))?.ptr_eq(&widened));
    Ok(())
}

#[test]
fn addition_dispatches_to_the_operator_method() -> Result<()> {
    let node = eval("(+ 1 2)")?;
    assert_eq!(called(&node).as_deref(), Some("Int32.op_Addition"));
    assert_eq!(node.ty(), Some(Ty::int32()));
    Ok(())
}

#[test]
fn mixed_operands_pick_the_wider_operator() -> Result<()> {
    let node = eval("(+ 1 2L)")?;
    assert_eq!(called(&node).as_deref(), Some("Int64.op_Addition"));
    let NodeKind::Call(call) = node.kind() else {
        panic!("expected a call, got {}", node);
    };
    assert!(matches!(call.args[0].kind(), NodeKind::Convert(convert) if !convert.explicit));
    Ok(())
}

#[test]
fn unary_minus_negates() -> Result<()> {
    let node = eval("(- 5)")?;
    assert_eq!(called(&node).as_deref(), Some("Int32.op_UnaryNegation"));
    Ok(())
}

#[test]
fn string_concatenation_accepts_any_right_operand() -> Result<()> {
    let node = eval(r#"(+ "n = " 1)"#)?;
    assert_eq!(called(&node).as_deref(), Some("String.op_Addition"));
    assert_eq!(node.ty(), Some(Ty::string()));

    let exact = eval(r#"(+ "a" "b")"#)?;
    let NodeKind::Call(call) = exact.kind() else {
        panic!("expected a call, got {}", exact);
    };
    assert_eq!(call.method.params[1].ty, Ty::string());
    Ok(())
}

#[test]
fn unrelated_vector_elements_widen_to_object() -> Result<()> {
    let node = eval(r#"[1 "a"]"#)?;
    assert_eq!(node.ty(), Some(Ty::array(Ty::object())));
    let NodeKind::NewArray(array) = node.kind() else {
        panic!("expected an array, got {}", node);
    };
    assert_eq!(array.elements.len(), 2);
    assert!(array.elements.iter().all(|e| e.ty() == Some(Ty::object())));
    Ok(())
}

#[test]
fn numeric_vector_elements_share_the_narrowest_type() -> Result<()> {
    assert_eq!(eval("[1 2L]")?.ty(), Some(Ty::array(Ty::int64())));
    assert_eq!(eval("[1 2.5]")?.ty(), Some(Ty::array(Ty::double())));
    assert_eq!(eval("[1 2 3]")?.ty(), Some(Ty::array(Ty::int32())));
    assert_eq!(eval("[]")?.ty(), Some(Ty::array(Ty::object())));
    Ok(())
}

#[test]
fn expected_array_type_fixes_the_element_type() -> Result<()> {
    let symbols = default_symbols();
    let node = lx_lang::read_one("[1 2]")?;
    let reduced = reduce(&node, &symbols, Some(&Ty::array(Ty::int64())))?;
    assert_eq!(reduced.ty(), Some(Ty::array(Ty::int64())));
    Ok(())
}

#[test]
fn number_and_text_leaves_become_constants() -> Result<()> {
    assert_eq!(literal(&eval("4000000000")?), Some(&Literal::UInt32(4_000_000_000)));
    assert_eq!(literal(&eval("0xFF")?), Some(&Literal::Int32(255)));
    assert_eq!(literal(&eval(r#""hi""#)?), Some(&Literal::string("hi")));
    assert_eq!(literal(&eval("true")?), Some(&Literal::Bool(true)));
    Ok(())
}

#[test]
fn unknown_identifiers_fail() {
    let err = eval("nope").unwrap_err();
    assert!(matches!(err, Error::UnknownIdentifier { ref name, .. } if name == "nope"));
    assert!(err.span().is_some());
}

#[test]
fn speculative_reduction_swallows_errors() -> Result<()> {
    let symbols = default_symbols();
    assert!(try_reduce(&Node::identifier("nope"), &symbols, None).is_none());
    assert!(try_reduce(&Node::number("1"), &symbols, None).is_some());
    Ok(())
}

#[test]
fn list_shapes() -> Result<()> {
    assert_eq!(eval("()")?.ty(), Some(Ty::void()));
    assert_eq!(literal(&eval("(1)")?), Some(&Literal::Int32(1)));
    assert!(matches!(eval("(1 2)"), Err(Error::Unreducible { .. })));
    Ok(())
}

#[test]
fn implicit_conversion_toward_the_expected_type() -> Result<()> {
    let symbols = default_symbols();
    let one = reduce(&Node::number("1"), &symbols, Some(&Ty::int64()))?;
    assert!(matches!(one.kind(), NodeKind::Convert(convert) if !convert.explicit));
    assert_eq!(one.ty(), Some(Ty::int64()));

    let null = reduce(&Node::identifier("null"), &symbols, Some(&Ty::string()))?;
    assert_eq!(null.ty(), Some(Ty::string()));
    assert_eq!(literal(&null), Some(&Literal::Null));
    Ok(())
}

#[test]
fn implicit_conversions_can_be_disabled() -> Result<()> {
    let config = ReduceConfig {
        implicit_conversions: false,
        ..ReduceConfig::default()
    };
    let symbols = symbols_with(vec![], config);
    let one = reduce(&Node::number("1"), &symbols, Some(&Ty::int64()))?;
    assert_eq!(one.ty(), Some(Ty::int32()));
    Ok(())
}

#[test]
fn serialized_syntax_reduces_like_the_tree_it_holds() -> Result<()> {
    let tree = SyntaxTree::List(vec![
        SyntaxTree::Identifier("*".into()),
        SyntaxTree::Number("6".into()),
        SyntaxTree::Number("7".into()),
    ]);
    let node = Node::serialized(tree.to_json()?);
    let reduced = reduce(&node, &default_symbols(), None)?;
    assert_eq!(called(&reduced).as_deref(), Some("Int32.op_Multiply"));
    Ok(())
}

#[test]
fn control_forms() -> Result<()> {
    let node = eval("(if (< 1 2) 1 2L)")?;
    assert!(matches!(node.kind(), NodeKind::Conditional(_)));
    assert_eq!(node.ty(), Some(Ty::int64()));

    let block = eval("(do 1 \"two\")")?;
    assert!(matches!(block.kind(), NodeKind::Block(_)));
    assert_eq!(block.ty(), Some(Ty::string()));

    let bound = eval("(let (x 20 y 22) (+ x y))")?;
    assert_eq!(called(&bound).as_deref(), Some("Int32.op_Addition"));
    Ok(())
}

#[test]
fn let_scopes_do_not_leak() -> Result<()> {
    let symbols = default_symbols();
    eval_in(&symbols, "(let (x 1) x)")?;
    assert!(matches!(
        eval_in(&symbols, "x"),
        Err(Error::UnknownIdentifier { .. })
    ));
    Ok(())
}
