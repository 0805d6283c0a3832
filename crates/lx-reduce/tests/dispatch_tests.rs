mod common;

use common::{called, eval, eval_in, registry_symbols, symbols_with};
use lx_core::ast::{ConstValue, NodeKind, TypeCandidate};
use lx_core::error::Error;
use lx_core::types::{
    ConstructorInfo, EventInfo, Literal, Member, MethodInfo, ParamInfo, Ty, TypeDef,
};
use lx_core::{Node, ReduceConfig, Result};
use lx_typing::TypeRegistry;
use pretty_assertions::assert_eq;

fn call_args(node: &Node) -> Vec<Node> {
    match node.kind() {
        NodeKind::Call(call) => call.args.clone(),
        _ => panic!("expected a call, got {}", node),
    }
}

fn static_method(declaring: &str, name: &str, params: Vec<ParamInfo>, ret: Ty) -> Member {
    Member::Method(MethodInfo::new(name, Ty::named(declaring), params, ret).into_static())
}

#[test]
fn instance_property_and_static_constant() -> Result<()> {
    let length = eval(r#"(. "abc" Length)"#)?;
    assert!(matches!(length.kind(), NodeKind::Property(access) if access.instance.is_some()));
    assert_eq!(length.ty(), Some(Ty::int32()));

    let max = eval("(. Int32 MaxValue)")?;
    let NodeKind::Constant(constant) = max.kind() else {
        panic!("expected a constant, got {}", max);
    };
    assert!(matches!(
        constant.value,
        ConstValue::Literal(Literal::Int32(i32::MAX))
    ));
    Ok(())
}

#[test]
fn indexer_dispatch_uses_the_default_member() -> Result<()> {
    let node = eval(r#"(index "abc" 0)"#)?;
    let NodeKind::Property(access) = node.kind() else {
        panic!("expected an indexer, got {}", node);
    };
    assert_eq!(access.property.name, "Chars");
    assert_eq!(access.args.len(), 1);
    assert_eq!(node.ty(), Some(Ty::char()));
    Ok(())
}

#[test]
fn optional_and_named_arguments() -> Result<()> {
    let padded = eval(r#"(. "ab" PadLeft)"#)?;
    assert_eq!(called(&padded).as_deref(), Some("String.PadLeft"));
    assert_eq!(call_args(&padded).len(), 1);

    let named = eval(r#"(. "abc" Substring (: start 1))"#)?;
    let NodeKind::Call(call) = named.kind() else {
        panic!("expected a call, got {}", named);
    };
    assert_eq!(call.method.params.len(), 1);
    Ok(())
}

#[test]
fn param_arrays_pack_trailing_arguments() -> Result<()> {
    let mut methods = vec![];
    for (source, count) in [
        "(. String Concat)",
        "(. String Concat 1)",
        "(. String Concat 1 2 3)",
    ]
    .iter()
    .zip([0, 1, 3])
    {
        let node = eval(source)?;
        let NodeKind::Call(call) = node.kind() else {
            panic!("expected a call, got {}", node);
        };
        let [packed] = call.args.as_slice() else {
            panic!("expected one packed argument in {}", node);
        };
        let NodeKind::NewArray(array) = packed.kind() else {
            panic!("expected a synthesized array in {}", node);
        };
        assert_eq!(array.elem, Ty::object());
        assert_eq!(array.elements.len(), count);
        methods.push(call.method.to_string());
    }
    methods.dedup();
    assert_eq!(methods, vec!["String.Concat(Object[])".to_string()]);
    Ok(())
}

#[test]
fn direct_array_argument_prefers_the_normal_form() -> Result<()> {
    let symbols = symbols_with(
        vec![TypeDef::static_class("Sum").with_member(static_method(
            "Sum",
            "Of",
            vec![ParamInfo::params("values", Ty::array(Ty::int32()))],
            Ty::int32(),
        ))],
        ReduceConfig::default(),
    );
    let node = eval_in(&symbols, "(. Sum Of [1 2 3])")?;
    let args = call_args(&node);
    let NodeKind::NewArray(array) = args[0].kind() else {
        panic!("expected the array itself, got {}", args[0]);
    };
    assert_eq!(array.elements.len(), 3);
    assert_eq!(array.elem, Ty::int32());
    Ok(())
}

#[test]
fn more_specific_parameter_wins() -> Result<()> {
    let symbols = symbols_with(
        vec![TypeDef::static_class("Pick").with_members([
            static_method("Pick", "f", vec![ParamInfo::new("x", Ty::object())], Ty::int32()),
            static_method("Pick", "f", vec![ParamInfo::new("x", Ty::string())], Ty::string()),
        ])],
        ReduceConfig::default(),
    );
    assert_eq!(eval_in(&symbols, r#"(. Pick f "a")"#)?.ty(), Some(Ty::string()));
    assert_eq!(eval_in(&symbols, "(. Pick f 1)")?.ty(), Some(Ty::int32()));
    Ok(())
}

#[test]
fn regular_method_beats_extension() -> Result<()> {
    let widget = Ty::named("Widget");
    let symbols = symbols_with(
        vec![
            TypeDef::class("Widget")
                .with_member(Member::Constructor(ConstructorInfo::new(widget.clone(), vec![])))
                .with_member(Member::Method(MethodInfo::new(
                    "f",
                    widget.clone(),
                    vec![ParamInfo::new("x", Ty::int32())],
                    Ty::int32(),
                ))),
            TypeDef::static_class("WidgetExtensions").with_member(Member::Method(
                MethodInfo::new(
                    "f",
                    Ty::named("WidgetExtensions"),
                    vec![
                        ParamInfo::new("this", widget.clone()),
                        ParamInfo::new("x", Ty::int32()),
                    ],
                    Ty::string(),
                )
                .into_extension(),
            )),
        ],
        ReduceConfig::default(),
    );
    let regular = eval_in(&symbols, "(. (new Widget) f 1)")?;
    assert_eq!(called(&regular).as_deref(), Some("Widget.f"));

    let extension = eval_in(&symbols, "(. (new Widget) f)");
    assert!(matches!(extension, Err(Error::DispatchFailed { .. })));
    Ok(())
}

#[test]
fn extensions_apply_when_no_instance_method_exists() -> Result<()> {
    let node = eval("(. [1 2 3] Count)")?;
    assert_eq!(called(&node).as_deref(), Some("Enumerable.Count"));
    let NodeKind::Call(call) = node.kind() else {
        panic!("expected a call, got {}", node);
    };
    assert!(call.instance.is_none());
    assert_eq!(call.args.len(), 1);
    Ok(())
}

#[test]
fn static_references_do_not_pull_in_extensions() -> Result<()> {
    let range = eval("(. Enumerable Range 0 3)")?;
    assert_eq!(range.ty(), Some(Ty::enumerable(Ty::int32())));
    assert!(matches!(
        eval("(. Int32 Count)"),
        Err(Error::DispatchFailed { .. })
    ));
    Ok(())
}

#[test]
fn generic_inference_through_lambdas() -> Result<()> {
    let selected = eval("(. [1 2 3] Select #(* $0 2))")?;
    assert_eq!(selected.ty(), Some(Ty::enumerable(Ty::int32())));
    let NodeKind::Call(call) = selected.kind() else {
        panic!("expected a call, got {}", selected);
    };
    assert_eq!(call.method.generic_args, vec![Ty::int32(), Ty::int32()]);
    assert!(matches!(call.args[1].kind(), NodeKind::Lambda(_)));

    let described = eval(r#"(. [1 2 3] Select (fn (x) (. x ToString)))"#)?;
    assert_eq!(described.ty(), Some(Ty::enumerable(Ty::string())));

    let filtered = eval("(. [1 2 3] Where (fn (x) (> x 1)))")?;
    assert_eq!(filtered.ty(), Some(Ty::enumerable(Ty::int32())));
    Ok(())
}

#[test]
fn names_bound_to_lambdas_take_part_in_inference() -> Result<()> {
    let node = eval("(let (f (fn (x) x)) (. [1 2] Select f))")?;
    assert_eq!(node.ty(), Some(Ty::enumerable(Ty::int32())));
    assert_eq!(called(&node).as_deref(), Some("Enumerable.Select"));
    Ok(())
}

/// `Apply<T, R>(Func<T, R> f, T value)`: the lambda comes before the value
/// that fixes `T`, so `R` is only known after a second pass.
fn pipe() -> TypeDef {
    let t = Ty::param("T");
    let r = Ty::param("R");
    TypeDef::static_class("Pipe").with_member(Member::Method(
        MethodInfo::new(
            "Apply",
            Ty::named("Pipe"),
            vec![
                ParamInfo::new("f", Ty::func(vec![t.clone()], r.clone())),
                ParamInfo::new("value", t),
            ],
            r,
        )
        .with_generics(&["T", "R"])
        .into_static(),
    ))
}

#[test]
fn inference_needing_two_rounds_respects_the_cap() -> Result<()> {
    let source = "(. Pipe Apply (fn (x) x) 1)";

    let symbols = symbols_with(vec![pipe()], ReduceConfig::default());
    let applied = eval_in(&symbols, source)?;
    assert_eq!(applied.ty(), Some(Ty::int32()));
    let NodeKind::Call(call) = applied.kind() else {
        panic!("expected a call, got {}", applied);
    };
    assert_eq!(call.method.generic_args, vec![Ty::int32(), Ty::int32()]);

    let capped = symbols_with(
        vec![pipe()],
        ReduceConfig::default().with_max_inference_rounds(1),
    );
    assert!(matches!(
        eval_in(&capped, source),
        Err(Error::DispatchFailed { .. })
    ));
    Ok(())
}

#[test]
fn explicit_type_arguments_close_generic_methods() -> Result<()> {
    let node = eval("(. [1 2 3] (of Select Int32 Int64) #(+ $0 1))")?;
    assert_eq!(node.ty(), Some(Ty::enumerable(Ty::int64())));
    Ok(())
}

#[test]
fn lambda_arity_filters_candidates() {
    let err = eval("(. [1 2 3] Select (fn (a b) a))").unwrap_err();
    assert!(matches!(err, Error::DispatchFailed { .. }));
}

#[test]
fn constructors_and_generic_types() -> Result<()> {
    let list = eval("(new (of List Int32))")?;
    assert!(matches!(list.kind(), NodeKind::New(_)));
    assert_eq!(list.ty(), Some(Ty::list(Ty::int32())));

    let array = eval("(of Array String)")?;
    assert_eq!(
        array.as_type_candidate(),
        Some(&TypeCandidate::new(vec![Ty::array(Ty::string())]))
    );
    Ok(())
}

#[test]
fn value_type_without_constructor_defaults() -> Result<()> {
    let symbols = symbols_with(vec![TypeDef::structure("Point")], ReduceConfig::default());
    let node = eval_in(&symbols, "(Point)")?;
    assert!(matches!(node.kind(), NodeKind::Default(ty) if ty == &Ty::named("Point")));
    Ok(())
}

#[test]
fn single_argument_construction_casts() -> Result<()> {
    let node = eval("(Int32 2.5)")?;
    let NodeKind::Convert(convert) = node.kind() else {
        panic!("expected a cast, got {}", node);
    };
    assert!(convert.explicit);
    assert_eq!(convert.ty, Ty::int32());

    assert!(matches!(eval("(Int32 1 2)"), Err(Error::DispatchFailed { .. })));
    Ok(())
}

fn button() -> TypeDef {
    let button = Ty::named("Button");
    TypeDef::class("Button")
        .with_member(Member::Constructor(ConstructorInfo::new(button.clone(), vec![])))
        .with_member(Member::Event(EventInfo::new(
            "Click",
            button,
            Ty::action(vec![Ty::int32()]),
        )))
}

#[test]
fn events_need_the_reactive_adapter() -> Result<()> {
    let without = symbols_with(vec![button()], ReduceConfig::default());
    assert!(matches!(
        eval_in(&without, "(. (new Button) Click)"),
        Err(Error::MissingCapability(_))
    ));

    let with = registry_symbols(
        TypeRegistry::with_builtins().with_event_adapter(true),
        vec![button()],
        ReduceConfig::default().with_reactive_events(true),
    );
    let node = eval_in(&with, "(. (new Button) Click)")?;
    assert!(matches!(node.kind(), NodeKind::EventSubscription(_)));
    assert_eq!(
        node.ty(),
        Some(Ty::generic("IObservable", vec![Ty::int32()]))
    );
    Ok(())
}

#[test]
fn unknown_members_and_functions_fail_to_dispatch() {
    assert!(matches!(
        eval(r#"(. "abc" Nope)"#),
        Err(Error::DispatchFailed { .. })
    ));
    assert!(matches!(
        eval("(: a 1)"),
        Err(Error::UnsupportedDispatchShape(_))
    ));
}

#[test]
fn custom_missing_handler_receives_unbound_calls() -> Result<()> {
    let symbols = lx_reduce::default_symbols().child_with_missing(std::sync::Arc::new(
        |node: &Node, _: &lx_core::SymbolTable, _: Option<&Ty>| -> Result<Option<Node>> {
            Ok(node
                .as_dispatch()
                .map(|_| Node::constant(Literal::string("handled"))))
        },
    ));
    let node = eval_in(&symbols, "(anything 1 2)")?;
    assert_eq!(node.ty(), Some(Ty::string()));
    Ok(())
}
