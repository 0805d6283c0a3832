//! The builtin type universe: primitives, delegates, sequences and the
//! `Enumerable`/`Math` helper classes.

use bigdecimal::BigDecimal;
use lx_core::types::well_known::*;
use lx_core::types::{
    ConstructorInfo, FieldInfo, Literal, Member, MethodInfo, ParamInfo, PropertyInfo, Ty, TypeDef,
};

/// 96-bit mantissa bound of the `Decimal` type.
const DECIMAL_MAX: i128 = (1 << 96) - 1;

const BINARY_ARITHMETIC: &[&str] = &[
    "op_Addition",
    "op_Subtraction",
    "op_Multiply",
    "op_Division",
    "op_Modulus",
];

const COMPARISONS: &[&str] = &[
    "op_Equality",
    "op_Inequality",
    "op_LessThan",
    "op_GreaterThan",
    "op_LessThanOrEqual",
    "op_GreaterThanOrEqual",
];

fn p(name: &str, ty: Ty) -> ParamInfo {
    ParamInfo::new(name, ty)
}

fn method(declaring: &Ty, name: &str, params: Vec<ParamInfo>, ret: Ty) -> Member {
    Member::Method(MethodInfo::new(name, declaring.clone(), params, ret))
}

fn static_method(declaring: &Ty, name: &str, params: Vec<ParamInfo>, ret: Ty) -> Member {
    Member::Method(MethodInfo::new(name, declaring.clone(), params, ret).into_static())
}

fn binary_operators(ty: &Ty, ops: &[&str], ret: impl Fn(&str) -> Ty) -> Vec<Member> {
    ops.iter()
        .map(|op| {
            static_method(
                ty,
                op,
                vec![p("left", ty.clone()), p("right", ty.clone())],
                ret(op),
            )
        })
        .collect()
}

fn numeric(name: &str, min: Literal, max: Literal, signed: bool) -> TypeDef {
    let ty = Ty::named(name);
    let mut members = binary_operators(&ty, BINARY_ARITHMETIC, |_| ty.clone());
    members.extend(binary_operators(&ty, COMPARISONS, |_| Ty::bool()));
    if signed {
        members.push(static_method(
            &ty,
            "op_UnaryNegation",
            vec![p("value", ty.clone())],
            ty.clone(),
        ));
    }
    members.push(static_method(&ty, "Parse", vec![p("s", Ty::string())], ty.clone()));
    members.push(method(&ty, "CompareTo", vec![p("value", ty.clone())], Ty::int32()));
    members.push(Member::Field(FieldInfo::constant("MinValue", ty.clone(), min)));
    members.push(Member::Field(FieldInfo::constant("MaxValue", ty.clone(), max)));
    TypeDef::structure(name).with_members(members)
}

fn object() -> TypeDef {
    let ty = Ty::object();
    TypeDef::class(OBJECT).with_members([
        method(&ty, "ToString", vec![], Ty::string()),
        method(&ty, "Equals", vec![p("obj", Ty::object())], Ty::bool()),
        method(&ty, "GetHashCode", vec![], Ty::int32()),
        method(&ty, "GetType", vec![], Ty::named(TYPE)),
    ])
}

fn boolean() -> TypeDef {
    let ty = Ty::bool();
    let mut members = binary_operators(&ty, &["op_Equality", "op_Inequality"], |_| Ty::bool());
    members.push(static_method(
        &ty,
        "op_LogicalNot",
        vec![p("value", ty.clone())],
        ty.clone(),
    ));
    TypeDef::structure(BOOLEAN).with_members(members)
}

fn char_type() -> TypeDef {
    let ty = Ty::char();
    let mut members = binary_operators(&ty, COMPARISONS, |_| Ty::bool());
    members.push(static_method(&ty, "IsDigit", vec![p("c", ty.clone())], Ty::bool()));
    members.push(static_method(&ty, "ToUpper", vec![p("c", ty.clone())], ty.clone()));
    TypeDef::structure(CHAR).with_members(members)
}

fn string() -> TypeDef {
    let ty = Ty::string();
    let objects = Ty::array(Ty::object());
    TypeDef::class(STRING)
        .with_interface(Ty::enumerable(Ty::char()))
        .with_default_member("Chars")
        .with_members([
            Member::Constructor(ConstructorInfo::new(
                ty.clone(),
                vec![p("c", Ty::char()), p("count", Ty::int32())],
            )),
            Member::Constructor(ConstructorInfo::new(
                ty.clone(),
                vec![p("value", Ty::array(Ty::char()))],
            )),
            Member::Property(PropertyInfo::new("Length", ty.clone(), Ty::int32())),
            Member::Property(PropertyInfo::indexer(
                "Chars",
                ty.clone(),
                Ty::char(),
                vec![p("index", Ty::int32())],
            )),
            Member::Field(FieldInfo::constant("Empty", ty.clone(), Literal::string(""))),
            static_method(
                &ty,
                "op_Addition",
                vec![p("left", ty.clone()), p("right", ty.clone())],
                ty.clone(),
            ),
            static_method(
                &ty,
                "op_Addition",
                vec![p("left", ty.clone()), p("right", Ty::object())],
                ty.clone(),
            ),
            static_method(
                &ty,
                "op_Addition",
                vec![p("left", Ty::object()), p("right", ty.clone())],
                ty.clone(),
            ),
            static_method(
                &ty,
                "op_Equality",
                vec![p("left", ty.clone()), p("right", ty.clone())],
                Ty::bool(),
            ),
            static_method(
                &ty,
                "op_Inequality",
                vec![p("left", ty.clone()), p("right", ty.clone())],
                Ty::bool(),
            ),
            static_method(
                &ty,
                "Concat",
                vec![p("left", ty.clone()), p("right", ty.clone())],
                ty.clone(),
            ),
            static_method(
                &ty,
                "Concat",
                vec![ParamInfo::params("args", objects.clone())],
                ty.clone(),
            ),
            static_method(
                &ty,
                "Format",
                vec![p("format", ty.clone()), ParamInfo::params("args", objects)],
                ty.clone(),
            ),
            static_method(
                &ty,
                "Join",
                vec![
                    p("separator", ty.clone()),
                    ParamInfo::params("values", Ty::array(ty.clone())),
                ],
                ty.clone(),
            ),
            static_method(&ty, "IsNullOrEmpty", vec![p("value", ty.clone())], Ty::bool()),
            method(&ty, "Substring", vec![p("start", Ty::int32())], ty.clone()),
            method(
                &ty,
                "Substring",
                vec![p("start", Ty::int32()), p("length", Ty::int32())],
                ty.clone(),
            ),
            method(&ty, "ToUpper", vec![], ty.clone()),
            method(&ty, "ToLower", vec![], ty.clone()),
            method(&ty, "Trim", vec![], ty.clone()),
            method(&ty, "Contains", vec![p("value", ty.clone())], Ty::bool()),
            method(&ty, "StartsWith", vec![p("value", ty.clone())], Ty::bool()),
            method(&ty, "IndexOf", vec![p("value", Ty::char())], Ty::int32()),
            method(&ty, "IndexOf", vec![p("value", ty.clone())], Ty::int32()),
            method(
                &ty,
                "PadLeft",
                vec![ParamInfo::optional("width", Ty::int32(), Literal::Int32(0))],
                ty.clone(),
            ),
            method(
                &ty,
                "Split",
                vec![ParamInfo::params("separator", Ty::array(Ty::char()))],
                Ty::array(ty.clone()),
            ),
        ])
}

fn array() -> TypeDef {
    let ty = Ty::array(Ty::param("T"));
    TypeDef::class(ARRAY)
        .with_generics(&["T"])
        .with_interface(Ty::enumerable(Ty::param("T")))
        .with_default_member("Item")
        .with_members([
            Member::Property(PropertyInfo::new("Length", ty.clone(), Ty::int32())),
            Member::Property(PropertyInfo::indexer(
                "Item",
                ty.clone(),
                Ty::param("T"),
                vec![p("index", Ty::int32())],
            )),
        ])
}

fn delegate_param_names(arity: usize) -> Vec<String> {
    if arity == 1 {
        return vec!["T".to_string()];
    }
    (1..=arity).map(|i| format!("T{}", i)).collect()
}

fn func(arity: usize) -> TypeDef {
    let mut names = delegate_param_names(arity);
    let params = names.iter().map(Ty::param).collect();
    names.push("TResult".to_string());
    let generics: Vec<&str> = names.iter().map(String::as_str).collect();
    TypeDef::delegate(FUNC, params, Ty::param("TResult")).with_generics(&generics)
}

fn action(arity: usize) -> TypeDef {
    let names = delegate_param_names(arity);
    let params = names.iter().map(Ty::param).collect();
    let generics: Vec<&str> = names.iter().map(String::as_str).collect();
    TypeDef::delegate(ACTION, params, Ty::void()).with_generics(&generics)
}

fn enumerable_interface() -> TypeDef {
    TypeDef::interface(IENUMERABLE).with_generics(&["T"])
}

fn list() -> TypeDef {
    let t = Ty::param("T");
    let ty = Ty::list(t.clone());
    TypeDef::class(LIST)
        .with_generics(&["T"])
        .with_interface(Ty::enumerable(t.clone()))
        .with_default_member("Item")
        .with_members([
            Member::Constructor(ConstructorInfo::new(ty.clone(), vec![])),
            Member::Constructor(ConstructorInfo::new(
                ty.clone(),
                vec![p("collection", Ty::enumerable(t.clone()))],
            )),
            Member::Property(PropertyInfo::new("Count", ty.clone(), Ty::int32())),
            Member::Property(PropertyInfo::indexer(
                "Item",
                ty.clone(),
                t.clone(),
                vec![p("index", Ty::int32())],
            )),
            method(&ty, "Add", vec![p("item", t.clone())], Ty::void()),
            method(&ty, "Contains", vec![p("item", t.clone())], Ty::bool()),
            method(&ty, "Clear", vec![], Ty::void()),
            method(&ty, "ToArray", vec![], Ty::array(t)),
        ])
}

fn observable() -> TypeDef {
    let t = Ty::param("T");
    let ty = Ty::generic(IOBSERVABLE, vec![t.clone()]);
    TypeDef::interface(IOBSERVABLE)
        .with_generics(&["T"])
        .with_member(method(
            &ty,
            "Subscribe",
            vec![p("onNext", Ty::action(vec![t]))],
            Ty::object(),
        ))
}

fn expression() -> Vec<TypeDef> {
    let untyped = TypeDef::class(EXPRESSION).with_member(method(
        &Ty::expression(),
        "Reduce",
        vec![],
        Ty::expression(),
    ));
    let typed = TypeDef::class(EXPRESSION)
        .with_generics(&["TDelegate"])
        .with_base(Ty::expression());
    vec![untyped, typed]
}

fn extension(
    declaring: &Ty,
    name: &str,
    generics: &[&str],
    params: Vec<ParamInfo>,
    ret: Ty,
) -> Member {
    Member::Method(
        MethodInfo::new(name, declaring.clone(), params, ret)
            .with_generics(generics)
            .into_extension(),
    )
}

fn enumerable_class() -> TypeDef {
    let ty = Ty::named("Enumerable");
    let source = Ty::param("TSource");
    let seq = Ty::enumerable(source.clone());
    let this = |ty: Ty| p("source", ty);
    TypeDef::static_class("Enumerable").with_members([
        extension(
            &ty,
            "Select",
            &["TSource", "TResult"],
            vec![
                this(seq.clone()),
                p("selector", Ty::func(vec![source.clone()], Ty::param("TResult"))),
            ],
            Ty::enumerable(Ty::param("TResult")),
        ),
        extension(
            &ty,
            "Where",
            &["TSource"],
            vec![
                this(seq.clone()),
                p("predicate", Ty::func(vec![source.clone()], Ty::bool())),
            ],
            seq.clone(),
        ),
        extension(&ty, "Count", &["TSource"], vec![this(seq.clone())], Ty::int32()),
        extension(&ty, "First", &["TSource"], vec![this(seq.clone())], source.clone()),
        extension(
            &ty,
            "ToList",
            &["TSource"],
            vec![this(seq.clone())],
            Ty::list(source.clone()),
        ),
        extension(
            &ty,
            "Aggregate",
            &["TSource"],
            vec![
                this(seq.clone()),
                p(
                    "func",
                    Ty::func(vec![source.clone(), source.clone()], source.clone()),
                ),
            ],
            source,
        ),
        extension(
            &ty,
            "Sum",
            &[],
            vec![this(Ty::enumerable(Ty::int32()))],
            Ty::int32(),
        ),
        extension(
            &ty,
            "Sum",
            &[],
            vec![this(Ty::enumerable(Ty::double()))],
            Ty::double(),
        ),
        static_method(
            &ty,
            "Range",
            vec![p("start", Ty::int32()), p("count", Ty::int32())],
            Ty::enumerable(Ty::int32()),
        ),
    ])
}

fn math() -> TypeDef {
    let ty = Ty::named("Math");
    let unary = |name: &str, arg: Ty| static_method(&ty, name, vec![p("value", arg.clone())], arg);
    let binary = |name: &str, arg: Ty| {
        static_method(
            &ty,
            name,
            vec![p("val1", arg.clone()), p("val2", arg.clone())],
            arg,
        )
    };
    TypeDef::static_class("Math").with_members([
        unary("Abs", Ty::int32()),
        unary("Abs", Ty::int64()),
        unary("Abs", Ty::double()),
        unary("Abs", Ty::decimal()),
        binary("Max", Ty::int32()),
        binary("Max", Ty::int64()),
        binary("Max", Ty::double()),
        binary("Min", Ty::int32()),
        binary("Min", Ty::int64()),
        binary("Min", Ty::double()),
        unary("Sqrt", Ty::double()),
        static_method(
            &ty,
            "Pow",
            vec![p("x", Ty::double()), p("y", Ty::double())],
            Ty::double(),
        ),
        Member::Field(FieldInfo::constant("PI", ty.clone(), Literal::Double(std::f64::consts::PI))),
    ])
}

pub fn builtin_types() -> Vec<TypeDef> {
    let mut defs = vec![
        object(),
        TypeDef::structure(VOID),
        boolean(),
        char_type(),
        numeric(INT32, Literal::Int32(i32::MIN), Literal::Int32(i32::MAX), true),
        numeric(UINT32, Literal::UInt32(0), Literal::UInt32(u32::MAX), false),
        numeric(INT64, Literal::Int64(i64::MIN), Literal::Int64(i64::MAX), true),
        numeric(UINT64, Literal::UInt64(0), Literal::UInt64(u64::MAX), false),
        numeric(SINGLE, Literal::Single(f32::MIN), Literal::Single(f32::MAX), true),
        numeric(DOUBLE, Literal::Double(f64::MIN), Literal::Double(f64::MAX), true),
        numeric(
            DECIMAL,
            Literal::Decimal(BigDecimal::from(-DECIMAL_MAX)),
            Literal::Decimal(BigDecimal::from(DECIMAL_MAX)),
            true,
        ),
        string(),
        TypeDef::class(TYPE).with_member(Member::Property(PropertyInfo::new(
            "Name",
            Ty::named(TYPE),
            Ty::string(),
        ))),
        array(),
        enumerable_interface(),
        list(),
        observable(),
        enumerable_class(),
        math(),
        action(0),
    ];
    defs.extend(expression());
    defs.extend((0..=4).map(func));
    defs.extend((1..=3).map(action));
    defs
}
