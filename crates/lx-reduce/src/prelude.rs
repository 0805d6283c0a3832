//! The default symbol environment: builtin type names, operators, special
//! forms and literals.

use crate::macro_eval::eval_expression;
use crate::reduce::{coerce, fits, reduce};
use crate::vector::common_type;
use lx_core::ast::{AmbiguousLambda, Conditional, DispatchNode, Node, NodeKind};
use lx_core::error::Error;
use lx_core::types::well_known::ARRAY;
use lx_core::types::{Literal, Ty};
use lx_core::{DispatchKind, ReduceConfig, Result, SymbolTable};
use lx_typing::TypeRegistry;
use std::sync::{Arc, OnceLock};

/// `(symbol, binary method, unary method)`
const OPERATORS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("+", Some("op_Addition"), None),
    ("-", Some("op_Subtraction"), Some("op_UnaryNegation")),
    ("*", Some("op_Multiply"), None),
    ("/", Some("op_Division"), None),
    ("%", Some("op_Modulus"), None),
    ("==", Some("op_Equality"), None),
    ("!=", Some("op_Inequality"), None),
    ("<", Some("op_LessThan"), None),
    (">", Some("op_GreaterThan"), None),
    ("<=", Some("op_LessThanOrEqual"), None),
    (">=", Some("op_GreaterThanOrEqual"), None),
    ("!", None, Some("op_LogicalNot")),
];

/// Builtin registry shared by every default environment.
pub fn builtin_registry() -> Arc<TypeRegistry> {
    static REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Arc::new(TypeRegistry::with_builtins()))
        .clone()
}

/// A root environment over the builtin types, configured from the environment.
pub fn default_symbols() -> SymbolTable {
    symbols_for(builtin_registry(), ReduceConfig::from_env())
}

/// A root environment over `registry`: every registered type name is bound,
/// so register user types before calling this.
pub fn symbols_for(registry: Arc<TypeRegistry>, config: ReduceConfig) -> SymbolTable {
    let symbols = SymbolTable::new(registry.clone(), config);
    bind_types(&symbols, &registry);
    symbols.add_literal("true", Node::constant(Literal::Bool(true)));
    symbols.add_literal("false", Node::constant(Literal::Bool(false)));
    symbols.add_literal("null", Node::constant(Literal::Null));
    for &(symbol, binary, unary) in OPERATORS {
        bind_operator(&symbols, symbol, binary, unary);
    }
    bind_access_forms(&symbols);
    bind_lambda_forms(&symbols);
    bind_control_forms(&symbols);
    lx_core::debug!("prelude bound {} symbols", symbols.local_len());
    symbols
}

/// Binds each type name to a type candidate over every arity defined.
pub fn bind_types(symbols: &SymbolTable, registry: &TypeRegistry) {
    for name in registry.type_names() {
        let types = registry
            .lookup_by_name(&name)
            .iter()
            .map(|def| match def.name.as_str() {
                ARRAY => Ty::array(Ty::param("T")),
                _ => def.self_ty(),
            })
            .collect();
        symbols.add_literal(name, Node::type_candidate(types));
    }
}

fn call_args(node: &Node) -> Result<&[Node]> {
    node.as_dispatch()
        .map(|dispatch| dispatch.args.as_slice())
        .ok_or_else(|| Error::UnsupportedDispatchShape(node.to_string()))
}

fn shape(node: &Node, form: &str) -> Error {
    Error::UnsupportedDispatchShape(format!("expected {}, found {}", form, node))
}

fn dispatch(
    site: &Node,
    kind: DispatchKind,
    left: Node,
    name: Option<String>,
    type_args: Vec<Ty>,
    args: Vec<Node>,
) -> Node {
    Node::with_span(
        NodeKind::Dispatch(DispatchNode {
            kind,
            left: Some(left),
            name,
            type_args,
            args,
        }),
        site.span(),
    )
}

/// The type a form denotes.
fn type_of(node: &Node, symbols: &SymbolTable) -> Result<Ty> {
    let value = reduce(node, symbols, None)?;
    value
        .as_type_candidate()
        .and_then(|candidate| candidate.elected())
        .cloned()
        .ok_or_else(|| Error::unreducible(format!("{} as a type", node), Some(node.span())))
}

/// Operators dispatch to the static operator methods of their operand types.
fn bind_operator(
    symbols: &SymbolTable,
    symbol: &'static str,
    binary: Option<&'static str>,
    unary: Option<&'static str>,
) {
    symbols.add_function(symbol, DispatchKind::METHOD, move |node, symbols, _| {
        let args = call_args(node)?;
        let method = match (args.len(), unary, binary) {
            (1, Some(method), _) | (2, _, Some(method)) => method,
            _ => return Err(Error::dispatch_failed(node.to_string(), Some(node.span()))),
        };
        let operands = args
            .iter()
            .map(|arg| reduce(arg, symbols, None))
            .collect::<Result<Vec<_>>>()?;
        let mut types: Vec<Ty> = vec![];
        for operand in &operands {
            let Some(ty) = operand.ty() else {
                return Err(Error::unreducible(operand.to_string(), Some(node.span())));
            };
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        Ok(Some(dispatch(
            node,
            DispatchKind::METHOD,
            Node::type_candidate(types),
            Some(method.to_string()),
            vec![],
            operands,
        )))
    });
}

fn bind_access_forms(symbols: &SymbolTable) {
    // (. receiver name args...), name may be (of Name T...)
    symbols.add_function(".", DispatchKind::METHOD, |node, symbols, _| {
        let [receiver, name, rest @ ..] = call_args(node)? else {
            return Err(shape(node, "(. receiver name args...)"));
        };
        let left = reduce(receiver, symbols, None)?;
        let (name, type_args) = match (name.as_identifier(), name.as_list()) {
            (Some(name), _) => (name.to_string(), vec![]),
            (None, Some([of, method, args @ ..])) if of.as_identifier() == Some("of") => {
                let Some(method) = method.as_identifier() else {
                    return Err(shape(name, "a member name"));
                };
                let args = args
                    .iter()
                    .map(|arg| type_of(arg, symbols))
                    .collect::<Result<Vec<_>>>()?;
                (method.to_string(), args)
            }
            _ => return Err(shape(name, "a member name")),
        };
        let kind = if rest.is_empty() {
            DispatchKind::MEMBER | DispatchKind::METHOD
        } else {
            DispatchKind::METHOD
        };
        Ok(Some(dispatch(node, kind, left, Some(name), type_args, rest.to_vec())))
    });

    symbols.add_function("new", DispatchKind::METHOD, |node, symbols, _| {
        let [ty, args @ ..] = call_args(node)? else {
            return Err(shape(node, "(new Type args...)"));
        };
        let left = reduce(ty, symbols, None)?;
        if left.as_type_candidate().is_none() {
            return Err(shape(ty, "a type"));
        }
        Ok(Some(dispatch(
            node,
            DispatchKind::CONSTRUCTOR,
            left,
            None,
            vec![],
            args.to_vec(),
        )))
    });

    symbols.add_function("index", DispatchKind::METHOD, |node, symbols, _| {
        let [receiver, args @ ..] = call_args(node)? else {
            return Err(shape(node, "(index receiver args...)"));
        };
        let left = reduce(receiver, symbols, None)?;
        Ok(Some(dispatch(
            node,
            DispatchKind::MEMBER,
            left,
            None,
            vec![],
            args.to_vec(),
        )))
    });

    symbols.add_function("of", DispatchKind::METHOD, |node, symbols, _| {
        let [generic, args @ ..] = call_args(node)? else {
            return Err(shape(node, "(of Type args...)"));
        };
        let base = reduce(generic, symbols, None)?;
        let Some(candidate) = base.as_type_candidate() else {
            return Err(shape(generic, "a generic type"));
        };
        let args = args
            .iter()
            .map(|arg| type_of(arg, symbols))
            .collect::<Result<Vec<_>>>()?;
        let Some(definition) = candidate
            .types
            .iter()
            .find(|ty| ty.type_args().len() == args.len())
        else {
            return Err(Error::dispatch_failed(node.to_string(), Some(node.span())));
        };
        let closed = match (definition, args.as_slice()) {
            (Ty::Array(_), [elem]) => Ty::array(elem.clone()),
            _ => Ty::generic(definition.name(), args),
        };
        Ok(Some(Node::type_candidate(vec![closed])))
    });

    symbols.add_function(":", DispatchKind::METHOD, |node, _, _| {
        Err(Error::UnsupportedDispatchShape(format!(
            "named argument outside a call: {}",
            node
        )))
    });
}

fn bind_lambda_forms(symbols: &SymbolTable) {
    // (fn (x (y Type)) body...)
    symbols.add_function("fn", DispatchKind::METHOD, |node, symbols, _| {
        let [params, body @ ..] = call_args(node)? else {
            return Err(shape(node, "(fn (params...) body...)"));
        };
        let Some(params) = params.as_list() else {
            return Err(shape(params, "a parameter list"));
        };
        let params = params
            .iter()
            .map(|param| match (param.as_identifier(), param.as_list()) {
                (Some(name), _) => Ok(Node::ambiguous_parameter(Some(name.to_string()), None)),
                (None, Some([name, ty])) if name.as_identifier().is_some() => Ok(
                    Node::ambiguous_parameter(
                        name.as_identifier().map(str::to_string),
                        Some(type_of(ty, symbols)?),
                    ),
                ),
                _ => Err(shape(param, "a parameter")),
            })
            .collect::<Result<Vec<_>>>()?;
        let lambda = NodeKind::AmbiguousLambda(AmbiguousLambda {
            params,
            body: body.to_vec(),
        });
        Ok(Some(Node::with_symbols(lambda, node.span(), symbols.clone())))
    });

    // (macro (params...) body)
    symbols.add_function("macro", DispatchKind::METHOD, |node, _, _| {
        let [params, body] = call_args(node)? else {
            return Err(shape(node, "(macro (params...) body)"));
        };
        let Some(params) = params.as_list() else {
            return Err(shape(params, "a parameter list"));
        };
        let params = params
            .iter()
            .map(|param| match param.as_identifier() {
                Some(name) => Ok(Node::ambiguous_parameter(
                    Some(name.to_string()),
                    Some(Ty::expression()),
                )),
                None => Err(shape(param, "a parameter name")),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Node::macro_node(params, body.clone())))
    });

    symbols.add_function("quote", DispatchKind::METHOD, |node, _, _| {
        let [inner] = call_args(node)? else {
            return Err(shape(node, "(quote form)"));
        };
        Ok(Some(Node::quoted(inner.clone())))
    });

    symbols.add_function("eval", DispatchKind::METHOD, |node, symbols, expected| {
        let [inner] = call_args(node)? else {
            return Err(shape(node, "(eval form)"));
        };
        let value = reduce(inner, symbols, None)?;
        Ok(Some(eval_expression(&value, symbols, expected)?))
    });

    // (syntax parts...): a list assembled from quoted parts and values
    symbols.add_function("syntax", DispatchKind::METHOD, |node, symbols, _| {
        let mut parts = vec![];
        for part in call_args(node)? {
            let value = reduce(part, symbols, None)?;
            parts.push(value.as_quoted_expr().cloned().unwrap_or(value));
        }
        Ok(Some(Node::expr_constant(Node::list(parts))))
    });
}

fn bind_control_forms(symbols: &SymbolTable) {
    symbols.add_function("if", DispatchKind::METHOD, |node, symbols, expected| {
        let (test, then, otherwise) = match call_args(node)? {
            [test, then] => (test, then, None),
            [test, then, otherwise] => (test, then, Some(otherwise)),
            _ => return Err(shape(node, "(if test then else)")),
        };
        let boolean = Ty::bool();
        let test = reduce(test, symbols, Some(&boolean))?;
        if !fits(&test, symbols, &boolean) {
            return Err(Error::dispatch_failed(
                format!("condition {} of {}", test, node),
                Some(node.span()),
            ));
        }
        let then = reduce(then, symbols, expected)?;
        let otherwise = match otherwise {
            Some(otherwise) => reduce(otherwise, symbols, expected)?,
            None => Node::default_value(then.ty().unwrap_or_else(Ty::void)),
        };
        let ty = match (expected, then.ty(), otherwise.ty()) {
            (Some(ty), _, _) if !ty.is_open() => ty.clone(),
            (_, Some(a), Some(b)) if a == b => a,
            (_, Some(a), Some(b)) => common_type(symbols.oracle(), &[a, b]),
            _ => return Err(Error::unreducible(node.to_string(), Some(node.span()))),
        };
        Ok(Some(Node::with_span(
            NodeKind::Conditional(Conditional {
                test,
                then: coerce(&then, symbols, Some(&ty)),
                otherwise: coerce(&otherwise, symbols, Some(&ty)),
                ty,
            }),
            node.span(),
        )))
    });

    symbols.add_function("do", DispatchKind::METHOD, |node, symbols, expected| {
        Ok(Some(sequence(call_args(node)?, symbols, expected)?))
    });

    // (let (name value ...) body...)
    symbols.add_function("let", DispatchKind::METHOD, |node, symbols, expected| {
        let [bindings, body @ ..] = call_args(node)? else {
            return Err(shape(node, "(let (name value ...) body...)"));
        };
        let Some(bindings) = bindings.as_list().filter(|items| items.len() % 2 == 0) else {
            return Err(shape(bindings, "name/value pairs"));
        };
        let scope = symbols.child();
        for pair in bindings.chunks(2) {
            let Some(name) = pair[0].as_identifier() else {
                return Err(shape(&pair[0], "a name"));
            };
            let value = reduce(&pair[1], &scope, None)?;
            scope.add_literal(name, value);
        }
        Ok(Some(sequence(body, &scope, expected)?))
    });
}

/// Reduces `exprs` in order; the last one toward `expected`.
fn sequence(exprs: &[Node], symbols: &SymbolTable, expected: Option<&Ty>) -> Result<Node> {
    let exprs: Vec<&Node> = exprs.iter().filter(|expr| !expr.is_ignored()).collect();
    let mut reduced = vec![];
    for (i, expr) in exprs.iter().enumerate() {
        let last = i + 1 == exprs.len();
        reduced.push(reduce(expr, symbols, if last { expected } else { None })?);
    }
    Ok(match reduced.len() {
        0 => Node::void(),
        1 => reduced.remove(0),
        _ => Node::block(reduced),
    })
}
