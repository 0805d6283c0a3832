//! S-expression rendering of nodes, used in diagnostics and tests.

use crate::ast::*;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

fn join(nodes: &[Node]) -> String {
    nodes.iter().join(" ")
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            NodeKind::Identifier(ident) => f.write_str(&ident.name),
            NodeKind::List(items) => write!(f, "({})", join(items)),
            NodeKind::Vector(items) => write!(f, "[{}]", join(items)),
            NodeKind::LambdaList(items) => write!(f, "#({})", join(items)),
            NodeKind::Dispatch(dispatch) => {
                let kind = if dispatch.kind.contains(DispatchKind::CONSTRUCTOR) {
                    "new"
                } else if dispatch.kind.contains(DispatchKind::METHOD) {
                    "call"
                } else {
                    "member"
                };
                write!(f, "({}", kind)?;
                if let Some(left) = &dispatch.left {
                    write!(f, " {}", left)?;
                }
                if let Some(name) = &dispatch.name {
                    write!(f, " {}", name)?;
                }
                if !dispatch.type_args.is_empty() {
                    write!(f, "<{}>", dispatch.type_args.iter().join(", "))?;
                }
                for arg in &dispatch.args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
            NodeKind::AmbiguousLambda(lambda) => {
                write!(f, "(fn ({}) {})", join(&lambda.params), join(&lambda.body))
            }
            NodeKind::AmbiguousParameter(param) => {
                let name = param.name.as_deref().unwrap_or("_");
                match &param.ty {
                    Some(ty) => write!(f, "({} {})", name, ty),
                    None => f.write_str(name),
                }
            }
            NodeKind::Macro(mac) => write!(f, "(macro ({}) {})", join(&mac.params), mac.body),
            NodeKind::Quoted(inner) => write!(f, "'{}", inner),
            NodeKind::TypeCandidate(candidate) => {
                write!(f, "{{{}}}", candidate.types.iter().join(" | "))
            }
            NodeKind::Number(number) => f.write_str(&number.text),
            NodeKind::Text(text) => write!(f, "{:?}", text),
            NodeKind::Ignored => f.write_str("_"),
            NodeKind::Serialized(_) => f.write_str("<serialized>"),
            NodeKind::Constant(constant) => match &constant.value {
                ConstValue::Literal(literal) => write!(f, "{}", literal),
                ConstValue::Expr(expr) => write!(f, "'{}", expr),
                ConstValue::Type(ty) => write!(f, "typeof({})", ty),
            },
            NodeKind::Parameter(param) => write!(f, "{}", param.name),
            NodeKind::Call(call) => {
                write!(f, "({}", call.method)?;
                if let Some(instance) = &call.instance {
                    write!(f, " {}", instance)?;
                }
                for arg in &call.args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
            NodeKind::Field(access) => match &access.instance {
                Some(instance) => write!(f, "{}.{}", instance, access.field.name),
                None => write!(f, "{}.{}", access.field.declaring, access.field.name),
            },
            NodeKind::Property(access) => {
                match &access.instance {
                    Some(instance) => write!(f, "{}.{}", instance, access.property.name)?,
                    None => write!(f, "{}.{}", access.property.declaring, access.property.name)?,
                }
                if !access.args.is_empty() {
                    write!(f, "[{}]", access.args.iter().join(", "))?;
                }
                Ok(())
            }
            NodeKind::New(new) => write!(f, "(new {} {})", new.ctor.declaring, join(&new.args)),
            NodeKind::NewArray(array) => write!(f, "{}[{}]", array.elem, join(&array.elements)),
            NodeKind::Lambda(lambda) => {
                let params = lambda
                    .params
                    .iter()
                    .map(|p| match p.ty() {
                        Some(ty) => format!("({} {})", p, ty),
                        None => p.to_string(),
                    })
                    .join(" ");
                write!(f, "(lambda ({}) {})", params, lambda.body)
            }
            NodeKind::Invoke(invoke) => {
                write!(f, "(invoke {} {})", invoke.target, join(&invoke.args))
            }
            NodeKind::Convert(convert) => {
                let op = if convert.explicit { "cast" } else { "convert" };
                write!(f, "({} {} {})", op, convert.ty, convert.operand)
            }
            NodeKind::Default(ty) => write!(f, "default({})", ty),
            NodeKind::Block(block) => write!(f, "(do {})", join(&block.exprs)),
            NodeKind::Conditional(cond) => {
                write!(f, "(if {} {} {})", cond.test, cond.then, cond.otherwise)
            }
            NodeKind::Quote(lambda) => write!(f, "(quote {})", lambda),
            NodeKind::EventSubscription(sub) => match &sub.instance {
                Some(instance) => write!(f, "(observe {}.{})", instance, sub.event.name),
                None => write!(f, "(observe {}.{})", sub.event.declaring, sub.event.name),
            },
        }
    }
}
