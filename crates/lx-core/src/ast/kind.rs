use crate::ast::Node;
use derive_more::From;
use crate::types::{
    ConstructorInfo, EventInfo, FieldInfo, Literal, MethodInfo, PropertyInfo, Ty,
};

bitflags::bitflags! {
    /// What a dispatch site (or a symbol) can resolve to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DispatchKind: u8 {
        const MEMBER      = 1 << 0;
        const METHOD      = 1 << 1;
        const CONSTRUCTOR = 1 << 2;
    }
}

/// Every node variant: the untyped syntax forms produced by the reader and the
/// conventional typed forms reduction ends in.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Identifier(Identifier),
    List(Vec<Node>),
    Vector(Vec<Node>),
    Dispatch(DispatchNode),
    AmbiguousLambda(AmbiguousLambda),
    AmbiguousParameter(AmbiguousParameter),
    /// `#(...)` sugar with implicit `$0`, `$1`, ... parameters.
    LambdaList(Vec<Node>),
    Macro(MacroNode),
    Quoted(Node),
    TypeCandidate(TypeCandidate),
    Number(NumberLiteral),
    Text(String),
    Ignored,
    Serialized(serde_json::Value),

    Constant(Constant),
    Parameter(Parameter),
    Call(Call),
    Field(FieldAccess),
    Property(PropertyAccess),
    New(NewObject),
    NewArray(NewArray),
    Lambda(Lambda),
    Invoke(Invoke),
    Convert(Convert),
    Default(Ty),
    Block(Block),
    Conditional(Conditional),
    /// A typed lambda kept as an expression tree.
    Quote(Node),
    EventSubscription(EventSubscription),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DispatchNode {
    pub kind: DispatchKind,
    /// Receiver value, or a type candidate for static references.
    pub left: Option<Node>,
    pub name: Option<String>,
    pub type_args: Vec<Ty>,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct AmbiguousLambda {
    /// `AmbiguousParameter` nodes.
    pub params: Vec<Node>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousParameter {
    pub name: Option<String>,
    pub ty: Option<Ty>,
}

impl AmbiguousParameter {
    /// Unfixed while the type is unknown or still open.
    pub fn is_fixed(&self) -> bool {
        matches!(&self.ty, Some(ty) if !ty.is_open())
    }
}

#[derive(Debug, Clone)]
pub struct MacroNode {
    /// `AmbiguousParameter` nodes, all expression-valued.
    pub params: Vec<Node>,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCandidate {
    pub types: Vec<Ty>,
}

impl TypeCandidate {
    pub fn new(types: Vec<Ty>) -> Self {
        Self { types }
    }

    /// The single candidate, or the only non-generic one.
    pub fn elected(&self) -> Option<&Ty> {
        if self.types.len() == 1 {
            return self.types.first();
        }
        let mut closed = self.types.iter().filter(|ty| !ty.is_open());
        match (closed.next(), closed.next()) {
            (Some(ty), None) => Some(ty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, From)]
pub enum ConstValue {
    Literal(Literal),
    /// An unreduced expression held as data.
    Expr(Node),
    Type(Ty),
}

#[derive(Debug, Clone)]
pub struct Constant {
    pub value: ConstValue,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: MethodInfo,
    pub instance: Option<Node>,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct FieldAccess {
    pub instance: Option<Node>,
    pub field: FieldInfo,
}

#[derive(Debug, Clone)]
pub struct PropertyAccess {
    pub instance: Option<Node>,
    pub property: PropertyInfo,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct NewObject {
    pub ctor: ConstructorInfo,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct NewArray {
    pub elem: Ty,
    pub elements: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    /// `Parameter` nodes.
    pub params: Vec<Node>,
    pub body: Node,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct Invoke {
    pub target: Node,
    pub args: Vec<Node>,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct Convert {
    pub operand: Node,
    pub ty: Ty,
    pub explicit: bool,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub exprs: Vec<Node>,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub test: Node,
    pub then: Node,
    pub otherwise: Node,
    pub ty: Ty,
}

/// Wraps an event's add/remove accessors as an observable sequence.
#[derive(Debug, Clone)]
pub struct EventSubscription {
    pub instance: Option<Node>,
    pub event: EventInfo,
    pub ty: Ty,
}
