use crate::ast::*;
use crate::span::Span;
use crate::symbols::{SymbolTable, WeakSymbolTable};
use crate::types::{Literal, Ty};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

pub type NodeId = u64;

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Reduction state of one node. Only the most recent expected type is kept.
#[derive(Default)]
pub struct ReduceCache {
    terminal: bool,
    entry: Option<CacheEntry>,
}

struct CacheEntry {
    expected: Option<Ty>,
    result: Cached,
}

/// Results that hold the node itself (conversions of terminal nodes) are
/// kept weakly so the entry never owns its own operand.
enum Cached {
    Strong(Node),
    Weak(Weak<NodeInner>),
}

impl Cached {
    fn get(&self) -> Option<Node> {
        match self {
            Cached::Strong(node) => Some(node.clone()),
            Cached::Weak(weak) => weak.upgrade().map(Node),
        }
    }
}

/// The symbol table a node was constructed in.
#[derive(Clone)]
enum Capture {
    Strong(SymbolTable),
    /// Held by a table that captures the node back.
    Weak(WeakSymbolTable),
}

struct NodeInner {
    id: NodeId,
    kind: NodeKind,
    span: Span,
    capture: Option<Capture>,
    cache: Mutex<ReduceCache>,
}

/// Shared handle to an expression node. Cloning is cheap; identity is the
/// allocation (see [`Node::ptr_eq`]).
#[derive(Clone)]
pub struct Node(Arc<NodeInner>);

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self::with_span(kind, Span::null())
    }

    pub fn with_span(kind: NodeKind, span: Span) -> Self {
        Self::build(kind, span, None)
    }

    /// Node carrying its construction-time symbol table.
    pub fn with_symbols(kind: NodeKind, span: Span, symbols: SymbolTable) -> Self {
        Self::build(kind, span, Some(Capture::Strong(symbols)))
    }

    /// A copy of this node whose captured table is only weakly referenced.
    ///
    /// Used when the node is bound inside the table it captured; the copy
    /// keeps the binding from owning its own scope.
    pub fn with_weak_capture(&self) -> Node {
        let capture = match &self.0.capture {
            Some(Capture::Strong(table)) => Some(Capture::Weak(table.downgrade())),
            other => other.clone(),
        };
        Self::build(self.kind().clone(), self.span(), capture)
    }

    fn build(kind: NodeKind, span: Span, capture: Option<Capture>) -> Self {
        let terminal = kind.is_terminal();
        Self(Arc::new(NodeInner {
            id: next_node_id(),
            kind,
            span,
            capture,
            cache: Mutex::new(ReduceCache {
                terminal,
                entry: None,
            }),
        }))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }
    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }
    pub fn span(&self) -> Span {
        self.0.span
    }
    /// The captured table, if any and still alive.
    pub fn symbols(&self) -> Option<SymbolTable> {
        match self.0.capture.as_ref()? {
            Capture::Strong(table) => Some(table.clone()),
            Capture::Weak(weak) => weak.upgrade(),
        }
    }

    /// Whether this node strongly holds `table` or one of its descendants.
    pub fn captures(&self, table: &SymbolTable) -> bool {
        match &self.0.capture {
            Some(Capture::Strong(captured)) => captured.is_within(table),
            _ => false,
        }
    }
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn cache(&self) -> MutexGuard<'_, ReduceCache> {
        match self.0.cache.lock() {
            Ok(guard) => guard,
            // Recover from a poisoned lock by taking the inner value
            Err(poison) => poison.into_inner(),
        }
    }

    /// False once the node is known to be in target form.
    pub fn can_reduce(&self) -> bool {
        !self.cache().terminal
    }

    pub fn mark_terminal(&self) {
        self.cache().terminal = true;
    }

    /// Cached result for exactly this expected type.
    pub fn cached(&self, expected: Option<&Ty>) -> Option<Node> {
        let cache = self.cache();
        let entry = cache.entry.as_ref()?;
        if entry.expected.as_ref() != expected {
            return None;
        }
        entry.result.get()
    }

    /// Replaces the cache entry; a different expected type evicts the old one.
    pub fn store(&self, expected: Option<&Ty>, result: &Node) {
        if result.ptr_eq(self) {
            return;
        }
        self.cache().entry = Some(CacheEntry {
            expected: expected.cloned(),
            result: Cached::Strong(result.clone()),
        });
    }

    /// Like [`Node::store`], for results that reference this node. The entry
    /// lives as long as some caller still holds the result.
    pub fn store_weak(&self, expected: Option<&Ty>, result: &Node) {
        if result.ptr_eq(self) {
            return;
        }
        self.cache().entry = Some(CacheEntry {
            expected: expected.cloned(),
            result: Cached::Weak(Arc::downgrade(&result.0)),
        });
    }

    /// Purges this node's and all descendants' reduction caches.
    pub fn clear_cache(&self) {
        {
            let mut cache = self.cache();
            cache.entry = None;
            cache.terminal = self.kind().is_terminal();
        }
        for child in self.children() {
            child.clear_cache();
        }
    }

    /// Static type of typed nodes; `None` for untyped syntax.
    pub fn ty(&self) -> Option<Ty> {
        match self.kind() {
            NodeKind::Constant(constant) => Some(constant.ty.clone()),
            NodeKind::Parameter(param) => Some(param.ty.clone()),
            NodeKind::Call(call) => Some(call.method.ret.clone()),
            NodeKind::Field(access) => Some(access.field.ty.clone()),
            NodeKind::Property(access) => Some(access.property.ty.clone()),
            NodeKind::New(new) => Some(new.ctor.declaring.clone()),
            NodeKind::NewArray(array) => Some(Ty::array(array.elem.clone())),
            NodeKind::Lambda(lambda) => Some(lambda.ty.clone()),
            NodeKind::Invoke(invoke) => Some(invoke.ty.clone()),
            NodeKind::Convert(convert) => Some(convert.ty.clone()),
            NodeKind::Default(ty) => Some(ty.clone()),
            NodeKind::Block(block) => Some(block.ty.clone()),
            NodeKind::Conditional(cond) => Some(cond.ty.clone()),
            NodeKind::Quote(lambda) => Some(Ty::generic(
                crate::types::well_known::EXPRESSION,
                lambda.ty().into_iter().collect(),
            )),
            NodeKind::EventSubscription(sub) => Some(sub.ty.clone()),
            NodeKind::AmbiguousParameter(param) => param.ty.clone().filter(|ty| !ty.is_open()),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<Node> {
        match self.kind() {
            NodeKind::List(items) | NodeKind::Vector(items) | NodeKind::LambdaList(items) => {
                items.clone()
            }
            NodeKind::Dispatch(dispatch) => dispatch
                .left
                .iter()
                .chain(dispatch.args.iter())
                .cloned()
                .collect(),
            NodeKind::AmbiguousLambda(lambda) => {
                lambda.params.iter().chain(lambda.body.iter()).cloned().collect()
            }
            NodeKind::Macro(mac) => {
                let mut children = mac.params.clone();
                children.push(mac.body.clone());
                children
            }
            NodeKind::Quoted(inner) | NodeKind::Quote(inner) => vec![inner.clone()],
            NodeKind::Call(call) => call.instance.iter().chain(call.args.iter()).cloned().collect(),
            NodeKind::Field(access) => access.instance.iter().cloned().collect(),
            NodeKind::Property(access) => access
                .instance
                .iter()
                .chain(access.args.iter())
                .cloned()
                .collect(),
            NodeKind::New(new) => new.args.clone(),
            NodeKind::NewArray(array) => array.elements.clone(),
            NodeKind::Lambda(lambda) => {
                let mut children = lambda.params.clone();
                children.push(lambda.body.clone());
                children
            }
            NodeKind::Invoke(invoke) => std::iter::once(&invoke.target)
                .chain(invoke.args.iter())
                .cloned()
                .collect(),
            NodeKind::Convert(convert) => vec![convert.operand.clone()],
            NodeKind::Block(block) => block.exprs.clone(),
            NodeKind::Conditional(cond) => {
                vec![cond.test.clone(), cond.then.clone(), cond.otherwise.clone()]
            }
            NodeKind::EventSubscription(sub) => sub.instance.iter().cloned().collect(),
            _ => vec![],
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self.kind() {
            NodeKind::Identifier(ident) => Some(&ident.name),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[Node]> {
        match self.kind() {
            NodeKind::List(items) => Some(items),
            _ => None,
        }
    }
    pub fn as_type_candidate(&self) -> Option<&TypeCandidate> {
        match self.kind() {
            NodeKind::TypeCandidate(candidate) => Some(candidate),
            _ => None,
        }
    }
    pub fn as_macro(&self) -> Option<&MacroNode> {
        match self.kind() {
            NodeKind::Macro(mac) => Some(mac),
            _ => None,
        }
    }
    pub fn as_dispatch(&self) -> Option<&DispatchNode> {
        match self.kind() {
            NodeKind::Dispatch(dispatch) => Some(dispatch),
            _ => None,
        }
    }
    pub fn as_ambiguous_parameter(&self) -> Option<&AmbiguousParameter> {
        match self.kind() {
            NodeKind::AmbiguousParameter(param) => Some(param),
            _ => None,
        }
    }
    /// The expression carried by an expression-valued constant.
    pub fn as_quoted_expr(&self) -> Option<&Node> {
        match self.kind() {
            NodeKind::Constant(Constant {
                value: ConstValue::Expr(expr),
                ..
            }) => Some(expr),
            _ => None,
        }
    }
    pub fn is_ignored(&self) -> bool {
        matches!(self.kind(), NodeKind::Ignored)
    }
    /// Lambda-shaped syntax whose parameter types may still be unknown.
    pub fn is_ambiguous_lambda(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::AmbiguousLambda(_) | NodeKind::LambdaList(_)
        )
    }

    /// `(: name value)` pairs inside call argument lists.
    pub fn as_named_argument(&self) -> Option<(&str, &Node)> {
        match self.as_list()? {
            [colon, name, value] if colon.as_identifier() == Some(":") => {
                Some((name.as_identifier()?, value))
            }
            _ => None,
        }
    }
}

impl NodeKind {
    /// Kinds that are already in target form, or only usable indirectly.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            NodeKind::Identifier(_)
                | NodeKind::List(_)
                | NodeKind::Vector(_)
                | NodeKind::Dispatch(_)
                | NodeKind::AmbiguousLambda(_)
                | NodeKind::AmbiguousParameter(_)
                | NodeKind::LambdaList(_)
                | NodeKind::Quoted(_)
                | NodeKind::Number(_)
                | NodeKind::Text(_)
                | NodeKind::Serialized(_)
        )
    }
}

// Factories
impl Node {
    pub fn identifier(name: impl Into<String>) -> Node {
        Node::new(NodeKind::Identifier(Identifier { name: name.into() }))
    }
    pub fn list(items: Vec<Node>) -> Node {
        Node::new(NodeKind::List(items))
    }
    pub fn vector(items: Vec<Node>) -> Node {
        Node::new(NodeKind::Vector(items))
    }
    pub fn lambda_list(items: Vec<Node>) -> Node {
        Node::new(NodeKind::LambdaList(items))
    }
    pub fn number(text: impl Into<String>) -> Node {
        Node::new(NodeKind::Number(NumberLiteral { text: text.into() }))
    }
    pub fn text(value: impl Into<String>) -> Node {
        Node::new(NodeKind::Text(value.into()))
    }
    pub fn quoted(inner: Node) -> Node {
        Node::new(NodeKind::Quoted(inner))
    }
    pub fn ignored() -> Node {
        Node::new(NodeKind::Ignored)
    }
    pub fn serialized(value: serde_json::Value) -> Node {
        Node::new(NodeKind::Serialized(value))
    }
    pub fn type_candidate(types: Vec<Ty>) -> Node {
        Node::new(NodeKind::TypeCandidate(TypeCandidate::new(types)))
    }
    pub fn dispatch(
        kind: DispatchKind,
        left: Option<Node>,
        name: Option<String>,
        type_args: Vec<Ty>,
        args: Vec<Node>,
    ) -> Node {
        Node::new(NodeKind::Dispatch(DispatchNode {
            kind,
            left,
            name,
            type_args,
            args,
        }))
    }
    pub fn ambiguous_parameter(name: Option<String>, ty: Option<Ty>) -> Node {
        Node::new(NodeKind::AmbiguousParameter(AmbiguousParameter { name, ty }))
    }
    pub fn ambiguous_lambda(params: Vec<Node>, body: Vec<Node>) -> Node {
        Node::new(NodeKind::AmbiguousLambda(AmbiguousLambda { params, body }))
    }
    pub fn macro_node(params: Vec<Node>, body: Node) -> Node {
        Node::new(NodeKind::Macro(MacroNode { params, body }))
    }

    pub fn constant(literal: Literal) -> Node {
        let ty = literal.ty();
        Node::new(NodeKind::Constant(Constant {
            value: literal.into(),
            ty,
        }))
    }
    /// Constant of an explicit type, e.g. `null` typed as `String`.
    pub fn typed_constant(literal: Literal, ty: Ty) -> Node {
        Node::new(NodeKind::Constant(Constant {
            value: literal.into(),
            ty,
        }))
    }
    pub fn expr_constant(expr: Node) -> Node {
        Node::new(NodeKind::Constant(Constant {
            value: expr.into(),
            ty: Ty::expression(),
        }))
    }
    pub fn parameter(name: impl Into<String>, ty: Ty) -> Node {
        Node::new(NodeKind::Parameter(Parameter {
            name: name.into(),
            ty,
        }))
    }
    pub fn convert(operand: Node, ty: Ty, explicit: bool) -> Node {
        Node::new(NodeKind::Convert(Convert {
            operand,
            ty,
            explicit,
        }))
    }
    pub fn default_value(ty: Ty) -> Node {
        Node::new(NodeKind::Default(ty))
    }
    /// The empty expression.
    pub fn void() -> Node {
        Node::default_value(Ty::void())
    }
    pub fn block(exprs: Vec<Node>) -> Node {
        let ty = exprs.last().and_then(Node::ty).unwrap_or_else(Ty::void);
        Node::new(NodeKind::Block(Block { exprs, ty }))
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {:?}", self.id(), self.kind())
    }
}
