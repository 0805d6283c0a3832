use crate::ast::{Node, NodeKind};
use crate::error::Result;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};

/// Serializable mirror of the raw parse-tree forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SyntaxTree {
    Identifier(String),
    Number(String),
    Text(String),
    List(Vec<SyntaxTree>),
    Vector(Vec<SyntaxTree>),
    LambdaList(Vec<SyntaxTree>),
    Quoted(Box<SyntaxTree>),
}

impl SyntaxTree {
    pub fn to_node(&self) -> Node {
        let nodes = |items: &[SyntaxTree]| items.iter().map(SyntaxTree::to_node).collect();
        match self {
            SyntaxTree::Identifier(name) => Node::identifier(name.clone()),
            SyntaxTree::Number(text) => Node::number(text.clone()),
            SyntaxTree::Text(text) => Node::text(text.clone()),
            SyntaxTree::List(items) => Node::list(nodes(items)),
            SyntaxTree::Vector(items) => Node::vector(nodes(items)),
            SyntaxTree::LambdaList(items) => Node::lambda_list(nodes(items)),
            SyntaxTree::Quoted(inner) => Node::quoted(inner.to_node()),
        }
    }

    /// Fails for nodes that are not raw syntax (typed or synthesized forms).
    pub fn from_node(node: &Node) -> Result<SyntaxTree> {
        let items = |nodes: &[Node]| {
            nodes
                .iter()
                .map(SyntaxTree::from_node)
                .collect::<Result<Vec<_>>>()
        };
        Ok(match node.kind() {
            NodeKind::Identifier(ident) => SyntaxTree::Identifier(ident.name.clone()),
            NodeKind::Number(number) => SyntaxTree::Number(number.text.clone()),
            NodeKind::Text(text) => SyntaxTree::Text(text.clone()),
            NodeKind::List(nodes) => SyntaxTree::List(items(nodes)?),
            NodeKind::Vector(nodes) => SyntaxTree::Vector(items(nodes)?),
            NodeKind::LambdaList(nodes) => SyntaxTree::LambdaList(items(nodes)?),
            NodeKind::Quoted(inner) => SyntaxTree::Quoted(Box::new(SyntaxTree::from_node(inner)?)),
            NodeKind::Serialized(value) => serde_json::from_value(value.clone())?,
            _ => crate::bail!("cannot serialize non-syntax node {}", node),
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<SyntaxTree> {
        Ok(serde_json::from_value(value).wrap_err("malformed serialized syntax")?)
    }
}
