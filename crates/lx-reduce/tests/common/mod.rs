#![allow(dead_code)]

use lx_core::ast::NodeKind;
use lx_core::types::TypeDef;
use lx_core::{Node, ReduceConfig, Result, SymbolTable};
use lx_reduce::{default_symbols, reduce, symbols_for};
use lx_typing::TypeRegistry;
use std::sync::Arc;

/// Installs a test subscriber honouring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(filter)
        .try_init();
}

pub fn eval(source: &str) -> Result<Node> {
    eval_in(&default_symbols(), source)
}

pub fn eval_in(symbols: &SymbolTable, source: &str) -> Result<Node> {
    init_tracing();
    let node = lx_lang::read_one(source)?;
    reduce(&node, symbols, None)
}

/// An environment over the builtins plus `defs`.
pub fn symbols_with(defs: Vec<TypeDef>, config: ReduceConfig) -> SymbolTable {
    registry_symbols(TypeRegistry::with_builtins(), defs, config)
}

pub fn registry_symbols(
    registry: TypeRegistry,
    defs: Vec<TypeDef>,
    config: ReduceConfig,
) -> SymbolTable {
    for def in defs {
        registry.register(def);
    }
    symbols_for(Arc::new(registry), config)
}

/// `Declaring.Name` of the method a call node binds.
pub fn called(node: &Node) -> Option<String> {
    match node.kind() {
        NodeKind::Call(call) => Some(format!("{}.{}", call.method.declaring, call.method.name)),
        _ => None,
    }
}
