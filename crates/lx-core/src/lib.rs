//! Core data model of the lx expression language: types, expression nodes,
//! symbol environments and the shared error type.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod collections;
pub mod config;
pub mod error;
pub mod span;
pub mod symbols;
pub mod types;

// Re-export commonly used items for convenience
pub use tracing;

pub use ast::{DispatchKind, Node, NodeKind};
pub use config::ReduceConfig;
pub use symbols::{SymbolDefinition, SymbolFn, SymbolTable, WeakSymbolTable};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
