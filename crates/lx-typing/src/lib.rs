//! Concrete type-metadata service for the lx reduction engine.

pub mod builtins;
pub mod conversions;
pub mod registry;
pub mod unify;

pub use registry::TypeRegistry;
pub use unify::{unify, TypeNode};
