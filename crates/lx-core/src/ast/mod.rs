//! Expression nodes: raw syntax, intermediate forms and typed output share one
//! tree so reduction can replace any node by its reduced form.

mod kind;
mod node;
mod pretty;
mod syntax;

pub use kind::*;
pub use node::*;
pub use syntax::*;
