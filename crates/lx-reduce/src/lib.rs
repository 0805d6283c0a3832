//! The lx reduction engine: turns raw syntax nodes into typed expression
//! trees through symbol resolution, macro expansion and overload resolution.

pub mod dispatch;
pub mod identifier;
pub mod lambda;
pub mod list;
pub mod macro_eval;
pub mod number;
pub mod prelude;
pub mod quote;
pub mod reduce;
pub mod vector;

pub use macro_eval::{bind_macro_arguments, eval_expression, evaluate_macro};
pub use number::parse_number;
pub use prelude::{default_symbols, symbols_for};
pub use reduce::{reduce, try_reduce};
