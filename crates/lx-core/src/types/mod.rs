mod literal;
mod member;
mod oracle;
mod ty;

pub use literal::*;
pub use member::*;
pub use oracle::*;
pub use ty::*;
