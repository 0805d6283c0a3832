//! S-expression reader producing raw lx syntax nodes.

mod lexer;
mod reader;

pub use reader::{read, read_one, ReaderSession};
