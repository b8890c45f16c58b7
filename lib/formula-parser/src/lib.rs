#[macro_use]
extern crate pest_derive;

pub mod error;
pub mod formula;
pub mod lexer;
pub mod parser;

pub use error::ParseError;
pub use formula::{Atom, BinaryOp, Formula, Operator, UnaryOp};
pub use parser::parse_formula;
