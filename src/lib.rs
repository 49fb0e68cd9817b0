pub mod ast;
pub mod chars;
pub mod compare;
pub mod evaluator;
pub mod num;
pub mod parser;
pub mod scope;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Expr, Property, UnaryOp};
pub use compare::{Comparisons, StandardComparisons};
pub use evaluator::{EvalContext, EvalError};
pub use num::{DecimalNumerics, Numerics};
pub use parser::{parse_call_expression, parse_expression, ParseError};
pub use scope::{MapScope, Scope};
pub use value::Value;
