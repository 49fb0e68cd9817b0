//! # Stencil Expression Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the stencil
//! expression language, the JavaScript-like sublanguage a template engine
//! uses to compute dynamic values in conditionals, interpolations, and
//! filter arguments.
//!
//! ## Architecture Overview
//!
//! - **[nodes]** - Expression nodes (literals, identifiers, array/object
//!   literals, member and call expressions, operator applications)
//! - **[operators]** - Binary and unary operators with their precedence and
//!   application semantics
//!
//! ## Core Concepts
//!
//! ### Value nodes
//!
//! ```text
//! 'text'  3.14  true  null  [1,2,3]  {x, label: 'on'}  user.name  a[key]
//! ```
//!
//! ### Operator applications
//!
//! Binary operators are combined by precedence climbing, so
//!
//! ```text
//! 1 + 2 * 3
//! ```
//!
//! parses as `1 + (2 * 3)`. The full table spans logical (`&&`, `||`, and
//! the `and`/`or` word forms), bitwise (`&`, `|`, `^`, `<<`, `>>`),
//! equality (`==`, `!=`, `===`, `!==`), relational (`<`, `<=`, `>`, `>=`),
//! and arithmetic (`+`, `-`, `*`, `/`, `%`) groups.
//!
//! ### Call expressions
//!
//! ```text
//! upper(name)        // parenthesized arguments
//! raw: some {text}   // whitespace-sensitive filter form
//! ```
//!
//! Call and member expressions only capture shape; the surrounding engine
//! resolves property access and filter dispatch through the
//! [`Scope`](crate::Scope) trait.
pub mod nodes;
pub mod operators;

pub use nodes::{Expr, Property};
pub use operators::{BinOp, UnaryOp};
