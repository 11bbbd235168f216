//! # ordolint_parser
//!
//! Parser boundary for ordolint.
//!
//! This crate provides:
//! - A `Parser` trait turning source text into a [`SyntaxTree`](ordolint_ast::SyntaxTree)
//! - `TokenParser`, a grammar-agnostic tokenizer for C-family text that
//!   nests `{}` and `()` pairs and keeps all trivia
//!
//! ## Example
//!
//! ```rust
//! use ordolint_parser::{Parser, TokenParser};
//!
//! let source = "\u{feff}fun main() {}\n";
//! let tree = TokenParser::new().parse(source).unwrap();
//!
//! assert_eq!(tree.render(), source);
//! ```

mod error;
mod token;
mod traits;

pub use error::ParseError;
pub use token::TokenParser;
pub use traits::Parser;
