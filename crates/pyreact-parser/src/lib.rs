//! Parser for Python-style component classes.
//!
//! Turns source text into a [`ast::Module`]: the lexer produces a flat
//! token stream (newlines included, indentation measured by column),
//! and a recursive-descent parser builds class, method, and expression
//! nodes from it. Errors are collected, not thrown; one bad statement
//! does not take down the rest of the file.
//!
//! # Example
//!
//! ```
//! use pyreact_parser::parse;
//!
//! let source = r#"
//! class Counter(Component):
//!     def render(self):
//!         return div(h1("Hi"))
//! "#;
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.module.classes.len(), 1);
//! assert_eq!(result.module.classes[0].name, "Counter");
//! ```

pub mod ast;
mod error;
pub mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse, ParseResult, Parser};
pub use source_span::{LineCol, LineIndex, Span};
