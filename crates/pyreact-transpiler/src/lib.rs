//! Compiles PyReact component classes into hook-based React function
//! components, emitted as plain JavaScript source text.
//!
//! The pipeline runs in three stages. [`extract_component`] classifies
//! a class's methods and pulls the initial state out of `__init__`.
//! [`emit_component`] translates the render tree and handler bodies
//! and renders the `function Name(props) {...}` text. [`Bundle`]
//! collects components across files and renders the final output.
//!
//! ```
//! let source = "\
//! class Counter(Component):
//!     def __init__(self):
//!         self.state = {'count': 0}
//!
//!     def increment(self):
//!         self.set_state({'count': self.state['count'] + 1})
//!
//!     def render(self):
//!         return button('Go', onclick=self.increment)
//! ";
//! let result = pyreact_transpiler::transpile_source(source);
//! assert!(result.parse_errors.is_empty());
//! assert!(result.bundle.failures().is_empty());
//!
//! let code = &result.bundle.get("Counter").unwrap().code;
//! assert!(code.starts_with("function Counter(props) {"));
//! assert!(code.contains("React.useState({count: 0})"));
//! assert!(code.contains("{onClick: increment}"));
//! ```

mod assemble;
mod component;
mod element;
mod emit;
mod error;
mod expr;

pub use assemble::{Bundle, CompiledComponent};
pub use component::{extract_component, ComponentDefinition, MethodDefinition, MethodRole};
pub use emit::emit_component;
pub use error::{TranspileError, TranspileErrorKind};

use pyreact_parser::ast::ClassDef;
use pyreact_parser::ParseError;

/// Outcome of transpiling one source file.
#[derive(Debug, Default)]
pub struct TranspileResult {
    /// Compiled components plus per-component failures.
    pub bundle: Bundle,
    /// Syntax errors from the parse. Classes that parsed cleanly are
    /// still compiled.
    pub parse_errors: Vec<ParseError>,
}

/// Compiles a single class into its JavaScript function text.
pub fn transpile_class(class: &ClassDef) -> Result<String, TranspileError> {
    let component = extract_component(class)?;
    emit_component(&component)
}

/// Parses `source` and compiles every class in it.
pub fn transpile_source(source: &str) -> TranspileResult {
    let parsed = pyreact_parser::parse(source);
    let mut bundle = Bundle::new();
    for class in &parsed.module.classes {
        bundle.add_class(class);
    }
    TranspileResult {
        bundle,
        parse_errors: parsed.errors,
    }
}
