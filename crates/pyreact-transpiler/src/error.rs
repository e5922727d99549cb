//! Transpile failures.
//!
//! Failures are scoped to a single component: the batch driver keeps
//! compiling everything else and reports these at the end.

use smol_str::SmolStr;
use source_span::Span;
use thiserror::Error;

/// A failure while compiling one component class.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{component}: {kind}")]
pub struct TranspileError {
    /// Name of the class that failed.
    pub component: SmolStr,
    pub kind: TranspileErrorKind,
    pub span: Span,
}

impl TranspileError {
    pub fn new(component: SmolStr, kind: TranspileErrorKind, span: Span) -> Self {
        Self {
            component,
            kind,
            span,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranspileErrorKind {
    #[error("missing render method")]
    MissingRender,

    #[error("unsupported syntax in {method}: {message}")]
    UnsupportedSyntax { method: String, message: String },

    #[error("unsupported state initialization: {message}")]
    UnsupportedState { message: String },

    #[error("unknown handler '{name}': no method with that name")]
    UnknownHandler { name: SmolStr },

    #[error("a component with this name is already defined")]
    DuplicateComponent,
}

impl TranspileErrorKind {
    /// Stable machine-readable code, used by the JSON report.
    pub fn code(&self) -> &'static str {
        match self {
            TranspileErrorKind::MissingRender => "missing-render",
            TranspileErrorKind::UnsupportedSyntax { .. } => "unsupported-syntax",
            TranspileErrorKind::UnsupportedState { .. } => "unsupported-state",
            TranspileErrorKind::UnknownHandler { .. } => "unknown-handler",
            TranspileErrorKind::DuplicateComponent => "duplicate-component",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_includes_component_name() {
        let error = TranspileError::new(
            SmolStr::new("Counter"),
            TranspileErrorKind::MissingRender,
            Span::empty(),
        );
        assert_eq!(error.to_string(), "Counter: missing render method");
    }

    #[test]
    fn test_unknown_handler_message() {
        let error = TranspileError::new(
            SmolStr::new("App"),
            TranspileErrorKind::UnknownHandler {
                name: SmolStr::new("incrment"),
            },
            Span::empty(),
        );
        assert_eq!(
            error.to_string(),
            "App: unknown handler 'incrment': no method with that name"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            TranspileErrorKind::MissingRender,
            TranspileErrorKind::UnsupportedSyntax {
                method: String::new(),
                message: String::new(),
            },
            TranspileErrorKind::UnsupportedState {
                message: String::new(),
            },
            TranspileErrorKind::UnknownHandler {
                name: SmolStr::new(""),
            },
            TranspileErrorKind::DuplicateComponent,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }
}
