//! Bundle assembly.
//!
//! Collects compiled components in encounter order and renders the
//! final JavaScript source. Name collisions are rejected at insertion
//! time; the first definition wins and the batch keeps going.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_span::Span;

use crate::error::{TranspileError, TranspileErrorKind};
use crate::transpile_class;
use pyreact_parser::ast::ClassDef;

const BUNDLE_HEADER: &str = "// PyReact - Transpiled Components";
const EMPTY_BUNDLE: &str = "// No components to transpile";

/// One successfully compiled component.
#[derive(Debug, Clone)]
pub struct CompiledComponent {
    pub name: SmolStr,
    /// The emitted `function Name(props) {...}` text.
    pub code: String,
    /// Span of the class definition in its source file.
    pub span: Span,
}

/// An ordered collection of compiled components plus every failure
/// collected along the way.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    components: Vec<CompiledComponent>,
    index: FxHashMap<SmolStr, usize>,
    failures: Vec<TranspileError>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles one class and appends it. A class whose name is
    /// already taken is rejected and recorded as a failure.
    pub fn add_class(&mut self, class: &ClassDef) {
        if self.index.contains_key(&class.name) {
            self.failures.push(TranspileError::new(
                class.name.clone(),
                TranspileErrorKind::DuplicateComponent,
                class.span,
            ));
            return;
        }
        match transpile_class(class) {
            Ok(code) => self.insert(CompiledComponent {
                name: class.name.clone(),
                code,
                span: class.span,
            }),
            Err(error) => self.failures.push(error),
        }
    }

    fn insert(&mut self, component: CompiledComponent) {
        self.index
            .insert(component.name.clone(), self.components.len());
        self.components.push(component);
    }

    /// Moves everything from `other` into `self`, preserving order.
    /// Cross-bundle name collisions are recorded as failures and also
    /// returned so the caller can attribute them to the right file.
    pub fn merge(&mut self, other: Bundle) -> Vec<TranspileError> {
        let mut rejected = Vec::new();
        for component in other.components {
            if self.index.contains_key(&component.name) {
                let error = TranspileError::new(
                    component.name.clone(),
                    TranspileErrorKind::DuplicateComponent,
                    component.span,
                );
                rejected.push(error.clone());
                self.failures.push(error);
            } else {
                self.insert(component);
            }
        }
        self.failures.extend(other.failures);
        rejected
    }

    pub fn components(&self) -> &[CompiledComponent] {
        &self.components
    }

    pub fn get(&self, name: &str) -> Option<&CompiledComponent> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.components.iter().map(|c| &c.name)
    }

    pub fn failures(&self) -> &[TranspileError] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The bundle as JavaScript source: a header comment, then each
    /// component separated by blank lines.
    pub fn source(&self) -> String {
        if self.components.is_empty() {
            return EMPTY_BUNDLE.to_string();
        }
        let mut parts = vec![BUNDLE_HEADER.to_string(), String::new()];
        for component in &self.components {
            parts.push(component.code.clone());
            parts.push(String::new());
        }
        parts.join("\n")
    }
}
