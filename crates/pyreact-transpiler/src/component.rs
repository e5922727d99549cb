//! Component extraction and method classification.
//!
//! Turns a parsed class into a [`ComponentDefinition`]: the
//! constructor is consumed into the initial state map, and every
//! other method is classified by a closed set of roles.

use indexmap::IndexMap;
use pyreact_parser::ast::{ClassDef, Expr, FunctionDef, Stmt};
use smol_str::SmolStr;
use source_span::Span;

use crate::error::{TranspileError, TranspileErrorKind};
use crate::expr::{expr_kind_name, is_self_attr, is_self_method, js_string, object_key};

/// How a method participates in the compiled component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRole {
    /// Produces the returned element tree.
    Render,
    /// Updates state; compiled to a `const` closure ahead of the
    /// return.
    Handler,
    /// Body is nothing but stubs; dropped from the output.
    LifecycleStub,
    /// A helper that is neither of the above. Emitted like a handler.
    Plain,
}

/// A class distilled to what the emitter needs.
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    pub name: SmolStr,
    /// Initial state in declaration order, values already rendered as
    /// JavaScript.
    pub state: IndexMap<SmolStr, String>,
    pub methods: Vec<MethodDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDefinition {
    pub name: SmolStr,
    pub role: MethodRole,
    /// Parameter names with the leading `self` stripped.
    pub params: Vec<SmolStr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Extracts the component model from a class.
///
/// Fails with [`TranspileErrorKind::MissingRender`] when the class has
/// no `render` method, and with a state error when the constructor
/// does anything beyond `super().__init__(...)` and a single
/// `self.state = {...}` assignment.
pub fn extract_component(class: &ClassDef) -> Result<ComponentDefinition, TranspileError> {
    let mut state = IndexMap::new();
    let mut methods: Vec<MethodDefinition> = Vec::new();

    for method in &class.methods {
        if method.name == "__init__" {
            state = initial_state(&class.name, method)?;
            continue;
        }
        let definition = MethodDefinition {
            name: method.name.clone(),
            role: classify(method),
            params: own_params(method),
            body: method.body.clone(),
            span: method.span,
        };
        // Redefinition keeps the original position but the last body.
        if let Some(existing) = methods.iter_mut().find(|m| m.name == definition.name) {
            *existing = definition;
        } else {
            methods.push(definition);
        }
    }

    if !methods.iter().any(|m| m.role == MethodRole::Render) {
        return Err(TranspileError::new(
            class.name.clone(),
            TranspileErrorKind::MissingRender,
            class.span,
        ));
    }

    Ok(ComponentDefinition {
        name: class.name.clone(),
        state,
        methods,
        span: class.span,
    })
}

fn classify(method: &FunctionDef) -> MethodRole {
    if method.name == "render" {
        return MethodRole::Render;
    }
    // Docstrings are captured separately, so a docstring-only body is
    // empty here and counts as a stub.
    if method
        .body
        .iter()
        .all(|stmt| matches!(stmt, Stmt::Pass(_) | Stmt::Raise(_)))
    {
        return MethodRole::LifecycleStub;
    }
    if writes_state(method) {
        return MethodRole::Handler;
    }
    MethodRole::Plain
}

fn writes_state(method: &FunctionDef) -> bool {
    method.body.iter().any(|stmt| match stmt {
        Stmt::Expr(expr_stmt) => match &expr_stmt.expr {
            Expr::Call(call) => is_self_method(&call.callee, "set_state"),
            _ => false,
        },
        _ => false,
    })
}

fn own_params(method: &FunctionDef) -> Vec<SmolStr> {
    let mut params = method.params.as_slice();
    if params.first().is_some_and(|p| p.name == "self") {
        params = &params[1..];
    }
    params.iter().map(|p| p.name.clone()).collect()
}

/// Reads the initial state out of a constructor body.
fn initial_state(
    component: &SmolStr,
    ctor: &FunctionDef,
) -> Result<IndexMap<SmolStr, String>, TranspileError> {
    let mut state: Option<IndexMap<SmolStr, String>> = None;
    for stmt in &ctor.body {
        match stmt {
            Stmt::Pass(_) => continue,
            Stmt::Expr(expr_stmt) if is_super_init(&expr_stmt.expr) => continue,
            Stmt::Assign(assign) if is_self_attr(&assign.target, "state") => {
                if state.is_some() {
                    return Err(TranspileError::new(
                        component.clone(),
                        TranspileErrorKind::UnsupportedState {
                            message: "state is assigned more than once".to_string(),
                        },
                        assign.span,
                    ));
                }
                let Expr::Dict(dict) = &assign.value else {
                    return Err(TranspileError::new(
                        component.clone(),
                        TranspileErrorKind::UnsupportedState {
                            message: format!(
                                "state must be initialized with a dict literal, not a {}",
                                expr_kind_name(&assign.value)
                            ),
                        },
                        assign.value.span(),
                    ));
                };
                let mut map = IndexMap::new();
                for entry in &dict.entries {
                    let Expr::Str(key) = &entry.key else {
                        return Err(TranspileError::new(
                            component.clone(),
                            TranspileErrorKind::UnsupportedState {
                                message: "state keys must be string literals".to_string(),
                            },
                            entry.key.span(),
                        ));
                    };
                    let value = state_literal(&entry.value).map_err(|message| {
                        TranspileError::new(
                            component.clone(),
                            TranspileErrorKind::UnsupportedState { message },
                            entry.value.span(),
                        )
                    })?;
                    map.insert(SmolStr::new(&key.value), value);
                }
                state = Some(map);
            }
            other => {
                return Err(TranspileError::new(
                    component.clone(),
                    TranspileErrorKind::UnsupportedSyntax {
                        method: "__init__".to_string(),
                        message: constructor_stmt_message(other),
                    },
                    other.span(),
                ));
            }
        }
    }
    Ok(state.unwrap_or_default())
}

fn constructor_stmt_message(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Assign(_) => "only self.state may be assigned in a constructor".to_string(),
        Stmt::Expr(expr_stmt) => format!(
            "unexpected {} in a constructor",
            expr_kind_name(&expr_stmt.expr)
        ),
        Stmt::Return(_) => "return is not allowed in a constructor".to_string(),
        Stmt::Pass(_) | Stmt::Raise(_) => "unexpected statement in a constructor".to_string(),
    }
}

fn is_super_init(expr: &Expr) -> bool {
    let Expr::Call(call) = expr else {
        return false;
    };
    let Expr::Attribute(attr) = call.callee.as_ref() else {
        return false;
    };
    if attr.attr != "__init__" {
        return false;
    }
    let Expr::Call(inner) = attr.object.as_ref() else {
        return false;
    };
    let Expr::Name(name) = inner.callee.as_ref() else {
        return false;
    };
    name.name == "super"
}

/// Renders a state value to JavaScript. Only plain data is allowed:
/// numbers, strings, booleans, None, and nested lists and dicts of
/// the same.
fn state_literal(expr: &Expr) -> Result<String, String> {
    match expr {
        Expr::Int(lit) => Ok(lit.text.to_string()),
        Expr::Float(lit) => Ok(lit.text.to_string()),
        Expr::Str(lit) => Ok(js_string(&lit.value)),
        Expr::Bool(lit) => Ok(if lit.value { "true" } else { "false" }.to_string()),
        Expr::None(_) => Ok("null".to_string()),
        Expr::List(list) => {
            let items: Result<Vec<String>, String> = list.items.iter().map(state_literal).collect();
            Ok(format!("[{}]", items?.join(", ")))
        }
        Expr::Dict(dict) => {
            let mut pairs = Vec::new();
            for entry in &dict.entries {
                let Expr::Str(key) = &entry.key else {
                    return Err("state keys must be string literals".to_string());
                };
                pairs.push(format!(
                    "{}: {}",
                    object_key(&key.value),
                    state_literal(&entry.value)?
                ));
            }
            Ok(format!("{{{}}}", pairs.join(", ")))
        }
        other => Err(format!(
            "{} is not a supported state value",
            expr_kind_name(other)
        )),
    }
}
