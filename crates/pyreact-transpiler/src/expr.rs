//! Expression translation.
//!
//! A fixed rule table maps each source expression shape onto a
//! JavaScript expression. The first matching rule wins, and anything
//! that matches no rule is rejected with the component and method it
//! occurred in. There is deliberately no general fallback: silently
//! emitting unknown Python would produce broken output at runtime.

use pyreact_parser::ast::{BinaryOp, CallExpr, Expr};
use smol_str::SmolStr;
use source_span::Span;

use crate::error::{TranspileError, TranspileErrorKind};

/// The result of translating one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Translation {
    /// A pure value expression.
    Value(String),
    /// A `setState` call. Only valid as a statement in a handler body.
    StateWrite(String),
}

impl Translation {
    pub(crate) fn into_code(self) -> String {
        match self {
            Translation::Value(code) | Translation::StateWrite(code) => code,
        }
    }
}

#[derive(Clone, Copy)]
enum OperandSide {
    Left,
    Right,
}

/// Translates expressions within one method of one component.
///
/// `params` are the in-scope closure parameters, `handlers` the
/// method names that survive as closures. Handler references resolve
/// against the full list, so declaration order between methods does
/// not matter.
pub(crate) struct ExprTranslator<'a> {
    pub component: &'a SmolStr,
    pub method: &'a SmolStr,
    pub params: &'a [SmolStr],
    pub handlers: &'a [SmolStr],
}

impl ExprTranslator<'_> {
    pub(crate) fn translate(&self, expr: &Expr) -> Result<Translation, TranspileError> {
        match expr {
            Expr::Subscript(sub) => {
                if is_self_attr(&sub.object, "state") {
                    let Expr::Str(key) = sub.index.as_ref() else {
                        return Err(self.unsupported(
                            sub.index.span(),
                            "state keys must be string literals",
                        ));
                    };
                    Ok(Translation::Value(state_access(&key.value)))
                } else {
                    Err(self.unsupported(
                        sub.span,
                        "subscript reads are only supported on self.state",
                    ))
                }
            }
            Expr::Call(call) => self.translate_call(call),
            Expr::FString(fstring) => {
                let mut out = String::from("`");
                for (i, text) in fstring.texts.iter().enumerate() {
                    out.push_str(&escape_template_text(text));
                    if let Some(embedded) = fstring.exprs.get(i) {
                        out.push_str("${");
                        out.push_str(&self.translate_value(embedded)?);
                        out.push('}');
                    }
                }
                out.push('`');
                Ok(Translation::Value(out))
            }
            Expr::Attribute(attr) => {
                let Expr::Name(obj) = attr.object.as_ref() else {
                    return Err(self.unsupported(
                        attr.span,
                        "attribute access is only supported on self",
                    ));
                };
                if obj.name != "self" {
                    return Err(self.unsupported(
                        attr.span,
                        "attribute access is only supported on self",
                    ));
                }
                match attr.attr.as_str() {
                    "state" => Err(self.unsupported(
                        attr.span,
                        "bare self.state is not supported; read a single key",
                    )),
                    "props" => Err(self.unsupported(
                        attr.span,
                        "bare self.props is not supported; use props.get",
                    )),
                    name => {
                        if self.handlers.iter().any(|h| h == name) {
                            Ok(Translation::Value(name.to_string()))
                        } else {
                            Err(self.unknown_handler(&attr.attr, attr.span))
                        }
                    }
                }
            }
            Expr::Int(lit) => Ok(Translation::Value(lit.text.to_string())),
            Expr::Float(lit) => Ok(Translation::Value(lit.text.to_string())),
            Expr::Str(lit) => Ok(Translation::Value(js_string(&lit.value))),
            Expr::Bool(lit) => Ok(Translation::Value(
                if lit.value { "true" } else { "false" }.to_string(),
            )),
            Expr::None(_) => Ok(Translation::Value("null".to_string())),
            Expr::Name(name) => {
                if self.params.iter().any(|p| p == &name.name) {
                    Ok(Translation::Value(name.name.to_string()))
                } else {
                    Err(self.unsupported(name.span, format!("unbound name '{}'", name.name)))
                }
            }
            Expr::Binary(bin) => {
                let left = self.operand(&bin.left, bin.op, OperandSide::Left)?;
                let right = self.operand(&bin.right, bin.op, OperandSide::Right)?;
                Ok(Translation::Value(format!(
                    "{} {} {}",
                    left,
                    bin.op.as_str(),
                    right
                )))
            }
            Expr::Dict(dict) => Err(self.unsupported(
                dict.span,
                "dict literals are only supported inside set_state",
            )),
            Expr::List(list) => {
                Err(self.unsupported(list.span, "list literals are not supported here"))
            }
        }
    }

    /// Like [`translate`](Self::translate) but rejects state writes,
    /// for positions that need a value.
    pub(crate) fn translate_value(&self, expr: &Expr) -> Result<String, TranspileError> {
        match self.translate(expr)? {
            Translation::Value(code) => Ok(code),
            Translation::StateWrite(_) => Err(self.unsupported(
                expr.span(),
                "a state update cannot be used as a value",
            )),
        }
    }

    fn translate_call(&self, call: &CallExpr) -> Result<Translation, TranspileError> {
        if is_props_get(&call.callee) {
            if !call.kwargs.is_empty() {
                return Err(self.unsupported(
                    call.span,
                    "keyword arguments to props.get are not supported",
                ));
            }
            return match call.args.as_slice() {
                [Expr::Str(key)] => Ok(Translation::Value(prop_access(&key.value))),
                [Expr::Str(key), default] => {
                    let default = self.translate_value(default)?;
                    Ok(Translation::Value(format!(
                        "({} ?? {})",
                        prop_access(&key.value),
                        default
                    )))
                }
                [first, ..] if !matches!(first, Expr::Str(_)) => {
                    Err(self.unsupported(first.span(), "prop keys must be string literals"))
                }
                _ => Err(self.unsupported(
                    call.span,
                    "props.get takes a key and an optional default",
                )),
            };
        }

        if is_self_method(&call.callee, "set_state") {
            if call.args.len() != 1 || !call.kwargs.is_empty() {
                return Err(self.unsupported(call.span, "set_state takes a single dict literal"));
            }
            let Expr::Dict(dict) = &call.args[0] else {
                return Err(
                    self.unsupported(call.args[0].span(), "set_state takes a single dict literal")
                );
            };
            let mut pairs = Vec::new();
            for entry in &dict.entries {
                let Expr::Str(key) = &entry.key else {
                    return Err(
                        self.unsupported(entry.key.span(), "state keys must be string literals")
                    );
                };
                let value = self.translate_value(&entry.value)?;
                pairs.push(format!("{}: {}", object_key(&key.value), value));
            }
            let merged = if pairs.is_empty() {
                "...prevState".to_string()
            } else {
                format!("...prevState, {}", pairs.join(", "))
            };
            return Ok(Translation::StateWrite(format!(
                "setState(prevState => ({{{merged}}}))"
            )));
        }

        Err(self.unsupported(
            call.span,
            "only props.get and set_state calls are supported in expressions",
        ))
    }

    fn operand(
        &self,
        expr: &Expr,
        parent: BinaryOp,
        side: OperandSide,
    ) -> Result<String, TranspileError> {
        let code = self.translate_value(expr)?;
        if let Expr::Binary(child) = expr {
            let needs_parens = match side {
                OperandSide::Left => prec(child.op) < prec(parent),
                OperandSide::Right => prec(child.op) <= prec(parent),
            };
            if needs_parens {
                return Ok(format!("({code})"));
            }
        }
        Ok(code)
    }

    pub(crate) fn unsupported(&self, span: Span, message: impl Into<String>) -> TranspileError {
        TranspileError::new(
            self.component.clone(),
            TranspileErrorKind::UnsupportedSyntax {
                method: self.method.to_string(),
                message: message.into(),
            },
            span,
        )
    }

    pub(crate) fn unknown_handler(&self, name: &SmolStr, span: Span) -> TranspileError {
        TranspileError::new(
            self.component.clone(),
            TranspileErrorKind::UnknownHandler { name: name.clone() },
            span,
        )
    }
}

fn prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Add | BinaryOp::Sub => 1,
        BinaryOp::Mul | BinaryOp::Div => 2,
    }
}

/// `state.key`, falling back to bracket form for keys that are not
/// JavaScript identifiers.
fn state_access(key: &str) -> String {
    if is_js_identifier(key) {
        format!("state.{key}")
    } else {
        format!("state[{}]", js_string(key))
    }
}

fn prop_access(key: &str) -> String {
    if is_js_identifier(key) {
        format!("props.{key}")
    } else {
        format!("props[{}]", js_string(key))
    }
}

/// True when `expr` is exactly `self.<attr>`.
pub(crate) fn is_self_attr(expr: &Expr, attr: &str) -> bool {
    if let Expr::Attribute(a) = expr {
        if let Expr::Name(obj) = a.object.as_ref() {
            return obj.name == "self" && a.attr == attr;
        }
    }
    false
}

fn is_props_get(callee: &Expr) -> bool {
    if let Expr::Attribute(a) = callee {
        return a.attr == "get" && is_self_attr(&a.object, "props");
    }
    false
}

pub(crate) fn is_self_method(callee: &Expr, name: &str) -> bool {
    if let Expr::Attribute(a) = callee {
        if let Expr::Name(obj) = a.object.as_ref() {
            return obj.name == "self" && a.attr == name;
        }
    }
    false
}

pub(crate) fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A double-quoted JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// An object-literal key: bare when it is a valid identifier, quoted
/// otherwise.
pub(crate) fn object_key(key: &str) -> String {
    if is_js_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

/// Escapes literal text for a template literal so the segment
/// boundaries survive a round trip.
fn escape_template_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '$' if matches!(chars.peek(), Some('{')) => {
                chars.next();
                out.push_str("\\${");
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn expr_kind_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Int(_) | Expr::Float(_) => "number literal",
        Expr::Str(_) => "string literal",
        Expr::FString(_) => "f-string",
        Expr::Bool(_) => "boolean literal",
        Expr::None(_) => "None literal",
        Expr::Name(_) => "name",
        Expr::Attribute(_) => "attribute access",
        Expr::Subscript(_) => "subscript",
        Expr::Call(_) => "call",
        Expr::Dict(_) => "dict literal",
        Expr::List(_) => "list literal",
        Expr::Binary(_) => "binary expression",
    }
}
