//! JavaScript emission.
//!
//! Produces one `function Name(props) {...}` per component: a
//! `React.useState` hook when there is initial state, one `const`
//! closure per handler in declaration order, and a single return of
//! nested `React.createElement` calls.

use smol_str::SmolStr;

use crate::component::{ComponentDefinition, MethodDefinition, MethodRole};
use crate::element::{build_element_tree, AttrValue, Child, ElementNode};
use crate::error::{TranspileError, TranspileErrorKind};
use crate::expr::{js_string, object_key, ExprTranslator, Translation};
use pyreact_parser::ast::Stmt;

/// Event attributes with fixed React spellings.
const EVENT_ATTRS: &[(&str, &str)] = &[
    ("onclick", "onClick"),
    ("onchange", "onChange"),
    ("onsubmit", "onSubmit"),
];

/// Maps a source attribute name onto its React spelling.
///
/// Names in the fixed table win. Otherwise `on` followed by a fully
/// lowercase word gets its first letter capitalized. Anything else
/// passes through unchanged, which makes the mapping idempotent and
/// total.
pub(crate) fn rename_attr(name: &str) -> String {
    if let Some((_, renamed)) = EVENT_ATTRS.iter().find(|(raw, _)| *raw == name) {
        return (*renamed).to_string();
    }
    if let Some(rest) = name.strip_prefix("on") {
        let mut chars = rest.chars();
        if let Some(first) = chars.next() {
            if first.is_ascii_lowercase() && rest.chars().all(|c| c.is_ascii_lowercase()) {
                let mut out = String::with_capacity(name.len());
                out.push_str("on");
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
                return out;
            }
        }
    }
    name.to_string()
}

/// Emits the function-component text for one component.
pub fn emit_component(component: &ComponentDefinition) -> Result<String, TranspileError> {
    let handlers: Vec<SmolStr> = component
        .methods
        .iter()
        .filter(|m| matches!(m.role, MethodRole::Handler | MethodRole::Plain))
        .map(|m| m.name.clone())
        .collect();

    let mut out = String::new();
    out.push_str(&format!("function {}(props) {{\n", component.name));

    if !component.state.is_empty() {
        let entries: Vec<String> = component
            .state
            .iter()
            .map(|(key, value)| format!("{}: {}", object_key(key), value))
            .collect();
        out.push_str(&format!(
            "  const [state, setState] = React.useState({{{}}});\n",
            entries.join(", ")
        ));
        out.push('\n');
    }

    for method in &component.methods {
        if !matches!(method.role, MethodRole::Handler | MethodRole::Plain) {
            continue;
        }
        out.push_str(&emit_handler(component, method, &handlers)?);
        out.push('\n');
    }

    let Some(render) = component
        .methods
        .iter()
        .find(|m| m.role == MethodRole::Render)
    else {
        return Err(TranspileError::new(
            component.name.clone(),
            TranspileErrorKind::MissingRender,
            component.span,
        ));
    };
    out.push_str(&format!(
        "  return {};\n",
        emit_render(component, render, &handlers)?
    ));
    out.push('}');
    Ok(out)
}

fn emit_handler(
    component: &ComponentDefinition,
    method: &MethodDefinition,
    handlers: &[SmolStr],
) -> Result<String, TranspileError> {
    let cx = ExprTranslator {
        component: &component.name,
        method: &method.name,
        params: &method.params,
        handlers,
    };
    let mut out = format!(
        "  const {} = ({}) => {{\n",
        method.name,
        method.params.join(", ")
    );
    for stmt in &method.body {
        match stmt {
            Stmt::Expr(expr_stmt) => match cx.translate(&expr_stmt.expr)? {
                Translation::StateWrite(code) => {
                    out.push_str(&format!("    {code};\n"));
                }
                Translation::Value(_) => {
                    return Err(cx.unsupported(
                        expr_stmt.span,
                        "an expression statement must update state",
                    ));
                }
            },
            Stmt::Return(ret) => {
                let code = match &ret.value {
                    Some(value) => cx.translate_value(value)?,
                    None => "null".to_string(),
                };
                out.push_str(&format!("    return {code};\n"));
            }
            Stmt::Assign(assign) => {
                return Err(cx.unsupported(assign.span, "local assignments are not supported"));
            }
            Stmt::Pass(stmt) => {
                return Err(cx.unsupported(stmt.span, "pass is not supported in a handler body"));
            }
            Stmt::Raise(stmt) => {
                return Err(cx.unsupported(stmt.span, "raise is not supported in a handler body"));
            }
        }
    }
    out.push_str("  };\n");
    Ok(out)
}

fn emit_render(
    component: &ComponentDefinition,
    render: &MethodDefinition,
    handlers: &[SmolStr],
) -> Result<String, TranspileError> {
    let cx = ExprTranslator {
        component: &component.name,
        method: &render.name,
        params: &render.params,
        handlers,
    };
    let ret = match render.body.as_slice() {
        [Stmt::Return(ret)] => ret,
        [] => {
            return Err(cx.unsupported(render.span, "render must return an element"));
        }
        [first, ..] => {
            return Err(cx.unsupported(
                first.span(),
                "render must consist of a single return statement",
            ));
        }
    };
    let Some(value) = &ret.value else {
        return Err(cx.unsupported(ret.span, "render must return an element"));
    };
    let tree = build_element_tree(value, &cx)?;
    emit_element(&tree, handlers, &component.name)
}

/// Emits one `React.createElement(...)` call, single line, children
/// in order. The children argument is omitted entirely when there are
/// none.
fn emit_element(
    node: &ElementNode,
    handlers: &[SmolStr],
    component: &SmolStr,
) -> Result<String, TranspileError> {
    let mut out = String::from("React.createElement(");
    if node.component_ref {
        out.push_str(&node.tag);
    } else {
        out.push('\'');
        out.push_str(&node.tag);
        out.push('\'');
    }

    if node.attrs.is_empty() {
        out.push_str(", null");
    } else {
        let mut pairs = Vec::new();
        for (attr_name, value) in &node.attrs {
            let code = match value {
                AttrValue::Code(code) => code.clone(),
                AttrValue::HandlerRef { name, span } => {
                    if handlers.iter().any(|h| h == name) {
                        name.to_string()
                    } else {
                        return Err(TranspileError::new(
                            component.clone(),
                            TranspileErrorKind::UnknownHandler { name: name.clone() },
                            *span,
                        ));
                    }
                }
            };
            pairs.push(format!("{}: {}", rename_attr(attr_name), code));
        }
        out.push_str(&format!(", {{{}}}", pairs.join(", ")));
    }

    if !node.children.is_empty() {
        let mut parts = Vec::new();
        for child in &node.children {
            parts.push(match child {
                Child::Element(element) => emit_element(element, handlers, component)?,
                Child::Text(text) => js_string(text),
                Child::Code(code) => code.clone(),
            });
        }
        out.push_str(&format!(", [{}]", parts.join(", ")));
    }

    out.push(')');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::extract_component;
    use pretty_assertions::assert_eq;

    fn emit(source: &str) -> Result<String, TranspileError> {
        let result = pyreact_parser::parse(source);
        assert!(
            result.errors.is_empty(),
            "parse failed: {:?}",
            result.errors
        );
        let component = extract_component(&result.module.classes[0])?;
        emit_component(&component)
    }

    #[test]
    fn test_rename_table_entries() {
        assert_eq!(rename_attr("onclick"), "onClick");
        assert_eq!(rename_attr("onchange"), "onChange");
        assert_eq!(rename_attr("onsubmit"), "onSubmit");
    }

    #[test]
    fn test_rename_general_rule() {
        assert_eq!(rename_attr("onblur"), "onBlur");
        assert_eq!(rename_attr("onfocus"), "onFocus");
    }

    #[test]
    fn test_rename_is_idempotent_and_total() {
        for name in ["onClick", "onBlur", "className", "value", "on", "only2"] {
            let once = rename_attr(name);
            assert_eq!(rename_attr(&once), once);
        }
        assert_eq!(rename_attr("className"), "className");
        assert_eq!(rename_attr("on"), "on");
    }

    #[test]
    fn test_stateless_component() {
        let code = emit(
            "\
class Banner(Component):
    def render(self):
        return h1('Welcome')
",
        )
        .unwrap();
        assert_eq!(
            code,
            "function Banner(props) {\n  return React.createElement('h1', null, [\"Welcome\"]);\n}"
        );
    }

    #[test]
    fn test_state_hook_line() {
        let code = emit(
            "\
class Counter(Component):
    def __init__(self):
        self.state = {'count': 0}

    def render(self):
        return div()
",
        )
        .unwrap();
        assert_eq!(
            code,
            "function Counter(props) {\n  const [state, setState] = React.useState({count: 0});\n\n  return React.createElement('div', null);\n}"
        );
    }

    #[test]
    fn test_handler_closure_shape() {
        let code = emit(
            "\
class Counter(Component):
    def __init__(self):
        self.state = {'count': 0}

    def increment(self):
        self.set_state({'count': self.state['count'] + 1})

    def render(self):
        return button('Go', onclick=self.increment)
",
        )
        .unwrap();
        assert!(code.contains(
            "  const increment = () => {\n    setState(prevState => ({...prevState, count: state.count + 1}));\n  };\n"
        ));
        assert!(code.contains("{onClick: increment}"));
    }

    #[test]
    fn test_handler_with_parameter() {
        let code = emit(
            "\
class Field(Component):
    def update(self, event):
        self.set_state({'value': event})

    def render(self):
        return input_field(onchange=self.update)
",
        )
        .unwrap();
        assert!(code.contains("const update = (event) => {"));
        assert!(code.contains("{onChange: update}"));
        assert!(code.contains("React.createElement('input'"));
    }

    #[test]
    fn test_handler_declaration_order_preserved() {
        let code = emit(
            "\
class Multi(Component):
    def zebra(self):
        self.set_state({'z': 1})

    def apple(self):
        self.set_state({'a': 1})

    def render(self):
        return div(onclick=self.zebra, onchange=self.apple)
",
        )
        .unwrap();
        let zebra = code.find("const zebra").unwrap();
        let apple = code.find("const apple").unwrap();
        assert!(zebra < apple);
    }

    #[test]
    fn test_forward_handler_reference() {
        // render may reference a handler defined after it in source
        let code = emit(
            "\
class Late(Component):
    def render(self):
        return button('Go', onclick=self.go)

    def go(self):
        self.set_state({'gone': True})
",
        )
        .unwrap();
        assert!(code.contains("{onClick: go}"));
    }

    #[test]
    fn test_unknown_handler_reported_with_name() {
        let error = emit(
            "\
class Typo(Component):
    def increment(self):
        self.set_state({'n': 1})

    def render(self):
        return button('Go', onclick=self.incrment)
",
        )
        .unwrap_err();
        assert_eq!(
            error.kind,
            TranspileErrorKind::UnknownHandler {
                name: SmolStr::new("incrment")
            }
        );
    }

    #[test]
    fn test_stub_reference_is_unknown() {
        let error = emit(
            "\
class Stubbed(Component):
    def component_did_mount(self):
        pass

    def render(self):
        return div(onclick=self.component_did_mount)
",
        )
        .unwrap_err();
        assert!(matches!(
            error.kind,
            TranspileErrorKind::UnknownHandler { .. }
        ));
    }

    #[test]
    fn test_handler_passed_as_child_code() {
        let code = emit(
            "\
class Inline(Component):
    def go(self):
        self.set_state({'gone': True})

    def render(self):
        return div(self.go)
",
        )
        .unwrap();
        assert!(code.contains("React.createElement('div', null, [go])"));
    }

    #[test]
    fn test_render_local_rejected() {
        let error = emit(
            "\
class Local(Component):
    def render(self):
        greeting = 'hi'
        return div(greeting)
",
        )
        .unwrap_err();
        let TranspileErrorKind::UnsupportedSyntax { method, message } = error.kind else {
            panic!("expected syntax error");
        };
        assert_eq!(method, "render");
        assert!(message.contains("single return"));
    }

    #[test]
    fn test_render_docstring_allowed() {
        let code = emit(
            "\
class Documented(Component):
    def render(self):
        '''The view.'''
        return div()
",
        )
        .unwrap();
        assert!(code.contains("return React.createElement('div', null);"));
    }

    #[test]
    fn test_bare_return_in_handler() {
        let code = emit(
            "\
class Quiet(Component):
    def dismiss(self):
        return

    def render(self):
        return div(onclick=self.dismiss)
",
        )
        .unwrap();
        assert!(code.contains("    return null;\n"));
    }

    #[test]
    fn test_empty_attrs_emit_null() {
        let code = emit(
            "\
class Nested(Component):
    def render(self):
        return div(span('x'))
",
        )
        .unwrap();
        assert!(code.contains("React.createElement('div', null, [React.createElement('span', null, [\"x\"])])"));
    }

    #[test]
    fn test_childless_element_omits_children_argument() {
        let code = emit(
            "\
class Empty(Component):
    def render(self):
        return br()
",
        )
        .unwrap();
        assert!(code.contains("return React.createElement('br', null);"));
    }

    #[test]
    fn test_component_ref_is_unquoted() {
        let code = emit(
            "\
class Page(Component):
    def render(self):
        return div(Header(title='Home'), Footer())
",
        )
        .unwrap();
        assert!(code.contains("React.createElement(Header, {title: \"Home\"})"));
        assert!(code.contains("React.createElement(Footer, null)"));
    }
}
