//! Element tree construction.
//!
//! A render body returns a nest of tag-helper calls. This module
//! turns that call tree into [`ElementNode`]s: positional arguments
//! become children, keyword arguments become attributes. Handler
//! references in attributes are kept symbolic and resolved against
//! the component's handler list at emission time.

use indexmap::IndexMap;
use pyreact_parser::ast::{Expr, Kwarg};
use smol_str::SmolStr;
use source_span::Span;

use crate::error::TranspileError;
use crate::expr::{expr_kind_name, ExprTranslator};

/// Tag helpers the notation recognizes, paired with the tag written
/// into `React.createElement`. Anything else is treated as a
/// reference to another component.
const KNOWN_TAGS: &[(&str, &str)] = &[
    ("div", "div"),
    ("h1", "h1"),
    ("h2", "h2"),
    ("h3", "h3"),
    ("p", "p"),
    ("span", "span"),
    ("button", "button"),
    ("input_field", "input"),
    ("img", "img"),
    ("a", "a"),
    ("ul", "ul"),
    ("ol", "ol"),
    ("li", "li"),
    ("form", "form"),
    ("label", "label"),
    ("select", "select"),
    ("option", "option"),
    ("textarea", "textarea"),
    ("br", "br"),
    ("hr", "hr"),
];

fn html_tag(name: &str) -> Option<&'static str> {
    KNOWN_TAGS
        .iter()
        .find(|(helper, _)| *helper == name)
        .map(|(_, tag)| *tag)
}

/// One node of the render tree.
#[derive(Debug, Clone)]
pub(crate) struct ElementNode {
    /// Tag name, or the component name when `component_ref` is set.
    pub tag: SmolStr,
    /// True when the call refers to another component rather than an
    /// HTML tag helper.
    pub component_ref: bool,
    /// Attributes in written order. A repeated name overwrites the
    /// earlier value in place.
    pub attrs: IndexMap<SmolStr, AttrValue>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone)]
pub(crate) enum AttrValue {
    /// Already-translated JavaScript.
    Code(String),
    /// A `self.<method>` reference, resolved at emission time.
    HandlerRef { name: SmolStr, span: Span },
}

#[derive(Debug, Clone)]
pub(crate) enum Child {
    Element(ElementNode),
    /// A plain string child, emitted as a string literal.
    Text(String),
    /// Any other expression child, already translated.
    Code(String),
}

/// Builds the element tree for the expression a render method returns.
pub(crate) fn build_element_tree(
    expr: &Expr,
    cx: &ExprTranslator<'_>,
) -> Result<ElementNode, TranspileError> {
    let Expr::Call(call) = expr else {
        return Err(cx.unsupported(
            expr.span(),
            format!(
                "render must return an element, not a {}",
                expr_kind_name(expr)
            ),
        ));
    };
    let Expr::Name(callee) = call.callee.as_ref() else {
        return Err(cx.unsupported(
            call.callee.span(),
            format!(
                "a {} cannot produce an element",
                expr_kind_name(&call.callee)
            ),
        ));
    };

    let (tag, component_ref) = match html_tag(&callee.name) {
        Some(tag) => (SmolStr::new(tag), false),
        None => (callee.name.clone(), true),
    };

    let mut node = ElementNode {
        tag,
        component_ref,
        attrs: IndexMap::new(),
        children: Vec::new(),
    };
    for arg in &call.args {
        node.children.push(build_child(arg, cx)?);
    }
    for kwarg in &call.kwargs {
        let value = attr_value(kwarg, cx)?;
        node.attrs.insert(kwarg.name.clone(), value);
    }
    Ok(node)
}

fn build_child(expr: &Expr, cx: &ExprTranslator<'_>) -> Result<Child, TranspileError> {
    match expr {
        Expr::Str(lit) => Ok(Child::Text(lit.value.clone())),
        Expr::Call(call) if matches!(call.callee.as_ref(), Expr::Name(_)) => {
            Ok(Child::Element(build_element_tree(expr, cx)?))
        }
        _ => Ok(Child::Code(cx.translate_value(expr)?)),
    }
}

fn attr_value(kwarg: &Kwarg, cx: &ExprTranslator<'_>) -> Result<AttrValue, TranspileError> {
    if let Expr::Attribute(attr) = &kwarg.value {
        if let Expr::Name(obj) = attr.object.as_ref() {
            if obj.name == "self" && attr.attr != "state" && attr.attr != "props" {
                return Ok(AttrValue::HandlerRef {
                    name: attr.attr.clone(),
                    span: attr.span,
                });
            }
        }
    }
    Ok(AttrValue::Code(cx.translate_value(&kwarg.value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pyreact_parser::ast::Stmt;

    fn render_return(source: &str) -> Expr {
        let result = pyreact_parser::parse(source);
        assert!(
            result.errors.is_empty(),
            "parse failed: {:?}",
            result.errors
        );
        let render = result.module.classes[0]
            .methods
            .iter()
            .find(|m| m.name == "render")
            .expect("no render method");
        let Stmt::Return(ret) = &render.body[0] else {
            panic!("expected return");
        };
        ret.value.clone().expect("return without value")
    }

    struct Fixture {
        component: SmolStr,
        method: SmolStr,
        params: Vec<SmolStr>,
        handlers: Vec<SmolStr>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                component: SmolStr::new("T"),
                method: SmolStr::new("render"),
                params: Vec::new(),
                handlers: vec![SmolStr::new("submit")],
            }
        }

        fn translator(&self) -> ExprTranslator<'_> {
            ExprTranslator {
                component: &self.component,
                method: &self.method,
                params: &self.params,
                handlers: &self.handlers,
            }
        }
    }

    #[test]
    fn test_known_tag_table() {
        assert_eq!(html_tag("div"), Some("div"));
        assert_eq!(html_tag("input_field"), Some("input"));
        assert_eq!(html_tag("Widget"), None);
    }

    #[test]
    fn test_children_and_attrs_split() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return form(label('Name'), input_field(value='x'), onsubmit=self.submit)
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        assert_eq!(node.tag, "form");
        assert!(!node.component_ref);
        assert_eq!(node.children.len(), 2);
        let attr_names: Vec<&str> = node.attrs.keys().map(|k| k.as_str()).collect();
        assert_eq!(attr_names, vec!["onsubmit"]);
        let Child::Element(input) = &node.children[1] else {
            panic!("expected element child");
        };
        assert_eq!(input.tag, "input");
    }

    #[test]
    fn test_unknown_tag_is_component_ref() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return div(Header(), Footer())
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        let Child::Element(header) = &node.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(header.tag, "Header");
        assert!(header.component_ref);
    }

    #[test]
    fn test_handler_attr_stays_symbolic() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return button('Go', onclick=self.submit)
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        let AttrValue::HandlerRef { name, .. } = &node.attrs["onclick"] else {
            panic!("expected handler reference");
        };
        assert_eq!(name, "submit");
    }

    #[test]
    fn test_unresolvable_handler_is_kept_for_later() {
        // Names that do not resolve still build; emission reports them.
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return button('Go', onclick=self.missing)
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        assert!(matches!(
            node.attrs["onclick"],
            AttrValue::HandlerRef { .. }
        ));
    }

    #[test]
    fn test_repeated_attr_overwrites_in_place() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return div(className='a', title='t', className='b')
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        let names: Vec<&str> = node.attrs.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["className", "title"]);
        let AttrValue::Code(code) = &node.attrs["className"] else {
            panic!("expected code attr");
        };
        assert_eq!(code, "\"b\"");
    }

    #[test]
    fn test_expression_children_translate() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return h1(f\"Total: {self.state['total']}\")
",
        );
        let fixture = Fixture::new();
        let node = build_element_tree(&expr, &fixture.translator()).unwrap();
        let Child::Code(code) = &node.children[0] else {
            panic!("expected code child");
        };
        assert_eq!(code, "`Total: ${state.total}`");
    }

    #[test]
    fn test_non_call_render_value_rejected() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return 'just text'
",
        );
        let fixture = Fixture::new();
        let error = build_element_tree(&expr, &fixture.translator()).unwrap_err();
        assert!(error.to_string().contains("render must return an element"));
    }

    #[test]
    fn test_method_call_callee_rejected() {
        let expr = render_return(
            "\
class T(Component):
    def render(self):
        return self.make_tree()
",
        );
        let fixture = Fixture::new();
        let error = build_element_tree(&expr, &fixture.translator()).unwrap_err();
        assert!(error.to_string().contains("cannot produce an element"));
    }
}
