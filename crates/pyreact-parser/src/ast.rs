//! AST for the Python-style component notation.
//!
//! The tree is deliberately small: only the constructs the transpiler
//! understands get dedicated nodes. Every node carries the [`Span`] of
//! the text it was parsed from.

use smol_str::SmolStr;
use source_span::Span;

/// A parsed source file: the classes found at the top level.
///
/// Top-level code that is not a class definition (imports, module
/// docstrings, demo `main` blocks) is skipped during parsing and does
/// not appear here.
#[derive(Debug, Clone)]
pub struct Module {
    pub classes: Vec<ClassDef>,
    pub span: Span,
}

/// A `class Name(Base):` definition and its methods.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub span: Span,
    pub name: SmolStr,
    pub bases: Vec<SmolStr>,
    pub docstring: Option<String>,
    pub methods: Vec<FunctionDef>,
}

/// A `def` inside a class body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub span: Span,
    pub name: SmolStr,
    pub params: Vec<Param>,
    pub docstring: Option<String>,
    pub body: Vec<Stmt>,
}

/// A single parameter, with its default value if one was written.
#[derive(Debug, Clone)]
pub struct Param {
    pub span: Span,
    pub name: SmolStr,
    pub default: Option<Expr>,
}

/// A statement in a method body.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(ExprStmt),
    Assign(AssignStmt),
    Return(ReturnStmt),
    Pass(PassStmt),
    Raise(RaiseStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Pass(s) => s.span,
            Stmt::Raise(s) => s.span,
        }
    }
}

/// An expression evaluated for its effect, e.g. a `self.set_state(...)` call.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub span: Span,
    pub expr: Expr,
}

/// `target = value`. The only assignment the transpiler accepts is
/// `self.state = {...}` inside a constructor, but the parser records
/// any single-target form and lets later stages decide.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub span: Span,
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub span: Span,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct PassStmt {
    pub span: Span,
}

/// `raise` with everything after the keyword skipped. Only used to
/// recognize stub methods.
#[derive(Debug, Clone)]
pub struct RaiseStmt {
    pub span: Span,
}

/// An expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(IntLit),
    Float(FloatLit),
    Str(StrLit),
    FString(FStringLit),
    Bool(BoolLit),
    None(NoneLit),
    Name(NameExpr),
    Attribute(AttributeExpr),
    Subscript(SubscriptExpr),
    Call(CallExpr),
    Dict(DictLit),
    List(ListLit),
    Binary(BinaryExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(e) => e.span,
            Expr::Float(e) => e.span,
            Expr::Str(e) => e.span,
            Expr::FString(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::None(e) => e.span,
            Expr::Name(e) => e.span,
            Expr::Attribute(e) => e.span,
            Expr::Subscript(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Dict(e) => e.span,
            Expr::List(e) => e.span,
            Expr::Binary(e) => e.span,
        }
    }
}

/// An integer literal, kept as source text so emission is verbatim.
/// A leading unary minus is folded into the text.
#[derive(Debug, Clone)]
pub struct IntLit {
    pub span: Span,
    pub text: SmolStr,
}

/// A float literal, kept as source text like [`IntLit`].
#[derive(Debug, Clone)]
pub struct FloatLit {
    pub span: Span,
    pub text: SmolStr,
}

/// A plain string literal with escapes already decoded.
#[derive(Debug, Clone)]
pub struct StrLit {
    pub span: Span,
    pub value: String,
}

/// An f-string split into literal text and embedded expressions.
///
/// `texts` always has exactly one more element than `exprs`; the
/// pieces interleave as `texts[0] exprs[0] texts[1] exprs[1] ...`.
/// Doubled braces have already been collapsed into the text parts.
#[derive(Debug, Clone)]
pub struct FStringLit {
    pub span: Span,
    pub texts: Vec<String>,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct BoolLit {
    pub span: Span,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct NoneLit {
    pub span: Span,
}

/// A bare name reference.
#[derive(Debug, Clone)]
pub struct NameExpr {
    pub span: Span,
    pub name: SmolStr,
}

/// `object.attr`
#[derive(Debug, Clone)]
pub struct AttributeExpr {
    pub span: Span,
    pub object: Box<Expr>,
    pub attr: SmolStr,
}

/// `object[index]`
#[derive(Debug, Clone)]
pub struct SubscriptExpr {
    pub span: Span,
    pub object: Box<Expr>,
    pub index: Box<Expr>,
}

/// `callee(args, kwargs)` with positional and keyword arguments kept
/// in their written order.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub span: Span,
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub kwargs: Vec<Kwarg>,
}

/// A `name=value` argument in a call.
#[derive(Debug, Clone)]
pub struct Kwarg {
    pub span: Span,
    pub name: SmolStr,
    pub value: Expr,
}

/// `{key: value, ...}` with entries in written order.
#[derive(Debug, Clone)]
pub struct DictLit {
    pub span: Span,
    pub entries: Vec<DictEntry>,
}

#[derive(Debug, Clone)]
pub struct DictEntry {
    pub span: Span,
    pub key: Expr,
    pub value: Expr,
}

/// `[item, ...]`
#[derive(Debug, Clone)]
pub struct ListLit {
    pub span: Span,
    pub items: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// `left op right`
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub span: Span,
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}
