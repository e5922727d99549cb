//! Recursive-descent parser for component classes.
//!
//! Block structure comes from columns rather than indent tokens: the
//! parser records the column of the first statement in a block and
//! requires every sibling to start at the same column. A statement at
//! the parent's column or left of it closes the block.
//!
//! Recovery is line-based. When a statement fails to parse, the error
//! is recorded and the parser skips to the start of the next line
//! (tracking bracket depth so a multi-line call is skipped whole) and
//! continues with the rest of the file.

use smol_str::SmolStr;
use source_span::{LineIndex, Span};
use text_size::TextSize;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};

/// Everything the parser produced for one source file.
///
/// `module` is always populated; classes that failed to parse are
/// simply absent from it, with the reasons in `errors`.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

/// Parses one source file.
pub fn parse(source: &str) -> ParseResult {
    let (module, errors) = Parser::new(source).parse();
    ParseResult { module, errors }
}

pub struct Parser<'a> {
    source: &'a str,
    line_index: LineIndex,
    tokens: Vec<Token>,
    pos: usize,
    prev_end: TextSize,
    errors: Vec<ParseError>,
    eof_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let end = TextSize::of(source);
        Self {
            source,
            line_index: LineIndex::new(source),
            tokens,
            pos: 0,
            prev_end: TextSize::from(0),
            errors: Vec::new(),
            eof_token: Token::new(TokenKind::Eof, Span { start: end, end }),
        }
    }

    pub fn parse(mut self) -> (Module, Vec<ParseError>) {
        let mut classes = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::Eof) {
                break;
            }
            if self.check(TokenKind::Class) {
                if let Some(class) = self.parse_class() {
                    classes.push(class);
                }
            } else {
                // Imports, module docstrings, demo code under a main
                // guard. None of it is part of the component model.
                self.skip_to_next_line();
            }
        }
        let span = Span::new(0u32, TextSize::of(self.source));
        (Module { classes, span }, self.errors)
    }

    // === Class and method structure ===

    fn parse_class(&mut self) -> Option<ClassDef> {
        let class_token = self.current();
        let class_col = self.col_of(&class_token);
        let start = class_token.span.start;
        self.advance();

        let Some((name, _)) = self.eat_ident() else {
            self.error_at_current("class name");
            self.skip_to_next_line();
            return None;
        };

        let mut bases = Vec::new();
        if self.eat(TokenKind::LParen) {
            self.skip_newlines();
            while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
                let Some((base, _)) = self.eat_ident() else {
                    self.error_at_current("base class name");
                    self.skip_to_next_line();
                    return None;
                };
                bases.push(base);
                self.skip_newlines();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
            if !self.expect(TokenKind::RParen) {
                self.skip_to_next_line();
                return None;
            }
        }

        if !self.expect(TokenKind::Colon) {
            self.skip_to_next_line();
            return None;
        }
        if !self.check(TokenKind::Eof) && !self.expect(TokenKind::Newline) {
            self.skip_to_next_line();
        }

        let (docstring, methods) = self.parse_class_body(class_col);
        Some(ClassDef {
            span: Span::new(start, self.prev_end),
            name,
            bases,
            docstring,
            methods,
        })
    }

    fn parse_class_body(&mut self, class_col: u32) -> (Option<String>, Vec<FunctionDef>) {
        let mut docstring = None;
        let mut methods = Vec::new();
        let mut body_col: Option<u32> = None;
        let mut first = true;
        loop {
            self.skip_newlines();
            if self.check(TokenKind::Eof) {
                break;
            }
            let col = self.col_of(&self.current());
            if col <= class_col {
                break;
            }
            match body_col {
                Some(expected) if col != expected => {
                    self.indentation_error(expected, col);
                    self.skip_to_next_line();
                    continue;
                }
                Some(_) => {}
                None => body_col = Some(col),
            }
            if first && self.at_docstring() {
                docstring = Some(self.take_docstring());
                first = false;
                continue;
            }
            first = false;
            if self.check(TokenKind::Def) {
                if let Some(method) = self.parse_function(col) {
                    methods.push(method);
                }
            } else {
                // Class attributes and other statements are outside
                // the component model.
                self.skip_to_next_line();
            }
        }
        (docstring, methods)
    }

    fn parse_function(&mut self, def_col: u32) -> Option<FunctionDef> {
        let start = self.current().span.start;
        self.advance();

        let Some((name, _)) = self.eat_ident() else {
            self.error_at_current("method name");
            self.skip_to_next_line();
            return None;
        };
        if !self.expect(TokenKind::LParen) {
            self.skip_to_next_line();
            return None;
        }
        let params = self.parse_params();
        if !self.expect(TokenKind::RParen) {
            self.skip_to_next_line();
            return None;
        }
        if !self.expect(TokenKind::Colon) {
            self.skip_to_next_line();
            return None;
        }
        if !self.check(TokenKind::Eof) && !self.expect(TokenKind::Newline) {
            self.skip_to_next_line();
        }

        let (docstring, body) = self.parse_block(def_col);
        Some(FunctionDef {
            span: Span::new(start, self.prev_end),
            name,
            params,
            docstring,
            body,
        })
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            let Some((name, span)) = self.eat_ident() else {
                self.error_at_current("parameter name");
                break;
            };
            let default = if self.eat(TokenKind::Eq) {
                self.parse_expr()
            } else {
                None
            };
            params.push(Param {
                span,
                name,
                default,
            });
            self.skip_newlines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        params
    }

    /// Parses an indented statement block, returning its docstring
    /// (when the first line is a bare string) and statements.
    fn parse_block(&mut self, parent_col: u32) -> (Option<String>, Vec<Stmt>) {
        let mut docstring = None;
        let mut stmts = Vec::new();
        let mut block_col: Option<u32> = None;
        let mut first = true;
        loop {
            self.skip_newlines();
            if self.check(TokenKind::Eof) {
                break;
            }
            let col = self.col_of(&self.current());
            if col <= parent_col {
                break;
            }
            match block_col {
                Some(expected) if col != expected => {
                    self.indentation_error(expected, col);
                    self.skip_to_next_line();
                    continue;
                }
                Some(_) => {}
                None => block_col = Some(col),
            }
            if first && self.at_docstring() {
                docstring = Some(self.take_docstring());
                first = false;
                continue;
            }
            first = false;
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.skip_to_next_line();
            }
        }
        (docstring, stmts)
    }

    fn at_docstring(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Str | TokenKind::TripleStr
        ) && matches!(self.peek_kind(1), TokenKind::Newline | TokenKind::Eof)
    }

    fn take_docstring(&mut self) -> String {
        let text = self.current_text().to_string();
        self.advance();
        self.eat(TokenKind::Newline);
        decode_string(&text)
    }

    // === Statements ===

    fn parse_statement(&mut self) -> Option<Stmt> {
        let start = self.current().span;
        match self.current_kind() {
            TokenKind::Return => {
                self.advance();
                let value = if matches!(self.current_kind(), TokenKind::Newline | TokenKind::Eof) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let end = self.prev_end;
                if !self.expect_end_of_statement() {
                    return None;
                }
                Some(Stmt::Return(ReturnStmt {
                    span: Span::new(start.start, end),
                    value,
                }))
            }
            TokenKind::Pass => {
                self.advance();
                if !self.expect_end_of_statement() {
                    return None;
                }
                Some(Stmt::Pass(PassStmt { span: start }))
            }
            TokenKind::Raise => {
                // The raised expression never matters, only that the
                // method body consists of stubs.
                self.advance();
                self.skip_to_next_line();
                Some(Stmt::Raise(RaiseStmt { span: start }))
            }
            _ => {
                let expr = self.parse_expr()?;
                if self.eat(TokenKind::Eq) {
                    let value = self.parse_expr()?;
                    let end = self.prev_end;
                    if !self.expect_end_of_statement() {
                        return None;
                    }
                    Some(Stmt::Assign(AssignStmt {
                        span: Span::new(start.start, end),
                        target: expr,
                        value,
                    }))
                } else {
                    let end = self.prev_end;
                    if !self.expect_end_of_statement() {
                        return None;
                    }
                    Some(Stmt::Expr(ExprStmt {
                        span: Span::new(start.start, end),
                        expr,
                    }))
                }
            }
        }
    }

    fn expect_end_of_statement(&mut self) -> bool {
        if self.check(TokenKind::Eof) || self.eat(TokenKind::Newline) {
            return true;
        }
        self.error_at_current("newline");
        false
    }

    // === Expressions ===

    fn parse_expr(&mut self) -> Option<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.skip_newlines();
            let right = self.parse_term()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary(BinaryExpr {
                span,
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            self.skip_newlines();
            let right = self.parse_unary()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary(BinaryExpr {
                span,
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if self.check(TokenKind::Minus) {
            let minus = self.current();
            self.advance();
            let token = self.current();
            let text = SmolStr::new(format!("-{}", self.current_text()));
            let span = Span::new(minus.span.start, token.span.end);
            return match token.kind {
                TokenKind::Int => {
                    self.advance();
                    Some(Expr::Int(IntLit { span, text }))
                }
                TokenKind::Float => {
                    self.advance();
                    Some(Expr::Float(FloatLit { span, text }))
                }
                _ => {
                    self.error_at_current("number");
                    None
                }
            };
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let Some((attr, attr_span)) = self.eat_ident() else {
                        self.error_at_current("attribute name");
                        return None;
                    };
                    let span = Span::new(expr.span().start, attr_span.end);
                    expr = Expr::Attribute(AttributeExpr {
                        span,
                        object: Box::new(expr),
                        attr,
                    });
                }
                TokenKind::LParen => {
                    self.advance();
                    expr = self.parse_call_args(expr)?;
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.parse_expr()?;
                    self.skip_newlines();
                    if !self.expect(TokenKind::RBracket) {
                        return None;
                    }
                    let span = Span::new(expr.span().start, self.prev_end);
                    expr = Expr::Subscript(SubscriptExpr {
                        span,
                        object: Box::new(expr),
                        index: Box::new(index),
                    });
                }
                _ => break,
            }
        }
        Some(expr)
    }

    /// Parses call arguments after the opening paren was consumed.
    /// Newlines inside the parens are implicit line joins.
    fn parse_call_args(&mut self, callee: Expr) -> Option<Expr> {
        let start = callee.span().start;
        let mut args = Vec::new();
        let mut kwargs: Vec<Kwarg> = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Ident) && self.peek_kind(1) == TokenKind::Eq {
                let kw_start = self.current().span.start;
                let name = SmolStr::new(self.current_text());
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                kwargs.push(Kwarg {
                    span: Span::new(kw_start, value.span().end),
                    name,
                    value,
                });
            } else {
                if !kwargs.is_empty() {
                    self.errors.push(ParseError::new(
                        ParseErrorKind::SyntaxError {
                            message: "positional argument after keyword argument".into(),
                        },
                        self.current().span,
                    ));
                    return None;
                }
                args.push(self.parse_expr()?);
            }
            self.skip_newlines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        if !self.expect(TokenKind::RParen) {
            return None;
        }
        Some(Expr::Call(CallExpr {
            span: Span::new(start, self.prev_end),
            callee: Box::new(callee),
            args,
            kwargs,
        }))
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.current();
        match token.kind {
            TokenKind::Int => {
                let text = SmolStr::new(self.current_text());
                self.advance();
                Some(Expr::Int(IntLit {
                    span: token.span,
                    text,
                }))
            }
            TokenKind::Float => {
                let text = SmolStr::new(self.current_text());
                self.advance();
                Some(Expr::Float(FloatLit {
                    span: token.span,
                    text,
                }))
            }
            TokenKind::Str | TokenKind::TripleStr => {
                let value = decode_string(self.current_text());
                self.advance();
                Some(Expr::Str(StrLit {
                    span: token.span,
                    value,
                }))
            }
            TokenKind::FStr => self.parse_fstring(),
            TokenKind::True => {
                self.advance();
                Some(Expr::Bool(BoolLit {
                    span: token.span,
                    value: true,
                }))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::Bool(BoolLit {
                    span: token.span,
                    value: false,
                }))
            }
            TokenKind::None => {
                self.advance();
                Some(Expr::None(NoneLit { span: token.span }))
            }
            TokenKind::Ident => {
                let name = SmolStr::new(self.current_text());
                self.advance();
                Some(Expr::Name(NameExpr {
                    span: token.span,
                    name,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let expr = self.parse_expr()?;
                self.skip_newlines();
                if !self.expect(TokenKind::RParen) {
                    return None;
                }
                Some(expr)
            }
            TokenKind::LBrace => self.parse_dict(),
            TokenKind::LBracket => self.parse_list(),
            _ => {
                self.error_at_current("expression");
                None
            }
        }
    }

    fn parse_dict(&mut self) -> Option<Expr> {
        let start = self.current().span.start;
        self.advance();
        let mut entries = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let key = self.parse_expr()?;
            if !self.expect(TokenKind::Colon) {
                return None;
            }
            self.skip_newlines();
            let value = self.parse_expr()?;
            entries.push(DictEntry {
                span: Span::new(key.span().start, value.span().end),
                key,
                value,
            });
            self.skip_newlines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        if !self.expect(TokenKind::RBrace) {
            return None;
        }
        Some(Expr::Dict(DictLit {
            span: Span::new(start, self.prev_end),
            entries,
        }))
    }

    fn parse_list(&mut self) -> Option<Expr> {
        let start = self.current().span.start;
        self.advance();
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::RBracket) && !self.check(TokenKind::Eof) {
            items.push(self.parse_expr()?);
            self.skip_newlines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        if !self.expect(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::List(ListLit {
            span: Span::new(start, self.prev_end),
            items,
        }))
    }

    // === F-strings ===

    /// Splits an f-string token into literal text and embedded
    /// expressions. The expression chunks are re-lexed in place so
    /// their spans point into the original source.
    fn parse_fstring(&mut self) -> Option<Expr> {
        let token = self.current();
        let raw = self.current_text().to_string();
        self.advance();

        // strip the `f` prefix and the quotes
        let inner_start = u32::from(token.span.start) as usize + 2;
        let inner = &raw[2..raw.len() - 1];

        let mut texts = Vec::new();
        let mut exprs = Vec::new();
        let mut text = String::new();
        let mut chars = inner.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some(&(_, '{'))) {
                        chars.next();
                        text.push('{');
                        continue;
                    }
                    let expr_start = inner_start + i + 1;
                    let mut expr_end = None;
                    let mut depth = 1u32;
                    for (j, cj) in chars.by_ref() {
                        match cj {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    expr_end = Some(inner_start + j);
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    let Some(expr_end) = expr_end else {
                        self.errors.push(ParseError::new(
                            ParseErrorKind::InvalidFString {
                                message: "unbalanced '{' in replacement field".into(),
                            },
                            token.span,
                        ));
                        return None;
                    };
                    texts.push(std::mem::take(&mut text));
                    let expr = self.parse_embedded(expr_start, expr_end, token.span)?;
                    exprs.push(expr);
                }
                '}' => {
                    if matches!(chars.peek(), Some(&(_, '}'))) {
                        chars.next();
                        text.push('}');
                        continue;
                    }
                    self.errors.push(ParseError::new(
                        ParseErrorKind::InvalidFString {
                            message: "single '}' outside a replacement field".into(),
                        },
                        token.span,
                    ));
                    return None;
                }
                '\\' => match chars.next() {
                    Some((_, esc)) => push_escape(&mut text, esc),
                    None => text.push('\\'),
                },
                _ => text.push(c),
            }
        }
        texts.push(text);

        Some(Expr::FString(FStringLit {
            span: token.span,
            texts,
            exprs,
        }))
    }

    /// Parses one replacement-field expression by swapping in a token
    /// stream lexed from `source[start..end]`, with spans shifted so
    /// they stay absolute.
    fn parse_embedded(&mut self, start: usize, end: usize, fstring_span: Span) -> Option<Expr> {
        let chunk = &self.source[start..end];
        let shift = TextSize::from(start as u32);
        let mut tokens: Vec<Token> = Lexer::new(chunk).collect();
        for token in &mut tokens {
            token.span = Span::new(token.span.start + shift, token.span.end + shift);
        }
        let eof = Token::new(TokenKind::Eof, Span::new(end as u32, end as u32));

        let saved_tokens = std::mem::replace(&mut self.tokens, tokens);
        let saved_pos = std::mem::replace(&mut self.pos, 0);
        let saved_eof = std::mem::replace(&mut self.eof_token, eof);
        let saved_prev_end = self.prev_end;

        let expr = self.parse_expr();
        let trailing = !self.check(TokenKind::Eof);

        self.tokens = saved_tokens;
        self.pos = saved_pos;
        self.eof_token = saved_eof;
        self.prev_end = saved_prev_end;

        if trailing {
            self.errors.push(ParseError::new(
                ParseErrorKind::InvalidFString {
                    message: "unexpected text after expression in replacement field".into(),
                },
                fstring_span,
            ));
            return None;
        }
        expr
    }

    // === Token helpers ===

    fn current(&self) -> Token {
        self.tokens.get(self.pos).copied().unwrap_or(self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current_text(&self) -> &'a str {
        &self.source[std::ops::Range::<usize>::from(self.current().span)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.prev_end = self.tokens[self.pos].span.end;
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self) -> Option<(SmolStr, Span)> {
        if self.check(TokenKind::Ident) {
            let span = self.current().span;
            let name = SmolStr::new(self.current_text());
            self.advance();
            Some((name, span))
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_at_current(kind.name());
        false
    }

    fn error_at_current(&mut self, expected: &str) {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.name().to_string(),
            }
        };
        self.errors.push(ParseError::new(kind, token.span));
    }

    fn indentation_error(&mut self, expected: u32, found: u32) {
        self.errors.push(ParseError::new(
            ParseErrorKind::InvalidIndentation {
                message: format!(
                    "expected column {}, found column {}",
                    expected + 1,
                    found + 1
                ),
            },
            self.current().span,
        ));
    }

    fn col_of(&self, token: &Token) -> u32 {
        self.line_index.line_col(token.span.start).col
    }

    fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline) {}
    }

    /// Skips to the start of the next logical line, balancing
    /// brackets so that a multi-line expression is skipped whole.
    fn skip_to_next_line(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                TokenKind::Newline => {
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                _ => self.advance(),
            }
        }
    }
}

fn decode_string(raw: &str) -> String {
    let quote_len = if raw.starts_with("'''") || raw.starts_with("\"\"\"") {
        3
    } else {
        1
    };
    let inner = &raw[quote_len..raw.len() - quote_len];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(esc) => push_escape(&mut out, esc),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn push_escape(out: &mut String, esc: char) {
    match esc {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        '\\' => out.push('\\'),
        '\'' => out.push('\''),
        '"' => out.push('"'),
        '0' => out.push('\0'),
        // Python keeps unknown escapes as written
        other => {
            out.push('\\');
            out.push(other);
        }
    }
}
