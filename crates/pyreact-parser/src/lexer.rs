//! Tokenizer for the Python-style component notation.
//!
//! Built on [`logos`]. Horizontal whitespace and `#` comments are
//! skipped; newlines are real tokens because the parser derives block
//! structure from line starts. Indentation itself is not tokenized,
//! the parser measures the column of the first token on each line.

use logos::Logos;
use source_span::Span;
use text_size::TextSize;

fn lex_triple_single(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_triple(lex, "'''")
}

fn lex_triple_double(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_triple(lex, "\"\"\"")
}

/// Consumes up to and including the closing quote. Returns false when
/// the string never terminates, which surfaces as an error token.
fn lex_triple(lex: &mut logos::Lexer<TokenKind>, quote: &str) -> bool {
    match lex.remainder().find(quote) {
        Some(end) => {
            lex.bump(end + quote.len());
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
pub enum TokenKind {
    // === Keywords ===
    #[token("class", priority = 5)]
    Class,
    #[token("def", priority = 5)]
    Def,
    #[token("return", priority = 5)]
    Return,
    #[token("pass", priority = 5)]
    Pass,
    #[token("raise", priority = 5)]
    Raise,
    #[token("import", priority = 5)]
    Import,
    #[token("from", priority = 5)]
    From,
    #[token("True", priority = 5)]
    True,
    #[token("False", priority = 5)]
    False,
    #[token("None", priority = 5)]
    None,

    // === Punctuation ===
    #[token("(", priority = 10)]
    LParen,
    #[token(")", priority = 10)]
    RParen,
    #[token("[", priority = 10)]
    LBracket,
    #[token("]", priority = 10)]
    RBracket,
    #[token("{", priority = 10)]
    LBrace,
    #[token("}", priority = 10)]
    RBrace,
    #[token(":", priority = 10)]
    Colon,
    #[token(",", priority = 10)]
    Comma,
    #[token(".", priority = 10)]
    Dot,
    #[token("=", priority = 10)]
    Eq,
    #[token("+", priority = 10)]
    Plus,
    #[token("-", priority = 10)]
    Minus,
    #[token("*", priority = 10)]
    Star,
    #[token("/", priority = 10)]
    Slash,
    #[token("\n", priority = 10)]
    Newline,

    // === Literals and names ===
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 4)]
    Ident,
    #[regex(r"[0-9]+\.[0-9]+", priority = 4)]
    Float,
    #[regex(r"[0-9]+", priority = 4)]
    Int,
    #[regex(r#""([^"\\\n]|\\.)*""#, priority = 6)]
    #[regex(r"'([^'\\\n]|\\.)*'", priority = 6)]
    Str,
    #[token("'''", lex_triple_single)]
    #[token("\"\"\"", lex_triple_double)]
    TripleStr,
    #[regex(r#"f"([^"\\\n]|\\.)*""#, priority = 7)]
    #[regex(r"f'([^'\\\n]|\\.)*'", priority = 7)]
    FStr,

    /// Synthesized at the end of input.
    Eof,

    /// Anything the lexer could not recognize.
    #[default]
    Error,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Class => "'class'",
            TokenKind::Def => "'def'",
            TokenKind::Return => "'return'",
            TokenKind::Pass => "'pass'",
            TokenKind::Raise => "'raise'",
            TokenKind::Import => "'import'",
            TokenKind::From => "'from'",
            TokenKind::True => "'True'",
            TokenKind::False => "'False'",
            TokenKind::None => "'None'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Eq => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Newline => "newline",
            TokenKind::Ident => "identifier",
            TokenKind::Float => "number",
            TokenKind::Int => "number",
            TokenKind::Str => "string",
            TokenKind::TripleStr => "string",
            TokenKind::FStr => "f-string",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A single token with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Iterator over the tokens of a source text.
///
/// Emits exactly one [`TokenKind::Eof`] token after the input is
/// exhausted, then returns `None`.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    source: &'a str,
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            eof_emitted: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The text of a previously produced token.
    pub fn slice(&self, token: &Token) -> &'a str {
        &self.source[std::ops::Range::<usize>::from(token.span)]
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.inner.next() {
            Some(result) => {
                let range = self.inner.span();
                let span = Span::new(range.start as u32, range.end as u32);
                let kind = result.unwrap_or(TokenKind::Error);
                Some(Token::new(kind, span))
            }
            None => {
                if self.eof_emitted {
                    return None;
                }
                self.eof_emitted = true;
                let end = TextSize::of(self.source);
                Some(Token::new(TokenKind::Eof, Span { start: end, end }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        while let Some(token) = lexer.next() {
            if token.kind != TokenKind::Eof {
                out.push(lexer.slice(&token).to_string());
            }
        }
        out
    }

    #[test]
    fn test_class_header() {
        assert_eq!(
            kinds("class Counter(Component):"),
            vec![
                TokenKind::Class,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_def_with_default() {
        assert_eq!(
            kinds("def __init__(self, props=None):"),
            vec![
                TokenKind::Def,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::None,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_state_dict() {
        assert_eq!(
            kinds("self.state = {'count': 0}"),
            vec![
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::LBrace,
                TokenKind::Str,
                TokenKind::Colon,
                TokenKind::Int,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_fstring_is_one_token() {
        assert_eq!(
            kinds(r#"f"Count: {self.state['count']}""#),
            vec![TokenKind::FStr]
        );
    }

    #[test]
    fn test_fstring_prefix_does_not_swallow_idents() {
        // A lone `f` or a name starting with `f` is still an identifier.
        assert_eq!(kinds("f"), vec![TokenKind::Ident]);
        assert_eq!(kinds("form"), vec![TokenKind::Ident]);
    }

    #[test]
    fn test_triple_quoted_string() {
        let source = "'''A counter.\n\nTwo lines.'''";
        assert_eq!(kinds(source), vec![TokenKind::TripleStr]);
        assert_eq!(texts(source), vec![source.to_string()]);
    }

    #[test]
    fn test_unterminated_triple_quote_is_error() {
        assert_eq!(kinds("'''never closed"), vec![TokenKind::Error]);
    }

    #[test]
    fn test_empty_and_escaped_strings() {
        assert_eq!(kinds("''"), vec![TokenKind::Str]);
        assert_eq!(kinds(r"'don\'t'"), vec![TokenKind::Str]);
        assert_eq!(kinds(r#""say \"hi\"""#), vec![TokenKind::Str]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(
            kinds("pass  # trailing comment\n# full line\n"),
            vec![TokenKind::Pass, TokenKind::Newline, TokenKind::Newline]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Int]);
        assert_eq!(kinds("3.14"), vec![TokenKind::Float]);
        assert_eq!(
            kinds("-1"),
            vec![TokenKind::Minus, TokenKind::Int]
        );
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(kinds("class"), vec![TokenKind::Class]);
        assert_eq!(kinds("classy"), vec![TokenKind::Ident]);
        assert_eq!(kinds("render"), vec![TokenKind::Ident]);
        assert_eq!(kinds("True"), vec![TokenKind::True]);
        assert_eq!(kinds("true"), vec![TokenKind::Ident]);
    }

    #[test]
    fn test_eof_token_emitted_once() {
        let tokens: Vec<Token> = Lexer::new("pass").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert!(tokens[1].span.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            kinds("pass\r\npass\r\n"),
            vec![
                TokenKind::Pass,
                TokenKind::Newline,
                TokenKind::Pass,
                TokenKind::Newline
            ]
        );
    }
}
