//! Logos-based lexer for LookML
//!
//! Fast tokenization using the logos crate. The lexer is context sensitive in
//! one place only: the value of an expression key (`sql`, `sql_on`, `html`, ...)
//! is taken verbatim up to the terminating `;;`.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Ident,
    Number,
    String,
    /// A string literal missing its closing quote.
    UnterminatedString,
    /// Raw text of an expression value, up to (not including) `;;`.
    Expression,
    /// An expression value with no terminating `;;`.
    UnterminatedExpression,
    Colon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    DoubleSemicolon,
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Keys whose values are raw expressions terminated by `;;`.
pub fn is_expression_key(key: &str) -> bool {
    key.starts_with("sql")
        || matches!(
            key,
            "html" | "expression" | "expression_custom_filter" | "filter_expression"
        )
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    /// Last significant identifier, used to detect `<expression key>:`.
    last_ident: Option<&'a str>,
    expect_expression: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            last_ident: None,
            expect_expression: false,
        }
    }

    fn lex_expression(&mut self) -> Token<'a> {
        let start = self.inner.span().end;
        let rest = self.inner.remainder();
        let (kind, len) = match rest.find(";;") {
            Some(idx) => (TokenKind::Expression, idx),
            None => (TokenKind::UnterminatedExpression, rest.len()),
        };
        self.inner.bump(len);
        Token {
            kind,
            text: &rest[..len],
            range: TextRange::new(
                TextSize::from(start as u32),
                TextSize::from((start + len) as u32),
            ),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.expect_expression {
            self.expect_expression = false;
            return Some(self.lex_expression());
        }

        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let span = self.inner.span();
        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        match kind {
            TokenKind::Whitespace | TokenKind::Comment => {}
            TokenKind::Ident => self.last_ident = Some(text),
            TokenKind::Colon => {
                self.expect_expression = self.last_ident.is_some_and(is_expression_key);
                self.last_ident = None;
            }
            _ => self.last_ident = None,
        }

        Some(Token {
            kind,
            text,
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    Comment,

    // `+name` is a refinement. Field lists hold dotted names, `-view.field`
    // exclusions and `set*` / `view.*` wildcards.
    #[regex(r"[+-]?[A-Za-z_][A-Za-z0-9_.]*\*?")]
    Ident,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[token(";;")]
    DoubleSemicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::Comment => TokenKind::Comment,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::Number => TokenKind::Number,
            LogosToken::String => TokenKind::String,
            LogosToken::UnterminatedString => TokenKind::UnterminatedString,
            LogosToken::DoubleSemicolon => TokenKind::DoubleSemicolon,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::LBracket => TokenKind::LBracket,
            LogosToken::RBracket => TokenKind::RBracket,
        }
    }
}
