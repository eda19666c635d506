//! Recursive-descent parser producing the raw tree.
//!
//! Grammar (whitespace and `#` comments are trivia):
//!
//! ```text
//! body   := entry*
//! entry  := IDENT ':' value
//! value  := EXPRESSION ';;'
//!         | scalar ( '{' body '}' )?
//!         | '{' body '}'
//!         | '[' ( item ( ',' item )* ','? )? ']'
//! item   := scalar | IDENT ':' scalar
//! scalar := IDENT | STRING | NUMBER
//! ```

use text_size::TextSize;

use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Lexer, Token, TokenKind};
use super::raw::{
    PositionEntry, PositionTree, RawDocument, RawEntry, RawObject, RawScalar, RawValue,
};
use crate::base::{LineIndex, Position, Span};

/// Parse LookML text into a raw tree and its position tree.
pub fn parse(text: &str) -> Result<RawDocument, ParseError> {
    let mut parser = Parser::new(text);
    let (tree, positions) = parser.parse_body(None)?;
    tracing::trace!(entries = tree.entries.len(), "parsed raw document");
    Ok(RawDocument::new(tree, positions))
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    index: LineIndex,
    text_len: TextSize,
}

type ParseResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: Lexer::new(text).filter(|t| !t.kind.is_trivia()).collect(),
            pos: 0,
            index: LineIndex::new(text),
            text_len: TextSize::of(text),
        }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn position(&self, offset: TextSize) -> Position {
        self.index.position(offset)
    }

    fn span(&self, start: TextSize, end: TextSize) -> Span {
        Span::new(self.position(start), self.position(end))
    }

    fn eof_position(&self) -> Position {
        self.position(self.text_len)
    }

    fn error_at_token(&self, token: Option<&Token<'a>>, expected: &str) -> ParseError {
        let Some(token) = token else {
            return ParseError::new(
                ParseErrorKind::ExpectedValue,
                format!("expected {expected}, found end of input"),
                self.eof_position(),
            );
        };
        let position = self.position(token.range.start());
        match token.kind {
            TokenKind::Error => ParseError::new(
                ParseErrorKind::InvalidCharacter,
                format!("invalid character '{}'", token.text),
                position,
            ),
            TokenKind::UnterminatedString => ParseError::new(
                ParseErrorKind::UnterminatedString,
                "unterminated string literal",
                position,
            ),
            _ => ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("expected {expected}, found '{}'", token.text),
                position,
            ),
        }
    }

    /// Parse entries until EOF (top level) or the `}` closing `open`.
    fn parse_body(&mut self, open: Option<TextSize>) -> ParseResult<(RawObject, PositionTree)> {
        let mut object = RawObject::new();
        let mut positions = PositionTree::default();

        loop {
            match self.peek_kind() {
                None => {
                    if let Some(open) = open {
                        let at = self.position(open);
                        return Err(ParseError::new(
                            ParseErrorKind::UnclosedBrace,
                            format!(
                                "unclosed '{{' opened at line {}, column {}",
                                at.line + 1,
                                at.column + 1
                            ),
                            self.eof_position(),
                        ));
                    }
                    break;
                }
                Some(TokenKind::RBrace) if open.is_some() => break,
                Some(TokenKind::Ident) => {
                    let (entry, position) = self.parse_entry()?;
                    object.push(entry);
                    positions.entries.push(position);
                }
                Some(_) => return Err(self.error_at_token(self.peek(), "a key")),
            }
        }

        Ok((object, positions))
    }

    fn parse_entry(&mut self) -> ParseResult<(RawEntry, PositionEntry)> {
        let Some(key) = self.bump() else {
            return Err(self.error_at_token(None, "a key"));
        };
        let key_span = self.span(key.range.start(), key.range.end());

        match self.peek_kind() {
            Some(TokenKind::Colon) => {
                self.bump();
            }
            _ => {
                let found = self.peek().cloned();
                let expected = format!("':' after '{}'", key.text);
                let mut err = self.error_at_token(found.as_ref(), &expected);
                if err.kind == ParseErrorKind::UnexpectedToken || found.is_none() {
                    err.kind = ParseErrorKind::ExpectedColon;
                }
                return Err(err);
            }
        }

        let mut position = PositionEntry {
            key_span,
            ..PositionEntry::default()
        };
        let key_text = key.text.to_string();

        let (name, value, end) = match self.peek_kind() {
            Some(TokenKind::Expression) => {
                let Some(expr) = self.bump() else {
                    return Err(self.error_at_token(None, "an expression"));
                };
                // the lexer only yields Expression when the `;;` follows
                let terminator = self.bump();
                let end = terminator.map(|t| t.range.end()).unwrap_or(expr.range.end());

                let leading = expr.text.len() - expr.text.trim_start().len();
                let trimmed = expr.text.trim();
                let value_start = expr.range.start() + TextSize::from(leading as u32);
                let value_end = value_start + TextSize::of(trimmed);
                position.value_span = self.span(value_start, value_end);
                (None, RawValue::Expression(trimmed.to_string()), end)
            }
            Some(TokenKind::UnterminatedExpression) => {
                let start = self.peek().map(|t| t.range.start()).unwrap_or(self.text_len);
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedExpression,
                    format!("expression for '{}' is missing its terminating ';;'", key.text),
                    self.position(start),
                ));
            }
            Some(TokenKind::LBrace) => {
                let start = self.peek().map(|t| t.range.start()).unwrap_or(self.text_len);
                let (value, end, children) = self.parse_block()?;
                position.value_span = self.span(start, end);
                position.children = Some(children);
                (None, value, end)
            }
            Some(TokenKind::LBracket) => {
                let (value, items, start, end) = self.parse_list()?;
                position.value_span = self.span(start, end);
                position.items = items;
                (None, value, end)
            }
            Some(TokenKind::Ident | TokenKind::String | TokenKind::Number) => {
                let (scalar, range) = self.parse_scalar()?;
                if self.peek_kind() == Some(TokenKind::LBrace) {
                    // `key: name { ... }`
                    let block_start = self.peek().map(|t| t.range.start()).unwrap_or(range.0);
                    let (value, end, children) = self.parse_block()?;
                    position.name_span = Some(self.span(range.0, range.1));
                    position.value_span = self.span(block_start, end);
                    position.children = Some(children);
                    (Some(scalar.as_text()), value, end)
                } else {
                    position.value_span = self.span(range.0, range.1);
                    (None, RawValue::Scalar(scalar), range.1)
                }
            }
            _ => {
                let found = self.peek().cloned();
                return Err(self.error_at_token(
                    found.as_ref(),
                    &format!("a value after '{}:'", key.text),
                ));
            }
        };

        position.span = self.span(key.range.start(), end);
        Ok((
            RawEntry {
                key: key_text,
                name,
                value,
            },
            position,
        ))
    }

    fn parse_block(&mut self) -> ParseResult<(RawValue, TextSize, PositionTree)> {
        let Some(open) = self.bump() else {
            return Err(self.error_at_token(None, "'{'"));
        };
        let (body, children) = self.parse_body(Some(open.range.start()))?;
        let Some(close) = self.bump() else {
            return Err(self.error_at_token(None, "'}'"));
        };
        Ok((RawValue::Object(body), close.range.end(), children))
    }

    fn parse_list(&mut self) -> ParseResult<(RawValue, Vec<Span>, TextSize, TextSize)> {
        let Some(open) = self.bump() else {
            return Err(self.error_at_token(None, "'['"));
        };
        let mut values = Vec::new();
        let mut items = Vec::new();

        loop {
            match self.peek_kind() {
                Some(TokenKind::RBracket) => break,
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                Some(TokenKind::Ident) if self.nth_kind(1) == Some(TokenKind::Colon) => {
                    // `filters: [orders.status: "complete"]`
                    let (entry, position) = self.parse_pair()?;
                    items.push(position.span);
                    let mut pair = RawObject::new();
                    pair.push(entry);
                    values.push(RawValue::Object(pair));
                }
                Some(TokenKind::Ident | TokenKind::String | TokenKind::Number) => {
                    let (scalar, (start, end)) = self.parse_scalar()?;
                    items.push(self.span(start, end));
                    values.push(RawValue::Scalar(scalar));
                }
                None => {
                    let at = self.position(open.range.start());
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedBracket,
                        format!(
                            "unclosed '[' opened at line {}, column {}",
                            at.line + 1,
                            at.column + 1
                        ),
                        self.eof_position(),
                    ));
                }
                Some(_) => return Err(self.error_at_token(self.peek(), "a list item or ']'")),
            }
        }

        let close_end = self
            .bump()
            .map(|t| t.range.end())
            .unwrap_or(self.text_len);
        Ok((RawValue::List(values), items, open.range.start(), close_end))
    }

    fn parse_pair(&mut self) -> ParseResult<(RawEntry, PositionEntry)> {
        let Some(key) = self.bump() else {
            return Err(self.error_at_token(None, "a key"));
        };
        self.bump(); // ':'
        let (scalar, (start, end)) = self.parse_scalar()?;
        let position = PositionEntry {
            span: self.span(key.range.start(), end),
            key_span: self.span(key.range.start(), key.range.end()),
            value_span: self.span(start, end),
            ..PositionEntry::default()
        };
        Ok((
            RawEntry {
                key: key.text.to_string(),
                name: None,
                value: RawValue::Scalar(scalar),
            },
            position,
        ))
    }

    fn parse_scalar(&mut self) -> ParseResult<(RawScalar, (TextSize, TextSize))> {
        let token = match self.peek_kind() {
            Some(TokenKind::Ident | TokenKind::String | TokenKind::Number) => self.bump(),
            _ => {
                let found = self.peek().cloned();
                return Err(self.error_at_token(found.as_ref(), "a value"));
            }
        };
        let Some(token) = token else {
            return Err(self.error_at_token(None, "a value"));
        };
        let range = (token.range.start(), token.range.end());
        let scalar = match token.kind {
            TokenKind::String => RawScalar::String(unquote(token.text)),
            TokenKind::Number => match token.text.parse::<f64>() {
                Ok(n) => RawScalar::Number(n),
                Err(_) => RawScalar::Ident(token.text.to_string()),
            },
            _ => RawScalar::Ident(token.text.to_string()),
        };
        Ok((scalar, range))
    }
}

/// Strip the surrounding quotes and resolve backslash escapes.
fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
