//! Semantic tokens: syntax highlighting from the lexer plus the LookML
//! structure.
//!
//! Tokens are produced straight from the token stream, so a document that
//! does not parse still gets highlighted.

use crate::base::{LineIndex, TextRange, TextSize};
use crate::hir::{AnalysisConfig, extract_embedded_references};
use crate::parser::{Token, TokenKind, tokenize};

/// Token type legend, in LSP index order.
pub const TOKEN_TYPES: &[&str] = &[
    "class",
    "function",
    "variable",
    "property",
    "parameter",
    "string",
    "number",
    "keyword",
    "comment",
    "operator",
];

/// Token modifier legend, in bit order.
pub const TOKEN_MODIFIERS: &[&str] = &[
    "declaration",
    "definition",
    "readonly",
    "static",
    "deprecated",
    "modification",
    "documentation",
    "defaultLibrary",
];

/// Token type for semantic highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Class,
    Function,
    Variable,
    Property,
    Parameter,
    String,
    Number,
    Keyword,
    Comment,
    Operator,
}

impl TokenType {
    /// Convert to LSP token type index.
    pub fn to_lsp_index(self) -> u32 {
        match self {
            TokenType::Class => 0,
            TokenType::Function => 1,
            TokenType::Variable => 2,
            TokenType::Property => 3,
            TokenType::Parameter => 4,
            TokenType::String => 5,
            TokenType::Number => 6,
            TokenType::Keyword => 7,
            TokenType::Comment => 8,
            TokenType::Operator => 9,
        }
    }

    /// Type used for the name in `key: name { ... }`.
    fn for_declaration(key: &str) -> Option<Self> {
        Some(match key {
            "view" | "explore" | "model" | "dashboard" => TokenType::Class,
            "dimension" | "measure" | "dimension_group" => TokenType::Property,
            "filter" | "parameter" => TokenType::Parameter,
            "join" => TokenType::Variable,
            _ => return None,
        })
    }
}

/// Modifier bit flags, matching [`TOKEN_MODIFIERS`].
pub mod modifiers {
    pub const DECLARATION: u32 = 1 << 0;
    pub const DEFINITION: u32 = 1 << 1;
    pub const READONLY: u32 = 1 << 2;
    pub const DEPRECATED: u32 = 1 << 4;
}

/// A semantic token for syntax highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    /// Line number (0-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub col: u32,
    /// Length of the token in characters
    pub length: u32,
    pub token_type: TokenType,
    /// Bitmask over [`TOKEN_MODIFIERS`].
    pub modifiers: u32,
}

struct TokenSink<'a> {
    index: &'a LineIndex,
    text: &'a str,
    tokens: Vec<SemanticToken>,
}

impl TokenSink<'_> {
    /// Push a token for `range`, split at line breaks.
    fn push(&mut self, range: TextRange, token_type: TokenType, modifiers: u32) {
        let mut start = usize::from(range.start());
        let end = usize::from(range.end());
        for piece in self.text[start..end].split_inclusive('\n') {
            let content = piece.trim_end_matches(['\n', '\r']);
            let length = content.chars().count() as u32;
            if length > 0 {
                let position = self.index.position(TextSize::from(start as u32));
                self.tokens.push(SemanticToken {
                    line: position.line as u32,
                    col: position.column as u32,
                    length,
                    token_type,
                    modifiers,
                });
            }
            start += piece.len();
        }
    }
}

/// Get semantic tokens for a document, sorted by position.
///
/// Keys are keywords (deprecated ones carry the `deprecated` modifier),
/// construct names are declarations, and `${...}` references inside
/// expressions are variables.
pub fn semantic_tokens(text: &str, config: &AnalysisConfig) -> Vec<SemanticToken> {
    let index = LineIndex::new(text);
    let mut sink = TokenSink {
        index: &index,
        text,
        tokens: Vec::new(),
    };

    let significant: Vec<Token<'_>> = tokenize(text)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .collect();
    let kind_at = |i: usize| significant.get(i).map(|t| t.kind);

    let mut pending_declaration: Option<TokenType> = None;
    for (i, token) in significant.iter().enumerate() {
        match token.kind {
            TokenKind::Ident if kind_at(i + 1) == Some(TokenKind::Colon) => {
                let modifiers = if config.is_deprecated(token.text) {
                    modifiers::DEPRECATED
                } else {
                    0
                };
                sink.push(token.range, TokenType::Keyword, modifiers);
                pending_declaration = TokenType::for_declaration(token.text);
            }
            TokenKind::Ident => {
                if let Some(token_type) = pending_declaration.take() {
                    if kind_at(i + 1) == Some(TokenKind::LBrace) {
                        sink.push(token.range, token_type, modifiers::DECLARATION);
                    }
                }
            }
            TokenKind::Colon => {}
            TokenKind::String | TokenKind::UnterminatedString => {
                sink.push(token.range, TokenType::String, 0);
            }
            TokenKind::Number => sink.push(token.range, TokenType::Number, 0),
            TokenKind::Comment => sink.push(token.range, TokenType::Comment, 0),
            TokenKind::DoubleSemicolon => sink.push(token.range, TokenType::Operator, 0),
            TokenKind::Expression | TokenKind::UnterminatedExpression => {
                let base = token.range.start();
                for reference in extract_embedded_references(token.text) {
                    let range = TextRange::new(
                        base + TextSize::from(reference.start as u32),
                        base + TextSize::from(reference.end as u32),
                    );
                    sink.push(range, TokenType::Variable, modifiers::READONLY);
                }
            }
            _ => pending_declaration = None,
        }
    }

    let mut tokens = sink.tokens;
    tokens.sort_by_key(|t| (t.line, t.col));
    tokens
}

/// LSP relative encoding: five integers per token,
/// `[delta line, delta start, length, type, modifiers]`.
pub fn encode(tokens: &[SemanticToken]) -> Vec<u32> {
    let mut data = Vec::with_capacity(tokens.len() * 5);
    let (mut prev_line, mut prev_col) = (0, 0);
    for token in tokens {
        let delta_line = token.line - prev_line;
        let delta_col = if delta_line == 0 {
            token.col - prev_col
        } else {
            token.col
        };
        data.extend([
            delta_line,
            delta_col,
            token.length,
            token.token_type.to_lsp_index(),
            token.modifiers,
        ]);
        prev_line = token.line;
        prev_col = token.col;
    }
    data
}

/// Decode [`encode`] output back to absolute tokens as
/// `(line, col, length, type index, modifiers)`.
pub fn decode(data: &[u32]) -> Vec<(u32, u32, u32, u32, u32)> {
    let mut out = Vec::with_capacity(data.len() / 5);
    let (mut line, mut col) = (0, 0);
    for chunk in data.chunks_exact(5) {
        if chunk[0] > 0 {
            line += chunk[0];
            col = chunk[1];
        } else {
            col += chunk[1];
        }
        out.push((line, col, chunk[2], chunk[3], chunk[4]));
    }
    out
}
