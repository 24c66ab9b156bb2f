mod cursor;

use cursor::Cursor;
pub use text_size::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TokenKind {
    #[default]
    NONE,
    VAR_TAG,
    CONST_TAG,
    INT,
    FLOAT,
    DOUBLE_NEWLINE,
    SYMBOL,
    STRING_CONSTANT,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    pub newlines: u32,
}

impl Token {
    fn new(kind: TokenKind, range: TextRange, text: &str) -> Self {
        let newlines = text[range].bytes().filter(|&b| b == b'\n').count() as u32;
        Self { kind, range, newlines }
    }

    fn none(end: TextSize) -> Self {
        Self { kind: TokenKind::NONE, range: TextRange::empty(end), newlines: 0 }
    }

    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range]
    }

    pub fn is_none(&self) -> bool {
        self.kind == TokenKind::NONE
    }
}

const SYMBOLS: &[u8] = b"={}*|`";

/// Literals that cut a run of symbol bytes short, tried in order.
const SYMBOL_LITERALS: [&[u8]; 8] = [b"=", b"*", b"_", b"`", b"{", b"}", b"|", b";"];

fn is_symbol(b: u8) -> bool {
    SYMBOLS.contains(&b)
}

fn is_space(b: u8) -> bool {
    b <= b' '
}

/// A view over a borrowed source buffer. Scanning never mutates the buffer;
/// only the cursor and line counter move, and only when a token is consumed.
#[derive(Debug, Clone)]
pub struct Tokenizer<'src> {
    text: &'src str,
    source_name: &'src str,
    cursor: usize,
    line: u32,
    comma_breaks_text: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source_name: &'src str, text: &'src str) -> Self {
        assert!(text.len() <= u32::MAX as usize, "source `{source_name}` is too large");
        Self { text, source_name, cursor: 0, line: 1, comma_breaks_text: false }
    }

    /// Reserved for free-text tokens, which the scanner does not produce.
    pub fn with_comma_breaks_text(mut self, comma_breaks_text: bool) -> Self {
        self.comma_breaks_text = comma_breaks_text;
        self
    }

    pub fn comma_breaks_text(&self) -> bool {
        self.comma_breaks_text
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    pub fn source_name(&self) -> &'src str {
        self.source_name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn offset(&self) -> TextSize {
        TextSize::new(self.cursor as u32)
    }

    pub fn is_eof(&self) -> bool {
        self.cursor >= self.text.len()
    }

    pub fn peek(&self) -> Token {
        self.scan()
    }

    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        self.bump(token);
        token
    }

    pub fn require_token_kind(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.scan();
        if token.kind != kind {
            return None;
        }
        self.bump(token);
        Some(token)
    }

    pub fn require_token_literal(&mut self, literal: &str) -> Option<Token> {
        let token = self.scan();
        if token.is_none() || token.text(self.text) != literal {
            return None;
        }
        self.bump(token);
        Some(token)
    }

    /// Moves the cursor forward to `offset`, counting the newlines crossed.
    pub fn seek(&mut self, offset: TextSize) {
        let offset = usize::from(offset).min(self.text.len());
        debug_assert!(offset >= self.cursor, "tokenizer cannot seek backwards");
        if offset <= self.cursor {
            return;
        }

        self.line += count_newlines(&self.text[self.cursor..offset]);
        self.cursor = offset;
    }

    fn bump(&mut self, token: Token) {
        tracing::trace!(kind = ?token.kind, range = ?token.range, "consumed token");
        self.seek(token.range.end());
    }

    fn scan(&self) -> Token {
        let bytes = self.text.as_bytes();

        for start in self.cursor..bytes.len() {
            let mut cursor = Cursor::new(bytes, start);
            if let Some(kind) = token_kind(&mut cursor) {
                let range =
                    TextRange::new(TextSize::new(start as u32), TextSize::new(cursor.pos() as u32));
                return Token::new(kind, range, self.text);
            }
        }

        Token::none(TextSize::new(bytes.len() as u32))
    }
}

fn token_kind(cursor: &mut Cursor<'_>) -> Option<TokenKind> {
    use TokenKind::*;

    if cursor.at(b"\n\n") {
        cursor.advance_by(2);
        return Some(DOUBLE_NEWLINE);
    }

    if cursor.at(b"var") {
        cursor.advance_until_unescaped(|b| b == b'=' || b == b':');
        return Some(VAR_TAG);
    }

    if cursor.at(b"const") {
        cursor.advance_until_unescaped(|b| b == b';');
        return Some(CONST_TAG);
    }

    let kind = match cursor.peek() {
        b'"' => {
            cursor.advance_until_unescaped(|b| b == b'"');
            cursor.advance();
            STRING_CONSTANT
        }
        b'0'..=b'9' => {
            cursor.advance_while(|b| b.is_ascii_digit() || is_space(b));
            INT
        }
        b if is_symbol(b) => {
            let rest = cursor.rest();
            let run = rest.iter().take_while(|&&b| is_symbol(b)).count();
            let len = SYMBOL_LITERALS
                .iter()
                .find(|literal| rest.starts_with(literal))
                .map_or(run, |literal| literal.len());
            cursor.advance_by(len);
            SYMBOL
        }
        _ => return None,
    };

    Some(kind)
}

fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}
