use orc_errors::ParseErrorKind;
use orc_tokenizer::TokenKind::{self, *};
use orc_tokenizer::{TextSize, Token};

use crate::parser::Parser;
use crate::syntax::{TokenId, VarAssignment};

/// Symbols that are accepted at the top level and currently mean nothing.
const PLACEHOLDER_SYMBOLS: [&str; 3] = ["*", "|", "`"];

pub(crate) fn document(p: &mut Parser<'_, '_>) {
    loop {
        let kind = p.peek_kind();
        if kind == NONE || p.has_errors() {
            break;
        }

        match kind {
            VAR_TAG => var_directive(p),
            SYMBOL => symbol(p),
            _ => p.advance(),
        }
    }
}

fn var_directive(p: &mut Parser<'_, '_>) {
    let Some(tag) = p.tokenizer().require_token_kind(VAR_TAG) else {
        return;
    };
    let name = p.keep(tag);

    let Some(eq) = p.tokenizer().require_token_literal("=") else {
        p.error(ParseErrorKind::MalformedTag, format_args!("Malformed tag."));
        return;
    };
    let op = p.keep(eq);

    if let Some(value) = value(p) {
        p.push_var(VarAssignment { name, op, value });
    }
}

/// Scans the text after `=` for the first value token. A `;` that follows
/// the value, past whitespace, belongs to the directive and is consumed too;
/// otherwise the tokenizer is left right after the value.
fn value(p: &mut Parser<'_, '_>) -> Option<TokenId> {
    let bytes = p.text().as_bytes();
    let mut pos = usize::from(p.tokenizer().offset());
    let mut depth = 0i32;

    let value = loop {
        let Some(&byte) = bytes.get(pos) else {
            break None;
        };
        match byte {
            b'\\' => pos += 2,
            b'[' => {
                depth += 1;
                pos += 1;
            }
            b']' => {
                depth -= 1;
                pos += 1;
            }
            b'"' => break Some(string_value(p, pos)?),
            b'0'..=b'9' => break Some(int_value(p, pos)?),
            b';' => break None,
            _ => pos += 1,
        }
    };

    tracing::trace!(depth, "value span scanned");

    let Some(token) = value else {
        p.error(ParseErrorKind::MissingValue, format_args!("Expected value before endline"));
        return None;
    };

    let end = usize::from(token.range.end());
    let gap = bytes[end..].iter().take_while(|&&b| b <= b' ').count();
    if bytes.get(end + gap) == Some(&b';') {
        p.tokenizer().seek(TextSize::new((end + gap + 1) as u32));
    }

    Some(p.keep(token))
}

fn string_value(p: &mut Parser<'_, '_>, pos: usize) -> Option<Token> {
    match value_token(p, pos, STRING_CONSTANT) {
        Some(token) if is_closed_string(token.text(p.text())) => Some(token),
        _ => {
            p.error(
                ParseErrorKind::ExpectedString,
                format_args!("Expected \" to follow String assignation."),
            );
            None
        }
    }
}

fn int_value(p: &mut Parser<'_, '_>, pos: usize) -> Option<Token> {
    let token = value_token(p, pos, INT)?;
    if let Some(bad) = token.text(p.text()).chars().find(|c| !c.is_ascii_digit()) {
        p.error(
            ParseErrorKind::InvalidIntegerTerminator,
            format_args!("Expected Int value but had incorrect char {}.", bad.escape_default()),
        );
        return None;
    }
    Some(token)
}

fn value_token(p: &mut Parser<'_, '_>, pos: usize, kind: TokenKind) -> Option<Token> {
    p.tokenizer().seek(TextSize::new(pos as u32));
    p.tokenizer().require_token_kind(kind)
}

/// An unterminated string runs to the end of the source; its last quote, if
/// any, is either the opening one or escaped.
fn is_closed_string(text: &str) -> bool {
    let Some(body) = text.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        return false;
    };
    let backslashes = body.bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 0
}

fn symbol(p: &mut Parser<'_, '_>) {
    let token = p.peek();
    let text = token.text(p.text());
    p.advance();

    if !PLACEHOLDER_SYMBOLS.contains(&text) {
        p.error(ParseErrorKind::UnexpectedSymbol, format_args!("Unexpected symbol '{text}'"));
    }
}
