mod context;
mod grammar;
mod parser;
mod syntax;

pub use context::{Nodes, ParseContext};
pub use orc_errors::{ParseError, ParseErrorKind};
pub use syntax::{Document, ExprKind, ExprNode, NodeId, TokenId, VarAssignment};

use orc_tokenizer::Tokenizer;

/// Parses the tokenizer's source into `context`. Parsing stops producing
/// nodes as soon as the context holds a diagnostic, so callers should check
/// [`ParseContext::has_errors`] before using the document.
pub fn parse(context: &mut ParseContext, tokenizer: &mut Tokenizer<'_>) -> Document {
    let _span = tracing::debug_span!("parse", source = tokenizer.source_name()).entered();

    let mut parser = parser::Parser::new(context, tokenizer);
    grammar::document(&mut parser);
    let document = parser.finish();

    tracing::debug!(nodes = document.len, errors = context.errors().len(), "parsed");
    document
}
