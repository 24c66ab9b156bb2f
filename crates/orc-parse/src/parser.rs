use std::fmt;

use orc_errors::ParseErrorKind;
use orc_tokenizer::{Token, TokenKind, Tokenizer};

use crate::context::ParseContext;
use crate::syntax::{Document, ExprKind, ExprNode, NodeId, TokenId, VarAssignment};

pub(crate) struct Parser<'c, 'src> {
    context: &'c mut ParseContext,
    tokenizer: &'c mut Tokenizer<'src>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<'c, 'src> Parser<'c, 'src> {
    pub(crate) fn new(context: &'c mut ParseContext, tokenizer: &'c mut Tokenizer<'src>) -> Self {
        Self { context, tokenizer, head: None, tail: None, len: 0 }
    }

    pub(crate) fn text(&self) -> &'src str {
        self.tokenizer.text()
    }

    pub(crate) fn tokenizer(&mut self) -> &mut Tokenizer<'src> {
        self.tokenizer
    }

    pub(crate) fn peek(&self) -> Token {
        self.tokenizer.peek()
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn advance(&mut self) {
        if self.tokenizer.is_eof() {
            return;
        }
        self.tokenizer.next_token();
    }

    /// Copies a consumed token into the context's token pool.
    pub(crate) fn keep(&mut self, token: Token) -> TokenId {
        let id = self.context.allocate_token();
        *self.context.token_mut(id) = token;
        id
    }

    pub(crate) fn error(&mut self, kind: ParseErrorKind, args: fmt::Arguments<'_>) {
        self.context.push_error(self.tokenizer, kind, args);
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.context.has_errors()
    }

    pub(crate) fn push_var(&mut self, assignment: VarAssignment) {
        let id = self.context.allocate_node();
        *self.context.node_mut(id) =
            ExprNode { kind: ExprKind::Var, assignment: Some(assignment), ..ExprNode::default() };

        match self.tail {
            Some(tail) => self.context.node_mut(tail).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;

        let node = u32::from(id.into_raw());
        tracing::debug!(node, line = self.tokenizer.line(), "var assignment");
    }

    pub(crate) fn finish(self) -> Document {
        Document { head: self.head, len: self.len }
    }
}
