use std::fmt::{self, Write as _};

use orc_arena::{Allocation, Arena, ArenaStr};
use orc_errors::{ErrorCollector, Location, ParseError, ParseErrorKind, TextRange};
use orc_tokenizer::{Token, Tokenizer};

use crate::syntax::{Document, ExprNode, NodeId, TokenId};

/// Owns everything a parse allocates. Handles handed out by one context
/// (`TokenId`, `NodeId`, `ArenaStr`) mean nothing to another.
#[derive(Debug, Default)]
pub struct ParseContext {
    arena: Arena,
    errors: ErrorCollector,
    tokens: la_arena::Arena<Token>,
    nodes: la_arena::Arena<ExprNode>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_capacity(block_capacity: usize) -> Self {
        Self { arena: Arena::with_block_capacity(block_capacity), ..Self::default() }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn allocate(&mut self, size: usize) -> Allocation {
        self.arena.allocate(size)
    }

    pub fn copy_string(&mut self, s: &str) -> ArenaStr {
        self.arena.copy_string(s)
    }

    pub fn copy_string_n(&mut self, s: &str, n: usize) -> ArenaStr {
        self.arena.copy_string_n(s, n)
    }

    pub fn str(&self, s: ArenaStr) -> &str {
        self.arena.str(s)
    }

    pub fn allocate_token(&mut self) -> TokenId {
        self.tokens.alloc(Token::default())
    }

    pub fn allocate_node(&mut self) -> NodeId {
        self.nodes.alloc(ExprNode::default())
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub fn token_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.tokens[id]
    }

    pub fn node(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ExprNode {
        &mut self.nodes[id]
    }

    pub fn nodes(&self, document: &Document) -> Nodes<'_> {
        Nodes { context: self, next: document.head }
    }

    /// Records a diagnostic at the tokenizer's current line and offset.
    pub fn push_error(
        &mut self,
        tokenizer: &Tokenizer<'_>,
        kind: ParseErrorKind,
        args: fmt::Arguments<'_>,
    ) -> bool {
        let location = Location {
            source_name: tokenizer.source_name(),
            line: tokenizer.line(),
            range: TextRange::empty(tokenizer.offset()),
        };
        self.errors.push(&mut self.arena, location, kind, args)
    }

    pub fn errors(&self) -> &[ParseError] {
        self.errors.errors()
    }

    pub fn error_collector(&self) -> &ErrorCollector {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One block per node: the node kind, then each token's kind, range and
    /// text.
    pub fn debug_tree(&self, document: &Document, text: &str) -> String {
        let mut buf = String::new();
        for (_, node) in self.nodes(document) {
            writeln!(buf, "{:?}", node.kind).unwrap();
            for id in node.tokens() {
                let token = self.token(id);
                writeln!(buf, "  {:?}@{:?} {:?}", token.kind, token.range, token.text(text))
                    .unwrap();
            }
        }
        buf
    }
}

pub struct Nodes<'a> {
    context: &'a ParseContext,
    next: Option<NodeId>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (NodeId, &'a ExprNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.context.node(id);
        self.next = node.next;
        Some((id, node))
    }
}
