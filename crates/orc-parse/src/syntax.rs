use la_arena::Idx;
use orc_tokenizer::Token;

pub type TokenId = Idx<Token>;
pub type NodeId = Idx<ExprNode>;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ExprKind {
    #[default]
    Invalid,
    Var,
    Const,
    Func,
}

/// `var <name> = <value>;`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VarAssignment {
    pub name: TokenId,
    pub op: TokenId,
    pub value: TokenId,
}

impl VarAssignment {
    pub fn tokens(self) -> [TokenId; 3] {
        [self.name, self.op, self.value]
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub assignment: Option<VarAssignment>,
    pub next: Option<NodeId>,
    /// Reserved for call-style nodes.
    pub first_parameter: Option<NodeId>,
}

impl ExprNode {
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + use<> {
        self.assignment.into_iter().flat_map(VarAssignment::tokens)
    }

    pub fn tokens_length(&self) -> usize {
        self.tokens().count()
    }
}

/// The top-level node list produced by one call to [`crate::parse`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Document {
    pub head: Option<NodeId>,
    pub len: usize,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
