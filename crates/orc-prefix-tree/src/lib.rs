mod config;

pub use config::ConfigError;
use la_arena::{Arena, Idx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PrefixTreeError {
    #[error("prefix tree keys must not be empty")]
    EmptyKey,
}

type NodeKey<'a> = Idx<PrefixNode<'a>>;

/// A node stores the part of a key that follows its parent's prefix.
/// `have_child` continues the key past this prefix, `no_have_child` is the
/// next sibling at the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixNode<'a> {
    pub prefix: &'a [u8],
    pub value: Option<&'a str>,
    pub have_child: Option<NodeKey<'a>>,
    pub no_have_child: Option<NodeKey<'a>>,
}

impl<'a> PrefixNode<'a> {
    fn leaf(prefix: &'a [u8], value: &'a str) -> Self {
        Self { prefix, value: Some(value), have_child: None, no_have_child: None }
    }
}

#[derive(Clone, Copy)]
enum Slot<'a> {
    Root,
    Have(NodeKey<'a>),
    NoHave(NodeKey<'a>),
}

/// Key/value lookup over borrowed keys. Siblings never share a first byte, so
/// a lookup follows at most one path.
#[derive(Debug, Default)]
pub struct PrefixTree<'a> {
    root: Option<NodeKey<'a>>,
    nodes: Arena<PrefixNode<'a>>,
    len: usize,
}

impl<'a> PrefixTree<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, key: &'a str, value: &'a str) -> Result<(), PrefixTreeError> {
        if key.is_empty() {
            return Err(PrefixTreeError::EmptyKey);
        }

        let mut rest = key.as_bytes();
        let mut slot = Slot::Root;

        loop {
            let Some(mut id) = self.slot(slot) else {
                let leaf = self.nodes.alloc(PrefixNode::leaf(rest, value));
                self.set_slot(slot, leaf);
                self.len += 1;
                return Ok(());
            };

            let prefix = self.nodes[id].prefix;
            let matched = common_prefix_len(prefix, rest);
            if matched == 0 {
                slot = Slot::NoHave(id);
                continue;
            }

            if matched < prefix.len() {
                id = self.split(slot, id, matched);
            }

            rest = &rest[matched..];
            if rest.is_empty() {
                if self.nodes[id].value.replace(value).is_none() {
                    self.len += 1;
                }
                return Ok(());
            }
            slot = Slot::Have(id);
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&'a str> {
        let mut rest = key.as_bytes();
        let mut current = self.root;

        while let Some(id) = current {
            let node = &self.nodes[id];
            match rest.strip_prefix(node.prefix) {
                Some([]) => return node.value,
                Some(tail) => {
                    rest = tail;
                    current = node.have_child;
                }
                None => current = node.no_have_child,
            }
        }

        None
    }

    /// Puts a node holding `prefix[..at]` in `slot`, in front of `id`, and
    /// trims `id` down to the remainder.
    fn split(&mut self, slot: Slot<'a>, id: NodeKey<'a>, at: usize) -> NodeKey<'a> {
        let existing = &mut self.nodes[id];
        let prefix = existing.prefix;
        let (head, tail) = prefix.split_at(at);
        existing.prefix = tail;
        let no_have_child = existing.no_have_child.take();

        tracing::debug!(
            head = %String::from_utf8_lossy(head),
            tail = %String::from_utf8_lossy(tail),
            "prefix tree split"
        );

        let split = self.nodes.alloc(PrefixNode {
            prefix: head,
            value: None,
            have_child: Some(id),
            no_have_child,
        });
        self.set_slot(slot, split);
        split
    }

    fn slot(&self, slot: Slot<'a>) -> Option<NodeKey<'a>> {
        match slot {
            Slot::Root => self.root,
            Slot::Have(id) => self.nodes[id].have_child,
            Slot::NoHave(id) => self.nodes[id].no_have_child,
        }
    }

    fn set_slot(&mut self, slot: Slot<'a>, value: NodeKey<'a>) {
        let target = match slot {
            Slot::Root => &mut self.root,
            Slot::Have(id) => &mut self.nodes[id].have_child,
            Slot::NoHave(id) => &mut self.nodes[id].no_have_child,
        };
        *target = Some(value);
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
