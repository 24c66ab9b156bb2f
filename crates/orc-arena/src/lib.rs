//! Bump allocation for a single parse context.
//!
//! Memory is handed out from a chain of fixed-capacity blocks. Nothing is
//! ever freed or moved until the [`Arena`] itself is dropped, so every
//! [`Allocation`] keeps addressing the same bytes for the arena's lifetime.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

pub const DEFAULT_BLOCK_CAPACITY: usize = 4096;

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

/// A region handed out by [`Arena::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Allocation {
    arena: u32,
    block: u32,
    offset: u32,
    len: u32,
}

impl Allocation {
    pub fn block(self) -> usize {
        self.block as usize
    }

    pub fn offset(self) -> usize {
        self.offset as usize
    }

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A UTF-8 string copied into an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaStr(Allocation);

impl ArenaStr {
    pub fn len(self) -> usize {
        self.0.len()
    }

    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }
}

struct Block {
    memory: Box<[u8]>,
    alloc_position: usize,
}

impl Block {
    fn new(capacity: usize) -> Self {
        Self { memory: vec![0; capacity].into_boxed_slice(), alloc_position: 0 }
    }

    fn fits(&self, size: usize) -> bool {
        self.alloc_position + size <= self.memory.len()
    }
}

pub struct Arena {
    id: u32,
    block_capacity: usize,
    blocks: Vec<Block>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("block_capacity", &self.block_capacity)
            .field("blocks", &self.blocks.len())
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self::with_block_capacity(DEFAULT_BLOCK_CAPACITY)
    }

    pub fn with_block_capacity(block_capacity: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            block_capacity,
            blocks: Vec::new(),
        }
    }

    /// Returns `size` zeroed bytes. A request that does not fit the active
    /// block opens a new block of `max(size, block_capacity)` bytes; the
    /// unused tail of the previous block is abandoned.
    pub fn allocate(&mut self, size: usize) -> Allocation {
        assert!(size <= u32::MAX as usize, "arena allocation of {size} bytes is too large");

        if !self.blocks.last().is_some_and(|block| block.fits(size)) {
            let capacity = size.max(self.block_capacity);
            tracing::trace!(capacity, blocks = self.blocks.len() + 1, "arena block appended");
            self.blocks.push(Block::new(capacity));
        }

        let block = self.blocks.len() - 1;
        let active = &mut self.blocks[block];
        let offset = active.alloc_position;
        active.alloc_position += size;

        Allocation { arena: self.id, block: block as u32, offset: offset as u32, len: size as u32 }
    }

    pub fn copy_string(&mut self, s: &str) -> ArenaStr {
        let allocation = self.allocate(s.len());
        self.bytes_mut(allocation).copy_from_slice(s.as_bytes());
        ArenaStr(allocation)
    }

    /// Copies at most the first `n` bytes of `s`, shortened to the nearest
    /// char boundary.
    pub fn copy_string_n(&mut self, s: &str, n: usize) -> ArenaStr {
        let mut end = n.min(s.len());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.copy_string(&s[..end])
    }

    /// Formats `args` straight into arena memory: one pass to measure, one to
    /// write into an exactly sized region.
    pub fn alloc_fmt(&mut self, args: fmt::Arguments<'_>) -> ArenaStr {
        let mut counter = ByteCounter(0);
        if fmt::write(&mut counter, args).is_err() {
            tracing::warn!("formatting failed while measuring an arena string");
        }

        let allocation = self.allocate(counter.0);
        let mut writer = SliceWriter { buf: self.bytes_mut(allocation), written: 0 };
        if fmt::write(&mut writer, args).is_err() {
            tracing::warn!(
                expected = counter.0,
                written = writer.written,
                "arena string truncated while formatting"
            );
        }

        let written = writer.written as u32;
        ArenaStr(Allocation { len: written, ..allocation })
    }

    pub fn bytes(&self, allocation: Allocation) -> &[u8] {
        self.check_owner(allocation);
        let start = allocation.offset();
        &self.blocks[allocation.block()].memory[start..start + allocation.len()]
    }

    pub fn bytes_mut(&mut self, allocation: Allocation) -> &mut [u8] {
        self.check_owner(allocation);
        let start = allocation.offset();
        &mut self.blocks[allocation.block()].memory[start..start + allocation.len()]
    }

    pub fn str(&self, s: ArenaStr) -> &str {
        let bytes = self.bytes(s.0);
        // SAFETY: `ArenaStr` is only built by `copy_string` and `alloc_fmt`,
        // which write whole `str` pieces, and its allocation is never exposed
        // for mutation.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    pub fn allocated_bytes(&self) -> usize {
        self.blocks.iter().map(|block| block.alloc_position).sum()
    }

    fn check_owner(&self, allocation: Allocation) {
        assert_eq!(allocation.arena, self.id, "allocation belongs to a different arena");
    }
}

struct ByteCounter(usize);

impl fmt::Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.written + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.written..end].copy_from_slice(s.as_bytes());
        self.written = end;
        Ok(())
    }
}
