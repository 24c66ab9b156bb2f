pub(crate) const EOF_BYTE: u8 = b'\0';

pub(crate) struct Cursor<'src> {
    bytes: &'src [u8],
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(bytes: &'src [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(EOF_BYTE)
    }

    pub(crate) fn rest(&self) -> &'src [u8] {
        self.bytes.get(self.pos..).unwrap_or_default()
    }

    pub(crate) fn at(&self, literal: &[u8]) -> bool {
        self.rest().starts_with(literal)
    }

    pub(crate) fn advance(&mut self) -> u8 {
        let byte = self.peek();
        if !self.is_eof() {
            self.pos += 1;
        }
        byte
    }

    pub(crate) fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(u8) -> bool) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Advances up to, not past, the first unescaped byte matching
    /// `delimiter`. A backslash hides the byte after it; the byte under the
    /// cursor on entry is never a delimiter.
    pub(crate) fn advance_until_unescaped(&mut self, delimiter: impl Fn(u8) -> bool) {
        let mut escaped = true;
        while !self.is_eof() {
            let byte = self.peek();
            if escaped {
                escaped = false;
            } else if delimiter(byte) {
                break;
            } else if byte == b'\\' {
                escaped = true;
            }
            self.advance();
        }
    }
}
