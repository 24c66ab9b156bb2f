use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
use orc_arena::{Arena, ArenaStr};
pub use text_size::TextRange;

pub const ERROR_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// `var` not followed by `=`.
    MalformedTag,
    /// No string or integer before the `;`.
    MissingValue,
    /// An integer value ended in something other than a digit.
    InvalidIntegerTerminator,
    UnexpectedSymbol,
    /// A `"` in a value span did not start a string constant.
    ExpectedString,
}

impl ParseErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::MalformedTag => "expected `=` after this tag",
            Self::MissingValue => "expected a string or integer value",
            Self::InvalidIntegerTerminator => "integer must end in a digit",
            Self::UnexpectedSymbol => "unexpected symbol",
            Self::ExpectedString => "expected a string constant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub source_name: &'a str,
    pub line: u32,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    source_name: ArenaStr,
    line: u32,
    range: TextRange,
    message: ArenaStr,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn source_name<'a>(&self, arena: &'a Arena) -> &'a str {
        arena.str(self.source_name)
    }

    pub fn message<'a>(&self, arena: &'a Arena) -> &'a str {
        arena.str(self.message)
    }

    /// `Parse Error (<source>:<line>): <message>`
    pub fn display<'a>(&'a self, arena: &'a Arena) -> impl Display + 'a {
        DisplayParseError { error: self, arena }
    }

    pub fn render<'a>(
        &'a self,
        arena: &'a Arena,
        renderer: &'a Renderer,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(self.message(arena)).snippet(
            Snippet::source(text)
                .origin(self.source_name(arena))
                .annotation(Level::Error.span(self.range.into()).label(self.kind.label()))
                .fold(true),
        );
        renderer.render(message)
    }
}

struct DisplayParseError<'a> {
    error: &'a ParseError,
    arena: &'a Arena,
}

impl Display for DisplayParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse Error ({}:{}): {}",
            self.error.source_name(self.arena),
            self.error.line,
            self.error.message(self.arena)
        )
    }
}

/// Fixed-budget diagnostic log. The backing storage is only created once the
/// first error arrives; anything past [`ERROR_CAPACITY`] is dropped.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Option<Vec<ParseError>>,
    dropped: usize,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error and returns whether it was kept.
    pub fn push(
        &mut self,
        arena: &mut Arena,
        location: Location<'_>,
        kind: ParseErrorKind,
        args: fmt::Arguments<'_>,
    ) -> bool {
        let errors = self.errors.get_or_insert_with(|| Vec::with_capacity(ERROR_CAPACITY));

        if errors.len() >= ERROR_CAPACITY {
            self.dropped += 1;
            tracing::debug!(?kind, dropped = self.dropped, "error log full, dropping diagnostic");
            return false;
        }

        let message = arena.alloc_fmt(args);
        let source_name = arena.copy_string(location.source_name);
        tracing::debug!(?kind, line = location.line, message = arena.str(message), "parse error");

        errors.push(ParseError {
            kind,
            source_name,
            line: location.line,
            range: location.range,
            message,
        });
        true
    }

    pub fn errors(&self) -> &[ParseError] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.errors().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors().is_empty()
    }

    /// Errors that arrived after the log was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::capacity)
    }
}
