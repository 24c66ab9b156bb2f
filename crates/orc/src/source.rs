use anyhow::Context;
use camino::Utf8PathBuf;
use orc_errors::Renderer;
use orc_parse::{Document, ParseContext, parse};
use orc_tokenizer::Tokenizer;

pub(crate) enum Input {
    Source(Source),
    /// A module compiled elsewhere, handed on byte for byte.
    Precompiled { path: Utf8PathBuf, bytes: Vec<u8> },
}

impl Input {
    pub(crate) fn open(path: Utf8PathBuf) -> anyhow::Result<Self> {
        tracing::debug!(%path, "opening input");
        match path.extension() {
            Some("or") => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read `{path}`"))?;
                Ok(Self::Source(Source { path, text }))
            }
            Some("wasm") => {
                let bytes =
                    std::fs::read(&path).with_context(|| format!("failed to read `{path}`"))?;
                Ok(Self::Precompiled { path, bytes })
            }
            _ => anyhow::bail!("unsupported input `{path}`: expected a `.or` or `.wasm` file"),
        }
    }
}

pub(crate) struct Source {
    pub(crate) path: Utf8PathBuf,
    pub(crate) text: String,
}

impl Source {
    pub(crate) fn parse(&self) -> (ParseContext, Document) {
        let mut context = ParseContext::new();
        let mut tokenizer = Tokenizer::new(self.path.as_str(), &self.text);
        let document = parse(&mut context, &mut tokenizer);
        (context, document)
    }

    /// Prints the diagnostics in `context` to stderr and returns whether
    /// there were any.
    pub(crate) fn report(&self, context: &ParseContext, renderer: &Renderer) -> bool {
        for error in context.errors() {
            eprintln!("{}", error.render(context.arena(), renderer, &self.text));
        }

        let dropped = context.error_collector().dropped();
        if dropped > 0 {
            eprintln!("{}: {dropped} more error(s) not shown", self.path);
        }

        context.has_errors()
    }
}
