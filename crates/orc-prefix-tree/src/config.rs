use crate::{PrefixTree, PrefixTreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("line {line}: expected `key:value`")]
    MissingSeparator { line: usize },
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

impl<'a> PrefixTree<'a> {
    /// Builds a tree from `key:value` lines. Keys and values borrow from
    /// `text`.
    pub fn from_config(text: &'a str) -> Result<Self, ConfigError> {
        let mut tree = Self::new();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = idx + 1;
            let entry = raw.strip_suffix('\r').unwrap_or(raw).trim_start();
            if entry.is_empty() {
                continue;
            }

            let (key, value) =
                entry.split_once(':').ok_or(ConfigError::MissingSeparator { line })?;
            let value = value.trim_start();

            tree.insert(key, value)
                .map_err(|PrefixTreeError::EmptyKey| ConfigError::EmptyKey { line })?;
        }

        tracing::debug!(entries = tree.len(), "loaded config");
        Ok(tree)
    }
}
