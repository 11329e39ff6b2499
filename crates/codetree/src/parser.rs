//! The parsing front door.

use crate::aggregate;
use crate::config::ParseConfig;
use crate::error::Result;
use crate::pool::NodePool;
use crate::reader::CodeTreeReader;
use crate::scanner::Scanner;
use crate::source::SourceOpener;
use crate::tree::CodeTree;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Parses sources with a shared pool and configuration.
///
/// `Parser` is cheap to clone; clones share the same [`NodePool`].
///
/// # Examples
///
/// ```
/// use codetree::Parser;
///
/// let parser = Parser::new();
/// let tree = parser.parse_str("parent1\n\tchild1\nparent2\n\tchild1\n").unwrap();
///
/// let root = tree.root();
/// assert_eq!(root.child_count(), 2);
/// assert_eq!(root.child(0).unwrap().child(0).unwrap().content(), "child1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    pool: NodePool,
    config: ParseConfig,
}

impl Parser {
    /// Creates a parser with a fresh pool and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn with_config(config: ParseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool: NodePool::new(),
            config,
        })
    }

    /// Replaces the pool nodes are drawn from.
    #[must_use]
    pub fn with_pool(mut self, pool: NodePool) -> Self {
        self.pool = pool;
        self
    }

    /// Returns the pool.
    #[must_use]
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Creates a scanner for push-style parsing.
    #[must_use]
    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.pool.clone(), &self.config)
    }

    /// Parses an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIndentation`](crate::Error::MalformedIndentation)
    /// for the first line nested too deep.
    pub fn parse_bytes(&self, source: &[u8]) -> Result<CodeTree> {
        let mut scanner = self.scanner();
        scanner.feed(source)?;
        scanner.finish()
    }

    /// Parses an in-memory string.
    ///
    /// # Errors
    ///
    /// See [`parse_bytes`](Self::parse_bytes).
    pub fn parse_str(&self, source: &str) -> Result<CodeTree> {
        self.parse_bytes(source.as_bytes())
    }

    /// Parses an async byte stream to its end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if a read fails, or
    /// [`Error::MalformedIndentation`](crate::Error::MalformedIndentation)
    /// for the first line nested too deep.
    pub async fn parse_reader<R: AsyncRead + Unpin>(&self, reader: R) -> Result<CodeTree> {
        CodeTreeReader::with_capacity(reader, self.config.read_buffer_size)
            .parse_into(self.scanner())
            .await
    }

    /// Parses every named source concurrently and joins the results under
    /// one aggregate root, in `names` order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aggregate`](crate::Error::Aggregate) listing every
    /// source that failed to open or parse. No tree is returned then.
    pub async fn parse_sources<O, S>(&self, opener: Arc<O>, names: &[S]) -> Result<CodeTree>
    where
        O: SourceOpener + 'static,
        S: AsRef<str>,
    {
        aggregate::parse_all(self, opener, names).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndentStyle;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn parse_str_and_parse_bytes_agree() {
        let parser = Parser::new();
        let from_str = parser.parse_str("a\n\tb\n").unwrap();
        let from_bytes = parser.parse_bytes(b"a\n\tb\n").unwrap();
        assert_eq!(from_str, from_bytes);
    }

    #[test]
    fn with_config_validates() {
        let config = ParseConfig {
            read_buffer_size: 0,
            ..ParseConfig::default()
        };
        assert!(matches!(Parser::with_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn with_config_applies_indent_style() {
        let parser = Parser::with_config(ParseConfig {
            indent: IndentStyle::Mixed {
                spaces_per_level: 4,
            },
            ..ParseConfig::default()
        })
        .unwrap();

        let tree = parser.parse_str("a\n    b\n").unwrap();
        assert_eq!(tree.root().child(0).unwrap().child(0).unwrap().content(), "b");
    }

    #[test]
    fn clones_share_pool() {
        let parser = Parser::new();
        let clone = parser.clone();

        parser.parse_str("a\nb\n").unwrap().close();
        assert_eq!(clone.pool().idle_len(), 3);
    }

    #[test]
    fn with_pool_uses_given_pool() {
        let pool = NodePool::with_max_retained(1);
        let parser = Parser::new().with_pool(pool.clone());

        parser.parse_str("a\nb\nc\n").unwrap().close();
        assert_eq!(pool.idle_len(), 1);
    }

    #[tokio::test]
    async fn parse_reader_matches_parse_str() {
        let parser = Parser::new();
        let input = "x\n\ty // z\n\t\tw\n";

        let from_reader = parser.parse_reader(Cursor::new(input)).await.unwrap();
        let from_str = parser.parse_str(input).unwrap();
        assert_eq!(from_reader, from_str);
    }
}
