//! Async source reading.
//!
//! This module feeds an async byte source into a [`Scanner`] chunk by chunk,
//! exactly as the buffered reader hands chunks out. Nothing assumes a chunk
//! ends on a line boundary.

use crate::error::Result;
use crate::scanner::Scanner;
use crate::tree::CodeTree;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for indentation-structured source.
///
/// `CodeTreeReader` wraps an async reader in a [`BufReader`] and pushes each
/// filled buffer straight into a scanner, so memory use is bounded by the
/// buffer capacity plus the longest span.
///
/// # Type Parameters
///
/// * `R` - The underlying async reader type. Must implement [`AsyncRead`] and [`Unpin`].
///
/// # Examples
///
/// ```no_run
/// use codetree::{CodeTreeReader, NodePool, ParseConfig, Scanner};
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("page.tpl").await?;
/// let mut reader = CodeTreeReader::new(file);
/// let scanner = Scanner::new(NodePool::new(), &ParseConfig::default());
/// let tree = reader.parse_into(scanner).await?;
/// # Ok(())
/// # }
/// ```
pub struct CodeTreeReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> CodeTreeReader<R> {
    /// Creates a new `CodeTreeReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Creates a new `CodeTreeReader` with a custom buffer capacity.
    ///
    /// The capacity is also the largest chunk the scanner is fed at once.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
        }
    }

    /// Reads the source to the end, driving `scanner`, and returns the tree.
    ///
    /// A zero-length read marks the end of the source; shorter-than-buffer
    /// reads are ordinary chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if a read fails and
    /// [`Error::MalformedIndentation`](crate::Error::MalformedIndentation)
    /// if the source is structurally invalid. No tree is produced in either
    /// case; nodes built so far go back to the pool.
    pub async fn parse_into(&mut self, mut scanner: Scanner) -> Result<CodeTree> {
        loop {
            let chunk = self.reader.fill_buf().await?;
            if chunk.is_empty() {
                break;
            }
            let len = chunk.len();
            scanner.feed(chunk)?;
            self.reader.consume(len);
        }
        scanner.finish()
    }

    /// Returns a reference to the underlying buffered reader.
    #[must_use]
    pub fn get_ref(&self) -> &BufReader<R> {
        &self.reader
    }

    /// Returns a mutable reference to the underlying buffered reader.
    ///
    /// Reading directly from the buffer skips those bytes for the scanner.
    pub fn get_mut(&mut self) -> &mut BufReader<R> {
        &mut self.reader
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}
