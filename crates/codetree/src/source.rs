//! Resolving source names to byte streams.
//!
//! Multi-file parsing only knows names. A [`SourceOpener`] turns each name
//! into an async reader; where the bytes come from is up to the caller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncRead;

/// A boxed async byte source.
pub type SourceReader = Box<dyn AsyncRead + Send + Unpin>;

/// Opens named sources for parsing.
///
/// Implementations must be shareable across tasks: the aggregator opens
/// every name concurrently from the same opener.
#[async_trait]
pub trait SourceOpener: Send + Sync {
    /// Opens the source called `name`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source does not exist or cannot be opened.
    async fn open(&self, name: &str) -> io::Result<SourceReader>;
}

/// Opens sources from the file system.
///
/// Names are paths. Relative names resolve against the base directory when
/// one is set, and against the process working directory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FsOpener {
    base_dir: Option<PathBuf>,
}

impl FsOpener {
    /// Creates an opener that resolves names as given.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an opener that resolves relative names under `base_dir`.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Returns the path a name resolves to.
    #[must_use]
    pub fn resolve(&self, name: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(name),
            None => Path::new(name).to_path_buf(),
        }
    }
}

#[async_trait]
impl SourceOpener for FsOpener {
    async fn open(&self, name: &str) -> io::Result<SourceReader> {
        let file = tokio::fs::File::open(self.resolve(name)).await?;
        Ok(Box::new(file))
    }
}

/// Named in-memory sources.
///
/// # Examples
///
/// ```
/// use codetree::MemorySources;
///
/// let sources = MemorySources::new()
///     .with("layout.tpl", "html\n\tbody\n")
///     .with("page.tpl", "main\n");
/// assert_eq!(sources.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    sources: HashMap<String, Arc<[u8]>>,
}

impl MemorySources {
    /// Creates an empty set of sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a source, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(name, content);
        self
    }

    /// Adds or replaces a source.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        let content: Vec<u8> = content.into();
        self.sources.insert(name.into(), Arc::from(content));
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if there are no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl SourceOpener for MemorySources {
    async fn open(&self, name: &str) -> io::Result<SourceReader> {
        let content = self.sources.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no source named {name:?}"))
        })?;
        Ok(Box::new(Cursor::new(Arc::clone(content))))
    }
}
