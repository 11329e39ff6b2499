//! Push-driven scanner that turns bytes into a [`CodeTree`].
//!
//! The scanner never needs a whole line at once. Bytes are classified one at
//! a time by [`transition`], and a span is handed to the tree builder when a
//! newline or a comment boundary finalizes it. Feeding a source in one piece
//! or in arbitrarily small chunks yields the same tree.
//!
//! # Comment placement
//!
//! A comment that opens after code on the same physical line is placed one
//! level deeper than that line, making it a child of the code it follows:
//!
//! ```
//! use codetree::{NodeKind, NodePool, ParseConfig, Scanner};
//!
//! let mut scanner = Scanner::new(NodePool::new(), &ParseConfig::default());
//! scanner.feed(b"value = 1 // note\n").unwrap();
//! let tree = scanner.finish().unwrap();
//!
//! let code = tree.root().child(0).unwrap();
//! assert_eq!(code.content(), "value = 1");
//! let note = code.child(0).unwrap();
//! assert_eq!(note.kind(), NodeKind::Comment);
//! assert_eq!(note.content(), "// note");
//! ```
//!
//! A comment alone on its line keeps the line's own indentation.
//!
//! Text after a block comment that spans lines keeps the indent of the line
//! the comment opened on, but does not count as following code.

use crate::builder::TreeBuilder;
use crate::config::{IndentStyle, ParseConfig};
use crate::error::Result;
use crate::node::NodeKind;
use crate::pool::NodePool;
use crate::tree::CodeTree;

/// Scanner states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Consuming leading whitespace.
    #[default]
    LineStart,
    /// Accumulating ordinary content.
    Line,
    /// Saw a `/`; the next byte decides whether a comment opens.
    CommentStart,
    /// Inside a `//` comment.
    LineComment,
    /// Inside a `/* ... */` comment.
    BlockComment,
    /// Inside a block comment, right after a `*`.
    BlockCommentEnd,
}

/// What the scanner does with the byte that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Count a leading tab.
    Tab,
    /// Count a leading space.
    Space,
    /// Append the byte to the pending span.
    Push,
    /// Hold a `/` until the next byte is known.
    Slash,
    /// The held `/` opened nothing: it becomes content and the byte is
    /// dispatched again in [`State::Line`].
    Reject,
    /// Finalize pending code and open a `//` comment.
    OpenLineComment,
    /// Finalize pending code and open a `/*` comment.
    OpenBlockComment,
    /// Append a newline inside a block comment.
    Newline,
    /// Finalize the pending code line at a newline.
    EndLine,
    /// Finalize the pending line comment at a newline.
    EndLineComment,
    /// Append the closing `/` and finalize the block comment.
    CloseBlockComment,
}

/// The scanner's transition table.
///
/// `\r` never reaches this function; the scanner drops it beforehand.
#[must_use]
pub fn transition(state: State, byte: u8) -> (State, Action) {
    match (state, byte) {
        (State::LineStart, b'\t') => (State::LineStart, Action::Tab),
        (State::LineStart, b' ') => (State::LineStart, Action::Space),
        (State::LineStart | State::Line, b'\n') => (State::LineStart, Action::EndLine),
        (State::LineStart | State::Line, b'/') => (State::CommentStart, Action::Slash),
        (State::LineStart | State::Line, _) => (State::Line, Action::Push),

        (State::CommentStart, b'/') => (State::LineComment, Action::OpenLineComment),
        (State::CommentStart, b'*') => (State::BlockComment, Action::OpenBlockComment),
        (State::CommentStart, _) => (State::Line, Action::Reject),

        (State::LineComment, b'\n') => (State::LineStart, Action::EndLineComment),
        (State::LineComment, _) => (State::LineComment, Action::Push),

        (State::BlockComment | State::BlockCommentEnd, b'\n') => {
            (State::BlockComment, Action::Newline)
        }
        (State::BlockComment, b'*') => (State::BlockCommentEnd, Action::Push),
        (State::BlockComment, _) => (State::BlockComment, Action::Push),
        (State::BlockCommentEnd, b'/') => (State::LineStart, Action::CloseBlockComment),
        (State::BlockCommentEnd, _) => (State::BlockComment, Action::Push),
    }
}

/// Incremental tokenizer and tree builder for one source.
///
/// Auxiliary memory is a single span buffer that grows to the longest line
/// or comment seen.
pub struct Scanner {
    state: State,
    indent_style: IndentStyle,
    /// Leading tabs on the current physical line.
    tabs: usize,
    /// Leading spaces on the current physical line.
    spaces: usize,
    content: Vec<u8>,
    /// Current physical line, 1-based.
    line: usize,
    span_line: usize,
    span_indent: usize,
    /// Code was already finalized on the current physical line.
    after_code: bool,
    builder: TreeBuilder,
}

impl Scanner {
    /// Creates a scanner that draws nodes from `pool`.
    #[must_use]
    pub fn new(pool: NodePool, config: &ParseConfig) -> Self {
        Self {
            state: State::LineStart,
            indent_style: config.indent,
            tabs: 0,
            spaces: 0,
            content: Vec::new(),
            line: 1,
            span_line: 1,
            span_indent: 0,
            after_code: false,
            builder: TreeBuilder::new(pool),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the current 1-based physical line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consumes the next chunk of input.
    ///
    /// After an error the scanner must be discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIndentation`](crate::Error::MalformedIndentation)
    /// if a finalized span is nested more than one level below its block.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        for &byte in chunk {
            if byte != b'\r' {
                self.step(byte)?;
            }
        }
        Ok(())
    }

    /// Flushes any pending span and returns the finished tree.
    ///
    /// An unterminated block comment is kept as a comment node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIndentation`](crate::Error::MalformedIndentation)
    /// if the final span cannot be placed.
    pub fn finish(mut self) -> Result<CodeTree> {
        match self.state {
            State::LineStart | State::Line => self.flush_line(false)?,
            State::CommentStart => {
                self.content.push(b'/');
                self.flush_line(false)?;
            }
            State::LineComment => self.flush_comment()?,
            State::BlockComment | State::BlockCommentEnd => {
                tracing::warn!(
                    line = self.span_line,
                    "unterminated block comment flushed at end of input"
                );
                self.flush_comment()?;
            }
        }

        let nodes = self.builder.len();
        let lines = self.line;
        let tree = self.builder.finish();
        tracing::debug!(nodes, lines, "scan complete");
        Ok(tree)
    }

    fn step(&mut self, byte: u8) -> Result<()> {
        let (next, action) = transition(self.state, byte);
        self.state = next;

        match action {
            Action::Tab => self.tabs += 1,
            Action::Space => self.spaces += 1,
            Action::Push => self.content.push(byte),
            Action::Slash => {}
            Action::Reject => {
                self.content.push(b'/');
                return self.step(byte);
            }
            Action::OpenLineComment => self.open_comment(b"//")?,
            Action::OpenBlockComment => self.open_comment(b"/*")?,
            Action::Newline => {
                self.content.push(b'\n');
                self.line += 1;
                self.after_code = false;
            }
            Action::EndLine => {
                self.flush_line(false)?;
                self.end_physical_line();
            }
            Action::EndLineComment => {
                self.flush_comment()?;
                self.end_physical_line();
            }
            Action::CloseBlockComment => {
                self.content.push(b'/');
                self.flush_comment()?;
            }
        }

        Ok(())
    }

    fn indent(&self) -> usize {
        self.indent_style.level(self.tabs, self.spaces)
    }

    fn open_comment(&mut self, delimiter: &[u8]) -> Result<()> {
        self.flush_line(true)?;
        self.span_indent = self.indent() + usize::from(self.after_code);
        self.span_line = self.line;
        self.content.extend_from_slice(delimiter);
        Ok(())
    }

    /// Finalizes pending code. Empty content produces no node.
    fn flush_line(&mut self, trim_end: bool) -> Result<()> {
        let mut end = self.content.len();
        if trim_end {
            while end > 0 && matches!(self.content[end - 1], b' ' | b'\t') {
                end -= 1;
            }
        }

        if end > 0 {
            let indent = self.indent();
            self.builder
                .push(NodeKind::Line, indent, self.line, &self.content[..end])?;
            self.after_code = true;
        }

        self.content.clear();
        Ok(())
    }

    fn flush_comment(&mut self) -> Result<()> {
        self.builder.push(
            NodeKind::Comment,
            self.span_indent,
            self.span_line,
            &self.content,
        )?;
        self.content.clear();
        Ok(())
    }

    fn end_physical_line(&mut self) {
        self.line += 1;
        self.tabs = 0;
        self.spaces = 0;
        self.after_code = false;
    }
}
