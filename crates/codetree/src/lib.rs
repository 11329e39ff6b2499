//! Turns tab-indented source into a block tree.
//!
//! Nesting depth comes from leading tabs alone. `//` and `/* ... */` comments
//! are recognized and placed in the tree next to the code they annotate; the
//! text of a line is otherwise left uninterpreted.
//!
//! Parsing is a single pass over a byte stream that may arrive in chunks of
//! any size. Node records are drawn from a shared [`NodePool`] and returned to
//! it when a [`CodeTree`] is dropped.
//!
//! # Examples
//!
//! ```
//! use codetree::{NodeKind, Parser};
//!
//! let parser = Parser::new();
//! let tree = parser.parse_str("code\n\t// trailing note\n").unwrap();
//!
//! let code = tree.root().child(0).unwrap();
//! assert_eq!(code.indent(), 0);
//! assert_eq!(code.child(0).unwrap().kind(), NodeKind::Comment);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
mod builder;
pub mod config;
pub mod error;
pub mod node;
pub mod parser;
pub mod pool;
pub mod reader;
pub mod scanner;
pub mod source;
pub mod tree;

pub use config::{IndentStyle, ParseConfig};
pub use error::{Error, Result};
pub use node::{Node, NodeId, NodeKind};
pub use parser::Parser;
pub use pool::NodePool;
pub use reader::CodeTreeReader;
pub use scanner::{Action, Scanner, State};
pub use source::{FsOpener, MemorySources, SourceOpener, SourceReader};
pub use tree::{CodeTree, NodeRef, Preorder};
