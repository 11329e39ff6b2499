//! Multi-file parsing.
//!
//! Every name is parsed on its own task. Results are collected by index, so
//! the aggregate root's children follow the input order whatever order the
//! tasks finish in.

use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::source::SourceOpener;
use crate::tree::CodeTree;
use futures::future::join_all;
use std::sync::Arc;

/// Parses `names` concurrently and joins them under one aggregate root.
///
/// Each per-source root carries its name, which its descendants inherit.
/// The trees that did succeed are released when any source fails.
///
/// # Errors
///
/// Returns [`Error::Aggregate`] with one `"{name}: {error}"` message per
/// source that failed to open or parse, in `names` order.
pub async fn parse_all<O, S>(parser: &Parser, opener: Arc<O>, names: &[S]) -> Result<CodeTree>
where
    O: SourceOpener + 'static,
    S: AsRef<str>,
{
    let names: Vec<Arc<str>> = names.iter().map(|name| Arc::from(name.as_ref())).collect();

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let parser = parser.clone();
            let opener = Arc::clone(&opener);
            let name = Arc::clone(name);
            tokio::spawn(async move { parse_one(&parser, opener.as_ref(), name).await })
        })
        .collect();

    let outcomes = join_all(handles).await;

    let mut trees = Vec::with_capacity(outcomes.len());
    let mut messages = Vec::new();
    for (name, outcome) in names.iter().zip(outcomes) {
        match outcome {
            Ok(Ok(tree)) => trees.push(tree),
            Ok(Err(error)) => {
                tracing::warn!(source = %name, error = %error, "source failed to parse");
                messages.push(format!("{name}: {error}"));
            }
            Err(join_error) => {
                tracing::warn!(source = %name, error = %join_error, "parse task failed");
                messages.push(format!("{name}: parse task failed: {join_error}"));
            }
        }
    }

    if !messages.is_empty() {
        return Err(Error::Aggregate { messages });
    }

    tracing::debug!(sources = trees.len(), "aggregated sources");
    Ok(CodeTree::aggregate(parser.pool().clone(), trees))
}

async fn parse_one<O>(parser: &Parser, opener: &O, name: Arc<str>) -> Result<CodeTree>
where
    O: SourceOpener + ?Sized,
{
    let reader = opener.open(&name).await?;
    let mut tree = parser.parse_reader(reader).await?;
    tracing::debug!(source = %name, nodes = tree.len(), "parsed source");
    tree.set_source_name(name);
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySources;
    use crate::tree::{AGGREGATE_ROOT_INDENT, FILE_ROOT_INDENT};

    fn sources() -> Arc<MemorySources> {
        Arc::new(
            MemorySources::new()
                .with("layout.tpl", "html\n\thead\n\tbody\n")
                .with("page.tpl", "main\n\t// content here\n")
                .with("broken.tpl", "a\n\t\t\tb\n"),
        )
    }

    #[tokio::test]
    async fn children_follow_name_order() {
        let parser = Parser::new();
        let tree = parse_all(&parser, sources(), &["page.tpl", "layout.tpl"])
            .await
            .unwrap();

        let root = tree.root();
        assert_eq!(root.indent(), AGGREGATE_ROOT_INDENT);
        let names: Vec<_> = root.children().map(|n| n.source_name()).collect();
        assert_eq!(names, [Some("page.tpl"), Some("layout.tpl")]);

        let layout = root.child(1).unwrap();
        assert_eq!(layout.indent(), FILE_ROOT_INDENT);
        let body = layout.child(0).unwrap().child(1).unwrap();
        assert_eq!(body.content(), "body");
        assert_eq!(body.source_name(), Some("layout.tpl"));
    }

    #[tokio::test]
    async fn empty_name_list_gives_empty_aggregate() {
        let parser = Parser::new();
        let names: [&str; 0] = [];
        let tree = parse_all(&parser, sources(), &names).await.unwrap();
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn every_failure_is_reported() {
        let parser = Parser::new();
        let result = parse_all(
            &parser,
            sources(),
            &["layout.tpl", "broken.tpl", "missing.tpl"],
        )
        .await;

        let Err(Error::Aggregate { messages }) = result else {
            panic!("expected aggregate failure");
        };
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("broken.tpl: line 2"));
        assert!(messages[1].starts_with("missing.tpl: IO error"));
    }

    #[tokio::test]
    async fn failure_releases_successful_trees() {
        let parser = Parser::new();
        let result = parse_all(&parser, sources(), &["layout.tpl", "missing.tpl"]).await;

        assert!(result.is_err());
        // root + html + head + body
        assert_eq!(parser.pool().idle_len(), 4);
    }
}
