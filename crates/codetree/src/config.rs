//! Parser configuration.
//!
//! Configuration is plain data so an orchestrator can embed it in its own
//! YAML settings file. A minimal file looks like:
//!
//! ```yaml
//! indent:
//!   style: mixed
//!   spaces_per_level: 2
//! read_buffer_size: 16384
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Default capacity of the buffered reader used by async parsing.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Spaces per indentation level used by the historical mixed-indent variant.
pub const DEFAULT_SPACES_PER_LEVEL: usize = 2;

/// How leading whitespace maps to nesting depth.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum IndentStyle {
    /// Only tabs count. Leading spaces are stripped from content but add no depth.
    #[default]
    Tabs,

    /// Tabs count one level each, and every `spaces_per_level` spaces add one more.
    Mixed {
        /// Number of spaces equivalent to one tab.
        #[serde(default = "default_spaces_per_level")]
        spaces_per_level: usize,
    },
}

fn default_spaces_per_level() -> usize {
    DEFAULT_SPACES_PER_LEVEL
}

impl IndentStyle {
    /// Computes the effective indent from leading tab and space counts.
    #[must_use]
    pub fn level(self, tabs: usize, spaces: usize) -> usize {
        match self {
            Self::Tabs => tabs,
            Self::Mixed { spaces_per_level } => tabs + spaces.checked_div(spaces_per_level).unwrap_or(0),
        }
    }
}

/// Configuration for a [`Parser`](crate::Parser).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    /// Indentation rule.
    pub indent: IndentStyle,

    /// Capacity of the buffered reader wrapping async sources.
    pub read_buffer_size: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::Tabs,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl ParseConfig {
    /// Parses and validates a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid YAML for this
    /// type or fails [`validate`](Self::validate).
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::Config`]
    /// if its contents are invalid.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml_str(&content)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `spaces_per_level` or `read_buffer_size`
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if let IndentStyle::Mixed {
            spaces_per_level: 0,
        } = self.indent
        {
            return Err(Error::Config(
                "spaces_per_level must be at least 1".to_string(),
            ));
        }

        if self.read_buffer_size == 0 {
            return Err(Error::Config(
                "read_buffer_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::tabs_only(IndentStyle::Tabs, 2, 4, 2)]
    #[case::tabs_ignore_spaces(IndentStyle::Tabs, 0, 8, 0)]
    #[case::mixed_halves_spaces(IndentStyle::Mixed { spaces_per_level: 2 }, 1, 4, 3)]
    #[case::mixed_rounds_down(IndentStyle::Mixed { spaces_per_level: 2 }, 0, 3, 1)]
    #[case::mixed_four_wide(IndentStyle::Mixed { spaces_per_level: 4 }, 1, 7, 2)]
    fn indent_level(
        #[case] style: IndentStyle,
        #[case] tabs: usize,
        #[case] spaces: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(style.level(tabs, spaces), expected);
    }

    #[test]
    fn default_config_is_tabs() {
        let config = ParseConfig::default();
        assert_eq!(config.indent, IndentStyle::Tabs);
        assert_eq!(config.read_buffer_size, DEFAULT_READ_BUFFER_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_mixed_style() {
        let config = ParseConfig::from_yaml_str(
            "indent:\n  style: mixed\n  spaces_per_level: 4\nread_buffer_size: 64\n",
        )
        .unwrap();

        assert_eq!(config.indent, IndentStyle::Mixed { spaces_per_level: 4 });
        assert_eq!(config.read_buffer_size, 64);
    }

    #[test]
    fn yaml_mixed_uses_default_width() {
        let config = ParseConfig::from_yaml_str("indent:\n  style: mixed\n").unwrap();
        assert_eq!(
            config.indent,
            IndentStyle::Mixed {
                spaces_per_level: DEFAULT_SPACES_PER_LEVEL
            }
        );
    }

    #[test]
    fn yaml_empty_mapping_gives_defaults() {
        let config = ParseConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ParseConfig::default());
    }

    #[rstest]
    #[case::zero_width("indent:\n  style: mixed\n  spaces_per_level: 0\n")]
    #[case::zero_buffer("read_buffer_size: 0\n")]
    #[case::unknown_style("indent:\n  style: spaces\n")]
    fn yaml_rejects_invalid(#[case] yaml: &str) {
        let result = ParseConfig::from_yaml_str(yaml);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codetree.yaml");
        tokio::fs::write(&path, "read_buffer_size: 128\n")
            .await
            .unwrap();

        let config = ParseConfig::load(&path).await.unwrap();
        assert_eq!(config.read_buffer_size, 128);
        assert_eq!(config.indent, IndentStyle::Tabs);
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParseConfig::load(&dir.path().join("missing.yaml")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
