//! Optional YAML configuration.
//!
//! ```yaml
//! page_size: 10
//! output: json
//! text_fields: [name, player.name]
//! sort:
//!   - field: hotness
//!     direction: descending
//! criteria:
//!   - field: sport
//!     operator: equals
//!     value: NBA
//! logic: and
//! ```
//!
//! Every key is optional. Command-line flags take precedence; configured
//! criteria are combined with those given on the command line.

use std::fs;
use std::path::Path;

use a1_search::{Criterion, Logic, OrderBy, DEFAULT_PAGE_SIZE};
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::output::OutputMode;

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Items per page when `--page-size` is not given.
    pub page_size: Option<usize>,
    /// Fields scored by `--query` when no `--field` is given.
    pub text_fields: Vec<String>,
    /// Output mode when `--output` is not given.
    pub output: Option<OutputMode>,
    /// Sort applied when `--sort` is not given.
    pub sort: Vec<OrderBy>,
    /// Criteria applied to every search.
    pub criteria: Vec<Criterion>,
    /// How criteria combine when `--any` is not given.
    pub logic: Logic,
}

impl Config {
    /// Loads the config file at `path`, or defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Config::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses YAML config text. An empty document yields defaults.
    pub fn parse(text: &str) -> Result<Config> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(text)?;
        if config.page_size == Some(0) {
            anyhow::bail!("page_size must be a positive integer");
        }
        Ok(config)
    }

    /// The page size to use, preferring an explicit flag.
    pub fn page_size(&self, flag: Option<usize>) -> usize {
        flag.or(self.page_size).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// The output mode to use, preferring an explicit flag.
    pub fn output(&self, flag: Option<OutputMode>) -> OutputMode {
        flag.or(self.output).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a1_search::Dir;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size(None), 25);
        assert_eq!(config.output(None), OutputMode::Auto);
    }

    #[test]
    fn parses_every_key() {
        let config = Config::parse(
            "page_size: 10\n\
             output: csv\n\
             text_fields: [name]\n\
             sort:\n  - field: hotness\n    direction: descending\n\
             criteria:\n  - field: sport\n    operator: equals\n    value: NBA\n\
             logic: OR\n",
        )
        .unwrap();
        assert_eq!(config.page_size(None), 10);
        assert_eq!(config.page_size(Some(3)), 3);
        assert_eq!(config.output(None), OutputMode::Csv);
        assert_eq!(config.output(Some(OutputMode::Json)), OutputMode::Json);
        assert_eq!(config.text_fields, vec!["name"]);
        assert_eq!(config.sort[0].dir, Dir::Desc);
        assert_eq!(config.criteria[0].operator, "equals");
        assert_eq!(config.logic, Logic::Or);
        assert_eq!(Config::default().logic, Logic::And);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::parse("  \n").unwrap(), Config::default());
    }

    #[test]
    fn rejects_unknown_keys_and_zero_page_size() {
        assert!(Config::parse("pagesize: 10").is_err());
        assert!(Config::parse("page_size: 0").is_err());
    }

    #[test]
    fn load_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size: [").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));

        let err = Config::load(Some(Path::new("/nonexistent/a1.yaml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
