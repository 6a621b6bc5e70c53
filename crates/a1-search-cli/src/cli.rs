//! Command-line definition.

use std::path::PathBuf;

use a1_search::Criterion;
use clap::{Args, Parser, Subcommand};

use crate::output::OutputMode;

/// Filter, rank and page JSON record sets.
#[derive(Debug, Parser)]
#[command(name = "a1-search", version)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, value_enum)]
    pub output: Option<OutputMode>,

    /// YAML config file
    #[arg(long, global = true, env = "A1_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter, rank, sort and paginate records
    Search(SearchArgs),
    /// Suggest field values for a partial input
    Suggest(SuggestArgs),
    /// Summarize a numeric field
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// JSON file holding an array of records ("-" for stdin)
    #[arg(long, short)]
    pub records: PathBuf,

    /// Free-text query scored against the text fields
    #[arg(long, short)]
    pub query: Option<String>,

    /// Field scored by --query (repeatable)
    #[arg(long = "field", short = 'f')]
    pub fields: Vec<String>,

    /// Criterion as FIELD:OPERATOR:VALUE, VALUE in JSON (repeatable)
    #[arg(long = "where", short = 'w', value_parser = parse_criterion)]
    pub criteria: Vec<Criterion>,

    /// JSON file holding an array of criteria
    #[arg(long = "criteria")]
    pub criteria_file: Option<PathBuf>,

    /// Match records satisfying any criterion instead of all
    #[arg(long)]
    pub any: bool,

    /// Sort field path (repeatable; later fields break ties)
    #[arg(long = "sort", short = 's')]
    pub sort: Vec<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// 1-based page number
    #[arg(long, short, default_value_t = 1)]
    pub page: usize,

    /// Items per page
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<usize>,

    /// Count values of a field alongside the results (repeatable)
    #[arg(long = "facet")]
    pub facets: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// JSON file holding an array of records ("-" for stdin)
    #[arg(long, short)]
    pub records: PathBuf,

    /// Field path to draw suggestions from
    #[arg(long, short)]
    pub field: String,

    /// Partial input to complete
    pub partial: String,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = 10)]
    pub max: usize,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// JSON file holding an array of records ("-" for stdin)
    #[arg(long, short)]
    pub records: PathBuf,

    /// Numeric field path
    #[arg(long, short)]
    pub field: String,
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("page size must be a positive integer".into()),
        Ok(size) => Ok(size),
        Err(err) => Err(err.to_string()),
    }
}

/// Parses `FIELD:OPERATOR:VALUE`.
///
/// VALUE is read as JSON when it parses, and as a plain string otherwise, so
/// `team:equals:BOS` and `hotness:range:[80,100]` both work.
pub fn parse_criterion(raw: &str) -> Result<Criterion, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected FIELD:OPERATOR:VALUE, got '{raw}'"));
    };
    if field.is_empty() {
        return Err("criterion field is empty".into());
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(Criterion::new(field, operator, value))
}
