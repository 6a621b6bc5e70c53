//! Subcommand handlers.
//!
//! Each handler builds a serializable report and renders it either through
//! [`serialize_structured`] or as styled text.

use std::fmt::Write as _;
use std::fs;

use a1_search::{
    facets, field_stats, suggest, Criterion, Dir, Facet, FieldStats, Logic, OrderBy, Page,
    PageRequest, Query, Record, RecordSource, SearchSession, Searchable, SessionState,
};
use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::cli::{Cli, Command, SearchArgs, StatsArgs, SuggestArgs};
use crate::config::Config;
use crate::output::{serialize_structured, OutputMode, Palette};
use crate::source::JsonFileSource;

/// Runs the parsed command line and returns what to print.
pub fn run(cli: Cli) -> Result<String> {
    let config = Config::load(cli.config.as_deref())?;
    let mode = config.output(cli.output);
    match &cli.command {
        Command::Search(args) => search(args, &config, mode),
        Command::Suggest(args) => suggestions(args, mode),
        Command::Stats(args) => stats(args, mode),
    }
}

// ============================================================================
// search
// ============================================================================

/// Result page plus any requested facet counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    #[serde(flatten)]
    pub page: Page<Record>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

fn search(args: &SearchArgs, config: &Config, mode: OutputMode) -> Result<String> {
    let source = JsonFileSource::new(&args.records);
    let query = build_query(args, config)?;
    let request = PageRequest::new(config.page_size(args.page_size), args.page)?;
    let fields: Vec<&str> = args.facets.iter().map(String::as_str).collect();

    let mut session = SearchSession::new();
    // facets describe the whole filtered set, not just this page
    let (state, facet_counts) = session.run_inspecting(&query, &source, request, |records| {
        if fields.is_empty() {
            return Vec::new();
        }
        let matched = query.filter(records, Record::accessor);
        facets(&matched, &fields, |record: &&Record, field| record.get(field))
    });
    let page = match state {
        SessionState::Ready { page } => page.clone(),
        SessionState::Failed { error } => bail!("search failed: {error}"),
        state => bail!("search did not finish: {state:?}"),
    };

    let report = SearchReport {
        page,
        facets: facet_counts.unwrap_or_default(),
    };
    match mode {
        OutputMode::Csv => Ok(serialize_structured(&report.page.items, mode)?),
        mode if mode.is_structured() => Ok(serialize_structured(&report, mode)?),
        mode => Ok(render_search(&report, &text_fields(args, config), &mode.palette())),
    }
}

/// Assembles the query from config defaults and flags.
pub fn build_query(args: &SearchArgs, config: &Config) -> Result<Query> {
    let mut criteria: Vec<Criterion> = config.criteria.clone();
    if let Some(path) = &args.criteria_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read criteria file {}", path.display()))?;
        let from_file: Vec<Criterion> = serde_json::from_str(&text)
            .with_context(|| format!("invalid criteria file {}", path.display()))?;
        criteria.extend(from_file);
    }
    criteria.extend(args.criteria.iter().cloned());

    let logic = if args.any { Logic::Or } else { config.logic };
    let mut query = Query::from_criteria_with(&criteria, logic);

    if let Some(text) = &args.query {
        query = query.search(text, text_fields(args, config));
    }

    if args.sort.is_empty() {
        for order in &config.sort {
            query = query.order(order.clone());
        }
    } else {
        let dir = if args.desc { Dir::Desc } else { Dir::Asc };
        for field in &args.sort {
            query = query.order(OrderBy::new(field.as_str(), dir));
        }
    }

    Ok(query.build())
}

fn text_fields(args: &SearchArgs, config: &Config) -> Vec<String> {
    if args.fields.is_empty() {
        config.text_fields.clone()
    } else {
        args.fields.clone()
    }
}

fn render_search(report: &SearchReport, fields: &[String], palette: &Palette) -> String {
    let page = &report.page;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        palette.heading.apply_to(format!(
            "Page {} of {} ({} results)",
            page.page_number, page.total_pages, page.total_items
        ))
    );

    let first = page
        .page_number
        .saturating_sub(1)
        .saturating_mul(page.page_size);
    for (offset, record) in page.items.iter().enumerate() {
        let id = record
            .id()
            .map(|id| format!(" {}", palette.muted.apply_to(format!("[{id}]"))))
            .unwrap_or_default();
        let _ = writeln!(out, "{:>4}. {}{}", first + offset + 1, label(record, fields), id);
    }
    if page.items.is_empty() {
        let _ = writeln!(out, "{}", palette.muted.apply_to("no results on this page"));
    }

    for facet in &report.facets {
        let counts: Vec<String> = facet
            .values
            .iter()
            .map(|(value, count)| format!("{value} ({count})"))
            .collect();
        let _ = writeln!(
            out,
            "{}: {}",
            palette.accent.apply_to(&facet.field),
            counts.join(", ")
        );
    }
    out
}

/// Display label: the first text field with a string value, else the record as JSON.
fn label(record: &Record, fields: &[String]) -> String {
    fields
        .iter()
        .map(String::as_str)
        .chain(["name"])
        .find_map(|field| record.get(field).as_str().map(String::from))
        .unwrap_or_else(|| serde_json::Value::Object(record.as_map().clone()).to_string())
}

// ============================================================================
// suggest
// ============================================================================

fn suggestions(args: &SuggestArgs, mode: OutputMode) -> Result<String> {
    let records = JsonFileSource::new(&args.records).fetch()?;
    let hits = suggest(&records, &args.field, &args.partial, args.max, Record::accessor);
    if mode.is_structured() {
        return Ok(serialize_structured(&hits, mode)?);
    }
    let palette = mode.palette();
    if hits.is_empty() {
        return Ok(format!("{}\n", palette.muted.apply_to("no suggestions")));
    }
    Ok(hits.iter().map(|hit| format!("{hit}\n")).collect())
}

// ============================================================================
// stats
// ============================================================================

fn stats(args: &StatsArgs, mode: OutputMode) -> Result<String> {
    let records = JsonFileSource::new(&args.records).fetch()?;
    let summary = field_stats(&records, &args.field, Record::accessor);
    if mode.is_structured() {
        return Ok(serialize_structured(&summary, mode)?);
    }
    let palette = mode.palette();
    match summary {
        Some(summary) => Ok(render_stats(&args.field, &summary, &palette)),
        None => Ok(format!(
            "{}\n",
            palette
                .muted
                .apply_to(format!("no numeric values for {}", args.field))
        )),
    }
}

fn render_stats(field: &str, s: &FieldStats, palette: &Palette) -> String {
    let mut out = format!("{}\n", palette.heading.apply_to(field));
    let rows = [
        ("count", s.count as f64),
        ("min", s.min),
        ("max", s.max),
        ("mean", s.mean),
        ("median", s.median),
        ("unique", s.unique_values as f64),
        ("p25", s.p25),
        ("p75", s.p75),
        ("p90", s.p90),
        ("p95", s.p95),
    ];
    for (name, value) in rows {
        let _ = writeln!(out, "  {:<7}{}", palette.accent.apply_to(name), value);
    }
    out
}
