//! Integration tests driving the command line through `run`.

use std::io::Write;

use a1_search_cli::{run, Cli};
use clap::Parser;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn json_file(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn players() -> NamedTempFile {
    json_file(&json!([
        {"id": "p1", "name": "LeBron James", "team": "LAL", "hotness": 94, "tags": ["hot"]},
        {"id": "p2", "name": "Stephen Curry", "team": "GSW", "hotness": 88, "tags": ["hot", "value"]},
        {"id": "p3", "name": "Jayson Tatum", "team": "BOS", "hotness": 91, "tags": ["value"]},
        {"id": "p4", "name": "Jaylen Brown", "team": "BOS", "tags": []}
    ]))
}

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["a1-search"];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn search_sorts_and_pages_as_json() {
    let records = players();
    let out = run_args(&[
        "-o", "json", "search", "-r", path(&records), "--sort", "hotness", "--desc",
        "--page-size", "2", "--page", "2",
    ])
    .unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalItems"], 4);
    assert_eq!(page["totalPages"], 2);
    let ids: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    // p4 has no hotness and sorts last
    assert_eq!(ids, vec!["p2", "p4"]);
    assert!(page.get("facets").is_none());
    assert_eq!(page["hasNext"], false);
    assert_eq!(page["hasPrevious"], true);
    assert_eq!(page["isFirstPage"], false);
    assert_eq!(page["isLastPage"], true);
}

#[test]
fn first_page_reports_navigation_flags() {
    let records = players();
    let out = run_args(&["-o", "yaml", "search", "-r", path(&records), "--page-size", "1"]).unwrap();
    let page: Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(page["hasNext"], true);
    assert_eq!(page["hasPrevious"], false);
    assert_eq!(page["isFirstPage"], true);
    assert_eq!(page["isLastPage"], false);
}

#[test]
fn query_without_fields_searches_every_value() {
    let records = players();
    let out = run_args(&["-o", "json", "search", "-r", path(&records), "-q", "gsw"]).unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["id"], "p2");

    let out = run_args(&["-o", "json", "search", "-r", path(&records), "-q", "91"]).unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["items"][0]["id"], "p3");
}

#[test]
fn any_matches_either_criterion() {
    let records = players();
    let out = run_args(&[
        "-o", "json", "search", "-r", path(&records), "--any",
        "-w", "team:equals:LAL", "-w", "team:equals:GSW", "--facet", "team",
    ])
    .unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["totalItems"], 2);
    assert_eq!(report["facets"][0]["values"], json!([["LAL", 1], ["GSW", 1]]));

    let out = run_args(&[
        "-o", "json", "search", "-r", path(&records),
        "-w", "team:equals:LAL", "-w", "team:equals:GSW",
    ])
    .unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalItems"], 0);
}

#[test]
fn negated_operators_from_the_command_line() {
    let records = players();
    let out = run_args(&[
        "-o", "json", "search", "-r", path(&records), "-w", r#"team:notIn:["BOS"]"#,
    ])
    .unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalItems"], 2);
}

#[test]
fn search_with_criteria_and_facets() {
    let records = players();
    let out = run_args(&[
        "--output", "json", "search", "--records", path(&records),
        "--where", r#"tags:includes:["value"]"#, "--facet", "team",
    ])
    .unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["totalItems"], 2);
    assert_eq!(report["facets"][0]["field"], "team");
    assert_eq!(report["facets"][0]["values"][0], json!(["GSW", 1]));
}

#[test]
fn text_query_ranks_and_renders_text() {
    let records = players();
    let out = run_args(&[
        "-o", "text", "search", "-r", path(&records), "-q", "ja", "-f", "name",
    ])
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Page 1 of 1 (3 results)");
    // equal scores keep input order
    assert_eq!(lines[1], "   1. LeBron James [p1]");
    assert_eq!(lines[2], "   2. Jayson Tatum [p3]");
    assert_eq!(lines[3], "   3. Jaylen Brown [p4]");
}

#[test]
fn criteria_file_and_config_defaults() {
    let records = players();
    let criteria = json_file(&json!([
        {"field": "team", "operator": "equals", "value": "BOS"}
    ]));
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "output: csv\nsort:\n  - field: name\n    direction: asc").unwrap();

    let out = run_args(&[
        "--config", path(&config), "search", "-r", path(&records),
        "--criteria", path(&criteria),
    ])
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    // headers are the union of keys; p4 has no hotness
    assert_eq!(lines[0], "id,name,tags,team,hotness");
    assert_eq!(lines[1], "p4,Jaylen Brown,[],BOS,");
    assert_eq!(lines[2], r#"p3,Jayson Tatum,"[""value""]",BOS,91"#);
    assert_eq!(lines.len(), 3);
}

#[test]
fn out_of_range_page_is_empty_not_an_error() {
    let records = players();
    let out = run_args(&["-o", "json", "search", "-r", path(&records), "--page", "9"]).unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["totalPages"], 1);
}

#[test]
fn malformed_where_clause_matches_nothing() {
    let records = players();
    let out = run_args(&[
        "-o", "json", "search", "-r", path(&records), "-w", "team:resembles:BOS",
    ])
    .unwrap();
    let page: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(page["totalItems"], 0);
}

#[test]
fn suggest_lists_values() {
    let records = players();
    let out = run_args(&["suggest", "-r", path(&records), "-f", "name", "ja"]).unwrap();
    assert_eq!(out, "Jaylen Brown\nJayson Tatum\nLeBron James\n");

    let out = run_args(&["-o", "json", "suggest", "-r", path(&records), "-f", "name", "zz"]).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), json!([]));
}

#[test]
fn stats_as_yaml() {
    let records = players();
    let out = run_args(&["-o", "yaml", "stats", "-r", path(&records), "-f", "hotness"]).unwrap();
    let stats: Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(stats["count"], 3);
    assert_eq!(stats["max"], 94.0);
    assert_eq!(stats["median"], 91.0);
}

#[test]
fn stats_without_numbers() {
    let records = players();
    let out = run_args(&["-o", "text", "stats", "-r", path(&records), "-f", "team"]).unwrap();
    assert_eq!(out, "no numeric values for team\n");
}

#[test]
fn missing_records_file_is_an_error() {
    let err = run_args(&["stats", "-r", "/nonexistent/players.json", "-f", "hotness"]).unwrap_err();
    assert!(err.to_string().contains("cannot read"));
}

#[test]
fn search_source_failure_surfaces_the_session_error() {
    let err = run_args(&["search", "-r", "/nonexistent/players.json"]).unwrap_err();
    let message = err.to_string();
    assert!(
        message.starts_with("search failed: record source failed: cannot read"),
        "{message}"
    );

    let broken = json_file(&json!({"not": "an array"}));
    let err = run_args(&["search", "-r", path(&broken), "--facet", "team"]).unwrap_err();
    assert!(err.to_string().starts_with("search failed: "));
    assert!(err.to_string().contains("not a JSON array of objects"));
}

#[test]
fn invalid_config_is_an_error() {
    let records = players();
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "page_size: 0").unwrap();
    let err = run_args(&["--config", path(&config), "search", "-r", path(&records)]).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));
}
