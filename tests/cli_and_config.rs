//! Configuration persistence and the `mindex` command layer.

use std::io::Write;

use multi_index::cli::commands::{self, FieldFilter};
use multi_index::cli::parse_records;
use multi_index::{EngineConfig, MindexError};
use tempfile::NamedTempFile;

const RECORDS: &str = r#"[
    {"name": "ada", "team": "core", "langs": ["rust", "c"]},
    {"name": "bob", "team": "web", "langs": ["ts"]},
    {"name": "cyd", "team": "core", "langs": ["rust"]},
    {"name": "dee", "team": "ops", "langs": ["go", "rust"], "oncall": true}
]"#;

fn records_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RECORDS.as_bytes()).unwrap();
    file
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn filters(exprs: &[&str]) -> Vec<FieldFilter> {
    exprs.iter().map(|e| e.parse().unwrap()).collect()
}

// ==================== Config Tests ====================

#[test]
fn test_config_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.page_growth, 2);
    assert_eq!(config.scan_warn_threshold, 100_000);
    assert_eq!(config.default_max_results, 100);
}

#[test]
fn test_config_partial_toml() {
    let config = EngineConfig::from_toml_str("page_growth = 4\n").unwrap();
    assert_eq!(config.page_growth, 4);
    assert_eq!(config.default_max_results, 100);

    assert!(matches!(
        EngineConfig::from_toml_str("page_growth = \"fast\""),
        Err(MindexError::Config(_))
    ));
}

#[test]
fn test_config_file_roundtrip() {
    let file = NamedTempFile::new().unwrap();
    let config = EngineConfig {
        page_growth: 3,
        scan_warn_threshold: 10,
        default_max_results: 5,
    };
    config.save(file.path()).unwrap();
    assert_eq!(EngineConfig::from_file(file.path()).unwrap(), config);
}

// ==================== Query Tests ====================

#[test]
fn test_query_with_index_and_residual_filter() {
    let records = parse_records(RECORDS).unwrap();
    let output = commands::run_query(
        &records,
        &fields(&["team"]),
        &filters(&["team=core|ops", "langs=rust"]),
        10,
        EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(output.total, 3);
    let mut names: Vec<&str> = output
        .matches
        .iter()
        .map(|r| r.values("name")[0].as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["ada", "cyd", "dee"]);
}

#[test]
fn test_query_limit_keeps_total() {
    let records = parse_records(RECORDS).unwrap();
    let output = commands::run_query(
        &records,
        &fields(&["langs"]),
        &filters(&["langs=rust"]),
        1,
        EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(output.total, 3);
    assert_eq!(output.matches.len(), 1);
}

#[test]
fn test_non_string_values_are_matched_as_text() {
    let records = parse_records(RECORDS).unwrap();
    let output = commands::run_query(
        &records,
        &[],
        &filters(&["oncall=true"]),
        10,
        EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(output.total, 1);
    assert_eq!(output.matches[0].id, 3);
}

#[test]
fn test_repeated_array_value_matches_once() {
    let records = parse_records(r#"[{"tag": ["x", "x"]}, {"tag": "y"}]"#).unwrap();
    for indexed in [fields(&["tag"]), Vec::new()] {
        let output = commands::run_query(
            &records,
            &indexed,
            &filters(&["tag=x"]),
            10,
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(output.total, 1);
        let ids: Vec<usize> = output.matches.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0]);
    }

    let stats = commands::run_stats(&records, &fields(&["tag"])).unwrap();
    assert_eq!(stats[0].occurrences, 2);
    assert_eq!(stats[0].largest_bucket, 1);
}

#[test]
fn test_unknown_field_is_rejected() {
    let records = parse_records(RECORDS).unwrap();
    let err = commands::run_query(
        &records,
        &fields(&["team"]),
        &filters(&["floor=3"]),
        10,
        EngineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MindexError::UnknownField(f) if f == "floor"));
}

// ==================== Explain and Stats Tests ====================

#[test]
fn test_explain_uses_most_selective_index() {
    let records = parse_records(RECORDS).unwrap();
    let plan = commands::run_explain(
        &records,
        &fields(&["team", "langs"]),
        &filters(&["langs=rust", "team=web"]),
        EngineConfig::default(),
    )
    .unwrap();
    assert!(!plan.full_scan);
    assert_eq!(plan.index_path.len(), 1);
    assert_eq!(plan.residual.len(), 1);
    assert!(plan.to_string().contains("Access: index"));
}

#[test]
fn test_stats_per_field() {
    let records = parse_records(RECORDS).unwrap();
    let stats = commands::run_stats(&records, &fields(&["team", "langs"])).unwrap();
    assert_eq!(stats[0].field, "team");
    assert_eq!(stats[0].keys, 3);
    assert_eq!(stats[0].largest_bucket, 2);
    assert_eq!(stats[1].occurrences, 6);
    assert_eq!(stats[1].largest_bucket, 3);
    assert!((stats[1].predictivity - 0.5).abs() < 1e-9);
}

// ==================== Command Tests ====================

#[test]
fn test_commands_read_files() {
    let file = records_file();
    let mut config = NamedTempFile::new().unwrap();
    config.write_all(b"default_max_results = 2\n").unwrap();

    commands::cmd_query(
        file.path(),
        &fields(&["team"]),
        &filters(&["team=core"]),
        None,
        Some(config.path()),
        true,
    )
    .unwrap();
    commands::cmd_explain(
        file.path(),
        &fields(&["team"]),
        &filters(&["team=core"]),
        None,
        false,
    )
    .unwrap();
    commands::cmd_stats(file.path(), &fields(&["team"]), false).unwrap();
}

#[test]
fn test_commands_report_bad_input() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[{\"a\": [[1]]}]").unwrap();
    let err = commands::cmd_stats(file.path(), &fields(&["a"]), false).unwrap_err();
    assert!(matches!(err, MindexError::InvalidRecord { position: 0, .. }));

    let missing = commands::cmd_stats(
        std::path::Path::new("/nonexistent/records.json"),
        &[],
        false,
    );
    assert!(matches!(missing, Err(MindexError::Io(_))));
}
