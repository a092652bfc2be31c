//! CLI command implementations.

use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::{MultiIndex, QueryPlan};
use crate::index::{Indexing, KeyValueIndexing};
use crate::results::Results;
use crate::types::{Criteria, CriteriaType, KeyCriteria, MindexError, MindexResult};

use super::record::{load_records, Record};

/// A `FIELD=VALUE[|VALUE...]` filter: the field must hold any of the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub values: Vec<String>,
}

impl FromStr for FieldFilter {
    type Err = MindexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, values) = s
            .split_once('=')
            .ok_or_else(|| MindexError::InvalidCriteria(format!("missing '=' in '{}'", s)))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(MindexError::InvalidCriteria(format!(
                "missing field name in '{}'",
                s
            )));
        }
        Ok(Self {
            field: field.to_string(),
            values: values.split('|').map(str::to_string).collect(),
        })
    }
}

/// Keys of `field` on a record.
fn field_values(field: &str) -> impl Fn(&Rc<Record>) -> Vec<String> + 'static {
    let field = field.to_string();
    move |record: &Rc<Record>| record.values(&field).to_vec()
}

/// Indexing keyed by the values of `field`, ordered by record id.
pub fn field_indexing(field: &str) -> KeyValueIndexing<String, Rc<Record>> {
    KeyValueIndexing::new(CriteriaType::named(field), field_values(field))
        .with_ordering(|a: &Rc<Record>, b: &Rc<Record>| a.id.cmp(&b.id))
}

/// Criteria for a filter, typed by its field name.
pub fn filter_criteria(filter: &FieldFilter) -> KeyCriteria<String, Rc<Record>> {
    KeyCriteria::new(
        CriteriaType::named(filter.field.as_str()),
        filter.values.clone(),
        field_values(&filter.field),
    )
}

/// Load `records` into a multi-index with one indexing per `indexed` field.
pub fn build_index(
    records: &[Rc<Record>],
    indexed: &[String],
    config: EngineConfig,
) -> MultiIndex<Rc<Record>> {
    let mut index = MultiIndex::with_config(config);
    for field in indexed {
        index.add_index(field_indexing(field));
    }
    index.add_all(records.iter().cloned());
    index
}

/// Every name in `fields` must appear in at least one record.
fn check_fields<'f>(
    records: &[Rc<Record>],
    fields: impl IntoIterator<Item = &'f str>,
) -> MindexResult<()> {
    for field in fields {
        if !records.iter().any(|r| r.has_field(field)) {
            return Err(MindexError::UnknownField(field.to_string()));
        }
    }
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> MindexResult<EngineConfig> {
    match config_path {
        Some(path) => EngineConfig::from_file(path),
        None => Ok(EngineConfig::default()),
    }
}

/// First page of a query and the full match count.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    pub total: usize,
    pub matches: Vec<Record>,
}

/// Run `filters` over `records`, realizing at most `limit` matches.
pub fn run_query(
    records: &[Rc<Record>],
    indexed: &[String],
    filters: &[FieldFilter],
    limit: usize,
    config: EngineConfig,
) -> MindexResult<QueryOutput> {
    check_fields(
        records,
        indexed
            .iter()
            .map(String::as_str)
            .chain(filters.iter().map(|f| f.field.as_str())),
    )?;
    let index = build_index(records, indexed, config);
    let criteria: Vec<_> = filters.iter().map(filter_criteria).collect();
    let refs: Vec<&dyn Criteria<Rc<Record>>> = criteria
        .iter()
        .map(|c| c as &dyn Criteria<Rc<Record>>)
        .collect();

    let mut results = index.get_matches(&refs, limit);
    if limit > 0 {
        results.read_to(limit - 1);
    }
    Ok(QueryOutput {
        total: results.size(),
        matches: results
            .iter()
            .take(limit)
            .map(|r| Record::clone(r))
            .collect(),
    })
}

/// The plan `run_query` would follow.
pub fn run_explain(
    records: &[Rc<Record>],
    indexed: &[String],
    filters: &[FieldFilter],
    config: EngineConfig,
) -> MindexResult<QueryPlan> {
    check_fields(
        records,
        indexed
            .iter()
            .map(String::as_str)
            .chain(filters.iter().map(|f| f.field.as_str())),
    )?;
    let index = build_index(records, indexed, config);
    let criteria: Vec<_> = filters.iter().map(filter_criteria).collect();
    let refs: Vec<&dyn Criteria<Rc<Record>>> = criteria
        .iter()
        .map(|c| c as &dyn Criteria<Rc<Record>>)
        .collect();
    Ok(index.explain(&refs))
}

/// Key statistics for one indexed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub field: String,
    /// Distinct values.
    pub keys: usize,
    /// Value occurrences over all records.
    pub occurrences: usize,
    /// Records under the most common value.
    pub largest_bucket: usize,
    /// Fraction of records under the most common value.
    pub predictivity: f64,
}

/// Statistics for each of `indexed`.
pub fn run_stats(records: &[Rc<Record>], indexed: &[String]) -> MindexResult<Vec<FieldStats>> {
    check_fields(records, indexed.iter().map(String::as_str))?;
    Ok(indexed
        .iter()
        .map(|field| {
            let mut indexing = field_indexing(field);
            for record in records {
                indexing.add(record);
            }
            FieldStats {
                field: field.clone(),
                keys: indexing.key_count(),
                occurrences: indexing.total_keys(),
                largest_bucket: indexing.max_size(),
                predictivity: indexing.predictivity(None),
            }
        })
        .collect())
}

/// Query a record file.
pub fn cmd_query(
    path: &Path,
    indexed: &[String],
    filters: &[FieldFilter],
    limit: Option<usize>,
    config_path: Option<&Path>,
    json: bool,
) -> MindexResult<()> {
    let config = load_config(config_path)?;
    let limit = limit.unwrap_or(config.default_max_results);
    let records = load_records(path)?;
    let output = run_query(&records, indexed, filters, limit, config)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        for record in &output.matches {
            println!("#{} {}", record.id, format_fields(record));
        }
        if output.total > output.matches.len() {
            println!(
                "{} matches ({} shown)",
                output.total,
                output.matches.len()
            );
        } else {
            println!("{} matches", output.total);
        }
    }
    Ok(())
}

/// Show how a query over a record file would be answered.
pub fn cmd_explain(
    path: &Path,
    indexed: &[String],
    filters: &[FieldFilter],
    config_path: Option<&Path>,
    json: bool,
) -> MindexResult<()> {
    let config = load_config(config_path)?;
    let records = load_records(path)?;
    let plan = run_explain(&records, indexed, filters, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan).unwrap_or_default());
    } else {
        println!("{}", plan);
    }
    Ok(())
}

/// Print per-field index statistics for a record file.
pub fn cmd_stats(path: &Path, indexed: &[String], json: bool) -> MindexResult<()> {
    let records = load_records(path)?;
    let stats = run_stats(&records, indexed)?;

    if json {
        let info = serde_json::json!({
            "records": records.len(),
            "fields": stats,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("Records: {}", records.len());
        for s in &stats {
            println!("Field {}:", s.field);
            println!("  Distinct values: {}", s.keys);
            println!("  Occurrences: {}", s.occurrences);
            println!("  Largest bucket: {}", s.largest_bucket);
            println!("  Predictivity: {:.3}", s.predictivity);
        }
    }
    Ok(())
}

fn format_fields(record: &Record) -> String {
    record
        .fields
        .iter()
        .map(|(name, values)| match values.as_slice() {
            [single] => format!("{}={}", name, single),
            many => format!("{}=[{}]", name, many.join(",")),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
