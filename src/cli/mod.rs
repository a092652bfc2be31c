//! Support for the `mindex` command-line tool.

pub mod commands;
pub mod record;

pub use record::{load_records, parse_records, Record};
