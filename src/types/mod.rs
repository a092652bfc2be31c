//! Data types shared by indexes, the planner and the CLI.

pub mod criteria;
pub mod error;
pub mod time_range;

pub use criteria::{
    keys_of, Criteria, CriteriaType, Element, KeyCriteria, KeyExtractor, OverlapRelation,
    PredicateCriteria, Resolution, ResolvedCriteria, ResolvedSet,
};
pub use error::{MindexError, MindexResult};
pub use time_range::TimeRange;

/// Default result budget for a query when the caller has no preference.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Default budget multiplier applied when a paginating cursor reads further.
pub const DEFAULT_PAGE_GROWTH: usize = 2;

/// Full scans over more elements than this are logged as warnings.
pub const DEFAULT_SCAN_WARN_THRESHOLD: usize = 100_000;
