//! Multi-index: an in-memory collection with secondary indexes.
//!
//! Elements are kept in insertion order and routed into one `Indexing` per
//! criteria type. A multi-criteria query picks the most selective index
//! (descending into nested sub-indexes where it can), then filters the
//! candidates against the remaining criteria. Results are paginated: the
//! first page is realized eagerly and the true match count is always known.

pub mod cli;
pub mod config;
pub mod engine;
pub mod index;
pub mod results;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::EngineConfig;
pub use engine::{LimitedResults, MultiIndex, QueryPlan};
pub use index::{
    AddOutcome, CombinedIndex, CombinedResults, Comparator, Index, IndexRef, Indexing,
    IntervalCriteria, IntervalIndexing, KeyValueIndexing, ListIndex, MutableIndex, NestedIndex,
    SliceIndex, SortedIndex, UnitIndex,
};
pub use results::{ListResults, Results};
pub use types::{
    keys_of, Criteria, CriteriaType, Element, KeyCriteria, MindexError, MindexResult,
    OverlapRelation, PredicateCriteria, Resolution, ResolvedCriteria, ResolvedSet, TimeRange,
    DEFAULT_MAX_RESULTS, DEFAULT_PAGE_GROWTH, DEFAULT_SCAN_WARN_THRESHOLD,
};
