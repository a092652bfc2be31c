//! Query engine: element storage, index selection and paginated results.

pub mod limited_results;
pub mod multi_index;
pub mod planner;

pub use limited_results::LimitedResults;
pub use multi_index::MultiIndex;
pub use planner::QueryPlan;
