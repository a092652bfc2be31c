//! Result cursors over result sets that may be only partially realized.

pub mod list_results;

use std::borrow::Cow;

pub use list_results::ListResults;

/// A cursor over a result set.
///
/// `size` is the total number of results the query produced; `available` is
/// how many of them are realized right now. Positions are zero-based.
pub trait Results<T: Clone> {
    /// Total number of results, realized or not.
    fn size(&self) -> usize;

    /// Number of results realized without further work. Never exceeds `size`.
    fn available(&self) -> usize;

    /// Realize every result up to and including `position` (clamped to
    /// `size`), returning the new `available()`. May re-run the underlying
    /// query.
    fn read_to(&mut self, position: usize) -> usize;

    /// Realize all results and return them in order.
    fn realize(&mut self) -> Cow<'_, [T]>;

    /// Iterate the realized prefix.
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;

    /// Whether the result set is empty.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
