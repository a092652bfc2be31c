//! Nested index: a list of members plus an indexing over exactly those members.

use crate::results::{ListResults, Results};
use crate::types::Element;

use super::{AddOutcome, Index, Indexing, MutableIndex};

/// A bucket that can be narrowed further: every member is also fed to a
/// sub-indexing scoped to this bucket alone.
pub struct NestedIndex<T: Element> {
    entries: Vec<T>,
    sub: Box<dyn Indexing<T>>,
}

impl<T: Element> NestedIndex<T> {
    /// Create an empty bucket over the given (empty) sub-indexing.
    pub fn new(sub: impl Indexing<T> + 'static) -> Self {
        Self {
            entries: Vec::new(),
            sub: Box::new(sub),
        }
    }

    /// All members in insertion order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Element> Index<T> for NestedIndex<T> {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        Some(Box::new(ListResults::borrowed(&self.entries)))
    }

    fn sub_indexing(&self) -> Option<&dyn Indexing<T>> {
        Some(self.sub.as_ref())
    }
}

impl<T: Element> MutableIndex<T> for NestedIndex<T> {
    fn add(&mut self, entry: T) -> AddOutcome<T> {
        self.sub.add(&entry);
        self.entries.push(entry);
        AddOutcome::Kept
    }

    fn clear(&mut self) {
        self.sub.clear();
        self.entries.clear();
    }

    fn as_index(&self) -> &dyn Index<T> {
        self
    }
}
