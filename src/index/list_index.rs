//! Insertion-ordered list index.

use crate::results::{ListResults, Results};
use crate::types::Element;

use super::{AddOutcome, Index, MutableIndex};

/// Insertion-ordered list of elements.
#[derive(Debug, Clone)]
pub struct ListIndex<T> {
    entries: Vec<T>,
    conservative: bool,
}

impl<T: Element> ListIndex<T> {
    /// Create a new, empty list index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            conservative: false,
        }
    }

    /// Create a list index that may hold elements its lookup criteria
    /// do not match.
    pub fn conservative() -> Self {
        Self {
            entries: Vec::new(),
            conservative: true,
        }
    }

    /// Create a list index from existing entries.
    pub fn from_entries(entries: Vec<T>) -> Self {
        Self {
            entries,
            conservative: false,
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Element> Default for ListIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Index<T> for ListIndex<T> {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        Some(Box::new(ListResults::borrowed(&self.entries)))
    }

    fn is_conservative(&self) -> bool {
        self.conservative
    }
}

impl<T: Element> MutableIndex<T> for ListIndex<T> {
    fn add(&mut self, entry: T) -> AddOutcome<T> {
        self.entries.push(entry);
        AddOutcome::Kept
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn as_index(&self) -> &dyn Index<T> {
        self
    }
}
