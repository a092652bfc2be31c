//! Single-member index that grows into a `ListIndex`.

use crate::results::{ListResults, Results};
use crate::types::Element;

use super::{AddOutcome, Index, ListIndex, MutableIndex};

/// Holds at most one element. Most key values of a key/value indexing are
/// seen once, so buckets start here and are replaced by a `ListIndex` on the
/// second add.
#[derive(Debug, Clone)]
pub struct UnitIndex<T> {
    entry: Option<T>,
}

impl<T: Element> UnitIndex<T> {
    /// Create a new, empty unit index.
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// The member, if any.
    pub fn entry(&self) -> Option<&T> {
        self.entry.as_ref()
    }
}

impl<T: Element> Default for UnitIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Index<T> for UnitIndex<T> {
    fn size(&self) -> usize {
        usize::from(self.entry.is_some())
    }

    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        Some(Box::new(ListResults::borrowed(self.entry.as_slice())))
    }
}

impl<T: Element> MutableIndex<T> for UnitIndex<T> {
    fn add(&mut self, entry: T) -> AddOutcome<T> {
        match self.entry.take() {
            None => {
                self.entry = Some(entry);
                AddOutcome::Kept
            }
            Some(existing) => {
                AddOutcome::Replaced(Box::new(ListIndex::from_entries(vec![existing, entry])))
            }
        }
    }

    fn clear(&mut self) {
        self.entry = None;
    }

    fn as_index(&self) -> &dyn Index<T> {
        self
    }
}
