//! Sorted index for range lookups.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::results::{ListResults, Results};
use crate::types::Element;

use super::{AddOutcome, Comparator, Index, MutableIndex};

/// Elements kept sorted by a comparator. Equal elements keep insertion order.
pub struct SortedIndex<T> {
    /// Sorted by `compare` ascending.
    entries: Vec<T>,
    compare: Comparator<T>,
}

impl<T: Element> SortedIndex<T> {
    /// Create a new, empty index ordered by `compare`.
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self {
            entries: Vec::new(),
            compare: Rc::new(compare),
        }
    }

    /// Create a new, empty index ordered by an extracted key.
    pub fn by_key<K: Ord>(key: impl Fn(&T) -> K + 'static) -> Self {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Insert keeping the order.
    pub fn insert(&mut self, entry: T) {
        let pos = self
            .entries
            .partition_point(|e| (self.compare)(e, &entry) != Ordering::Greater);
        self.entries.insert(pos, entry);
    }

    /// All entries in order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// The contiguous run of entries that neither `precedes` the range nor
    /// `follows` it. Both predicates must be monotone over the order.
    pub fn range_by(
        &self,
        precedes: impl Fn(&T) -> bool,
        follows: impl Fn(&T) -> bool,
    ) -> &[T] {
        let lo = self.entries.partition_point(|e| precedes(e));
        let hi = self.entries.partition_point(|e| !follows(e));
        if hi <= lo {
            &[]
        } else {
            &self.entries[lo..hi]
        }
    }

    /// The comparator defining the order.
    pub fn comparator(&self) -> Comparator<T> {
        Rc::clone(&self.compare)
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

impl<T: Element> Index<T> for SortedIndex<T> {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        Some(Box::new(ListResults::borrowed(&self.entries)))
    }
}

impl<T: Element> MutableIndex<T> for SortedIndex<T> {
    fn add(&mut self, entry: T) -> AddOutcome<T> {
        self.insert(entry);
        AddOutcome::Kept
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn as_index(&self) -> &dyn Index<T> {
        self
    }
}

/// Read-only view over a contiguous run of another index's entries.
pub struct SliceIndex<'a, T> {
    entries: &'a [T],
    conservative: bool,
}

impl<'a, T: Element> SliceIndex<'a, T> {
    /// An exact view.
    pub fn new(entries: &'a [T]) -> Self {
        Self {
            entries,
            conservative: false,
        }
    }

    /// A view that may include elements the lookup criteria reject.
    pub fn conservative(entries: &'a [T]) -> Self {
        Self {
            entries,
            conservative: true,
        }
    }
}

impl<T: Element> Index<T> for SliceIndex<'_, T> {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        Some(Box::new(ListResults::borrowed(self.entries)))
    }

    fn is_conservative(&self) -> bool {
        self.conservative
    }
}
