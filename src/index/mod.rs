//! Index structures. An `Index` is a collection of elements that can
//! enumerate itself; an `Indexing` maps the criteria of one type to the
//! indexes holding their matches.

pub mod combined_index;
pub mod interval;
pub mod key_value;
pub mod list_index;
pub mod nested_index;
pub mod sorted_index;
pub mod unit_index;

use std::cmp::Ordering;
use std::ops::Deref;
use std::rc::Rc;

use crate::results::{ListResults, Results};
use crate::types::{Criteria, CriteriaType, Element};

pub use combined_index::{CombinedIndex, CombinedResults};
pub use interval::{IntervalCriteria, IntervalIndexing};
pub use key_value::KeyValueIndexing;
pub use list_index::ListIndex;
pub use nested_index::NestedIndex;
pub use sorted_index::{SliceIndex, SortedIndex};
pub use unit_index::UnitIndex;

/// Tie-break comparator an indexing offers for presenting results.
pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// Read side of an index.
pub trait Index<T: Element> {
    /// True number of elements added, even when `get_all` declines to
    /// enumerate them.
    fn size(&self) -> usize;

    /// All members, or `None` when this index cannot enumerate them cheaply
    /// and the caller should look elsewhere.
    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>>;

    /// Nested indexing over exactly this index's members.
    fn sub_indexing(&self) -> Option<&dyn Indexing<T>> {
        None
    }

    /// A conservative index may hold elements that do not satisfy the
    /// criteria it was looked up for, never fewer than those that do.
    fn is_conservative(&self) -> bool {
        false
    }
}

/// Result of adding to a `MutableIndex`.
pub enum AddOutcome<T: Element> {
    /// The entry was added in place.
    Kept,
    /// The index grew into a different implementation that already holds
    /// the entry; the owner must store the replacement.
    Replaced(Box<dyn MutableIndex<T>>),
}

/// An index that owns its members.
pub trait MutableIndex<T: Element>: Index<T> {
    /// Add an entry. Callers must adopt `AddOutcome::Replaced`.
    fn add(&mut self, entry: T) -> AddOutcome<T>;

    /// Remove every member.
    fn clear(&mut self);

    /// Read-only view of this index.
    fn as_index(&self) -> &dyn Index<T>;
}

/// An index handed out by an `Indexing`: either one it stores, or one built
/// for the lookup (such as a union over several keys).
pub enum IndexRef<'a, T: Element> {
    Borrowed(&'a dyn Index<T>),
    Owned(Box<dyn Index<T> + 'a>),
}

impl<'a, T: Element> IndexRef<'a, T> {
    /// The sub-indexing of a stored index, borrowed for as long as the
    /// indexing itself. Indexes built for a lookup have none.
    pub fn stored_sub_indexing(&self) -> Option<&'a dyn Indexing<T>> {
        match self {
            IndexRef::Borrowed(index) => {
                let index: &'a dyn Index<T> = *index;
                index.sub_indexing()
            }
            IndexRef::Owned(_) => None,
        }
    }

    /// All members, as results that outlive this handle. Indexes built for
    /// the lookup are realized into an owned list.
    pub fn results(&self) -> Option<Box<dyn Results<T> + 'a>> {
        match self {
            IndexRef::Borrowed(index) => {
                let index: &'a dyn Index<T> = *index;
                index.get_all()
            }
            IndexRef::Owned(index) => {
                let mut all = index.get_all()?;
                let items = all.realize().into_owned();
                Some(Box::new(ListResults::owned(items)))
            }
        }
    }
}

impl<'a, T: Element> Deref for IndexRef<'a, T> {
    type Target = dyn Index<T> + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            IndexRef::Borrowed(index) => *index,
            IndexRef::Owned(index) => index.as_ref(),
        }
    }
}

/// Maps criteria of one type to the index of elements matching them.
pub trait Indexing<T: Element> {
    /// The criteria type this indexing answers for.
    fn criteria_type(&self) -> &CriteriaType;

    /// Route a new element into the matching indexes.
    fn add(&mut self, entry: &T);

    /// Drop every element.
    fn clear(&mut self);

    /// Index of the elements matching `criteria`, or `None` if this indexing
    /// cannot narrow it.
    fn get_index(&self, criteria: &dyn Criteria<T>) -> Option<IndexRef<'_, T>>;

    /// Estimated fraction of elements matching `criteria`, in `[0, 1]`.
    /// With `None`, the fraction matched by the most common value of this
    /// criteria type.
    fn predictivity(&self, criteria: Option<&dyn Criteria<T>>) -> f64;

    /// Comparators a caller may use to order results of this criteria type.
    fn ordering(&self) -> Vec<Comparator<T>> {
        Vec::new()
    }
}
