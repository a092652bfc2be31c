//! Fully realized results over a borrowed or owned sequence.

use std::borrow::Cow;

use super::Results;

/// Results that are realized up front; `available() == size()` always.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResults<'a, T: Clone> {
    items: Cow<'a, [T]>,
}

impl<'a, T: Clone> ListResults<'a, T> {
    /// View over elements owned by an index.
    pub fn borrowed(items: &'a [T]) -> Self {
        Self {
            items: Cow::Borrowed(items),
        }
    }

    /// Results assembled by a query.
    pub fn owned(items: Vec<T>) -> Self {
        Self {
            items: Cow::Owned(items),
        }
    }

    /// No results.
    pub fn empty() -> Self {
        Self::owned(Vec::new())
    }

    /// The realized elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Take the elements out, cloning only if they were borrowed.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_owned()
    }
}

impl<T: Clone> Results<T> for ListResults<'_, T> {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn available(&self) -> usize {
        self.items.len()
    }

    fn read_to(&mut self, _position: usize) -> usize {
        self.items.len()
    }

    fn realize(&mut self) -> Cow<'_, [T]> {
        Cow::Borrowed(&self.items)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }
}
