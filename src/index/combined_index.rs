//! Union of several indexes, viewed as one.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::results::Results;
use crate::types::Element;

use super::Index;

/// Union of child indexes.
///
/// Sizes are sums over the children. Without `remove_duplicates` the
/// children are assumed disjoint; with it, realized results keep only the
/// first occurrence of each element.
pub struct CombinedIndex<'a, T: Element> {
    children: Vec<&'a dyn Index<T>>,
    remove_duplicates: bool,
}

impl<'a, T: Element> CombinedIndex<'a, T> {
    /// Union over `children`.
    pub fn new(children: Vec<&'a dyn Index<T>>, remove_duplicates: bool) -> Self {
        Self {
            children,
            remove_duplicates,
        }
    }

    /// Number of child indexes.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<T: Element> Index<T> for CombinedIndex<'_, T> {
    fn size(&self) -> usize {
        self.children.iter().map(|c| c.size()).sum()
    }

    /// `None` as soon as one child cannot enumerate its members.
    fn get_all(&self) -> Option<Box<dyn Results<T> + '_>> {
        let children = self
            .children
            .iter()
            .map(|c| c.get_all())
            .collect::<Option<Vec<_>>>()?;
        Some(Box::new(CombinedResults::new(
            children,
            self.remove_duplicates,
        )))
    }

    fn is_conservative(&self) -> bool {
        self.children.iter().any(|c| c.is_conservative())
    }
}

/// Results of a `CombinedIndex`: children are read left to right.
pub struct CombinedResults<'a, T: Element> {
    children: Vec<Box<dyn Results<T> + 'a>>,
    remove_duplicates: bool,
}

impl<'a, T: Element> CombinedResults<'a, T> {
    /// Concatenation (or union) of `children`.
    pub fn new(children: Vec<Box<dyn Results<T> + 'a>>, remove_duplicates: bool) -> Self {
        Self {
            children,
            remove_duplicates,
        }
    }
}

impl<T: Element> CombinedResults<'_, T> {
    fn fully_realized(&self) -> bool {
        self.children.iter().all(|c| c.available() == c.size())
    }
}

impl<T: Element> Results<T> for CombinedResults<'_, T> {
    /// Sum over the children; the exact size of the union once duplicates
    /// are removed and every child is realized.
    fn size(&self) -> usize {
        if self.remove_duplicates && self.fully_realized() {
            self.iter().count()
        } else {
            self.children.iter().map(|c| c.size()).sum()
        }
    }

    fn available(&self) -> usize {
        if self.remove_duplicates {
            self.iter().count()
        } else {
            self.children.iter().map(|c| c.available()).sum()
        }
    }

    /// Drains each child completely before touching the next one.
    fn read_to(&mut self, position: usize) -> usize {
        let mut offset = 0;
        for child in &mut self.children {
            let size = child.size();
            if position < offset + size {
                child.read_to(position - offset);
                break;
            }
            offset += child.read_to(size);
        }
        self.available()
    }

    fn realize(&mut self) -> Cow<'_, [T]> {
        let mut out: Vec<T> = Vec::with_capacity(self.size());
        for child in &mut self.children {
            out.extend_from_slice(&child.realize());
        }
        if self.remove_duplicates {
            let mut seen = HashSet::with_capacity(out.len());
            out.retain(|e| seen.insert(e.clone()));
        }
        Cow::Owned(out)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        let chained = self.children.iter().flat_map(|c| c.iter());
        if self.remove_duplicates {
            let mut seen = HashSet::new();
            Box::new(chained.filter(move |e| seen.insert(*e)))
        } else {
            Box::new(chained)
        }
    }
}
