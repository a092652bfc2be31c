//! Paginating results that re-run their query to read further.

use std::borrow::Cow;

use crate::results::Results;
use crate::types::{Criteria, Element};

use super::MultiIndex;

/// The first `budget` matches of a query plus the true match count.
///
/// Reading past the realized prefix re-runs the query with a larger budget,
/// trading recomputation for not holding a suspended scan. The cursor
/// borrows the `MultiIndex`, so the index cannot change underneath it.
pub struct LimitedResults<'a, T: Element> {
    source: &'a MultiIndex<T>,
    criteria: Vec<&'a dyn Criteria<T>>,
    budget: usize,
    items: Vec<T>,
    size: usize,
}

impl<'a, T: Element> LimitedResults<'a, T> {
    pub(crate) fn new(
        source: &'a MultiIndex<T>,
        criteria: Vec<&'a dyn Criteria<T>>,
        budget: usize,
        items: Vec<T>,
        size: usize,
    ) -> Self {
        Self {
            source,
            criteria,
            budget,
            items,
            size,
        }
    }
}

impl<T: Element> Results<T> for LimitedResults<'_, T> {
    fn size(&self) -> usize {
        self.size
    }

    fn available(&self) -> usize {
        self.items.len()
    }

    fn read_to(&mut self, position: usize) -> usize {
        let target = position.saturating_add(1).min(self.size);
        if target > self.items.len() {
            let growth = self.source.config().page_growth.max(2);
            let budget = target.max(self.budget.saturating_mul(growth));
            log::debug!(
                "re-running query to read to position {} (budget {} -> {})",
                position,
                self.budget,
                budget
            );
            let fresh = self.source.get_matches(&self.criteria, budget);
            self.size = fresh.size();
            self.items = fresh.iter().cloned().collect();
            self.budget = budget;
        }
        self.items.len()
    }

    fn realize(&mut self) -> Cow<'_, [T]> {
        self.read_to(self.size.saturating_sub(1));
        Cow::Borrowed(&self.items)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }
}
