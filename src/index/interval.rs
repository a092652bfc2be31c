//! Interval indexing for elements carrying a time range.

use std::any::Any;
use std::rc::Rc;

use crate::types::{keys_of, Criteria, CriteriaType, Element, OverlapRelation, TimeRange};

use super::{Comparator, IndexRef, Indexing, MutableIndex, SliceIndex, SortedIndex};

type RangeExtractor<T> = Rc<dyn Fn(&T) -> TimeRange>;

/// Keeps elements sorted by the start of their time range.
///
/// Lookups only narrow by start time, so every index handed out is
/// conservative and the planner re-checks the criterion on each candidate.
pub struct IntervalIndexing<T: Element> {
    criteria_type: CriteriaType,
    extract: RangeExtractor<T>,
    by_start: SortedIndex<T>,
}

impl<T: Element> IntervalIndexing<T> {
    /// Create an empty indexing reading each element's range with `extract`.
    pub fn new(criteria_type: CriteriaType, extract: impl Fn(&T) -> TimeRange + 'static) -> Self {
        let extract: RangeExtractor<T> = Rc::new(extract);
        let key = Rc::clone(&extract);
        Self {
            criteria_type,
            extract,
            by_start: SortedIndex::by_key(move |e: &T| key(e).start),
        }
    }

    /// Criteria relating element ranges to `range`.
    pub fn criteria(&self, range: TimeRange, relation: OverlapRelation) -> IntervalCriteria<T> {
        IntervalCriteria {
            criteria_type: self.criteria_type.clone(),
            ranges: vec![range],
            relation,
            extract: Rc::clone(&self.extract),
        }
    }

    /// Number of indexed elements.
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    fn candidates(&self, criteria: &dyn Criteria<T>) -> Option<&[T]> {
        let relation = criteria.overlap_relation()?;
        let [query] = keys_of::<TimeRange, T>(criteria)? else {
            return None;
        };
        let start = |e: &T| (self.extract)(e).start;
        let slice = match relation {
            OverlapRelation::Overlaps => self.by_start.range_by(|_| false, |e| start(e) > query.end),
            OverlapRelation::Within => self
                .by_start
                .range_by(|e| start(e) < query.start, |e| start(e) > query.end),
        };
        Some(slice)
    }
}

impl<T: Element> Indexing<T> for IntervalIndexing<T> {
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    fn add(&mut self, entry: &T) {
        self.by_start.insert(entry.clone());
    }

    fn clear(&mut self) {
        self.by_start.clear();
    }

    fn get_index(&self, criteria: &dyn Criteria<T>) -> Option<IndexRef<'_, T>> {
        let slice = self.candidates(criteria)?;
        Some(IndexRef::Owned(Box::new(SliceIndex::conservative(slice))))
    }

    fn predictivity(&self, criteria: Option<&dyn Criteria<T>>) -> f64 {
        if self.by_start.is_empty() {
            return 0.0;
        }
        match criteria.and_then(|c| self.candidates(c)) {
            Some(slice) => slice.len() as f64 / self.by_start.len() as f64,
            None => 1.0,
        }
    }

    fn ordering(&self) -> Vec<Comparator<T>> {
        vec![self.by_start.comparator()]
    }
}

/// Selects elements whose range relates to a query range.
pub struct IntervalCriteria<T> {
    criteria_type: CriteriaType,
    ranges: Vec<TimeRange>,
    relation: OverlapRelation,
    extract: RangeExtractor<T>,
}

impl<T> IntervalCriteria<T> {
    /// Criteria over elements whose range is read with `extract`.
    pub fn new(
        criteria_type: CriteriaType,
        range: TimeRange,
        relation: OverlapRelation,
        extract: impl Fn(&T) -> TimeRange + 'static,
    ) -> Self {
        Self {
            criteria_type,
            ranges: vec![range],
            relation,
            extract: Rc::new(extract),
        }
    }

    /// The query range.
    pub fn range(&self) -> TimeRange {
        self.ranges[0]
    }
}

impl<T> Criteria<T> for IntervalCriteria<T> {
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    fn keys(&self) -> Option<&dyn Any> {
        Some(&self.ranges)
    }

    fn matches(&self, entry: &T) -> bool {
        let range = (self.extract)(entry);
        match self.relation {
            OverlapRelation::Overlaps => range.overlaps(&self.ranges[0]),
            OverlapRelation::Within => range.within(&self.ranges[0]),
        }
    }

    fn overlap_relation(&self) -> Option<OverlapRelation> {
        Some(self.relation)
    }
}
