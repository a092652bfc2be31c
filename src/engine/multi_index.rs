//! The multi-index owns every element plus one indexing per criteria
//! type, and answers multi-criteria queries by picking the most selective
//! index before filtering.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::index::{Comparator, Index, Indexing, ListIndex, MutableIndex};
use crate::results::{ListResults, Results};
use crate::types::{Criteria, CriteriaType, Element, Resolution};

use super::limited_results::LimitedResults;
use super::planner::{Plan, QueryPlan};

/// In-memory collection with secondary indexes.
///
/// Not thread-safe: callers serialize mutation against queries. Cursors
/// returned by `get_matches` borrow the index, so it cannot be mutated while
/// one is alive.
pub struct MultiIndex<T: Element> {
    /// Every element, in insertion order.
    all: ListIndex<T>,
    indexings: HashMap<CriteriaType, Box<dyn Indexing<T>>>,
    config: EngineConfig,
}

impl<T: Element> MultiIndex<T> {
    /// Create an empty multi-index with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty multi-index.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            all: ListIndex::new(),
            indexings: HashMap::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Add an element to the full list and to every registered indexing.
    pub fn add(&mut self, element: T) {
        for indexing in self.indexings.values_mut() {
            indexing.add(&element);
        }
        self.all.push(element);
    }

    /// Add every element of `elements`.
    pub fn add_all(&mut self, elements: impl IntoIterator<Item = T>) {
        for element in elements {
            self.add(element);
        }
    }

    /// Register an indexing for its criteria type, feeding it every element
    /// added so far. Replaces a previous indexing of the same type.
    pub fn add_index(&mut self, indexing: impl Indexing<T> + 'static) {
        self.add_boxed_index(Box::new(indexing));
    }

    /// Same as `add_index`, for an already boxed indexing.
    pub fn add_boxed_index(&mut self, mut indexing: Box<dyn Indexing<T>>) {
        for element in self.all.entries() {
            indexing.add(element);
        }
        let criteria_type = indexing.criteria_type().clone();
        log::debug!(
            "registered {} indexing over {} elements",
            criteria_type,
            self.all.len()
        );
        if self.indexings.insert(criteria_type.clone(), indexing).is_some() {
            log::warn!("replaced existing indexing for {}", criteria_type);
        }
    }

    /// The indexing registered for `criteria_type`.
    pub fn index_by_type(&self, criteria_type: &CriteriaType) -> Option<&dyn Indexing<T>> {
        self.indexings.get(criteria_type).map(|i| i.as_ref())
    }

    /// Registered criteria types, sorted by name.
    pub fn indexed_types(&self) -> Vec<&CriteriaType> {
        let mut types: Vec<&CriteriaType> = self.indexings.keys().collect();
        types.sort();
        types
    }

    /// Remove every element from the full list and every indexing. The
    /// indexings stay registered.
    pub fn clear(&mut self) {
        for indexing in self.indexings.values_mut() {
            indexing.clear();
        }
        self.all.clear();
    }

    /// Every element, in insertion order.
    pub fn elements(&self) -> &[T] {
        self.all.entries()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Whether no element was added.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Number of elements a full scan visits.
    pub fn total_candidates(&self) -> usize {
        self.all.size()
    }

    /// Estimated fraction of elements matching `criteria`, in `[0, 1]`.
    /// Criteria of an unindexed type carry no information and give `1.0`.
    pub fn predictivity_of(&self, criteria: &dyn Criteria<T>) -> f64 {
        self.indexings
            .get(criteria.criteria_type())
            .map_or(1.0, |i| bounded(i.predictivity(Some(criteria))))
    }

    /// Estimated fraction of elements matched by the most common value of
    /// `criteria_type`, in `[0, 1]`; `1.0` when the type is unindexed.
    pub fn predictivity_of_type(&self, criteria_type: &CriteriaType) -> f64 {
        self.indexings
            .get(criteria_type)
            .map_or(1.0, |i| bounded(i.predictivity(None)))
    }

    /// Estimated number of elements matching every criterion, assuming the
    /// criteria are independent. Advisory only.
    pub fn estimate_size(&self, criteria: &[&dyn Criteria<T>]) -> usize {
        let fraction: f64 = criteria.iter().map(|c| self.predictivity_of(*c)).product();
        (fraction * self.total_candidates() as f64).round() as usize
    }

    /// Tie-break comparators offered by the indexings of `types`, in order.
    pub fn orderings(&self, types: &[CriteriaType]) -> Vec<Comparator<T>> {
        types
            .iter()
            .filter_map(|t| self.indexings.get(t))
            .flat_map(|i| i.ordering())
            .collect()
    }

    /// Every element satisfying all `criteria`. An empty slice matches
    /// everything.
    ///
    /// At most `max_results` matches are realized up front; `size()` of the
    /// returned cursor is always the full match count, and reading further
    /// re-runs the query with a larger budget.
    pub fn get_matches<'a>(
        &'a self,
        criteria: &[&'a dyn Criteria<T>],
        max_results: usize,
    ) -> Box<dyn Results<T> + 'a> {
        let plan = self.plan(criteria);
        log::debug!(
            "query over {} criteria: index path {:?}, residual {:?}",
            criteria.len(),
            plan.index_path(),
            plan.residual()
        );

        let mut remaining = plan.remaining.clone();
        let indexed = plan.index().and_then(|index| index.results());
        let mut candidates = match indexed {
            Some(results) => {
                if remaining.is_empty() && results.size() <= max_results {
                    return results;
                }
                results
            }
            None => self.scan_candidates(&mut remaining, max_results),
        };

        let mut matches = Vec::with_capacity(max_results.min(candidates.size()));
        let mut real_size = 0;
        for entry in candidates.realize().iter() {
            if remaining.iter().all(|c| c.matches(entry)) {
                real_size += 1;
                if matches.len() < max_results {
                    matches.push(entry.clone());
                }
            }
        }

        if matches.len() == real_size {
            Box::new(ListResults::owned(matches))
        } else {
            Box::new(LimitedResults::new(
                self,
                criteria.to_vec(),
                max_results,
                matches,
                real_size,
            ))
        }
    }

    /// How `get_matches` would answer `criteria`.
    pub fn explain(&self, criteria: &[&dyn Criteria<T>]) -> QueryPlan {
        let plan = self.plan(criteria);
        QueryPlan {
            index_path: plan.index_path(),
            residual: plan.residual(),
            full_scan: plan.index().is_none(),
            candidates: plan.index().map_or(self.total_candidates(), |i| i.size()),
            estimated_size: self.estimate_size(criteria),
        }
    }

    /// Order criteria by ascending type predictivity, then select indexes.
    fn plan<'a>(&'a self, criteria: &[&'a dyn Criteria<T>]) -> Plan<'a, T> {
        let mut sorted = criteria.to_vec();
        sorted.sort_by(|a, b| {
            self.predictivity_of_type(a.criteria_type())
                .total_cmp(&self.predictivity_of_type(b.criteria_type()))
        });
        Plan::build(&self.indexings, sorted)
    }

    /// Candidates when no index applies: a complete pre-computed match set
    /// if one of the criteria has it, otherwise every element, with any
    /// partial pre-computed matches moved to the front.
    fn scan_candidates<'a>(
        &'a self,
        remaining: &mut Vec<&'a dyn Criteria<T>>,
        max_results: usize,
    ) -> Box<dyn Results<T> + 'a> {
        let mut partial: Vec<T> = Vec::new();
        let mut pos = 0;
        while pos < remaining.len() {
            let Some(resolved) = remaining[pos].as_resolved() else {
                pos += 1;
                continue;
            };
            let others: Vec<&dyn Criteria<T>> = remaining
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != pos)
                .map(|(_, &c)| c)
                .collect();
            match resolved.resolve(&others, max_results) {
                Resolution {
                    matches: Some(matches),
                    complete: true,
                } => {
                    log::debug!(
                        "{} resolved completely to {} candidates",
                        remaining[pos].criteria_type(),
                        matches.len()
                    );
                    remaining.remove(pos);
                    return Box::new(ListResults::owned(matches));
                }
                Resolution {
                    matches: Some(matches),
                    complete: false,
                } => partial.extend(matches),
                Resolution { matches: None, .. } => {}
            }
            pos += 1;
        }

        if self.all.len() > self.config.scan_warn_threshold {
            log::warn!(
                "no index applies, scanning all {} elements",
                self.all.len()
            );
        } else {
            log::debug!("no index applies, scanning all {} elements", self.all.len());
        }

        if partial.is_empty() {
            return Box::new(ListResults::borrowed(self.all.entries()));
        }
        Box::new(ListResults::owned(hinted_first(self.all.entries(), partial)))
    }
}

impl<T: Element> Default for MultiIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A permutation of `all` with the elements of `hints` first. Each hint
/// claims one occurrence of an equal element in `all`; hints with no
/// occurrence left are dropped, so the result holds exactly `all`.
fn hinted_first<T: Element>(all: &[T], hints: Vec<T>) -> Vec<T> {
    // Per distinct element: occurrences not yet claimed, and claimed.
    let mut counts: HashMap<&T, (usize, usize)> = HashMap::new();
    for entry in all {
        counts.entry(entry).or_insert((0, 0)).0 += 1;
    }
    let mut out = Vec::with_capacity(all.len());
    for hint in hints {
        if let Some((unclaimed, claimed)) = counts.get_mut(&hint) {
            if *unclaimed > 0 {
                *unclaimed -= 1;
                *claimed += 1;
                out.push(hint);
            }
        }
    }
    for entry in all {
        match counts.get_mut(entry) {
            Some((_, claimed)) if *claimed > 0 => *claimed -= 1,
            _ => out.push(entry.clone()),
        }
    }
    out
}

/// Clamp an estimate into `[0, 1]`; non-finite estimates carry no information.
fn bounded(predictivity: f64) -> f64 {
    if predictivity.is_finite() {
        predictivity.clamp(0.0, 1.0)
    } else {
        1.0
    }
}
