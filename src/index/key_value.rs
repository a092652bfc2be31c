//! Key/value indexing with one child index per distinct key value.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use crate::types::{keys_of, Criteria, CriteriaType, Element, KeyCriteria, KeyExtractor};

use super::{
    AddOutcome, CombinedIndex, Comparator, Index, IndexRef, Indexing, ListIndex, MutableIndex,
    UnitIndex,
};

/// Builds the child index for a newly seen key.
pub type IndexFactory<T> = Rc<dyn Fn() -> Box<dyn MutableIndex<T>>>;

/// Routes every element into one child index per key it carries.
///
/// Predictivity is estimated from two running counters: `total_keys`, the
/// number of key insertions (distinct keys per element), and `max_size`,
/// the largest bucket seen.
pub struct KeyValueIndexing<K, T: Element> {
    criteria_type: CriteriaType,
    extract: KeyExtractor<K, T>,
    indexes: HashMap<K, Box<dyn MutableIndex<T>>>,
    factory: IndexFactory<T>,
    total_keys: usize,
    max_size: usize,
    /// Set once an element carried more than one key, so buckets may overlap.
    multi_valued: bool,
    remove_duplicates: bool,
    ordering: Vec<Comparator<T>>,
}

impl<K, T> KeyValueIndexing<K, T>
where
    K: Clone + Eq + Hash + 'static,
    T: Element,
{
    /// Create an empty indexing reading each element's keys with `extract`.
    pub fn new(criteria_type: CriteriaType, extract: impl Fn(&T) -> Vec<K> + 'static) -> Self {
        Self {
            criteria_type,
            extract: Rc::new(extract),
            indexes: HashMap::new(),
            factory: Rc::new(|| -> Box<dyn MutableIndex<T>> { Box::new(UnitIndex::new()) }),
            total_keys: 0,
            max_size: 0,
            multi_valued: false,
            remove_duplicates: false,
            ordering: Vec::new(),
        }
    }

    /// Create an empty indexing for elements carrying exactly one key.
    pub fn single(criteria_type: CriteriaType, extract: impl Fn(&T) -> K + 'static) -> Self {
        Self::new(criteria_type, move |e| vec![extract(e)])
    }

    /// Use `factory` to build the child index of each new key.
    pub fn with_factory(
        mut self,
        factory: impl Fn() -> Box<dyn MutableIndex<T>> + 'static,
    ) -> Self {
        self.factory = Rc::new(factory);
        self
    }

    /// Always de-duplicate unions over several keys.
    pub fn with_remove_duplicates(mut self, remove_duplicates: bool) -> Self {
        self.remove_duplicates = remove_duplicates;
        self
    }

    /// Offer `compare` as a tie-break for results of this criteria type.
    pub fn with_ordering(
        mut self,
        compare: impl Fn(&T, &T) -> std::cmp::Ordering + 'static,
    ) -> Self {
        self.ordering.push(Rc::new(compare));
        self
    }

    /// Criteria selecting elements with any of `keys`, matching the way this
    /// indexing reads keys.
    pub fn criteria(&self, keys: Vec<K>) -> KeyCriteria<K, T> {
        KeyCriteria::with_extractor(self.criteria_type.clone(), keys, Rc::clone(&self.extract))
    }

    /// Add `entry` under a single key.
    pub fn add_keyed(&mut self, key: K, entry: T) {
        let factory = &self.factory;
        let index = self.indexes.entry(key).or_insert_with(|| factory());
        if let AddOutcome::Replaced(grown) = index.add(entry) {
            log::trace!("{} bucket grew to {} entries", self.criteria_type, grown.size());
            *index = grown;
        }
        self.total_keys += 1;
        self.max_size = self.max_size.max(index.size());
    }

    /// The child index for `key`.
    pub fn index_for(&self, key: &K) -> Option<&dyn Index<T>> {
        self.indexes.get(key).map(|i| i.as_index())
    }

    /// Every key seen so far, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.indexes.keys()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.indexes.len()
    }

    /// Number of key insertions.
    pub fn total_keys(&self) -> usize {
        self.total_keys
    }

    /// Size of the largest bucket.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Union of the buckets of `keys` counting every add once, even when
    /// equal elements were added separately: an entry is taken only from
    /// the first of `keys` it was routed under. `None` if a bucket cannot
    /// enumerate its members.
    fn routed_union(&self, keys: &[&K]) -> Option<ListIndex<T>> {
        let buckets: Vec<(usize, &dyn Index<T>)> = keys
            .iter()
            .enumerate()
            .filter_map(|(pos, k)| self.index_for(k).map(|i| (pos, i)))
            .collect();
        let mut union = if buckets.iter().any(|(_, i)| i.is_conservative()) {
            ListIndex::conservative()
        } else {
            ListIndex::new()
        };
        for (pos, bucket) in buckets {
            let mut members = bucket.get_all()?;
            let earlier = &keys[..pos];
            for entry in members.realize().iter() {
                let own = (self.extract)(entry);
                if !earlier.iter().any(|k| own.contains(k)) {
                    union.push(entry.clone());
                }
            }
        }
        Some(union)
    }

    fn ratio(&self, count: usize) -> f64 {
        if self.total_keys == 0 {
            0.0
        } else {
            (count as f64 / self.total_keys as f64).min(1.0)
        }
    }
}

/// Distinct keys, first occurrence first.
fn distinct<K: Eq + Hash>(keys: &[K]) -> Vec<&K> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter().filter(|k| seen.insert(*k)).collect()
}

impl<K, T> Indexing<T> for KeyValueIndexing<K, T>
where
    K: Clone + Eq + Hash + 'static,
    T: Element,
{
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    /// A key repeated by the extractor routes the element once.
    fn add(&mut self, entry: &T) {
        let extracted = (self.extract)(entry);
        let keys = distinct(&extracted);
        if keys.len() > 1 {
            self.multi_valued = true;
        }
        for key in keys {
            self.add_keyed(key.clone(), entry.clone());
        }
    }

    fn clear(&mut self) {
        self.indexes.clear();
        self.total_keys = 0;
        self.max_size = 0;
        self.multi_valued = false;
    }

    fn get_index(&self, criteria: &dyn Criteria<T>) -> Option<IndexRef<'_, T>> {
        let Some(keys) = keys_of::<K, T>(criteria) else {
            if criteria.keys().is_some() {
                log::warn!(
                    "{} criteria carries keys of a different type than its indexing",
                    self.criteria_type
                );
            }
            return None;
        };
        if let [key] = keys {
            return self.index_for(key).map(IndexRef::Borrowed);
        }
        let keys = distinct(keys);
        if self.multi_valued && !self.remove_duplicates {
            if let Some(union) = self.routed_union(&keys) {
                return Some(IndexRef::Owned(Box::new(union)));
            }
        }
        let children: Vec<&dyn Index<T>> =
            keys.into_iter().filter_map(|k| self.index_for(k)).collect();
        Some(IndexRef::Owned(Box::new(CombinedIndex::new(
            children,
            self.remove_duplicates,
        ))))
    }

    fn predictivity(&self, criteria: Option<&dyn Criteria<T>>) -> f64 {
        let Some(keys) = criteria.and_then(keys_of::<K, T>) else {
            return self.ratio(self.max_size);
        };
        let matched: usize = distinct(keys)
            .into_iter()
            .filter_map(|k| self.indexes.get(k))
            .map(|i| i.size())
            .sum();
        self.ratio(matched)
    }

    fn ordering(&self) -> Vec<Comparator<T>> {
        self.ordering.clone()
    }
}
