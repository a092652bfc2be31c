//! Criteria: the predicate-plus-keys capability used both to filter
//! elements and to look up indexes.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use serde::Serialize;

/// Anything that can be stored in a `MultiIndex`.
///
/// Elements are shared between the full element list and every index they
/// are routed into, so they are cloned on insertion. Use `Rc<_>` for heavy
/// values. Equality is used to de-duplicate unions.
pub trait Element: Clone + Eq + Hash + 'static {}

impl<T: Clone + Eq + Hash + 'static> Element for T {}

/// Type tag identifying a family of criteria. All criteria with the same
/// tag are answered by the same `Indexing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CriteriaType(Cow<'static, str>);

impl CriteriaType {
    /// A tag known at compile time.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// A tag built at runtime (e.g. from a field name given on the command line).
    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an interval criterion relates the query range to an element's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapRelation {
    /// The element's range intersects the query range.
    Overlaps,
    /// The element's range lies entirely inside the query range.
    Within,
}

/// A filter over elements of type `T`.
pub trait Criteria<T> {
    /// The family this criterion belongs to.
    fn criteria_type(&self) -> &CriteriaType;

    /// Key values selected by this criterion, as a `Vec<K>` for the key type
    /// of the indexing registered for this criteria type. `None` when the
    /// criterion cannot be expressed as keys.
    fn keys(&self) -> Option<&dyn Any> {
        None
    }

    /// Exact match test.
    fn matches(&self, entry: &T) -> bool;

    /// Only set by interval-style criteria.
    fn overlap_relation(&self) -> Option<OverlapRelation> {
        None
    }

    /// Criteria backed by an externally pre-computed match set.
    fn as_resolved(&self) -> Option<&dyn ResolvedCriteria<T>> {
        None
    }
}

/// Typed view on `Criteria::keys`.
pub fn keys_of<'c, K: 'static, T>(criteria: &'c dyn Criteria<T>) -> Option<&'c [K]> {
    criteria
        .keys()?
        .downcast_ref::<Vec<K>>()
        .map(Vec::as_slice)
}

/// Outcome of resolving a pre-computed match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<T> {
    /// The pre-computed matches, if any are known.
    pub matches: Option<Vec<T>>,
    /// Whether `matches` is the full answer for this criterion.
    pub complete: bool,
}

impl<T> Resolution<T> {
    /// Nothing is known; the engine has to scan.
    pub fn unknown() -> Self {
        Self {
            matches: None,
            complete: false,
        }
    }
}

/// A criterion whose matches were computed elsewhere.
pub trait ResolvedCriteria<T> {
    /// Hand back pre-computed matches, given the criteria still outstanding
    /// in the query and the caller's result budget.
    fn resolve(&self, remaining: &[&dyn Criteria<T>], max_results: usize) -> Resolution<T>;
}

/// Extracts the index keys of an element.
pub type KeyExtractor<K, T> = Rc<dyn Fn(&T) -> Vec<K>>;

/// Criteria selecting elements that carry any of a list of key values.
pub struct KeyCriteria<K, T> {
    criteria_type: CriteriaType,
    keys: Vec<K>,
    extract: KeyExtractor<K, T>,
}

impl<K: PartialEq + 'static, T> KeyCriteria<K, T> {
    /// Criteria matching any of `keys`, using `extract` to read an element's keys.
    pub fn new(
        criteria_type: CriteriaType,
        keys: Vec<K>,
        extract: impl Fn(&T) -> Vec<K> + 'static,
    ) -> Self {
        Self::with_extractor(criteria_type, keys, Rc::new(extract))
    }

    /// Same as `new`, sharing an existing extractor.
    pub fn with_extractor(
        criteria_type: CriteriaType,
        keys: Vec<K>,
        extract: KeyExtractor<K, T>,
    ) -> Self {
        Self {
            criteria_type,
            keys,
            extract,
        }
    }

    /// The selected key values.
    pub fn key_values(&self) -> &[K] {
        &self.keys
    }
}

impl<K: PartialEq + 'static, T> Criteria<T> for KeyCriteria<K, T> {
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    fn keys(&self) -> Option<&dyn Any> {
        Some(&self.keys)
    }

    fn matches(&self, entry: &T) -> bool {
        (self.extract)(entry).iter().any(|k| self.keys.contains(k))
    }
}

/// Criteria defined by an arbitrary predicate. Never indexable by key.
pub struct PredicateCriteria<T> {
    criteria_type: CriteriaType,
    predicate: Box<dyn Fn(&T) -> bool>,
}

impl<T> PredicateCriteria<T> {
    /// Wrap a predicate under the given type tag.
    pub fn new(criteria_type: CriteriaType, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self {
            criteria_type,
            predicate: Box::new(predicate),
        }
    }
}

impl<T> Criteria<T> for PredicateCriteria<T> {
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    fn matches(&self, entry: &T) -> bool {
        (self.predicate)(entry)
    }
}

/// A predicate with a match set supplied up front, e.g. by an external
/// search service. The predicate still backs `matches` so the residual
/// filter stays exact.
pub struct ResolvedSet<T> {
    criteria_type: CriteriaType,
    predicate: Box<dyn Fn(&T) -> bool>,
    matches: Vec<T>,
    complete: bool,
}

impl<T: Clone> ResolvedSet<T> {
    /// `matches` is every element satisfying `predicate`.
    pub fn complete(
        criteria_type: CriteriaType,
        matches: Vec<T>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self {
            criteria_type,
            predicate: Box::new(predicate),
            matches,
            complete: true,
        }
    }

    /// `matches` satisfy `predicate` but others may too.
    pub fn partial(
        criteria_type: CriteriaType,
        matches: Vec<T>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self {
            complete: false,
            ..Self::complete(criteria_type, matches, predicate)
        }
    }
}

impl<T: Clone> Criteria<T> for ResolvedSet<T> {
    fn criteria_type(&self) -> &CriteriaType {
        &self.criteria_type
    }

    fn matches(&self, entry: &T) -> bool {
        (self.predicate)(entry)
    }

    fn as_resolved(&self) -> Option<&dyn ResolvedCriteria<T>> {
        Some(self)
    }
}

impl<T: Clone> ResolvedCriteria<T> for ResolvedSet<T> {
    fn resolve(&self, _remaining: &[&dyn Criteria<T>], _max_results: usize) -> Resolution<T> {
        Resolution {
            matches: Some(self.matches.clone()),
            complete: self.complete,
        }
    }
}
