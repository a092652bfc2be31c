//! Index building blocks: buckets, unions, sorted views and interval lookups.

use chrono::{Duration, TimeZone, Utc};

use multi_index::{
    AddOutcome, CombinedIndex, Criteria, CriteriaType, Index, Indexing, IntervalIndexing,
    KeyValueIndexing, ListIndex, ListResults, MultiIndex, MutableIndex, NestedIndex,
    OverlapRelation, Results, SortedIndex, TimeRange, UnitIndex,
};

// ==================== Buckets ====================

#[test]
fn test_unit_index_grows_into_list() {
    let mut unit: UnitIndex<u32> = UnitIndex::new();
    assert_eq!(unit.size(), 0);
    assert!(matches!(unit.add(1), AddOutcome::Kept));
    assert_eq!(unit.entry(), Some(&1));

    let AddOutcome::Replaced(mut grown) = unit.add(2) else {
        panic!("second entry must replace the unit index");
    };
    assert_eq!(grown.size(), 2);
    assert!(matches!(grown.add(3), AddOutcome::Kept));
    let mut all = grown.as_index().get_all().unwrap();
    assert_eq!(all.realize().to_vec(), vec![1, 2, 3]);
}

#[test]
fn test_list_index_clear() {
    let mut list = ListIndex::from_entries(vec![1u32, 2, 3]);
    assert_eq!(list.size(), 3);
    list.clear();
    assert!(list.is_empty());
    assert!(list.get_all().unwrap().is_empty());
}

#[test]
fn test_sorted_index_keeps_key_order() {
    let mut sorted = SortedIndex::by_key(|e: &(u32, char)| e.0);
    for entry in [(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd')] {
        sorted.insert(entry);
    }
    let order: Vec<char> = sorted.as_slice().iter().map(|e| e.1).collect();
    // Equal keys stay in insertion order.
    assert_eq!(order, vec!['b', 'd', 'a', 'c']);

    let middle = sorted.range_by(|e| e.0 < 2, |e| e.0 > 2);
    assert_eq!(middle.len(), 3);
    assert!(sorted.range_by(|e| e.0 < 5, |_| false).is_empty());
}

#[test]
fn test_nested_index_feeds_sub_indexing() {
    const PARITY: CriteriaType = CriteriaType::new("parity");
    let mut nested = NestedIndex::new(KeyValueIndexing::single(PARITY, |v: &u32| v % 2));
    for v in 1..=5u32 {
        nested.add(v);
    }
    let sub = nested.sub_indexing().unwrap();
    assert_eq!(sub.criteria_type(), &PARITY);

    let odd = KeyValueIndexing::single(PARITY, |v: &u32| v % 2).criteria(vec![1]);
    assert_eq!(sub.get_index(&odd).unwrap().size(), 3);

    nested.clear();
    assert_eq!(nested.size(), 0);
    assert!(nested.sub_indexing().unwrap().get_index(&odd).is_none());
}

// ==================== Unions ====================

#[test]
fn test_combined_index_deduplicates_when_asked() {
    let a = ListIndex::from_entries(vec![1u32, 2, 3]);
    let b = ListIndex::from_entries(vec![3u32, 4]);

    let children: Vec<&dyn Index<u32>> = vec![&a, &b];
    let plain = CombinedIndex::new(children, false);
    assert_eq!(plain.size(), 5);
    assert_eq!(plain.child_count(), 2);
    assert_eq!(plain.get_all().unwrap().realize().len(), 5);

    let children: Vec<&dyn Index<u32>> = vec![&a, &b];
    let deduped = CombinedIndex::new(children, true);
    let mut all = deduped.get_all().unwrap();
    assert_eq!(all.realize().to_vec(), vec![1, 2, 3, 4]);
    assert_eq!(all.size(), 4);
    assert!(all.available() <= all.size());
}

#[test]
fn test_multi_valued_keys_are_deduplicated() {
    const TAGS: CriteriaType = CriteriaType::new("tags");
    let extract = |e: &(u32, [&'static str; 2])| e.1.to_vec();
    let mut index = MultiIndex::new();
    index.add_index(KeyValueIndexing::new(TAGS, extract));
    index.add((1, ["rust", "db"]));
    index.add((2, ["rust", "web"]));
    index.add((3, ["go", "db"]));

    let query = KeyValueIndexing::new(TAGS, extract).criteria(vec!["rust", "db"]);
    let criteria: [&dyn Criteria<(u32, [&'static str; 2])>; 1] = [&query];
    let mut results = index.get_matches(&criteria, 10);
    let mut ids: Vec<u32> = results.realize().iter().map(|e| e.0).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(results.size(), 3);
}

#[test]
fn test_repeated_extracted_key_matches_once() {
    const TAGS: CriteriaType = CriteriaType::new("tags");
    let extract = |e: &(u32, [&'static str; 2])| e.1.to_vec();
    let mut index = MultiIndex::new();
    index.add_index(KeyValueIndexing::new(TAGS, extract));
    index.add((1, ["x", "x"]));
    index.add((2, ["y", "x"]));

    let query = KeyValueIndexing::new(TAGS, extract).criteria(vec!["x"]);
    let criteria: [&dyn Criteria<(u32, [&'static str; 2])>; 1] = [&query];
    let mut results = index.get_matches(&criteria, 10);
    assert_eq!(results.size(), 2);
    let ids: Vec<u32> = results.realize().iter().map(|e| e.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_multi_key_union_keeps_equal_elements() {
    const TAGS: CriteriaType = CriteriaType::new("tags");
    let extract = |e: &(u32, [&'static str; 2])| e.1.to_vec();
    let mut index = MultiIndex::new();
    index.add_index(KeyValueIndexing::new(TAGS, extract));
    // Two separately added, equal elements are two matches.
    index.add((1, ["a", "b"]));
    index.add((1, ["a", "b"]));
    index.add((2, ["b", "c"]));

    let query = KeyValueIndexing::new(TAGS, extract).criteria(vec!["a", "b"]);
    let criteria: [&dyn Criteria<(u32, [&'static str; 2])>; 1] = [&query];
    let expected = index.len();
    let mut results = index.get_matches(&criteria, 10);
    assert_eq!(results.size(), expected);
    let mut ids: Vec<u32> = results.realize().iter().map(|e| e.0).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 1, 2]);

    // An explicit set union still collapses them.
    let mut deduped = MultiIndex::new();
    deduped.add_index(KeyValueIndexing::new(TAGS, extract).with_remove_duplicates(true));
    deduped.add((1, ["a", "b"]));
    deduped.add((1, ["a", "b"]));
    assert_eq!(deduped.get_matches(&criteria, 10).size(), 1);
}

#[test]
fn test_list_results_views() {
    let data = vec![1u32, 2];
    let mut borrowed = ListResults::borrowed(&data);
    assert_eq!(borrowed.size(), 2);
    assert_eq!(borrowed.read_to(10), 2);
    assert_eq!(borrowed.into_vec(), data);

    let empty: ListResults<'_, u32> = ListResults::empty();
    assert!(empty.is_empty());
    assert_eq!(empty.available(), 0);
}

// ==================== Intervals ====================

const SHIFT: CriteriaType = CriteriaType::new("shift");

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Shift {
    id: u32,
    range: TimeRange,
}

fn shift(id: u32, start_hour: i64, hours: i64) -> Shift {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let start = base + Duration::hours(start_hour);
    Shift {
        id,
        range: TimeRange::new(start, start + Duration::hours(hours)),
    }
}

fn window(start_hour: i64, end_hour: i64) -> TimeRange {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    TimeRange::new(
        base + Duration::hours(start_hour),
        base + Duration::hours(end_hour),
    )
}

fn roster() -> (MultiIndex<Shift>, IntervalIndexing<Shift>) {
    let mut index = MultiIndex::new();
    index.add_index(IntervalIndexing::new(SHIFT, |s: &Shift| s.range));
    index.add_all([
        shift(1, 0, 8),
        shift(2, 6, 8),
        shift(3, 12, 4),
        shift(4, 20, 10),
        shift(5, 30, 2),
    ]);
    (index, IntervalIndexing::new(SHIFT, |s: &Shift| s.range))
}

#[test]
fn test_overlap_query_through_multi_index() {
    let (index, shifts) = roster();
    let query = shifts.criteria(window(7, 13), OverlapRelation::Overlaps);
    let criteria: [&dyn Criteria<Shift>; 1] = [&query];

    let plan = index.explain(&criteria);
    assert_eq!(plan.index_path, vec![SHIFT]);
    assert_eq!(plan.residual, vec![SHIFT]);
    assert_eq!(plan.candidates, 3);

    let mut results = index.get_matches(&criteria, 10);
    let ids: Vec<u32> = results.realize().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_within_query_through_multi_index() {
    let (index, shifts) = roster();
    let query = shifts.criteria(window(5, 31), OverlapRelation::Within);
    let criteria: [&dyn Criteria<Shift>; 1] = [&query];

    let mut results = index.get_matches(&criteria, 10);
    let ids: Vec<u32> = results.realize().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert!(index.predictivity_of(&query) <= 1.0);
}

#[test]
fn test_time_range_normalizes_bounds() {
    let reversed = window(10, 2);
    assert_eq!(reversed, window(2, 10));
    let at = TimeRange::at(reversed.start);
    assert!(at.within(&reversed));
    assert!(reversed.contains(reversed.end));
    assert!(!window(0, 1).overlaps(&window(2, 3)));
}
