//! Index selection: picks the index (and chain of sub-indexes) that best
//! narrows a query, and the criteria left for the residual filter.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::index::{Index, IndexRef, Indexing};
use crate::types::{Criteria, CriteriaType, Element};

/// One adopted level of sub-index descent.
struct Level<'a, T: Element> {
    index: IndexRef<'a, T>,
    criteria_type: CriteriaType,
    /// Criterion removed from the residual list, with the position it was
    /// removed from. `None` when the index was conservative.
    consumed: Option<(usize, &'a dyn Criteria<T>)>,
}

/// Chosen index path and residual criteria for one query.
pub(crate) struct Plan<'a, T: Element> {
    levels: Vec<Level<'a, T>>,
    pub(crate) remaining: Vec<&'a dyn Criteria<T>>,
}

impl<'a, T: Element> Plan<'a, T> {
    /// Select indexes for `criteria`, which must already be ordered by
    /// ascending predictivity.
    pub(crate) fn build(
        indexings: &'a HashMap<CriteriaType, Box<dyn Indexing<T>>>,
        criteria: Vec<&'a dyn Criteria<T>>,
    ) -> Self {
        let mut plan = Plan {
            levels: Vec::new(),
            remaining: criteria,
        };
        let mut used: Vec<&'a dyn Criteria<T>> = Vec::new();

        let top = determine_effective_index(
            |ty| indexings.get(ty).map(|i| i.as_ref() as &'a dyn Indexing<T>),
            &plan.remaining,
            &used,
        );
        if let Some((pos, index)) = top {
            plan.adopt(pos, index, &mut used);

            while let Some(sub) = plan.levels.last().and_then(|l| l.index.stored_sub_indexing()) {
                let sub_type = sub.criteria_type();
                let next = determine_effective_index(
                    |ty| (ty == sub_type).then_some(sub),
                    &plan.remaining,
                    &used,
                );
                let Some((pos, index)) = next else {
                    break;
                };
                log::trace!("descending into {} sub-index ({} entries)", sub_type, index.size());
                plan.adopt(pos, index, &mut used);
            }
        }

        plan.back_out();
        plan
    }

    /// Push a level; an exact index fully accounts for its criterion.
    fn adopt(&mut self, pos: usize, index: IndexRef<'a, T>, used: &mut Vec<&'a dyn Criteria<T>>) {
        let criterion = self.remaining[pos];
        used.push(criterion);
        let consumed = if index.is_conservative() {
            None
        } else {
            Some((pos, self.remaining.remove(pos)))
        };
        self.levels.push(Level {
            index,
            criteria_type: criterion.criteria_type().clone(),
            consumed,
        });
    }

    /// Drop trailing levels that cannot enumerate their members, handing
    /// their criteria back to the residual filter.
    fn back_out(&mut self) {
        while let Some(level) = self.levels.pop() {
            if level.index.get_all().is_some() {
                self.levels.push(level);
                break;
            }
            log::trace!("{} index cannot enumerate, backing out", level.criteria_type);
            if let Some((pos, criterion)) = level.consumed {
                self.remaining.insert(pos, criterion);
            }
        }
    }

    /// The deepest usable index, or `None` for a full scan.
    pub(crate) fn index(&self) -> Option<&IndexRef<'a, T>> {
        self.levels.last().map(|l| &l.index)
    }

    /// Criteria types along the chosen index path, outermost first.
    pub(crate) fn index_path(&self) -> Vec<CriteriaType> {
        self.levels.iter().map(|l| l.criteria_type.clone()).collect()
    }

    /// Criteria types left for the residual filter.
    pub(crate) fn residual(&self) -> Vec<CriteriaType> {
        self.remaining
            .iter()
            .map(|c| c.criteria_type().clone())
            .collect()
    }
}

/// First criterion in `remaining` (and not yet used for selection) whose
/// type `lookup` has an indexing for and which that indexing can narrow,
/// with its position and index.
fn determine_effective_index<'a, T: Element>(
    lookup: impl Fn(&CriteriaType) -> Option<&'a dyn Indexing<T>>,
    remaining: &[&'a dyn Criteria<T>],
    used: &[&'a dyn Criteria<T>],
) -> Option<(usize, IndexRef<'a, T>)> {
    remaining.iter().enumerate().find_map(|(pos, &criterion)| {
        if used.iter().any(|&u| same_criterion(u, criterion)) {
            return None;
        }
        let indexing = lookup(criterion.criteria_type())?;
        let index = indexing.get_index(criterion)?;
        Some((pos, index))
    })
}

fn same_criterion<T>(a: &dyn Criteria<T>, b: &dyn Criteria<T>) -> bool {
    std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ())
}

/// Description of how a query would be answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    /// Criteria types whose indexes were descended, outermost first.
    pub index_path: Vec<CriteriaType>,
    /// Criteria types checked against every candidate.
    pub residual: Vec<CriteriaType>,
    /// Whether every element is a candidate.
    pub full_scan: bool,
    /// Number of candidates the residual filter will visit.
    pub candidates: usize,
    /// Estimated number of matches.
    pub estimated_size: usize,
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[CriteriaType]| {
            types
                .iter()
                .map(CriteriaType::name)
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        if self.full_scan {
            writeln!(f, "Access: full scan")?;
        } else {
            writeln!(f, "Access: index {}", join(&self.index_path))?;
        }
        writeln!(f, "Candidates: {}", self.candidates)?;
        if self.residual.is_empty() {
            writeln!(f, "Residual filter: none")?;
        } else {
            writeln!(
                f,
                "Residual filter: {}",
                self.residual
                    .iter()
                    .map(CriteriaType::name)
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
        }
        write!(f, "Estimated size: {}", self.estimated_size)
    }
}
