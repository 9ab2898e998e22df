//! Shortest ladders inside one component.
//!
//! Breadth-first search over the connection-group hypergraph. Each group is
//! expanded at most once, so a search costs at most the sum of group sizes.
//! Among equally short ladders the one returned depends on group construction
//! order and member order; it is deterministic but not lexicographically
//! canonical.

use std::collections::VecDeque;

use bit_vec::BitVec;
use log::debug;

use crate::error::{Result, RungsError};
use crate::index::LoadedComponent;
use crate::ladder::Ladder;

/// Finds shortest ladders between members of a loaded component.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    component: &'a LoadedComponent,
}

impl<'a> PathFinder<'a> {
    /// Search within `component`.
    pub fn new(component: &'a LoadedComponent) -> Self {
        PathFinder { component }
    }

    fn local_id(&self, word: &str) -> Result<usize> {
        self.component.local_id(word).ok_or_else(|| {
            RungsError::internal(format!(
                "{word} is not a member of component {} of length {}",
                self.component.id(),
                self.component.length()
            ))
        })
    }

    /// Shortest ladder from `source` to `destination`, both members of the component.
    ///
    /// `source == destination` yields `[source, source]`. Failing to reach the
    /// destination means the stored component is inconsistent and is reported
    /// as [`RungsError::Internal`].
    pub fn find(&self, source: &str, destination: &str) -> Result<Ladder> {
        if source == destination {
            return Ok(Ladder::to_self(source));
        }

        let from = self.local_id(source)?;
        let to = self.local_id(destination)?;
        let groups = self.component.groups();

        let mut prev: Vec<Option<usize>> = vec![None; self.component.len()];
        let mut group_used = BitVec::from_elem(groups.len(), false);
        let mut queue = VecDeque::new();

        prev[from] = Some(from);
        queue.push_back(from);

        'search: while let Some(current) = queue.pop_front() {
            for &group_id in groups.memberships(current) {
                if group_used[group_id] {
                    continue;
                }
                group_used.set(group_id, true);

                for &word in groups.group(group_id) {
                    if prev[word].is_some() {
                        continue;
                    }
                    prev[word] = Some(current);
                    if word == to {
                        break 'search;
                    }
                    queue.push_back(word);
                }
            }
        }

        if prev[to].is_none() {
            return Err(RungsError::internal(format!(
                "{destination} unreachable from {source} in component {} of length {}",
                self.component.id(),
                self.component.length()
            )));
        }

        // Walk back to the source, whose slot points at itself.
        let mut path = Vec::new();
        let mut current = to;
        while let Some(parent) = prev[current]
            && parent != current
        {
            path.push(current);
            current = parent;
        }

        let mut words = Vec::with_capacity(path.len() + 1);
        words.push(source.to_string());
        words.extend(path.iter().rev().map(|&id| self.component.word(id).to_string()));

        debug!("Ladder {source} -> {destination}: {} words", words.len());
        Ok(Ladder::new(words))
    }
}
