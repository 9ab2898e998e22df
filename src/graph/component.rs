//! Connected components of the connection-group hypergraph.
//!
//! Adjacency through a shared group is symmetric, so plain undirected
//! connectivity is all that is needed: a breadth-first flood fill from each
//! uncoloured word, expanding every group a coloured word belongs to.

use std::collections::VecDeque;

use bit_vec::BitVec;

use crate::graph::connection::ConnectionGroups;

/// A maximal set of mutually reachable words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    id: usize,
    members: Vec<usize>,
    groups: Vec<usize>,
}

impl Component {
    /// Component id within its length partition.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member word ids, ascending. A member's position here is its local id.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Ids of every group touched while expanding the component, in discovery order.
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Number of member words.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a built component, which holds at least two words.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The split of one length partition into orphans and components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPartition {
    components: Vec<Component>,
    component_of: Vec<Option<usize>>,
    orphans: Vec<usize>,
}

impl ComponentPartition {
    /// All components, ordered by their smallest member.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component of a word, or `None` for an orphan.
    pub fn component_of(&self, word_id: usize) -> Option<usize> {
        self.component_of[word_id]
    }

    /// Word ids with no connection group, ascending.
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }
}

/// Flood-fills connection groups into components.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentPartitioner;

impl ComponentPartitioner {
    /// Create a new partitioner.
    pub fn new() -> Self {
        ComponentPartitioner
    }

    /// Partition the words covered by `groups`.
    pub fn partition(&self, groups: &ConnectionGroups) -> ComponentPartition {
        let word_count = groups.word_count();
        let mut component_of: Vec<Option<usize>> = vec![None; word_count];
        let mut group_seen = BitVec::from_elem(groups.len(), false);
        let mut components = Vec::new();
        let mut orphans = Vec::new();
        let mut queue = VecDeque::new();

        for start in 0..word_count {
            if groups.is_orphan(start) {
                orphans.push(start);
                continue;
            }
            if component_of[start].is_some() {
                continue;
            }

            let id = components.len();
            component_of[start] = Some(id);
            let mut members = vec![start];
            let mut touched = Vec::new();
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                for &group_id in groups.memberships(current) {
                    if group_seen[group_id] {
                        continue;
                    }
                    group_seen.set(group_id, true);
                    touched.push(group_id);

                    for &word in groups.group(group_id) {
                        if component_of[word].is_none() {
                            component_of[word] = Some(id);
                            members.push(word);
                            queue.push_back(word);
                        }
                    }
                }
            }

            members.sort_unstable();
            components.push(Component {
                id,
                members,
                groups: touched,
            });
        }

        ComponentPartition {
            components,
            component_of,
            orphans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(list: &[&str]) -> ComponentPartition {
        let words: Vec<String> = list.iter().map(|w| w.to_string()).collect();
        let groups = ConnectionGroups::build(&words);
        ComponentPartitioner::new().partition(&groups)
    }

    #[test]
    fn test_single_component() {
        let result = partition(&["cat", "cog", "cot", "dog", "dot"]);
        assert_eq!(result.components().len(), 1);
        assert!(result.orphans().is_empty());

        let component = &result.components()[0];
        assert_eq!(component.members(), [0, 1, 2, 3, 4]);
        assert_eq!(component.groups().len(), 5);
        assert_eq!(component.len(), 5);
    }

    #[test]
    fn test_orphans() {
        let result = partition(&["cat", "dog"]);
        assert!(result.components().is_empty());
        assert_eq!(result.orphans(), [0, 1]);
        assert_eq!(result.component_of(0), None);
    }

    #[test]
    fn test_multiple_components() {
        // {ant, apt}, {bog, bug, dug}, orphan {zzz}
        let result = partition(&["ant", "apt", "bog", "bug", "dug", "zzz"]);
        assert_eq!(result.components().len(), 2);
        assert_eq!(result.orphans(), [5]);

        assert_eq!(result.components()[0].members(), [0, 1]);
        assert_eq!(result.components()[1].members(), [2, 3, 4]);
        assert_eq!(result.component_of(1), Some(0));
        assert_eq!(result.component_of(4), Some(1));
    }

    #[test]
    fn test_groups_stay_inside_component() {
        let words: Vec<String> = ["ant", "apt", "bog", "bug", "dug", "big"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let groups = ConnectionGroups::build(&words);
        let result = ComponentPartitioner::new().partition(&groups);

        let mut seen = vec![0usize; groups.len()];
        for component in result.components() {
            for &group_id in component.groups() {
                seen[group_id] += 1;
                for &word in groups.group(group_id) {
                    assert_eq!(result.component_of(word), Some(component.id()));
                }
            }
        }
        // Every group is recorded by exactly one component.
        assert!(seen.iter().all(|&count| count == 1));
    }
}
