//! Functional-equivalence candidate classes (FEC groups).
//!
//! Nodes whose simulation words are equal, or bitwise complementary, might compute the
//! same function (possibly up to an inverter). Each simulation batch refines the
//! partition: a group is split by word, and any member left alone is dropped for good.
//! Groups therefore only ever shrink.

use std::collections::HashMap;

use crate::NodeId;

/// A partition of candidate nodes into groups of at least two members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FecGroups {
    groups: Vec<Vec<NodeId>>,
    initialized: bool,
}

/// Key identifying a word up to complementation.
fn canonical(word: u64) -> u64 {
    word.max(!word)
}

impl FecGroups {
    pub fn new() -> Self {
        FecGroups::default()
    }

    /// Starts from a single group holding the constant node and every given and gate.
    pub fn initialize(&mut self, and_gates: impl IntoIterator<Item = NodeId>) {
        let mut group = vec![0];
        group.extend(and_gates);
        self.groups = vec![group];
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn groups(&self) -> &[Vec<NodeId>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of nodes still in some group.
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Splits every group by simulation word, up to complementation.
    ///
    /// Buckets keep the order in which their first member was met, and members keep
    /// their relative order, so the result only depends on the input partition and words.
    /// Singleton buckets are dropped.
    pub fn refine(&mut self, signature: impl Fn(NodeId) -> u64) {
        let mut refined = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let mut index: HashMap<u64, usize> = HashMap::new();
            let mut buckets: Vec<Vec<NodeId>> = Vec::new();
            for &id in group {
                let key = canonical(signature(id));
                match index.get(&key) {
                    Some(&b) => buckets[b].push(id),
                    None => {
                        index.insert(key, buckets.len());
                        buckets.push(vec![id]);
                    }
                }
            }
            refined.extend(buckets.into_iter().filter(|b| b.len() > 1));
        }
        self.groups = refined;
    }

    /// Keeps only the members accepted by `keep`, then drops groups left with fewer than
    /// two members.
    pub fn retain(&mut self, keep: impl Fn(NodeId) -> bool) {
        for group in &mut self.groups {
            group.retain(|&id| keep(id));
        }
        self.groups.retain(|g| g.len() > 1);
    }

    /// Sorts members ascending inside each group, and groups by their smallest member.
    pub fn normalize(&mut self) {
        for group in &mut self.groups {
            group.sort_unstable();
        }
        self.groups.retain(|g| g.len() > 1);
        self.groups.sort_unstable_by_key(|g| g[0]);
    }

    /// Orders members inside each group by the given key (e.g. topological rank).
    pub fn sort_members_by_key<K: Ord>(&mut self, key: impl Fn(NodeId) -> K) {
        for group in &mut self.groups {
            group.sort_by_key(|&id| key(id));
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn words(pairs: &[(NodeId, u64)]) -> HashMap<NodeId, u64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn refine_up_to_complement() {
        let mut fec = FecGroups::new();
        fec.initialize([3, 4, 5, 6, 7]);
        let w = words(&[(0, 0), (3, !0), (4, 0b1010), (5, !0b1010), (6, 0b0110), (7, 0)]);
        fec.refine(|id| w[&id]);
        assert_eq!(fec.groups(), &[vec![0, 3, 7], vec![4, 5]]);
        assert_eq!(fec.candidate_count(), 5);
    }

    #[test]
    fn groups_only_shrink() {
        let mut fec = FecGroups::new();
        fec.initialize(1..=8);
        let rounds = [
            words(&[(0, 0), (1, 0), (2, 1), (3, 1), (4, 0), (5, 2), (6, 2), (7, 1), (8, 3)]),
            words(&[(0, 0), (1, 4), (2, 1), (3, 1), (4, 0), (5, 2), (6, 7), (7, 1), (8, 3)]),
            words(&[(0, 0), (1, 4), (2, 1), (3, 5), (4, 0), (5, 2), (6, 7), (7, 1), (8, 3)]),
        ];
        let mut previous = fec.groups().to_vec();
        for w in &rounds {
            fec.refine(|id| w[&id]);
            for group in fec.groups() {
                assert!(previous.iter().any(|p| group.iter().all(|id| p.contains(id))));
            }
            assert!(fec.candidate_count() <= previous.iter().map(Vec::len).sum());
            previous = fec.groups().to_vec();
        }
        assert_eq!(fec.groups(), &[vec![0, 4], vec![2, 7]]);
    }

    #[test]
    fn retain_and_normalize() {
        let mut fec = FecGroups::new();
        fec.initialize([9, 3]);
        fec.normalize();
        assert_eq!(fec.groups(), &[vec![0, 3, 9]]);
        fec.retain(|id| id != 3);
        assert_eq!(fec.groups(), &[vec![0, 9]]);
        fec.retain(|id| id != 0);
        assert!(fec.is_empty());
        assert!(fec.is_initialized());
    }
}
