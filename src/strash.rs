//! Structural hashing: merges and gates reading the same pair of signed fanins.

use std::collections::HashMap;

use crate::{Aig, AigEdge, NodeId, NodeKind};

/// Order-independent key of an and gate: AND is commutative.
fn strash_key(fanin0: AigEdge, fanin1: AigEdge) -> (AigEdge, AigEdge) {
    if fanin0 <= fanin1 {
        (fanin0, fanin1)
    } else {
        (fanin1, fanin0)
    }
}

impl Aig {
    /// Merges every reachable and gate into the first reachable gate with the same
    /// unordered pair of fanins, and frees it. Returns the number of merged gates.
    ///
    /// Gates are hashed in topological order, so the fanins of a gate are already
    /// canonical when it is looked up and duplicated cones collapse in a single pass.
    pub fn strash(&mut self) -> usize {
        let before = self.stats();
        let order = self.walk_from_outputs();
        let mut table: HashMap<(AigEdge, AigEdge), NodeId> = HashMap::with_capacity(order.len());
        let mut merged = 0;

        for id in order {
            let NodeKind::And { fanin0, fanin1 } = *self.node(id).kind() else {
                continue;
            };
            let key = strash_key(fanin0, fanin1);
            match table.get(&key) {
                Some(&first) => {
                    self.merge(first, id, false);
                    self.remove_node(id);
                    merged += 1;
                    log::debug!("strash: {} merging {}", first, id);
                }
                None => {
                    table.insert(key, id);
                }
            }
        }

        log::info!("strash: {} -> {} ({} merged)", before, self.stats(), merged);
        merged
    }
}
