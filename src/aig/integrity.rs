use std::collections::HashMap;

use crate::{Aig, AigEdge, AigError, NodeId, NodeKind, Result};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG at any moment:
    /// - only the constant node has id 0, and each node sits in its own slot
    /// - fanins refer to live nodes, never to an output
    /// - each fanin `(u -> v, inv)` matches exactly one `(u, inv)` fanout entry of `v`, and vice versa
    /// - outputs have no fanout
    /// - the and gate counter matches the table
    /// - the part of the AIG reachable from the outputs is acyclic.
    pub fn check_integrity(&self) -> Result<()> {
        // +1 for each fanin, -1 for each fanout entry: everything must cancel out.
        let mut balance: HashMap<(NodeId, AigEdge), i64> = HashMap::new();
        let mut n_ands = 0;

        for (slot, node) in self.nodes.iter().enumerate() {
            let Some(node) = node else { continue };
            let id = node.get_id();
            if id != slot {
                return Err(AigError::InvalidState(format!(
                    "node {} is stored in slot {}",
                    id, slot
                )));
            }
            if (id == 0) != node.is_false() {
                return Err(AigError::InvalidState(
                    "id=0 is for the constant node only".to_string(),
                ));
            }
            if node.is_and() {
                n_ands += 1;
            }
            if node.is_output() && !node.get_fanouts().is_empty() {
                return Err(AigError::InvalidState(format!(
                    "output {} has fanouts",
                    id
                )));
            }

            for fanin in node.get_fanins() {
                let driver = self.get_node(fanin.node).ok_or(AigError::InvalidState(format!(
                    "node {} has fanin {} which is not in the AIG anymore",
                    id, fanin.node
                )))?;
                if driver.is_output() {
                    return Err(AigError::InvalidState(format!(
                        "node {} is driven by output {}",
                        id, fanin.node
                    )));
                }
                *balance
                    .entry((fanin.node, AigEdge::new(id, fanin.complement)))
                    .or_default() += 1;
            }
            for fanout in node.get_fanouts() {
                if !self.contains(fanout.node) {
                    return Err(AigError::InvalidState(format!(
                        "fanout {} of node {} is no longer in the AIG",
                        fanout.node, id
                    )));
                }
                *balance.entry((id, *fanout)).or_default() -= 1;
            }
        }

        if let Some(((driver, edge), count)) = balance.iter().find(|(_, count)| **count != 0) {
            return Err(AigError::InvalidState(format!(
                "edge {} -> {}{} is unbalanced: {} more fanin(s) than fanout entries",
                edge.node,
                if edge.complement { "!" } else { "" },
                driver,
                count
            )));
        }

        if n_ands != self.n_ands {
            return Err(AigError::InvalidState(format!(
                "{} and gates in the table, counter says {}",
                n_ands, self.n_ands
            )));
        }

        self.check_acyclic()
    }

    /// Three-color DFS from the outputs.
    fn check_acyclic(&self) -> Result<()> {
        // 1 = on the current path, 2 = done
        let mut color: HashMap<NodeId, u8> = HashMap::new();

        for &output in &self.outputs {
            let mut stack: Vec<(NodeId, bool)> = vec![(output, false)];
            while let Some((id, last_time)) = stack.pop() {
                if last_time {
                    color.insert(id, 2);
                    continue;
                }
                match color.get(&id) {
                    Some(2) => continue,
                    Some(_) => {
                        return Err(AigError::InvalidState(format!(
                            "found a cycle through node {}",
                            id
                        )));
                    }
                    None => (),
                }
                color.insert(id, 1);
                stack.push((id, true));

                if let NodeKind::And { fanin0, fanin1 } = self.node(id).kind() {
                    for fanin in [fanin0, fanin1] {
                        match color.get(&fanin.node) {
                            Some(2) => (),
                            Some(_) => {
                                return Err(AigError::InvalidState(format!(
                                    "found a cycle through node {}",
                                    fanin.node
                                )));
                            }
                            None => stack.push((fanin.node, false)),
                        }
                    }
                } else if let NodeKind::Output { fanin, .. } = self.node(id).kind() {
                    stack.push((fanin.node, false));
                }
            }
        }
        Ok(())
    }
}
