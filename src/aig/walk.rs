//! Generation-stamped depth-first walks from the primary outputs.
//!
//! Each walk bumps [`Aig`]'s generation counter once. A node has been visited by the
//! current walk iff its stamp equals the current generation, so nothing needs to be
//! cleared between two walks.
//!
//! The traversal uses an explicit stack, fanin0 before fanin1, and yields nodes in
//! post-order: a node comes after both of its fanins. Undefined nodes are marked but
//! never yielded.

use super::{Aig, NodeId, NodeKind};

impl Aig {
    /// Returns the nodes reachable from the outputs (outputs, inputs and the constant
    /// node included), in topological order.
    pub fn walk_from_outputs(&mut self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.n_ands + self.inputs.len() + self.outputs.len());
        self.walk(Some(&mut order));
        order
    }

    /// Marks the nodes reachable from the outputs with a fresh generation, without
    /// collecting them. Use [`Aig::is_marked`] afterwards.
    pub fn mark_from_outputs(&mut self) {
        self.walk(None);
    }

    /// Whether the node was reached by the latest walk.
    pub fn is_marked(&self, id: NodeId) -> bool {
        self.get_node(id)
            .is_some_and(|n| n.stamp == self.generation)
    }

    fn walk(&mut self, mut order: Option<&mut Vec<NodeId>>) {
        self.generation += 1;
        let generation = self.generation;

        // (node, fanins done)
        let mut stack: Vec<(NodeId, bool)> = Vec::new();
        for &output in self.outputs.iter().rev() {
            stack.push((output, false));
        }

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                if let Some(order) = order.as_deref_mut() {
                    order.push(id);
                }
                continue;
            }

            let node = self.node_mut(id);
            if node.stamp == generation {
                continue;
            }
            node.stamp = generation;

            match node.kind() {
                NodeKind::Undefined => (),
                NodeKind::And { fanin0, fanin1 } => {
                    let (f0, f1) = (fanin0.node, fanin1.node);
                    stack.push((id, true));
                    stack.push((f1, false));
                    stack.push((f0, false));
                }
                NodeKind::Output { fanin, .. } => {
                    let f = fanin.node;
                    stack.push((id, true));
                    stack.push((f, false));
                }
                NodeKind::False | NodeKind::Input { .. } => stack.push((id, true)),
            }
        }
    }
}
