//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! The reduction passes live in their own modules and extend [`Aig`]:
//! [`crate::strash`], [`crate::optimize`], [`crate::sim`] and [`crate::fraig`].

pub mod edge;
pub mod error;
mod integrity;
pub mod node;
pub mod walk;

use std::mem::take;

pub use edge::AigEdge;
pub use error::{AigError, Result};
pub use node::{AigNode, NodeId, NodeKind};

use crate::fec::FecGroups;

/// Live node counts, as reported before and after each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AigStats {
    pub inputs: usize,
    pub outputs: usize,
    pub ands: usize,
}

impl std::fmt::Display for AigStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PI={} PO={} AIG={}", self.inputs, self.outputs, self.ands)
    }
}

/// A whole combinational AIG.
///
/// Nodes live in a table indexed by their [`NodeId`]. Edges are plain ids, so the table
/// is the sole owner of every node. A freed node leaves an empty slot behind: its id
/// is never handed out again.
///
/// The only way a node gets freed is through a pass (merge or sweep), which first makes
/// sure nothing refers to it anymore. See [`Aig::merge`] for the core rewiring primitive.
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: Vec<Option<AigNode>>,
    /// Inputs in declaration order.
    inputs: Vec<NodeId>,
    /// Outputs in declaration order.
    outputs: Vec<NodeId>,
    /// Number of live and gates.
    n_ands: usize,
    /// Incremented once per walk, see [`crate::aig::walk`].
    generation: u64,
    pub(crate) fec: FecGroups,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`NodeKind::False`] included, with id 0).
    pub fn new() -> Self {
        Aig {
            nodes: vec![Some(AigNode::new(0, NodeKind::False))],
            inputs: Vec::new(),
            outputs: Vec::new(),
            n_ands: 0,
            generation: 0,
            fec: FecGroups::new(),
        }
    }

    /// Retrieves a node from its id, [`None`] if it was never created or has been freed.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(id)?.as_ref()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Internal accessor. Addressing a freed slot is a logic error.
    pub(crate) fn node(&self, id: NodeId) -> &AigNode {
        match self.nodes.get(id) {
            Some(Some(n)) => n,
            _ => panic!("node {} is not in the AIG (freed or never created)", id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut AigNode {
        match self.nodes.get_mut(id) {
            Some(Some(n)) => n,
            _ => panic!("node {} is not in the AIG (freed or never created)", id),
        }
    }

    /// Size of the node table, freed slots included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over live nodes in ascending id order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &AigNode> {
        self.nodes.iter().flatten()
    }

    /// Retrieves inputs id, in declaration order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Retrieves outputs id, in declaration order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn stats(&self) -> AigStats {
        AigStats {
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            ands: self.n_ands,
        }
    }

    /// Current simulation word of every output, in declaration order.
    pub fn output_signatures(&self) -> Vec<u64> {
        self.outputs
            .iter()
            .map(|&id| self.node(id).signature)
            .collect()
    }

    /// The candidate equivalence classes computed by the last simulation.
    pub fn fec_groups(&self) -> &[Vec<NodeId>] {
        self.fec.groups()
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(AigNode::new(id, kind)));
        id
    }

    fn check_valid_fanin(&self, fanin: &AigEdge) -> Result<()> {
        let n = self
            .get_node(fanin.node)
            .ok_or(AigError::NodeDoesNotExist(fanin.node))?;
        if n.is_output() {
            Err(AigError::InvalidFanin(fanin.node))
        } else {
            Ok(())
        }
    }

    /// Create a new primary input.
    pub fn add_input(&mut self, name: Option<&str>) -> NodeId {
        let id = self.push_node(NodeKind::Input {
            name: name.map(str::to_string),
        });
        self.inputs.push(id);
        id
    }

    /// Create a placeholder for a node that is referenced but never declared.
    pub fn add_undefined(&mut self) -> NodeId {
        self.push_node(NodeKind::Undefined)
    }

    /// Create a new and gate, registering it as a fanout of both fanins.
    ///
    /// No structural hashing happens here: building the same gate twice gives two nodes.
    ///
    /// ```rust
    /// use aigreduce::{Aig, AigEdge};
    /// let mut aig = Aig::new();
    /// let a = aig.add_input(Some("a"));
    /// let g = aig.add_and(AigEdge::new(a, false), AigEdge::new(a, true)).unwrap();
    /// assert_eq!(aig.get_node(a).unwrap().get_fanouts().len(), 2);
    /// assert!(aig.add_and(AigEdge::new(g + 1, false), AigEdge::new(a, false)).is_err());
    /// ```
    pub fn add_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> Result<NodeId> {
        self.check_valid_fanin(&fanin0)?;
        self.check_valid_fanin(&fanin1)?;
        let id = self.push_node(NodeKind::And { fanin0, fanin1 });
        self.add_fanout(fanin0.node, AigEdge::new(id, fanin0.complement));
        self.add_fanout(fanin1.node, AigEdge::new(id, fanin1.complement));
        self.n_ands += 1;
        Ok(id)
    }

    /// Create a new primary output driven by `fanin`.
    pub fn add_output(&mut self, fanin: AigEdge, name: Option<&str>) -> Result<NodeId> {
        self.check_valid_fanin(&fanin)?;
        let id = self.push_node(NodeKind::Output {
            fanin,
            name: name.map(str::to_string),
        });
        self.add_fanout(fanin.node, AigEdge::new(id, fanin.complement));
        self.outputs.push(id);
        Ok(id)
    }

    /// Adds `(consumer, phase)` to the fanouts of `node`.
    pub(crate) fn add_fanout(&mut self, node: NodeId, fanout: AigEdge) {
        self.node_mut(node).add_fanout(fanout);
    }

    /// Removes one `(consumer, phase)` entry from the fanouts of `node`, if present.
    pub(crate) fn remove_fanout(&mut self, node: NodeId, fanout: AigEdge) -> bool {
        self.node_mut(node).remove_fanout(fanout)
    }

    /// Overwrites the fanin slot of `consumer` equal to `old` with `new`.
    ///
    /// Only the fanin side is touched: callers keep the fanouts in sync.
    /// Nothing happens if `consumer` has no such fanin.
    pub(crate) fn replace_fanin(&mut self, consumer: NodeId, old: AigEdge, new: AigEdge) {
        if !self.node_mut(consumer).replace_fanin(old, new) {
            log::warn!(
                "replace_fanin: node {} has no fanin {:?}, left untouched",
                consumer,
                old
            );
        }
    }

    /// Declares that `source` is logically equal to `target` (or `!target` if `invert`),
    /// and moves every consumer of `source` over to `target`.
    ///
    /// After this call:
    /// - the fanins of `source` no longer list it as a fanout,
    /// - every former consumer of `source` reads `target` instead, phase xor-ed with `invert`,
    /// - `source` has no fanout and can be freed with [`Aig::remove_node`].
    ///
    /// # Panics
    ///
    /// Merging a node into itself is a logic error and panics.
    pub fn merge(&mut self, target: NodeId, source: NodeId, invert: bool) {
        assert_ne!(target, source, "cannot merge node {} into itself", source);
        assert!(self.contains(target), "merge target {} is not in the AIG", target);
        assert!(
            self.node(source).is_and() || self.node(source).is_undefined(),
            "only and gates and undefined nodes can be merged away (node {})",
            source
        );

        for fanin in self.node(source).get_fanins() {
            let removed = self.remove_fanout(fanin.node, AigEdge::new(source, fanin.complement));
            debug_assert!(removed, "fanin {:?} of {} had no fanout entry", fanin, source);
        }

        let fanouts = take(&mut self.node_mut(source).fanouts);
        for fanout in fanouts {
            let consumer = fanout.node;
            self.replace_fanin(
                consumer,
                AigEdge::new(source, fanout.complement),
                fanout.with_node(target, invert),
            );
            self.add_fanout(target, fanout.with_node(consumer, invert));
        }
    }

    /// Frees the slot of a node nothing refers to anymore, and returns the node.
    ///
    /// # Panics
    ///
    /// Panics if the node still has fanouts, or is the constant node, an input or an output.
    pub fn remove_node(&mut self, id: NodeId) -> AigNode {
        {
            let n = self.node(id);
            assert!(
                n.fanouts.is_empty(),
                "cannot free node {} which still has {} fanout(s)",
                id,
                n.fanouts.len()
            );
            assert!(
                n.is_and() || n.is_undefined(),
                "only and gates and undefined nodes can be freed (node {})",
                id
            );
        }
        let Some(node) = self.nodes[id].take() else {
            unreachable!()
        };
        if node.is_and() {
            self.n_ands -= 1;
        }
        node
    }

    /// Removes the fanout entries pointing back at `id` from each of its fanins.
    /// Fanins that were already freed are skipped.
    pub(crate) fn detach_fanins(&mut self, id: NodeId) {
        for fanin in self.node(id).get_fanins() {
            if self.contains(fanin.node) {
                self.remove_fanout(fanin.node, AigEdge::new(id, fanin.complement));
            }
        }
    }

    /// Starts the FEC partition from the constant node and every and gate of `order`.
    pub(crate) fn init_fec(&mut self, order: &[NodeId]) {
        let Aig { nodes, fec, .. } = self;
        fec.initialize(
            order
                .iter()
                .copied()
                .filter(|&id| nodes[id].as_ref().is_some_and(AigNode::is_and)),
        );
    }

    /// Refines the FEC partition with the current simulation words.
    pub(crate) fn refine_fec(&mut self) {
        let Aig { nodes, fec, .. } = self;
        fec.refine(|id| nodes[id].as_ref().map_or(0, |n| n.signature));
    }

    /// Drops from the FEC partition every node that was freed or not reached by the
    /// latest walk. The constant node is always kept.
    pub(crate) fn retain_live_fec(&mut self) {
        let Aig {
            nodes,
            fec,
            generation,
            ..
        } = self;
        let generation = *generation;
        fec.retain(|id| {
            id == 0
                || nodes
                    .get(id)
                    .and_then(Option::as_ref)
                    .is_some_and(|n| n.stamp == generation)
        });
    }

    /// Resets every group index, then assigns the index of the current FEC groups.
    pub(crate) fn assign_fec_indices(&mut self) {
        let Aig { nodes, fec, .. } = self;
        for n in nodes.iter_mut().flatten() {
            n.fec_group = None;
        }
        for (idx, group) in fec.groups().iter().enumerate() {
            for &id in group {
                if let Some(Some(n)) = nodes.get_mut(id) {
                    n.fec_group = Some(idx);
                }
            }
        }
    }
}
