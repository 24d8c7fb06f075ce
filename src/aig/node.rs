use super::AigEdge;

/// A node id: the slot of the node in the AIG table.
///
/// The constant node [`NodeKind::False`] has id 0 by convention.
/// Ids are handed out densely and never reused, even after the node is freed.
pub type NodeId = usize;

/// The variant of an AIG node, carrying its fanins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The constant low/false signal.
    False,
    /// A primary input.
    Input { name: Option<String> },
    /// A primary output, driven by exactly one fanin.
    Output { fanin: AigEdge, name: Option<String> },
    /// An AND gate with two fanins.
    And { fanin0: AigEdge, fanin1: AigEdge },
    /// A node referenced as a fanin but never declared.
    Undefined,
}

/// An AIG node.
///
/// Internal note: nodes carry their fanouts with them, as `(consumer, phase)` edges.
/// Every fanin `(u -> v, inv)` must have exactly one `(u, inv)` entry in the fanouts of `v`.
/// All edge mutation goes through [`Aig`] so this stays true.
///
/// [`Aig`]: crate::Aig
#[derive(Debug, Clone)]
pub struct AigNode {
    id: NodeId,
    kind: NodeKind,
    pub(super) fanouts: Vec<AigEdge>,
    pub(crate) signature: u64,
    pub(crate) fec_group: Option<usize>,
    /// Generation of the last walk that reached this node.
    pub(super) stamp: u64,
}

impl AigNode {
    pub(super) fn new(id: NodeId, kind: NodeKind) -> Self {
        AigNode {
            id,
            kind,
            fanouts: Vec::new(),
            signature: 0,
            fec_group: None,
            stamp: 0,
        }
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_false(&self) -> bool {
        matches!(self.kind, NodeKind::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self.kind, NodeKind::And { .. })
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.kind, NodeKind::Undefined)
    }

    /// Symbolic name of an input or an output, if any.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Input { name } | NodeKind::Output { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match &self.kind {
            NodeKind::Output { fanin, .. } => vec![*fanin],
            NodeKind::And { fanin0, fanin1 } => vec![*fanin0, *fanin1],
            _ => vec![],
        }
    }

    /// The fanouts as `(consumer, phase)` edges, in no particular order.
    pub fn get_fanouts(&self) -> &[AigEdge] {
        &self.fanouts
    }

    /// Current simulation word (one bit per simulated vector).
    pub fn signature(&self) -> u64 {
        self.signature
    }

    /// Index of the candidate equivalence class the node belongs to, if any.
    pub fn fec_group(&self) -> Option<usize> {
        self.fec_group
    }

    pub(super) fn add_fanout(&mut self, fanout: AigEdge) {
        self.fanouts.push(fanout);
    }

    /// Removes one entry matching `fanout`. Returns false if there was none.
    pub(super) fn remove_fanout(&mut self, fanout: AigEdge) -> bool {
        match self.fanouts.iter().position(|f| *f == fanout) {
            Some(pos) => {
                self.fanouts.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Overwrites the first fanin slot equal to `old` with `new`.
    /// Returns false (and leaves the node untouched) if no slot matches.
    pub(super) fn replace_fanin(&mut self, old: AigEdge, new: AigEdge) -> bool {
        match &mut self.kind {
            NodeKind::And { fanin0, fanin1 } => {
                if *fanin0 == old {
                    *fanin0 = new;
                    true
                } else if *fanin1 == old {
                    *fanin1 = new;
                    true
                } else {
                    false
                }
            }
            NodeKind::Output { fanin, .. } => {
                if *fanin == old {
                    *fanin = new;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}
