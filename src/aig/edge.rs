//! An [`AigEdge`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! Edges are used in both directions: as the fanin of a node (pointing at its driver)
//! and as a fanout entry (pointing at a consumer, carrying the phase of the consumer's fanin).
//!
//! [`AigNode`]: crate::AigNode

use std::ops::Not;

use crate::NodeId;

/// A signed edge: a node identity plus an inversion flag.
///
/// Equality is exact, both the target and the flag must match.
///
/// ```rust
/// use aigreduce::AigEdge;
/// let e = AigEdge::new(3, false);
/// assert_eq!(e, !AigEdge::new(3, true));
/// assert!(e.is_complement_of(&!e));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AigEdge {
    /// The node the edge is refering to.
    pub(crate) node: NodeId,
    /// Set to true if signal should be inverted.
    pub(crate) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl AigEdge {
    pub fn new(node: NodeId, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    /// The constant-one signal (complemented edge to the constant-zero node).
    pub fn cst_true() -> Self {
        AigEdge::new(0, true)
    }

    pub fn cst_false() -> Self {
        AigEdge::new(0, false)
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    /// Points at `node` instead, keeping the phase (flipped if `invert` is set).
    pub fn with_node(&self, node: NodeId, invert: bool) -> Self {
        AigEdge::new(node, self.complement ^ invert)
    }

    pub fn is_cst_false(&self) -> bool {
        self.node == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.node == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }

    /// Applies the edge phase to a packed simulation word.
    pub fn apply(&self, word: u64) -> u64 {
        if self.complement { !word } else { word }
    }
}
