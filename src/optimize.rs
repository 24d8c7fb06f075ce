//! Local algebraic simplification ([`Aig::optimize`]) and dead node removal ([`Aig::sweep`]).

use crate::{Aig, AigEdge, NodeId, NodeKind};

/// What an and gate reduces to, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    /// AND(x, 0) = 0, AND(x, !x) = 0
    Zero,
    /// AND(x, x) = x, AND(x, 1) = x: merge into the edge (phase included).
    Edge(AigEdge),
}

fn rewrite(fanin0: AigEdge, fanin1: AigEdge) -> Option<Rewrite> {
    if fanin0.is_cst_false() || fanin1.is_cst_false() {
        Some(Rewrite::Zero)
    } else if fanin0 == fanin1 {
        Some(Rewrite::Edge(fanin0))
    } else if fanin0.is_complement_of(&fanin1) {
        Some(Rewrite::Zero)
    } else if fanin0.is_cst_true() {
        Some(Rewrite::Edge(fanin1))
    } else if fanin1.is_cst_true() {
        Some(Rewrite::Edge(fanin0))
    } else {
        None
    }
}

impl Aig {
    /// Simplifies reachable and gates with a constant, identical or complementary
    /// fanin, in topological order, and frees them. Returns the number of removed gates.
    ///
    /// Undefined nodes no longer used by anything are freed as well.
    pub fn optimize(&mut self) -> usize {
        let before = self.stats();
        let order = self.walk_from_outputs();
        let mut merged = 0;

        for id in order {
            let NodeKind::And { fanin0, fanin1 } = *self.node(id).kind() else {
                continue;
            };
            let Some(rw) = rewrite(fanin0, fanin1) else {
                continue;
            };
            let target = match rw {
                Rewrite::Zero => AigEdge::cst_false(),
                Rewrite::Edge(edge) => edge,
            };
            self.merge(target.node, id, target.complement);
            self.remove_node(id);
            merged += 1;
            log::debug!(
                "optimize: {} merging {}{}",
                target.node,
                if target.complement { "!" } else { "" },
                id
            );
        }

        let undefined = self.free_unused_undefined();
        log::info!(
            "optimize: {} -> {} ({} simplified, {} undefined freed)",
            before,
            self.stats(),
            merged,
            undefined
        );
        merged
    }

    /// Frees every and gate unreachable from the outputs, then every undefined node
    /// nothing refers to anymore. Returns the number of freed and gates.
    ///
    /// Works on the raw table: no walk order held by the caller is invalidated.
    pub fn sweep(&mut self) -> usize {
        let before = self.stats();
        self.mark_from_outputs();

        let dead: Vec<NodeId> = self
            .iter_nodes()
            .filter(|n| n.is_and() && !self.is_marked(n.get_id()))
            .map(|n| n.get_id())
            .collect();
        // Dead gates only feed other dead gates, so once every fanin is detached
        // none of them has a fanout left.
        for &id in &dead {
            self.detach_fanins(id);
        }
        for &id in &dead {
            self.remove_node(id);
            log::debug!("sweep: and gate {} removed", id);
        }

        let undefined = self.free_unused_undefined();
        log::info!(
            "sweep: {} -> {} ({} and gate(s), {} undefined removed)",
            before,
            self.stats(),
            dead.len(),
            undefined
        );
        dead.len()
    }

    fn free_unused_undefined(&mut self) -> usize {
        let unused: Vec<NodeId> = self
            .iter_nodes()
            .filter(|n| n.is_undefined() && n.get_fanouts().is_empty())
            .map(|n| n.get_id())
            .collect();
        for &id in &unused {
            self.remove_node(id);
            log::debug!("undefined node {} removed", id);
        }
        unused.len()
    }
}
