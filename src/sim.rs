//! Bit-parallel simulation.
//!
//! Every node carries a 64-bit word: bit `k` is the value of the node under the `k`-th
//! simulated input vector. Inputs are loaded with one word each, then words are
//! propagated in topological order.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{Aig, AigError, FraigConfig, NodeId, NodeKind, Result};

/// Number of lanes in a simulation word.
pub const LANES: usize = 64;

impl Aig {
    /// Loads one word per primary input, in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if `words` does not hold exactly one word per input.
    pub(crate) fn set_input_words(&mut self, words: &[u64]) {
        assert_eq!(words.len(), self.inputs().len());
        for (i, &word) in words.iter().enumerate() {
            let id = self.inputs()[i];
            self.node_mut(id).signature = word;
        }
    }

    /// Propagates the input words along `order`, which must be topological
    /// (see [`Aig::walk_from_outputs`]).
    ///
    /// And gates and outputs get a fresh word. Inputs keep theirs, the constant and
    /// undefined nodes always read 0.
    pub fn simulate(&mut self, order: &[NodeId]) {
        for &id in order {
            let word = match self.node(id).kind() {
                NodeKind::And { fanin0, fanin1 } => {
                    fanin0.apply(self.node(fanin0.node).signature)
                        & fanin1.apply(self.node(fanin1.node).signature)
                }
                NodeKind::Output { fanin, .. } => fanin.apply(self.node(fanin.node).signature),
                _ => continue,
            };
            self.node_mut(id).signature = word;
        }
    }

    /// Simulates one externally supplied batch and refines the FEC groups with it.
    ///
    /// `words[i]` holds the values of input `i`, one bit per vector, and only the
    /// `lanes` low bits are meaningful. A batch of 0 lanes does nothing.
    pub fn apply_simulation_batch(&mut self, words: &[u64], lanes: usize) -> Result<()> {
        if words.len() != self.inputs().len() {
            return Err(AigError::PatternWidth {
                expected: self.inputs().len(),
                got: words.len(),
            });
        }
        if lanes > LANES {
            return Err(AigError::TooManyLanes(lanes));
        }
        if lanes == 0 {
            return Ok(());
        }

        let mask = if lanes == LANES { !0 } else { (1u64 << lanes) - 1 };
        let masked: Vec<u64> = words.iter().map(|w| w & mask).collect();

        let order = self.walk_from_outputs();
        if self.fec.is_initialized() {
            self.retain_live_fec();
        } else {
            self.init_fec(&order);
        }
        self.set_input_words(&masked);
        self.simulate(&order);
        self.refine_fec();
        self.fec.normalize();
        self.assign_fec_indices();
        log::info!(
            "simulated {} pattern(s), total #FEC group = {}",
            lanes,
            self.fec.len()
        );
        Ok(())
    }

    /// Random simulation with a generator seeded from `config`.
    ///
    /// See [`Aig::random_sim_with_rng`].
    pub fn random_sim(&mut self, config: &FraigConfig) -> usize {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        self.random_sim_with_rng(config, &mut rng)
    }

    /// Simulates random 64-vector batches until the FEC groups stop splitting.
    ///
    /// Stops as soon as no group is left, or after
    /// `floor(stagnation_factor * ln(reachable + 1))` batches in a row without any split.
    /// Returns the number of simulated patterns.
    pub fn random_sim_with_rng(&mut self, config: &FraigConfig, rng: &mut impl Rng) -> usize {
        let order = self.walk_from_outputs();
        if self.fec.is_initialized() {
            self.retain_live_fec();
        } else {
            self.init_fec(&order);
        }

        let limit = config.stagnation_limit(order.len());
        let n_inputs = self.inputs().len();
        let mut stagnant = 0;
        let mut batches = 0;

        while stagnant < limit && !self.fec.is_empty() {
            batches += 1;
            let before = (self.fec.len(), self.fec.candidate_count());

            let words: Vec<u64> = (0..n_inputs).map(|_| rng.r#gen::<u64>()).collect();
            self.set_input_words(&words);
            self.simulate(&order);
            self.refine_fec();
            log::debug!("random_sim: batch {}, #FEC group = {}", batches, self.fec.len());

            if (self.fec.len(), self.fec.candidate_count()) == before {
                stagnant += 1;
            } else {
                stagnant = 0;
            }
        }

        self.fec.normalize();
        self.assign_fec_indices();
        log::info!(
            "{} patterns simulated, total #FEC group = {}",
            batches * LANES,
            self.fec.len()
        );
        batches * LANES
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{Aig, AigEdge, AigError, FraigConfig};

    fn e(node: usize, complement: bool) -> AigEdge {
        AigEdge::new(node, complement)
    }

    #[test]
    fn truth_table() {
        // o1 = a & !b, o2 = !(a & !b) & c, o3 = constant one
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        let b = aig.add_input(None);
        let c = aig.add_input(None);
        let g1 = aig.add_and(e(a, false), e(b, true)).unwrap();
        let g2 = aig.add_and(e(g1, true), e(c, false)).unwrap();
        aig.add_output(e(g1, false), None).unwrap();
        aig.add_output(e(g2, false), None).unwrap();
        aig.add_output(e(0, true), None).unwrap();

        let order = aig.walk_from_outputs();
        aig.set_input_words(&[0b1010_1010, 0b1100_1100, 0b1111_0000]);
        aig.simulate(&order);
        let sigs = aig.output_signatures();
        assert_eq!(sigs[0], 0b1010_1010 & !0b1100_1100);
        assert_eq!(sigs[1], !(0b1010_1010u64 & !0b1100_1100) & 0b1111_0000);
        assert_eq!(sigs[2], !0);
        assert_eq!(aig.get_node(0).unwrap().signature(), 0);
    }

    #[test]
    fn batch_validation() {
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        aig.add_input(None);
        aig.add_output(e(a, false), None).unwrap();
        assert!(matches!(
            aig.apply_simulation_batch(&[0], 1),
            Err(AigError::PatternWidth {
                expected: 2,
                got: 1
            })
        ));
        assert!(matches!(
            aig.apply_simulation_batch(&[0, 0], 65),
            Err(AigError::TooManyLanes(65))
        ));
        aig.apply_simulation_batch(&[0, 0], 0).unwrap();
        assert!(!aig.fec.is_initialized());
    }

    #[test]
    fn batch_splits_groups() {
        // g1 = a & b, g2 = b & a, g3 = !a & !b (= !(a | b)), g4 = a & !a
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        let b = aig.add_input(None);
        let g1 = aig.add_and(e(a, false), e(b, false)).unwrap();
        let g2 = aig.add_and(e(b, false), e(a, false)).unwrap();
        let g3 = aig.add_and(e(a, true), e(b, true)).unwrap();
        let g4 = aig.add_and(e(a, false), e(a, true)).unwrap();
        for g in [g1, g2, g3, g4] {
            aig.add_output(e(g, false), None).unwrap();
        }

        // Vector a=1, b=1, plus the all-zero vector in the unused lanes:
        // g3 reads the complement of g1.
        aig.apply_simulation_batch(&[1, 1], 1).unwrap();
        assert_eq!(aig.fec_groups(), &[vec![0, g4], vec![g1, g2, g3]]);

        // All four vectors: g3 is told apart.
        aig.apply_simulation_batch(&[0b0101, 0b0011], 4).unwrap();
        assert_eq!(aig.fec_groups(), &[vec![0, g4], vec![g1, g2]]);
        assert_eq!(aig.get_node(g4).unwrap().fec_group(), Some(0));
        assert_eq!(aig.get_node(g2).unwrap().fec_group(), Some(1));
        assert_eq!(aig.get_node(g3).unwrap().fec_group(), None);
    }

    #[test]
    fn random_sim_converges() {
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        let b = aig.add_input(None);
        let c = aig.add_input(None);
        let g1 = aig.add_and(e(a, false), e(b, false)).unwrap();
        let g2 = aig.add_and(e(b, false), e(a, false)).unwrap();
        let g3 = aig.add_and(e(g1, false), e(c, false)).unwrap();
        let g4 = aig.add_and(e(a, true), e(c, true)).unwrap();
        let g5 = aig.add_and(e(g4, false), e(a, false)).unwrap();
        for g in [g2, g3, g5] {
            aig.add_output(e(g, false), None).unwrap();
        }

        let patterns = aig.random_sim(&FraigConfig::default());
        assert!(patterns > 0);
        assert_eq!(patterns % 64, 0);
        assert_eq!(aig.fec_groups(), &[vec![0, g5], vec![g1, g2]]);
        assert_eq!(aig.get_node(g3).unwrap().fec_group(), None);
    }

    #[test]
    fn freed_nodes_leave_the_groups() {
        // g3 = AND(g2, 1) and g4 = AND(g1, 1) are simplified away after the first simulation.
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        let b = aig.add_input(None);
        let g1 = aig.add_and(e(a, false), e(b, false)).unwrap();
        let g2 = aig.add_and(e(b, false), e(a, false)).unwrap();
        let g3 = aig.add_and(e(g2, false), e(0, true)).unwrap();
        let g4 = aig.add_and(e(g1, false), e(0, true)).unwrap();
        aig.add_output(e(g3, false), None).unwrap();
        aig.add_output(e(g4, false), None).unwrap();

        aig.random_sim(&FraigConfig::default());
        assert_eq!(aig.fec_groups(), &[vec![g1, g2, g3, g4]]);

        assert_eq!(aig.optimize(), 2);
        aig.apply_simulation_batch(&[0b1100, 0b1010], 4).unwrap();
        for group in aig.fec_groups() {
            for &id in group {
                assert!(aig.get_node(id).is_some(), "freed node {} in a group", id);
            }
        }
        assert_eq!(aig.fec_groups(), &[vec![g1, g2]]);

        aig.random_sim(&FraigConfig::default());
        assert_eq!(aig.fec_groups(), &[vec![g1, g2]]);
    }

    #[test]
    fn unreachable_nodes_leave_the_groups() {
        // g1, g2, g3 and n = AND(g1, a) all compute a & b.
        let mut aig = Aig::new();
        let a = aig.add_input(None);
        let b = aig.add_input(None);
        let g1 = aig.add_and(e(a, false), e(b, false)).unwrap();
        let g2 = aig.add_and(e(b, false), e(a, false)).unwrap();
        let g3 = aig.add_and(e(a, false), e(b, false)).unwrap();
        let n = aig.add_and(e(g1, false), e(a, false)).unwrap();
        aig.add_output(e(n, false), None).unwrap();
        aig.add_output(e(g2, false), None).unwrap();
        aig.add_output(e(g3, false), None).unwrap();
        aig.apply_simulation_batch(&[0b1100, 0b1010], 4).unwrap();
        assert_eq!(aig.fec_groups(), &[vec![g1, g2, g3, n]]);

        // g1 only fed n: it stays in the table but is no longer reachable.
        aig.merge(g2, n, false);
        aig.remove_node(n);
        assert!(aig.get_node(g1).unwrap().get_fanouts().is_empty());
        aig.apply_simulation_batch(&[0b1100, 0b1010], 4).unwrap();
        assert_eq!(aig.fec_groups(), &[vec![g2, g3]]);
        assert_eq!(aig.get_node(g1).unwrap().fec_group(), None);
    }
}
