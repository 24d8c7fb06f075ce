//! Functional reduction: proves FEC candidates equivalent with a SAT oracle and merges them.
//!
//! Each outer iteration encodes the reachable graph once, then walks the FEC groups in
//! index order. Within a group every member is checked against a running representative
//! (the constant node if the group holds it, otherwise the earliest member in topological
//! order):
//! - UNSAT: the two nodes are equivalent, the merge is queued;
//! - SAT: the model is a counterexample, packed as one more simulation lane.
//!
//! Once `sat_batch_size` counterexamples are collected, or every group has been scanned,
//! queued merges are applied and the counterexamples are simulated to split the groups.
//! The loop stops when no group is left.

use crate::{
    Aig, AigError, FraigConfig, NodeId, NodeKind, Result,
    sat::{SatOracle, SatVar, VarisatOracle},
    sim::LANES,
};

/// What a [`Aig::fraig`] run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FraigReport {
    /// Nodes merged into an equivalent one and freed.
    pub merged: usize,
    /// SAT queries issued.
    pub sat_queries: usize,
    /// Queries answered UNSAT (equivalence proved).
    pub proved: usize,
    /// Queries answered SAT (one simulation lane each).
    pub counterexamples: usize,
    /// Outer iterations, i.e. number of proof models built.
    pub iterations: usize,
    /// Random patterns simulated before the first iteration.
    pub random_patterns: usize,
}

impl std::fmt::Display for FraigReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} merged, {} SAT queries ({} proved, {} counterexamples), {} iteration(s)",
            self.merged, self.sat_queries, self.proved, self.counterexamples, self.iterations
        )
    }
}

impl Aig {
    /// [`Aig::fraig`] with a fresh [`VarisatOracle`] per iteration.
    pub fn fraig_default(&mut self, config: &FraigConfig) -> Result<FraigReport> {
        self.fraig(config, VarisatOracle::new)
    }

    /// Merges every pair of reachable nodes that compute the same function, possibly up
    /// to an inverter, until no FEC candidate is left.
    ///
    /// `make_oracle` is called once per outer iteration. If no simulation happened yet,
    /// [`Aig::random_sim`] runs first. Output functions are preserved.
    pub fn fraig<O: SatOracle>(
        &mut self,
        config: &FraigConfig,
        mut make_oracle: impl FnMut() -> O,
    ) -> Result<FraigReport> {
        let before = self.stats();
        let mut report = FraigReport::default();
        if !self.fec.is_initialized() {
            report.random_patterns = self.random_sim(config);
        }

        let batch = config.batch_size();
        let mut order = self.walk_from_outputs();
        self.prune_fec(&order);

        while !self.fec.is_empty() {
            report.iterations += 1;
            let mut oracle = make_oracle();
            let vars = self.build_proof_model(&mut oracle, &order);

            let mut pending: Vec<(NodeId, NodeId, bool)> = Vec::new();
            let mut patterns = vec![0u64; self.inputs().len()];
            let mut cex = 0;

            'groups: for group in self.fec.groups() {
                // Members are in topological order, the constant node first.
                let has_zero = group[0] == 0;
                let mut repr = group[0];
                for &g in group {
                    if g == repr {
                        continue;
                    }
                    let phase = self.node(repr).signature != self.node(g).signature;
                    let diff = oracle.new_variable();
                    let (r_var, g_var) = (var_of(&vars, repr)?, var_of(&vars, g)?);
                    oracle.encode_xor(diff, r_var, false, g_var, phase);
                    oracle.clear_assumptions();
                    oracle.assume_literal(diff, true);
                    report.sat_queries += 1;

                    if oracle.solve_under_assumptions()? {
                        log::trace!("fraig: {} vs {}{}: SAT", repr, bang(phase), g);
                        for (i, &input) in self.inputs().iter().enumerate() {
                            if oracle.get_value(var_of(&vars, input)?) {
                                patterns[i] |= 1u64 << cex;
                            }
                        }
                        cex += 1;
                        report.counterexamples += 1;
                        // Later members get compared with the refuted one.
                        if !has_zero {
                            repr = g;
                        }
                        if cex == batch {
                            break 'groups;
                        }
                    } else {
                        log::trace!("fraig: {} vs {}{}: UNSAT", repr, bang(phase), g);
                        report.proved += 1;
                        pending.push((repr, g, phase));
                    }
                }
            }
            drop(oracle);

            if pending.is_empty() && cex == 0 {
                return Err(AigError::InvalidState(format!(
                    "fraig iteration {} neither merged nor refuted anything",
                    report.iterations
                )));
            }

            if !pending.is_empty() {
                report.merged += pending.len();
                for (repr, g, phase) in pending {
                    self.merge(repr, g, phase);
                    self.remove_node(g);
                    log::debug!("fraig: {} merging {}{}", repr, bang(phase), g);
                }
                order = self.walk_from_outputs();
                self.simulate(&order);
                self.refine_fec();
                self.prune_fec(&order);
            }

            if cex > 0 {
                // Lanes past the counterexamples keep the previous vectors, on which every
                // refuted pair agreed with its claimed phase.
                let mask = if cex == LANES { !0 } else { (1u64 << cex) - 1 };
                let words: Vec<u64> = self
                    .inputs()
                    .iter()
                    .zip(&patterns)
                    .map(|(&input, &p)| (p & mask) | (self.node(input).signature & !mask))
                    .collect();
                self.set_input_words(&words);
                self.simulate(&order);
                self.refine_fec();
                self.prune_fec(&order);
            }
            log::debug!(
                "fraig: iteration {} done, #FEC group = {}",
                report.iterations,
                self.fec.len()
            );
        }

        log::info!("fraig: {} -> {} ({})", before, self.stats(), report);
        Ok(report)
    }

    /// One variable for the constant node (forced to false), one per input and one per
    /// and gate of `order`. Undefined fanins read the constant variable.
    fn build_proof_model<O: SatOracle>(
        &self,
        oracle: &mut O,
        order: &[NodeId],
    ) -> Vec<Option<SatVar>> {
        let mut vars = vec![None; self.node_count()];
        let zero = oracle.new_variable();
        oracle.assert_permanent(zero, false);
        vars[0] = Some(zero);
        for &input in self.inputs() {
            vars[input] = Some(oracle.new_variable());
        }

        for &id in order {
            let NodeKind::And { fanin0, fanin1 } = *self.node(id).kind() else {
                continue;
            };
            let in0 = vars[fanin0.node].unwrap_or(zero);
            let in1 = vars[fanin1.node].unwrap_or(zero);
            let out = oracle.new_variable();
            oracle.encode_and(out, in0, fanin0.complement, in1, fanin1.complement);
            vars[id] = Some(out);
        }
        vars
    }

    /// Keeps the live, reachable FEC members, and orders them topologically: the constant
    /// node first, then `order`.
    fn prune_fec(&mut self, order: &[NodeId]) {
        let mut rank = vec![usize::MAX; self.node_count()];
        rank[0] = 0;
        for (i, &id) in order.iter().enumerate() {
            if id != 0 {
                rank[id] = i + 1;
            }
        }
        self.fec.retain(|id| rank[id] != usize::MAX);
        self.fec.normalize();
        self.fec.sort_members_by_key(|id| rank[id]);
        self.assign_fec_indices();
    }
}

fn var_of(vars: &[Option<SatVar>], id: NodeId) -> Result<SatVar> {
    vars.get(id)
        .copied()
        .flatten()
        .ok_or_else(|| AigError::InvalidState(format!("node {} has no SAT variable", id)))
}

fn bang(phase: bool) -> &'static str {
    if phase { "!" } else { "" }
}
