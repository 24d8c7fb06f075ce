//! The narrow SAT interface used by the fraig loop.
//!
//! The loop only needs variables, AND/XOR gate encodings, unit clauses, assumptions and
//! a model readout. [`SatOracle`] captures exactly that; [`VarisatOracle`] implements it
//! on top of the incremental `varisat` solver.

use std::{collections::HashSet, ops::Not};

use varisat::ExtendFormula;

use crate::{AigError, Result};

/// A boolean variable of a [`SatOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SatVar(pub usize);

impl SatVar {
    /// The literal that is true when the variable takes `value`.
    pub fn lit(self, value: bool) -> SatLit {
        SatLit {
            var: self,
            negated: !value,
        }
    }

    pub fn positive(self) -> SatLit {
        self.lit(true)
    }
}

/// A possibly negated [`SatVar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatLit {
    pub var: SatVar,
    pub negated: bool,
}

impl Not for SatLit {
    type Output = Self;

    fn not(self) -> Self::Output {
        SatLit {
            var: self.var,
            negated: !self.negated,
        }
    }
}

/// An incremental SAT solver, seen through the operations the fraig loop needs.
///
/// Implementors provide clause insertion, assumptions, solving and model readout;
/// gate encodings and unit clauses come for free.
pub trait SatOracle {
    /// Allocates a fresh variable.
    fn new_variable(&mut self) -> SatVar;

    /// Adds a permanent clause (a disjunction of literals).
    fn add_clause(&mut self, clause: &[SatLit]);

    /// Drops every assumption.
    fn clear_assumptions(&mut self);

    /// Assumes `var = value` for the next solve calls, until [`clear_assumptions`].
    ///
    /// [`clear_assumptions`]: SatOracle::clear_assumptions
    fn assume_literal(&mut self, var: SatVar, value: bool);

    /// Solves the clauses under the current assumptions. `Ok(true)` means SAT.
    fn solve_under_assumptions(&mut self) -> Result<bool>;

    /// Value of `var` in the model of the last solve. Only meaningful after a SAT result.
    fn get_value(&self, var: SatVar) -> bool;

    /// `out = (in0 ^ inv0) & (in1 ^ inv1)`
    fn encode_and(&mut self, out: SatVar, in0: SatVar, inv0: bool, in1: SatVar, inv1: bool) {
        let out = out.positive();
        let a = in0.lit(!inv0);
        let b = in1.lit(!inv1);
        self.add_clause(&[!a, !b, out]);
        self.add_clause(&[a, !out]);
        self.add_clause(&[b, !out]);
    }

    /// `out = (in0 ^ inv0) ^ (in1 ^ inv1)`
    fn encode_xor(&mut self, out: SatVar, in0: SatVar, inv0: bool, in1: SatVar, inv1: bool) {
        let out = out.positive();
        let a = in0.lit(!inv0);
        let b = in1.lit(!inv1);
        self.add_clause(&[!a, !b, !out]);
        self.add_clause(&[a, b, !out]);
        self.add_clause(&[a, !b, out]);
        self.add_clause(&[!a, b, out]);
    }

    /// Forces `var = value` in every later solve.
    fn assert_permanent(&mut self, var: SatVar, value: bool) {
        self.add_clause(&[var.lit(value)]);
    }
}

/// [`SatOracle`] backed by `varisat`.
pub struct VarisatOracle {
    solver: varisat::Solver<'static>,
    lits: Vec<varisat::Lit>,
    assumptions: Vec<varisat::Lit>,
    model: Option<HashSet<varisat::Lit>>,
}

impl Default for VarisatOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle {
            solver: varisat::Solver::new(),
            lits: Vec::new(),
            assumptions: Vec::new(),
            model: None,
        }
    }

    /// Number of allocated variables.
    pub fn var_count(&self) -> usize {
        self.lits.len()
    }

    fn to_varisat(&self, lit: SatLit) -> varisat::Lit {
        let l = self.lits[lit.var.0];
        if lit.negated { !l } else { l }
    }
}

impl SatOracle for VarisatOracle {
    fn new_variable(&mut self) -> SatVar {
        let lit = self.solver.new_lit();
        self.lits.push(lit);
        SatVar(self.lits.len() - 1)
    }

    fn add_clause(&mut self, clause: &[SatLit]) {
        let clause: Vec<varisat::Lit> = clause.iter().map(|&l| self.to_varisat(l)).collect();
        self.solver.add_clause(&clause);
    }

    fn clear_assumptions(&mut self) {
        self.assumptions.clear();
    }

    fn assume_literal(&mut self, var: SatVar, value: bool) {
        let lit = self.to_varisat(var.lit(value));
        self.assumptions.push(lit);
    }

    fn solve_under_assumptions(&mut self) -> Result<bool> {
        self.solver.assume(&self.assumptions);
        let sat = self
            .solver
            .solve()
            .map_err(|e| AigError::SatSolver(format!("{:?}", e)))?;
        self.model = if sat {
            self.solver.model().map(|model| model.into_iter().collect())
        } else {
            None
        };
        Ok(sat)
    }

    fn get_value(&self, var: SatVar) -> bool {
        let lit = self.lits[var.0];
        self.model.as_ref().is_some_and(|model| model.contains(&lit))
    }
}
