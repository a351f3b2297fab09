//! The SAT collaborator: an incremental CNF solver queried under assumptions.
//!
//! The engine only relies on the [`SatSolver`] trait. [`VarisatSolver`] is the default
//! implementation, backed by the pure Rust [varisat](https://docs.rs/varisat) solver,
//! which supports incrementality via assume/solve and add_clause.

use varisat::ExtendFormula;

use crate::cnf::{Lit, Var};

/// A complete assignment returned by a satisfiable call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn new(values: Vec<bool>) -> Self {
        Model { values }
    }

    /// Value of the variable, [`None`] if the solver did not know it.
    pub fn value(&self, var: Var) -> Option<bool> {
        self.values.get(var.index()).copied()
    }

    /// Value of the literal, [`None`] if the solver did not know its variable.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.value(lit.var()).map(|v| v ^ lit.is_negated())
    }
}

/// Outcome of a solver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// The formula is satisfiable under the assumptions.
    Sat(Model),
    /// The formula is unsatisfiable under the assumptions.
    Unsat,
    /// The solver gave up (budget exhausted, interrupted, ...). No model is kept.
    Unknown,
}

/// An incremental SAT solver.
pub trait SatSolver {
    /// Allocates a fresh variable.
    fn new_var(&mut self) -> Var;

    /// Adds a clause permanently.
    fn add_clause(&mut self, clause: &[Lit]);

    /// Solves the formula, with the given literals assumed true for this call only.
    fn solve(&mut self, assumptions: &[Lit]) -> SatResult;

    /// Sets the conflict budget of each subsequent [`solve`] call.
    /// Solvers without such a budget can ignore it.
    ///
    /// [`solve`]: SatSolver::solve
    fn set_conflict_limit(&mut self, _limit: Option<u64>) {}
}

/// [`SatSolver`] implementation based on varisat.
///
/// varisat has no conflict budget: the limit is recorded but every call runs to completion.
/// Solver errors are reported as [`SatResult::Unknown`].
pub struct VarisatSolver<'a> {
    solver: varisat::Solver<'a>,
    conflict_limit: Option<u64>,
}

impl<'a> VarisatSolver<'a> {
    pub fn new() -> Self {
        VarisatSolver {
            solver: varisat::Solver::new(),
            conflict_limit: None,
        }
    }

    pub fn get_conflict_limit(&self) -> Option<u64> {
        self.conflict_limit
    }
}

impl<'a> Default for VarisatSolver<'a> {
    fn default() -> Self {
        Self::new()
    }
}

fn to_varisat(lit: Lit) -> varisat::Lit {
    varisat::Lit::from_dimacs(lit.to_dimacs() as isize)
}

impl<'a> SatSolver for VarisatSolver<'a> {
    fn new_var(&mut self) -> Var {
        Var::from_index(self.solver.new_var().index())
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        let clause: Vec<varisat::Lit> = clause.iter().copied().map(to_varisat).collect();
        self.solver.add_clause(&clause);
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SatResult {
        let assumptions: Vec<varisat::Lit> =
            assumptions.iter().copied().map(to_varisat).collect();
        self.solver.assume(&assumptions);
        match self.solver.solve() {
            Ok(false) => SatResult::Unsat,
            Ok(true) => match self.solver.model() {
                Some(lits) => {
                    let mut values = vec![false; lits.len()];
                    for lit in lits {
                        let index = lit.var().index();
                        if index >= values.len() {
                            values.resize(index + 1, false);
                        }
                        values[index] = lit.is_positive();
                    }
                    SatResult::Sat(Model::new(values))
                }
                None => SatResult::Unknown,
            },
            Err(e) => {
                log::warn!("varisat gave up: {:?}", e);
                SatResult::Unknown
            }
        }
    }

    fn set_conflict_limit(&mut self, limit: Option<u64>) {
        self.conflict_limit = limit;
    }
}
