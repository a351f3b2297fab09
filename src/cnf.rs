//! Lazy Tseitin translation of the graph into the SAT collaborator.
//!
//! Each node gets a SAT variable the first time it is needed. The clauses of an AND gate
//! `z = a & b` are emitted once per session, the first time a query involves its fanin cone:
//! - `(a | !z)`
//! - `(b | !z)`
//! - `(!a | !b | z)`
//!
//! Input nodes only generate a variable, they do not induce any clause.
//! The constants never reach the solver, they are simplified away when building nodes.

use std::ops::Not;

use crate::{FraigHandle, FraigNode, NodeId, NodeKind, dfs::Dfs, sat::SatSolver};

/// A SAT variable, indexed from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(usize);

impl Var {
    pub fn from_index(index: usize) -> Self {
        Var(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A SAT literal, stored in DIMACS format (never 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<i64> for Lit {
    fn from(value: i64) -> Self {
        if value == 0 {
            panic!("Tried to create a Lit from 0. 0 is not a valid literal in DIMACS format.");
        }
        Lit(value)
    }
}

impl Lit {
    pub fn new(var: Var, negated: bool) -> Self {
        let lit = Lit(var.0 as i64 + 1);
        if negated { !lit } else { lit }
    }

    pub fn positive(var: Var) -> Self {
        Lit::new(var, false)
    }

    pub fn negative(var: Var) -> Self {
        Lit::new(var, true)
    }

    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs() as usize - 1)
    }

    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub fn to_dimacs(self) -> i64 {
        self.0
    }
}

/// A SAT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(Vec<Lit>);

impl From<Vec<Lit>> for Clause {
    fn from(value: Vec<Lit>) -> Self {
        Clause(value)
    }
}

impl Clause {
    pub fn lits(&self) -> &[Lit] {
        &self.0
    }
}

/// Returns the three clauses encoding `z = a & b`.
pub fn and_clauses(a: Lit, b: Lit, z: Lit) -> [Clause; 3] {
    [
        Clause(vec![a, !z]),
        Clause(vec![b, !z]),
        Clause(vec![!a, !b, z]),
    ]
}

/// Remembers which nodes already live in the solver.
///
/// Invariant: whenever a node is marked as encoded, its whole fanin cone is encoded too.
#[derive(Debug, Default)]
pub struct CnfEncoder {
    vars: Vec<Option<Var>>,
    encoded: Vec<bool>,
    clause_count: usize,
}

impl CnfEncoder {
    pub fn new() -> Self {
        CnfEncoder::default()
    }

    /// The variable of the node, if it has been given one already.
    pub fn var_of(&self, id: NodeId) -> Option<Var> {
        self.vars.get(id).copied().flatten()
    }

    pub fn is_encoded(&self, id: NodeId) -> bool {
        self.encoded.get(id).copied().unwrap_or(false)
    }

    /// Number of clauses emitted so far for the gates.
    pub fn get_clause_count(&self) -> usize {
        self.clause_count
    }

    fn var(&mut self, id: NodeId, solver: &mut impl SatSolver) -> Var {
        if self.vars.len() <= id {
            self.vars.resize(id + 1, None);
        }
        match self.vars[id] {
            Some(var) => var,
            None => {
                let var = solver.new_var();
                self.vars[id] = Some(var);
                var
            }
        }
    }

    /// The literal of a node given with its polarity.
    pub fn lit(&mut self, id: NodeId, complement: bool, solver: &mut impl SatSolver) -> Lit {
        Lit::new(self.var(id, solver), complement)
    }

    /// The literal of a non constant handle.
    pub fn handle_lit(&mut self, handle: FraigHandle, solver: &mut impl SatSolver) -> Lit {
        let id = handle
            .get_node_id()
            .expect("constants have no SAT literal, they must be simplified beforehand");
        self.lit(id, handle.get_complement(), solver)
    }

    /// Emits the clauses of every gate in the fanin cones of `roots` not encoded yet.
    /// Returns the number of gates that were newly encoded.
    pub fn encode_cones(
        &mut self,
        nodes: &[FraigNode],
        roots: impl IntoIterator<Item = NodeId>,
        solver: &mut impl SatSolver,
    ) -> usize {
        if self.encoded.len() < nodes.len() {
            self.encoded.resize(nodes.len(), false);
        }

        let mut to_encode = Vec::new();
        let mut dfs = Dfs::from_nodes(roots);
        while let Some(id) = dfs.next_filtered(nodes, |id| !self.encoded[id]) {
            to_encode.push(id);
        }

        for &id in &to_encode {
            self.encoded[id] = true;
            if let NodeKind::And { fanin0, fanin1 } = nodes[id].get_kind() {
                let z = self.lit(id, false, solver);
                let a = self.handle_lit(fanin0, solver);
                let b = self.handle_lit(fanin1, solver);
                for clause in and_clauses(a, b, z) {
                    solver.add_clause(clause.lits());
                    self.clause_count += 1;
                }
            }
        }

        to_encode.len()
    }
}
