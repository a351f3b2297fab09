//! SAT-backed equivalence and constant checks.
//!
//! Every query goes through the same filters, cheapest first:
//! 1. representatives: equal resolved handles are equivalent, complementary ones are not,
//! 2. simulation: different signatures are never equivalent,
//! 3. SAT: the lazily encoded cones are asked for a distinguishing assignment.
//!
//! Decisive SAT answers are remembered, both in the graph (representatives or diverging
//! signatures) and in the solver (learnt clauses), so asking twice never calls SAT twice.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    Fraig, FraigHandle, NodeId, NodeStatus,
    cnf::Lit,
    pathash::signature_equal,
    sat::{SatResult, SatSolver},
    stats::FraigStats,
};

/// Outcome of an equivalence (or constant) query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquivResult {
    Equivalent,
    NotEquivalent,
    /// The SAT solver gave up. Asking again may succeed, e.g. with a larger budget.
    Unknown,
}

impl EquivResult {
    pub fn is_equivalent(self) -> bool {
        self == EquivResult::Equivalent
    }

    pub fn is_decisive(self) -> bool {
        self != EquivResult::Unknown
    }
}

impl<S: SatSolver> Fraig<S> {
    /// Decides whether two handles compute the same function of the inputs.
    ///
    /// When proven equivalent, the younger node is merged into the older one:
    /// later constructions only see the older node.
    pub fn check_equiv(&mut self, handle1: FraigHandle, handle2: FraigHandle) -> EquivResult {
        let h1 = self.resolve(handle1);
        let h2 = self.resolve(handle2);

        if h1 == h2 {
            return EquivResult::Equivalent;
        }
        if h1.is_complement_of(&h2) {
            return EquivResult::NotEquivalent;
        }

        match (h1.node, h2.node) {
            // Two different constants are complementary, already handled
            (None, None) => EquivResult::NotEquivalent,
            (None, Some(id2)) => self.check_const_node(id2, h1.complement ^ h2.complement),
            (Some(id1), None) => self.check_const_node(id1, h1.complement ^ h2.complement),
            (Some(id1), Some(id2)) => {
                let inv = h1.complement ^ h2.complement;
                let (old, young) = if id1 < id2 { (id1, id2) } else { (id2, id1) };
                self.check_equiv_nodes(old, young, inv)
            }
        }
    }

    /// Decides whether a handle always evaluates to `value`.
    ///
    /// ```rust
    /// use fraig::{EquivResult, Fraig};
    /// let mut fraig = Fraig::new();
    /// let a = fraig.make_input();
    /// let b = fraig.make_input();
    /// let ab = fraig.make_and(a, b);
    /// let f = fraig.make_and(ab, !a);
    /// assert_eq!(fraig.check_const(f, false), EquivResult::Equivalent);
    /// assert!(fraig.resolve(f).is_zero());
    /// assert_eq!(fraig.check_const(ab, true), EquivResult::NotEquivalent);
    /// ```
    pub fn check_const(&mut self, handle: FraigHandle, value: bool) -> EquivResult {
        let h = self.resolve(handle);
        match h.node {
            None => {
                if h == FraigHandle::constant(value) {
                    EquivResult::Equivalent
                } else {
                    EquivResult::NotEquivalent
                }
            }
            Some(id) => self.check_const_node(id, value ^ h.complement),
        }
    }

    /// Reduction status of the node behind a handle.
    pub fn status(&self, handle: FraigHandle) -> Option<NodeStatus> {
        handle.node.map(|id| self.nodes[id].get_status())
    }

    /// Snapshot of the session statistics.
    pub fn get_stats(&self) -> FraigStats {
        let mut stats = self.stats.clone();
        stats.node_num = self.nodes.len();
        stats.input_num = self.inputs.len();
        stats.and_num = self.nodes.len() - self.inputs.len();
        stats.clauses = self.cnf.get_clause_count();
        stats.sig_words = self.sim.get_words();
        stats
    }

    /// Human readable dump of the session statistics.
    pub fn dump_stats(&self, w: &mut impl std::io::Write) -> std::io::Result<()> {
        self.get_stats().dump(w)
    }

    /// Dumps the equivalence groups, one line per group: the representative first,
    /// then the nodes merged into it (`~` when merged complemented).
    ///
    /// Nodes proven constant are grouped under `ZERO`. Unmerged nodes whose signature
    /// is still constant are listed too, marked `C0?` or `C1?`.
    pub fn dump_eqgroup(&self, w: &mut impl std::io::Write) -> std::io::Result<()> {
        let mut groups: Vec<Vec<FraigHandle>> = vec![Vec::new(); self.nodes.len()];
        let mut constants = Vec::new();
        for node in &self.nodes {
            if node.get_rep().is_none() {
                continue;
            }
            let rep = self.resolve(FraigHandle::new(node.get_id(), false));
            let member = FraigHandle::new(node.get_id(), rep.complement);
            match rep.node {
                Some(rep_id) => groups[rep_id].push(member),
                None => constants.push(member),
            }
        }

        let mut write_group = |marker: &str, rep: FraigHandle, members: &[FraigHandle]| {
            write!(w, "{} {{ {}", marker, rep)?;
            for member in members {
                write!(w, " {}", member)?;
            }
            writeln!(w, " }}")
        };

        if !constants.is_empty() {
            write_group("   ", FraigHandle::zero(), &constants)?;
        }
        for (id, members) in groups.iter().enumerate() {
            let node = &self.nodes[id];
            if node.get_rep().is_some() {
                continue;
            }
            let marker = if !node.has_one() {
                "C0?"
            } else if !node.has_zero() {
                "C1?"
            } else if members.is_empty() {
                continue;
            } else {
                "   "
            };
            write_group(marker, FraigHandle::new(id, false), members)?;
        }
        Ok(())
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SatResult {
        self.stats.sat_calls += 1;
        self.solver.solve(assumptions)
    }

    /// Is node `id` constantly equal to `value`?
    pub(crate) fn check_const_node(&mut self, id: NodeId, value: bool) -> EquivResult {
        let node = &self.nodes[id];
        if (value && node.has_zero()) || (!value && node.has_one()) {
            return EquivResult::NotEquivalent;
        }
        if node.status == NodeStatus::Unclassified {
            self.nodes[id].status = NodeStatus::Candidate;
        }

        let start = Instant::now();
        self.cnf.encode_cones(&self.nodes, [id], &mut self.solver);
        // True iff the node differs from the value
        let lit = self.cnf.lit(id, value, &mut self.solver);

        let result = match self.solve(&[lit]) {
            SatResult::Unsat => {
                self.solver.add_clause(&[!lit]);
                self.set_rep(id, FraigHandle::constant(value));
                EquivResult::Equivalent
            }
            SatResult::Sat(model) => {
                self.add_counterexample(&model);
                self.nodes[id].status = NodeStatus::Distinct;
                EquivResult::NotEquivalent
            }
            SatResult::Unknown => EquivResult::Unknown,
        };

        let elapsed = start.elapsed();
        self.stats.check_const.record(result, elapsed);
        log::debug!(
            "check_const(n{}, {}) -> {:?} in {:?}",
            id,
            value as u8,
            result,
            elapsed
        );
        result
    }

    /// Is node `young` equal to node `old`, complemented if `inv` is set?
    ///
    /// Both nodes must be unmerged, and `old < young`: on success `young` is merged into `old`.
    pub(crate) fn check_equiv_nodes(
        &mut self,
        old: NodeId,
        young: NodeId,
        inv: bool,
    ) -> EquivResult {
        debug_assert!(old < young);
        if !signature_equal(&self.nodes[old].signature, &self.nodes[young].signature, inv) {
            return EquivResult::NotEquivalent;
        }
        for id in [old, young] {
            if self.nodes[id].status == NodeStatus::Unclassified
                || self.nodes[id].status == NodeStatus::Distinct
            {
                self.nodes[id].status = NodeStatus::Candidate;
            }
        }

        let start = Instant::now();
        self.cnf.encode_cones(&self.nodes, [old, young], &mut self.solver);
        let l1 = self.cnf.lit(old, false, &mut self.solver);
        let l2 = self.cnf.lit(young, inv, &mut self.solver);

        // The nodes differ iff (!l1 & l2) or (l1 & !l2) is satisfiable
        let mut result = EquivResult::Equivalent;
        for assumptions in [[!l1, l2], [l1, !l2]] {
            match self.solve(&assumptions) {
                SatResult::Unsat => (),
                SatResult::Sat(model) => {
                    self.add_counterexample(&model);
                    result = EquivResult::NotEquivalent;
                    break;
                }
                SatResult::Unknown => {
                    result = EquivResult::Unknown;
                    break;
                }
            }
        }

        match result {
            EquivResult::Equivalent => {
                self.solver.add_clause(&[!l1, l2]);
                self.solver.add_clause(&[l1, !l2]);
                self.set_rep(young, FraigHandle::new(old, inv));
            }
            EquivResult::NotEquivalent => {
                self.nodes[old].status = NodeStatus::Distinct;
                self.nodes[young].status = NodeStatus::Distinct;
            }
            EquivResult::Unknown => (),
        }

        let elapsed = start.elapsed();
        self.stats.check_equiv.record(result, elapsed);
        log::debug!(
            "check_equiv(n{}, {}n{}) -> {:?} in {:?}",
            old,
            if inv { "~" } else { "" },
            young,
            result,
            elapsed
        );
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{FraigConfig, cnf::Var, sat::VarisatSolver};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn eqgroup_dump() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);
        let x = fraig.make_and(ab, a);
        let f = fraig.make_and(ab, !a);

        let mut out = Vec::new();
        fraig.dump_eqgroup(&mut out).unwrap();
        // Only a constant looking signature so far
        assert_eq!(String::from_utf8(out).unwrap(), "C0? { n4 }\n");

        assert_eq!(fraig.check_equiv(x, ab), EquivResult::Equivalent);
        assert_eq!(fraig.check_const(!f, true), EquivResult::Equivalent);
        let mut out = Vec::new();
        fraig.dump_eqgroup(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "    { ZERO n4 }\n    { n2 n3 }\n"
        );
    }

    #[test]
    fn trivial_checks_need_no_sat() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);

        assert_eq!(fraig.check_equiv(ab, ab), EquivResult::Equivalent);
        assert_eq!(fraig.check_equiv(ab, !ab), EquivResult::NotEquivalent);
        assert_eq!(
            fraig.check_equiv(FraigHandle::zero(), FraigHandle::one()),
            EquivResult::NotEquivalent
        );
        assert_eq!(fraig.check_const(FraigHandle::one(), true), EquivResult::Equivalent);
        assert_eq!(fraig.check_const(FraigHandle::one(), false), EquivResult::NotEquivalent);
        // a and b differ on the random patterns
        assert_eq!(fraig.check_equiv(a, b), EquivResult::NotEquivalent);
        assert_eq!(fraig.get_stats().sat_calls, 0);
    }

    #[test]
    fn de_morgan_is_structural() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let nand = !fraig.make_and(a, b);
        let or = fraig.make_or(!a, !b);
        assert_eq!(fraig.check_equiv(nand, or), EquivResult::Equivalent);
        assert_eq!(fraig.check_equiv(nand, !or), EquivResult::NotEquivalent);
        assert_eq!(fraig.get_stats().sat_calls, 0);
    }

    #[test]
    fn xor_two_ways() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        // (a | b) & !(a & b)
        let or = fraig.make_or(a, b);
        let and = fraig.make_and(a, b);
        let x1 = fraig.make_and(or, !and);
        // (a & !b) | (!a & b)
        let t0 = fraig.make_and(a, !b);
        let t1 = fraig.make_and(!a, b);
        let x2 = fraig.make_or(t0, t1);

        assert_ne!(x1, x2);
        assert_eq!(fraig.check_equiv(x1, x2), EquivResult::Equivalent);
        assert_eq!(fraig.resolve(x1), fraig.resolve(x2));
        assert!(fraig.check_integrity().is_ok());

        // The merged node is redirected by later constructions
        let c = fraig.make_input();
        let y1 = fraig.make_and(x1, c);
        let y2 = fraig.make_and(x2, c);
        assert_eq!(y1, y2);
    }

    #[test]
    fn proofs_are_remembered() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let c = fraig.make_input();
        // a & (b & c) vs (a & b) & c
        let bc = fraig.make_and(b, c);
        let f = fraig.make_and(a, bc);
        let ab = fraig.make_and(a, b);
        let g = fraig.make_and(ab, c);

        assert_eq!(fraig.check_equiv(f, g), EquivResult::Equivalent);
        let calls = fraig.get_stats().sat_calls;
        assert!(calls > 0);
        assert_eq!(fraig.check_equiv(f, g), EquivResult::Equivalent);
        assert_eq!(fraig.check_equiv(g, f), EquivResult::Equivalent);
        assert_eq!(fraig.check_equiv(!f, !g), EquivResult::Equivalent);
        assert_eq!(fraig.get_stats().sat_calls, calls);

        let young = f.get_node_id().unwrap().max(g.get_node_id().unwrap());
        assert!(matches!(
            fraig.node(young).get_status(),
            NodeStatus::Equivalent(_)
        ));
    }

    #[test]
    fn counterexample_splits_signatures() {
        init();
        let mut fraig = Fraig::with_config(FraigConfig {
            sig_words: 1,
            ..FraigConfig::default()
        });
        let inputs: Vec<FraigHandle> = (0..12).map(|_| fraig.make_input()).collect();
        // Wide AND: almost never 1 under random patterns, but not constant
        let wide = fraig.make_and_n(&inputs);
        let mut narrower = inputs.clone();
        narrower.pop();
        let mut f = fraig.make_and_n(&narrower);
        f = fraig.make_and(f, !inputs[11]);

        let id_wide = wide.get_node_id().unwrap();
        let id_f = f.get_node_id().unwrap();
        if fraig.node(id_wide).get_signature() == fraig.node(id_f).get_signature() {
            assert_eq!(fraig.check_equiv(wide, f), EquivResult::NotEquivalent);
            assert!(fraig.get_stats().sat_calls > 0);
            assert_eq!(fraig.get_stats().counterexamples, 1);
        }
        assert_ne!(
            fraig.node(id_wide).get_signature(),
            fraig.node(id_f).get_signature()
        );
        let calls = fraig.get_stats().sat_calls;
        assert_eq!(fraig.check_equiv(wide, f), EquivResult::NotEquivalent);
        assert_eq!(fraig.get_stats().sat_calls, calls);
        assert!(fraig.check_integrity().is_ok());
    }

    #[test]
    fn constant_detection() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let c = fraig.make_input();
        let ab = fraig.make_and(a, b);
        let nbc = fraig.make_and(!b, c);
        let f = fraig.make_and(ab, nbc);

        assert_eq!(fraig.check_const(f, true), EquivResult::NotEquivalent);
        assert_eq!(fraig.check_const(f, false), EquivResult::Equivalent);
        assert_eq!(fraig.check_const(!f, true), EquivResult::Equivalent);
        assert!(fraig.resolve(f).is_zero());
        assert_eq!(fraig.check_equiv(f, FraigHandle::zero()), EquivResult::Equivalent);
        assert_eq!(fraig.check_equiv(FraigHandle::one(), !f), EquivResult::Equivalent);
        // Anything built on top of f simplifies away
        assert!(fraig.make_and(f, c).is_zero());
        assert_eq!(fraig.get_stats().check_const.proved.count, 1);
    }

    /// A solver that always gives up.
    struct GiveUp {
        vars: usize,
    }

    impl SatSolver for GiveUp {
        fn new_var(&mut self) -> Var {
            self.vars += 1;
            Var::from_index(self.vars - 1)
        }

        fn add_clause(&mut self, _clause: &[Lit]) {}

        fn solve(&mut self, _assumptions: &[Lit]) -> SatResult {
            SatResult::Unknown
        }
    }

    #[test]
    fn unknown_leaves_the_graph_alone() {
        init();
        let mut fraig = Fraig::with_solver(FraigConfig::default(), GiveUp { vars: 0 });
        let a = fraig.make_input();
        let b = fraig.make_input();
        let or = fraig.make_or(a, b);
        let and = fraig.make_and(a, b);
        let x1 = fraig.make_and(or, !and);
        let t0 = fraig.make_and(a, !b);
        let t1 = fraig.make_and(!a, b);
        let x2 = fraig.make_or(t0, t1);

        assert_eq!(fraig.check_equiv(x1, x2), EquivResult::Unknown);
        assert_ne!(fraig.resolve(x1), fraig.resolve(x2));
        assert_eq!(fraig.status(x1), Some(NodeStatus::Candidate));
        // Unknown is not cached: the solver is asked again
        let calls = fraig.get_stats().sat_calls;
        assert_eq!(fraig.check_equiv(x1, x2), EquivResult::Unknown);
        assert_eq!(fraig.get_stats().sat_calls, calls + 1);
        assert_eq!(fraig.get_stats().check_equiv.aborted.count, 2);

        // Simulation still disproves what it can
        assert_eq!(fraig.check_equiv(a, b), EquivResult::NotEquivalent);
    }

    #[test]
    fn explicit_varisat_solver() {
        let mut fraig = Fraig::with_solver(FraigConfig::default(), VarisatSolver::new());
        let a = fraig.make_input();
        let f = fraig.make_and(a, a);
        assert_eq!(fraig.check_equiv(a, f), EquivResult::Equivalent);
    }
}
