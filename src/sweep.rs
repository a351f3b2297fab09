//! Functional reduction of a whole graph.
//!
//! [`Fraig::sweep`] first refines the signature classes with cheap random simulation,
//! then walks the nodes in topological order and proves (or disproves) each of them
//! against the older nodes of its class.

use serde::Serialize;

use crate::{
    EquivResult, Fraig, FraigHandle, NodeId,
    pathash::{phase, signature_equal},
    sat::SatSolver,
};

/// What a [`Fraig::sweep`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Random simulation rounds run before the SAT phase.
    pub sim_rounds: usize,
    /// Signature classes when random simulation stopped.
    pub classes: usize,
    /// Nodes proven constant.
    pub merged_const: usize,
    /// Nodes proven equivalent to an older node.
    pub merged: usize,
    /// SAT checks that ended with a counterexample.
    pub disproved: usize,
    /// SAT checks on which the solver gave up.
    pub unknown: usize,
}

impl<S: SatSolver> Fraig<S> {
    fn live_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&id| self.nodes[id].get_rep().is_none())
            .collect()
    }

    /// Random simulation rounds, as long as they keep splitting signature classes.
    ///
    /// Stops after `loop_limit` consecutive rounds without any split.
    /// Returns the number of rounds run.
    pub fn simulate_until_stable(&mut self) -> usize {
        let live = self.live_nodes();
        let mut classes = self.pathash.count_classes(&self.nodes, live.iter().copied());
        let mut idle = 0;
        let mut rounds = 0;
        while idle < self.config.loop_limit {
            self.simulate_round();
            rounds += 1;
            let new_classes = self.pathash.count_classes(&self.nodes, live.iter().copied());
            if new_classes > classes {
                classes = new_classes;
                idle = 0;
            } else {
                idle += 1;
            }
        }
        log::debug!("{} simulation rounds, {} classes", rounds, classes);
        rounds
    }

    /// Functionally reduces the whole graph: afterwards, no two unmerged nodes are
    /// equivalent and no unmerged node is constant, unless the solver gave up on them.
    ///
    /// ```rust
    /// use fraig::Fraig;
    /// let mut fraig = Fraig::new();
    /// let a = fraig.make_input();
    /// let b = fraig.make_input();
    /// let c = fraig.make_input();
    /// let bc = fraig.make_and(b, c);
    /// let f = fraig.make_and(a, bc);
    /// let ab = fraig.make_and(a, b);
    /// let g = fraig.make_and(ab, c);
    /// let report = fraig.sweep();
    /// assert_eq!(report.merged, 1);
    /// assert_eq!(fraig.resolve(f), fraig.resolve(g));
    /// ```
    pub fn sweep(&mut self) -> SweepReport {
        let before = self.stats.clone();
        let sim_rounds = self.simulate_until_stable();
        let classes = self
            .pathash
            .count_classes(&self.nodes, self.live_nodes().into_iter());

        self.pathash.clear();
        let mut merged_const = 0;
        let mut merged = 0;
        for id in 0..self.nodes.len() {
            if self.nodes[id].get_rep().is_some() {
                continue;
            }
            if self.nodes[id].is_input() {
                self.pathash.insert(id, &self.nodes[id].signature);
                continue;
            }
            let h = self.reduce_node(id);
            if h.is_const() {
                merged_const += 1;
            } else if h != FraigHandle::new(id, false) {
                merged += 1;
            }
        }

        let report = SweepReport {
            sim_rounds,
            classes,
            merged_const,
            merged,
            disproved: (self.stats.check_const.disproved.count
                - before.check_const.disproved.count)
                + (self.stats.check_equiv.disproved.count - before.check_equiv.disproved.count),
            unknown: (self.stats.check_const.aborted.count - before.check_const.aborted.count)
                + (self.stats.check_equiv.aborted.count - before.check_equiv.aborted.count),
        };
        log::info!("sweep: {:?}", report);
        report
    }

    /// Tries to merge node `id` into a constant, then into an older node of its class.
    /// Unless merged, the node joins the pattern hash table.
    ///
    /// Returns the representative of the node (itself if nothing was proven).
    pub(crate) fn reduce_node(&mut self, id: NodeId) -> FraigHandle {
        let h = FraigHandle::new(id, false);
        if self.nodes[id].get_rep().is_some() {
            return self.resolve(h);
        }

        if !self.nodes[id].has_one() {
            if self.check_const_node(id, false) == EquivResult::Equivalent {
                return FraigHandle::zero();
            }
        } else if !self.nodes[id].has_zero()
            && self.check_const_node(id, true) == EquivResult::Equivalent
        {
            return FraigHandle::one();
        }

        // A counterexample changes every signature: the candidates are then looked up again
        'lookup: loop {
            let signature = &self.nodes[id].signature;
            let candidates = self.pathash.candidates(signature);
            for cand in candidates {
                if cand == id || self.nodes[cand].get_rep().is_some() {
                    continue;
                }
                let inv = phase(&self.nodes[cand].signature) ^ phase(&self.nodes[id].signature);
                if !signature_equal(&self.nodes[cand].signature, &self.nodes[id].signature, inv) {
                    continue;
                }
                let (old, young) = if cand < id { (cand, id) } else { (id, cand) };
                match self.check_equiv_nodes(old, young, inv) {
                    EquivResult::Equivalent => {
                        if young == id {
                            return self.resolve(h);
                        }
                        // An older node got merged into this one, never happens
                        // when nodes are reduced in id order.
                        continue 'lookup;
                    }
                    EquivResult::NotEquivalent => continue 'lookup,
                    EquivResult::Unknown => (),
                }
            }
            break;
        }

        self.pathash.insert(id, &self.nodes[id].signature);
        h
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{FraigConfig, NodeStatus};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn sweep_merges_equivalent_xors() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let or = fraig.make_or(a, b);
        let and = fraig.make_and(a, b);
        let x1 = fraig.make_and(or, !and);
        let x2 = fraig.make_xor(a, b);
        let x3 = fraig.make_xnor(!a, b);

        let report = fraig.sweep();
        assert!(report.merged >= 1);
        assert_eq!(report.merged_const, 0);
        assert_eq!(fraig.resolve(x1), fraig.resolve(x2));
        assert_eq!(fraig.resolve(x2), fraig.resolve(x3));
        assert!(fraig.check_integrity().is_ok());

        // Everything is settled now
        let calls = fraig.get_stats().sat_calls;
        let again = fraig.sweep();
        assert_eq!(again.merged, 0);
        assert_eq!(fraig.get_stats().sat_calls, calls);
    }

    #[test]
    fn sweep_finds_constants() {
        init();
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);
        let nab = fraig.make_and(!a, b);
        let zero = fraig.make_and(ab, nab);
        let one = !zero;
        let top = fraig.make_or(one, a);

        let report = fraig.sweep();
        assert_eq!(report.merged_const, 2);
        assert!(fraig.resolve(zero).is_zero());
        assert!(fraig.resolve(top).is_one());
    }

    #[test]
    fn sweep_keeps_distinct_nodes() {
        init();
        let mut fraig = Fraig::new();
        let inputs: Vec<FraigHandle> = (0..6).map(|_| fraig.make_input()).collect();
        let and = fraig.make_and_n(&inputs);
        let or = fraig.make_or_n(&inputs);
        let xor = fraig.make_xor_n(&inputs);
        let report = fraig.sweep();
        assert_eq!(report.merged, 0);
        assert_eq!(report.merged_const, 0);
        assert_eq!(report.unknown, 0);
        for h in [and, or, xor] {
            assert_eq!(fraig.resolve(h), h);
            assert!(!matches!(fraig.status(h), Some(NodeStatus::Equivalent(_))));
        }
    }

    #[test]
    fn simulation_stops_after_loop_limit() {
        let mut fraig = Fraig::with_config(FraigConfig {
            loop_limit: 3,
            ..FraigConfig::default()
        });
        let a = fraig.make_input();
        let b = fraig.make_input();
        fraig.make_and(a, b);
        let words = fraig.get_sig_words();
        let rounds = fraig.simulate_until_stable();
        assert!(rounds >= 3);
        assert_eq!(fraig.get_sig_words(), words + rounds);
        assert_eq!(fraig.get_stats().sim_rounds, rounds);

        fraig.set_loop_limit(0);
        assert_eq!(fraig.simulate_until_stable(), 0);
    }

    #[test]
    fn reduce_on_build() {
        init();
        let mut fraig = Fraig::with_config(FraigConfig::reducing());
        let a = fraig.make_input();
        let b = fraig.make_input();
        let c = fraig.make_input();
        let bc = fraig.make_and(b, c);
        let f = fraig.make_and(a, bc);
        let ab = fraig.make_and(a, b);
        let g = fraig.make_and(ab, c);
        assert_eq!(f, g);

        let nab = fraig.make_and(!a, b);
        assert!(fraig.make_and(ab, nab).is_zero());
        assert!(fraig.check_integrity().is_ok());
    }

    #[test]
    fn reduce_on_build_across_simulation_rounds() {
        init();
        let mut fraig = Fraig::with_config(FraigConfig::reducing());
        let a = fraig.make_input();
        let b = fraig.make_input();
        let c = fraig.make_input();
        let bc = fraig.make_and(b, c);
        let f = fraig.make_and(a, bc);

        // Signatures of the stored nodes grow by one word
        fraig.simulate_round();
        let ab = fraig.make_and(a, b);
        let g = fraig.make_and(ab, c);
        assert_eq!(f, g);

        fraig.simulate_until_stable();
        let ac = fraig.make_and(a, c);
        let h = fraig.make_and(ac, b);
        assert_eq!(h, f);
        assert!(fraig.check_integrity().is_ok());
    }
}
