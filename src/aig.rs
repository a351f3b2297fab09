//! Module defining the [`Fraig`] engine, as well as [`FraigNode`], [`FraigHandle`] and some others relevant structs.
//!
//! To start proving combinational equivalence, check [`Fraig::check_equiv`], [`Fraig::sweep`]
//! and the [`crate::miter::Miter`] docs.

pub mod edge;
pub mod error;
mod integrity;
pub mod node;

pub use edge::{FaninId, FraigHandle};
pub use error::{FraigError, Result};
pub use node::{FraigNode, NodeId, NodeKind, NodeStatus};

use crate::{
    cnf::CnfEncoder,
    config::FraigConfig,
    pathash::PatHash,
    sat::{SatSolver, VarisatSolver},
    sim::Simulator,
    stats::FraigStats,
    strash::StructHash,
};

/// A functionally reduced AND-inverter graph, together with everything needed to reduce it:
/// the structural hash table, the simulation signatures, the pattern hash table and the
/// SAT solver.
///
/// Nodes are never deleted during a session. Proving a node equivalent to another one only
/// records a representative, and every later construction goes through the representative.
///
/// The engine is single-threaded: run independent instances to work in parallel.
///
/// ```rust
/// use fraig::{EquivResult, Fraig};
/// let mut fraig = Fraig::new();
/// let a = fraig.make_input();
/// let b = fraig.make_input();
/// let f = fraig.make_xnor(a, b);
/// let ab = fraig.make_and(a, b);
/// let nanb = fraig.make_and(!a, !b);
/// let g = fraig.make_or(ab, nanb);
/// assert_eq!(fraig.check_equiv(f, g), EquivResult::Equivalent);
/// ```
pub struct Fraig<S: SatSolver = VarisatSolver<'static>> {
    pub(crate) config: FraigConfig,
    /// Indexed by node id.
    pub(crate) nodes: Vec<FraigNode>,
    /// Node id of each primary input, indexed by input id.
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) strash: StructHash,
    pub(crate) sim: Simulator,
    pub(crate) pathash: PatHash,
    pub(crate) cnf: CnfEncoder,
    pub(crate) solver: S,
    pub(crate) stats: FraigStats,
}

impl Fraig {
    /// Create a brand new empty FRAIG with the default configuration.
    pub fn new() -> Self {
        Fraig::with_config(FraigConfig::default())
    }

    /// Create a brand new empty FRAIG, solving with varisat.
    pub fn with_config(config: FraigConfig) -> Self {
        Fraig::with_solver(config, VarisatSolver::new())
    }
}

impl Default for Fraig {
    fn default() -> Self {
        Fraig::new()
    }
}

impl<S: SatSolver> Fraig<S> {
    /// Create a brand new empty FRAIG using the given SAT solver.
    pub fn with_solver(config: FraigConfig, mut solver: S) -> Self {
        solver.set_conflict_limit(config.conflict_limit);
        let sim = Simulator::new(&config);
        Fraig {
            config,
            nodes: Vec::new(),
            inputs: Vec::new(),
            strash: StructHash::new(),
            sim,
            pathash: PatHash::new(),
            cnf: CnfEncoder::new(),
            solver,
            stats: FraigStats::default(),
        }
    }

    pub fn get_config(&self) -> &FraigConfig {
        &self.config
    }

    /// Sets the number of consecutive random simulation rounds without any class split
    /// after which [`Fraig::sweep`] stops simulating.
    pub fn set_loop_limit(&mut self, loop_limit: usize) {
        self.config.loop_limit = loop_limit;
    }

    /// Sets the conflict budget of every subsequent SAT call.
    ///
    /// The budget is only enforced by solvers that support one. [`VarisatSolver`] records
    /// it but always runs to completion, so with the default solver a query never ends
    /// [`Unknown`] for lack of budget.
    ///
    /// [`Unknown`]: crate::EquivResult::Unknown
    pub fn set_conflict_limit(&mut self, limit: Option<u64>) {
        self.config.conflict_limit = limit;
        self.solver.set_conflict_limit(limit);
    }

    /// Number of nodes (inputs included).
    pub fn node_num(&self) -> usize {
        self.nodes.len()
    }

    /// Number of primary inputs.
    pub fn input_num(&self) -> usize {
        self.inputs.len()
    }

    pub fn get_nodes(&self) -> &[FraigNode] {
        &self.nodes
    }

    /// Retrieves a node from its id.
    ///
    /// Panics if `id >= node_num()`, see [`Fraig::try_node`] for a checked version.
    pub fn node(&self, id: NodeId) -> &FraigNode {
        assert!(
            id < self.nodes.len(),
            "node id={} out of range (node_num={})",
            id,
            self.nodes.len()
        );
        &self.nodes[id]
    }

    /// Retrieves a node from its id.
    pub fn try_node(&self, id: NodeId) -> Result<&FraigNode> {
        self.nodes.get(id).ok_or(FraigError::NodeDoesNotExist(id))
    }

    /// Retrieves the handle of the `pos`-th primary input.
    ///
    /// Panics if `pos >= input_num()`, see [`Fraig::try_input`] for a checked version.
    pub fn input(&self, pos: usize) -> FraigHandle {
        assert!(
            pos < self.inputs.len(),
            "input {} out of range (input_num={})",
            pos,
            self.inputs.len()
        );
        FraigHandle::new(self.inputs[pos], false)
    }

    /// Retrieves the handle of the `pos`-th primary input.
    pub fn try_input(&self, pos: usize) -> Result<FraigHandle> {
        self.inputs
            .get(pos)
            .map(|&id| FraigHandle::new(id, false))
            .ok_or(FraigError::InputDoesNotExist(pos))
    }

    /// Retrieves all the primary inputs, in creation order.
    pub fn get_inputs(&self) -> Vec<FraigHandle> {
        self.inputs
            .iter()
            .map(|&id| FraigHandle::new(id, false))
            .collect()
    }

    /// Follows the proven representatives of the handle, composing polarities on the way.
    ///
    /// The result is a handle whose node has not been merged into anything (or a constant).
    pub fn resolve(&self, handle: FraigHandle) -> FraigHandle {
        let mut current = handle;
        while let Some(id) = current.node {
            match self.nodes[id].get_rep() {
                Some(rep) => current = rep.invert_if(current.complement),
                None => break,
            }
        }
        current
    }

    /// Records that node `id` computes the same function as `rep`.
    ///
    /// `rep` must be resolved, and refer to a node older than `id` (or be a constant),
    /// so that representative chains always terminate.
    pub(crate) fn set_rep(&mut self, id: NodeId, rep: FraigHandle) {
        debug_assert!(rep.node.is_none_or(|rep_id| rep_id < id));
        self.nodes[id].status = NodeStatus::Equivalent(rep);
        self.stats.merged += 1;
        log::debug!("merged n{} into {}", id, rep);
    }

    /// The constant 0.
    pub fn make_zero(&self) -> FraigHandle {
        FraigHandle::zero()
    }

    /// The constant 1.
    pub fn make_one(&self) -> FraigHandle {
        FraigHandle::one()
    }

    /// Create a new primary input. Inputs are never shared.
    pub fn make_input(&mut self) -> FraigHandle {
        let id = self.nodes.len();
        let input_id = self.inputs.len();
        let signature = self.sim.random_signature();
        self.nodes.push(FraigNode::input(id, input_id, signature));
        self.inputs.push(id);
        if self.config.reduce_on_build {
            self.pathash.insert(id, &self.nodes[id].signature);
        }
        log::trace!("make_input -> n{} (input {})", id, input_id);
        FraigHandle::new(id, false)
    }

    /// Buffer: returns the handle itself.
    pub fn make_buff(&self, handle: FraigHandle) -> FraigHandle {
        handle
    }

    /// Inverter: only flips the polarity, never allocates.
    pub fn make_not(&self, handle: FraigHandle) -> FraigHandle {
        !handle
    }

    /// Create a new AND gate (or retrieve it if the exact same gate already exists).
    ///
    /// Operands are first redirected to their representatives, then the trivial cases are
    /// simplified: `x & x = x`, `x & !x = 0`, `x & 1 = x` and `x & 0 = 0`.
    ///
    /// ```rust
    /// use fraig::Fraig;
    /// let mut fraig = Fraig::new();
    /// let a = fraig.make_input();
    /// let b = fraig.make_input();
    /// let ab = fraig.make_and(a, b);
    /// assert_eq!(fraig.make_and(b, a), ab);
    /// assert_eq!(fraig.make_and(a, a), a);
    /// assert!(fraig.make_and(a, !a).is_zero());
    /// assert_eq!(fraig.node_num(), 3);
    /// ```
    pub fn make_and(&mut self, handle1: FraigHandle, handle2: FraigHandle) -> FraigHandle {
        let mut h1 = self.resolve(handle1);
        let mut h2 = self.resolve(handle2);

        if h1.is_zero() || h2.is_zero() {
            return FraigHandle::zero();
        }
        if h1.is_one() {
            return h2;
        }
        if h2.is_one() {
            return h1;
        }
        if h1 == h2 {
            return h1;
        }
        if h1.is_complement_of(&h2) {
            return FraigHandle::zero();
        }

        // fanin0 refers to the greater id
        if h1.node < h2.node {
            std::mem::swap(&mut h1, &mut h2);
        }

        if let Some(id) = self.strash.find(h1, h2) {
            self.stats.strash_hits += 1;
            return self.resolve(FraigHandle::new(id, false));
        }

        let id = self.nodes.len();
        let signature = self.and_signature(h1, h2);
        self.nodes.push(FraigNode::and(id, h1, h2, signature));
        self.strash.insert(h1, h2, id);
        log::trace!("make_and({}, {}) -> n{}", h1, h2, id);

        if self.config.reduce_on_build {
            self.reduce_node(id)
        } else {
            FraigHandle::new(id, false)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn make_input_test() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        assert_ne!(a, b);
        assert_eq!(fraig.input_num(), 2);
        assert_eq!(fraig.node_num(), 2);
        assert_eq!(fraig.input(1), b);
        assert_eq!(fraig.node(0).get_input_id(), Some(0));
        assert_eq!(fraig.get_inputs(), vec![a, b]);
    }

    #[test]
    fn conflict_limit_reaches_solver() {
        let mut fraig = Fraig::new();
        assert_eq!(fraig.solver.get_conflict_limit(), None);
        fraig.set_conflict_limit(Some(100));
        assert_eq!(fraig.get_config().conflict_limit, Some(100));
        assert_eq!(fraig.solver.get_conflict_limit(), Some(100));

        let fraig = Fraig::with_config(FraigConfig {
            conflict_limit: Some(7),
            ..FraigConfig::default()
        });
        assert_eq!(fraig.solver.get_conflict_limit(), Some(7));
    }

    #[test]
    fn make_and_trivial_cases() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let zero = fraig.make_zero();
        let one = fraig.make_one();

        assert_eq!(fraig.make_and(a, a), a);
        assert_eq!(fraig.make_and(!a, !a), !a);
        assert_eq!(fraig.make_and(a, !a), zero);
        assert_eq!(fraig.make_and(a, one), a);
        assert_eq!(fraig.make_and(one, !a), !a);
        assert_eq!(fraig.make_and(a, zero), zero);
        assert_eq!(fraig.make_and(zero, one), zero);
        assert_eq!(fraig.make_and(one, one), one);
        assert_eq!(fraig.node_num(), 1);
    }

    #[test]
    fn make_and_is_hash_consed() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();

        let ab = fraig.make_and(a, b);
        let n = fraig.node_num();
        assert_eq!(fraig.make_and(a, b), ab);
        assert_eq!(fraig.make_and(b, a), ab);
        assert_eq!(fraig.node_num(), n);

        // Polarities are part of the key
        let anb = fraig.make_and(a, !b);
        assert_ne!(anb, ab);
        assert_eq!(fraig.node_num(), n + 1);
        assert_eq!(fraig.make_and(!b, a), anb);

        match fraig.node(ab.get_node_id().unwrap()).get_kind() {
            NodeKind::And { fanin0, fanin1 } => {
                assert_eq!(fanin0, b);
                assert_eq!(fanin1, a);
            }
            other => panic!("expected an and gate, got {:?}", other),
        }
        assert!(fraig.check_integrity().is_ok());
    }

    #[test]
    fn make_not_never_allocates() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);
        let n = fraig.node_num();
        assert_eq!(fraig.make_not(fraig.make_not(ab)), ab);
        assert_eq!(fraig.make_buff(ab), ab);
        assert_eq!(fraig.node_num(), n);
    }

    #[test]
    fn checked_accessors() {
        let mut fraig = Fraig::new();
        fraig.make_input();
        assert!(fraig.try_node(0).is_ok());
        assert!(matches!(
            fraig.try_node(1),
            Err(FraigError::NodeDoesNotExist(1))
        ));
        assert!(matches!(
            fraig.try_input(3),
            Err(FraigError::InputDoesNotExist(3))
        ));
    }

    #[test]
    #[should_panic]
    fn node_out_of_range() {
        let fraig = Fraig::new();
        let _ = fraig.node(0);
    }

    #[test]
    #[should_panic]
    fn input_out_of_range() {
        let mut fraig = Fraig::new();
        fraig.make_input();
        let _ = fraig.input(1);
    }
}
