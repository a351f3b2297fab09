use super::{FaninId, FraigHandle};

/// A node id.
///
/// Ids are handed out in creation order, starting from 0, and are never reused.
/// Since a node can only be built from already existing nodes, id order is a topological order.
pub type NodeId = usize;

/// What a node computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A primary input, with its position among the inputs.
    Input(usize),
    /// An AND gate with two fanins.
    ///
    /// Fanins are ordered such that `fanin0` refers to a node with a greater id than `fanin1`.
    And {
        fanin0: FraigHandle,
        fanin1: FraigHandle,
    },
}

/// Where a node stands with respect to functional reduction.
///
/// ```text
/// Unclassified -> Candidate -> Equivalent(rep)
///                           -> Distinct -> Candidate (against another partner)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Never compared with anything.
    Unclassified,
    /// Shares its signature class with another node, not proven yet.
    Candidate,
    /// Proven to compute the same function as the given handle (possibly a constant).
    Equivalent(FraigHandle),
    /// Proven different from every candidate it was compared with so far.
    Distinct,
}

/// An AIG node: its kind, its simulation signature and its reduction bookkeeping.
#[derive(Debug, Clone)]
pub struct FraigNode {
    id: NodeId,
    kind: NodeKind,
    /// One bit per simulation pattern, 64 patterns per word.
    pub(crate) signature: Vec<u64>,
    pub(crate) status: NodeStatus,
}

impl FraigNode {
    pub(crate) fn input(id: NodeId, input_id: usize, signature: Vec<u64>) -> Self {
        FraigNode {
            id,
            kind: NodeKind::Input(input_id),
            signature,
            status: NodeStatus::Unclassified,
        }
    }

    /// Returns a new and gate.
    ///
    /// Fanins must have been canonicalized already, and must not be constants.
    pub(crate) fn and(
        id: NodeId,
        fanin0: FraigHandle,
        fanin1: FraigHandle,
        signature: Vec<u64>,
    ) -> Self {
        match (fanin0.node, fanin1.node) {
            (Some(id0), Some(id1)) if id0 > id1 && id0 < id => (),
            _ => panic!(
                "Hey, you are trying to create the AND gate {} with non canonical fanins {} and {}.",
                id, fanin0, fanin1
            ),
        }
        FraigNode {
            id,
            kind: NodeKind::And { fanin0, fanin1 },
            signature,
            status: NodeStatus::Unclassified,
        }
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }

    pub fn get_kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input(_))
    }

    pub fn is_and(&self) -> bool {
        matches!(self.kind, NodeKind::And { .. })
    }

    /// Position among the primary inputs, if the node is one.
    pub fn get_input_id(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Input(input_id) => Some(input_id),
            NodeKind::And { .. } => None,
        }
    }

    pub fn get_fanins(&self) -> Vec<FraigHandle> {
        match self.kind {
            NodeKind::And { fanin0, fanin1 } => vec![fanin0, fanin1],
            NodeKind::Input(_) => vec![],
        }
    }

    pub fn get_fanin(&self, fanin_id: FaninId) -> Option<FraigHandle> {
        match (self.kind, fanin_id) {
            (NodeKind::And { fanin0, .. }, FaninId::Fanin0) => Some(fanin0),
            (NodeKind::And { fanin1, .. }, FaninId::Fanin1) => Some(fanin1),
            _ => None,
        }
    }

    pub fn get_signature(&self) -> &[u64] {
        &self.signature
    }

    pub fn get_status(&self) -> NodeStatus {
        self.status
    }

    /// The representative this node was proven equivalent to, if any.
    pub fn get_rep(&self) -> Option<FraigHandle> {
        match self.status {
            NodeStatus::Equivalent(rep) => Some(rep),
            _ => None,
        }
    }

    /// True if some simulation pattern evaluates the node to 1 (so it cannot be constant 0).
    pub(crate) fn has_one(&self) -> bool {
        self.signature.iter().any(|&w| w != 0)
    }

    /// True if some simulation pattern evaluates the node to 0 (so it cannot be constant 1).
    pub(crate) fn has_zero(&self) -> bool {
        self.signature.iter().any(|&w| w != !0)
    }
}
