//! Provides a DFS visitor to walk fanin cones without recursion.
//!
//! See [`Dfs`] for details.

use ahash::AHashSet;

use crate::{FraigNode, NodeId};

/// A simple DFS visitor over the fanin cones of some start nodes.
///
/// Nodes are yielded in preorder, each at most once. The visitor keeps an explicit stack,
/// so arbitrarily deep graphs can be walked.
///
/// Example:
///
/// ```rust
/// use fraig::{Fraig, dfs::Dfs};
/// let mut fraig = Fraig::new();
/// let a = fraig.make_input();
/// let b = fraig.make_input();
/// let f = fraig.make_and(a, b);
/// let mut dfs = Dfs::from_node(f.get_node_id().unwrap());
/// let mut count = 0;
/// while let Some(_id) = dfs.next(fraig.get_nodes()) {
///     count += 1;
/// }
/// assert_eq!(count, 3);
/// ```
pub struct Dfs {
    /// All nodes on the stack have not been visited yet,
    /// and their `seen` flag is set to avoid adding them one more time to the stack.
    stack: Vec<NodeId>,
    seen: AHashSet<NodeId>,
}

impl Dfs {
    /// Create a DFS from the initial start node.
    /// You will only browse the fanin of this node.
    pub fn from_node(start: NodeId) -> Self {
        Dfs::from_nodes([start])
    }

    /// Create a DFS browsing the union of the fanin cones of all the start nodes.
    pub fn from_nodes(starts: impl IntoIterator<Item = NodeId>) -> Self {
        let mut dfs = Dfs {
            stack: Vec::new(),
            seen: AHashSet::new(),
        };
        for id in starts {
            if dfs.seen.insert(id) {
                dfs.stack.push(id);
            }
        }
        dfs
    }

    /// Yield the next node of the DFS, or None if it is done.
    pub fn next(&mut self, nodes: &[FraigNode]) -> Option<NodeId> {
        self.next_filtered(nodes, |_| true)
    }

    /// Same as [`Dfs::next`], but nodes for which `keep` returns false are neither
    /// yielded nor expanded: their fanin is cut off the walk.
    pub fn next_filtered(
        &mut self,
        nodes: &[FraigNode],
        keep: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            if !keep(id) {
                continue;
            }
            for fanin in nodes[id].get_fanins() {
                if let Some(child_id) = fanin.get_node_id() {
                    if self.seen.insert(child_id) {
                        self.stack.push(child_id);
                    }
                }
            }
            return Some(id);
        }
        None
    }
}

/// Returns the ids of all the nodes in the fanin cones of `roots`, in topological order.
pub fn cone(nodes: &[FraigNode], roots: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
    let mut dfs = Dfs::from_nodes(roots);
    let mut ids = Vec::new();
    while let Some(id) = dfs.next(nodes) {
        ids.push(id);
    }
    // Fanins always have smaller ids than their fanouts.
    ids.sort_unstable();
    ids
}
