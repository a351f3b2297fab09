//! Structural hashing: at most one AND node exists per ordered pair of fanin handles.

use ahash::AHashMap;

use crate::{FraigHandle, NodeId};

/// Maps the canonical fanin pair `(fanin0, fanin1)` of every AND node to its id.
///
/// Keys are expected in canonical order (`fanin0` refers to the greater id),
/// [`Fraig::make_and`] takes care of it.
///
/// [`Fraig::make_and`]: crate::Fraig::make_and
#[derive(Debug, Default)]
pub struct StructHash {
    table: AHashMap<(FraigHandle, FraigHandle), NodeId>,
}

impl StructHash {
    pub fn new() -> Self {
        StructHash::default()
    }

    pub fn find(&self, fanin0: FraigHandle, fanin1: FraigHandle) -> Option<NodeId> {
        self.table.get(&(fanin0, fanin1)).copied()
    }

    /// Registers a new AND node.
    ///
    /// Panics if a node already exists with these fanins.
    pub fn insert(&mut self, fanin0: FraigHandle, fanin1: FraigHandle, id: NodeId) {
        if let Some(existing) = self.table.insert((fanin0, fanin1), id) {
            panic!(
                "Hey, you are trying to register n{} but n{} already exists with fanins {} and {}.",
                id, existing, fanin0, fanin1
            );
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(FraigHandle, FraigHandle), &NodeId)> {
        self.table.iter()
    }
}
