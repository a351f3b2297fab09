//! Pattern hashing: buckets nodes by their simulation signature, up to complementation.
//!
//! A signature and its complement land in the same bucket: the canonical form of a
//! signature is the one whose very first pattern evaluates to 0. Buckets are indexed
//! by a hash of the canonical signature, so candidates must still be compared word by word.

use ahash::{AHashMap, AHashSet, RandomState};

use crate::{FraigNode, NodeId};

/// True if the signature has to be complemented to get its canonical form.
pub fn phase(signature: &[u64]) -> bool {
    signature.first().is_some_and(|w| w & 1 == 1)
}

/// True if `sig1 == sig2` once `sig2` is complemented if `inv` is set.
pub fn signature_equal(sig1: &[u64], sig2: &[u64], inv: bool) -> bool {
    let mask = if inv { !0 } else { 0 };
    sig1.len() == sig2.len() && sig1.iter().zip(sig2).all(|(&w1, &w2)| w1 == w2 ^ mask)
}

/// Hash table of the signature classes.
#[derive(Debug)]
pub struct PatHash {
    hasher: RandomState,
    table: AHashMap<u64, Vec<NodeId>>,
    /// Everything inserted since the last clear, in insertion order.
    members: Vec<NodeId>,
}

impl Default for PatHash {
    fn default() -> Self {
        PatHash::new()
    }
}

impl PatHash {
    pub fn new() -> Self {
        PatHash {
            // Fixed seeds: bucket order does not depend on the run.
            hasher: RandomState::with_seeds(
                0x243f_6a88_85a3_08d3,
                0x1319_8a2e_0370_7344,
                0xa409_3822_299f_31d0,
                0x082e_fa98_ec4e_6c89,
            ),
            table: AHashMap::new(),
            members: Vec::new(),
        }
    }

    fn key(&self, signature: &[u64]) -> u64 {
        let mask = if phase(signature) { !0 } else { 0 };
        let canonical: Vec<u64> = signature.iter().map(|w| w ^ mask).collect();
        self.hasher.hash_one(&canonical)
    }

    pub fn insert(&mut self, id: NodeId, signature: &[u64]) {
        let key = self.key(signature);
        self.table.entry(key).or_default().push(id);
        self.members.push(id);
    }

    /// Nodes sharing the bucket of the signature. Since buckets are keyed by a hash,
    /// the signatures of the returned nodes still have to be checked.
    pub fn candidates(&self, signature: &[u64]) -> Vec<NodeId> {
        self.table
            .get(&self.key(signature))
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Recomputes every bucket after the signatures changed.
    /// Members that have been merged in the meantime are dropped.
    pub fn rehash(&mut self, nodes: &[FraigNode]) {
        let members = std::mem::take(&mut self.members);
        self.table.clear();
        for id in members {
            if nodes[id].get_rep().is_none() {
                self.insert(id, &nodes[id].signature);
            }
        }
    }

    /// Number of distinct signature classes among the given nodes.
    pub fn count_classes(
        &self,
        nodes: &[FraigNode],
        ids: impl IntoIterator<Item = NodeId>,
    ) -> usize {
        let keys: AHashSet<u64> = ids
            .into_iter()
            .map(|id| self.key(&nodes[id].signature))
            .collect();
        keys.len()
    }
}
