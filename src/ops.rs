//! Derived connectives, all expressed with [`Fraig::make_and`] and complemented edges.

use ahash::AHashMap;

use crate::{Fraig, FraigHandle, NodeId, NodeKind, dfs, sat::SatSolver};

impl<S: SatSolver> Fraig<S> {
    /// `!(a & b)`
    pub fn make_nand(&mut self, a: FraigHandle, b: FraigHandle) -> FraigHandle {
        !self.make_and(a, b)
    }

    /// `a | b`, built as `!(!a & !b)`.
    pub fn make_or(&mut self, a: FraigHandle, b: FraigHandle) -> FraigHandle {
        !self.make_and(!a, !b)
    }

    /// `!(a | b)`
    pub fn make_nor(&mut self, a: FraigHandle, b: FraigHandle) -> FraigHandle {
        self.make_and(!a, !b)
    }

    /// `a ^ b`, built as `!(!(a & !b) & !(!a & b))`.
    pub fn make_xor(&mut self, a: FraigHandle, b: FraigHandle) -> FraigHandle {
        let t0 = self.make_and(a, !b);
        let t1 = self.make_and(!a, b);
        self.make_or(t0, t1)
    }

    /// `!(a ^ b)`
    pub fn make_xnor(&mut self, a: FraigHandle, b: FraigHandle) -> FraigHandle {
        !self.make_xor(a, b)
    }

    /// AND of all the handles, as a balanced tree.
    ///
    /// Panics on an empty list.
    pub fn make_and_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        self.make_balanced(handles, "make_and_n", Self::make_and)
    }

    /// NAND of all the handles.
    pub fn make_nand_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        !self.make_and_n(handles)
    }

    /// OR of all the handles, as a balanced tree.
    ///
    /// Panics on an empty list.
    pub fn make_or_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        !self.make_nor_n(handles)
    }

    /// NOR of all the handles.
    pub fn make_nor_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        let inverted: Vec<FraigHandle> = handles.iter().map(|&h| !h).collect();
        self.make_balanced(&inverted, "make_nor_n", Self::make_and)
    }

    /// XOR of all the handles, as a balanced tree.
    ///
    /// Panics on an empty list.
    pub fn make_xor_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        self.make_balanced(handles, "make_xor_n", Self::make_xor)
    }

    /// XNOR of all the handles.
    pub fn make_xnor_n(&mut self, handles: &[FraigHandle]) -> FraigHandle {
        !self.make_xor_n(handles)
    }

    /// Combines the handles with a binary operator, the first half
    /// (rounded up) on the left and the rest on the right.
    fn make_balanced(
        &mut self,
        handles: &[FraigHandle],
        name: &str,
        op: fn(&mut Self, FraigHandle, FraigHandle) -> FraigHandle,
    ) -> FraigHandle {
        match handles {
            [] => panic!("Hey, you are trying to call {} on an empty list.", name),
            [h] => *h,
            _ => {
                let mid = handles.len().div_ceil(2);
                let left = self.make_balanced(&handles[..mid], name, op);
                let right = self.make_balanced(&handles[mid..], name, op);
                op(self, left, right)
            }
        }
    }

    /// Substitutes the constant `value` for the input `input_id` in the function of `handle`.
    ///
    /// Only the nodes depending on the input are rebuilt, the rest of the cone is shared.
    ///
    /// ```rust
    /// use fraig::{EquivResult, Fraig};
    /// let mut fraig = Fraig::new();
    /// let a = fraig.make_input();
    /// let b = fraig.make_input();
    /// let f = fraig.make_xor(a, b);
    /// let f1 = fraig.make_cofactor(f, 0, true);
    /// assert_eq!(fraig.check_equiv(f1, !b), EquivResult::Equivalent);
    /// let f0 = fraig.make_cofactor(f, 0, false);
    /// assert_eq!(f0, b);
    /// ```
    ///
    /// Panics if `input_id >= input_num()`.
    pub fn make_cofactor(
        &mut self,
        handle: FraigHandle,
        input_id: usize,
        value: bool,
    ) -> FraigHandle {
        assert!(
            input_id < self.inputs.len(),
            "Hey, you are trying to cofactor against input {} but there are only {} inputs.",
            input_id,
            self.inputs.len()
        );
        let h = self.resolve(handle);
        let Some(root) = h.node else {
            return h;
        };
        let input_node = self.inputs[input_id];

        // Nodes missing from the map are unchanged
        let mut rebuilt: AHashMap<NodeId, FraigHandle> = AHashMap::new();
        for id in dfs::cone(&self.nodes, [root]) {
            match self.nodes[id].get_kind() {
                NodeKind::Input(_) => {
                    if id == input_node {
                        rebuilt.insert(id, FraigHandle::constant(value));
                    }
                }
                NodeKind::And { fanin0, fanin1 } => {
                    let new0 = substitute(&rebuilt, fanin0);
                    let new1 = substitute(&rebuilt, fanin1);
                    if new0 != fanin0 || new1 != fanin1 {
                        let new = self.make_and(new0, new1);
                        rebuilt.insert(id, new);
                    }
                }
            }
        }

        substitute(&rebuilt, h)
    }
}

fn substitute(rebuilt: &AHashMap<NodeId, FraigHandle>, handle: FraigHandle) -> FraigHandle {
    handle
        .node
        .and_then(|id| rebuilt.get(&id))
        .map_or(handle, |new| new.invert_if(handle.complement))
}
