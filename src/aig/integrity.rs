use ahash::AHashSet;

use crate::{Fraig, FraigError, FraigHandle, NodeId, NodeKind, Result, sat::SatSolver};

impl<S: SatSolver> Fraig<S> {
    /// Checks that the graph is a valid FRAIG, that is:
    /// - node ids match their position, so id order is a topological order
    /// - and gates have non constant fanins, with $id(z) \gt id(fanin0) \gt id(fanin1)$
    /// - every and gate is registered once in the structural hash table, under its fanins
    /// - inputs are registered in creation order
    /// - every signature has the same length
    /// - representatives refer to older nodes (or constants)
    ///
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the FRAIG at any moment.
    pub fn check_integrity(&self) -> Result<()> {
        let words = self.sim.get_words();
        let mut keys: AHashSet<(FraigHandle, FraigHandle)> = AHashSet::new();
        let mut input_count = 0;

        for (pos, node) in self.nodes.iter().enumerate() {
            let id = node.get_id();
            if id != pos {
                return Err(FraigError::InvalidState(format!(
                    "node at position {} has id {}",
                    pos, id
                )));
            }

            match node.get_kind() {
                NodeKind::Input(input_id) => {
                    if self.inputs.get(input_id) != Some(&id) {
                        return Err(FraigError::InvalidState(format!(
                            "input {} is not registered as node {}",
                            input_id, id
                        )));
                    }
                    input_count += 1;
                }
                NodeKind::And { fanin0, fanin1 } => {
                    self.check_fanins(id, fanin0, fanin1)?;
                    if !keys.insert((fanin0, fanin1)) {
                        return Err(FraigError::InvalidState(format!(
                            "two and gates share the fanins {} and {}",
                            fanin0, fanin1
                        )));
                    }
                    if self.strash.find(fanin0, fanin1) != Some(id) {
                        return Err(FraigError::InvalidState(format!(
                            "and gate {} is missing from the structural hash table",
                            id
                        )));
                    }
                }
            }

            if node.get_signature().len() != words {
                return Err(FraigError::InvalidState(format!(
                    "node {} has a signature of {} words instead of {}",
                    id,
                    node.get_signature().len(),
                    words
                )));
            }

            if let Some(rep) = node.get_rep() {
                if rep.node.is_some_and(|rep_id| rep_id >= id) {
                    return Err(FraigError::InvalidState(format!(
                        "node {} has representative {}, which is not older",
                        id, rep
                    )));
                }
            }
        }

        if input_count != self.inputs.len() {
            return Err(FraigError::InvalidState(format!(
                "{} inputs registered but {} input nodes",
                self.inputs.len(),
                input_count
            )));
        }
        if self.strash.len() != keys.len() {
            return Err(FraigError::InvalidState(format!(
                "structural hash table has {} entries for {} and gates",
                self.strash.len(),
                keys.len()
            )));
        }

        Ok(())
    }

    fn check_fanins(&self, id: NodeId, fanin0: FraigHandle, fanin1: FraigHandle) -> Result<()> {
        match (fanin0.node, fanin1.node) {
            (Some(id0), Some(id1)) => {
                if id <= id0 {
                    return Err(FraigError::InvalidState(format!(
                        "id of parent {} should be strictly larger than its fanin0 {}",
                        id, id0
                    )));
                }
                if id0 <= id1 {
                    return Err(FraigError::InvalidState(format!(
                        "(parent {}) id of fanin0 {} should be strictly larger than fanin1 {}",
                        id, id0, id1
                    )));
                }
                Ok(())
            }
            _ => Err(FraigError::InvalidState(format!(
                "and gate {} has a constant fanin",
                id
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Fraig, FraigError, FraigHandle, NodeStatus};

    #[test]
    fn valid_fraig() {
        let mut fraig = Fraig::new();
        assert!(fraig.check_integrity().is_ok());
        let a = fraig.make_input();
        let b = fraig.make_input();
        let x = fraig.make_xor(a, b);
        fraig.make_and(x, a);
        fraig.simulate_round();
        assert!(fraig.check_integrity().is_ok());
    }

    #[test]
    fn forward_representative() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);
        fraig.nodes[0].status = NodeStatus::Equivalent(ab);
        assert!(matches!(
            fraig.check_integrity(),
            Err(FraigError::InvalidState(_))
        ));
    }

    #[test]
    fn missing_signature_word() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        fraig.make_and(a, !b);
        fraig.nodes[2].signature.pop();
        assert!(fraig.check_integrity().is_err());
    }

    #[test]
    fn constant_representative_is_fine() {
        let mut fraig = Fraig::new();
        let a = fraig.make_input();
        let b = fraig.make_input();
        let ab = fraig.make_and(a, b);
        fraig.set_rep(ab.get_node_id().unwrap(), FraigHandle::zero());
        assert!(fraig.check_integrity().is_ok());
    }
}
