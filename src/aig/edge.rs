//! A [`FraigHandle`] points at a [`FraigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! The two constants do not need a node: they are encoded as a handle without node,
//! the complement flag telling which one it is.
//!
//! [`FraigNode`]: crate::FraigNode

use std::{fmt, ops::Not};

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Unambiguous fanin selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaninId {
    Fanin0,
    Fanin1,
}

/// A value-type reference to a signal of the graph: a node plus a polarity.
///
/// Equality is structural (same node, same polarity). Two handles which are not equal
/// might still compute the same function, only [`Fraig::check_equiv`] can tell.
///
/// ```rust
/// use fraig::FraigHandle;
/// let zero = FraigHandle::zero();
/// assert_eq!(!zero, FraigHandle::one());
/// assert!(zero.is_const());
/// ```
///
/// [`Fraig::check_equiv`]: crate::Fraig::check_equiv
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FraigHandle {
    /// The node the handle is refering to, [`None`] for the constants.
    pub(crate) node: Option<NodeId>,
    /// Set to true if signal should be inverted.
    pub(crate) complement: bool,
}

impl Not for FraigHandle {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl fmt::Display for FraigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            None if self.complement => write!(f, "ONE"),
            None => write!(f, "ZERO"),
            Some(id) => {
                if self.complement {
                    write!(f, "~")?;
                }
                write!(f, "n{}", id)
            }
        }
    }
}

impl FraigHandle {
    pub fn new(node: NodeId, complement: bool) -> Self {
        FraigHandle {
            node: Some(node),
            complement,
        }
    }

    /// The constant 0.
    pub const fn zero() -> Self {
        FraigHandle {
            node: None,
            complement: false,
        }
    }

    /// The constant 1.
    pub const fn one() -> Self {
        FraigHandle {
            node: None,
            complement: true,
        }
    }

    /// Returns the constant matching `value`.
    pub const fn constant(value: bool) -> Self {
        FraigHandle {
            node: None,
            complement: value,
        }
    }

    pub fn get_node_id(&self) -> Option<NodeId> {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    pub fn is_const(&self) -> bool {
        self.node.is_none()
    }

    pub fn is_zero(&self) -> bool {
        self.node.is_none() && !self.complement
    }

    pub fn is_one(&self) -> bool {
        self.node.is_none() && self.complement
    }

    pub fn is_complement_of(&self, other: &FraigHandle) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }

    /// Applies an extra inversion when `inv` is set.
    pub fn invert_if(self, inv: bool) -> Self {
        if inv { !self } else { self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_handle_test() {
        let h = FraigHandle::new(3, false);
        assert_eq!(!h, FraigHandle::new(3, true));
        assert_eq!(!!h, h);
        assert!(h.is_complement_of(&!h));
        assert!(!h.is_complement_of(&h));
    }

    #[test]
    fn constants_test() {
        assert!(FraigHandle::zero().is_zero());
        assert!(FraigHandle::one().is_one());
        assert_eq!(FraigHandle::constant(true), FraigHandle::one());
        assert_eq!(FraigHandle::zero().invert_if(true), FraigHandle::one());
        assert_eq!(FraigHandle::zero().get_node_id(), None);
    }

    #[test]
    fn display_test() {
        assert_eq!(FraigHandle::zero().to_string(), "ZERO");
        assert_eq!(FraigHandle::one().to_string(), "ONE");
        assert_eq!(FraigHandle::new(7, true).to_string(), "~n7");
    }
}
