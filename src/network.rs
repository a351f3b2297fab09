//! Conversion of a gate-level network into FRAIG handles.
//!
//! A [`NetworkBuilder`] follows the usual order of a network traversal: primary inputs
//! first, then gates in topological order (each over already converted signals),
//! and outputs last.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Fraig, FraigHandle, Result, sat::SatSolver};

/// Operator of a network gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    Const0,
    Const1,
    Buf,
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
}

impl GateKind {
    /// Checks the number of fanins: none for constants, one for buffers and
    /// inverters, at least one for the others.
    fn check_arity(self, n: usize) -> std::result::Result<(), NetworkError> {
        let (ok, expected) = match self {
            GateKind::Const0 | GateKind::Const1 => (n == 0, "0"),
            GateKind::Buf | GateKind::Not => (n == 1, "1"),
            _ => (n >= 1, "at least 1"),
        };
        if ok {
            Ok(())
        } else {
            Err(NetworkError::WrongArity {
                kind: self,
                expected,
                got: n,
            })
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A converted signal of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(usize);

impl SignalId {
    /// The signal registered at the given position (inputs included).
    pub fn from_index(index: usize) -> Self {
        SignalId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    /// The signal has not been converted (yet).
    #[error("signal {0} is unknown, fanins must be converted before their fanouts")]
    UnknownSignal(usize),

    #[error("gate {kind} expects {expected} fanin(s), got {got}")]
    WrongArity {
        kind: GateKind,
        expected: &'static str,
        got: usize,
    },

    #[error("primary inputs must be registered before any gate")]
    InputAfterGate,

    #[error("gates cannot be added once outputs are being retrieved")]
    GateAfterOutput,
}

impl<S: SatSolver> Fraig<S> {
    /// Builds a gate of the given kind over the fanins.
    ///
    /// ```rust
    /// use fraig::{Fraig, network::GateKind};
    /// let mut fraig = Fraig::new();
    /// let a = fraig.make_input();
    /// let b = fraig.make_input();
    /// let f = fraig.make_gate(GateKind::Nor, &[a, b]).unwrap();
    /// assert_eq!(f, fraig.make_and(!a, !b));
    /// assert!(fraig.make_gate(GateKind::Not, &[a, b]).is_err());
    /// ```
    pub fn make_gate(&mut self, kind: GateKind, fanins: &[FraigHandle]) -> Result<FraigHandle> {
        kind.check_arity(fanins.len())?;
        let h = match kind {
            GateKind::Const0 => FraigHandle::zero(),
            GateKind::Const1 => FraigHandle::one(),
            GateKind::Buf => self.make_buff(fanins[0]),
            GateKind::Not => self.make_not(fanins[0]),
            GateKind::And => self.make_and_n(fanins),
            GateKind::Nand => self.make_nand_n(fanins),
            GateKind::Or => self.make_or_n(fanins),
            GateKind::Nor => self.make_nor_n(fanins),
            GateKind::Xor => self.make_xor_n(fanins),
            GateKind::Xnor => self.make_xnor_n(fanins),
        };
        Ok(h)
    }
}

/// Converts one network into a [`Fraig`].
///
/// Several networks can be converted into the same FRAIG over the same inputs,
/// see [`NetworkBuilder::with_inputs`].
pub struct NetworkBuilder<'a, S: SatSolver> {
    fraig: &'a mut Fraig<S>,
    signals: Vec<FraigHandle>,
    outputs: Vec<FraigHandle>,
    has_gates: bool,
}

impl<'a, S: SatSolver> NetworkBuilder<'a, S> {
    pub fn new(fraig: &'a mut Fraig<S>) -> Self {
        NetworkBuilder {
            fraig,
            signals: Vec::new(),
            outputs: Vec::new(),
            has_gates: false,
        }
    }

    /// Starts a network whose first signals are existing handles, typically
    /// the primary inputs shared with a previously converted network.
    pub fn with_inputs(fraig: &'a mut Fraig<S>, inputs: &[FraigHandle]) -> Self {
        let mut builder = NetworkBuilder::new(fraig);
        builder.signals.extend_from_slice(inputs);
        builder
    }

    /// Registers a new primary input.
    pub fn add_input(&mut self) -> Result<SignalId> {
        if self.has_gates || !self.outputs.is_empty() {
            return Err(NetworkError::InputAfterGate.into());
        }
        let h = self.fraig.make_input();
        Ok(self.push(h))
    }

    /// Converts a gate whose fanins have already been converted.
    pub fn add_gate(&mut self, kind: GateKind, fanins: &[SignalId]) -> Result<SignalId> {
        if !self.outputs.is_empty() {
            return Err(NetworkError::GateAfterOutput.into());
        }
        let handles = fanins
            .iter()
            .map(|&s| self.get_handle(s))
            .collect::<Result<Vec<_>>>()?;
        let h = self.fraig.make_gate(kind, &handles)?;
        self.has_gates = true;
        log::trace!("gate {} {:?} -> {}", kind, fanins, h);
        Ok(self.push(h))
    }

    /// Marks a converted signal as a primary output.
    pub fn add_output(&mut self, signal: SignalId) -> Result<FraigHandle> {
        let h = self.get_handle(signal)?;
        self.outputs.push(h);
        Ok(h)
    }

    pub fn get_handle(&self, signal: SignalId) -> Result<FraigHandle> {
        self.signals
            .get(signal.0)
            .copied()
            .ok_or(NetworkError::UnknownSignal(signal.0).into())
    }

    pub fn get_fraig(&self) -> &Fraig<S> {
        self.fraig
    }

    /// Output handles, in registration order.
    pub fn finish(self) -> Vec<FraigHandle> {
        self.outputs
    }

    fn push(&mut self, h: FraigHandle) -> SignalId {
        self.signals.push(h);
        SignalId(self.signals.len() - 1)
    }
}
