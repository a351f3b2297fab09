use serde::Serialize;
use thiserror::Error;

use crate::{EquivResult, Fraig, FraigHandle, Result, sat::SatSolver};

/// Error returned when an operation related to the miter fails.
#[derive(Debug, Error)]
pub enum MiterError {
    /// Creation of a miter failed because the two networks have a different number of outputs.
    #[error("trying to construct a miter between networks with {0} and {1} outputs")]
    MiterDifferentOutputs(usize, usize),
}

/// The struct used to perform combinational equivalence checking between two networks
/// converted into the same [`Fraig`], over the same primary inputs.
///
/// For background on what is a miter, please check
/// [Verification of large synthesized designs](https://doi.org/10.1109/ICCAD.1993.580110) by D. Brand.
///
/// Outputs are paired by position and checked one pair at a time. Pairs checked later
/// benefit from the internal equivalences proven while checking earlier ones.
///
/// ```rust
/// use fraig::{Fraig, miter::Miter};
/// let mut fraig = Fraig::new();
/// let a = fraig.make_input();
/// let b = fraig.make_input();
/// let f = fraig.make_xor(a, b);
/// let t0 = fraig.make_or(a, b);
/// let t1 = fraig.make_nand(a, b);
/// let g = fraig.make_and(t0, t1);
/// let miter = Miter::new(&[f, a], &[g, a]).unwrap();
/// assert!(miter.check(&mut fraig).is_equivalent());
/// ```
#[derive(Debug, Clone)]
pub struct Miter {
    pairs: Vec<(FraigHandle, FraigHandle)>,
}

/// Result of a miter check, one entry per checked output pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiterReport {
    pub results: Vec<EquivResult>,
    /// Set if the check was aborted before all pairs were checked.
    pub aborted: bool,
}

impl MiterReport {
    /// True if every output pair has been proven equivalent.
    pub fn is_equivalent(&self) -> bool {
        !self.aborted && self.results.iter().all(|r| r.is_equivalent())
    }

    /// Position of the first output pair proven different, if any.
    pub fn first_difference(&self) -> Option<usize> {
        self.results
            .iter()
            .position(|&r| r == EquivResult::NotEquivalent)
    }
}

impl Miter {
    /// Pairs `outputs_a[i]` with `outputs_b[i]`.
    pub fn new(outputs_a: &[FraigHandle], outputs_b: &[FraigHandle]) -> Result<Self> {
        if outputs_a.len() != outputs_b.len() {
            let error = MiterError::MiterDifferentOutputs(outputs_a.len(), outputs_b.len());
            return Err(error.into());
        }
        Ok(Miter {
            pairs: outputs_a.iter().copied().zip(outputs_b.iter().copied()).collect(),
        })
    }

    pub fn get_pairs(&self) -> &[(FraigHandle, FraigHandle)] {
        &self.pairs
    }

    /// Checks every output pair.
    pub fn check<S: SatSolver>(&self, fraig: &mut Fraig<S>) -> MiterReport {
        self.check_until(fraig, || false)
    }

    /// Checks the output pairs in order, calling `abort` before each of them:
    /// the check stops as soon as it returns true.
    pub fn check_until<S: SatSolver>(
        &self,
        fraig: &mut Fraig<S>,
        mut abort: impl FnMut() -> bool,
    ) -> MiterReport {
        let mut results = Vec::with_capacity(self.pairs.len());
        for (i, &(a, b)) in self.pairs.iter().enumerate() {
            if abort() {
                log::info!("miter check aborted after {} of {} pairs", i, self.pairs.len());
                return MiterReport {
                    results,
                    aborted: true,
                };
            }
            let result = fraig.check_equiv(a, b);
            log::debug!("output {}: {} vs {} -> {:?}", i, a, b, result);
            results.push(result);
        }
        MiterReport {
            results,
            aborted: false,
        }
    }
}
