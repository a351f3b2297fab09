#![allow(dead_code)]

use fraig::{Fraig, FraigHandle, SatSolver, sim::handle_word};
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Exhaustive truth table of a handle, 64 assignments per word.
/// Assignment `m` gives input `i` the value of bit `i` of `m`.
pub fn truth_table<S: SatSolver>(fraig: &Fraig<S>, h: FraigHandle) -> Vec<u64> {
    let n = fraig.input_num();
    let patterns = 1usize << n;
    (0..patterns.div_ceil(64))
        .map(|batch| {
            let words: Vec<u64> = (0..n)
                .map(|i| {
                    let mut w = 0u64;
                    for bit in 0..64 {
                        let m = batch * 64 + bit;
                        if m < patterns && (m >> i) & 1 == 1 {
                            w |= 1 << bit;
                        }
                    }
                    w
                })
                .collect();
            let values = fraig.simulate(&words);
            let word = handle_word(&values, h);
            if patterns < 64 {
                word & ((1u64 << patterns) - 1)
            } else {
                word
            }
        })
        .collect()
}

/// Truth table of the complement of a function.
pub fn complement(tt: &[u64], n_inputs: usize) -> Vec<u64> {
    let patterns = 1usize << n_inputs;
    tt.iter()
        .map(|&w| {
            if patterns < 64 {
                !w & ((1u64 << patterns) - 1)
            } else {
                !w
            }
        })
        .collect()
}

/// Builds a random network of and/or/xor gates over fresh inputs.
/// Returns every handle built, inputs first.
pub fn random_network<S: SatSolver>(
    fraig: &mut Fraig<S>,
    rng: &mut Xoshiro256PlusPlus,
    n_inputs: usize,
    n_gates: usize,
) -> Vec<FraigHandle> {
    let mut handles: Vec<FraigHandle> = (0..n_inputs).map(|_| fraig.make_input()).collect();
    for _ in 0..n_gates {
        let a = handles[rng.gen_range(0..handles.len())];
        let b = handles[rng.gen_range(0..handles.len())];
        let a = if rng.gen_bool(0.5) { !a } else { a };
        let b = if rng.gen_bool(0.5) { !b } else { b };
        let h = match rng.gen_range(0..4) {
            0 | 1 => fraig.make_and(a, b),
            2 => fraig.make_or(a, b),
            _ => fraig.make_xor(a, b),
        };
        handles.push(h);
    }
    handles
}
