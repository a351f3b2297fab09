//! Bit-parallel random simulation.
//!
//! Every node carries a signature: one bit per simulation pattern, 64 patterns per word.
//! Inputs get (pseudo-)random words, AND gates the bitwise AND of their fanin words
//! (complemented along complemented edges). Two nodes with different signatures
//! are known to be different, two nodes with the same signature are only candidates.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{Fraig, FraigHandle, NodeId, NodeKind, config::FraigConfig, sat::Model, sat::SatSolver};

/// Word of a handle, given the words of all the nodes for a pattern batch.
pub fn handle_word(words: &[u64], handle: FraigHandle) -> u64 {
    let word = match handle.node {
        Some(id) => words[id],
        None => 0,
    };
    if handle.complement { !word } else { word }
}

/// Draws `len` words from `next_word` until they are neither all 0 nor all 1.
fn non_constant_signature(len: usize, mut next_word: impl FnMut() -> u64) -> Vec<u64> {
    loop {
        let signature: Vec<u64> = (0..len).map(|_| next_word()).collect();
        let all_zero = signature.iter().all(|&w| w == 0);
        let all_one = signature.iter().all(|&w| w == !0);
        if !all_zero && !all_one {
            return signature;
        }
    }
}

/// Source of the simulation patterns.
#[derive(Debug)]
pub struct Simulator {
    rng: Xoshiro256PlusPlus,
    /// Number of words of every signature.
    words: usize,
    flip_per_mille: u32,
}

impl Simulator {
    pub fn new(config: &FraigConfig) -> Self {
        Simulator {
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            words: config.sig_words.max(1),
            flip_per_mille: config.cex_flip_per_mille.min(1000),
        }
    }

    pub fn get_words(&self) -> usize {
        self.words
    }

    pub fn random_word(&mut self) -> u64 {
        self.rng.r#gen::<u64>()
    }

    /// A fresh random signature for a new input.
    ///
    /// All-0 and all-1 signatures are drawn again: they would make the input look constant.
    pub fn random_signature(&mut self) -> Vec<u64> {
        let words = self.words;
        non_constant_signature(words, || self.random_word())
    }

    /// Word of an input for a counterexample pattern.
    ///
    /// Bit 0 holds the exact value from the model. Every other bit copies it, and is then
    /// flipped with a small probability, to explore the neighbourhood of the counterexample.
    /// Inputs the model says nothing about get a random word.
    pub fn counterexample_word(&mut self, value: Option<bool>) -> u64 {
        let Some(value) = value else {
            return self.random_word();
        };
        let mut word = if value { !0 } else { 0 };
        for bit in 1..64 {
            if self.rng.gen_range(0..1000) < self.flip_per_mille {
                word ^= 1 << bit;
            }
        }
        word
    }

    fn grow(&mut self) {
        self.words += 1;
    }
}

impl<S: SatSolver> Fraig<S> {
    /// Signature of `fanin0 & fanin1`, over all the current words.
    pub(crate) fn and_signature(&self, fanin0: FraigHandle, fanin1: FraigHandle) -> Vec<u64> {
        (0..self.sim.get_words())
            .map(|w| self.signature_word(fanin0, w) & self.signature_word(fanin1, w))
            .collect()
    }

    fn signature_word(&self, handle: FraigHandle, w: usize) -> u64 {
        let word = match handle.node {
            Some(id) => self.nodes[id].signature[w],
            None => 0,
        };
        if handle.complement { !word } else { word }
    }

    /// Appends one word to every signature, inputs getting the words returned by `input_word`.
    fn append_word(&mut self, mut input_word: impl FnMut(&mut Self, NodeId) -> u64) {
        let w = self.sim.get_words();
        for id in 0..self.nodes.len() {
            let word = match self.nodes[id].get_kind() {
                NodeKind::Input(_) => input_word(self, id),
                NodeKind::And { fanin0, fanin1 } => {
                    self.signature_word(fanin0, w) & self.signature_word(fanin1, w)
                }
            };
            self.nodes[id].signature.push(word);
        }
        self.sim.grow();
    }

    /// Runs one round of random simulation: 64 more random patterns for every node.
    ///
    /// The pattern hash table is keyed by whole signatures, so it is rebuilt afterwards.
    pub fn simulate_round(&mut self) {
        let start = Instant::now();
        self.append_word(|fraig, _| fraig.sim.random_word());
        self.stats.sim_rounds += 1;
        self.stats.sim_time += start.elapsed();
        self.pathash.rehash(&self.nodes);
    }

    /// Appends the input assignment of a SAT model as a new pattern batch,
    /// so that the pair it distinguished never shares a signature again.
    pub(crate) fn add_counterexample(&mut self, model: &Model) {
        let start = Instant::now();
        self.append_word(|fraig, id| {
            let value = fraig.cnf.var_of(id).and_then(|var| model.value(var));
            fraig.sim.counterexample_word(value)
        });
        self.stats.counterexamples += 1;
        self.stats.sim_time += start.elapsed();
        self.pathash.rehash(&self.nodes);
    }

    /// Number of words of every signature.
    pub fn get_sig_words(&self) -> usize {
        self.sim.get_words()
    }

    /// Simulates the graph on one pattern word per input, returning one word per node.
    ///
    /// Panics if there is not exactly one word per input.
    pub fn simulate(&self, input_words: &[u64]) -> Vec<u64> {
        assert_eq!(
            input_words.len(),
            self.inputs.len(),
            "Hey, you are trying to simulate {} inputs with {} words.",
            self.inputs.len(),
            input_words.len()
        );
        let mut words = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let word = match node.get_kind() {
                NodeKind::Input(input_id) => input_words[input_id],
                NodeKind::And { fanin0, fanin1 } => {
                    handle_word(&words, fanin0) & handle_word(&words, fanin1)
                }
            };
            words.push(word);
        }
        words
    }

    /// Evaluates a handle under a complete input assignment.
    pub fn eval(&self, handle: FraigHandle, assignment: &[bool]) -> bool {
        let input_words: Vec<u64> = assignment
            .iter()
            .map(|&value| if value { !0 } else { 0 })
            .collect();
        let words = self.simulate(&input_words);
        handle_word(&words, handle) & 1 == 1
    }
}
