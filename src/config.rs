//! Tunable parameters of a [`Fraig`] session.
//!
//! [`Fraig`]: crate::Fraig

use serde::{Deserialize, Serialize};

/// Parameters of a FRAIG session.
///
/// ```rust
/// use fraig::FraigConfig;
/// let config = FraigConfig {
///     loop_limit: 8,
///     ..FraigConfig::default()
/// };
/// assert_eq!(config.sig_words, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraigConfig {
    /// Initial signature length, in 64-bit words (at least 1).
    pub sig_words: usize,
    /// Random simulation stops after this many consecutive rounds without any class split.
    pub loop_limit: usize,
    /// Seed of the simulation pattern generator.
    pub seed: u64,
    /// If set, every new AND gate is immediately reduced against constants and
    /// signature candidates, and [`make_and`] returns its representative.
    ///
    /// [`make_and`]: crate::Fraig::make_and
    pub reduce_on_build: bool,
    /// Probability (per mille) of flipping each extra bit of a counterexample word.
    pub cex_flip_per_mille: u32,
    /// Conflict budget handed to the SAT solver for every call, [`None`] for no limit.
    pub conflict_limit: Option<u64>,
}

impl Default for FraigConfig {
    fn default() -> Self {
        FraigConfig {
            sig_words: 2,
            loop_limit: 4,
            seed: 0,
            reduce_on_build: false,
            cex_flip_per_mille: 40,
            conflict_limit: None,
        }
    }
}

impl FraigConfig {
    /// Same as the default configuration, but reducing nodes as they are built.
    pub fn reducing() -> Self {
        FraigConfig {
            reduce_on_build: true,
            ..FraigConfig::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_config_from_json() {
        let config: FraigConfig =
            serde_json::from_str(r#"{ "loop_limit": 10, "seed": 42 }"#).unwrap();
        assert_eq!(config.loop_limit, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.sig_words, FraigConfig::default().sig_words);
        assert!(!config.reduce_on_build);
    }

    #[test]
    fn reducing_config() {
        assert!(FraigConfig::reducing().reduce_on_build);
    }
}
