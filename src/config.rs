//! Tuning knobs for simulation and fraiging.
//!
//! None of them affect correctness, only how fast the FEC groups converge.

use crate::sim::LANES;

/// Parameters of [`Aig::random_sim`] and [`Aig::fraig`].
///
/// ```rust
/// use aigreduce::FraigConfig;
/// let config = FraigConfig::default().with_seed(7).with_sat_batch_size(16);
/// assert_eq!(config.sat_batch_size, 16);
/// assert_eq!(config.stagnation_limit(0), 0);
/// ```
///
/// [`Aig::random_sim`]: crate::Aig::random_sim
/// [`Aig::fraig`]: crate::Aig::fraig
#[derive(Debug, Clone, PartialEq)]
pub struct FraigConfig {
    /// Number of SAT counterexamples collected before they are simulated and the
    /// pending merges are applied. At most 64 (one simulation lane per counterexample).
    pub sat_batch_size: usize,
    /// Random simulation gives up after `floor(stagnation_factor * ln(reachable + 1))`
    /// batches in a row that did not split any group.
    pub stagnation_factor: f64,
    /// Seed of the random pattern generator.
    pub seed: u64,
}

impl Default for FraigConfig {
    fn default() -> Self {
        FraigConfig {
            sat_batch_size: LANES,
            stagnation_factor: 5.0,
            seed: 0,
        }
    }
}

impl FraigConfig {
    /// Clamped to `1..=64`.
    pub fn with_sat_batch_size(mut self, size: usize) -> Self {
        self.sat_batch_size = size.clamp(1, LANES);
        self
    }

    pub fn with_stagnation_factor(mut self, factor: f64) -> Self {
        self.stagnation_factor = factor.max(0.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of non-splitting random batches tolerated for `reachable` nodes.
    pub fn stagnation_limit(&self, reachable: usize) -> usize {
        (self.stagnation_factor * ((reachable + 1) as f64).ln()) as usize
    }

    pub(crate) fn batch_size(&self) -> usize {
        self.sat_batch_size.clamp(1, LANES)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stagnation_limit() {
        let config = FraigConfig::default();
        assert_eq!(config.stagnation_limit(0), 0);
        // 5 * ln(11) = 11.98
        assert_eq!(config.stagnation_limit(10), 11);
        assert_eq!(config.with_stagnation_factor(0.0).stagnation_limit(1000), 0);
    }

    #[test]
    fn batch_size_is_clamped() {
        assert_eq!(FraigConfig::default().with_sat_batch_size(0).sat_batch_size, 1);
        assert_eq!(FraigConfig::default().with_sat_batch_size(100).sat_batch_size, 64);
        let raw = FraigConfig {
            sat_batch_size: 500,
            ..FraigConfig::default()
        };
        assert_eq!(raw.batch_size(), 64);
    }
}
