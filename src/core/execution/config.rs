/// Configuration for logicgraph simulation runs
///
/// This module provides the knobs controlling how the fixed-point evaluation runs: the round
/// cap and whether gates are evaluated sequentially or in parallel.

/// Round cap used when nothing else is configured
pub const DEFAULT_MAX_ROUNDS: usize = 100;

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Gates are evaluated in circuit order; each sees values written earlier in the same round
    #[default]
    Sequential,
    /// Gates are evaluated in parallel using Rayon against the previous round's values,
    /// then all results are applied at once
    Rayon,
}

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Maximum number of propagation rounds before giving up on convergence
    pub max_rounds: usize,
    /// Raise the cap to the number of evaluable nodes plus one when that is larger
    pub adaptive_cap: bool,
    /// The concurrency mode to use for gate evaluation
    pub concurrency_mode: ConcurrencyMode,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    ///
    /// Default configuration uses Sequential mode and a fixed cap of 100 rounds
    pub fn new() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            adaptive_cap: false,
            concurrency_mode: ConcurrencyMode::default(),
        }
    }

    /// Set the fixed round cap
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Let the cap grow with circuit size
    ///
    /// Deep acyclic circuits need one round per level; with this set they are never reported
    /// as non-converging just because they are deeper than the fixed cap.
    pub fn with_adaptive_cap(mut self, adaptive: bool) -> Self {
        self.adaptive_cap = adaptive;
        self
    }

    /// Set the concurrency mode for the simulation
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Round cap for a circuit with `evaluable` gates, junctions and groups
    pub fn round_cap(&self, evaluable: usize) -> usize {
        if self.adaptive_cap {
            self.max_rounds.max(evaluable + 1)
        } else {
            self.max_rounds
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Sequential);
        assert_eq!(config.max_rounds, 100);
        assert!(!config.adaptive_cap);
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::new()
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_max_rounds(8)
            .with_adaptive_cap(true);

        assert_eq!(config.concurrency_mode, ConcurrencyMode::Rayon);
        assert_eq!(config.max_rounds, 8);
        assert!(config.adaptive_cap);
    }

    #[test]
    fn test_round_cap() {
        let fixed = SimulationConfig::new().with_max_rounds(10);
        assert_eq!(fixed.round_cap(500), 10);

        let adaptive = fixed.with_adaptive_cap(true);
        assert_eq!(adaptive.round_cap(500), 501);
        assert_eq!(adaptive.round_cap(3), 10);
    }
}
