//! Configuration types for property execution and shrinking.

use thiserror::Error;

/// Number of tries a property runs with by default
pub const DEFAULT_TRIES: usize = 1000;

/// Default upper bound for generated collection sizes
pub const DEFAULT_COLLECTION_SIZE: usize = 255;

/// Step budget of [`ShrinkingMode::Bounded`]
pub const DEFAULT_SHRINKING_BOUND: usize = 1000;

/// Largest enumeration an exhaustive generator may produce by default
pub const DEFAULT_MAX_EXHAUSTIVE_COUNT: u64 = 1000;

/// Consecutive filter rejections after which generation gives up
pub const MAX_FILTER_MISSES: usize = 10_000;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid number of tries (must be > 0)
    #[error("invalid tries count: {0} (must be > 0)")]
    InvalidTries(usize),
    /// Invalid shrinking bound (must be > 0)
    #[error("invalid shrinking bound: {0} (must be > 0)")]
    InvalidShrinkingBound(usize),
    /// Invalid exhaustive ceiling (must be > 0)
    #[error("invalid max exhaustive count: {0} (must be > 0)")]
    InvalidMaxExhaustiveCount(u64),
    /// Probability outside of [0, 1]
    #[error("invalid edge case probability: {0} (must be within [0, 1])")]
    InvalidEdgeCaseProbability(f64),
}

/// How far a falsified sample is shrunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShrinkingMode {
    /// Report the original sample
    Off,
    /// Stop after a fixed number of accepted shrinking steps
    #[default]
    Bounded,
    /// Shrink until no candidate reproduces the failure
    Full,
}

/// How parameter values are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Enumerate exhaustively when the space is not larger than the tries,
    /// generate randomly otherwise
    #[default]
    Auto,
    /// Always generate randomly
    Randomized,
    /// Enumerate exhaustively, falling back to random generation when no
    /// exhaustive generator is available
    Exhaustive,
}

/// Configuration for a single property run
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyConfig {
    /// Number of trials to execute
    pub tries: usize,
    /// Optional seed for reproducible runs
    pub seed: Option<u64>,
    /// Shrinking policy applied to a falsified sample
    pub shrinking: ShrinkingMode,
    /// Step budget used when `shrinking` is [`ShrinkingMode::Bounded`]
    pub shrinking_bound: usize,
    /// Random or exhaustive generation
    pub generation: GenerationMode,
    /// Ceiling above which exhaustive generation is not attempted
    pub max_exhaustive_count: u64,
    /// Chance of drawing a value from the edge case bank
    pub edge_case_probability: f64,
    /// Invalid trials tolerated per try before the run is aborted
    pub max_discard_ratio: usize,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
            seed: None,
            shrinking: ShrinkingMode::default(),
            shrinking_bound: DEFAULT_SHRINKING_BOUND,
            generation: GenerationMode::default(),
            max_exhaustive_count: DEFAULT_MAX_EXHAUSTIVE_COUNT,
            edge_case_probability: 0.05,
            max_discard_ratio: 5,
        }
    }
}

impl PropertyConfig {
    /// Create a new property configuration with validation
    pub fn new(
        tries: usize,
        seed: Option<u64>,
        shrinking: ShrinkingMode,
        generation: GenerationMode,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            tries,
            seed,
            shrinking,
            generation,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the property configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tries == 0 {
            return Err(ConfigError::InvalidTries(self.tries));
        }
        if self.shrinking_bound == 0 {
            return Err(ConfigError::InvalidShrinkingBound(self.shrinking_bound));
        }
        if self.max_exhaustive_count == 0 {
            return Err(ConfigError::InvalidMaxExhaustiveCount(
                self.max_exhaustive_count,
            ));
        }
        if !(0.0..=1.0).contains(&self.edge_case_probability) {
            return Err(ConfigError::InvalidEdgeCaseProbability(
                self.edge_case_probability,
            ));
        }
        Ok(())
    }

    pub fn with_tries(mut self, tries: usize) -> Self {
        self.tries = tries;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shrinking(mut self, shrinking: ShrinkingMode) -> Self {
        self.shrinking = shrinking;
        self
    }

    pub fn with_shrinking_bound(mut self, bound: usize) -> Self {
        self.shrinking_bound = bound;
        self
    }

    pub fn with_generation(mut self, generation: GenerationMode) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_max_exhaustive_count(mut self, max_count: u64) -> Self {
        self.max_exhaustive_count = max_count;
        self
    }

    pub fn with_edge_case_probability(mut self, probability: f64) -> Self {
        self.edge_case_probability = probability;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PropertyConfig::default();
        assert_eq!(config.tries, 1000);
        assert_eq!(config.shrinking, ShrinkingMode::Bounded);
        assert_eq!(config.shrinking_bound, 1000);
        assert_eq!(config.generation, GenerationMode::Auto);
        assert_eq!(config.max_exhaustive_count, 1000);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            PropertyConfig::new(0, None, ShrinkingMode::Full, GenerationMode::Auto),
            Err(ConfigError::InvalidTries(0))
        );

        let config = PropertyConfig::default().with_shrinking_bound(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidShrinkingBound(0))
        );

        let config = PropertyConfig::default().with_max_exhaustive_count(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMaxExhaustiveCount(0))
        );

        let config = PropertyConfig::default().with_edge_case_probability(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEdgeCaseProbability(_))
        ));
    }

    #[test]
    fn test_config_builders() {
        let config = PropertyConfig::default()
            .with_tries(50)
            .with_seed(42)
            .with_shrinking(ShrinkingMode::Full)
            .with_generation(GenerationMode::Randomized);

        assert_eq!(config.tries, 50);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.shrinking, ShrinkingMode::Full);
        assert_eq!(config.generation, GenerationMode::Randomized);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidTries(0).to_string(),
            "invalid tries count: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidShrinkingBound(0).to_string(),
            "invalid shrinking bound: 0 (must be > 0)"
        );
    }
}
