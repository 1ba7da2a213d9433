//! Recipe configuration.
//!
//! Strategy and decomposition method are closed enumerations; unknown names
//! are rejected when parsed, whether from a string or from a config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RecipeError, RecipeResult};

/// Highest supported resynthesis optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// How the insertion anchor is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    /// First pair of two-qubit gates sharing exactly one qubit.
    #[default]
    Concatenated,
    /// A uniformly drawn two-qubit gate.
    Random,
}

impl Strategy {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concatenated => "concatenated",
            Self::Random => "random",
        }
    }
}

impl FromStr for Strategy {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concatenated" => Ok(Self::Concatenated),
            "random" => Ok(Self::Random),
            other => Err(RecipeError::UnknownStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = RecipeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Strategy> for String {
    fn from(value: Strategy) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How matrix-defined gates are expanded after conjugation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DecompositionMethod {
    /// One level of structural decomposition.
    #[default]
    Default,
    /// The same expansion, run through a pass manager.
    Kak,
    /// Full translation into `cx` and `u`.
    Basis,
}

impl DecompositionMethod {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Kak => "kak",
            Self::Basis => "basis",
        }
    }
}

impl FromStr for DecompositionMethod {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "kak" => Ok(Self::Kak),
            "basis" => Ok(Self::Basis),
            other => Err(RecipeError::UnknownDecompositionMethod(other.to_string())),
        }
    }
}

impl TryFrom<String> for DecompositionMethod {
    type Error = RecipeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DecompositionMethod> for String {
    fn from(value: DecompositionMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DecompositionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for one recipe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeConfig {
    /// Whether a benchmark suite should apply the recipe at all.
    pub enabled: bool,
    /// Number of rounds.
    pub iterations: usize,
    /// Anchor selection strategy.
    pub strategy: Strategy,
    /// Expansion method for matrix-defined gates.
    pub decomposition_method: DecompositionMethod,
    /// Resynthesis aggressiveness, 0 to 3.
    pub optimization_level: u8,
    /// Base seed; round `i` uses `seed + i`.
    pub seed: Option<u64>,
    /// Leave out the resynthesis stage.
    pub skip_synthesize: bool,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            iterations: 1,
            strategy: Strategy::Concatenated,
            decomposition_method: DecompositionMethod::Default,
            optimization_level: MAX_OPTIMIZATION_LEVEL,
            seed: None,
            skip_synthesize: false,
        }
    }
}

impl RecipeConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rounds.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the anchor selection strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the decomposition method.
    #[must_use]
    pub fn with_decomposition_method(mut self, method: DecompositionMethod) -> Self {
        self.decomposition_method = method;
        self
    }

    /// Set the resynthesis optimization level.
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }

    /// Set the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Skip or run the resynthesis stage.
    #[must_use]
    pub fn with_skip_synthesize(mut self, skip: bool) -> Self {
        self.skip_synthesize = skip;
        self
    }

    /// Mark the configuration as enabled for suite runs.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check the settings that enums cannot rule out.
    pub fn validate(&self) -> RecipeResult<()> {
        if self.optimization_level > MAX_OPTIMIZATION_LEVEL {
            return Err(RecipeError::InvalidOptimizationLevel(
                self.optimization_level,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecipeConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.iterations, 1);
        assert_eq!(config.strategy, Strategy::Concatenated);
        assert_eq!(config.decomposition_method, DecompositionMethod::Default);
        assert_eq!(config.optimization_level, 3);
        assert_eq!(config.seed, None);
        assert!(!config.skip_synthesize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("random".parse::<Strategy>().unwrap(), Strategy::Random);
        assert_eq!(
            "kak".parse::<DecompositionMethod>().unwrap(),
            DecompositionMethod::Kak
        );
        assert!(matches!(
            "bogus".parse::<Strategy>(),
            Err(RecipeError::UnknownStrategy(s)) if s == "bogus"
        ));
        assert!(matches!(
            "qsd".parse::<DecompositionMethod>(),
            Err(RecipeError::UnknownDecompositionMethod(_))
        ));
        // Names are case-sensitive.
        assert!("Random".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_level_out_of_range() {
        let config = RecipeConfig::new().with_optimization_level(4);
        assert!(matches!(
            config.validate(),
            Err(RecipeError::InvalidOptimizationLevel(4))
        ));
    }

    #[test]
    fn test_serde_partial_config() {
        let config: RecipeConfig =
            serde_json::from_str(r#"{"iterations": 3, "strategy": "random", "seed": 42}"#).unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.optimization_level, 3);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""decomposition_method":"default""#));
    }

    #[test]
    fn test_serde_rejects_unknown_names() {
        let err = serde_json::from_str::<RecipeConfig>(r#"{"strategy": "bogus"}"#).unwrap_err();
        assert!(err.to_string().contains("Unknown strategy 'bogus'"));
    }
}
