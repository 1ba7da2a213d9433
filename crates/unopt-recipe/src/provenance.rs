//! Provenance header for generated circuit files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RecipeConfig;

/// Where a generated circuit came from and which settings produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Originating source file.
    pub source: String,
    /// Number of rounds.
    pub iterations: usize,
    /// Strategy name.
    pub strategy: String,
    /// Decomposition method name.
    pub decomposition: String,
    /// Resynthesis optimization level.
    pub optimization_level: u8,
    /// Base seed, if any.
    pub seed: Option<u64>,
    /// Tool that wrote the file.
    pub generator: Option<String>,
}

impl Provenance {
    /// Record `config` as applied to `source`.
    pub fn new(source: impl Into<String>, config: &RecipeConfig) -> Self {
        Self {
            source: source.into(),
            iterations: config.iterations,
            strategy: config.strategy.to_string(),
            decomposition: config.decomposition_method.to_string(),
            optimization_level: config.optimization_level,
            seed: config.seed,
            generator: None,
        }
    }

    /// Name the tool that wrote the file.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Header text without comment markers, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let seed = self
            .seed
            .map_or_else(|| "None".to_string(), |s| s.to_string());
        let mut lines = vec![
            format!("Elementary unoptimization applied to {}", self.source),
            format!(
                "iterations={}, strategy={}, decomposition={}, opt_level={}, seed={}",
                self.iterations, self.strategy, self.decomposition, self.optimization_level, seed
            ),
        ];
        if let Some(generator) = &self.generator {
            lines.push(format!("Generated via {generator}"));
        }
        lines
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "// {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecompositionMethod, Strategy};

    #[test]
    fn test_header_without_seed() {
        let config = RecipeConfig::new().with_iterations(2);
        let header = Provenance::new("qft_n4.qasm", &config).to_string();
        assert_eq!(
            header,
            "// Elementary unoptimization applied to qft_n4.qasm\n\
             // iterations=2, strategy=concatenated, decomposition=default, opt_level=3, seed=None\n"
        );
    }

    #[test]
    fn test_header_with_seed_and_generator() {
        let config = RecipeConfig::new()
            .with_strategy(Strategy::Random)
            .with_decomposition_method(DecompositionMethod::Kak)
            .with_optimization_level(1)
            .with_seed(42);
        let lines = Provenance::new("ghz.qasm", &config)
            .with_generator("unopt generate")
            .lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "iterations=1, strategy=random, decomposition=kak, opt_level=1, seed=42"
        );
        assert_eq!(lines[2], "Generated via unopt generate");
    }
}
