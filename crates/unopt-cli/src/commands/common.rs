//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use tracing::info;

use unopt_ir::Circuit;
use unopt_qasm::{emit_with_header, parse};
use unopt_recipe::{Provenance, Recipe, RecipeConfig, RecipeReport, verify_equivalence};

/// Tolerance for `--verify`, entrywise and up to global phase.
pub const VERIFY_TOLERANCE: f64 = 1e-9;

/// Recipe flags shared by `generate` and `batch`; each one overrides the
/// value loaded from a settings file.
#[derive(Args, Debug, Default, Clone)]
pub struct RecipeOverrides {
    /// Number of rounds
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Anchor selection strategy (concatenated, random)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Decomposition method (default, kak, basis)
    #[arg(long)]
    pub decomposition: Option<String>,

    /// Resynthesis optimization level (0-3)
    #[arg(long)]
    pub opt_level: Option<u8>,

    /// Base random seed (round i uses seed + i)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the resynthesis stage
    #[arg(long)]
    pub skip_synth: bool,
}

impl RecipeOverrides {
    /// Apply the flags on top of `config` and validate the result.
    pub fn apply(&self, mut config: RecipeConfig) -> Result<RecipeConfig> {
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = strategy.parse()?;
        }
        if let Some(method) = &self.decomposition {
            config.decomposition_method = method.parse()?;
        }
        if let Some(level) = self.opt_level {
            config.optimization_level = level;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.skip_synth {
            config.skip_synthesize = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Read a YAML or JSON settings file, chosen by extension.
pub fn load_settings<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON in {}", path.display())),
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML in {}", path.display())),
        other => anyhow::bail!(
            "Unsupported settings format '{other}' for {}. Use .yaml, .yml or .json",
            path.display()
        ),
    }
}

/// Load a circuit from an OpenQASM 2 file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    parse(&source).map_err(|e| anyhow::anyhow!("Parse error in {}: {e}", path.display()))
}

/// The result of unoptimizing one file.
pub struct Unoptimized {
    pub circuit: Circuit,
    pub report: RecipeReport,
}

/// Run `recipe` on `source` and write the result with a provenance header.
///
/// `label` is the source name recorded in the header.
pub fn unoptimize_file(
    recipe: &Recipe,
    source: &Path,
    label: &str,
    target: &Path,
    generator: &str,
    verify: bool,
) -> Result<Unoptimized> {
    let circuit = load_circuit(source)?;
    info!(
        "Loaded {}: {} qubits, {} ops",
        source.display(),
        circuit.num_qubits(),
        circuit.len()
    );

    let (unoptimized, report) = recipe
        .run_with_report(&circuit)
        .with_context(|| format!("Recipe failed on {}", source.display()))?;

    if verify {
        let equivalent = verify_equivalence(&circuit, &unoptimized, VERIFY_TOLERANCE)
            .with_context(|| format!("Cannot verify {}", source.display()))?;
        if !equivalent {
            anyhow::bail!(
                "Unoptimized circuit for {} is not equivalent to its source",
                source.display()
            );
        }
        info!("Verified {} against {}", target.display(), source.display());
    }

    let header = Provenance::new(label, recipe.config())
        .with_generator(generator)
        .lines();
    let qasm = emit_with_header(&unoptimized, &header)
        .map_err(|e| anyhow::anyhow!("Emit error for {}: {e}", target.display()))?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(target, qasm)
        .with_context(|| format!("Failed to write file: {}", target.display()))?;

    Ok(Unoptimized {
        circuit: unoptimized,
        report,
    })
}

/// The summary line printed for each written file.
pub fn wrote_line(target: &Path, circuit: &Circuit) -> String {
    format!(
        "Wrote {} (qubits={}, ops={})",
        target.display(),
        circuit.num_qubits(),
        circuit.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use unopt_recipe::{DecompositionMethod, Strategy};

    #[test]
    fn test_overrides_replace_file_values() {
        let base = RecipeConfig::new().with_iterations(5).with_seed(1);
        let overrides = RecipeOverrides {
            strategy: Some("random".into()),
            decomposition: Some("kak".into()),
            seed: Some(42),
            skip_synth: true,
            ..Default::default()
        };

        let config = overrides.apply(base).unwrap();
        assert_eq!(config.iterations, 5);
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.decomposition_method, DecompositionMethod::Kak);
        assert_eq!(config.seed, Some(42));
        assert!(config.skip_synthesize);
    }

    #[test]
    fn test_overrides_are_validated() {
        let overrides = RecipeOverrides {
            opt_level: Some(4),
            ..Default::default()
        };
        assert!(overrides.apply(RecipeConfig::new()).is_err());

        let overrides = RecipeOverrides {
            strategy: Some("greedy".into()),
            ..Default::default()
        };
        let err = overrides.apply(RecipeConfig::new()).unwrap_err();
        assert!(err.to_string().contains("greedy"));
    }

    #[test]
    fn test_wrote_line() {
        let circuit = Circuit::ghz(3).unwrap();
        assert_eq!(
            wrote_line(Path::new("out/ghz.qasm"), &circuit),
            "Wrote out/ghz.qasm (qubits=3, ops=3)"
        );
    }
}
