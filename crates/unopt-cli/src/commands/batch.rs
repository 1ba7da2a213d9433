//! Batch command implementation.
//!
//! A task file lists (source, target) pairs that share one recipe setting:
//!
//! ```yaml
//! recipe:
//!   iterations: 1
//!   strategy: concatenated
//!   decomposition_method: default
//!   optimization_level: 3
//!   seed: 42
//! tasks:
//!   - source: benchpress/qft_N100.qasm
//!     target: unoptimized/qft_N100_unopt.qasm
//! ```
//!
//! Relative paths resolve against the task file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use unopt_recipe::{Recipe, RecipeConfig};

use super::common::{RecipeOverrides, load_settings, unoptimize_file, wrote_line};

/// A task file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Recipe settings shared by every task.
    #[serde(default)]
    pub recipe: RecipeConfig,
    /// Attribution written into each header; defaults to the command line.
    #[serde(default)]
    pub generator: Option<String>,
    /// Files to regenerate, in order.
    pub tasks: Vec<CircuitTask>,
}

/// One file to unoptimize.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitTask {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Execute the batch command.
pub fn execute(config_path: &str, overrides: &RecipeOverrides, verify: bool) -> Result<()> {
    let path = Path::new(config_path);
    let batch: BatchConfig = load_settings(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let config = overrides.apply(batch.recipe)?;
    let recipe = Recipe::new(config)?;
    let generator = batch
        .generator
        .unwrap_or_else(|| format!("unopt batch --config {config_path}"));

    println!(
        "{} Regenerating {} circuits from {}",
        style("→").cyan().bold(),
        batch.tasks.len(),
        style(config_path).green()
    );

    let pb = create_progress_bar(batch.tasks.len() as u64)?;
    for (i, task) in batch.tasks.iter().enumerate() {
        let label = task.source.display().to_string();
        pb.set_message(label.clone());

        let source = base_dir.join(&task.source);
        let target = base_dir.join(&task.target);
        let result = unoptimize_file(&recipe, &source, &label, &target, &generator, verify)
            .with_context(|| format!("Task {} ({label}) failed", i + 1))?;

        let line = wrote_line(&task.target, &result.circuit);
        pb.suspend(|| println!("{line}"));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} {} circuits written",
        style("✓").green().bold(),
        batch.tasks.len()
    );
    Ok(())
}

fn create_progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}
