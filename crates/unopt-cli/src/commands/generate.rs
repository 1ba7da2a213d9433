//! Generate command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use unopt_recipe::{Recipe, RecipeConfig};

use super::common::{RecipeOverrides, load_settings, unoptimize_file, wrote_line};

/// Header attribution for files written by this command.
const GENERATOR: &str = "unopt generate";

/// Execute the generate command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    config: Option<&str>,
    overrides: &RecipeOverrides,
    verify: bool,
) -> Result<()> {
    let base = match config {
        Some(path) => load_settings::<RecipeConfig>(Path::new(path))?,
        None => RecipeConfig::default(),
    };
    let config = overrides.apply(base)?;
    let recipe = Recipe::new(config)?;

    let source = Path::new(input);
    let target = output.map_or_else(|| default_output(source), PathBuf::from);

    println!(
        "{} Unoptimizing {} ({} rounds, {})",
        style("→").cyan().bold(),
        style(input).green(),
        recipe.config().iterations,
        style(recipe.config().strategy).yellow()
    );

    let result = unoptimize_file(&recipe, source, input, &target, GENERATOR, verify)?;

    let skipped = result.report.skipped();
    if skipped > 0 {
        println!(
            "  {} {skipped} of {} rounds skipped",
            style("!").yellow().bold(),
            result.report.rounds.len()
        );
    }
    if verify {
        println!("  {} Equivalent to source", style("✓").green().bold());
    }
    println!("{}", wrote_line(&target, &result.circuit));

    Ok(())
}

/// `<dir>/<stem>_unopt.qasm` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_unopt.qasm"))
}
