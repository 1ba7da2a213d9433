//! unopt command-line interface.
//!
//! Regenerates "unoptimized" benchmark circuits: each input circuit is run
//! through the elementary unoptimization recipe and written back as
//! OpenQASM 2 with a provenance header.
//!
//! ```text
//! unopt generate -i qft_N10.qasm -o qft_N10_unopt.qasm --iterations 2 --seed 42
//! unopt batch --config benchmarks/unopt.yaml
//! unopt stats -i qft_N10_unopt.qasm
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::RecipeOverrides;
use commands::{batch, generate, stats};

/// unopt - inflate quantum circuits into equivalent, harder-to-compile ones
#[derive(Parser)]
#[command(name = "unopt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unoptimize one circuit
    Generate {
        /// Input file (OpenQASM 2)
        #[arg(short, long)]
        input: String,

        /// Output file (defaults to <input stem>_unopt.qasm)
        #[arg(short, long)]
        output: Option<String>,

        /// Recipe settings file (YAML or JSON); flags override its values
        #[arg(short, long)]
        config: Option<String>,

        #[command(flatten)]
        overrides: RecipeOverrides,

        /// Check the result against the input (12 qubits at most)
        #[arg(long)]
        verify: bool,
    },

    /// Regenerate every (source, target) pair listed in a task file
    Batch {
        /// Task file (YAML or JSON)
        #[arg(short, long)]
        config: String,

        #[command(flatten)]
        overrides: RecipeOverrides,

        /// Check each result against its source (12 qubits at most)
        #[arg(long)]
        verify: bool,
    },

    /// Print size metrics of a circuit
    Stats {
        /// Input file (OpenQASM 2)
        #[arg(short, long)]
        input: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            overrides,
            verify,
        } => generate::execute(&input, output.as_deref(), config.as_deref(), &overrides, verify),

        Commands::Batch {
            config,
            overrides,
            verify,
        } => batch::execute(&config, &overrides, verify),

        Commands::Stats { input, format } => stats::execute(&input, &format),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
