//! Stats command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use unopt_ir::Circuit;

use super::common::load_circuit;

/// Size metrics of one circuit.
#[derive(Debug, Serialize)]
pub struct CircuitStats {
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub instructions: usize,
    pub depth: usize,
    pub two_qubit_gates: usize,
    pub ops: BTreeMap<String, usize>,
}

impl CircuitStats {
    pub fn of(circuit: &Circuit) -> Self {
        Self {
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            instructions: circuit.len(),
            depth: circuit.depth(),
            two_qubit_gates: circuit
                .instructions()
                .iter()
                .filter(|inst| inst.is_two_qubit_gate())
                .count(),
            ops: circuit.count_ops(),
        }
    }
}

/// Execute the stats command.
pub fn execute(input: &str, format: &str) -> Result<()> {
    let circuit = load_circuit(Path::new(input))?;
    let stats = CircuitStats::of(&circuit);

    match format.to_lowercase().as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        "table" => print_table(input, &stats),
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }
    Ok(())
}

fn print_table(input: &str, stats: &CircuitStats) {
    println!("{} {}", style("Circuit").bold(), style(input).green());
    println!("  Qubits:          {}", style(stats.num_qubits).cyan());
    println!("  Clbits:          {}", style(stats.num_clbits).cyan());
    println!("  Instructions:    {}", style(stats.instructions).cyan());
    println!("  Depth:           {}", style(stats.depth).cyan());
    println!("  Two-qubit gates: {}", style(stats.two_qubit_gates).cyan());
    println!("  Operations:");
    for (name, count) in &stats.ops {
        println!("    {name:<12} {count:>8}");
    }
}
