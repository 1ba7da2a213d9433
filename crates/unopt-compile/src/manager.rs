//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use unopt_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasisTranslation, CancelCX, OptimizationLoop, Optimize1qGates, RemoveIdentity,
    UnrollCustomDefinitions,
};
use crate::property::{BasisGates, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = %circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.len()
        );
        Ok(())
    }

    /// Names of the passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the preset resynthesis pipelines.
///
/// Every level unrolls and translates into the basis (`cx` and `u` unless set
/// otherwise); higher levels add optimization on top.
pub struct PassManagerBuilder {
    optimization_level: u8,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: unroll and translate only
    /// - Level 1: merge single-qubit runs
    /// - Level 2: also cancel adjacent `cx` pairs
    /// - Level 3: repeat merging, cancellation and identity removal until
    ///   the circuit stops shrinking
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis(mut self, basis_gates: BasisGates) -> Self {
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(mut self) -> (PassManager, PropertySet) {
        if self.properties.basis_gates.is_none() {
            self.properties.basis_gates = Some(BasisGates::cx_u());
        }

        let mut pm = PassManager::new();
        pm.add_pass(UnrollCustomDefinitions);
        pm.add_pass(BasisTranslation);

        if self.optimization_level >= 1 {
            pm.add_pass(Optimize1qGates::new());
        }
        if self.optimization_level >= 2 {
            pm.add_pass(CancelCX::new());
            pm.add_pass(Optimize1qGates::new());
        }
        if self.optimization_level >= 3 {
            pm.add_pass(
                OptimizationLoop::new()
                    .with_pass(Optimize1qGates::new())
                    .with_pass(CancelCX::new())
                    .with_pass(RemoveIdentity),
            );
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
