//! Expansion of matrix-defined gates after conjugation.

use tracing::debug;
use unopt_compile::passes::{BasisTranslation, Decompose, UnrollCustomDefinitions};
use unopt_compile::{BasisGates, CompileResult, Pass, PassManager, PropertySet};
use unopt_ir::Circuit;

use crate::config::DecompositionMethod;

/// Expand `circuit` with `method`, returning a new circuit.
///
/// `Default` and `Kak` expand one level; `Basis` translates everything into
/// `cx` and `u` and fails on opaque gates.
pub fn decompose(circuit: &Circuit, method: DecompositionMethod) -> CompileResult<Circuit> {
    let mut out = circuit.clone();

    match method {
        DecompositionMethod::Default => {
            Decompose::new().run(&mut out, &mut PropertySet::new())?;
        }
        DecompositionMethod::Kak => {
            let mut pm = PassManager::new();
            pm.add_pass(Decompose::new());
            pm.run(&mut out, &mut PropertySet::new())?;
        }
        DecompositionMethod::Basis => {
            let mut pm = PassManager::new();
            pm.add_pass(UnrollCustomDefinitions);
            pm.add_pass(BasisTranslation);
            let mut props = PropertySet::new().with_basis(BasisGates::cx_u());
            pm.run(&mut out, &mut props)?;
        }
    }

    debug!(
        "Decomposition ({}) took {} instructions to {}",
        method,
        circuit.len(),
        out.len()
    );
    Ok(out)
}
