//! Unitary equivalence checks for small circuits.

use rustc_hash::FxHashSet;
use unopt_ir::{Circuit, InstructionKind, MAX_DENSE_QUBITS, Operator, QubitId};

use crate::error::RecipeResult;

/// Whether `before` and `after` implement the same unitary up to global phase.
///
/// Final measurements are ignored. Circuits wider than
/// [`MAX_DENSE_QUBITS`] are refused with [`unopt_ir::IrError::TooManyQubits`];
/// circuits of different width are never equivalent.
pub fn verify_equivalence(before: &Circuit, after: &Circuit, tol: f64) -> RecipeResult<bool> {
    for circuit in [before, after] {
        if circuit.num_qubits() > MAX_DENSE_QUBITS {
            return Err(unopt_ir::IrError::TooManyQubits {
                num_qubits: circuit.num_qubits(),
                max: MAX_DENSE_QUBITS,
            }
            .into());
        }
    }
    if before.num_qubits() != after.num_qubits() {
        return Ok(false);
    }

    let lhs = Operator::from_circuit(&strip_final_measurements(before)?)?;
    let rhs = Operator::from_circuit(&strip_final_measurements(after)?)?;
    Ok(lhs.equiv(&rhs, tol))
}

/// Drop measurements with no later operation on any of their qubits.
fn strip_final_measurements(circuit: &Circuit) -> RecipeResult<Circuit> {
    let mut busy: FxHashSet<QubitId> = FxHashSet::default();
    let mut kept = Vec::with_capacity(circuit.len());
    for inst in circuit.instructions().iter().rev() {
        match inst.kind {
            InstructionKind::Measure if inst.qubits.iter().all(|q| !busy.contains(q)) => {}
            InstructionKind::Barrier => kept.push(inst.clone()),
            _ => {
                busy.extend(inst.qubits.iter().copied());
                kept.push(inst.clone());
            }
        }
    }
    kept.reverse();
    Ok(circuit.with_instructions(kept)?)
}
