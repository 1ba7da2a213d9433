//! Unrolling and basis translation.

use tracing::debug;
use unopt_ir::{Circuit, Instruction, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::agnostic::decompose::{expand_once, with_condition};
use crate::property::{BasisGates, PropertySet};
use crate::synthesis::u_gate;

/// Expand definitions recursively until every gate is in the basis.
///
/// Single-qubit standard gates are left for [`BasisTranslation`]; opaque gates
/// have no definition and are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnrollCustomDefinitions;

impl Pass for UnrollCustomDefinitions {
    fn name(&self) -> &'static str {
        "UnrollCustomDefinitions"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        let mut out = Vec::with_capacity(circuit.len());
        for inst in circuit.instructions() {
            unroll(inst.clone(), basis, &mut out)?;
        }
        *circuit = circuit.with_instructions(out)?;
        Ok(())
    }
}

fn unroll(inst: Instruction, basis: &BasisGates, out: &mut Vec<Instruction>) -> CompileResult<()> {
    if !inst.is_gate() || basis.contains(inst.name()) {
        out.push(inst);
        return Ok(());
    }
    match expand_once(&inst)? {
        Some(replacement) => {
            for child in replacement {
                unroll(child, basis, out)?;
            }
        }
        None => out.push(inst),
    }
    Ok(())
}

/// Translate every gate into the target basis.
///
/// The basis must contain `cx` and `u`. Single-qubit gates outside it become
/// `u`; wider gates are unrolled first. Opaque gates outside the basis are an
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;
        if !basis.contains("cx") || !basis.contains("u") {
            return Err(CompileError::UnsupportedBasis(basis.gates().to_vec()));
        }

        let mut out = Vec::with_capacity(circuit.len());
        let mut translated = 0usize;
        for inst in circuit.instructions() {
            translated += translate(inst, basis, &mut out)?;
        }
        debug!("BasisTranslation rewrote {} gates", translated);

        *circuit = circuit.with_instructions(out)?;
        Ok(())
    }
}

/// Push the translation of `inst`; returns how many gates were rewritten.
fn translate(inst: &Instruction, basis: &BasisGates, out: &mut Vec<Instruction>) -> CompileResult<usize> {
    let Some(gate) = inst.as_gate() else {
        out.push(inst.clone());
        return Ok(0);
    };
    if basis.contains(gate.name()) {
        out.push(inst.clone());
        return Ok(0);
    }

    if let Some(u) = gate.as_standard().and_then(StandardGate::matrix_2x2) {
        let replacement = Instruction::single_qubit_gate(u_gate(&u), inst.qubits[0]);
        out.extend(with_condition(vec![replacement], gate.condition.as_ref()));
        return Ok(1);
    }

    let replacement =
        expand_once(inst)?.ok_or_else(|| CompileError::GateNotInBasis(gate.name().to_string()))?;
    let mut count = 1;
    for child in &replacement {
        count += translate(child, basis, out)?;
    }
    Ok(count)
}
