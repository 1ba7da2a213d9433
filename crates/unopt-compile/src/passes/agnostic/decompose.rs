//! One-level structural decomposition.

use tracing::debug;
use unopt_ir::{Circuit, ClassicalCondition, GateKind, Instruction};

use crate::definitions;
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis;

/// Replace every composite gate by its definition, one level deep.
///
/// Standard gates wider than `cx` expand into single-qubit gates and `cx`;
/// dense unitary gates are synthesized into `u` and `cx`. Elementary gates,
/// opaque gates and non-gate instructions are kept as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decompose;

impl Decompose {
    /// Create a new decomposition pass.
    pub fn new() -> Self {
        Self
    }
}

impl Pass for Decompose {
    fn name(&self) -> &'static str {
        "Decompose"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = Vec::with_capacity(circuit.len());
        let mut expanded = 0usize;

        for inst in circuit.instructions() {
            match expand_once(inst)? {
                Some(replacement) => {
                    expanded += 1;
                    out.extend(replacement);
                }
                None => out.push(inst.clone()),
            }
        }

        debug!("Decompose expanded {} instructions", expanded);
        *circuit = circuit.with_instructions(out)?;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        !circuit.is_empty()
    }
}

/// The one-level expansion of `inst`, or `None` when it has none.
///
/// A classical condition on `inst` is copied onto every replacement.
pub(crate) fn expand_once(inst: &Instruction) -> CompileResult<Option<Vec<Instruction>>> {
    let Some(gate) = inst.as_gate() else {
        return Ok(None);
    };
    let expansion = match &gate.kind {
        GateKind::Standard(standard) => definitions::definition(standard, &inst.qubits),
        GateKind::Unitary(unitary) => Some(synthesis::synthesize(unitary.matrix(), &inst.qubits)?),
        GateKind::Custom(_) => None,
    };
    Ok(expansion.map(|insts| with_condition(insts, gate.condition.as_ref())))
}

pub(crate) fn with_condition(
    mut insts: Vec<Instruction>,
    condition: Option<&ClassicalCondition>,
) -> Vec<Instruction> {
    if let Some(condition) = condition {
        for gate in insts.iter_mut().filter_map(Instruction::gate_mut) {
            gate.condition = Some(condition.clone());
        }
    }
    insts
}
