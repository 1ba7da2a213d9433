//! One step of a circuit: an operation plus the bits it touches.
//!
//! Gates are the only instructions the recipe rewrites. Measurements, resets
//! and barriers travel through every stage unchanged, so the helpers here
//! mostly answer "is this something a unitary can stand in for?".

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::operator::Operator;
use crate::qubit::{ClbitId, QubitId};

/// What an [`Instruction`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Apply a gate, possibly under a classical condition.
    Gate(Gate),
    /// Read `qubits[i]` into `clbits[i]`.
    Measure,
    /// Return the qubit to |0⟩.
    Reset,
    /// Ordering fence. Has no effect on the unitary.
    Barrier,
}

/// An operation bound to its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    /// Qubit operands, in the order the gate matrix expects them.
    pub qubits: Vec<QubitId>,
    /// Classical targets; only measurements have any.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// A gate applied to `qubits`.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// `q1` is operand 0 (the control, for controlled gates).
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// One measurement reading each qubit into the clbit at the same position.
    ///
    /// The two lists must be the same length.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        let clbits: Vec<ClbitId> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::ClbitCountMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: Vec::new(),
        }
    }

    /// A fence across `qubits`; an empty list is kept as written.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// True for a gate carrying a classical condition.
    pub fn is_conditioned(&self) -> bool {
        self.as_gate().is_some_and(|g| g.condition.is_some())
    }

    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    pub fn gate_mut(&mut self) -> Option<&mut Gate> {
        match &mut self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Gate name, or `measure` / `reset` / `barrier`.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Candidate anchor for an inserted pair: any gate on exactly two qubits.
    pub fn is_two_qubit_gate(&self) -> bool {
        self.is_gate() && self.qubits.len() == 2
    }

    /// The matrix this instruction contributes to the circuit unitary.
    ///
    /// `Ok(None)` for barriers. Measurements, resets, conditioned gates and
    /// opaque gates fail with the reason.
    pub fn unitary(&self) -> IrResult<Option<Operator>> {
        match &self.kind {
            InstructionKind::Gate(gate) if gate.condition.is_some() => Err(
                IrError::NonUnitaryInstruction(format!("{} (classically conditioned)", gate.name())),
            ),
            InstructionKind::Gate(gate) => gate.matrix().map(Some),
            InstructionKind::Barrier => Ok(None),
            InstructionKind::Measure | InstructionKind::Reset => {
                Err(IrError::NonUnitaryInstruction(self.name().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ClassicalCondition, CustomGate};

    #[test]
    fn test_cz_operand_order_is_kept() {
        let inst = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(2), QubitId(0));
        assert!(inst.is_two_qubit_gate());
        assert_eq!(inst.name(), "cz");
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(0)]);
        assert!(inst.clbits.is_empty());
    }

    #[test]
    fn test_only_two_qubit_gates_are_anchors() {
        assert!(!Instruction::single_qubit_gate(StandardGate::H, QubitId(0)).is_two_qubit_gate());
        let fence = Instruction::barrier([QubitId(0), QubitId(1)]);
        assert!(fence.is_barrier());
        assert_eq!(fence.num_qubits(), 2);
        assert!(!fence.is_two_qubit_gate());
        let readout = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(1), ClbitId(0)])
            .unwrap();
        assert!(readout.is_measure());
        assert!(!readout.is_two_qubit_gate());
    }

    #[test]
    fn test_measure_all_needs_one_clbit_per_qubit() {
        let err = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ClbitCountMismatch {
                qubits: 2,
                clbits: 1
            }
        ));
    }

    #[test]
    fn test_unitary_by_kind() {
        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        let matrix = cx.unitary().unwrap().unwrap();
        assert!(matrix.equiv(&StandardGate::CX.matrix(), 1e-12));

        assert!(Instruction::barrier([QubitId(0)]).unitary().unwrap().is_none());

        for inst in [
            Instruction::measure(QubitId(0), ClbitId(0)),
            Instruction::reset(QubitId(0)),
        ] {
            assert!(matches!(
                inst.unitary(),
                Err(IrError::NonUnitaryInstruction(ref name)) if name == inst.name()
            ));
        }

        let conditioned = Instruction::gate(
            Gate::standard(StandardGate::X).with_condition(ClassicalCondition::new("c", 1)),
            [QubitId(0)],
        );
        assert!(conditioned.is_conditioned());
        assert!(matches!(
            conditioned.unitary(),
            Err(IrError::NonUnitaryInstruction(_))
        ));

        let opaque = Instruction::gate(CustomGate::new("oracle", 1), [QubitId(0)]);
        assert!(!opaque.is_conditioned());
        assert!(matches!(opaque.unitary(), Err(IrError::NoMatrix(ref n)) if n == "oracle"));
    }
}
