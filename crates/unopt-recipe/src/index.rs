//! Ordered index of two-qubit gates.

use unopt_ir::{Circuit, Gate, QubitId};

/// A two-qubit gate and where it sits in the circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRecord<'a> {
    /// Position in the instruction list.
    pub index: usize,
    /// Qubit operands in operand order.
    pub qubits: &'a [QubitId],
    /// The gate itself.
    pub gate: &'a Gate,
}

impl GateRecord<'_> {
    /// The one qubit this gate shares with `other`, if they share exactly one.
    pub fn shared_qubit(&self, other: &GateRecord<'_>) -> Option<QubitId> {
        let mut common = self.qubits.iter().filter(|q| other.qubits.contains(q));
        match (common.next(), common.next()) {
            (Some(&q), None) => Some(q),
            _ => None,
        }
    }
}

/// Every gate acting on exactly two qubits, in circuit order.
///
/// Directives such as a two-qubit barrier are not gates and are skipped.
pub fn two_qubit_gates(circuit: &Circuit) -> Vec<GateRecord<'_>> {
    circuit
        .instructions()
        .iter()
        .enumerate()
        .filter(|(_, inst)| inst.is_two_qubit_gate())
        .filter_map(|(index, inst)| {
            inst.as_gate().map(|gate| GateRecord {
                index,
                qubits: &inst.qubits,
                gate,
            })
        })
        .collect()
}
