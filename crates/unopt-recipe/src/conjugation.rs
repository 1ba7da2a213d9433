//! Moving the anchor past the inserted adjoint.
//!
//! With the anchor `B1` followed by `A†`, the pair is replaced by
//! `Ã† = B1† · A† · B1` followed by `B1`, which has the same action since
//! `B1 · Ã† = A† · B1`.

use unopt_ir::{Circuit, Gate, Instruction, IrError, IrResult, QubitId};

use crate::insertion::InsertionPlan;

/// Label of the conjugated adjoint.
pub const CONJUGATED_LABEL: &str = "Ã†";

/// Replace the anchor and the `A†` after it by `Ã†` and the anchor.
///
/// `Ã†` acts on the anchor's qubits plus the third qubit, in ascending order.
/// Fails when the anchor has no matrix or is classically conditioned.
pub fn conjugate(circuit: &Circuit, plan: &InsertionPlan) -> IrResult<Circuit> {
    if plan.anchor.condition.is_some() {
        return Err(IrError::NonUnitaryInstruction(format!(
            "{} (classically conditioned)",
            plan.anchor.name()
        )));
    }
    let anchor_matrix = plan.anchor.matrix()?;

    let mut involved: Vec<QubitId> = plan.anchor_qubits.clone();
    involved.extend([plan.shared_qubit, plan.third_qubit]);
    involved.sort_unstable();
    involved.dedup();
    let k = involved.len();

    let anchor_slots = slots(&involved, &plan.anchor_qubits)?;
    let pair_slots = slots(&involved, &[plan.shared_qubit, plan.third_qubit])?;

    let b1 = anchor_matrix.embed(k, &anchor_slots)?;
    let a_dag = plan.unitary.adjoint().embed(k, &pair_slots)?;
    let conjugated = b1.adjoint().dot(&a_dag).dot(&b1);
    let gate = Gate::unitary(conjugated)?.with_label(CONJUGATED_LABEL);

    let instructions = circuit.instructions();
    let anchor = instructions
        .get(plan.anchor_index)
        .cloned()
        .ok_or_else(|| {
            IrError::NonUnitaryInstruction(format!("missing anchor at {}", plan.anchor_index))
        })?;
    let rest = instructions.get(plan.anchor_index + 2..).unwrap_or_default();

    circuit.with_instructions(
        instructions[..plan.anchor_index]
            .iter()
            .cloned()
            .chain([Instruction::gate(gate, involved), anchor])
            .chain(rest.iter().cloned()),
    )
}

/// Position of each qubit within the sorted `involved` list.
fn slots(involved: &[QubitId], qubits: &[QubitId]) -> IrResult<Vec<usize>> {
    qubits
        .iter()
        .map(|&q| {
            involved
                .binary_search(&q)
                .map_err(|_| IrError::QubitNotFound {
                    qubit: q,
                    gate_name: Some(CONJUGATED_LABEL.to_string()),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::insertion::{Insertion, select};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use unopt_ir::{ClassicalCondition, CustomGate, Operator, StandardGate};

    fn insert(circuit: &Circuit, seed: u64) -> (Circuit, InsertionPlan) {
        let mut rng = StdRng::seed_from_u64(seed);
        match select(circuit, Strategy::Concatenated, &mut rng).unwrap() {
            Insertion::Planned { circuit, plan } => (circuit, plan),
            Insertion::Skipped(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn test_conjugation_layout() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let (inserted, plan) = insert(&circuit, 42);
        assert_eq!(plan.shared_qubit, QubitId(1));
        assert_eq!(plan.third_qubit, QubitId(2));

        let out = conjugate(&inserted, &plan).unwrap();
        let names: Vec<&str> = out.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, ["unitary", "cx", "unitary", "cx"]);

        let conj = &out.instructions()[0];
        assert_eq!(conj.qubits, [QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(conj.as_gate().unwrap().label.as_deref(), Some(CONJUGATED_LABEL));
        assert_eq!(out.instructions()[1], circuit.instructions()[0]);
        assert_eq!(out.instructions()[2].as_gate().unwrap().label.as_deref(), Some("A"));
        assert_eq!(out.instructions()[3], circuit.instructions()[1]);

        let before = Operator::from_circuit(&circuit).unwrap();
        let after = Operator::from_circuit(&out).unwrap();
        assert!(after.equiv(&before, 1e-9));
    }

    #[test]
    fn test_conjugation_with_reversed_operands() {
        // Anchor operands out of ascending order exercise the slot mapping.
        let mut circuit = Circuit::with_size("test", 4, 0);
        circuit.h(QubitId(3)).unwrap();
        circuit.gate(StandardGate::CRy(0.8), [QubitId(3), QubitId(1)]).unwrap();
        circuit.gate(StandardGate::CH, [QubitId(1), QubitId(2)]).unwrap();
        circuit.rz(0.3, QubitId(0)).unwrap();

        let (inserted, plan) = insert(&circuit, 5);
        assert_eq!(plan.anchor_index, 1);
        assert_eq!(plan.third_qubit, QubitId(0));

        let out = conjugate(&inserted, &plan).unwrap();
        assert_eq!(out.len(), circuit.len() + 2);
        assert_eq!(out.instructions()[1].qubits, [QubitId(0), QubitId(1), QubitId(3)]);

        let before = Operator::from_circuit(&circuit).unwrap();
        let after = Operator::from_circuit(&out).unwrap();
        assert!(after.equiv(&before, 1e-9));
    }

    #[test]
    fn test_opaque_anchor_fails() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .gate(CustomGate::new("oracle", 2), [QubitId(0), QubitId(1)])
            .unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let (inserted, plan) = insert(&circuit, 0);
        let err = conjugate(&inserted, &plan).unwrap_err();
        assert!(matches!(err, IrError::NoMatrix(name) if name == "oracle"));
    }

    #[test]
    fn test_conditioned_anchor_fails() {
        let mut circuit = Circuit::with_size("test", 3, 1);
        let gate = Gate::standard(StandardGate::CX).with_condition(ClassicalCondition::new("c", 1));
        circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let (inserted, plan) = insert(&circuit, 0);
        assert!(matches!(
            conjugate(&inserted, &plan),
            Err(IrError::NonUnitaryInstruction(_))
        ));
    }
}
