//! Emitting a circuit and parsing it back gives the same circuit.

use proptest::prelude::*;
use unopt_ir::{Circuit, ClbitId, Instruction, Operator, QubitId, StandardGate};
use unopt_qasm::{emit, emit_with_header, parse};

const NUM_QUBITS: u32 = 4;

fn arb_angle() -> impl Strategy<Value = f64> {
    prop_oneof![
        -6.3_f64..6.3,
        Just(std::f64::consts::PI),
        Just(-std::f64::consts::FRAC_PI_2),
        Just(std::f64::consts::FRAC_PI_4),
    ]
}

fn arb_single() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::I),
        Just(StandardGate::H),
        Just(StandardGate::Sdg),
        Just(StandardGate::T),
        Just(StandardGate::SXdg),
        arb_angle().prop_map(StandardGate::Rx),
        arb_angle().prop_map(StandardGate::Rz),
        arb_angle().prop_map(StandardGate::P),
        (arb_angle(), arb_angle(), arb_angle()).prop_map(|(a, b, c)| StandardGate::U(a, b, c)),
    ]
}

fn arb_double() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::CX),
        Just(StandardGate::CZ),
        Just(StandardGate::Swap),
        Just(StandardGate::ISwap),
        arb_angle().prop_map(StandardGate::CP),
        arb_angle().prop_map(StandardGate::CRy),
        arb_angle().prop_map(StandardGate::RYY),
        arb_angle().prop_map(StandardGate::RZZ),
    ]
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        3 => (arb_single(), 0..NUM_QUBITS)
            .prop_map(|(g, q)| Instruction::single_qubit_gate(g, QubitId(q))),
        3 => (arb_double(), 0..NUM_QUBITS, 0..NUM_QUBITS)
            .prop_filter("operands must differ", |(_, a, b)| a != b)
            .prop_map(|(g, a, b)| Instruction::two_qubit_gate(g, QubitId(a), QubitId(b))),
        1 => (0..NUM_QUBITS, 0..NUM_QUBITS)
            .prop_filter("operands must differ", |(a, b)| a != b)
            .prop_map(|(a, b)| Instruction::barrier([QubitId(a), QubitId(b)])),
    ]
}

/// Two quantum registers so operands are written with their own names.
fn circuit_of(instructions: Vec<Instruction>) -> Circuit {
    let mut circuit = Circuit::new("random");
    circuit.add_qreg("data", 2).unwrap();
    circuit.add_qreg("anc", NUM_QUBITS - 2).unwrap();
    for inst in instructions {
        circuit.push(inst).unwrap();
    }
    circuit
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_roundtrip_preserves_instructions(
        instructions in prop::collection::vec(arb_instruction(), 0..24),
    ) {
        let circuit = circuit_of(instructions);
        let qasm = emit(&circuit).unwrap();
        let reparsed = parse(&qasm).unwrap();

        prop_assert_eq!(reparsed.qregs(), circuit.qregs());
        prop_assert_eq!(reparsed.instructions(), circuit.instructions());
    }

    #[test]
    fn test_roundtrip_preserves_unitary(
        instructions in prop::collection::vec(arb_instruction(), 1..16),
    ) {
        let circuit = circuit_of(instructions);
        let header = vec!["random circuit".to_string()];
        let reparsed = parse(&emit_with_header(&circuit, &header).unwrap()).unwrap();

        let before = Operator::from_circuit(&circuit).unwrap();
        let after = Operator::from_circuit(&reparsed).unwrap();
        prop_assert!(before.equiv(&after, 1e-9));
    }
}

#[test]
fn test_measurements_split_per_bit() {
    let mut circuit = Circuit::with_size("m", 3, 3);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure_all().unwrap();
    circuit.measure(QubitId(2), ClbitId(0)).unwrap();

    let reparsed = parse(&emit(&circuit).unwrap()).unwrap();
    assert_eq!(reparsed.cregs(), circuit.cregs());
    let measures: Vec<_> = reparsed
        .instructions()
        .iter()
        .filter(|inst| inst.is_measure())
        .map(|inst| (inst.qubits.clone(), inst.clbits.clone()))
        .collect();
    assert_eq!(measures.len(), 4);
    assert_eq!(measures[1], (vec![QubitId(1)], vec![ClbitId(1)]));
    assert_eq!(measures[3], (vec![QubitId(2)], vec![ClbitId(0)]));
}
