//! Property-based tests for synthesis and resynthesis.

use proptest::prelude::*;
use unopt_compile::{PassManagerBuilder, synthesize};
use unopt_ir::{Circuit, Operator, QubitId, StandardGate};

fn arb_gate() -> impl Strategy<Value = StandardGate> {
    let angle = -3.1_f64..3.1;
    prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::T),
        Just(StandardGate::CX),
        Just(StandardGate::CY),
        Just(StandardGate::ISwap),
        Just(StandardGate::CCX),
        angle.clone().prop_map(StandardGate::Ry),
        angle.clone().prop_map(StandardGate::CRz),
        angle.clone().prop_map(StandardGate::RXX),
        (angle.clone(), angle.clone(), angle).prop_map(|(a, b, c)| StandardGate::U(a, b, c)),
    ]
}

/// A 3-qubit circuit of random gates on random distinct operands.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec((arb_gate(), Just(vec![0u32, 1, 2]).prop_shuffle()), 1..8).prop_map(
        |gates| {
            let mut circuit = Circuit::with_size("random", 3, 0);
            for (gate, order) in gates {
                let n = gate.num_qubits() as usize;
                let qubits: Vec<QubitId> = order[..n].iter().copied().map(QubitId).collect();
                circuit.gate(gate, qubits).unwrap();
            }
            circuit
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Synthesizing a circuit's unitary reproduces it.
    #[test]
    fn test_synthesis_is_exact(circuit in arb_circuit()) {
        let target = Operator::from_circuit(&circuit).unwrap();
        let qubits: Vec<QubitId> = (0..3).map(QubitId).collect();
        let insts = synthesize(&target, &qubits).unwrap();

        let rebuilt = Circuit::with_size("rebuilt", 3, 0).with_instructions(insts).unwrap();
        let got = Operator::from_circuit(&rebuilt).unwrap();
        prop_assert!(got.equiv(&target, 1e-9));
    }

    /// Every optimization level keeps the unitary and lands in {cx, u}.
    #[test]
    fn test_resynthesis_preserves_unitary(circuit in arb_circuit(), level in 0u8..=3) {
        let target = Operator::from_circuit(&circuit).unwrap();
        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(level).build();

        let mut out = circuit.clone();
        pm.run(&mut out, &mut props).unwrap();

        prop_assert!(out.instructions().iter().all(|i| i.name() == "u" || i.name() == "cx"));
        prop_assert!(Operator::from_circuit(&out).unwrap().equiv(&target, 1e-9));
    }
}
