//! One-level definitions of composite standard gates.
//!
//! Each definition uses single-qubit standard gates and `cx` only and is
//! equal to the gate up to global phase.

use std::f64::consts::FRAC_PI_2;
use unopt_ir::{Instruction, QubitId, StandardGate, Unitary2x2};

use crate::synthesis;

/// Whether a standard gate is already elementary (single-qubit or `cx`).
pub fn is_elementary(gate: &StandardGate) -> bool {
    gate.num_qubits() == 1 || matches!(gate, StandardGate::CX)
}

/// The definition of `gate` applied to `qubits`, or `None` when it is
/// elementary.
pub fn definition(gate: &StandardGate, qubits: &[QubitId]) -> Option<Vec<Instruction>> {
    if is_elementary(gate) {
        return None;
    }
    let q = qubits;
    let insts = match gate {
        StandardGate::CY => vec![
            one(StandardGate::Sdg, q[1]),
            cx(q[0], q[1]),
            one(StandardGate::S, q[1]),
        ],
        StandardGate::CZ => vec![
            one(StandardGate::H, q[1]),
            cx(q[0], q[1]),
            one(StandardGate::H, q[1]),
        ],
        StandardGate::Swap => vec![cx(q[0], q[1]), cx(q[1], q[0]), cx(q[0], q[1])],
        StandardGate::ISwap => {
            let mut insts = rxx(-FRAC_PI_2, q[0], q[1]);
            insts.extend(ryy(-FRAC_PI_2, q[0], q[1]));
            insts
        }
        StandardGate::RXX(theta) => rxx(*theta, q[0], q[1]),
        StandardGate::RYY(theta) => ryy(*theta, q[0], q[1]),
        StandardGate::RZZ(theta) => rzz(*theta, q[0], q[1]),
        StandardGate::CCX => toffoli(q[0], q[1], q[2]),
        StandardGate::CSwap => {
            let mut insts = vec![cx(q[2], q[1])];
            insts.extend(toffoli(q[0], q[1], q[2]));
            insts.push(cx(q[2], q[1]));
            insts
        }
        controlled => {
            let target = controlled_target(controlled)?;
            synthesis::controlled(&target, q[0], q[1])
        }
    };
    Some(insts)
}

/// The six-`cx` Toffoli with controls `a`, `b` and target `c`.
pub fn toffoli(a: QubitId, b: QubitId, c: QubitId) -> Vec<Instruction> {
    vec![
        one(StandardGate::H, c),
        cx(b, c),
        one(StandardGate::Tdg, c),
        cx(a, c),
        one(StandardGate::T, c),
        cx(b, c),
        one(StandardGate::Tdg, c),
        cx(a, c),
        one(StandardGate::T, b),
        one(StandardGate::T, c),
        one(StandardGate::H, c),
        cx(a, b),
        one(StandardGate::T, a),
        one(StandardGate::Tdg, b),
        cx(a, b),
    ]
}

/// The single-qubit action of a controlled rotation or `ch`.
fn controlled_target(gate: &StandardGate) -> Option<Unitary2x2> {
    let target = match gate {
        StandardGate::CH => StandardGate::H,
        StandardGate::CRx(t) => StandardGate::Rx(*t),
        StandardGate::CRy(t) => StandardGate::Ry(*t),
        StandardGate::CRz(t) => StandardGate::Rz(*t),
        StandardGate::CP(l) => StandardGate::P(*l),
        _ => return None,
    };
    target.matrix_2x2()
}

fn rzz(theta: f64, a: QubitId, b: QubitId) -> Vec<Instruction> {
    vec![cx(a, b), one(StandardGate::Rz(theta), b), cx(a, b)]
}

fn rxx(theta: f64, a: QubitId, b: QubitId) -> Vec<Instruction> {
    let mut insts = vec![one(StandardGate::H, a), one(StandardGate::H, b)];
    insts.extend(rzz(theta, a, b));
    insts.extend([one(StandardGate::H, a), one(StandardGate::H, b)]);
    insts
}

fn ryy(theta: f64, a: QubitId, b: QubitId) -> Vec<Instruction> {
    let mut insts = vec![
        one(StandardGate::Rx(FRAC_PI_2), a),
        one(StandardGate::Rx(FRAC_PI_2), b),
    ];
    insts.extend(rzz(theta, a, b));
    insts.extend([
        one(StandardGate::Rx(-FRAC_PI_2), a),
        one(StandardGate::Rx(-FRAC_PI_2), b),
    ]);
    insts
}

fn one(gate: StandardGate, qubit: QubitId) -> Instruction {
    Instruction::single_qubit_gate(gate, qubit)
}

fn cx(control: QubitId, target: QubitId) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::CX, control, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unopt_ir::{Circuit, Operator};

    const COMPOSITE: [StandardGate; 15] = [
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::ISwap,
        StandardGate::CRx(0.3),
        StandardGate::CRy(-1.2),
        StandardGate::CRz(2.0),
        StandardGate::CP(0.8),
        StandardGate::RXX(0.5),
        StandardGate::RYY(1.7),
        StandardGate::RZZ(-0.9),
        StandardGate::CCX,
        StandardGate::CSwap,
        StandardGate::RZZ(std::f64::consts::PI),
    ];

    #[test]
    fn test_definitions_match_matrices() {
        for gate in COMPOSITE {
            let n = gate.num_qubits();
            let qubits: Vec<QubitId> = (0..n).map(QubitId).collect();
            let insts = definition(&gate, &qubits).unwrap();
            assert!(insts.iter().all(|i| {
                i.num_qubits() == 1 || i.name() == "cx"
            }));

            let circuit = Circuit::with_size("def", n, 0)
                .with_instructions(insts)
                .unwrap();
            let got = Operator::from_circuit(&circuit).unwrap();
            assert!(got.equiv(&gate.matrix(), 1e-9), "{} mismatch", gate.name());
        }
    }

    #[test]
    fn test_elementary_has_no_definition() {
        assert!(definition(&StandardGate::CX, &[QubitId(0), QubitId(1)]).is_none());
        assert!(definition(&StandardGate::Rz(0.1), &[QubitId(0)]).is_none());
    }

    #[test]
    fn test_swap_uses_three_cx() {
        let insts = definition(&StandardGate::Swap, &[QubitId(0), QubitId(1)]).unwrap();
        assert_eq!(insts.len(), 3);
        assert!(insts.iter().all(|i| i.name() == "cx"));
    }
}
