//! Exact synthesis of dense unitaries into `u` and `cx`.
//!
//! An `n`-qubit unitary is reduced to a diagonal by Givens rotations, each
//! acting on two basis states. A two-level factor is routed along a Gray-code
//! path until its states differ in a single bit, where it becomes a
//! multi-controlled single-qubit gate. One control uses the `A·X·B·X·C`
//! construction; more controls recurse on the square root of the target
//! unitary.
//!
//! The output is exact up to a global phase and is not optimized; the
//! resynthesis passes clean it up afterwards.

use num_complex::Complex64;
use std::f64::consts::PI;
use unopt_ir::{Instruction, Operator, QubitId, StandardGate, Unitary2x2};

use crate::definitions;
use crate::error::{CompileError, CompileResult};

/// Entries and angles below this are treated as zero.
const TINY: f64 = 1e-13;

/// The `U` gate equal to `u` up to global phase.
pub fn u_gate(u: &Unitary2x2) -> StandardGate {
    let ((theta, phi, lambda), _) = u.zyz_decomposition().to_u();
    StandardGate::U(
        theta,
        Unitary2x2::normalize_angle(phi),
        Unitary2x2::normalize_angle(lambda),
    )
}

/// Synthesize `unitary` onto `qubits`; operand `j` is bit `j` of the matrix.
pub fn synthesize(unitary: &Operator, qubits: &[QubitId]) -> CompileResult<Vec<Instruction>> {
    if unitary.num_qubits() != qubits.len() {
        return Err(CompileError::SynthesisArity {
            matrix_qubits: unitary.num_qubits(),
            operands: qubits.len(),
        });
    }

    let mut emitter = Emitter::default();
    if let Some(u) = unitary.to_unitary2x2() {
        emitter.single(&u, qubits[0]);
        return Ok(emitter.out);
    }
    if qubits.is_empty() {
        return Ok(vec![]);
    }

    let dim = unitary.dim();
    let mut w = unitary.matrix().clone();
    // Adjoints of the eliminating rotations, in elimination order.
    let mut factors: Vec<(usize, usize, Unitary2x2)> = Vec::new();

    for col in 0..dim - 1 {
        for row in col + 1..dim {
            let b = w[[row, col]];
            if b.norm() < TINY {
                continue;
            }
            let a = w[[col, col]];
            let norm = (a.norm_sqr() + b.norm_sqr()).sqrt();
            let g = Unitary2x2::new(a.conj() / norm, b.conj() / norm, -b / norm, a / norm);
            for k in col..dim {
                let (x, y) = (w[[col, k]], w[[row, k]]);
                w[[col, k]] = g.data[0] * x + g.data[1] * y;
                w[[row, k]] = g.data[2] * x + g.data[3] * y;
            }
            factors.push((col, row, g.dagger()));
        }
    }

    // What is left is diagonal; apply its phases relative to the first entry.
    let reference = w[[0, 0]];
    for j in 1..dim {
        let theta = (w[[j, j]] / reference).arg();
        if theta.abs() > TINY {
            let phase = Unitary2x2::new(
                Complex64::from_polar(1.0, theta),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
            );
            emitter.two_level(qubits, j, j ^ 1, &phase);
        }
    }

    for (s, t, m) in factors.iter().rev() {
        emitter.two_level(qubits, *s, *t, m);
    }

    Ok(emitter.out)
}

/// A controlled single-qubit gate in `u` and `cx`.
///
/// The phase of `u` is kept relative to the uncontrolled branch, so the
/// result is exact up to a global phase even when `u` is not in SU(2).
pub fn controlled(u: &Unitary2x2, control: QubitId, target: QubitId) -> Vec<Instruction> {
    let mut emitter = Emitter::default();
    emitter.controlled(u, control, target);
    emitter.out
}

#[derive(Default)]
struct Emitter {
    out: Vec<Instruction>,
}

impl Emitter {
    fn single(&mut self, u: &Unitary2x2, qubit: QubitId) {
        if !u.is_identity() {
            self.out
                .push(Instruction::single_qubit_gate(u_gate(u), qubit));
        }
    }

    fn x(&mut self, qubit: QubitId) {
        self.out.push(Instruction::single_qubit_gate(
            StandardGate::U(PI, 0.0, PI),
            qubit,
        ));
    }

    fn cx(&mut self, control: QubitId, target: QubitId) {
        self.out
            .push(Instruction::two_qubit_gate(StandardGate::CX, control, target));
    }

    fn controlled(&mut self, u: &Unitary2x2, control: QubitId, target: QubitId) {
        let zyz = u.zyz_decomposition();

        if u.distance_up_to_phase(&Unitary2x2::x()) < TINY {
            // u = e^{i·psi} X
            self.cx(control, target);
            let psi = u.data[2].arg();
            if Unitary2x2::normalize_angle(psi).abs() > TINY {
                self.single(&Unitary2x2::p(psi), control);
            }
            return;
        }

        let (alpha, beta, gamma) = (zyz.alpha, zyz.beta, zyz.gamma);
        let a = Unitary2x2::rz(alpha) * Unitary2x2::ry(beta / 2.0);
        let b = Unitary2x2::ry(-beta / 2.0) * Unitary2x2::rz(-(gamma + alpha) / 2.0);
        let c = Unitary2x2::rz((gamma - alpha) / 2.0);

        self.single(&c, target);
        self.cx(control, target);
        self.single(&b, target);
        self.cx(control, target);
        self.single(&a, target);
        if Unitary2x2::normalize_angle(zyz.phase).abs() > TINY {
            self.single(&Unitary2x2::p(zyz.phase), control);
        }
    }

    fn multi_controlled(&mut self, u: &Unitary2x2, controls: &[QubitId], target: QubitId) {
        match controls {
            [] => self.single(u, target),
            [control] => self.controlled(u, *control, target),
            [c1, c2] if is_pauli_x(u) => {
                for inst in definitions::toffoli(*c1, *c2, target) {
                    self.push_translated(inst);
                }
            }
            [rest @ .., last] => {
                let v = u.sqrt();
                self.controlled(&v, *last, target);
                self.multi_controlled(&Unitary2x2::x(), rest, *last);
                self.controlled(&v.dagger(), *last, target);
                self.multi_controlled(&Unitary2x2::x(), rest, *last);
                self.multi_controlled(&v, rest, target);
            }
        }
    }

    /// `u` on `target` when every control holds the paired value.
    fn controlled_on(&mut self, u: &Unitary2x2, controls: &[(QubitId, bool)], target: QubitId) {
        let flipped: Vec<QubitId> = controls
            .iter()
            .filter(|(_, value)| !value)
            .map(|(q, _)| *q)
            .collect();
        let qubits: Vec<QubitId> = controls.iter().map(|(q, _)| *q).collect();

        for &q in &flipped {
            self.x(q);
        }
        self.multi_controlled(u, &qubits, target);
        for &q in &flipped {
            self.x(q);
        }
    }

    /// Exchange basis states `a` and `b`, which differ in exactly one bit.
    fn transposition(&mut self, qubits: &[QubitId], a: usize, b: usize) {
        let bit = (a ^ b).trailing_zeros() as usize;
        let controls = controls_for(qubits, a, bit);
        self.controlled_on(&Unitary2x2::x(), &controls, qubits[bit]);
    }

    /// Apply `m` to the span of basis states `s` and `t`, ordered `(s, t)`.
    fn two_level(&mut self, qubits: &[QubitId], s: usize, t: usize, m: &Unitary2x2) {
        let bits: Vec<usize> = (0..qubits.len())
            .filter(|b| ((s ^ t) >> b) & 1 == 1)
            .collect();
        let Some((&pivot, steps)) = bits.split_last() else {
            return;
        };

        // Gray-code walk from `s` to the neighbour of `t`.
        let mut path = vec![s];
        for &b in steps {
            let last = path[path.len() - 1];
            path.push(last ^ (1 << b));
        }
        for pair in path.windows(2) {
            self.transposition(qubits, pair[0], pair[1]);
        }

        let near = path[path.len() - 1];
        let local = if (near >> pivot) & 1 == 0 {
            *m
        } else {
            Unitary2x2::new(m.data[3], m.data[2], m.data[1], m.data[0])
        };
        let controls = controls_for(qubits, t, pivot);
        self.controlled_on(&local, &controls, qubits[pivot]);

        for pair in path.windows(2).rev() {
            self.transposition(qubits, pair[0], pair[1]);
        }
    }

    fn push_translated(&mut self, inst: Instruction) {
        let single = inst
            .as_gate()
            .and_then(|g| g.as_standard())
            .and_then(StandardGate::matrix_2x2);
        match single {
            Some(u) => self.single(&u, inst.qubits[0]),
            None => self.out.push(inst),
        }
    }
}

/// Every qubit but `skip`, paired with its bit in `state`.
fn controls_for(qubits: &[QubitId], state: usize, skip: usize) -> Vec<(QubitId, bool)> {
    (0..qubits.len())
        .filter(|&b| b != skip)
        .map(|b| (qubits[b], (state >> b) & 1 == 1))
        .collect()
}

fn is_pauli_x(u: &Unitary2x2) -> bool {
    u.data
        .iter()
        .zip(Unitary2x2::x().data.iter())
        .all(|(a, b)| (a - b).norm() < TINY)
}
