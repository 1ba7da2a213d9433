//! Insertion of a random unitary and its adjoint next to an anchor gate.

use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use unopt_ir::{Circuit, Gate, Instruction, IrResult, Operator, QubitId};

use crate::config::Strategy;
use crate::index::two_qubit_gates;

/// Label of the inserted unitary.
pub const A_LABEL: &str = "A";
/// Label of its adjoint.
pub const A_DAG_LABEL: &str = "A†";

/// Why a round could not insert anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No two two-qubit gates share exactly one qubit.
    NoEligiblePair,
    /// The circuit has no two-qubit gate.
    NoTwoQubitGate,
    /// Every qubit is already used by the anchor.
    InsufficientQubits,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoEligiblePair => "no suitable pair of two-qubit gates found",
            Self::NoTwoQubitGate => "circuit has no two-qubit gate",
            Self::InsufficientQubits => "not enough qubits for a third operand",
        };
        f.write_str(reason)
    }
}

/// Where and what was inserted.
#[derive(Debug, Clone)]
pub struct InsertionPlan {
    /// Index of the anchor gate (unchanged by the insertion).
    pub anchor_index: usize,
    /// Anchor operands in operand order.
    pub anchor_qubits: Vec<QubitId>,
    /// The anchor gate.
    pub anchor: Gate,
    /// Anchor operand that `A` also acts on.
    pub shared_qubit: QubitId,
    /// The other operand of `A`.
    pub third_qubit: QubitId,
    /// The random unitary `A`.
    pub unitary: Operator,
}

/// Result of [`select`].
#[derive(Debug, Clone)]
pub enum Insertion {
    /// `A†` and `A` were inserted right after the anchor.
    Planned {
        /// The circuit with the pair inserted.
        circuit: Circuit,
        /// What was inserted where.
        plan: InsertionPlan,
    },
    /// Nothing was inserted.
    Skipped(SkipReason),
}

/// Pick an anchor and insert `A†` then `A` on `(shared, third)` right after it.
///
/// The input circuit is never modified.
pub fn select<R: Rng>(circuit: &Circuit, strategy: Strategy, rng: &mut R) -> IrResult<Insertion> {
    let records = two_qubit_gates(circuit);

    let anchor = match strategy {
        Strategy::Concatenated => records.iter().enumerate().find_map(|(i, first)| {
            records[i + 1..]
                .iter()
                .find_map(|second| first.shared_qubit(second))
                .map(|shared| (first, shared))
        }),
        Strategy::Random => records.choose(rng).map(|record| (record, record.qubits[0])),
    };
    let Some((anchor, shared_qubit)) = anchor else {
        let reason = match strategy {
            Strategy::Concatenated => SkipReason::NoEligiblePair,
            Strategy::Random => SkipReason::NoTwoQubitGate,
        };
        return Ok(Insertion::Skipped(reason));
    };

    let Some(third_qubit) = circuit.qubits().find(|q| !anchor.qubits.contains(q)) else {
        return Ok(Insertion::Skipped(SkipReason::InsufficientQubits));
    };

    let unitary = haar_unitary(2, rng)?;
    let a_dag = Gate::unitary(unitary.adjoint())?.with_label(A_DAG_LABEL);
    let a = Gate::unitary(unitary.clone())?.with_label(A_LABEL);

    let split = anchor.index + 1;
    let instructions = circuit.instructions();
    let inserted = circuit.with_instructions(
        instructions[..split]
            .iter()
            .cloned()
            .chain([
                Instruction::gate(a_dag, [shared_qubit, third_qubit]),
                Instruction::gate(a, [shared_qubit, third_qubit]),
            ])
            .chain(instructions[split..].iter().cloned()),
    )?;

    let plan = InsertionPlan {
        anchor_index: anchor.index,
        anchor_qubits: anchor.qubits.to_vec(),
        anchor: anchor.gate.clone(),
        shared_qubit,
        third_qubit,
        unitary,
    };
    Ok(Insertion::Planned {
        circuit: inserted,
        plan,
    })
}

/// A Haar-random unitary on `num_qubits` qubits.
///
/// Orthonormalizes the columns of a complex Gaussian matrix; with modified
/// Gram-Schmidt the triangular factor has a positive diagonal, which makes
/// the result Haar-distributed.
pub fn haar_unitary<R: Rng>(num_qubits: usize, rng: &mut R) -> IrResult<Operator> {
    let dim = 1usize << num_qubits;
    let mut z = Array2::from_shape_fn((dim, dim), |_| {
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = rng.sample(StandardNormal);
        Complex64::new(re, im) * FRAC_1_SQRT_2
    });

    for j in 0..dim {
        for k in 0..j {
            let overlap: Complex64 = (0..dim).map(|i| z[[i, k]].conj() * z[[i, j]]).sum();
            for i in 0..dim {
                let v = z[[i, k]];
                z[[i, j]] -= overlap * v;
            }
        }
        let norm = (0..dim).map(|i| z[[i, j]].norm_sqr()).sum::<f64>().sqrt();
        for i in 0..dim {
            z[[i, j]] /= norm;
        }
    }

    Operator::from_matrix(z)
}
