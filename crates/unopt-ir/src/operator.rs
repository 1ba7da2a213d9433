//! Dense operators on a small number of qubits.
//!
//! An [`Operator`] on `n` qubits is a `2^n × 2^n` complex matrix whose basis
//! index bit `j` is the state of qubit (or operand) `j`. The same convention is
//! used when an operator is embedded into a larger register: the operator's
//! bit `j` lands on register bit `positions[j]`.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::unitary::Unitary2x2;

/// Largest register [`Operator::from_circuit`] will expand densely.
pub const MAX_DENSE_QUBITS: usize = 12;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// A dense `2^n × 2^n` complex matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    num_qubits: usize,
    data: Array2<Complex64>,
}

impl Operator {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            data: Array2::eye(1usize << num_qubits),
        }
    }

    /// Wrap a square matrix whose side is a power of two.
    pub fn from_matrix(data: Array2<Complex64>) -> IrResult<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(IrError::InvalidMatrix(format!(
                "expected a square matrix, got {rows}x{cols}"
            )));
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(IrError::InvalidMatrix(format!(
                "dimension {rows} is not a power of two"
            )));
        }
        Ok(Self {
            num_qubits: rows.trailing_zeros() as usize,
            data,
        })
    }

    /// Build from row-major entries.
    pub fn from_row_major(num_qubits: usize, entries: Vec<Complex64>) -> IrResult<Self> {
        let dim = 1usize << num_qubits;
        let data = Array2::from_shape_vec((dim, dim), entries)
            .map_err(|e| IrError::InvalidMatrix(e.to_string()))?;
        Self::from_matrix(data)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Mutable access to the underlying matrix.
    pub fn matrix_mut(&mut self) -> &mut Array2<Complex64> {
        &mut self.data
    }

    /// Consume and return the matrix.
    pub fn into_matrix(self) -> Array2<Complex64> {
        self.data
    }

    /// Narrow a one-qubit operator to a [`Unitary2x2`].
    pub fn to_unitary2x2(&self) -> Option<Unitary2x2> {
        (self.num_qubits == 1).then(|| {
            Unitary2x2::new(
                self.data[[0, 0]],
                self.data[[0, 1]],
                self.data[[1, 0]],
                self.data[[1, 1]],
            )
        })
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            data: self.data.t().mapv(|z| z.conj()),
        }
    }

    /// Matrix product `self · other`, i.e. `other` acts first.
    #[must_use]
    pub fn dot(&self, other: &Self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            data: self.data.dot(&other.data),
        }
    }

    /// Kronecker product `self ⊗ other`; `other` occupies the low qubits.
    #[must_use]
    pub fn tensor(&self, other: &Self) -> Self {
        let d2 = other.dim();
        let dim = self.dim() * d2;
        let data = Array2::from_shape_fn((dim, dim), |(r, c)| {
            self.data[[r / d2, c / d2]] * other.data[[r % d2, c % d2]]
        });
        Self {
            num_qubits: self.num_qubits + other.num_qubits,
            data,
        }
    }

    /// Multiply every entry by a scalar.
    #[must_use]
    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            num_qubits: self.num_qubits,
            data: self.data.mapv(|z| z * factor),
        }
    }

    /// Embed into an identity on `num_qubits` qubits, operand `j` of `self`
    /// acting on register bit `positions[j]`.
    ///
    /// Entry `(r, c)` of the result is `self[r_sub, c_sub]` when `r` and `c`
    /// agree on every bit outside `positions`, and zero otherwise.
    pub fn embed(&self, num_qubits: usize, positions: &[usize]) -> IrResult<Self> {
        let layout = SlotLayout::new(num_qubits, positions, self.num_qubits)?;
        let dim = 1usize << num_qubits;
        let mut data = Array2::zeros((dim, dim));
        for base in layout.bases(dim) {
            for (s, &row) in layout.offsets.iter().enumerate() {
                for (t, &col) in layout.offsets.iter().enumerate() {
                    data[[base | row, base | col]] = self.data[[s, t]];
                }
            }
        }
        Ok(Self { num_qubits, data })
    }

    /// Left-multiply in place by `gate` acting on `positions`, i.e.
    /// `self ← embed(gate) · self`, without building the embedded matrix.
    pub fn apply(&mut self, gate: &Operator, positions: &[usize]) -> IrResult<()> {
        let layout = SlotLayout::new(self.num_qubits, positions, gate.num_qubits)?;
        let dim = self.dim();
        let sub = layout.offsets.len();
        let mut column = vec![ZERO; sub];
        let bases: Vec<usize> = layout.bases(dim).collect();

        for col in 0..dim {
            for &base in &bases {
                for (s, &off) in layout.offsets.iter().enumerate() {
                    column[s] = self.data[[base | off, col]];
                }
                for (r, &off) in layout.offsets.iter().enumerate() {
                    let mut acc = ZERO;
                    for (s, v) in column.iter().enumerate() {
                        acc += gate.data[[r, s]] * v;
                    }
                    self.data[[base | off, col]] = acc;
                }
            }
        }
        Ok(())
    }

    /// Largest entry of `|self† · self − I|`.
    pub fn unitary_deviation(&self) -> f64 {
        let product = self.adjoint().dot(self);
        product
            .data
            .indexed_iter()
            .map(|((r, c), z)| {
                let expected = if r == c { 1.0 } else { 0.0 };
                (z - Complex64::new(expected, 0.0)).norm()
            })
            .fold(0.0, f64::max)
    }

    /// Whether `self† · self` equals the identity within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.unitary_deviation() <= tol
    }

    /// Largest entry-wise distance to `other` after removing the global phase.
    ///
    /// The phase is read off the largest-magnitude entry of `other`. Returns
    /// infinity when the shapes differ or no consistent phase exists.
    pub fn distance_up_to_phase(&self, other: &Self) -> f64 {
        if self.data.dim() != other.data.dim() {
            return f64::INFINITY;
        }
        let Some((idx, _)) = other
            .data
            .indexed_iter()
            .map(|(idx, z)| (idx, z.norm()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return f64::INFINITY;
        };
        let ratio = self.data[idx] / other.data[idx];
        if !ratio.norm().is_finite() || ratio.norm() < f64::EPSILON {
            return f64::INFINITY;
        }
        let phase = ratio / ratio.norm();
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b * phase).norm())
            .fold(0.0, f64::max)
    }

    /// Equality up to a global phase, within `tol` per entry.
    pub fn equiv(&self, other: &Self, tol: f64) -> bool {
        self.distance_up_to_phase(other) <= tol
    }

    /// The unitary a circuit implements.
    ///
    /// Instructions are composed in order, `U = M_last · … · M_first`.
    /// Barriers are skipped; measurements, resets, conditioned gates and
    /// opaque gates have no unitary and are rejected.
    pub fn from_circuit(circuit: &Circuit) -> IrResult<Self> {
        let n = circuit.num_qubits();
        if n > MAX_DENSE_QUBITS {
            return Err(IrError::TooManyQubits {
                num_qubits: n,
                max: MAX_DENSE_QUBITS,
            });
        }
        let mut total = Self::identity(n);
        for inst in circuit.instructions() {
            if let Some(matrix) = inst.unitary()? {
                let positions: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
                total.apply(&matrix, &positions)?;
            }
        }
        Ok(total)
    }
}

impl From<Unitary2x2> for Operator {
    fn from(u: Unitary2x2) -> Self {
        let [a, b, c, d] = u.data;
        Self {
            num_qubits: 1,
            data: Array2::from_shape_fn((2, 2), |(r, col)| match (r, col) {
                (0, 0) => a,
                (0, 1) => b,
                (1, 0) => c,
                _ => d,
            }),
        }
    }
}

/// Where the basis states of a small operator land in a larger register.
struct SlotLayout {
    /// Register bits touched by the operator.
    mask: usize,
    /// `offsets[s]` spreads sub-index `s` onto the register bits.
    offsets: Vec<usize>,
}

impl SlotLayout {
    fn new(num_qubits: usize, positions: &[usize], arity: usize) -> IrResult<Self> {
        if positions.len() != arity {
            return Err(IrError::InvalidMatrix(format!(
                "{arity}-qubit operator placed on {} positions",
                positions.len()
            )));
        }
        let mut mask = 0usize;
        for &p in positions {
            if p >= num_qubits {
                return Err(IrError::InvalidMatrix(format!(
                    "position {p} outside a {num_qubits}-qubit register"
                )));
            }
            if mask & (1 << p) != 0 {
                return Err(IrError::InvalidMatrix(format!("position {p} used twice")));
            }
            mask |= 1 << p;
        }
        let offsets = (0..1usize << arity)
            .map(|s| {
                positions
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (s >> j) & 1 == 1)
                    .fold(0, |acc, (_, &p)| acc | (1 << p))
            })
            .collect();
        Ok(Self { mask, offsets })
    }

    /// Register indices with every operator bit cleared.
    fn bases(&self, dim: usize) -> impl Iterator<Item = usize> + '_ {
        (0..dim).filter(move |b| b & self.mask == 0)
    }
}
