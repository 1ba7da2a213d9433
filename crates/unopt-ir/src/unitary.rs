//! 2x2 unitary matrices.
//!
//! Single-qubit algebra used by gate definitions, the single-qubit merge pass
//! and controlled-gate synthesis: products, adjoints, square roots and the ZYZ
//! Euler decomposition.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

/// Euler angles of `e^{i·phase} · Rz(alpha) · Ry(beta) · Rz(gamma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZyzAngles {
    /// Left Z rotation.
    pub alpha: f64,
    /// Y rotation.
    pub beta: f64,
    /// Right Z rotation.
    pub gamma: f64,
    /// Global phase.
    pub phase: f64,
}

impl ZyzAngles {
    /// Parameters `(theta, phi, lambda)` of the equivalent `U` gate and the
    /// global phase left over, i.e. `self == e^{i·phase} · U(theta, phi, lambda)`.
    pub fn to_u(self) -> ((f64, f64, f64), f64) {
        (
            (self.beta, self.alpha, self.gamma),
            self.phase - (self.alpha + self.gamma) / 2.0,
        )
    }
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::new(ONE, ZERO, ZERO, -ONE)
    }

    /// Create an S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    /// Create an S-dagger gate.
    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    /// Create a T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// Create a T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// Create an SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let plus = Complex64::new(0.5, 0.5);
        let minus = Complex64::new(0.5, -0.5);
        Self::new(plus, minus, minus, plus)
    }

    /// Create an SX-dagger gate.
    pub fn sxdg() -> Self {
        Self::sx().dagger()
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        Self::new(c, s, s, c)
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        Self::new(c, -s, s, c)
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, lambda))
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Multiply every entry by a scalar.
    pub fn scale(&self, factor: Complex64) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a * factor, b * factor, c * factor, d * factor)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Determinant.
    pub fn det(&self) -> Complex64 {
        self.data[0] * self.data[3] - self.data[1] * self.data[2]
    }

    /// Trace.
    pub fn trace(&self) -> Complex64 {
        self.data[0] + self.data[3]
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        if b.norm() > EPSILON || c.norm() > EPSILON {
            return false;
        }
        (a - d).norm() < EPSILON
    }

    /// A unitary square root `V` with `V · V == self`.
    ///
    /// Uses `V = (U + s·I) / t` with `s² = det U` and `t² = tr U + 2s`; the
    /// sign of `s` is picked so that `t` stays away from zero.
    pub fn sqrt(&self) -> Self {
        let root_det = self.det().sqrt();
        let tr = self.trace();
        let s = if (tr + root_det * 2.0).norm() >= (tr - root_det * 2.0).norm() {
            root_det
        } else {
            -root_det
        };
        let t = (tr + s * 2.0).sqrt();
        let [a, b, c, d] = self.data;
        Self::new((a + s) / t, b / t, c / t, (d + s) / t)
    }

    /// Decompose into `e^{i·phase} · RZ(alpha) · RY(beta) · RZ(gamma)`.
    pub fn zyz_decomposition(&self) -> ZyzAngles {
        let phase = self.det().arg() / 2.0;
        let unphase = Complex64::from_polar(1.0, -phase);
        // First column of the SU(2) part fixes all three angles.
        let a = self.data[0] * unphase;
        let c = self.data[2] * unphase;

        let beta = 2.0 * c.norm().atan2(a.norm());
        let sum = -2.0 * a.arg();
        let diff = 2.0 * c.arg();

        ZyzAngles {
            alpha: (sum + diff) / 2.0,
            beta,
            gamma: (sum - diff) / 2.0,
            phase,
        }
    }

    /// Largest entry-wise distance to `other` after removing a global phase.
    pub fn distance_up_to_phase(&self, other: &Self) -> f64 {
        let (idx, _) = other
            .data
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, z)| {
                if z.norm() > best.1 { (i, z.norm()) } else { best }
            });
        let ratio = self.data[idx] / other.data[idx];
        if ratio.norm() < EPSILON {
            return f64::INFINITY;
        }
        let phase = ratio / ratio.norm();
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(x, y)| (x - y * phase).norm())
            .fold(0.0, f64::max)
    }

    /// Normalize angles to [-pi, pi].
    pub fn normalize_angle(angle: f64) -> f64 {
        if angle.is_nan() || angle.is_infinite() {
            return 0.0;
        }
        let mut a = angle.rem_euclid(2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        }
        a
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
