//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::operator::Operator;
use crate::unitary::Unitary2x2;

/// Tolerance used when accepting a user-supplied matrix as unitary.
pub const UNITARY_TOLERANCE: f64 = 1e-8;

/// Standard gates with known semantics.
///
/// Multi-qubit matrices follow the little-endian convention: operand `j` of
/// the instruction is bit `j` of the matrix index, so for `CX` the control is
/// bit 0 and the target bit 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// XX rotation gate.
    RXX(f64),
    /// YY rotation gate.
    RYY(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![*p],

            StandardGate::U(a, b, c) => vec![*a, *b, *c],

            _ => vec![],
        }
    }

    /// The 2x2 matrix of a single-qubit gate, `None` for wider gates.
    pub fn matrix_2x2(&self) -> Option<Unitary2x2> {
        let u = match self {
            StandardGate::I => Unitary2x2::identity(),
            StandardGate::X => Unitary2x2::x(),
            StandardGate::Y => Unitary2x2::y(),
            StandardGate::Z => Unitary2x2::z(),
            StandardGate::H => Unitary2x2::h(),
            StandardGate::S => Unitary2x2::s(),
            StandardGate::Sdg => Unitary2x2::sdg(),
            StandardGate::T => Unitary2x2::t(),
            StandardGate::Tdg => Unitary2x2::tdg(),
            StandardGate::SX => Unitary2x2::sx(),
            StandardGate::SXdg => Unitary2x2::sxdg(),
            StandardGate::Rx(t) => Unitary2x2::rx(*t),
            StandardGate::Ry(t) => Unitary2x2::ry(*t),
            StandardGate::Rz(t) => Unitary2x2::rz(*t),
            StandardGate::P(l) => Unitary2x2::p(*l),
            StandardGate::U(t, p, l) => Unitary2x2::u(*t, *p, *l),
            _ => return None,
        };
        Some(u)
    }

    /// The gate's matrix in little-endian operand order.
    pub fn matrix(&self) -> Operator {
        if let Some(u) = self.matrix_2x2() {
            return Operator::from(u);
        }

        let i = Complex64::new(0.0, 1.0);
        match self {
            StandardGate::CX => controlled(Unitary2x2::x()),
            StandardGate::CY => controlled(Unitary2x2::y()),
            StandardGate::CZ => controlled(Unitary2x2::z()),
            StandardGate::CH => controlled(Unitary2x2::h()),
            StandardGate::CRx(t) => controlled(Unitary2x2::rx(*t)),
            StandardGate::CRy(t) => controlled(Unitary2x2::ry(*t)),
            StandardGate::CRz(t) => controlled(Unitary2x2::rz(*t)),
            StandardGate::CP(l) => controlled(Unitary2x2::p(*l)),
            StandardGate::Swap => permutation(2, &[(1, 2)]),
            StandardGate::ISwap => {
                let mut op = Operator::identity(2);
                let m = op.matrix_mut();
                m[[1, 1]] = Complex64::new(0.0, 0.0);
                m[[2, 2]] = Complex64::new(0.0, 0.0);
                m[[1, 2]] = i;
                m[[2, 1]] = i;
                op
            }
            StandardGate::RXX(t) => {
                let (c, s) = half_angle(*t);
                let mut op = Operator::identity(2);
                let m = op.matrix_mut();
                for k in 0..4 {
                    m[[k, k]] = c;
                    m[[k, 3 - k]] = -i * s;
                }
                op
            }
            StandardGate::RYY(t) => {
                let (c, s) = half_angle(*t);
                let mut op = Operator::identity(2);
                let m = op.matrix_mut();
                for k in 0..4 {
                    m[[k, k]] = c;
                }
                m[[0, 3]] = i * s;
                m[[3, 0]] = i * s;
                m[[1, 2]] = -i * s;
                m[[2, 1]] = -i * s;
                op
            }
            StandardGate::RZZ(t) => {
                let outer = Complex64::from_polar(1.0, -t / 2.0);
                let inner = Complex64::from_polar(1.0, t / 2.0);
                let mut op = Operator::identity(2);
                let m = op.matrix_mut();
                m[[0, 0]] = outer;
                m[[1, 1]] = inner;
                m[[2, 2]] = inner;
                m[[3, 3]] = outer;
                op
            }
            StandardGate::CCX => permutation(3, &[(3, 7)]),
            StandardGate::CSwap => permutation(3, &[(3, 5)]),
            _ => unreachable!("single-qubit gates are handled above"),
        }
    }
}

fn half_angle(theta: f64) -> (Complex64, Complex64) {
    (
        Complex64::new((theta / 2.0).cos(), 0.0),
        Complex64::new((theta / 2.0).sin(), 0.0),
    )
}

/// Two-qubit controlled gate, control on operand 0.
fn controlled(u: Unitary2x2) -> Operator {
    let mut op = Operator::identity(2);
    let m = op.matrix_mut();
    m[[1, 1]] = u.data[0];
    m[[1, 3]] = u.data[1];
    m[[3, 1]] = u.data[2];
    m[[3, 3]] = u.data[3];
    op
}

/// Identity with the listed basis states exchanged.
fn permutation(num_qubits: usize, swaps: &[(usize, usize)]) -> Operator {
    let mut op = Operator::identity(num_qubits);
    let m = op.matrix_mut();
    for &(a, b) in swaps {
        m[[a, a]] = Complex64::new(0.0, 0.0);
        m[[b, b]] = Complex64::new(0.0, 0.0);
        m[[a, b]] = Complex64::new(1.0, 0.0);
        m[[b, a]] = Complex64::new(1.0, 0.0);
    }
    op
}

/// A quantum gate, either standard, opaque or matrix-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// An opaque named gate with no known matrix.
    Custom(CustomGate),
    /// A gate defined by its dense unitary matrix.
    Unitary(UnitaryGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
            GateKind::Unitary(_) => "unitary",
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
            GateKind::Unitary(g) => g.num_qubits(),
        }
    }
}

/// An opaque gate: a name, an arity and parameters, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Parameters of the gate.
    pub params: Vec<f64>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

/// A gate given by an explicit unitary matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    matrix: Operator,
}

impl UnitaryGate {
    /// Wrap a matrix, rejecting anything that is not unitary.
    pub fn new(matrix: Operator) -> IrResult<Self> {
        let deviation = matrix.unitary_deviation();
        if deviation > UNITARY_TOLERANCE {
            return Err(IrError::NotUnitary { deviation });
        }
        Ok(Self { matrix })
    }

    /// The wrapped matrix.
    pub fn matrix(&self) -> &Operator {
        &self.matrix
    }

    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> u32 {
        self.matrix.num_qubits() as u32
    }
}

/// Classical condition for conditional gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalCondition {
    /// The name of the classical register.
    pub register: String,
    /// The value to compare against.
    pub value: u64,
}

impl ClassicalCondition {
    /// Create a new classical condition.
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional classical condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
            condition: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
            condition: None,
        }
    }

    /// Create a matrix-defined gate.
    pub fn unitary(matrix: Operator) -> IrResult<Self> {
        Ok(Self {
            kind: GateKind::Unitary(UnitaryGate::new(matrix)?),
            label: None,
            condition: None,
        })
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a classical condition to the gate.
    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Get the standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            _ => None,
        }
    }

    /// The gate's matrix. Opaque gates have none.
    pub fn matrix(&self) -> IrResult<Operator> {
        match &self.kind {
            GateKind::Standard(g) => Ok(g.matrix()),
            GateKind::Unitary(g) => Ok(g.matrix().clone()),
            GateKind::Custom(g) => Err(IrError::NoMatrix(g.name.clone())),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Self {
            kind: GateKind::Unitary(gate),
            label: None,
            condition: None,
        }
    }
}
