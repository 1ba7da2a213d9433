//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::operator::Operator;
use crate::qubit::{ClbitId, QubitId, Register};

/// A quantum circuit: registers plus an ordered instruction list.
///
/// Instruction order is program order; earlier instructions act first. Every
/// instruction is validated against the registers when it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Quantum registers in declaration order.
    qregs: Vec<Register>,
    /// Classical registers in declaration order.
    cregs: Vec<Register>,
    /// Total number of qubits across registers.
    num_qubits: u32,
    /// Total number of classical bits across registers.
    num_clbits: u32,
    /// The instruction stream.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: vec![],
            cregs: vec![],
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a `q` register and, if non-empty, a `c` register.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.qregs.push(Register::new("q", 0, num_qubits));
            circuit.num_qubits = num_qubits;
        }
        if num_clbits > 0 {
            circuit.cregs.push(Register::new("c", 0, num_clbits));
            circuit.num_clbits = num_clbits;
        }
        circuit
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<QubitId>> {
        let name = name.into();
        if self.qregs.iter().chain(&self.cregs).any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let offset = self.num_qubits;
        let Some(end) = offset.checked_add(size) else {
            return Err(IrError::RegisterOverflow {
                name,
                size,
                existing: offset,
            });
        };
        self.qregs.push(Register::new(name, offset, size));
        self.num_qubits = end;
        Ok((offset..end).map(QubitId).collect())
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<ClbitId>> {
        let name = name.into();
        if self.qregs.iter().chain(&self.cregs).any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let offset = self.num_clbits;
        let Some(end) = offset.checked_add(size) else {
            return Err(IrError::RegisterOverflow {
                name,
                size,
                existing: offset,
            });
        };
        self.cregs.push(Register::new(name, offset, size));
        self.num_clbits = end;
        Ok((offset..end).map(ClbitId).collect())
    }

    /// A circuit over the same registers holding `instructions` instead.
    pub fn with_instructions(
        &self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self {
            name: self.name.clone(),
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: vec![],
        };
        for inst in instructions {
            circuit.push(inst)?;
        }
        Ok(circuit)
    }

    /// An empty circuit over the same registers.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, inst: Instruction) -> IrResult<&mut Self> {
        self.validate(&inst)?;
        self.instructions.push(inst);
        Ok(self)
    }

    fn validate(&self, inst: &Instruction) -> IrResult<()> {
        let gate_name = || Some(inst.name().to_string());

        for (i, &qubit) in inst.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name(),
                });
            }
            if inst.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }
        for &clbit in &inst.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name(),
                });
            }
        }

        match &inst.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = inst.qubits.len() as u32;
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got,
                    });
                }
                if let Some(cond) = &gate.condition {
                    if self.creg(&cond.register).is_none() {
                        return Err(IrError::UnknownRegister(cond.register.clone()));
                    }
                }
            }
            InstructionKind::Measure => {
                if inst.qubits.len() != inst.clbits.len() {
                    return Err(IrError::ClbitCountMismatch {
                        qubits: inst.qubits.len(),
                        clbits: inst.clbits.len(),
                    });
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn apply1(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(gate, qubit))
    }

    fn apply2(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(gate, q1, q2))
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::I, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::P(lambda), qubit)
    }

    /// Apply universal U(θ, φ, λ) gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CX, control, target)
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CY, control, target)
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::Swap, q1, q2)
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::ISwap, q1, q2)
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRx(theta), control, target)
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRy(theta), control, target)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRz(theta), control, target)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CP(lambda), control, target)
    }

    /// Apply XX rotation.
    pub fn rxx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::RXX(theta), q1, q2)
    }

    /// Apply YY rotation.
    pub fn ryy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::RYY(theta), q1, q2)
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::RZZ(theta), q1, q2)
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Apply a dense unitary; operand `j` is bit `j` of the matrix index.
    pub fn unitary(
        &mut self,
        matrix: Operator,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::unitary(matrix)?, qubits))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure all qubits into classical bits of the same index.
    ///
    /// Adds a `meas` register when the circuit has too few classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        if self.num_clbits < self.num_qubits {
            let missing = self.num_qubits - self.num_clbits;
            self.add_creg("meas", missing)?;
        }
        let qubits: Vec<_> = self.qubits().collect();
        let clbits: Vec<_> = (0..self.num_qubits).map(ClbitId).collect();
        self.push(Instruction::measure_all(qubits, clbits)?)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits().collect();
        self.push(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// All qubit ids in ascending order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.num_qubits).map(QubitId)
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&Register> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Register and index holding a qubit.
    pub fn locate_qubit(&self, qubit: QubitId) -> Option<(&Register, u32)> {
        self.qregs
            .iter()
            .find(|r| r.contains(qubit.0))
            .map(|r| (r, qubit.0 - r.offset))
    }

    /// Register and index holding a classical bit.
    pub fn locate_clbit(&self, clbit: ClbitId) -> Option<(&Register, u32)> {
        self.cregs
            .iter()
            .find(|r| r.contains(clbit.0))
            .map(|r| (r, clbit.0 - r.offset))
    }

    /// The instruction stream in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the circuit and return its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Circuit depth; barriers do not count.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits()];
        let mut clbit_level = vec![0usize; self.num_clbits()];
        let mut depth = 0;

        for inst in &self.instructions {
            if inst.is_barrier() {
                continue;
            }
            let mut clbits: Vec<usize> = inst.clbits.iter().map(|c| c.0 as usize).collect();
            if let Some(cond) = inst.as_gate().and_then(|g| g.condition.as_ref()) {
                if let Some(reg) = self.creg(&cond.register) {
                    clbits.extend((reg.offset..reg.offset + reg.size).map(|c| c as usize));
                }
            }
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(clbits.iter().map(|&c| clbit_level[c]))
                .max()
                .unwrap_or(0);
            let level = start + 1;
            for q in &inst.qubits {
                qubit_level[q.index()] = level;
            }
            for c in clbits {
                clbit_level[c] = level;
            }
            depth = depth.max(level);
        }
        depth
    }

    /// Instruction counts by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of gates acting on two or more qubits.
    pub fn num_nonlocal_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| inst.is_gate() && inst.qubits.len() >= 2)
            .count()
    }

    /// Whether any instruction is a matrix-defined unitary.
    pub fn has_unitary_gates(&self) -> bool {
        self.instructions.iter().any(|inst| {
            matches!(
                inst.as_gate().map(|g| &g.kind),
                Some(GateKind::Unitary(_))
            )
        })
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a GHZ state circuit (without measurements).
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, 0);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        Ok(circuit)
    }

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        use std::f64::consts::PI;

        let mut circuit = Self::with_size("qft", n, 0);
        for i in 0..n {
            circuit.h(QubitId(i))?;
            for j in (i + 1)..n {
                let angle = PI / 2f64.powi((j - i) as i32);
                circuit.cp(angle, QubitId(j), QubitId(i))?;
            }
        }
        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }
        Ok(circuit)
    }
}
