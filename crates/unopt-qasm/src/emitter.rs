//! OpenQASM 2 emitter for serializing circuits.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use unopt_ir::{
    Circuit, ClbitId, CustomGate, Gate, GateKind, Instruction, InstructionKind, IrError, QubitId,
    StandardGate,
};

use crate::error::{ParseError, ParseResult};
use crate::parser::STANDARD_INCLUDE;

/// Emit a circuit as OpenQASM 2.0 source code.
pub fn emit(circuit: &Circuit) -> ParseResult<String> {
    emit_with_header(circuit, &[])
}

/// Emit a circuit with `header` lines written as leading `//` comments.
///
/// Gates outside `qelib1.inc` (`iswap`, `ryy`) get inline definitions and
/// opaque gates get `opaque` declarations, so the output parses on its own.
/// Matrix-defined gates have no spelling and are an error.
pub fn emit_with_header(circuit: &Circuit, header: &[String]) -> ParseResult<String> {
    let mut emitter = Emitter::new(circuit);
    for line in header {
        emitter.writeln(&format!("// {line}"));
    }
    emitter.emit_circuit()?;
    Ok(emitter.output)
}

const ISWAP_DEFINITION: &str = "gate iswap a,b { s a; s b; h a; cx a,b; cx b,a; h b; }";
const RYY_DEFINITION: &str = "gate ryy(theta) a,b { rx(pi/2) a; rx(pi/2) b; cx a,b; \
                              rz(theta) b; cx a,b; rx(-pi/2) a; rx(-pi/2) b; }";

/// OpenQASM 2 emitter.
struct Emitter<'a> {
    circuit: &'a Circuit,
    output: String,
}

impl<'a> Emitter<'a> {
    fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self) -> ParseResult<()> {
        let circuit = self.circuit;

        self.writeln("OPENQASM 2.0;");
        self.writeln(&format!("include \"{STANDARD_INCLUDE}\";"));

        // Declarations for gates the standard library lacks.
        let mut needs_iswap = false;
        let mut needs_ryy = false;
        let mut opaques: Vec<&CustomGate> = Vec::new();
        for inst in circuit.instructions() {
            let Some(gate) = inst.as_gate() else {
                continue;
            };
            match &gate.kind {
                GateKind::Standard(StandardGate::ISwap) => needs_iswap = true,
                GateKind::Standard(StandardGate::RYY(_)) => needs_ryy = true,
                GateKind::Custom(custom) => {
                    if !opaques.iter().any(|o| o.name == custom.name) {
                        opaques.push(custom);
                    }
                }
                GateKind::Unitary(_) => {
                    let name = gate.label.as_deref().unwrap_or("unitary");
                    return Err(ParseError::Unemittable(name.to_string()));
                }
                GateKind::Standard(_) => {}
            }
        }
        if needs_iswap {
            self.writeln(ISWAP_DEFINITION);
        }
        if needs_ryy {
            self.writeln(RYY_DEFINITION);
        }
        for custom in opaques {
            self.writeln(&opaque_declaration(custom));
        }

        for reg in circuit.qregs() {
            self.writeln(&format!("qreg {}[{}];", reg.name, reg.size));
        }
        for reg in circuit.cregs() {
            self.writeln(&format!("creg {}[{}];", reg.name, reg.size));
        }

        for inst in circuit.instructions() {
            self.emit_instruction(inst)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> ParseResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = self.emit_qubits(&instruction.qubits)?;
                let call = gate_call(gate)?;
                match &gate.condition {
                    Some(cond) => self.writeln(&format!(
                        "if({}=={}) {call} {qubits};",
                        cond.register, cond.value
                    )),
                    None => self.writeln(&format!("{call} {qubits};")),
                }
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let q = self.qubit(*q)?;
                    let c = self.clbit(*c)?;
                    self.writeln(&format!("measure {q} -> {c};"));
                }
            }

            InstructionKind::Reset => {
                for q in &instruction.qubits {
                    let q = self.qubit(*q)?;
                    self.writeln(&format!("reset {q};"));
                }
            }

            InstructionKind::Barrier => {
                let qubits = self.emit_qubits(&instruction.qubits)?;
                self.writeln(&format!("barrier {qubits};"));
            }
        }

        Ok(())
    }

    fn qubit(&self, qubit: QubitId) -> ParseResult<String> {
        let (reg, idx) = self
            .circuit
            .locate_qubit(qubit)
            .ok_or(IrError::QubitNotFound {
                qubit,
                gate_name: None,
            })?;
        Ok(format!("{}[{idx}]", reg.name))
    }

    fn clbit(&self, clbit: ClbitId) -> ParseResult<String> {
        let (reg, idx) = self
            .circuit
            .locate_clbit(clbit)
            .ok_or(IrError::ClbitNotFound {
                clbit,
                gate_name: None,
            })?;
        Ok(format!("{}[{idx}]", reg.name))
    }

    fn emit_qubits(&self, qubits: &[QubitId]) -> ParseResult<String> {
        Ok(qubits
            .iter()
            .map(|q| self.qubit(*q))
            .collect::<ParseResult<Vec<_>>>()?
            .join(","))
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// `name(params)` for a gate.
fn gate_call(gate: &Gate) -> ParseResult<String> {
    let (name, params): (&str, Vec<f64>) = match &gate.kind {
        GateKind::Standard(std) => (qelib1_name(std), std.parameters()),
        GateKind::Custom(custom) => (custom.name.as_str(), custom.params.clone()),
        GateKind::Unitary(_) => {
            let name = gate.label.as_deref().unwrap_or("unitary");
            return Err(ParseError::Unemittable(name.to_string()));
        }
    };
    if params.is_empty() {
        Ok(name.to_string())
    } else {
        let params: Vec<String> = params.into_iter().map(format_param).collect();
        Ok(format!("{name}({})", params.join(",")))
    }
}

/// Spelling in `qelib1.inc`.
fn qelib1_name(gate: &StandardGate) -> &'static str {
    match gate {
        StandardGate::U(..) => "u3",
        other => other.name(),
    }
}

fn opaque_declaration(custom: &CustomGate) -> String {
    let qubits: Vec<String> = (0..custom.num_qubits).map(|i| format!("q{i}")).collect();
    if custom.params.is_empty() {
        format!("opaque {} {};", custom.name, qubits.join(","))
    } else {
        let params: Vec<String> = (0..custom.params.len()).map(|i| format!("p{i}")).collect();
        format!(
            "opaque {}({}) {};",
            custom.name,
            params.join(","),
            qubits.join(",")
        )
    }
}

/// Shortest text that parses back to exactly `v`.
#[allow(clippy::float_cmp)]
fn format_param(v: f64) -> String {
    for (value, text) in [
        (PI, "pi"),
        (-PI, "-pi"),
        (FRAC_PI_2, "pi/2"),
        (-FRAC_PI_2, "-pi/2"),
        (FRAC_PI_4, "pi/4"),
        (-FRAC_PI_4, "-pi/4"),
    ] {
        if v == value {
            return text.to_string();
        }
    }
    format!("{v}")
}
