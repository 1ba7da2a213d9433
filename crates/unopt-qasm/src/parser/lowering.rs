//! AST-to-Circuit lowering for OpenQASM 2.

use rustc_hash::FxHashMap;
use std::f64::consts::FRAC_PI_2;
use unopt_ir::{
    Circuit, ClassicalCondition, ClbitId, CustomGate, Instruction, IrError, QubitId, StandardGate,
};

use crate::ast::{Argument, GateCall, GateDef, Operation, Program, Statement};
use crate::error::{ParseError, ParseResult};

/// The only include the front end understands; its gates are built in.
pub const STANDARD_INCLUDE: &str = "qelib1.inc";

/// Largest register a source file may declare.
pub const MAX_REGISTER_SIZE: u32 = 1 << 20;

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new();
    for stmt in &program.statements {
        lowerer.lower_statement(stmt)?;
    }
    Ok(lowerer.circuit)
}

/// Parameter and qubit counts of a gate callable without a definition.
fn native_arity(name: &str) -> Option<(usize, usize)> {
    Some(match name {
        "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" => (0, 1),
        "rx" | "ry" | "rz" | "p" | "u1" => (1, 1),
        "u2" => (2, 1),
        "U" | "u" | "u3" => (3, 1),
        "CX" | "cx" | "cy" | "cz" | "ch" | "swap" | "iswap" => (0, 2),
        "crx" | "cry" | "crz" | "cp" | "cu1" | "rxx" | "ryy" | "rzz" => (1, 2),
        "cu3" => (3, 2),
        "ccx" | "cswap" => (0, 3),
        _ => return None,
    })
}

/// Instructions for a native gate; arity has already been checked.
fn native_instructions(name: &str, p: &[f64], q: &[QubitId]) -> Vec<Instruction> {
    let one = |gate: StandardGate| vec![Instruction::gate(gate, q.iter().copied())];
    match name {
        "id" => one(StandardGate::I),
        "x" => one(StandardGate::X),
        "y" => one(StandardGate::Y),
        "z" => one(StandardGate::Z),
        "h" => one(StandardGate::H),
        "s" => one(StandardGate::S),
        "sdg" => one(StandardGate::Sdg),
        "t" => one(StandardGate::T),
        "tdg" => one(StandardGate::Tdg),
        "sx" => one(StandardGate::SX),
        "sxdg" => one(StandardGate::SXdg),
        "rx" => one(StandardGate::Rx(p[0])),
        "ry" => one(StandardGate::Ry(p[0])),
        "rz" => one(StandardGate::Rz(p[0])),
        "p" | "u1" => one(StandardGate::P(p[0])),
        "u2" => one(StandardGate::U(FRAC_PI_2, p[0], p[1])),
        "U" | "u" | "u3" => one(StandardGate::U(p[0], p[1], p[2])),
        "CX" | "cx" => one(StandardGate::CX),
        "cy" => one(StandardGate::CY),
        "cz" => one(StandardGate::CZ),
        "ch" => one(StandardGate::CH),
        "swap" => one(StandardGate::Swap),
        "iswap" => one(StandardGate::ISwap),
        "crx" => one(StandardGate::CRx(p[0])),
        "cry" => one(StandardGate::CRy(p[0])),
        "crz" => one(StandardGate::CRz(p[0])),
        "cp" | "cu1" => one(StandardGate::CP(p[0])),
        "rxx" => one(StandardGate::RXX(p[0])),
        "ryy" => one(StandardGate::RYY(p[0])),
        "rzz" => one(StandardGate::RZZ(p[0])),
        "cu3" => {
            let (theta, phi, lambda) = (p[0], p[1], p[2]);
            let (c, t) = (q[0], q[1]);
            vec![
                Instruction::gate(StandardGate::P((lambda + phi) / 2.0), [c]),
                Instruction::gate(StandardGate::P((lambda - phi) / 2.0), [t]),
                Instruction::gate(StandardGate::CX, [c, t]),
                Instruction::gate(
                    StandardGate::U(-theta / 2.0, 0.0, -(phi + lambda) / 2.0),
                    [t],
                ),
                Instruction::gate(StandardGate::CX, [c, t]),
                Instruction::gate(StandardGate::U(theta / 2.0, phi, 0.0), [t]),
            ]
        }
        "ccx" => one(StandardGate::CCX),
        "cswap" => one(StandardGate::CSwap),
        _ => vec![],
    }
}

/// Lowers AST to Circuit.
struct Lowerer {
    circuit: Circuit,
    /// Qubit registers: name -> (first id, size).
    qregs: FxHashMap<String, (u32, u32)>,
    /// Classical registers: name -> (first id, size).
    cregs: FxHashMap<String, (u32, u32)>,
    gates: FxHashMap<String, GateDef>,
    opaques: FxHashMap<String, (usize, usize)>,
}

impl Lowerer {
    fn new() -> Self {
        Self {
            circuit: Circuit::new("circuit"),
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            gates: FxHashMap::default(),
            opaques: FxHashMap::default(),
        }
    }

    fn lower_statement(&mut self, stmt: &Statement) -> ParseResult<()> {
        match stmt {
            Statement::Include(path) => {
                if path == STANDARD_INCLUDE {
                    Ok(())
                } else {
                    Err(ParseError::UnsupportedInclude(path.clone()))
                }
            }

            Statement::QregDecl { name, size } => {
                self.check_register_name(name)?;
                check_register_size(name, *size)?;
                let ids = self.circuit.add_qreg(name.clone(), *size)?;
                let first = ids.first().map_or(0, |q| q.0);
                self.qregs.insert(name.clone(), (first, *size));
                Ok(())
            }

            Statement::CregDecl { name, size } => {
                self.check_register_name(name)?;
                check_register_size(name, *size)?;
                let ids = self.circuit.add_creg(name.clone(), *size)?;
                let first = ids.first().map_or(0, |c| c.0);
                self.cregs.insert(name.clone(), (first, *size));
                Ok(())
            }

            Statement::GateDef(def) => self.define_gate(def),

            Statement::Opaque {
                name,
                params,
                qubits,
            } => {
                self.check_gate_name(name)?;
                self.opaques
                    .insert(name.clone(), (params.len(), qubits.len()));
                Ok(())
            }

            Statement::Operation(op) => self.lower_operation(op, None),

            Statement::If {
                register,
                value,
                operation,
            } => {
                if !self.cregs.contains_key(register) {
                    return Err(ParseError::UndefinedIdentifier(register.clone()));
                }
                let condition = ClassicalCondition::new(register.clone(), *value);
                self.lower_operation(operation, Some(&condition))
            }
        }
    }

    fn check_register_name(&self, name: &str) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration(name.to_string()));
        }
        Ok(())
    }

    fn check_gate_name(&self, name: &str) -> ParseResult<()> {
        if self.gates.contains_key(name) || self.opaques.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration(name.to_string()));
        }
        Ok(())
    }

    /// Record a definition after checking its body only uses known gates and
    /// its own formal names.
    ///
    /// A definition of a gate that is also native (such as `iswap` or `ryy`,
    /// which emitted files define inline) is recorded, but calls keep using
    /// the native gate.
    fn define_gate(&mut self, def: &GateDef) -> ParseResult<()> {
        self.check_gate_name(&def.name)?;
        for op in &def.body {
            let args = match op {
                Operation::Gate(call) => {
                    if call.name == def.name || !self.is_known(&call.name) {
                        return Err(ParseError::UnknownGate(call.name.clone()));
                    }
                    &call.args
                }
                Operation::Barrier(args) => args,
                Operation::Measure { .. } | Operation::Reset(_) => {
                    return Err(ParseError::UnsupportedStatement(format!(
                        "non-unitary operation in gate '{}'",
                        def.name
                    )));
                }
            };
            for arg in args {
                if arg.index.is_some() || !def.qubits.contains(&arg.register) {
                    return Err(ParseError::UndefinedIdentifier(arg.register.clone()));
                }
            }
        }
        self.gates.insert(def.name.clone(), def.clone());
        Ok(())
    }

    fn is_known(&self, name: &str) -> bool {
        native_arity(name).is_some()
            || self.gates.contains_key(name)
            || self.opaques.contains_key(name)
    }

    fn lower_operation(
        &mut self,
        op: &Operation,
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        match op {
            Operation::Gate(call) => self.lower_gate_call(call, condition),

            Operation::Measure { qubit, bit } => {
                if condition.is_some() {
                    return Err(ParseError::UnsupportedStatement(
                        "conditional measure".into(),
                    ));
                }
                let qubits = self.resolve_qubits(qubit)?;
                let clbits = self.resolve_clbits(bit)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::RegisterSizeMismatch("measure".into()));
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.circuit.measure(q, c)?;
                }
                Ok(())
            }

            Operation::Reset(arg) => {
                if condition.is_some() {
                    return Err(ParseError::UnsupportedStatement("conditional reset".into()));
                }
                for q in self.resolve_qubits(arg)? {
                    self.circuit.reset(q)?;
                }
                Ok(())
            }

            Operation::Barrier(args) => {
                let mut qubits: Vec<QubitId> = Vec::new();
                for arg in args {
                    for q in self.resolve_qubits(arg)? {
                        if !qubits.contains(&q) {
                            qubits.push(q);
                        }
                    }
                }
                self.circuit.barrier(qubits)?;
                Ok(())
            }
        }
    }

    /// Evaluate parameters and broadcast whole-register arguments.
    fn lower_gate_call(
        &mut self,
        call: &GateCall,
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let env = FxHashMap::default();
        let params = call
            .params
            .iter()
            .map(|e| e.eval(&env))
            .collect::<ParseResult<Vec<_>>>()?;

        let groups = call
            .args
            .iter()
            .map(|arg| self.resolve_qubits(arg))
            .collect::<ParseResult<Vec<_>>>()?;
        let width = broadcast_width(&call.name, &call.args, &groups)?;

        for i in 0..width {
            let qubits: Vec<QubitId> = groups
                .iter()
                .map(|g| if g.len() == 1 { g[0] } else { g[i] })
                .collect();
            if let Some(pos) = (1..qubits.len()).find(|&k| qubits[..k].contains(&qubits[k])) {
                return Err(IrError::DuplicateQubit {
                    qubit: qubits[pos],
                    gate_name: Some(call.name.clone()),
                }
                .into());
            }
            self.apply_gate(&call.name, &params, &qubits, condition)?;
        }
        Ok(())
    }

    fn apply_gate(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[QubitId],
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        if let Some((num_params, num_qubits)) = native_arity(name) {
            check_counts(name, params, num_params, qubits, num_qubits)?;
            for inst in native_instructions(name, params, qubits) {
                self.push(inst, condition)?;
            }
            return Ok(());
        }

        if let Some(def) = self.gates.get(name).cloned() {
            check_counts(name, params, def.params.len(), qubits, def.qubits.len())?;
            return self.expand_definition(&def, params, qubits, condition);
        }

        if let Some(&(num_params, num_qubits)) = self.opaques.get(name) {
            check_counts(name, params, num_params, qubits, num_qubits)?;
            let gate = CustomGate::new(name, num_qubits as u32).with_params(params.to_vec());
            return self.push(Instruction::gate(gate, qubits.iter().copied()), condition);
        }

        Err(ParseError::UnknownGate(name.to_string()))
    }

    /// Inline a user gate with its formal parameters and qubits bound.
    fn expand_definition(
        &mut self,
        def: &GateDef,
        params: &[f64],
        qubits: &[QubitId],
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let env: FxHashMap<String, f64> = def
            .params
            .iter()
            .cloned()
            .zip(params.iter().copied())
            .collect();
        let formal: FxHashMap<&str, QubitId> = def
            .qubits
            .iter()
            .map(String::as_str)
            .zip(qubits.iter().copied())
            .collect();
        let bind = |args: &[Argument]| -> ParseResult<Vec<QubitId>> {
            args.iter()
                .map(|a| {
                    formal
                        .get(a.register.as_str())
                        .copied()
                        .ok_or_else(|| ParseError::UndefinedIdentifier(a.register.clone()))
                })
                .collect()
        };

        for op in &def.body {
            match op {
                Operation::Gate(call) => {
                    let values = call
                        .params
                        .iter()
                        .map(|e| e.eval(&env))
                        .collect::<ParseResult<Vec<_>>>()?;
                    let operands = bind(&call.args)?;
                    self.apply_gate(&call.name, &values, &operands, condition)?;
                }
                Operation::Barrier(args) => {
                    let operands = bind(args)?;
                    self.circuit.barrier(operands)?;
                }
                // Rejected when the gate was defined.
                Operation::Measure { .. } | Operation::Reset(_) => {}
            }
        }
        Ok(())
    }

    fn push(
        &mut self,
        mut inst: Instruction,
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        if let (Some(cond), Some(gate)) = (condition, inst.gate_mut()) {
            gate.condition = Some(cond.clone());
        }
        self.circuit.push(inst)?;
        Ok(())
    }

    fn resolve_qubits(&self, arg: &Argument) -> ParseResult<Vec<QubitId>> {
        let (start, size) = lookup(&self.qregs, arg)?;
        Ok(indices(arg, start, size)?.map(QubitId).collect())
    }

    fn resolve_clbits(&self, arg: &Argument) -> ParseResult<Vec<ClbitId>> {
        let (start, size) = lookup(&self.cregs, arg)?;
        Ok(indices(arg, start, size)?.map(ClbitId).collect())
    }
}

fn lookup(registers: &FxHashMap<String, (u32, u32)>, arg: &Argument) -> ParseResult<(u32, u32)> {
    registers
        .get(&arg.register)
        .copied()
        .ok_or_else(|| ParseError::UndefinedIdentifier(arg.register.clone()))
}

/// Flat ids named by `arg` in a register starting at `start`.
fn indices(
    arg: &Argument,
    start: u32,
    size: u32,
) -> ParseResult<std::ops::Range<u32>> {
    match arg.index {
        Some(idx) if idx >= size => Err(ParseError::IndexOutOfBounds {
            register: arg.register.clone(),
            index: idx as usize,
            size: size as usize,
        }),
        Some(idx) => Ok(start + idx..start + idx + 1),
        None => Ok(start..start + size),
    }
}

/// Number of calls a broadcast expands to.
///
/// Every whole-register argument must have the same size; single qubits are
/// repeated.
fn broadcast_width(name: &str, args: &[Argument], groups: &[Vec<QubitId>]) -> ParseResult<usize> {
    let mut width = None;
    for (arg, group) in args.iter().zip(groups) {
        if arg.index.is_some() {
            continue;
        }
        match width {
            None => width = Some(group.len()),
            Some(w) if w != group.len() => {
                return Err(ParseError::RegisterSizeMismatch(name.to_string()));
            }
            Some(_) => {}
        }
    }
    Ok(width.unwrap_or(1))
}

fn check_register_size(name: &str, size: u32) -> ParseResult<()> {
    if size > MAX_REGISTER_SIZE {
        return Err(ParseError::RegisterTooLarge {
            register: name.into(),
            size,
            max: MAX_REGISTER_SIZE,
        });
    }
    Ok(())
}

fn check_counts(
    gate: &str,
    params: &[f64],
    expected_params: usize,
    qubits: &[QubitId],
    expected_qubits: usize,
) -> ParseResult<()> {
    if params.len() != expected_params {
        return Err(ParseError::WrongParameterCount {
            gate: gate.into(),
            expected: expected_params,
            got: params.len(),
        });
    }
    if qubits.len() != expected_qubits {
        return Err(ParseError::WrongQubitCount {
            gate: gate.into(),
            expected: expected_qubits,
            got: qubits.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::error::ParseError;
    use num_complex::Complex64;
    use unopt_ir::{ClbitId, IrError, Operator, QubitId, StandardGate};

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    fn parse_body(body: &str) -> Result<unopt_ir::Circuit, ParseError> {
        parse(&format!("{HEADER}{body}"))
    }

    fn unitary(body: &str) -> Operator {
        Operator::from_circuit(&parse_body(body).unwrap()).unwrap()
    }

    #[test]
    fn test_multiple_registers_are_flat() {
        let circuit = parse_body("qreg a[2]; qreg b[3]; creg c[5]; cx a[1], b[0];").unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.qregs().len(), 2);
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_register_broadcast() {
        let circuit = parse_body("qreg a[3]; qreg b[3]; creg c[3]; h a; cx a, b; cx a[0], b; measure b -> c;")
            .unwrap();
        assert_eq!(circuit.count_ops().get("h"), Some(&3));
        assert_eq!(circuit.count_ops().get("cx"), Some(&6));
        assert_eq!(circuit.count_ops().get("measure"), Some(&3));
        let last = circuit.instructions().last().unwrap();
        assert_eq!(last.qubits, vec![QubitId(5)]);
        assert_eq!(last.clbits, vec![ClbitId(2)]);
    }

    #[test]
    fn test_oversized_register_is_rejected() {
        let err = parse_body("qreg q[4000000000];").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RegisterTooLarge { ref register, size: 4_000_000_000, max }
                if register == "q" && max == super::MAX_REGISTER_SIZE
        ));

        let err = parse_body("qreg q[2]; creg c[1048577];").unwrap_err();
        assert!(matches!(err, ParseError::RegisterTooLarge { size: 1_048_577, .. }));

        let circuit = parse_body("qreg q[1]; creg c[1048576];").unwrap();
        assert_eq!(circuit.num_clbits(), 1 << 20);
    }

    #[test]
    fn test_broadcast_size_mismatch() {
        let err = parse_body("qreg a[2]; qreg b[3]; cx a, b;").unwrap_err();
        assert!(matches!(err, ParseError::RegisterSizeMismatch(ref g) if g == "cx"));
    }

    #[test]
    fn test_duplicate_operand() {
        let err = parse_body("qreg q[2]; cx q[1], q[1];").unwrap_err();
        assert!(matches!(
            err,
            ParseError::CircuitError(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_legacy_gate_names() {
        let expected = unitary("qreg q[1]; U(pi/2, 0.3, -0.2) q[0]; U(0, 0, 0.7) q[0];");
        let legacy = unitary("qreg q[1]; u2(0.3, -0.2) q[0]; u1(0.7) q[0];");
        assert!(legacy.equiv(&expected, 1e-12));
    }

    #[test]
    fn test_cu3_is_controlled_u() {
        let (theta, phi, lambda) = (0.9, -0.4, 1.3);
        let u = StandardGate::U(theta, phi, lambda).matrix();
        // Operand 0 (control) is bit 0 of the index.
        let entries: Vec<Complex64> = (0..4)
            .flat_map(|row| (0..4).map(move |col| (row, col)))
            .map(|(row, col): (usize, usize)| {
                let (rc, rt, cc, ct) = (row & 1, row >> 1, col & 1, col >> 1);
                match (rc, cc) {
                    (1, 1) => u.matrix()[[rt, ct]],
                    (0, 0) if rt == ct => Complex64::new(1.0, 0.0),
                    _ => Complex64::new(0.0, 0.0),
                }
            })
            .collect();
        let expected = Operator::from_row_major(2, entries).unwrap();
        let parsed = unitary("qreg q[2]; cu3(0.9, -0.4, 1.3) q[0], q[1];");
        assert!(parsed.equiv(&expected, 1e-12));
    }

    #[test]
    fn test_user_gates_are_inlined() {
        let source = "qreg q[3];
            gate bell a, b { h a; cx a, b; }
            gate chain(t) a, b, c { bell a, b; rz(t/2) c; barrier a, c; bell b, c; }
            chain(pi) q[2], q[0], q[1];";
        let circuit = parse_body(source).unwrap();
        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, vec!["h", "cx", "rz", "barrier", "h", "cx"]);
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(2), QubitId(0)]);
        assert_eq!(circuit.instructions()[3].qubits, vec![QubitId(2), QubitId(1)]);
        assert_eq!(
            circuit.instructions()[2].as_gate().and_then(|g| g.as_standard()),
            Some(&StandardGate::Rz(std::f64::consts::FRAC_PI_2))
        );
    }

    #[test]
    fn test_gate_body_must_use_known_gates() {
        let err = parse_body("gate g a { mystery a; }").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate(ref g) if g == "mystery"));

        let err = parse_body("gate g a { h b; }").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(ref g) if g == "b"));

        let err = parse_body("gate g a { g a; }").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate(_)));
    }

    #[test]
    fn test_native_definition_keeps_native_gate() {
        let source = "qreg q[2];
            gate iswap a, b { s a; s b; h a; cx a, b; cx b, a; h b; }
            iswap q[0], q[1];";
        let circuit = parse_body(source).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.instructions()[0].name(), "iswap");
    }

    #[test]
    fn test_opaque_gates() {
        let circuit = parse_body("qreg q[2]; opaque oracle(k) a, b; oracle(3) q[1], q[0];").unwrap();
        let gate = circuit.instructions()[0].as_gate().unwrap();
        assert_eq!(gate.name(), "oracle");
        assert!(gate.matrix().is_err());

        let err = parse_body("qreg q[2]; opaque oracle(k) a, b; oracle q[1], q[0];").unwrap_err();
        assert!(matches!(err, ParseError::WrongParameterCount { expected: 1, got: 0, .. }));
    }

    #[test]
    fn test_conditions_apply_to_every_expanded_gate() {
        let source = "qreg q[2]; creg c[2];
            gate bell a, b { h a; cx a, b; }
            if (c == 2) bell q[0], q[1];";
        let circuit = parse_body(source).unwrap();
        assert_eq!(circuit.len(), 2);
        for inst in circuit.instructions() {
            let cond = inst.as_gate().unwrap().condition.as_ref().unwrap();
            assert_eq!(cond.register, "c");
            assert_eq!(cond.value, 2);
        }

        let err = parse_body("qreg q[1]; creg c[1]; if (c == 1) measure q[0] -> c[0];").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedStatement(_)));
        let err = parse_body("qreg q[1]; if (d == 1) x q[0];").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(_)));
    }

    #[test]
    fn test_declaration_errors() {
        assert!(matches!(
            parse_body("qreg q[1]; creg q[1];").unwrap_err(),
            ParseError::DuplicateDeclaration(_)
        ));
        assert!(matches!(
            parse_body("qreg q[2]; x q[2];").unwrap_err(),
            ParseError::IndexOutOfBounds { index: 2, size: 2, .. }
        ));
        assert!(matches!(
            parse("OPENQASM 2.0; include \"other.inc\";").unwrap_err(),
            ParseError::UnsupportedInclude(_)
        ));
        assert!(matches!(
            parse_body("qreg q[1]; frobnicate q[0];").unwrap_err(),
            ParseError::UnknownGate(_)
        ));
        assert!(matches!(
            parse_body("qreg q[2]; rx q[0];").unwrap_err(),
            ParseError::WrongParameterCount { .. }
        ));
    }
}
