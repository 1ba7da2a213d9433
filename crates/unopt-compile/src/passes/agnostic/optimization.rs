//! Optimization passes.

use tracing::debug;
use unopt_ir::{Circuit, Instruction, StandardGate, Unitary2x2};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::u_gate;

/// Upper bound on [`OptimizationLoop`] rounds.
pub const MAX_LOOP_ITERATIONS: usize = 32;

/// The matrix of an unconditioned single-qubit standard gate.
fn mergeable(inst: &Instruction) -> Option<Unitary2x2> {
    let gate = inst.as_gate()?;
    if gate.condition.is_some() {
        return None;
    }
    gate.as_standard()?.matrix_2x2()
}

fn is_plain_cx(inst: &Instruction) -> bool {
    inst.as_gate()
        .is_some_and(|g| g.condition.is_none() && matches!(g.as_standard(), Some(StandardGate::CX)))
}

fn rebuild(circuit: &mut Circuit, slots: Vec<Option<Instruction>>) -> CompileResult<()> {
    *circuit = circuit.with_instructions(slots.into_iter().flatten())?;
    Ok(())
}

/// Single-qubit gate optimization pass.
///
/// Merges every run of two or more consecutive single-qubit gates on a qubit
/// into one `u`, or drops the run when its product is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimize1qGates;

impl Optimize1qGates {
    /// Create a new 1q gate optimizer.
    pub fn new() -> Self {
        Self
    }

    /// Runs of mergeable gates per qubit, as instruction indices in order.
    fn find_1q_runs(circuit: &Circuit) -> Vec<Vec<usize>> {
        let mut open: Vec<Vec<usize>> = vec![vec![]; circuit.num_qubits()];
        let mut runs = Vec::new();

        for (i, inst) in circuit.instructions().iter().enumerate() {
            if mergeable(inst).is_some() {
                open[inst.qubits[0].index()].push(i);
                continue;
            }
            for q in &inst.qubits {
                let run = std::mem::take(&mut open[q.index()]);
                if !run.is_empty() {
                    runs.push(run);
                }
            }
        }
        runs.extend(open.into_iter().filter(|run| !run.is_empty()));
        runs
    }
}

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let runs = Self::find_1q_runs(circuit);
        let mut slots: Vec<Option<Instruction>> =
            circuit.instructions().iter().cloned().map(Some).collect();
        let mut merged = 0usize;

        for run in runs.into_iter().filter(|run| run.len() >= 2) {
            let mut combined = Unitary2x2::identity();
            for &i in &run {
                if let Some(u) = slots[i].as_ref().and_then(mergeable) {
                    combined = u * combined;
                }
            }

            let qubit = circuit.instructions()[run[0]].qubits[0];
            for &i in &run {
                slots[i] = None;
            }
            if !combined.is_identity() {
                // Gates between the run's members act on other qubits.
                slots[run[0]] = Some(Instruction::single_qubit_gate(u_gate(&combined), qubit));
            }
            merged += run.len();
        }

        debug!("Optimize1qGates merged {} gates", merged);
        rebuild(circuit, slots)
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.len() > 1
    }
}

/// CX cancellation pass.
///
/// Cancels pairs of identical `cx` gates with nothing in between on either
/// qubit. Cancelling a pair can expose another, which the same sweep handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelCX;

impl CancelCX {
    /// Create a new CX cancellation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Pass for CancelCX {
    fn name(&self) -> &'static str {
        "CancelCX"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut slots: Vec<Option<Instruction>> =
            circuit.instructions().iter().cloned().map(Some).collect();
        // Surviving instructions per qubit, most recent last.
        let mut frontier: Vec<Vec<usize>> = vec![vec![]; circuit.num_qubits()];
        let mut cancelled = 0usize;

        for (i, inst) in circuit.instructions().iter().enumerate() {
            if is_plain_cx(inst) {
                let (c, t) = (inst.qubits[0].index(), inst.qubits[1].index());
                let previous = match (frontier[c].last(), frontier[t].last()) {
                    (Some(&a), Some(&b)) if a == b => Some(a),
                    _ => None,
                };
                let pair = previous.filter(|&j| {
                    slots[j]
                        .as_ref()
                        .is_some_and(|prev| is_plain_cx(prev) && prev.qubits == inst.qubits)
                });
                if let Some(j) = pair {
                    slots[j] = None;
                    slots[i] = None;
                    frontier[c].pop();
                    frontier[t].pop();
                    cancelled += 2;
                    continue;
                }
            }
            for q in &inst.qubits {
                frontier[q.index()].push(i);
            }
        }

        debug!("CancelCX removed {} gates", cancelled);
        rebuild(circuit, slots)
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.num_nonlocal_gates() > 1
    }
}

/// Drops single-qubit gates that act as the identity up to global phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveIdentity;

impl Pass for RemoveIdentity {
    fn name(&self) -> &'static str {
        "RemoveIdentity"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let before = circuit.len();
        let kept: Vec<Instruction> = circuit
            .instructions()
            .iter()
            .filter(|inst| !mergeable(inst).is_some_and(|u| u.is_identity()))
            .cloned()
            .collect();
        debug!("RemoveIdentity dropped {} gates", before - kept.len());
        *circuit = circuit.with_instructions(kept)?;
        Ok(())
    }
}

/// Rounds an [`OptimizationLoop`] took to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopIterations(pub usize);

/// Repeats a group of passes until the circuit stops shrinking.
///
/// A round that leaves both size and depth unchanged ends the loop, as does
/// reaching [`MAX_LOOP_ITERATIONS`]. The round count is stored in the
/// `PropertySet` as [`LoopIterations`].
pub struct OptimizationLoop {
    passes: Vec<Box<dyn Pass>>,
}

impl OptimizationLoop {
    /// Create an empty loop.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the loop body.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }
}

impl Default for OptimizationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for OptimizationLoop {
    fn name(&self) -> &'static str {
        "OptimizationLoop"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut rounds = 0;
        while rounds < MAX_LOOP_ITERATIONS {
            let before = (circuit.len(), circuit.depth());
            for pass in &self.passes {
                if pass.should_run(circuit, properties) {
                    pass.run(circuit, properties)?;
                }
            }
            rounds += 1;
            if (circuit.len(), circuit.depth()) >= before {
                break;
            }
        }
        debug!("OptimizationLoop settled after {} rounds", rounds);
        properties.insert(LoopIterations(rounds));
        Ok(())
    }
}
