//! Final resynthesis into `cx` and `u`.

use tracing::debug;
use unopt_compile::{BasisGates, CompileResult, LoopIterations, PassManagerBuilder};
use unopt_ir::Circuit;

/// An optimizing compiler that re-expresses circuits in `cx` and `u`.
///
/// Implementations must keep the unitary up to global phase.
pub trait Resynthesizer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Re-express `circuit` at aggressiveness `optimization_level` (0 to 3).
    fn resynthesize(&self, circuit: &Circuit, optimization_level: u8) -> CompileResult<Circuit>;
}

/// The built-in resynthesizer: the preset pass pipelines.
#[derive(Debug, Clone, Default)]
pub struct PassManagerResynthesizer {
    basis: BasisGates,
}

impl PassManagerResynthesizer {
    /// Resynthesize into `cx` and `u`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the level's pipeline, also returning how many rounds the
    /// optimization loop took (level 3 only).
    pub fn run_pipeline(
        &self,
        circuit: &Circuit,
        optimization_level: u8,
    ) -> CompileResult<(Circuit, Option<usize>)> {
        let (pm, mut props) = PassManagerBuilder::new()
            .with_optimization_level(optimization_level)
            .with_basis(self.basis.clone())
            .build();
        let mut out = circuit.clone();
        pm.run(&mut out, &mut props)?;
        let loop_rounds = props.get::<LoopIterations>().map(|r| r.0);
        Ok((out, loop_rounds))
    }
}

impl Resynthesizer for PassManagerResynthesizer {
    fn name(&self) -> &str {
        "pass-manager"
    }

    fn resynthesize(&self, circuit: &Circuit, optimization_level: u8) -> CompileResult<Circuit> {
        let (out, loop_rounds) = self.run_pipeline(circuit, optimization_level)?;
        if let Some(rounds) = loop_rounds {
            debug!("Resynthesis loop settled after {} rounds", rounds);
        }
        Ok(out)
    }
}

/// Run `resynthesizer` unless `skip` is set.
pub fn resynthesize(
    resynthesizer: &dyn Resynthesizer,
    circuit: &Circuit,
    optimization_level: u8,
    skip: bool,
) -> CompileResult<Circuit> {
    if skip {
        return Ok(circuit.clone());
    }
    resynthesizer.resynthesize(circuit, optimization_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unopt_ir::{Operator, QubitId};

    fn sample() -> Circuit {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        circuit.rzz(0.4, QubitId(2), QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_skip_returns_input() {
        let circuit = sample();
        let out = resynthesize(&PassManagerResynthesizer::new(), &circuit, 3, true).unwrap();
        assert_eq!(out, circuit);
    }

    #[test]
    fn test_resynthesis_levels() {
        let circuit = sample();
        let before = Operator::from_circuit(&circuit).unwrap();
        let resynth = PassManagerResynthesizer::new();

        let level0 = resynthesize(&resynth, &circuit, 0, false).unwrap();
        let level3 = resynthesize(&resynth, &circuit, 3, false).unwrap();

        for out in [&level0, &level3] {
            assert!(out.instructions().iter().all(|i| i.name() == "cx" || i.name() == "u"));
            assert!(Operator::from_circuit(out).unwrap().equiv(&before, 1e-9));
        }
        assert!(level3.len() < level0.len());
        assert_eq!(resynth.name(), "pass-manager");
    }

    #[test]
    fn test_loop_rounds_reported_at_level_three() {
        let circuit = sample();
        let resynth = PassManagerResynthesizer::new();

        let (_, rounds) = resynth.run_pipeline(&circuit, 0).unwrap();
        assert_eq!(rounds, None);

        let (out, rounds) = resynth.run_pipeline(&circuit, 3).unwrap();
        let rounds = rounds.unwrap();
        assert!((1..=unopt_compile::MAX_LOOP_ITERATIONS).contains(&rounds));
        assert_eq!(out, resynth.resynthesize(&circuit, 3).unwrap());
    }
}
