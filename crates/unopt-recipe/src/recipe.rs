//! The recipe driver: insert, conjugate, decompose, resynthesize.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};
use unopt_compile::CompileError;
use unopt_ir::{Circuit, QubitId};

use crate::config::{DecompositionMethod, RecipeConfig, Strategy};
use crate::conjugation::conjugate;
use crate::decomposition::decompose;
use crate::error::{RecipeError, RecipeResult};
use crate::insertion::{Insertion, SkipReason, select};
use crate::synthesis::{PassManagerResynthesizer, Resynthesizer, resynthesize};

/// Stages of one round, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Anchor selection and `A†`/`A` insertion.
    Insertion,
    /// Swapping the anchor past `A†`.
    Conjugation,
    /// Expanding matrix-defined gates.
    Decomposition,
    /// Final re-expression in `cx` and `u`.
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insertion => "insertion",
            Self::Conjugation => "conjugation",
            Self::Decomposition => "decomposition",
            Self::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The round rewrote the circuit.
    Applied {
        /// Index of the anchor gate.
        anchor_index: usize,
        /// Qubit shared by the anchor and `A`.
        shared_qubit: QubitId,
        /// Other operand of `A`.
        third_qubit: QubitId,
        /// Instruction count entering the round.
        instructions_before: usize,
        /// Instruction count leaving the round.
        instructions_after: usize,
        /// Whether resynthesis ran.
        synthesized: bool,
    },
    /// Nothing was inserted; the circuit is unchanged.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
}

/// One round's seed and outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Zero-based round index.
    pub round: usize,
    /// Seed of the round's generator, if seeded.
    pub seed: Option<u64>,
    /// What happened.
    pub outcome: RoundOutcome,
}

/// Per-round account of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeReport {
    /// Rounds in order.
    pub rounds: Vec<RoundReport>,
}

impl RecipeReport {
    /// Rounds that rewrote the circuit.
    pub fn applied(&self) -> usize {
        self.rounds
            .iter()
            .filter(|r| matches!(r.outcome, RoundOutcome::Applied { .. }))
            .count()
    }

    /// Rounds that were skipped.
    pub fn skipped(&self) -> usize {
        self.rounds.len() - self.applied()
    }
}

/// A validated recipe ready to run on any number of circuits.
pub struct Recipe {
    config: RecipeConfig,
    resynthesizer: Box<dyn Resynthesizer>,
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("config", &self.config)
            .field("resynthesizer", &self.resynthesizer.name())
            .finish()
    }
}

impl Recipe {
    /// Validate `config` and build a recipe with the built-in resynthesizer.
    pub fn new(config: RecipeConfig) -> RecipeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resynthesizer: Box::new(PassManagerResynthesizer::new()),
        })
    }

    /// Use a different resynthesis back end.
    #[must_use]
    pub fn with_resynthesizer(mut self, resynthesizer: impl Resynthesizer + 'static) -> Self {
        self.resynthesizer = Box::new(resynthesizer);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &RecipeConfig {
        &self.config
    }

    /// Run every round and return the rewritten circuit.
    pub fn run(&self, circuit: &Circuit) -> RecipeResult<Circuit> {
        self.run_with_report(circuit).map(|(out, _)| out)
    }

    /// Run every round and return the rewritten circuit with a report.
    ///
    /// Round `i` draws from a generator seeded with `seed + i`, or from fresh
    /// entropy when no seed is set. `circuit` itself is never modified.
    #[instrument(skip_all, fields(circuit = %circuit.name(), strategy = %self.config.strategy))]
    pub fn run_with_report(&self, circuit: &Circuit) -> RecipeResult<(Circuit, RecipeReport)> {
        info!(
            "Unoptimizing {} instructions on {} qubits ({} iterations, {} decomposition)",
            circuit.len(),
            circuit.num_qubits(),
            self.config.iterations,
            self.config.decomposition_method
        );

        let mut current = circuit.clone();
        let mut report = RecipeReport::default();

        for round in 0..self.config.iterations {
            let seed = self.config.seed.map(|s| s.wrapping_add(round as u64));
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };

            let (next, outcome) = self.round(round, &current, &mut rng)?;
            if let Some(next) = next {
                current = next;
            }
            report.rounds.push(RoundReport {
                round,
                seed,
                outcome,
            });
        }

        info!(
            "Unoptimization finished: {} applied, {} skipped, {} -> {} instructions",
            report.applied(),
            report.skipped(),
            circuit.len(),
            current.len()
        );
        Ok((current, report))
    }

    fn round(
        &self,
        round: usize,
        circuit: &Circuit,
        rng: &mut StdRng,
    ) -> RecipeResult<(Option<Circuit>, RoundOutcome)> {
        let insertion = select(circuit, self.config.strategy, rng)
            .map_err(|e| self.collaborator(round, circuit, Stage::Insertion, e.into()))?;
        let (inserted, plan) = match insertion {
            Insertion::Planned { circuit, plan } => (circuit, plan),
            Insertion::Skipped(reason) => {
                warn!("Round {}: {}; skipping gate insertion", round, reason);
                return Ok((None, RoundOutcome::Skipped { reason }));
            }
        };
        debug!(
            "Round {}: {} anchored at #{}, A on ({}, {})",
            round,
            Stage::Insertion,
            plan.anchor_index,
            plan.shared_qubit,
            plan.third_qubit
        );

        let conjugated = conjugate(&inserted, &plan)
            .map_err(|e| self.collaborator(round, circuit, Stage::Conjugation, e.into()))?;
        debug!("Round {}: {} done", round, Stage::Conjugation);

        let decomposed = decompose(&conjugated, self.config.decomposition_method)
            .map_err(|e| self.collaborator(round, circuit, Stage::Decomposition, e))?;
        debug!(
            "Round {}: {} done, {} instructions",
            round,
            Stage::Decomposition,
            decomposed.len()
        );

        let out = resynthesize(
            self.resynthesizer.as_ref(),
            &decomposed,
            self.config.optimization_level,
            self.config.skip_synthesize,
        )
        .map_err(|e| self.collaborator(round, circuit, Stage::Synthesis, e))?;
        if self.config.skip_synthesize {
            debug!("Round {}: {} skipped", round, Stage::Synthesis);
        } else {
            debug!(
                "Round {}: {} via {} done, {} instructions",
                round,
                Stage::Synthesis,
                self.resynthesizer.name(),
                out.len()
            );
        }

        let outcome = RoundOutcome::Applied {
            anchor_index: plan.anchor_index,
            shared_qubit: plan.shared_qubit,
            third_qubit: plan.third_qubit,
            instructions_before: circuit.len(),
            instructions_after: out.len(),
            synthesized: !self.config.skip_synthesize,
        };
        Ok((Some(out), outcome))
    }

    fn collaborator(
        &self,
        round: usize,
        circuit: &Circuit,
        stage: Stage,
        source: CompileError,
    ) -> RecipeError {
        RecipeError::Collaborator {
            round,
            strategy: self.config.strategy,
            num_qubits: circuit.num_qubits(),
            stage,
            source,
        }
    }
}

/// Apply the recipe with settings given by name.
///
/// Names and level are checked before anything runs; an unknown name or a
/// level above 3 is a configuration error and `circuit` is left alone.
pub fn unoptimize(
    circuit: &Circuit,
    iterations: usize,
    strategy: &str,
    decomposition_method: &str,
    optimization_level: u8,
    seed: Option<u64>,
    skip_synthesize: bool,
) -> RecipeResult<Circuit> {
    let mut config = RecipeConfig::new()
        .with_iterations(iterations)
        .with_strategy(strategy.parse::<Strategy>()?)
        .with_decomposition_method(decomposition_method.parse::<DecompositionMethod>()?)
        .with_optimization_level(optimization_level)
        .with_skip_synthesize(skip_synthesize);
    config.seed = seed;
    Recipe::new(config)?.run(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unopt_ir::Operator;

    fn two_cx() -> Circuit {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        circuit
    }

    #[test]
    fn test_report_counts_rounds() {
        let recipe = Recipe::new(
            RecipeConfig::new()
                .with_iterations(2)
                .with_seed(11)
                .with_skip_synthesize(true),
        )
        .unwrap();
        let (out, report) = recipe.run_with_report(&two_cx()).unwrap();

        assert_eq!(report.rounds.len(), 2);
        assert_eq!(report.applied(), 2);
        assert_eq!(report.rounds[1].seed, Some(12));
        match &report.rounds[1].outcome {
            RoundOutcome::Applied {
                instructions_after,
                synthesized,
                ..
            } => {
                assert_eq!(*instructions_after, out.len());
                assert!(!synthesized);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_zero_iterations() {
        let circuit = two_cx();
        let (out, report) = Recipe::new(RecipeConfig::new().with_iterations(0))
            .unwrap()
            .run_with_report(&circuit)
            .unwrap();
        assert_eq!(out, circuit);
        assert!(report.rounds.is_empty());
    }

    #[test]
    fn test_skipped_round_is_reported() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (out, report) = Recipe::new(RecipeConfig::new().with_iterations(3))
            .unwrap()
            .run_with_report(&circuit)
            .unwrap();
        assert_eq!(out, circuit);
        assert_eq!(report.skipped(), 3);
        assert!(report.rounds.iter().all(|r| r.seed.is_none()));
        assert_eq!(
            report.rounds[0].outcome,
            RoundOutcome::Skipped {
                reason: SkipReason::NoEligiblePair
            }
        );
    }

    #[test]
    fn test_invalid_level_is_rejected_up_front() {
        let err = Recipe::new(RecipeConfig::new().with_optimization_level(7)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unoptimize_by_name() {
        let circuit = two_cx();
        let out = unoptimize(&circuit, 1, "random", "kak", 2, Some(3), false).unwrap();
        let before = Operator::from_circuit(&circuit).unwrap();
        assert!(Operator::from_circuit(&out).unwrap().equiv(&before, 1e-9));
    }

    #[test]
    fn test_opaque_anchor_fails_with_round_context() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .gate(unopt_ir::CustomGate::new("oracle", 2), [QubitId(0), QubitId(1)])
            .unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let err = unoptimize(&circuit, 2, "concatenated", "default", 3, Some(0), true).unwrap_err();
        assert!(matches!(
            err,
            RecipeError::Collaborator {
                round: 0,
                strategy: Strategy::Concatenated,
                num_qubits: 3,
                stage: Stage::Conjugation,
                source: CompileError::Ir(unopt_ir::IrError::NoMatrix(ref name)),
            } if name == "oracle"
        ));
        assert!(
            err.to_string()
                .starts_with("Round 0 (concatenated, 3 qubits) failed during conjugation: ")
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_opaque_gate_under_basis_is_configuration_error() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .gate(unopt_ir::CustomGate::new("oracle", 1), [QubitId(2)])
            .unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let err = unoptimize(&circuit, 1, "concatenated", "basis", 3, Some(0), true).unwrap_err();
        assert!(matches!(
            err,
            RecipeError::Collaborator {
                stage: Stage::Decomposition,
                round: 0,
                ..
            }
        ));
        assert!(err.is_configuration());
    }
}
