//! Property tests: every configuration keeps the unitary and is reproducible.

use proptest::prelude::*;
use unopt_ir::{Circuit, QubitId, StandardGate};
use unopt_recipe::{
    DecompositionMethod, Recipe, RecipeConfig, Strategy as InsertionStrategy, verify_equivalence,
};

fn arb_gate() -> impl Strategy<Value = (StandardGate, usize)> {
    prop_oneof![
        Just((StandardGate::H, 1)),
        Just((StandardGate::T, 1)),
        (-3.0_f64..3.0).prop_map(|t| (StandardGate::Ry(t), 1)),
        Just((StandardGate::CX, 2)),
        Just((StandardGate::CZ, 2)),
        (-3.0_f64..3.0).prop_map(|t| (StandardGate::CP(t), 2)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec((arb_gate(), Just(vec![0u32, 1, 2, 3]).prop_shuffle()), 1..8).prop_map(
        |ops| {
            let mut circuit = Circuit::with_size("prop", 4, 0);
            for ((gate, arity), qubits) in ops {
                circuit
                    .gate(gate, qubits.into_iter().take(arity).map(QubitId))
                    .unwrap();
            }
            circuit
        },
    )
}

fn arb_config() -> impl Strategy<Value = RecipeConfig> {
    (
        1usize..3,
        prop_oneof![
            Just(InsertionStrategy::Concatenated),
            Just(InsertionStrategy::Random),
        ],
        prop_oneof![
            Just(DecompositionMethod::Default),
            Just(DecompositionMethod::Kak),
            Just(DecompositionMethod::Basis),
        ],
        0u8..=3,
        any::<u64>(),
        any::<bool>(),
    )
        .prop_map(|(iterations, strategy, method, level, seed, skip)| {
            RecipeConfig::new()
                .with_iterations(iterations)
                .with_strategy(strategy)
                .with_decomposition_method(method)
                .with_optimization_level(level)
                .with_seed(seed)
                .with_skip_synthesize(skip)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_recipe_preserves_unitary(circuit in arb_circuit(), config in arb_config()) {
        let recipe = Recipe::new(config).unwrap();
        let (out, report) = recipe.run_with_report(&circuit).unwrap();

        prop_assert!(verify_equivalence(&circuit, &out, 1e-9).unwrap());
        prop_assert_eq!(report.rounds.len(), recipe.config().iterations);
        if report.applied() == 0 {
            prop_assert_eq!(&out, &circuit);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible(circuit in arb_circuit(), config in arb_config()) {
        let recipe = Recipe::new(config).unwrap();
        prop_assert_eq!(recipe.run(&circuit).unwrap(), recipe.run(&circuit).unwrap());
    }
}
