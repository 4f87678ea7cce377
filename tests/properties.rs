use evoalign::engines::generation::{
    dominates, Agent, FitnessVector, GapShiftAgent, Population, SmithWatermanAgent,
};
use evoalign::engines::pairwise::AlignmentCosts;
use evoalign::AlignmentMatrix;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn residue_rows() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ACDEFGHIKLMNPQRSTVWY]{1,16}", 1..6)
}

fn build(rows: &[String]) -> AlignmentMatrix {
    let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
    AlignmentMatrix::from_strs(&refs).unwrap()
}

fn residues(alignment: &AlignmentMatrix) -> Vec<String> {
    (0..alignment.len())
        .map(|i| alignment.ungapped(i).unwrap().to_string())
        .collect()
}

fn vector(scores: &[f64]) -> FitnessVector {
    FitnessVector::new(
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (format!("obj{i}"), s))
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn padding_keeps_symbols_and_equalizes_rows(rows in residue_rows(), extra in 0usize..5) {
        let mut alignment = build(&rows);
        let before = alignment.clone();
        let width = alignment.width() + extra;
        alignment.pad_to_width(width).unwrap();

        for (row, original) in alignment.rows().iter().zip(before.rows()) {
            prop_assert_eq!(row.len(), width);
            prop_assert_eq!(
                &row.sequence.as_slice()[..original.len()],
                original.sequence.as_slice()
            );
        }
    }

    #[test]
    fn padding_below_width_fails_without_change(rows in residue_rows()) {
        let mut alignment = build(&rows);
        let before = alignment.clone();
        prop_assert!(alignment.pad_to_width(before.width() - 1).is_err());
        prop_assert_eq!(alignment, before);
    }

    #[test]
    fn dominance_is_irreflexive_and_antisymmetric(
        p in prop::collection::vec(-50.0f64..50.0, 3),
        q in prop::collection::vec(-50.0f64..50.0, 3),
    ) {
        let (p, q) = (vector(&p), vector(&q));
        prop_assert!(!dominates(&p, &p));
        prop_assert!(!(dominates(&p, &q) && dominates(&q, &p)));
    }

    #[test]
    fn pruning_is_closed_and_idempotent(
        points in prop::collection::vec((0i32..10, 0i32..10), 1..30),
    ) {
        let mut population = Population::new();
        let placeholder = AlignmentMatrix::from_strs(&["A"]).unwrap();
        for (x, y) in points {
            population.insert(vector(&[x as f64, y as f64]), placeholder.clone());
        }

        population.remove_dominated();
        prop_assert!(!population.is_empty());
        let keys: Vec<&FitnessVector> = population.keys().collect();
        for p in &keys {
            for q in &keys {
                prop_assert!(!dominates(p, q));
            }
        }

        let snapshot = population.clone();
        prop_assert_eq!(population.remove_dominated(), 0);
        prop_assert_eq!(population, snapshot);
    }

    #[test]
    fn agents_preserve_residues(
        rows in prop::collection::vec("[ACDEFGHIKLMNPQRSTVWY]{1,16}", 2..6),
        fraction in prop::sample::select(vec![0.125, 0.25, 0.5, 1.0]),
        seed in any::<u64>(),
    ) {
        let input = build(&rows);
        let expected = residues(&input);
        let mut rng = StdRng::seed_from_u64(seed);
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(SmithWatermanAgent::new(fraction, AlignmentCosts::default())),
            Box::new(GapShiftAgent),
        ];

        for agent in &agents {
            if let Some(out) = agent.apply(vec![input.clone()], &mut rng).unwrap() {
                prop_assert!(out.validate().is_ok());
                prop_assert_eq!(residues(&out), expected.clone());
            }
        }
    }
}
