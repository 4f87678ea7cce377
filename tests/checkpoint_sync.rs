use evoalign::engines::generation::{
    CheckpointStore, EvolutionEngine, FileCheckpoint, FitnessVector, FnFitness, Population,
};
use evoalign::config::EvolutionConfig;
use evoalign::AlignmentMatrix;
use std::collections::BTreeSet;
use std::fs;

fn count(symbol: u8) -> impl Fn(&AlignmentMatrix) -> evoalign::Result<f64> + Send + Sync {
    move |a: &AlignmentMatrix| {
        Ok(a.rows()
            .iter()
            .flat_map(|r| r.sequence.as_slice())
            .filter(|&&s| s == symbol)
            .count() as f64)
    }
}

fn xy(x: f64, y: f64) -> FitnessVector {
    FitnessVector::new(vec![("x".into(), x), ("y".into(), y)])
}

fn engine() -> EvolutionEngine {
    let mut engine = EvolutionEngine::new(EvolutionConfig {
        seed: Some(3),
        ..Default::default()
    });
    engine.add_fitness_criteria(FnFitness::new("x", count(b'A'))).unwrap();
    engine.add_fitness_criteria(FnFitness::new("y", count(b'C'))).unwrap();
    engine
}

fn one_row(s: &str) -> AlignmentMatrix {
    AlignmentMatrix::from_strs(&[s]).unwrap()
}

#[test]
fn test_disjoint_merge_is_union_minus_dominated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solutions.json");
    let store = FileCheckpoint::new(&path);

    let mut saved = Population::new();
    saved.insert(xy(5.0, 1.0), one_row("AAAAAC"));
    saved.insert(xy(0.0, 0.0), one_row("DD"));
    store.store(&saved).unwrap();

    let mut engine = engine().with_checkpoint(FileCheckpoint::new(&path));
    assert_eq!(engine.add_solution(one_row("ACCCCC")).unwrap(), xy(1.0, 5.0));
    assert_eq!(engine.add_solution(one_row("AACC")).unwrap(), xy(2.0, 2.0));

    let outcome = engine.sync_checkpoint().unwrap();
    assert_eq!(outcome.loaded, 2);
    assert_eq!(outcome.merged, 2);
    assert_eq!(outcome.pruned, 1);
    assert!(outcome.stored);

    let keys: BTreeSet<_> = engine.population().keys().cloned().collect();
    let expected: BTreeSet<_> = [xy(5.0, 1.0), xy(1.0, 5.0), xy(2.0, 2.0)].into_iter().collect();
    assert_eq!(keys, expected);

    let reloaded = FileCheckpoint::new(&path).load().unwrap().unwrap();
    assert_eq!(&reloaded, engine.population());
}

#[test]
fn test_unreadable_checkpoint_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solutions.json");
    fs::write(&path, "{ truncated").unwrap();

    let mut engine = engine().with_checkpoint(FileCheckpoint::new(&path));
    engine.add_solution(one_row("AC")).unwrap();

    let outcome = engine.sync_checkpoint().unwrap();
    assert_eq!(outcome.loaded, 0);
    assert!(outcome.error.is_some());
    assert!(outcome.stored);
    assert_eq!(engine.population().len(), 1);

    // The overwrite replaced the garbage with a valid snapshot.
    assert_eq!(FileCheckpoint::new(&path).load().unwrap().unwrap().len(), 1);
}

#[test]
fn test_entries_for_other_objectives_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solutions.json");
    let mut foreign = Population::new();
    foreign.insert(
        FitnessVector::new(vec![("other".into(), 100.0)]),
        one_row("WW"),
    );
    FileCheckpoint::new(&path).store(&foreign).unwrap();

    let mut engine = engine().with_checkpoint(FileCheckpoint::new(&path));
    engine.add_solution(one_row("AC")).unwrap();
    let outcome = engine.sync_checkpoint().unwrap();
    assert_eq!(outcome.loaded, 0);
    assert_eq!(engine.population().len(), 1);
}

#[test]
fn test_no_store_means_no_sync() {
    let mut engine = engine();
    assert!(engine.sync_checkpoint().is_none());
}
