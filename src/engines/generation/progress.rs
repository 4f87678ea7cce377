use super::checkpoint::CheckpointOutcome;
use super::fitness::FitnessVector;
use super::population::PopulationEntry;
use serde::Serialize;
use std::sync::mpsc::Sender;

/// Periodic population summary pushed to the reporting collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// 1-based iteration the report was taken after.
    pub iteration: usize,
    pub population_size: usize,
    /// Current members, only when the callback asked for a snapshot.
    pub front: Option<Vec<PopulationEntry>>,
}

/// Totals for a finished [`evolve`](super::EvolutionEngine::evolve) call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolutionSummary {
    pub iterations: usize,
    /// Iterations whose agent produced a candidate that was inserted.
    pub inserted: usize,
    /// Iterations where the agent declined to produce a candidate.
    pub declined: usize,
    /// Iterations abandoned on a recoverable error.
    pub skipped: usize,
    pub checkpoints: usize,
    pub final_population: usize,
    pub best: Option<FitnessVector>,
}

pub trait ProgressCallback: Send {
    fn on_report(&mut self, report: &StatusReport);

    fn on_checkpoint(&mut self, _iteration: usize, _outcome: &CheckpointOutcome) {}

    fn on_complete(&mut self, _summary: &EvolutionSummary) {}

    /// Whether reports should carry a copy of the population.
    fn wants_snapshot(&self) -> bool {
        false
    }
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_report(&mut self, report: &StatusReport) {
        log::info!(
            "Iteration {}: population size {}",
            report.iteration,
            report.population_size
        );
    }

    fn on_checkpoint(&mut self, iteration: usize, outcome: &CheckpointOutcome) {
        match &outcome.error {
            Some(e) => log::warn!("Iteration {}: checkpoint sync failed: {}", iteration, e),
            None => log::info!(
                "Iteration {}: checkpoint loaded {}, merged {}, pruned {}",
                iteration,
                outcome.loaded,
                outcome.merged,
                outcome.pruned
            ),
        }
    }

    fn on_complete(&mut self, summary: &EvolutionSummary) {
        log::info!(
            "Evolution complete after {} iterations. {} inserted, {} declined, {} skipped, final population {}",
            summary.iterations,
            summary.inserted,
            summary.declined,
            summary.skipped,
            summary.final_population
        );
        if let Some(best) = &summary.best {
            log::info!("Best fitness: {}", best);
        }
    }
}

/// Reports nothing.
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_report(&mut self, _report: &StatusReport) {}
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    Report(StatusReport),
    Checkpoint {
        iteration: usize,
        outcome: CheckpointOutcome,
    },
    Complete(EvolutionSummary),
}

/// Pushes every event down an mpsc channel, e.g. to a UI or writer thread.
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
    snapshots: bool,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self {
            sender,
            snapshots: false,
        }
    }

    /// Ask the engine to attach the population to every report.
    pub fn with_snapshots(mut self) -> Self {
        self.snapshots = true;
        self
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_report(&mut self, report: &StatusReport) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.sender.send(ProgressMessage::Report(report.clone()));
    }

    fn on_checkpoint(&mut self, iteration: usize, outcome: &CheckpointOutcome) {
        let _ = self.sender.send(ProgressMessage::Checkpoint {
            iteration,
            outcome: outcome.clone(),
        });
    }

    fn on_complete(&mut self, summary: &EvolutionSummary) {
        let _ = self.sender.send(ProgressMessage::Complete(summary.clone()));
    }

    fn wants_snapshot(&self) -> bool {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_callback_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let mut callback = ChannelProgressCallback::new(tx).with_snapshots();
        assert!(callback.wants_snapshot());

        callback.on_report(&StatusReport {
            iteration: 10,
            population_size: 3,
            front: None,
        });
        callback.on_complete(&EvolutionSummary {
            iterations: 10,
            ..Default::default()
        });

        match rx.recv().unwrap() {
            ProgressMessage::Report(r) => assert_eq!(r.population_size, 3),
            other => panic!("unexpected message {:?}", other),
        }
        assert!(matches!(rx.recv().unwrap(), ProgressMessage::Complete(s) if s.iterations == 10));
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut callback = ChannelProgressCallback::new(tx);
        callback.on_report(&StatusReport {
            iteration: 1,
            population_size: 0,
            front: None,
        });
    }
}
