//! Mutation agents.
//!
//! An agent takes independent copies of `arity` population members and may
//! return one new candidate. Every agent shipped here keeps each row's
//! ungapped residue string intact: only gap placement changes.

use crate::alignment::{AlignmentMatrix, PairSplit};
use crate::engines::pairwise::{AlignmentCosts, SmithWaterman};
use crate::error::Result;
use crate::scoring::{self, ScoringMatrix};
use crate::types::{is_gap, Symbol, GAP};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// A named mutation operator over `arity` input alignments.
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Number of population members the agent consumes per call.
    fn arity(&self) -> usize;

    /// `Ok(None)` means the agent declined to produce a candidate.
    fn apply(
        &self,
        inputs: Vec<AlignmentMatrix>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<AlignmentMatrix>>;
}

/// Closure-backed agent.
pub struct FnAgent<F> {
    name: String,
    arity: usize,
    f: F,
}

impl<F> FnAgent<F>
where
    F: Fn(Vec<AlignmentMatrix>, &mut dyn RngCore) -> Result<Option<AlignmentMatrix>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, arity: usize, f: F) -> Self {
        Self {
            name: name.into(),
            arity,
            f,
        }
    }
}

impl<F> Agent for FnAgent<F>
where
    F: Fn(Vec<AlignmentMatrix>, &mut dyn RngCore) -> Result<Option<AlignmentMatrix>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn apply(
        &self,
        inputs: Vec<AlignmentMatrix>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<AlignmentMatrix>> {
        (self.f)(inputs, rng)
    }
}

/// Realigns a random window of a random row pair with corner-anchored
/// Smith-Waterman.
pub struct SmithWatermanAgent {
    name: String,
    fraction: f64,
    aligner: SmithWaterman<'static>,
}

impl SmithWatermanAgent {
    /// Window length is `floor(fraction * width)`, at least one column.
    /// Named `smith_waterman_<percent>`.
    pub fn new(fraction: f64, costs: AlignmentCosts) -> Self {
        Self {
            name: format!("smith_waterman_{}", percent_label(fraction)),
            fraction,
            aligner: SmithWaterman::with_costs(costs),
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Agent for SmithWatermanAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(
        &self,
        inputs: Vec<AlignmentMatrix>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<AlignmentMatrix>> {
        let Some(alignment) = inputs.into_iter().next() else {
            return Ok(None);
        };
        if alignment.len() < 2 {
            return Ok(None);
        }
        let split = alignment.pick_random_pair(rng)?;
        realign_window(&alignment, split, self.fraction, &self.aligner, rng)
    }
}

/// Like [`SmithWatermanAgent`], but the first row of the pair is always the
/// star center under `matrix`.
pub struct CenterStarAgent {
    matrix: Arc<ScoringMatrix>,
    fraction: f64,
    aligner: SmithWaterman<'static>,
}

impl CenterStarAgent {
    pub fn new(matrix: Arc<ScoringMatrix>, fraction: f64, costs: AlignmentCosts) -> Self {
        Self {
            matrix,
            fraction,
            aligner: SmithWaterman::with_costs(costs),
        }
    }
}

impl Agent for CenterStarAgent {
    fn name(&self) -> &str {
        "center_star"
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(
        &self,
        inputs: Vec<AlignmentMatrix>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<AlignmentMatrix>> {
        let Some(alignment) = inputs.into_iter().next() else {
            return Ok(None);
        };
        let n = alignment.len();
        if n < 2 {
            return Ok(None);
        }
        let center = scoring::star_center(&alignment, &self.matrix)?;
        let mut other = rng.gen_range(0..n - 1);
        if other >= center {
            other += 1;
        }
        let split = alignment.split_pair(center, other)?;
        realign_window(&alignment, split, self.fraction, &self.aligner, rng)
    }
}

/// Moves one trailing gap of a random row in front of one of its residues.
pub struct GapShiftAgent;

impl Agent for GapShiftAgent {
    fn name(&self) -> &str {
        "gap_shift"
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(
        &self,
        inputs: Vec<AlignmentMatrix>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<AlignmentMatrix>> {
        let Some(mut alignment) = inputs.into_iter().next() else {
            return Ok(None);
        };
        let candidates: Vec<usize> = alignment
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.sequence.residue_count() > 0 && r.sequence.as_slice().last() == Some(&GAP)
            })
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        let index = candidates[rng.gen_range(0..candidates.len())];
        let Some(row) = alignment.row_mut(index) else {
            return Ok(None);
        };
        row.sequence.pop();
        let last_residue_end = row.len() - row.sequence.trailing_gaps();
        let position = rng.gen_range(0..last_residue_end);
        row.sequence.insert(position, GAP);
        Ok(Some(alignment))
    }
}

fn realign_window(
    alignment: &AlignmentMatrix,
    split: PairSplit,
    fraction: f64,
    aligner: &SmithWaterman<'_>,
    rng: &mut dyn RngCore,
) -> Result<Option<AlignmentMatrix>> {
    let width = alignment.width();
    if width == 0 {
        return Ok(None);
    }
    let len = ((fraction * width as f64).floor() as usize).clamp(1, width);
    let start = rng.gen_range(0..=width - len);
    let end = start + len;

    let window_a = strip_gaps(&split.first.sequence.as_slice()[start..end]);
    let window_b = strip_gaps(&split.second.sequence.as_slice()[start..end]);
    if window_a.is_empty() || window_b.is_empty() {
        return Ok(None);
    }

    let realigned = aligner.align_anchored(&window_a, &window_b);
    log::trace!(
        "realigned window [{start}, {end}) of rows {:?}: {} / {}",
        split.indices(),
        realigned.a_str(),
        realigned.b_str()
    );

    let (first_index, second_index) = split.indices();
    let first = split.first.clone();
    let second = split.second.clone();
    let mut candidate = alignment.recombine(split.reassemble(first, second))?;
    candidate.splice_window(first_index, start, end, &realigned.a)?;
    candidate.splice_window(second_index, start, end, &realigned.b)?;
    Ok(Some(candidate.compacted()))
}

/// `fraction` as a percentage rounded to three decimals, without trailing zeros.
fn percent_label(fraction: f64) -> String {
    let percent = (fraction * 100_000.0).round() / 1000.0;
    format!("{}", percent)
}

fn strip_gaps(window: &[Symbol]) -> Vec<Symbol> {
    window.iter().copied().filter(|&s| !is_gap(s)).collect()
}
