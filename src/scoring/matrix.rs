use super::blosum::{BLOSUM45, BLOSUM50, BLOSUM62, BLOSUM80, BLOSUM90, BLOSUM_ALPHABET};
use super::properties::{property_range, HYDROPATHY, VOLUME};
use crate::error::{EvoAlignError, Result};
use crate::types::{is_gap, is_residue, Symbol, STOP};
use std::fmt;

const TABLE_SIDE: usize = 128;

/// Immutable symbol-pair → score lookup.
///
/// Scores are stored in a dense ASCII table so lookups in the sum-of-pairs
/// inner loop are a single index. Gap against residue always scores
/// `gap_penalty`; gap against gap scores 0.
#[derive(Clone)]
pub struct ScoringMatrix {
    name: String,
    scores: Vec<f64>,
    gap_penalty: f64,
    fallback: f64,
}

impl ScoringMatrix {
    /// Build from a square table over `alphabet`.
    ///
    /// Residues missing from the alphabet are scored as `X` when the alphabet
    /// has one, otherwise with `fallback`.
    pub fn from_table<const N: usize>(
        name: impl Into<String>,
        alphabet: &[u8; N],
        table: &[[i8; N]; N],
        gap_penalty: f64,
        fallback: f64,
    ) -> Self {
        let position = |s: Symbol| alphabet.iter().position(|&a| a == s);
        let unknown = position(b'X');
        let index_of = |s: Symbol| position(s).or(if is_residue(s) { unknown } else { None });

        let mut scores = vec![fallback; TABLE_SIDE * TABLE_SIDE];
        for a in 0..TABLE_SIDE as u8 {
            let Some(i) = index_of(a) else { continue };
            for b in 0..TABLE_SIDE as u8 {
                if let Some(j) = index_of(b) {
                    scores[a as usize * TABLE_SIDE + b as usize] = f64::from(table[i][j]);
                }
            }
        }

        Self {
            name: name.into(),
            scores,
            gap_penalty,
            fallback,
        }
    }

    /// Build from a per-residue property scale. Pairs score
    /// `-|p(a) - p(b)|`, so similar residues score higher; gaps and residues
    /// off the scale score minus the full spread of the scale.
    pub fn from_property(name: impl Into<String>, scale: &[(u8, f64)]) -> Self {
        let penalty = -property_range(scale);
        let mut scores = vec![penalty; TABLE_SIDE * TABLE_SIDE];
        for &(a, pa) in scale {
            for &(b, pb) in scale {
                scores[a as usize * TABLE_SIDE + b as usize] = -(pa - pb).abs();
            }
        }
        Self {
            name: name.into(),
            scores,
            gap_penalty: penalty,
            fallback: penalty,
        }
    }

    /// Identity scheme: `match_score` for equal residues, `mismatch` otherwise.
    pub fn identity(name: impl Into<String>, match_score: f64, mismatch: f64, gap_penalty: f64) -> Self {
        let mut scores = vec![mismatch; TABLE_SIDE * TABLE_SIDE];
        for s in 0..TABLE_SIDE {
            scores[s * TABLE_SIDE + s] = match_score;
        }
        Self {
            name: name.into(),
            scores,
            gap_penalty,
            fallback: mismatch,
        }
    }

    /// NCBI BLOSUM table; the `*` penalty doubles as gap penalty and fallback.
    fn blosum(name: &str, table: &[[i8; 24]; 24]) -> Self {
        let gap = f64::from(table[0][BLOSUM_ALPHABET.len() - 1]);
        Self::from_table(name, BLOSUM_ALPHABET, table, gap, gap)
    }

    pub fn blosum45() -> Self {
        Self::blosum("blosum45", &BLOSUM45)
    }

    pub fn blosum50() -> Self {
        Self::blosum("blosum50", &BLOSUM50)
    }

    pub fn blosum62() -> Self {
        Self::blosum("blosum62", &BLOSUM62)
    }

    pub fn blosum80() -> Self {
        Self::blosum("blosum80", &BLOSUM80)
    }

    pub fn blosum90() -> Self {
        Self::blosum("blosum90", &BLOSUM90)
    }

    pub fn hydropathy() -> Self {
        Self::from_property("hydropathy", &HYDROPATHY)
    }

    pub fn volume() -> Self {
        Self::from_property("volume", &VOLUME)
    }

    /// Look up one of the built-in matrices by name or BLOSUM number.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "45" | "blosum45" => Ok(Self::blosum45()),
            "50" | "blosum50" => Ok(Self::blosum50()),
            "62" | "blosum62" => Ok(Self::blosum62()),
            "80" | "blosum80" => Ok(Self::blosum80()),
            "90" | "blosum90" => Ok(Self::blosum90()),
            "hydro" | "hydropathy" => Ok(Self::hydropathy()),
            "vol" | "volume" => Ok(Self::volume()),
            _ => Err(EvoAlignError::UnknownMatrix(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gap_penalty(&self) -> f64 {
        self.gap_penalty
    }

    #[inline]
    pub fn score(&self, a: Symbol, b: Symbol) -> f64 {
        match (is_gap(a), is_gap(b)) {
            (true, true) => 0.0,
            (true, false) | (false, true) => self.gap_penalty,
            _ if (a as usize) < TABLE_SIDE && (b as usize) < TABLE_SIDE => {
                self.scores[a as usize * TABLE_SIDE + b as usize]
            }
            _ => self.fallback,
        }
    }

    /// The stop marker counts as a residue for lookup purposes.
    pub fn stop_score(&self) -> f64 {
        self.score(STOP, STOP)
    }
}

impl fmt::Debug for ScoringMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringMatrix")
            .field("name", &self.name)
            .field("gap_penalty", &self.gap_penalty)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
