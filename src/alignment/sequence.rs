use crate::error::{EvoAlignError, Result};
use crate::types::{is_gap, is_residue, Symbol, GAP};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An amino-acid sequence, possibly containing gap symbols.
///
/// Symbols are stored as upper-case ASCII bytes. Parsing upper-cases its
/// input and rejects anything that is neither a residue nor the gap symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sequence(Vec<Symbol>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap symbols that are already known to be valid (e.g. produced by an aligner).
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    /// Parse a raw residue string. Gaps are allowed so pre-aligned input
    /// round-trips.
    pub fn parse(text: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(text.len());
        for ch in text.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let upper = ch.to_ascii_uppercase();
            if !upper.is_ascii() {
                return Err(EvoAlignError::InvalidSequence(format!(
                    "non-ASCII symbol '{ch}'"
                )));
            }
            let symbol = upper as u8;
            if !is_residue(symbol) && !is_gap(symbol) {
                return Err(EvoAlignError::InvalidSequence(format!(
                    "unexpected symbol '{ch}'"
                )));
            }
            symbols.push(symbol);
        }
        Ok(Self(symbols))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.0.get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Symbol] {
        &self.0
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.0
    }

    /// The sequence with every gap removed.
    pub fn ungapped(&self) -> Sequence {
        Self(self.0.iter().copied().filter(|&s| !is_gap(s)).collect())
    }

    /// Number of residues (non-gap symbols).
    pub fn residue_count(&self) -> usize {
        self.0.iter().filter(|&&s| !is_gap(s)).count()
    }

    /// Length of the run of gaps at the end of the sequence.
    pub fn trailing_gaps(&self) -> usize {
        self.0.iter().rev().take_while(|&&s| is_gap(s)).count()
    }

    /// Right-pad with gaps up to `width`. Fails if already longer.
    pub fn pad_to(&mut self, width: usize) -> Result<()> {
        if self.0.len() > width {
            return Err(EvoAlignError::Shape(format!(
                "sequence of length {} exceeds width {}",
                self.0.len(),
                width
            )));
        }
        self.0.resize(width, GAP);
        Ok(())
    }

    /// Right-pad with gaps up to `width`; a no-op if already that long.
    pub(crate) fn extend_gaps_to(&mut self, width: usize) {
        if self.0.len() < width {
            self.0.resize(width, GAP);
        }
    }

    /// Replace `[start, end)` with `replacement`. The caller checks bounds.
    pub(crate) fn splice(&mut self, start: usize, end: usize, replacement: &[Symbol]) {
        self.0.splice(start..end, replacement.iter().copied());
    }

    pub(crate) fn insert(&mut self, index: usize, symbol: Symbol) {
        self.0.insert(index, symbol);
    }

    pub(crate) fn pop(&mut self) -> Option<Symbol> {
        self.0.pop()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Symbols are validated ASCII, so this never loses data.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl FromStr for Sequence {
    type Err = EvoAlignError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sequence {
    type Error = EvoAlignError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Sequence> for String {
    fn from(seq: Sequence) -> Self {
        seq.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases_and_skips_whitespace() {
        let seq = Sequence::parse("mk t\nAY-").unwrap();
        assert_eq!(seq.to_string(), "MKTAY-");
        assert_eq!(seq.residue_count(), 5);
    }

    #[test]
    fn test_parse_rejects_digits() {
        assert!(matches!(
            Sequence::parse("AC1D"),
            Err(EvoAlignError::InvalidSequence(_))
        ));
    }

    #[test]
    fn test_pad_and_trailing_gaps() {
        let mut seq: Sequence = "ACD".parse().unwrap();
        seq.pad_to(6).unwrap();
        assert_eq!(seq.to_string(), "ACD---");
        assert_eq!(seq.trailing_gaps(), 3);
        assert!(seq.pad_to(2).is_err());
        assert_eq!(seq.len(), 6);
    }

    #[test]
    fn test_extend_gaps_never_truncates() {
        let mut seq: Sequence = "ACD".parse().unwrap();
        seq.extend_gaps_to(2);
        assert_eq!(seq.to_string(), "ACD");
        seq.extend_gaps_to(5);
        assert_eq!(seq.to_string(), "ACD--");
    }

    #[test]
    fn test_ungapped() {
        let seq: Sequence = "A-C--D".parse().unwrap();
        assert_eq!(seq.ungapped().to_string(), "ACD");
    }

    #[test]
    fn test_serde_as_string() {
        let seq: Sequence = "AC-D".parse().unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "\"AC-D\"");
        let back: Sequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
        assert!(serde_json::from_str::<Sequence>("\"AC9\"").is_err());
    }
}
