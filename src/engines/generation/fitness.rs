use super::pareto::OptimizationDirection;
use crate::alignment::AlignmentMatrix;
use crate::error::Result;
use crate::scoring::{self, ScoringMatrix};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Named objective scores of one candidate, in registration order.
///
/// Used as the population key, so equality, ordering and hashing are total:
/// scores compare by [`f64::total_cmp`] and `-0.0` is normalized to `0.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, f64)>", into = "Vec<(String, f64)>")]
pub struct FitnessVector(Vec<(String, f64)>);

impl FitnessVector {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, score)| (name, if score == 0.0 { 0.0 } else { score }))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|&(_, s)| s)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| n == name).map(|&(_, s)| s)
    }

    /// Same objective names in the same order.
    pub fn same_objectives(&self, other: &FitnessVector) -> bool {
        self.0.len() == other.0.len() && self.names().eq(other.names())
    }
}

impl From<Vec<(String, f64)>> for FitnessVector {
    fn from(entries: Vec<(String, f64)>) -> Self {
        Self::new(entries)
    }
}

impl From<FitnessVector> for Vec<(String, f64)> {
    fn from(fv: FitnessVector) -> Self {
        fv.0
    }
}

impl PartialEq for FitnessVector {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FitnessVector {}

impl PartialOrd for FitnessVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FitnessVector {
    fn cmp(&self, other: &Self) -> Ordering {
        for ((an, asc), (bn, bsc)) in self.0.iter().zip(&other.0) {
            let ord = an.cmp(bn).then_with(|| asc.total_cmp(bsc));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl Hash for FitnessVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for (name, score) in &self.0 {
            name.hash(state);
            score.to_bits().hash(state);
        }
    }
}

impl fmt::Display for FitnessVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, score)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {score}")?;
        }
        write!(f, "}}")
    }
}

/// A scoring criterion applied to every candidate alignment.
///
/// Implementations must be deterministic: the same alignment always yields
/// the same score.
pub trait FitnessFunction: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<f64>;
}

/// Sum-of-pairs score under one substitution matrix.
pub struct SumOfPairs {
    name: String,
    matrix: Arc<ScoringMatrix>,
}

impl SumOfPairs {
    pub fn new(name: impl Into<String>, matrix: Arc<ScoringMatrix>) -> Self {
        Self {
            name: name.into(),
            matrix,
        }
    }

    /// Objective named `<matrix>_score`.
    pub fn for_matrix(matrix: ScoringMatrix) -> Self {
        let name = format!("{}_score", matrix.name());
        Self::new(name, Arc::new(matrix))
    }
}

impl FitnessFunction for SumOfPairs {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<f64> {
        scoring::sum_pairs_score(alignment, &self.matrix)
    }
}

/// Count of fully conserved columns.
pub struct MatchCount;

impl FitnessFunction for MatchCount {
    fn name(&self) -> &str {
        "match_count"
    }

    fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<f64> {
        Ok(scoring::match_count(alignment)? as f64)
    }
}

/// Closure-backed fitness function.
pub struct FnFitness<F> {
    name: String,
    f: F,
}

impl<F> FnFitness<F>
where
    F: Fn(&AlignmentMatrix) -> Result<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> FitnessFunction for FnFitness<F>
where
    F: Fn(&AlignmentMatrix) -> Result<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<f64> {
        (self.f)(alignment)
    }
}

/// A registered fitness function plus the direction its raw score is optimized in.
#[derive(Clone)]
pub struct Objective {
    function: Arc<dyn FitnessFunction>,
    direction: OptimizationDirection,
}

impl Objective {
    pub fn maximize(function: Arc<dyn FitnessFunction>) -> Self {
        Self {
            function,
            direction: OptimizationDirection::Maximize,
        }
    }

    pub fn minimize(function: Arc<dyn FitnessFunction>) -> Self {
        Self {
            function,
            direction: OptimizationDirection::Minimize,
        }
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    /// Score on the higher-is-better scale.
    pub fn evaluate(&self, alignment: &AlignmentMatrix) -> Result<f64> {
        Ok(self.direction.orient(self.function.evaluate(alignment)?))
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("name", &self.name())
            .field("direction", &self.direction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_negative_zero_is_normalized() {
        let a = FitnessVector::new(vec![("x".into(), -0.0)]);
        let b = FitnessVector::new(vec![("x".into(), 0.0)]);
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_and_lookup() {
        let low = FitnessVector::new(vec![("x".into(), 1.0), ("y".into(), 5.0)]);
        let high = FitnessVector::new(vec![("x".into(), 2.0), ("y".into(), 0.0)]);
        assert!(low < high);
        assert_eq!(high.get("y"), Some(0.0));
        assert_eq!(high.get("z"), None);
        assert!(low.same_objectives(&high));
        assert_eq!(low.to_string(), "{x: 1, y: 5}");
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let fv = FitnessVector::new(vec![("b".into(), 1.5), ("a".into(), -2.0)]);
        let json = serde_json::to_string(&fv).unwrap();
        assert_eq!(json, r#"[["b",1.5],["a",-2.0]]"#);
        let back: FitnessVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fv);
    }

    #[test]
    fn test_objectives() {
        let alignment = AlignmentMatrix::from_strs(&["WC", "WC"]).unwrap();
        let sop = Objective::maximize(Arc::new(SumOfPairs::for_matrix(ScoringMatrix::blosum62())));
        assert_eq!(sop.name(), "blosum62_score");
        assert_eq!(sop.evaluate(&alignment).unwrap(), 20.0);

        let matches = Objective::minimize(Arc::new(MatchCount));
        assert_eq!(matches.evaluate(&alignment).unwrap(), -2.0);

        let width = FnFitness::new("width", |a: &AlignmentMatrix| Ok(a.width() as f64));
        assert_eq!(width.evaluate(&alignment).unwrap(), 2.0);
    }
}
