use super::fitness::FitnessVector;
use super::pareto;
use crate::alignment::AlignmentMatrix;
use crate::error::{EvoAlignError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One population member as it appears in checkpoints and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub fitness: FitnessVector,
    pub alignment: AlignmentMatrix,
}

/// Candidate alignments keyed by their fitness vector.
///
/// Inserting under an existing key replaces the previous alignment. Members
/// are owned here; everything handed out is a clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PopulationEntry>", into = "Vec<PopulationEntry>")]
pub struct Population {
    members: BTreeMap<FitnessVector, AlignmentMatrix>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert a member, returning the alignment it displaced, if any.
    pub fn insert(
        &mut self,
        fitness: FitnessVector,
        alignment: AlignmentMatrix,
    ) -> Option<AlignmentMatrix> {
        self.members.insert(fitness, alignment)
    }

    pub fn get(&self, fitness: &FitnessVector) -> Option<&AlignmentMatrix> {
        self.members.get(fitness)
    }

    pub fn contains(&self, fitness: &FitnessVector) -> bool {
        self.members.contains_key(fitness)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FitnessVector, &AlignmentMatrix)> {
        self.members.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FitnessVector> {
        self.members.keys()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&FitnessVector, &AlignmentMatrix) -> bool,
    {
        self.members.retain(|fitness, alignment| keep(fitness, alignment));
    }

    /// `k` clones drawn uniformly with replacement. Empty when `k == 0` or
    /// the population is empty.
    pub fn sample<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Vec<AlignmentMatrix> {
        if k == 0 || self.members.is_empty() {
            return Vec::new();
        }
        let values: Vec<&AlignmentMatrix> = self.members.values().collect();
        (0..k)
            .map(|_| values[rng.gen_range(0..values.len())].clone())
            .collect()
    }

    /// Drop every member dominated by another member. Returns how many were
    /// removed.
    pub fn remove_dominated(&mut self) -> usize {
        let keys: Vec<&FitnessVector> = self.members.keys().collect();
        let survivors = pareto::non_dominated_indices(&keys);
        if survivors.len() == keys.len() {
            return 0;
        }

        let mut keep = vec![false; keys.len()];
        for i in survivors {
            keep[i] = true;
        }
        let doomed: Vec<FitnessVector> = keys
            .iter()
            .zip(&keep)
            .filter(|(_, &k)| !k)
            .map(|(fv, _)| (*fv).clone())
            .collect();

        for fv in &doomed {
            self.members.remove(fv);
        }
        doomed.len()
    }

    /// Fold `other` into `self`; entries from `other` win key collisions.
    /// Returns the number of keys that were not present before.
    pub fn merge(&mut self, other: Population) -> usize {
        let mut added = 0;
        for (fitness, alignment) in other.members {
            if self.members.insert(fitness, alignment).is_none() {
                added += 1;
            }
        }
        added
    }

    /// The member that is lexicographically best on `ranking`: highest on the
    /// first objective, ties broken by the next one, and so on. An empty
    /// ranking uses every objective in registration order.
    pub fn best_by_ranking<S: AsRef<str>>(
        &self,
        ranking: &[S],
    ) -> Result<Option<(&FitnessVector, &AlignmentMatrix)>> {
        let mut best: Option<(Vec<f64>, (&FitnessVector, &AlignmentMatrix))> = None;

        for (fitness, alignment) in &self.members {
            let key = if ranking.is_empty() {
                fitness.scores().collect::<Vec<_>>()
            } else {
                ranking
                    .iter()
                    .map(|name| {
                        let name = name.as_ref();
                        fitness
                            .get(name)
                            .ok_or_else(|| EvoAlignError::UnknownObjective(name.to_string()))
                    })
                    .collect::<Result<Vec<_>>>()?
            };

            let better = match &best {
                None => true,
                Some((best_key, _)) => lexicographic(&key, best_key) == Ordering::Greater,
            };
            if better {
                best = Some((key, (fitness, alignment)));
            }
        }

        Ok(best.map(|(_, member)| member))
    }

    /// Clones of every member, in key order.
    pub fn entries(&self) -> Vec<PopulationEntry> {
        self.members
            .iter()
            .map(|(fitness, alignment)| PopulationEntry {
                fitness: fitness.clone(),
                alignment: alignment.clone(),
            })
            .collect()
    }
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

impl From<Vec<PopulationEntry>> for Population {
    fn from(entries: Vec<PopulationEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Population> for Vec<PopulationEntry> {
    fn from(population: Population) -> Self {
        population
            .members
            .into_iter()
            .map(|(fitness, alignment)| PopulationEntry { fitness, alignment })
            .collect()
    }
}

impl FromIterator<PopulationEntry> for Population {
    fn from_iter<I: IntoIterator<Item = PopulationEntry>>(iter: I) -> Self {
        Self {
            members: iter
                .into_iter()
                .map(|e| (e.fitness, e.alignment))
                .collect(),
        }
    }
}
