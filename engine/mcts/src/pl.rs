//! Plackett-Luce skill estimation.
//!
//! Rankings over arbitrary objects are encoded into index rankings, then the
//! minorize-maximize algorithm of Hunter (2004) finds the maximum-likelihood
//! skill vector. Rankings list the best object first.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

/// Index-encoded rankings over `num_objects` objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlInferenceProblem {
    pub num_objects: usize,
    pub rankings: Vec<Vec<usize>>,
}

/// Maps objects to dense indices in order of first appearance.
#[derive(Debug, Clone)]
pub struct PlProblemEncoder<T> {
    index: HashMap<T, usize>,
    objects: Vec<T>,
}

impl<T: Clone + Eq + Hash> Default for PlProblemEncoder<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            objects: Vec::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> PlProblemEncoder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder with indices fixed up front, in the given order.
    pub fn with_objects<'a>(objects: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        let mut encoder = Self::new();
        for obj in objects {
            encoder.index_or_insert(obj);
        }
        encoder
    }

    /// Encode rankings, assigning indices as objects first appear.
    pub fn encode(&mut self, rankings: &[Vec<T>]) -> PlInferenceProblem {
        let encoded = rankings
            .iter()
            .map(|ranking| ranking.iter().map(|obj| self.index_or_insert(obj)).collect())
            .collect();
        PlInferenceProblem {
            num_objects: self.objects.len(),
            rankings: encoded,
        }
    }

    fn index_or_insert(&mut self, obj: &T) -> usize {
        if let Some(idx) = self.index.get(obj) {
            return *idx;
        }
        let idx = self.objects.len();
        self.index.insert(obj.clone(), idx);
        self.objects.push(obj.clone());
        idx
    }

    pub fn index_of(&self, obj: &T) -> Option<usize> {
        self.index.get(obj).copied()
    }

    pub fn objects(&self) -> &[T] {
        &self.objects
    }
}

/// Uniform skill vector summing to one.
pub fn default_skills(num_objects: usize) -> Vec<f64> {
    if num_objects == 0 {
        return Vec::new();
    }
    vec![1.0 / num_objects as f64; num_objects]
}

/// Minorize-maximize estimator for Plackett-Luce skills.
#[derive(Debug, Clone, Copy)]
pub struct MmEstimator {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for MmEstimator {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

impl MmEstimator {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Estimate skills, normalized to sum one.
    ///
    /// `initial` seeds the iteration when it has one entry per object and a
    /// positive sum; otherwise the uniform vector is used.
    pub fn estimate(&self, problem: &PlInferenceProblem, initial: Option<&[f64]>) -> Vec<f64> {
        let n = problem.num_objects;
        if n <= 1 {
            return default_skills(n);
        }

        let mut skills = match initial {
            Some(init) if init.len() == n && init.iter().sum::<f64>() > 0.0 => normalized(init.to_vec()),
            _ => default_skills(n),
        };

        // W_i: how often object i is placed anywhere but last
        let mut wins = vec![0.0; n];
        for ranking in &problem.rankings {
            for &obj in ranking.iter().take(ranking.len().saturating_sub(1)) {
                wins[obj] += 1.0;
            }
        }

        for iteration in 0..self.max_iterations {
            let mut denominators = vec![0.0; n];
            for ranking in &problem.rankings {
                let m = ranking.len();
                if m < 2 {
                    continue;
                }
                // suffix sums of the skills still in play at each stage
                let mut remaining = vec![0.0; m + 1];
                for t in (0..m).rev() {
                    remaining[t] = remaining[t + 1] + skills[ranking[t]];
                }
                let mut inverse_prefix = 0.0;
                for (t, &obj) in ranking.iter().enumerate() {
                    if t < m - 1 && remaining[t] > 0.0 {
                        inverse_prefix += 1.0 / remaining[t];
                    }
                    denominators[obj] += inverse_prefix;
                }
            }

            let updated: Vec<f64> = (0..n)
                .map(|i| {
                    if denominators[i] > 0.0 {
                        wins[i] / denominators[i]
                    } else {
                        skills[i]
                    }
                })
                .collect();
            let updated = normalized(updated);

            let change: f64 = updated
                .iter()
                .zip(skills.iter())
                .map(|(a, b)| (a - b).abs())
                .sum();
            skills = updated;
            if change < self.tolerance {
                trace!(iterations = iteration + 1, change, "MM converged");
                break;
            }
        }
        skills
    }
}

fn normalized(mut values: Vec<f64>) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for v in &mut values {
            *v /= sum;
        }
        values
    } else {
        default_skills(values.len())
    }
}
