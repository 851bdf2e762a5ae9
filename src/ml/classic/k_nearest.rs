use std::collections::HashMap;

use log::trace;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::ml::classic::dataset::{Dataset, Example, Label};

/// Parameters for one train/test classification cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationConfig {
    /// Number of neighbors consulted per vote.
    pub k: usize,
    /// Number of examples drawn into the training set.
    pub training_size: usize,
    /// Seed for the train/test split. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
}

impl ClassificationConfig {
    /// Create a new config with no fixed seed.
    pub fn new(k: usize, training_size: usize) -> Self {
        Self {
            k,
            training_size,
            seed: None,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_training_size(mut self, training_size: usize) -> Self {
        self.training_size = training_size;
        self
    }

    /// Fix the seed so repeated runs produce the same split.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// A training example selected as a neighbor of some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the example in the training set.
    pub index: usize,
    /// **Squared** Euclidean distance to the query.
    pub distance: f64,
    pub label: Label,
}

/// A k-NN classifier that borrows its training set and classifies by
/// majority vote among the `k` nearest training examples.
///
/// # Fields
/// - `k`: number of neighbors to consider.
/// - `training_set`: the examples voted on. Never modified by the classifier.
#[derive(Debug, Clone, Copy)]
pub struct KNNClassifier<'a> {
    k: usize,
    training_set: &'a Dataset,
}

impl<'a> KNNClassifier<'a> {
    /// Constructs a new `KNNClassifier`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `k == 0`.
    pub fn new(k: usize, training_set: &'a Dataset) -> Result<Self> {
        if k == 0 {
            return Err(Error::invalid_input("k must be > 0"));
        }
        Ok(Self { k, training_set })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn training_set(&self) -> &'a Dataset {
        self.training_set
    }

    /// Predict the label for a single query point using majority vote among
    /// its `k` nearest neighbors.
    ///
    /// Returns `Ok(None)` when the training set is empty, since there is
    /// nothing to vote on.
    ///
    /// When several labels tie for the most votes, the label whose nearest
    /// member comes first in distance order wins.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `features.len()` differs from the training set's
    ///   feature count.
    ///
    /// # Example
    ///
    /// ```
    /// use knn::{Dataset, KNNClassifier};
    ///
    /// let mut training = Dataset::new();
    /// training.add_example(1, vec![1.0, 2.0]).unwrap();
    /// training.add_example(1, vec![2.0, 3.0]).unwrap();
    /// training.add_example(2, vec![3.0, 3.0]).unwrap();
    /// training.add_example(2, vec![6.0, 7.0]).unwrap();
    ///
    /// let knn = KNNClassifier::new(3, &training).unwrap();
    /// assert_eq!(knn.classify(&[2.1, 2.9]).unwrap(), Some(1));
    /// ```
    pub fn classify(&self, features: &[f64]) -> Result<Option<Label>> {
        let neighbors = self.nearest_neighbors(features)?;
        Ok(majority_vote(&neighbors))
    }

    /// Classify multiple query points at once.
    pub fn classify_batch(&self, points: &[Vec<f64>]) -> Result<Vec<Option<Label>>> {
        points.iter().map(|p| self.classify(p)).collect()
    }

    /// The up to `k` training examples closest to `features`, nearest first.
    ///
    /// Equal distances keep the training set's order. Examples whose distance
    /// is NaN come after every other example.
    pub fn nearest_neighbors(&self, features: &[f64]) -> Result<Vec<Neighbor>> {
        let feature_count = match self.training_set.feature_count() {
            Some(n) => n,
            None => return Ok(Vec::new()),
        };
        if features.len() != feature_count {
            return Err(Error::width_mismatch(feature_count, features.len()));
        }

        let mut neighbors: Vec<Neighbor> = self
            .training_set
            .examples()
            .iter()
            .enumerate()
            .map(|(index, example)| Neighbor {
                index,
                distance: euclidean_distance_sq(example.features(), features),
                label: example.known_classification(),
            })
            .collect();

        // sort_by is stable, so ties stay in training set order. NaN distances
        // go last whatever their sign bit.
        neighbors.sort_by(|a, b| {
            a.distance
                .is_nan()
                .cmp(&b.distance.is_nan())
                .then(a.distance.total_cmp(&b.distance))
        });
        neighbors.truncate(self.k);

        trace!(
            "selected {} neighbors, farthest at squared distance {:?}",
            neighbors.len(),
            neighbors.last().map(|n| n.distance)
        );
        Ok(neighbors)
    }

    /// Classifies every example of `dataset` in place, overwriting its
    /// prediction. With an empty training set every prediction is cleared.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if both datasets are non-empty and their feature widths
    ///   differ. No prediction is touched in that case.
    pub fn classify_dataset(&self, dataset: &mut Dataset) -> Result<()> {
        if let (Some(expected), Some(found)) =
            (self.training_set.feature_count(), dataset.feature_count())
        {
            if expected != found {
                return Err(Error::width_mismatch(expected, found));
            }
        }

        #[cfg(feature = "parallel")]
        let result = dataset
            .examples_mut()
            .par_iter_mut()
            .try_for_each(|example| self.assign_prediction(example));
        #[cfg(not(feature = "parallel"))]
        let result = dataset
            .examples_mut()
            .iter_mut()
            .try_for_each(|example| self.assign_prediction(example));
        result
    }

    fn assign_prediction(&self, example: &mut Example) -> Result<()> {
        match self.classify(example.features())? {
            Some(label) => example.set_prediction(label),
            None => example.clear_prediction(),
        }
        Ok(())
    }
}

/// Modal label among `neighbors`, which must be ordered nearest first.
///
/// Ties go to the label whose first occurrence is nearest.
fn majority_vote(neighbors: &[Neighbor]) -> Option<Label> {
    let mut counts = HashMap::<Label, usize>::new();
    for neighbor in neighbors {
        *counts.entry(neighbor.label).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max()?;

    // Scan in distance order so the nearest of the tied labels is found first.
    neighbors
        .iter()
        .map(|n| n.label)
        .find(|label| counts[label] == max_count)
}

/// Returns the **squared** Euclidean distance between two vectors.
/// Skipping the sqrt keeps the ordering of distances unchanged.
fn euclidean_distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}
