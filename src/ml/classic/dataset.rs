use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::ml::classic::evaluation::Evaluation;
use crate::ml::classic::k_nearest::{ClassificationConfig, KNNClassifier};

/// Integer class label attached to every example.
pub type Label = i32;

/// One labeled data point: a feature vector, its known class and, once a
/// classification pass has run over it, the class the classifier predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    known_classification: Label,
    predicted_classification: Option<Label>,
    features: Vec<f64>,
}

impl Example {
    /// Creates an unclassified example.
    pub fn new(known_classification: Label, features: Vec<f64>) -> Self {
        Self {
            known_classification,
            predicted_classification: None,
            features,
        }
    }

    pub fn known_classification(&self) -> Label {
        self.known_classification
    }

    pub fn predicted_classification(&self) -> Option<Label> {
        self.predicted_classification
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn set_prediction(&mut self, label: Label) {
        self.predicted_classification = Some(label);
    }

    pub fn clear_prediction(&mut self) {
        self.predicted_classification = None;
    }

    /// Whether the prediction matches the known class, or `None` if the
    /// example has not been classified.
    pub fn is_correct(&self) -> Option<bool> {
        self.predicted_classification
            .map(|predicted| predicted == self.known_classification)
    }
}

/// An ordered collection of examples that all share one feature width.
///
/// The width is fixed by the first example added and every later example must
/// match it. Examples are owned by exactly one `Dataset`: [`Dataset::partition`]
/// and [`Dataset::merge`] move them rather than share them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<Example>,
    feature_count: Option<usize>,
}

impl Dataset {
    /// Creates an empty dataset with no established feature width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from pre-existing examples, validating that every
    /// feature vector is non-empty and that all of them share one width.
    pub fn from_examples(examples: Vec<Example>) -> Result<Self> {
        let mut feature_count = None;
        for example in &examples {
            let width = example.features.len();
            if width == 0 {
                return Err(Error::invalid_input("cannot add a featureless example"));
            }
            match feature_count {
                Some(expected) if expected != width => {
                    return Err(Error::width_mismatch(expected, width));
                }
                Some(_) => {}
                None => feature_count = Some(width),
            }
        }
        Ok(Self {
            examples,
            feature_count,
        })
    }

    // Callers guarantee every example already has width `feature_count`.
    fn from_parts(examples: Vec<Example>, feature_count: Option<usize>) -> Self {
        let feature_count = feature_count.filter(|_| !examples.is_empty());
        Self {
            examples,
            feature_count,
        }
    }

    /// Appends an unclassified example.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `features` is empty.
    /// - `InvalidInput` if `features.len()` differs from the width established
    ///   by the first example.
    pub fn add_example(&mut self, known_classification: Label, features: Vec<f64>) -> Result<()> {
        if features.is_empty() {
            return Err(Error::invalid_input("cannot add a featureless example"));
        }
        if let Some(expected) = self.feature_count {
            if features.len() != expected {
                return Err(Error::width_mismatch(expected, features.len()));
            }
        }

        if self.feature_count.is_none() {
            self.feature_count = Some(features.len());
        }
        self.examples.push(Example::new(known_classification, features));
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Mutable view over the examples. Only predictions can be changed
    /// through it; features and known labels are immutable.
    pub fn examples_mut(&mut self) -> &mut [Example] {
        &mut self.examples
    }

    /// The shared feature width, or `None` while the dataset is empty.
    pub fn feature_count(&self) -> Option<usize> {
        self.feature_count
    }

    /// Randomly moves `min(target_size, size())` examples into a new dataset.
    ///
    /// Returns `(remaining, selected)`. Together they hold every original
    /// example exactly once. See [`Dataset::partition_with_rng`].
    pub fn partition(self, target_size: usize) -> (Dataset, Dataset) {
        let mut rng = rand::thread_rng();
        self.partition_with_rng(target_size, &mut rng)
    }

    /// Partitions using the supplied random number generator.
    ///
    /// Each draw picks a uniformly random index from the examples still in the
    /// pool and moves that example to the selected set, so every subset of
    /// size `min(target_size, size())` is equally likely. The order of both
    /// halves is unspecified.
    ///
    /// # Example
    ///
    /// ```
    /// use knn::Dataset;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut dataset = Dataset::new();
    /// for i in 0..10 {
    ///     dataset.add_example(i % 2, vec![i as f64, 1.0]).unwrap();
    /// }
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    /// let (remaining, selected) = dataset.partition_with_rng(6, &mut rng);
    /// assert_eq!(remaining.size(), 4);
    /// assert_eq!(selected.size(), 6);
    /// ```
    pub fn partition_with_rng<R: Rng + ?Sized>(
        self,
        target_size: usize,
        rng: &mut R,
    ) -> (Dataset, Dataset) {
        let feature_count = self.feature_count;
        let mut pool = self.examples;
        let draws = target_size.min(pool.len());

        let mut selected = Vec::with_capacity(draws);
        for _ in 0..draws {
            let idx = rng.gen_range(0..pool.len());
            selected.push(pool.swap_remove(idx));
        }

        debug!(
            "partitioned dataset: {} remaining, {} selected (requested {})",
            pool.len(),
            selected.len(),
            target_size
        );

        (
            Dataset::from_parts(pool, feature_count),
            Dataset::from_parts(selected, feature_count),
        )
    }

    /// Concatenates this dataset's examples with `other`'s, keeping each
    /// example's prediction.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if both datasets are non-empty and their feature widths
    /// differ.
    pub fn merge(self, other: Dataset) -> Result<Dataset> {
        if let (Some(expected), Some(found)) = (self.feature_count, other.feature_count) {
            if expected != found {
                return Err(Error::width_mismatch(expected, found));
            }
        }

        let feature_count = self.feature_count.or(other.feature_count);
        let mut examples = self.examples;
        examples.extend(other.examples);
        Ok(Dataset::from_parts(examples, feature_count))
    }

    /// Clears every example's prediction.
    pub fn reset_predictions(&mut self) {
        for example in &mut self.examples {
            example.clear_prediction();
        }
    }

    /// Runs one train/test cycle over a copy of this dataset.
    ///
    /// `training_size` examples are drawn at random as the training set, the
    /// rest are classified against them with a `k`-nearest-neighbor vote, and
    /// both halves are merged into the returned dataset (training examples
    /// first). Only test examples carry predictions afterwards. `self` is not
    /// modified.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `k == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use knn::Dataset;
    ///
    /// let mut dataset = Dataset::new();
    /// for i in 0..10 {
    ///     dataset.add_example(1, vec![i as f64, 0.0]).unwrap();
    /// }
    ///
    /// let classified = dataset.classify(3, 7).unwrap();
    /// let predicted = classified
    ///     .examples()
    ///     .iter()
    ///     .filter(|e| e.predicted_classification().is_some())
    ///     .count();
    /// assert_eq!(predicted, 3);
    /// ```
    pub fn classify(&self, k: usize, training_size: usize) -> Result<Dataset> {
        let mut rng = rand::thread_rng();
        self.classify_with_rng(k, training_size, &mut rng)
    }

    /// Like [`Dataset::classify`], with an explicit random number generator
    /// for the train/test split.
    pub fn classify_with_rng<R: Rng + ?Sized>(
        &self,
        k: usize,
        training_size: usize,
        rng: &mut R,
    ) -> Result<Dataset> {
        if k == 0 {
            return Err(Error::invalid_input("k must be > 0"));
        }

        let (mut test, mut train) = self.clone().partition_with_rng(training_size, rng);
        train.reset_predictions();
        test.reset_predictions();

        let classifier = KNNClassifier::new(k, &train)?;
        classifier.classify_dataset(&mut test)?;

        debug!(
            "classified {} test examples against {} training examples (k = {})",
            test.size(),
            train.size(),
            k
        );

        train.merge(test)
    }

    /// Runs [`Dataset::classify`] with the parameters in `config`. A seeded
    /// config always produces the same split.
    pub fn classify_with_config(&self, config: &ClassificationConfig) -> Result<Dataset> {
        let mut rng = config.rng();
        self.classify_with_rng(config.k, config.training_size, &mut rng)
    }

    /// Summarises the predictions currently held by this dataset.
    pub fn evaluate(&self) -> Evaluation {
        Evaluation::of(self)
    }
}
