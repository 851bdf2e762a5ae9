use std::collections::BTreeMap;

use crate::ml::classic::dataset::{Dataset, Label};

/// Accuracy summary of the predictions held by a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of examples in the dataset.
    pub total: usize,
    /// Number of examples carrying a prediction.
    pub classified: usize,
    /// Number of predictions equal to the known label.
    pub correct: usize,
    /// Counts keyed by `(known, predicted)` over classified examples.
    pub confusion: BTreeMap<(Label, Label), usize>,
}

impl Evaluation {
    pub fn of(dataset: &Dataset) -> Self {
        let mut evaluation = Evaluation {
            total: dataset.size(),
            ..Default::default()
        };

        for example in dataset.examples() {
            let predicted = match example.predicted_classification() {
                Some(label) => label,
                None => continue,
            };
            let known = example.known_classification();

            evaluation.classified += 1;
            if predicted == known {
                evaluation.correct += 1;
            }
            *evaluation.confusion.entry((known, predicted)).or_insert(0) += 1;
        }

        evaluation
    }

    pub fn misclassified(&self) -> usize {
        self.classified.saturating_sub(self.correct)
    }

    /// Fraction of classified examples predicted correctly, or `None` if
    /// nothing was classified.
    pub fn accuracy(&self) -> Option<f64> {
        if self.classified == 0 {
            None
        } else {
            Some(self.correct as f64 / self.classified as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unclassified_dataset() {
        let mut dataset = Dataset::new();
        dataset.add_example(1, vec![0.0]).unwrap();
        dataset.add_example(2, vec![1.0]).unwrap();

        let evaluation = Evaluation::of(&dataset);
        assert_eq!(evaluation.total, 2);
        assert_eq!(evaluation.classified, 0);
        assert_eq!(evaluation.accuracy(), None);
        assert!(evaluation.confusion.is_empty());
    }

    #[test]
    fn test_counts_and_confusion() {
        let mut dataset = Dataset::new();
        dataset.add_example(1, vec![0.0]).unwrap();
        dataset.add_example(1, vec![1.0]).unwrap();
        dataset.add_example(2, vec![2.0]).unwrap();
        dataset.add_example(2, vec![3.0]).unwrap();
        dataset.add_example(3, vec![4.0]).unwrap();

        let predictions = [Some(1), Some(2), Some(2), Some(2), None];
        for (example, prediction) in dataset.examples_mut().iter_mut().zip(predictions) {
            if let Some(label) = prediction {
                example.set_prediction(label);
            }
        }

        let evaluation = dataset.evaluate();
        assert_eq!(evaluation.total, 5);
        assert_eq!(evaluation.classified, 4);
        assert_eq!(evaluation.correct, 3);
        assert_eq!(evaluation.misclassified(), 1);
        assert_relative_eq!(evaluation.accuracy().unwrap(), 0.75);

        assert_eq!(evaluation.confusion.get(&(1, 1)), Some(&1));
        assert_eq!(evaluation.confusion.get(&(1, 2)), Some(&1));
        assert_eq!(evaluation.confusion.get(&(2, 2)), Some(&2));
        assert_eq!(evaluation.confusion.get(&(3, 3)), None);
    }

    #[test]
    fn test_misclassified_does_not_underflow() {
        let evaluation = Evaluation {
            classified: 1,
            correct: 3,
            ..Default::default()
        };
        assert_eq!(evaluation.misclassified(), 0);
    }

    #[test]
    fn test_well_separated_clusters_are_perfect() {
        let mut dataset = Dataset::new();
        for i in 0..20 {
            let offset = i as f64 * 0.01;
            dataset.add_example(1, vec![offset, offset]).unwrap();
            dataset.add_example(2, vec![100.0 + offset, 100.0 - offset]).unwrap();
        }

        let classified = dataset.classify(1, 20).unwrap();
        let evaluation = classified.evaluate();
        assert_eq!(evaluation.classified, 20);
        assert_eq!(evaluation.accuracy(), Some(1.0));
    }
}
