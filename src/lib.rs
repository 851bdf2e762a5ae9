//! A k-nearest-neighbors classifier over labeled numeric feature vectors.
//!
//! A [`Dataset`] holds labeled examples. [`Dataset::classify`] splits it at
//! random into training and test sets, classifies every test example with a
//! [`KNNClassifier`] bound to the training set, and merges both halves back so
//! the result can be displayed or scored with [`Dataset::evaluate`].
//!
//! ```
//! use knn::{ClassificationConfig, Dataset};
//!
//! let mut dataset = Dataset::new();
//! for i in 0..10 {
//!     let offset = i as f64 * 0.1;
//!     dataset.add_example(1, vec![offset, 1.0 + offset]).unwrap();
//!     dataset.add_example(2, vec![8.0 + offset, 9.0 - offset]).unwrap();
//! }
//!
//! let config = ClassificationConfig::new(3, 10).with_seed(42);
//! let classified = dataset.classify_with_config(&config).unwrap();
//!
//! let evaluation = classified.evaluate();
//! assert_eq!(evaluation.total, 20);
//! assert_eq!(evaluation.classified, 10);
//! ```

pub mod error;
pub mod ml;

pub use error::{Error, Result};
pub use ml::classic::{
    load_path, load_records, ClassNames, ClassificationConfig, Dataset, Evaluation, Example,
    KNNClassifier, Label, LoadedDataset, Neighbor,
};
