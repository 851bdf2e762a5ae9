pub mod dataset;
pub mod evaluation;
pub mod k_nearest;
pub mod loader;

// Re-export public types and functions
pub use dataset::{Dataset, Example, Label};
pub use evaluation::Evaluation;
pub use k_nearest::{ClassificationConfig, KNNClassifier, Neighbor};
pub use loader::{load_path, load_records, ClassNames, LoadedDataset};
