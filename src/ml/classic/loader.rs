//! Loading labeled examples from comma-separated records.
//!
//! Each record holds the feature values followed by a class name, e.g. the
//! UCI iris format:
//!
//! ```text
//! 5.1,3.5,1.4,0.2,Iris-setosa
//! 7.0,3.2,4.7,1.4,Iris-versicolor
//! ```
//!
//! Class names are mapped to integer labels in the order they are first seen.
//! Records that cannot be used are skipped and counted rather than failing the
//! whole load. Empty lines are ignored and not counted.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use log::debug;

use crate::error::Result;
use crate::ml::classic::dataset::{Dataset, Label};

/// Two-way mapping between class names and the labels assigned to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
    labels: HashMap<String, Label>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label for `name`, assigning the next free one if unseen.
    pub fn intern(&mut self, name: &str) -> Label {
        if let Some(&label) = self.labels.get(name) {
            return label;
        }
        let label = self.names.len() as Label;
        self.names.push(name.to_string());
        self.labels.insert(name.to_string(), label);
        label
    }

    pub fn label_of(&self, name: &str) -> Option<Label> {
        self.labels.get(name).copied()
    }

    pub fn name_of(&self, label: Label) -> Option<&str> {
        usize::try_from(label)
            .ok()
            .and_then(|idx| self.names.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(label, name)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx as Label, name.as_str()))
    }
}

/// Result of loading a record stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub class_names: ClassNames,
    /// Records dropped because they were malformed or of the wrong width.
    /// Empty lines are ignored by the reader and not counted.
    pub skipped: usize,
}

/// Reads records from `reader` into a new dataset.
///
/// The first usable record fixes the feature width; later records of a
/// different width are skipped.
///
/// # Errors
///
/// `Error::Csv` if the underlying reader fails.
///
/// # Example
///
/// ```
/// use knn::load_records;
///
/// let input = "5.1,3.5,Iris-setosa\n\n7.0,3.2,Iris-versicolor\n6.3,oops,Iris-virginica\n";
/// let loaded = load_records(input.as_bytes()).unwrap();
///
/// assert_eq!(loaded.dataset.size(), 2);
/// assert_eq!(loaded.skipped, 1);
/// assert_eq!(loaded.class_names.label_of("Iris-versicolor"), Some(1));
/// ```
pub fn load_records<R: io::Read>(reader: R) -> Result<LoadedDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut dataset = Dataset::new();
    let mut class_names = ClassNames::new();
    let mut skipped = 0;

    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());

        let (features, name) = match parse_record(&record) {
            Some(parsed) => parsed,
            None => {
                debug!("skipping malformed record on line {}", line);
                skipped += 1;
                continue;
            }
        };

        if let Some(expected) = dataset.feature_count() {
            if features.len() != expected {
                debug!(
                    "skipping record on line {}: {} features, expected {}",
                    line,
                    features.len(),
                    expected
                );
                skipped += 1;
                continue;
            }
        }

        let label = class_names.intern(name);
        dataset.add_example(label, features)?;
    }

    debug!(
        "loaded {} examples in {} classes, skipped {} records",
        dataset.size(),
        class_names.len(),
        skipped
    );

    Ok(LoadedDataset {
        dataset,
        class_names,
        skipped,
    })
}

/// Opens `path` and reads it with [`load_records`].
///
/// # Errors
///
/// `Error::Io` if the file cannot be opened.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<LoadedDataset> {
    let file = File::open(path)?;
    load_records(file)
}

// Splits a record into its feature values and trailing class name.
fn parse_record(record: &ByteRecord) -> Option<(Vec<f64>, &str)> {
    if record.len() < 2 {
        return None;
    }
    let name = std::str::from_utf8(record.get(record.len() - 1)?).ok()?;
    if name.is_empty() {
        return None;
    }

    let features = record
        .iter()
        .take(record.len() - 1)
        .map(|field| std::str::from_utf8(field).ok()?.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    Some((features, name))
}
