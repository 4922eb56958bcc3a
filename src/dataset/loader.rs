//! Housing CSV loader.
//!
//! Reads a CSV file with a header row, projects one feature column and one label
//! column into [`Sample`]s, drops a trailing sample when the count is odd (so the
//! train/test halves are exact) and shuffles the rest once.

use crate::error::{RegressionError, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Default feature column of the King County house sales dataset.
pub const DEFAULT_FEATURE_COLUMN: &str = "sqft_living";
/// Default label column of the King County house sales dataset.
pub const DEFAULT_LABEL_COLUMN: &str = "price";

/// One dataset row reduced to `(feature, label)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Living area in square feet.
    pub x: f64,
    /// Sale price.
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Splits samples into parallel feature and label vectors.
pub fn unzip_samples(samples: &[Sample]) -> (Vec<f64>, Vec<f64>) {
    samples.iter().map(|s| (s.x, s.y)).unzip()
}

/// Builder-style loader for the housing CSV.
///
/// # Example
///
/// ```no_run
/// use housing_regression::dataset::HousingCsvLoader;
///
/// let samples = HousingCsvLoader::new("public/kc_house_data.csv")
///     .with_seed(Some(42))
///     .load()
///     .unwrap();
/// assert_eq!(samples.len() % 2, 0);
/// ```
#[derive(Debug, Clone)]
pub struct HousingCsvLoader {
    path: PathBuf,
    feature_column: String,
    label_column: String,
    seed: Option<u64>,
}

impl HousingCsvLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            feature_column: DEFAULT_FEATURE_COLUMN.to_string(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            seed: None,
        }
    }

    /// Overrides the projected column names.
    pub fn with_columns(mut self, feature: &str, label: &str) -> Self {
        self.feature_column = feature.to_string();
        self.label_column = label.to_string();
        self
    }

    /// Fixes the shuffle order. `None` shuffles with the thread RNG.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, trims to even length and shuffles the configured file.
    ///
    /// # Errors
    /// I/O failures, malformed CSV, missing columns, unparseable cells and empty
    /// files are all returned as-is; nothing is retried.
    pub fn load(&self) -> Result<Vec<Sample>> {
        info!("loading samples from {}", self.path.display());
        let file = File::open(&self.path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Same as [`load`](Self::load) but from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Vec<Sample>> {
        let mut samples = read_samples(reader, &self.feature_column, &self.label_column)?;
        prepare_samples(&mut samples, self.seed);
        if samples.is_empty() {
            return Err(RegressionError::EmptyData(format!(
                "no usable rows in {}",
                self.path.display()
            )));
        }
        info!(
            "loaded {} samples ({} vs {})",
            samples.len(),
            self.feature_column,
            self.label_column
        );
        Ok(samples)
    }
}

/// Parses every record into a [`Sample`], in file order.
pub fn read_samples<R: Read>(reader: R, feature: &str, label: &str) -> Result<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| RegressionError::MissingColumn(name.to_string()))
    };
    let x_idx = column_index(feature)?;
    let y_idx = column_index(label)?;
    debug!("columns: {}={}, {}={}", feature, x_idx, label, y_idx);

    let mut samples = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let x = parse_cell(record.get(x_idx), row, feature)?;
        let y = parse_cell(record.get(y_idx), row, label)?;
        samples.push(Sample { x, y });
    }
    Ok(samples)
}

fn parse_cell(cell: Option<&str>, row: usize, column: &str) -> Result<f64> {
    let raw = cell.unwrap_or("");
    raw.parse::<f64>()
        .map_err(|_| RegressionError::InvalidValue {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Drops the last sample if the count is odd, then shuffles in place.
pub fn prepare_samples(samples: &mut Vec<Sample>, seed: Option<u64>) {
    if samples.len() % 2 != 0 {
        warn!(
            "odd sample count {}, dropping the last sample",
            samples.len()
        );
        samples.pop();
    }

    match seed {
        Some(seed) => samples.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => samples.shuffle(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "id,price,bedrooms,sqft_living\n\
                       1,221900,3,1180\n\
                       2,538000,3,2570\n\
                       3,180000,2,770\n\
                       4,604000,4,1960\n\
                       5,510000,3,1680\n";

    #[test]
    fn test_read_samples_projects_columns() {
        let samples = read_samples(CSV.as_bytes(), "sqft_living", "price").unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], Sample::new(1180.0, 221900.0));
        assert_eq!(samples[4], Sample::new(1680.0, 510000.0));
    }

    #[test]
    fn test_odd_length_dropped_to_even() {
        let loader = HousingCsvLoader::new("inline.csv").with_seed(Some(1));
        let samples = loader.load_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(samples.len(), 4);

        // The dropped sample is the trailing one, before shuffling.
        assert!(!samples.contains(&Sample::new(1680.0, 510000.0)));
    }

    #[test]
    fn test_single_row_is_empty_after_trim() {
        let csv = "sqft_living,price\n1180,221900\n";
        let loader = HousingCsvLoader::new("one.csv");
        assert!(matches!(
            loader.load_from_reader(csv.as_bytes()),
            Err(RegressionError::EmptyData(_))
        ));
        assert!(matches!(
            loader.load_from_reader("sqft_living,price\n".as_bytes()),
            Err(RegressionError::EmptyData(_))
        ));
    }

    #[test]
    fn test_even_length_kept() {
        let mut samples: Vec<Sample> = (0..6).map(|i| Sample::new(i as f64, i as f64)).collect();
        prepare_samples(&mut samples, Some(3));
        assert_eq!(samples.len(), 6);

        let mut xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let base: Vec<Sample> = (0..50).map(|i| Sample::new(i as f64, 0.0)).collect();
        let mut a = base.clone();
        let mut b = base.clone();
        prepare_samples(&mut a, Some(7));
        prepare_samples(&mut b, Some(7));
        assert_eq!(a, b);
        assert_ne!(a, base);
    }

    #[test]
    fn test_missing_column() {
        let err = read_samples(CSV.as_bytes(), "sqft_lot", "price").unwrap_err();
        assert!(matches!(err, RegressionError::MissingColumn(ref c) if c == "sqft_lot"));
    }

    #[test]
    fn test_invalid_value() {
        let csv = "sqft_living,price\n1000,200000\nlarge,300000\n";
        let err = read_samples(csv.as_bytes(), "sqft_living", "price").unwrap_err();
        match err {
            RegressionError::InvalidValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "sqft_living");
                assert_eq!(value, "large");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file() {
        let loader = HousingCsvLoader::new("empty.csv");
        let err = loader
            .load_from_reader("sqft_living,price\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, RegressionError::EmptyData(_)));
    }

    #[test]
    fn test_unreachable_file() {
        let err = HousingCsvLoader::new("/definitely/not/here.csv")
            .load()
            .unwrap_err();
        assert!(matches!(err, RegressionError::Io(_)));
    }

    #[test]
    fn test_unzip_samples() {
        let (x, y) = unzip_samples(&[Sample::new(1.0, 2.0), Sample::new(3.0, 4.0)]);
        assert_eq!(x, vec![1.0, 3.0]);
        assert_eq!(y, vec![2.0, 4.0]);
    }
}
