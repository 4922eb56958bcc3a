//! Serialization of fitted parameters.
//!
//! [`SerializableParams`] turns plain numerical parameter records (no backend
//! tensors) into bytes and back. Every serde type gets it through bincode.
//! [`ModelRecord`] is the versioned on-disk format of a trained pipeline.

use crate::error::{RegressionError, Result};
use crate::preprocessing::MinMaxBounds;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// A parameter representation that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Current [`ModelRecord`] layout version.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Everything needed to predict a price from a living area without the dataset:
/// the linear layer and the bounds both columns were scaled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub format_version: u32,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub feature_bounds: MinMaxBounds,
    pub label_bounds: MinMaxBounds,
}

impl ModelRecord {
    pub fn new(
        weights: Vec<f64>,
        bias: f64,
        feature_bounds: MinMaxBounds,
        label_bounds: MinMaxBounds,
    ) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            weights,
            bias,
            feature_bounds,
            label_bounds,
        }
    }

    /// Writes the record with bincode.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Reads a record and checks its version.
    ///
    /// # Errors
    /// [`RegressionError::UnsupportedFormat`] when the file was written with a
    /// different layout version; I/O and decoding errors otherwise.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let record = Self::from_bytes(&bytes)?;
        if record.format_version != MODEL_FORMAT_VERSION {
            return Err(RegressionError::UnsupportedFormat {
                found: record.format_version,
                expected: MODEL_FORMAT_VERSION,
            });
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ModelRecord {
        ModelRecord::new(
            vec![0.8],
            0.05,
            MinMaxBounds::new(290.0, 13540.0),
            MinMaxBounds::new(75000.0, 7700000.0),
        )
    }

    #[test]
    fn test_bytes_roundtrip() {
        let record = sample_record();
        let bytes = record.to_bytes().unwrap();
        assert_eq!(ModelRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_save_load_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("model.bin");

        let record = sample_record();
        record.save_to_file(&path)?;
        let loaded = ModelRecord::load_from_file(&path)?;
        assert_eq!(loaded, record);
        Ok(())
    }

    #[test]
    fn test_rejects_other_version() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("model.bin");

        let mut record = sample_record();
        record.format_version = 99;
        std::fs::write(&path, record.to_bytes()?)?;

        let err = ModelRecord::load_from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::UnsupportedFormat {
                found: 99,
                expected: MODEL_FORMAT_VERSION
            }
        ));
        Ok(())
    }

    #[test]
    fn test_rejects_garbage() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("model.bin");
        std::fs::write(&path, [1u8, 2, 3])?;
        assert!(matches!(
            ModelRecord::load_from_file(&path),
            Err(RegressionError::Serialization(_))
        ));
        Ok(())
    }
}
