use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::{RegressionError, Result};
use std::ops::Range;

/// Dataset held entirely in backend tensors.
#[derive(Clone, Debug)]
pub struct InMemoryDataset<B: Backend> {
    x: Tensor2D<B>,
    y: Tensor1D<B>,
}

impl<B: Backend> InMemoryDataset<B> {
    /// Pairs a feature matrix with its targets; row count must equal target count.
    pub fn new(x: Tensor2D<B>, y: Tensor1D<B>) -> Result<Self> {
        if x.rows() != y.len() {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("{} targets", x.rows()),
                got: format!("{} targets", y.len()),
            });
        }
        Ok(Self { x, y })
    }

    /// Single-feature dataset from two parallel columns.
    pub fn from_columns(feature: &Tensor1D<B>, label: &Tensor1D<B>) -> Result<Self> {
        Self::new(feature.to_column(), label.clone())
    }

    /// Builds a dataset from host rows. Rejects empty and ragged input.
    pub fn from_rows(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("{} targets", x.len()),
                got: format!("{} targets", y.len()),
            });
        }
        let n_features = match x.first() {
            Some(row) => row.len(),
            None => return Err(RegressionError::EmptyData("dataset has no rows".into())),
        };
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("{} features in every row", n_features),
                got: format!("{} features in row {}", x[bad].len(), bad),
            });
        }

        let rows = x.len();
        let data = x.into_iter().flatten().collect();
        Self::new(Tensor2D::new(data, rows, n_features), Tensor1D::new(y))
    }

    pub fn features(&self) -> &Tensor2D<B> {
        &self.x
    }

    pub fn labels(&self) -> &Tensor1D<B> {
        &self.y
    }

    /// Copies the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let (rows, cols) = self.x.shape();
        if let Some(&bad) = indices.iter().find(|&&i| i >= rows) {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("row index < {}", rows),
                got: bad.to_string(),
            });
        }
        let x = self.x.to_vec();
        let y = self.y.to_vec();
        let data = indices
            .iter()
            .flat_map(|&i| x[i * cols..(i + 1) * cols].iter().copied())
            .collect();
        let labels = indices.iter().map(|&i| y[i]).collect();
        Self::new(
            Tensor2D::new(data, indices.len(), cols),
            Tensor1D::new(labels),
        )
    }

    /// Splits into `[0, at)` and `[at, len)` without reordering.
    pub fn split_at(&self, at: usize) -> Result<(Self, Self)> {
        let n = self.y.len();
        if at > n {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("split point <= {}", n),
                got: at.to_string(),
            });
        }
        let head = Self {
            x: self.x.slice_rows(0..at),
            y: self.y.slice(0..at),
        };
        let tail = Self {
            x: self.x.slice_rows(at..n),
            y: self.y.slice(at..n),
        };
        Ok((head, tail))
    }
}

impl<B: Backend> Dataset<B> for InMemoryDataset<B> {
    fn len(&self) -> usize {
        self.y.len()
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(Tensor2D<B>, Tensor1D<B>)> {
        if range.start > range.end || range.end > self.len() {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("range within 0..{}", self.len()),
                got: format!("{:?}", range),
            });
        }
        Ok((self.x.slice_rows(range.clone()), self.y.slice(range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_from_rows_valid() {
        let ds = InMemoryDataset::<CpuBackend>::from_rows(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![0.0, 1.0],
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features().shape(), (2, 2));
    }

    #[test]
    fn test_from_rows_rejects_mismatch_and_empty() {
        assert!(matches!(
            InMemoryDataset::<CpuBackend>::from_rows(vec![vec![1.0]], vec![]),
            Err(RegressionError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            InMemoryDataset::<CpuBackend>::from_rows(vec![], vec![]),
            Err(RegressionError::EmptyData(_))
        ));
        assert!(matches!(
            InMemoryDataset::<CpuBackend>::from_rows(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 1.0]),
            Err(RegressionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_columns() {
        let f = Tensor1D::<CpuBackend>::new(vec![0.0, 0.5, 1.0]);
        let l = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        let ds = InMemoryDataset::from_columns(&f, &l).unwrap();
        assert_eq!(ds.features().shape(), (3, 1));
        assert_eq!(ds.labels().to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_select_reorders_rows() {
        let ds = InMemoryDataset::<CpuBackend>::from_rows(
            vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
            vec![0.1, 0.2, 0.3],
        )
        .unwrap();
        let picked = ds.select(&[2, 0]).unwrap();
        assert_eq!(picked.features().shape(), (2, 2));
        assert_eq!(picked.features().to_vec(), vec![3.0, 30.0, 1.0, 10.0]);
        assert_eq!(picked.labels().to_vec(), vec![0.3, 0.1]);
        assert!(matches!(
            ds.select(&[3]),
            Err(RegressionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_split_at_preserves_order() {
        let f = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let ds = InMemoryDataset::from_columns(&f, &f).unwrap();
        let (head, tail) = ds.split_at(4).unwrap();
        assert_eq!(head.labels().to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(tail.labels().to_vec(), vec![5.0]);
        assert_eq!(tail.features().to_vec(), vec![5.0]);

        let (all, none) = ds.split_at(5).unwrap();
        assert_eq!(all.len(), 5);
        assert!(none.is_empty());
        assert!(ds.split_at(6).is_err());
    }

    #[test]
    fn test_get_batch_out_of_range() {
        let f = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let ds = InMemoryDataset::from_columns(&f, &f).unwrap();
        assert!(ds.get_batch(1..3).is_err());
        assert_eq!(ds.get_batch(1..2).unwrap().1.to_vec(), vec![2.0]);
    }
}
