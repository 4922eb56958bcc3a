use super::Backend;
use std::ops::Range;

/// Pure-Rust backend storing tensors as `Vec<f64>`.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.0[i * self.2..(i + 1) * self.2]
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        CpuTensor2D::new(t.clone(), t.len(), 1)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b).map(|(a, b)| a * b).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum()
    }

    fn mean_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn min_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn matvec(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(m.2, v.len(), "matvec: cols != len(v)");
        (0..m.1)
            .map(|i| m.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn matvec_transposed(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(m.1, v.len(), "matvec_transposed: rows != len(v)");
        let mut out = vec![0.; m.2];
        for (i, g) in v.iter().enumerate() {
            for (o, x) in out.iter_mut().zip(m.row(i)) {
                *o += x * g;
            }
        }
        out
    }

    fn slice_1d(t: &Self::Tensor1D, range: Range<usize>) -> Self::Tensor1D {
        t[range].to_vec()
    }

    fn slice_rows_2d(t: &Self::Tensor2D, range: Range<usize>) -> Self::Tensor2D {
        let rows = range.len();
        let data = t.0[range.start * t.2..range.end * t.2].to_vec();
        CpuTensor2D::new(data, rows, t.2)
    }
}
