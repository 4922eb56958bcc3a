use super::Backend;
use ndarray::{s, Array1, Array2};
use std::ops::Range;

/// Backend built on `ndarray` arrays.
///
/// # Type mappings
/// - `Scalar`: `f64`
/// - `Tensor1D`: `ndarray::Array1<f64>`
/// - `Tensor2D`: [`NdarrayTensor2D`] wrapping `ndarray::Array2<f64>`
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

/// Newtype over `Array2<f64>` so the backend owns its matrix type.
#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f64>);

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        NdarrayTensor2D(Array2::from_shape_vec((rows, cols), data).expect("shape checked above"))
    }

    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(t.clone().insert_axis(ndarray::Axis(1)))
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a * b
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.mapv(|x| x + *s)
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.mapv(|x| x * *s)
    }

    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.mean().unwrap_or(f64::NAN)
    }

    fn min_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.fold(f64::INFINITY, |acc, &x| acc.min(x))
    }

    fn max_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x))
    }

    fn matvec(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(m.0.ncols(), v.len(), "matvec: cols != len(v)");
        m.0.dot(v)
    }

    fn matvec_transposed(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(m.0.nrows(), v.len(), "matvec_transposed: rows != len(v)");
        m.0.t().dot(v)
    }

    fn slice_1d(t: &Self::Tensor1D, range: Range<usize>) -> Self::Tensor1D {
        t.slice(s![range]).to_owned()
    }

    fn slice_rows_2d(t: &Self::Tensor2D, range: Range<usize>) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.slice(s![range, ..]).to_owned())
    }
}
