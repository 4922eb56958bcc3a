use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Arithmetic a backend scalar must support.
///
/// Implemented for `f64`, the scalar type of every backend in this crate.
pub trait ScalarOps:
    Clone
    + Copy
    + fmt::Debug
    + Send
    + Sync
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn is_finite(self) -> bool;
}

impl ScalarOps for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// Backend-typed scalar.
///
/// Wraps `B::Scalar` and remembers which backend produced it, so a loss computed on
/// one backend cannot be added to a bias living on another.
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Clone for Scalar<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for Scalar<B> {}

impl<B: Backend> fmt::Debug for Scalar<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({:?})", self.data)
    }
}

impl<B: Backend> Scalar<B> {
    pub fn new(value: f64) -> Self {
        Self {
            data: B::scalar_f64(value),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_raw(data: B::Scalar) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }

    pub fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

impl<B: Backend> std::ops::Add for Scalar<B> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.data + rhs.data)
    }
}

impl<B: Backend> std::ops::Sub for Scalar<B> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.data - rhs.data)
    }
}

impl<B: Backend> std::ops::Mul for Scalar<B> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(self.data * rhs.data)
    }
}

impl<B: Backend> std::ops::Div for Scalar<B> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::from_raw(self.data / rhs.data)
    }
}
