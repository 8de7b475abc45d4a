use crate::error::BackpropError;
use crate::matrix::Matrix;
use std::fmt;

/// Numeric payload of a graph node: a single `f64` or a rectangular matrix.
///
/// Gradients use the same representation, so a node's `grad` always has the
/// shape of its `payload`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Scalar(f64),
    Matrix(Matrix),
}

impl Payload {
    /// Shape of the payload: `[]` for a scalar, `[rows, cols]` for a matrix.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Payload::Scalar(_) => vec![],
            Payload::Matrix(m) => vec![m.rows(), m.cols()],
        }
    }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            Payload::Scalar(v) => Some(*v),
            Payload::Matrix(_) => None,
        }
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            Payload::Scalar(_) => None,
            Payload::Matrix(m) => Some(m),
        }
    }

    /// Flat row-major element view; a scalar yields a single element.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Payload::Scalar(v) => vec![*v],
            Payload::Matrix(m) => m.data().to_vec(),
        }
    }

    /// Sum of all elements. The backward seed is all ones, so this is the
    /// quantity whose gradient the engine computes for a matrix root.
    pub fn sum(&self) -> f64 {
        match self {
            Payload::Scalar(v) => *v,
            Payload::Matrix(m) => m.sum(),
        }
    }

    pub(crate) fn zeros_like(&self) -> Payload {
        match self {
            Payload::Scalar(_) => Payload::Scalar(0.0),
            Payload::Matrix(m) => Payload::Matrix(Matrix::zeros(m.rows(), m.cols())),
        }
    }

    pub(crate) fn ones_like(&self) -> Payload {
        match self {
            Payload::Scalar(_) => Payload::Scalar(1.0),
            Payload::Matrix(m) => Payload::Matrix(Matrix::ones(m.rows(), m.cols())),
        }
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Payload {
        match self {
            Payload::Scalar(v) => Payload::Scalar(f(*v)),
            Payload::Matrix(m) => Payload::Matrix(m.map(f)),
        }
    }

    pub(crate) fn try_map(
        &self,
        f: impl Fn(f64) -> Result<f64, BackpropError>,
    ) -> Result<Payload, BackpropError> {
        match self {
            Payload::Scalar(v) => Ok(Payload::Scalar(f(*v)?)),
            Payload::Matrix(m) => Ok(Payload::Matrix(m.try_map(f)?)),
        }
    }

    /// Elementwise combination with scalar replication.
    ///
    /// scalar∘scalar stays scalar; a scalar paired with a matrix is replicated
    /// across it; two matrices must have identical shapes, anything else is a
    /// `ShapeMismatch` for `operation`.
    pub(crate) fn zip(
        operation: &str,
        a: &Payload,
        b: &Payload,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Payload, BackpropError> {
        match (a, b) {
            (Payload::Scalar(x), Payload::Scalar(y)) => Ok(Payload::Scalar(f(*x, *y))),
            (Payload::Scalar(x), Payload::Matrix(m)) => Ok(Payload::Matrix(m.map(|y| f(*x, y)))),
            (Payload::Matrix(m), Payload::Scalar(y)) => Ok(Payload::Matrix(m.map(|x| f(x, *y)))),
            (Payload::Matrix(ma), Payload::Matrix(mb)) => {
                if (ma.rows(), ma.cols()) != (mb.rows(), mb.cols()) {
                    return Err(BackpropError::ShapeMismatch {
                        lhs: a.shape(),
                        rhs: b.shape(),
                        operation: operation.to_string(),
                    });
                }
                Ok(Payload::Matrix(ma.zip_map(mb, f)))
            }
        }
    }

    /// Like [`Payload::zip`], for combining rules that can reject an element
    /// pair (division by zero, power domain checks).
    pub(crate) fn try_zip(
        operation: &str,
        a: &Payload,
        b: &Payload,
        f: impl Fn(f64, f64) -> Result<f64, BackpropError>,
    ) -> Result<Payload, BackpropError> {
        match (a, b) {
            (Payload::Scalar(x), Payload::Scalar(y)) => Ok(Payload::Scalar(f(*x, *y)?)),
            (Payload::Scalar(x), Payload::Matrix(m)) => {
                Ok(Payload::Matrix(m.try_map(|y| f(*x, y))?))
            }
            (Payload::Matrix(m), Payload::Scalar(y)) => {
                Ok(Payload::Matrix(m.try_map(|x| f(x, *y))?))
            }
            (Payload::Matrix(ma), Payload::Matrix(mb)) => {
                if (ma.rows(), ma.cols()) != (mb.rows(), mb.cols()) {
                    return Err(BackpropError::ShapeMismatch {
                        lhs: a.shape(),
                        rhs: b.shape(),
                        operation: operation.to_string(),
                    });
                }
                Ok(Payload::Matrix(ma.try_zip_map(mb, f)?))
            }
        }
    }

    /// Elementwise product used by the backward pass to push an accumulated
    /// gradient through a frozen local derivative. Shapes have already been
    /// validated at construction, so this cannot mismatch.
    pub(crate) fn pointwise_mul(&self, other: &Payload) -> Payload {
        match (self, other) {
            (Payload::Scalar(a), Payload::Scalar(b)) => Payload::Scalar(a * b),
            (Payload::Scalar(a), Payload::Matrix(m)) => Payload::Matrix(m.map(|x| a * x)),
            (Payload::Matrix(m), Payload::Scalar(b)) => Payload::Matrix(m.map(|x| x * b)),
            (Payload::Matrix(ma), Payload::Matrix(mb)) => {
                Payload::Matrix(ma.zip_map(mb, |x, y| x * y))
            }
        }
    }

    /// Reduces a gradient contribution back to an operand's shape: a matrix
    /// contribution flowing into a scalar operand (the operand was replicated
    /// during the forward op) collapses to the sum of its elements.
    pub(crate) fn reduce_like(&self, reference: &Payload) -> Payload {
        match (self, reference) {
            (Payload::Matrix(m), Payload::Scalar(_)) => Payload::Scalar(m.sum()),
            _ => self.clone(),
        }
    }

    /// Accumulates `other` into `self`. Both sides always have the same shape
    /// because contributions are reduced before accumulation.
    pub(crate) fn accumulate(&mut self, other: &Payload) {
        match (self, other) {
            (Payload::Scalar(a), Payload::Scalar(b)) => *a += *b,
            (Payload::Matrix(ma), Payload::Matrix(mb)) => ma.add_assign(mb),
            _ => unreachable!("gradient shape drifted from payload shape"),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Scalar(v) => write!(f, "{}", v),
            Payload::Matrix(m) => write!(f, "{}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_scalar_replication() {
        let s = Payload::Scalar(2.0);
        let m = Payload::Matrix(Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap());
        let out = Payload::zip("mul", &s, &m, |a, b| a * b).unwrap();
        assert_eq!(out.to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_zip_shape_mismatch() {
        let a = Payload::Matrix(Matrix::zeros(2, 2));
        let b = Payload::Matrix(Matrix::zeros(2, 3));
        let result = Payload::zip("add", &a, &b, |x, y| x + y);
        assert!(matches!(
            result,
            Err(BackpropError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_reduce_like_collapses_to_scalar() {
        let contrib = Payload::Matrix(Matrix::ones(2, 3));
        let reduced = contrib.reduce_like(&Payload::Scalar(0.0));
        assert_eq!(reduced, Payload::Scalar(6.0));
    }
}
