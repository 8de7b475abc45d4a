use crate::error::BackpropError;
use std::fmt;

/// Dense, row-major, rectangular 2-D matrix of `f64`.
///
/// This is the only array shape the engine supports. Storage is a flat
/// `Vec<f64>` indexed as `row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from a flat row-major buffer.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, BackpropError> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(BackpropError::InvalidDimensions {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![1.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat row-major view of the elements.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Applies `f` to every element, producing a new matrix of the same shape.
    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Elementwise combination of two same-shaped matrices.
    ///
    /// Shape agreement is the caller's responsibility; the operator layer
    /// validates shapes before any kernel runs.
    pub(crate) fn zip_map(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Fallible variant of [`Matrix::map`].
    pub(crate) fn try_map(
        &self,
        f: impl Fn(f64) -> Result<f64, BackpropError>,
    ) -> Result<Matrix, BackpropError> {
        let mut data = Vec::with_capacity(self.data.len());
        for &x in &self.data {
            data.push(f(x)?);
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Fallible elementwise combination, used where the combining rule itself
    /// can reject an element pair (division by zero, power domain checks).
    pub(crate) fn try_zip_map(
        &self,
        other: &Matrix,
        f: impl Fn(f64, f64) -> Result<f64, BackpropError>,
    ) -> Result<Matrix, BackpropError> {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        let mut data = Vec::with_capacity(self.data.len());
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            data.push(f(a, b)?);
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// In-place elementwise accumulation.
    pub(crate) fn add_assign(&mut self, other: &Matrix) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }

    /// Matrix product `self @ other`. A: [M, K], B: [K, N] -> C: [M, N].
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, BackpropError> {
        if self.cols != other.rows {
            return Err(BackpropError::ShapeMismatch {
                lhs: vec![self.rows, self.cols],
                rhs: vec![other.rows, other.cols],
                operation: "matmul".to_string(),
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut data = vec![0.0; m * n];
        for i in 0..m {
            for l in 0..k {
                let a = self.data[i * k + l];
                for j in 0..n {
                    data[i * n + j] += a * other.data[l * n + j];
                }
            }
        }
        Ok(Matrix {
            rows: m,
            cols: n,
            data,
        })
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.get(i, j))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
