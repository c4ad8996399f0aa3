//! Matrix type for 2D numeric data.

use super::Vector;
use serde::{Deserialize, Serialize};

/// A pivot smaller than this fraction of its own diagonal entry is treated as
/// zero during Cholesky factorisation (the column is collinear with earlier ones).
const CHOLESKY_TOLERANCE: f64 = 1e-10;

/// A 2D matrix of floating-point values (row-major storage).
///
/// # Examples
///
/// ```
/// use mpg_analysis::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Returns a row as a Vector.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> Vector<T> {
        let start = row_idx * self.cols;
        let end = start + self.cols;
        Vector::from_slice(&self.data[start..end])
    }

    /// Returns a column as a Vector.
    #[must_use]
    pub fn column(&self, col_idx: usize) -> Vector<T> {
        let data: Vec<T> = (0..self.rows)
            .map(|row| self.data[row * self.cols + col_idx])
            .collect();
        Vector::from_vec(data)
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn eye(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            data,
            rows: n,
            cols: n,
        }
    }

    /// Builds a design matrix from columns, optionally prefixed with a
    /// column of ones for the intercept.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns have different lengths.
    pub fn from_columns(columns: &[&Vector<f64>], intercept: bool) -> Result<Self, &'static str> {
        let n_rows = columns.first().map_or(0, |c| c.len());
        if columns.iter().any(|c| c.len() != n_rows) {
            return Err("All columns must have the same length");
        }
        let n_cols = columns.len() + usize::from(intercept);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for i in 0..n_rows {
            if intercept {
                data.push(1.0);
            }
            for col in columns {
                data.push(col[i]);
            }
        }
        Self::from_vec(n_rows, n_cols, data)
    }

    /// Returns a copy with a leading column of ones (the intercept column).
    #[must_use]
    pub fn prepend_ones(&self) -> Self {
        let mut data = Vec::with_capacity(self.rows * (self.cols + 1));
        for i in 0..self.rows {
            data.push(1.0);
            data.extend_from_slice(&self.data[i * self.cols..(i + 1) * self.cols]);
        }
        Self {
            data,
            rows: self.rows,
            cols: self.cols + 1,
        }
    }

    /// Transposes the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Matrix-matrix multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match.
    pub fn matmul(&self, other: &Self) -> Result<Self, &'static str> {
        if self.cols != other.rows {
            return Err("Matrix dimensions don't match for multiplication");
        }

        let mut result = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                for j in 0..other.cols {
                    result[i * other.cols + j] += a * other.get(k, j);
                }
            }
        }

        Ok(Self {
            data: result,
            rows: self.rows,
            cols: other.cols,
        })
    }

    /// Matrix-vector multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match.
    pub fn matvec(&self, vec: &Vector<f64>) -> Result<Vector<f64>, &'static str> {
        if self.cols != vec.len() {
            return Err("Matrix columns must match vector length");
        }

        let result: Vec<f64> = (0..self.rows)
            .map(|i| {
                let row = &self.data[i * self.cols..(i + 1) * self.cols];
                row.iter().zip(vec.iter()).map(|(a, b)| a * b).sum()
            })
            .collect();

        Ok(Vector::from_vec(result))
    }

    /// Computes `XᵀX` without materialising the transpose.
    #[must_use]
    pub fn gram(&self) -> Self {
        let p = self.cols;
        let mut data = vec![0.0; p * p];
        for r in 0..self.rows {
            let row = &self.data[r * p..(r + 1) * p];
            for i in 0..p {
                for j in 0..=i {
                    data[i * p + j] += row[i] * row[j];
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                data[j * p + i] = data[i * p + j];
            }
        }
        Self {
            data,
            rows: p,
            cols: p,
        }
    }

    /// Computes `Xᵀy`.
    ///
    /// # Errors
    ///
    /// Returns an error if `y` doesn't have one entry per row.
    pub fn t_matvec(&self, y: &Vector<f64>) -> Result<Vector<f64>, &'static str> {
        if self.rows != y.len() {
            return Err("Matrix rows must match vector length");
        }
        let mut out = vec![0.0; self.cols];
        for r in 0..self.rows {
            for (c, acc) in out.iter_mut().enumerate() {
                *acc += self.get(r, c) * y[r];
            }
        }
        Ok(Vector::from_vec(out))
    }

    /// Multiplies each element by a scalar.
    #[must_use]
    pub fn mul_scalar(&self, scalar: f64) -> Self {
        Self {
            data: self.data.iter().map(|x| x * scalar).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square or not positive definite.
    pub fn cholesky(&self) -> Result<Self, &'static str> {
        if self.rows != self.cols {
            return Err("Matrix must be square for Cholesky decomposition");
        }

        let n = self.rows;
        let mut l = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = 0.0;

                if i == j {
                    for k in 0..j {
                        sum += l[j * n + k] * l[j * n + k];
                    }
                    let diag = self.get(j, j) - sum;
                    if diag <= CHOLESKY_TOLERANCE * self.get(j, j).abs() || diag <= 0.0 {
                        return Err("Matrix is not positive definite");
                    }
                    l[j * n + j] = diag.sqrt();
                } else {
                    for k in 0..j {
                        sum += l[i * n + k] * l[j * n + k];
                    }
                    l[i * n + j] = (self.get(i, j) - sum) / l[j * n + j];
                }
            }
        }

        Ok(Self {
            data: l,
            rows: n,
            cols: n,
        })
    }

    /// Solves `L Lᵀ x = b` given this matrix is a Cholesky factor `L`.
    fn cholesky_substitute(&self, b: &[f64]) -> Vec<f64> {
        let n = self.rows;

        // Forward substitution: L * y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..i {
                sum += self.get(i, j) * y[j];
            }
            y[i] = (b[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..n {
                sum += self.get(j, i) * x[j];
            }
            x[i] = (y[i] - sum) / self.get(i, i);
        }
        x
    }

    /// Solves the linear system Ax = b using Cholesky decomposition.
    ///
    /// The matrix must be symmetric positive definite.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square or not positive definite.
    pub fn cholesky_solve(&self, b: &Vector<f64>) -> Result<Vector<f64>, &'static str> {
        if self.rows != b.len() {
            return Err("Matrix rows must match vector length");
        }
        let l = self.cholesky()?;
        Ok(Vector::from_vec(l.cholesky_substitute(b.as_slice())))
    }

    /// Inverse of a symmetric positive definite matrix via Cholesky.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square or not positive definite.
    pub fn spd_inverse(&self) -> Result<Self, &'static str> {
        let l = self.cholesky()?;
        let n = self.rows;
        let mut inv = vec![0.0; n * n];
        let mut e = vec![0.0; n];
        for j in 0..n {
            e.iter_mut().for_each(|v| *v = 0.0);
            e[j] = 1.0;
            let col = l.cholesky_substitute(&e);
            for (i, v) in col.into_iter().enumerate() {
                inv[i * n + j] = v;
            }
        }
        Ok(Self {
            data: inv,
            rows: n,
            cols: n,
        })
    }

    /// Quadratic form `xᵀ A x` for a square matrix.
    ///
    /// # Panics
    ///
    /// Panics if `x` doesn't match the matrix order.
    #[must_use]
    pub fn quadratic_form(&self, x: &[f64]) -> f64 {
        assert_eq!(self.rows, x.len(), "Vector length must match matrix order");
        let mut total = 0.0;
        for i in 0..self.rows {
            let mut row_sum = 0.0;
            for j in 0..self.cols {
                row_sum += self.get(i, j) * x[j];
            }
            total += x[i] * row_sum;
        }
        total
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
