//! Design matrix representations
//!
//! Covariate rows arrive as `&[Vec<f64>]`. The linear solver stores them as a
//! compressed sparse row matrix and densifies once before iterating. Neither
//! representation is mutated after construction.

use crate::error::{check_rectangular, Error, Result};

/// Compressed sparse row matrix of covariates
///
/// Only non-zero entries are stored. Column indices within a row are sorted.
///
/// # Examples
///
/// ```
/// use quantreg_core::sparse::CsrMatrix;
///
/// let rows = vec![vec![1.0, 0.0, 2.0], vec![0.0, 0.0, 3.0]];
/// let csr = CsrMatrix::from_rows(&rows).unwrap();
///
/// assert_eq!(csr.nnz(), 3);
/// assert_eq!(csr.get(0, 2), 2.0);
/// assert_eq!(csr.get(1, 0), 0.0);
/// assert_eq!(csr.to_dense().row(1), &[0.0, 0.0, 3.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    /// Row start offsets into `indices`/`values`, length rows + 1
    indptr: Vec<usize>,
    /// Column index of each stored value
    indices: Vec<usize>,
    /// Stored non-zero values
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl CsrMatrix {
    /// Build from dense rows, dropping exact zeros
    ///
    /// Fails with `DimensionMismatch` if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = check_rectangular(rows)?;
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();

        indptr.push(0);
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                if v != 0.0 {
                    indices.push(j);
                    values.push(v);
                }
            }
            indptr.push(values.len());
        }

        Ok(Self {
            indptr,
            indices,
            values,
            rows: rows.len(),
            cols,
        })
    }

    /// Build from raw CSR parts
    ///
    /// Fails with `InvalidParameter` unless the row pointer runs from 0 to nnz
    /// without decreasing and every row's column indices are in bounds,
    /// strictly increasing and therefore unique.
    pub fn from_parts(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        Error::check_len(rows + 1, indptr.len(), "CSR row pointer")?;
        Error::check_len(indices.len(), values.len(), "CSR values")?;
        if indptr.first() != Some(&0) || indptr.last() != Some(&values.len()) {
            return Err(Error::InvalidParameter(
                "CSR row pointer must start at 0 and end at nnz".to_string(),
            ));
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidParameter(
                "CSR row pointer must be non-decreasing".to_string(),
            ));
        }
        if let Some(&bad) = indices.iter().find(|&&j| j >= cols) {
            return Err(Error::InvalidParameter(format!(
                "CSR column index {bad} out of bounds for {cols} columns"
            )));
        }
        for (row, span) in indptr.windows(2).enumerate() {
            if indices[span[0]..span[1]].windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::InvalidParameter(format!(
                    "CSR column indices in row {row} must be strictly increasing"
                )));
            }
        }

        Ok(Self {
            indptr,
            indices,
            values,
            rows,
            cols,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored non-zero values
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Fraction of entries that are zero
    pub fn sparsity(&self) -> f64 {
        let total = self.rows * self.cols;
        if total == 0 {
            0.0
        } else {
            1.0 - self.nnz() as f64 / total as f64
        }
    }

    /// Value at (row, col), zero when not stored
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        match self.indices[start..end].binary_search(&col) {
            Ok(pos) => self.values[start + pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate the stored (column, value) pairs of one row
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Convert to a dense row-major matrix
    pub fn to_dense(&self) -> DenseMatrix {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for (j, v) in self.row_entries(i) {
                data[i * self.cols + j] = v;
            }
        }
        DenseMatrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Dense row-major design matrix
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    /// Build from rectangular rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = check_rectangular(rows)?;
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one row
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on zero; a zero-column matrix has no row data
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Inner product of row `i` with `beta`
    #[inline]
    pub fn row_dot(&self, i: usize, beta: &[f64]) -> f64 {
        dot(self.row(i), beta)
    }

    /// Matrix-vector product X·β
    pub fn mul_vec(&self, beta: &[f64]) -> Vec<f64> {
        (0..self.rows).map(|i| self.row_dot(i, beta)).collect()
    }
}

/// Inner product of two equal-length slices
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
