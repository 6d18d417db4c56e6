//! Expression matrix: items (genes) as rows, conditions as columns

use crate::error::{ClusterEvaluationError, Result};
use aprender::primitives::Matrix;

/// Dense row-major n×m matrix of expression levels
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ExpressionMatrix {
    /// Create a matrix from row-major data
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows * cols != data.len() {
            return Err(ClusterEvaluationError::InvalidMatrix(format!(
                "{}x{} matrix needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from equally sized rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ClusterEvaluationError::InvalidMatrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy of column `e`
    pub fn column(&self, e: usize) -> Result<Vec<f64>> {
        self.check_column(e)?;
        Ok((0..self.rows).map(|i| self.get(i, e)).collect())
    }

    /// The matrix with column `e` removed, remaining columns in original order
    pub fn without_column(&self, e: usize) -> Result<ExpressionMatrix> {
        self.check_column(e)?;

        let cols = self.cols - 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            let row = self.row(i);
            data.extend_from_slice(&row[..e]);
            data.extend_from_slice(&row[e + 1..]);
        }

        Ok(ExpressionMatrix {
            rows: self.rows,
            cols,
            data,
        })
    }

    /// Convert to the single-precision matrix used by aprender estimators
    pub fn to_aprender(&self) -> Result<Matrix<f32>> {
        let data = self.data.iter().map(|&v| v as f32).collect();
        Matrix::from_vec(self.rows, self.cols, data)
            .map_err(|e| ClusterEvaluationError::InvalidMatrix(e.to_string()))
    }

    fn check_column(&self, e: usize) -> Result<()> {
        if e >= self.cols {
            return Err(ClusterEvaluationError::InvalidColumn {
                column: e,
                columns: self.cols,
            });
        }
        Ok(())
    }
}
