//! Pairwise distances between items
//!
//! Metric definitions follow the usual conventions for row vectors:
//! cosine and correlation distances are `1 - similarity`. A pair involving a
//! degenerate row (zero norm, or zero variance for correlation) gets
//! distance 0 when both rows are degenerate and 1 otherwise, so the matrix
//! never carries NaN.

use crate::error::{ClusterEvaluationError, Result};
use crate::matrix::ExpressionMatrix;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Distance metric over row vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    #[value(name = "sqeuclidean")]
    SqEuclidean,
    Cityblock,
    Chebyshev,
    Cosine,
    Correlation,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Cityblock => "cityblock",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::Correlation => "correlation",
        }
    }

    /// Distance between two equally long vectors
    pub fn distance(&self, u: &[f64], v: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => sq_euclidean(u, v).sqrt(),
            Metric::SqEuclidean => sq_euclidean(u, v),
            Metric::Cityblock => u.iter().zip(v).map(|(a, b)| (a - b).abs()).sum(),
            Metric::Chebyshev => u
                .iter()
                .zip(v)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
            Metric::Cosine => cosine_distance(u, v),
            Metric::Correlation => {
                let mu = mean(u);
                let mv = mean(v);
                let cu: Vec<f64> = u.iter().map(|x| x - mu).collect();
                let cv: Vec<f64> = v.iter().map(|x| x - mv).collect();
                cosine_distance(&cu, &cv)
            }
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn sq_euclidean(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a - b) * (a - b)).sum()
}

fn mean(u: &[f64]) -> f64 {
    if u.is_empty() {
        0.0
    } else {
        u.iter().sum::<f64>() / u.len() as f64
    }
}

fn cosine_distance(u: &[f64], v: &[f64]) -> f64 {
    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let nu = u.iter().map(|a| a * a).sum::<f64>().sqrt();
    let nv = v.iter().map(|b| b * b).sum::<f64>().sqrt();

    match (nu > 0.0, nv > 0.0) {
        (true, true) => (1.0 - dot / (nu * nv)).clamp(0.0, 2.0),
        (false, false) => 0.0,
        _ => 1.0,
    }
}

/// Symmetric n×n dissimilarity matrix with zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Derive pairwise distances between the rows of `data`
    pub fn from_data(data: &ExpressionMatrix, metric: Metric) -> Self {
        let n = data.n_rows();
        let mut d = vec![0.0; n * n];

        tracing::debug!("Computing {}x{} {} distance matrix", n, n, metric);

        for i in 0..n {
            for j in (i + 1)..n {
                let dist = metric.distance(data.row(i), data.row(j));
                d[i * n + j] = dist;
                d[j * n + i] = dist;
            }
        }

        Self { n, data: d }
    }

    /// Wrap a precomputed row-major n×n matrix
    ///
    /// The matrix must be square and symmetric, with a zero diagonal and
    /// finite non-negative distances everywhere else.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(ClusterEvaluationError::InvalidMatrix(format!(
                "distance matrix of size {} needs {} values, got {}",
                n,
                n * n,
                data.len()
            )));
        }

        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(ClusterEvaluationError::InvalidMatrix(format!(
                    "non-zero diagonal at item {}",
                    i
                )));
            }
            for j in (i + 1)..n {
                let (upper, lower) = (data[i * n + j], data[j * n + i]);
                if !(upper.is_finite() && lower.is_finite()) || upper < 0.0 || lower < 0.0 {
                    return Err(ClusterEvaluationError::InvalidMatrix(format!(
                        "distance between items {} and {} must be finite and non-negative",
                        i, j
                    )));
                }
                if (upper - lower).abs() > SYMMETRY_TOLERANCE {
                    return Err(ClusterEvaluationError::InvalidMatrix(format!(
                        "asymmetric distances between items {} and {}",
                        i, j
                    )));
                }
            }
        }

        Ok(Self { n, data })
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Distances from item `i` to every item
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}
