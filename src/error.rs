//! Error type shared by all evaluation metrics
//!
//! `Undefined` is the domain error: the metric has no mathematical value for
//! the given input. The remaining variants report violated preconditions
//! (mismatched lengths, bad matrices) instead of panicking.

use thiserror::Error;

/// Errors for cluster evaluation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterEvaluationError {
    #[error("{0}")]
    Undefined(String),

    #[error("Length mismatch: expected {expected} items, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Dimension mismatch: expected {expected}x{expected} distance matrix, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Insufficient items: need at least {required}, got {actual}")]
    InsufficientItems { required: usize, actual: usize },

    #[error("Column {column} out of range for matrix with {columns} columns")]
    InvalidColumn { column: usize, columns: usize },

    #[error("Cluster ID {id} is too large to index per-cluster storage")]
    ClusterIdOutOfRange { id: i64 },

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("Clustering failed: {0}")]
    Clustering(String),
}

impl ClusterEvaluationError {
    /// True for the domain error (metric undefined), false for precondition violations
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined(_))
    }
}

pub type Result<T> = std::result::Result<T, ClusterEvaluationError>;
