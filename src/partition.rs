//! Cluster assignments over a fixed, ordered set of items
//!
//! A label `>= 0` is a cluster ID used directly as a dense index, a negative
//! label marks the item as unclustered. IDs below the maximum may have no
//! members at all.

use crate::error::{ClusterEvaluationError, Result};
use serde::{Deserialize, Serialize};

/// Label used for items outside every cluster
pub const UNCLUSTERED: i64 = -1;

/// Assignment of items to cluster IDs (negative = unclustered)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    labels: Vec<i64>,
}

impl Partition {
    /// Create a partition from raw labels
    pub fn new(labels: Vec<i64>) -> Self {
        Self { labels }
    }

    /// Create a partition in which every item is clustered
    pub fn from_assignments(assignments: &[usize]) -> Self {
        Self {
            labels: assignments.iter().map(|&c| c as i64).collect(),
        }
    }

    /// Create a partition from DBSCAN-style labels (-1 = noise)
    pub fn from_i32(labels: &[i32]) -> Self {
        Self {
            labels: labels.iter().map(|&c| i64::from(c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Cluster of item `i`, or `None` when the item is unclustered
    pub fn label(&self, i: usize) -> Option<usize> {
        match self.labels.get(i) {
            Some(&c) if c >= 0 => Some(c as usize),
            _ => None,
        }
    }

    /// Number of cluster IDs (max label + 1), including IDs with no members
    pub fn num_clusters(&self) -> usize {
        self.labels
            .iter()
            .copied()
            .max()
            .map_or(0, |max| if max < 0 { 0 } else { max as usize + 1 })
    }

    /// Number of items with a non-negative label
    pub fn clustered_count(&self) -> usize {
        self.labels.iter().filter(|&&c| c >= 0).count()
    }

    /// Member count for every cluster ID in `0..num_clusters()`
    pub fn cluster_sizes(&self) -> Result<Vec<usize>> {
        let mut sizes = self.cluster_buffer(0usize)?;
        for &c in &self.labels {
            if c >= 0 {
                sizes[c as usize] += 1;
            }
        }
        Ok(sizes)
    }

    /// Buffer with one `value` slot per cluster ID in `0..num_clusters()`
    ///
    /// Returns `ClusterIdOutOfRange` instead of aborting when the largest ID
    /// cannot be backed by memory.
    pub fn cluster_buffer<T: Clone>(&self, value: T) -> Result<Vec<T>> {
        let k = self.num_clusters();
        let mut buffer = Vec::new();
        if buffer.try_reserve_exact(k).is_err() {
            return Err(ClusterEvaluationError::ClusterIdOutOfRange {
                id: self.labels.iter().copied().max().unwrap_or(0),
            });
        }
        buffer.resize(k, value);
        Ok(buffer)
    }

    /// Restrict two partitions of the same items to the items clustered in both
    ///
    /// An item unclustered in either partition becomes unclustered in both.
    pub fn restrict_to_common(&self, other: &Partition) -> Result<(Partition, Partition)> {
        if self.len() != other.len() {
            return Err(ClusterEvaluationError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }

        let (left, right) = self
            .labels
            .iter()
            .zip(&other.labels)
            .map(|(&a, &b)| {
                if a < 0 || b < 0 {
                    (UNCLUSTERED, UNCLUSTERED)
                } else {
                    (a, b)
                }
            })
            .unzip();

        Ok((Partition::new(left), Partition::new(right)))
    }
}

impl From<Vec<i64>> for Partition {
    fn from(labels: Vec<i64>) -> Self {
        Self::new(labels)
    }
}
