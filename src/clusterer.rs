//! Clustering adapters backed by Aprender
//!
//! The metrics treat clustering as an opaque [`ClusteringFn`]. These adapters
//! wrap aprender's KMeans and DBSCAN so the driver and tests have concrete
//! algorithms to plug in. DBSCAN noise points become unclustered items.

use crate::error::{ClusterEvaluationError, Result};
use crate::fom::ClusteringFn;
use crate::matrix::ExpressionMatrix;
use crate::partition::Partition;
use aprender::cluster::{KMeans, DBSCAN};
use aprender::traits::UnsupervisedEstimator;
use serde::{Deserialize, Serialize};

/// KMeans clustering with a fixed seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansClusterer {
    /// Requested number of clusters (clamped to the number of items)
    pub k: usize,
    pub max_iter: usize,
    pub seed: u64,
}

impl KMeansClusterer {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: 42,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl ClusteringFn for KMeansClusterer {
    fn cluster(&self, data: &ExpressionMatrix) -> Result<Partition> {
        let n = data.n_rows();
        let k = self.k.min(n);
        if k == 0 {
            return Err(ClusterEvaluationError::InsufficientItems {
                required: 1,
                actual: n,
            });
        }

        let features = data.to_aprender()?;
        let mut kmeans = KMeans::new(k)
            .with_max_iter(self.max_iter)
            .with_random_state(self.seed);

        kmeans
            .fit(&features)
            .map_err(|e| ClusterEvaluationError::Clustering(e.to_string()))?;

        let labels = kmeans.predict(&features);
        tracing::debug!("KMeans produced {} labels for k={}", labels.len(), k);

        Ok(Partition::from_assignments(&labels))
    }
}

/// Density-based clustering; noise points are left unclustered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbscanClusterer {
    pub eps: f32,
    pub min_samples: usize,
}

impl DbscanClusterer {
    pub fn new(eps: f32, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }
}

impl ClusteringFn for DbscanClusterer {
    fn cluster(&self, data: &ExpressionMatrix) -> Result<Partition> {
        let features = data.to_aprender()?;
        let mut dbscan = DBSCAN::new(self.eps, self.min_samples);

        dbscan
            .fit(&features)
            .map_err(|e| ClusterEvaluationError::Clustering(e.to_string()))?;

        let partition = Partition::from_i32(dbscan.labels());
        tracing::debug!(
            "DBSCAN clustered {} of {} items",
            partition.clustered_count(),
            partition.len()
        );

        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> ExpressionMatrix {
        ExpressionMatrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.2, 0.0],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![10.0, 10.2],
        ])
        .unwrap()
    }

    #[test]
    fn test_kmeans_separates_blobs() {
        let partition = KMeansClusterer::new(2).cluster(&two_blobs()).unwrap();
        assert_eq!(partition.len(), 6);
        assert_eq!(partition.clustered_count(), 6);

        let labels = partition.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[3], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_kmeans_clamps_k() {
        let data = ExpressionMatrix::from_rows(&[vec![0.0], vec![5.0]]).unwrap();
        let partition = KMeansClusterer::new(10).cluster(&data).unwrap();
        assert_eq!(partition.len(), 2);
        assert!(partition.num_clusters() <= 2);
    }

    #[test]
    fn test_kmeans_empty_matrix() {
        let data = ExpressionMatrix::from_vec(0, 2, vec![]).unwrap();
        assert!(KMeansClusterer::new(3).cluster(&data).is_err());
    }

    #[test]
    fn test_builder() {
        let c = KMeansClusterer::new(3).with_max_iter(10).with_seed(7);
        assert_eq!(c.max_iter, 10);
        assert_eq!(c.seed, 7);
    }

    #[test]
    fn test_dbscan_marks_noise_unclustered() {
        let mut rows = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
        ];
        rows.push(vec![50.0, 50.0]); // isolated point
        let data = ExpressionMatrix::from_rows(&rows).unwrap();

        let partition = DbscanClusterer::new(0.5, 2).cluster(&data).unwrap();
        assert_eq!(partition.len(), 5);
        assert_eq!(partition.label(4), None);
        assert!(partition.label(0).is_some());
    }
}
