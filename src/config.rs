// Configuration for an evaluation run
//
// Loaded from TOML. Every field has a default, so an empty file is a valid
// configuration.

use crate::clusterer::{DbscanClusterer, KMeansClusterer};
use crate::distance::Metric;
use crate::error::Result;
use crate::fom::ClusteringFn;
use crate::matrix::ExpressionMatrix;
use crate::partition::Partition;
use crate::rand_index::UnclusteredPolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Clustering algorithm used for leave-one-out FOM and for clustering the
/// full dataset when no assignment file is given
///
/// # Example TOML
/// ```toml
/// [clusterer]
/// algorithm = "kmeans"
/// k = 8
/// max_iter = 100
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum ClustererConfig {
    Kmeans {
        k: usize,
        #[serde(default = "default_max_iter")]
        max_iter: usize,
        #[serde(default = "default_seed")]
        seed: u64,
    },
    Dbscan {
        eps: f32,
        min_samples: usize,
    },
}

fn default_max_iter() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

impl ClusteringFn for ClustererConfig {
    fn cluster(&self, data: &ExpressionMatrix) -> Result<Partition> {
        match *self {
            ClustererConfig::Kmeans { k, max_iter, seed } => KMeansClusterer::new(k)
                .with_max_iter(max_iter)
                .with_seed(seed)
                .cluster(data),
            ClustererConfig::Dbscan { eps, min_samples } => {
                DbscanClusterer::new(eps, min_samples).cluster(data)
            }
        }
    }
}

/// Configuration for cluster evaluation
///
/// # Example
/// ```
/// use ngeval::config::EvaluationConfig;
///
/// let config = EvaluationConfig::default();
/// assert!(config.adjust_fom);
/// assert_eq!(config.metrics.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Correct the FOM for cluster count bias
    pub adjust_fom: bool,

    /// Distance metrics for silhouette widths
    pub metrics: Vec<Metric>,

    /// Treatment of unclustered items in Rand index comparisons
    pub unclustered_policy: UnclusteredPolicy,

    /// Evaluate leave-one-out FOM columns in parallel
    pub parallel: bool,

    pub clusterer: ClustererConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            adjust_fom: true,
            metrics: vec![Metric::Euclidean, Metric::Correlation, Metric::Cosine],
            unclustered_policy: UnclusteredPolicy::AsLabel,
            parallel: false,
            clusterer: ClustererConfig::Kmeans {
                k: 8,
                max_iter: default_max_iter(),
                seed: default_seed(),
            },
        }
    }
}

impl EvaluationConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse evaluation config")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.metrics.is_empty() {
            return Err("metrics must name at least one distance metric".to_string());
        }

        match self.clusterer {
            ClustererConfig::Kmeans { k, max_iter, .. } => {
                if k == 0 {
                    return Err("kmeans k must be >= 1".to_string());
                }
                if max_iter == 0 {
                    return Err("kmeans max_iter must be >= 1".to_string());
                }
            }
            ClustererConfig::Dbscan { eps, min_samples } => {
                if eps.is_nan() || eps <= 0.0 {
                    return Err(format!("dbscan eps must be positive, got {}", eps));
                }
                if min_samples == 0 {
                    return Err("dbscan min_samples must be >= 1".to_string());
                }
            }
        }

        Ok(())
    }
}
