//! Evaluation report for one clustering
//!
//! Runs the metrics chosen by the caller and collects the results for text
//! or JSON display. Domain errors from the aggregate FOM and the Rand index
//! are recorded in the report instead of aborting the run.

use crate::config::EvaluationConfig;
use crate::distance::Metric;
use crate::error::Result;
use crate::fom::{aggregate_fom, aggregate_fom_parallel, ClusteringFn};
use crate::matrix::ExpressionMatrix;
use crate::partition::Partition;
use crate::rand_index::rand_index_with;
use crate::silhouette::{
    cluster_size_stats, silhouette_stats, silhouette_widths, ClusterSilhouette, ClusterSizeStats,
    DistanceSource, SilhouetteSummary,
};
use serde::Serialize;

/// Outcome of the aggregate FOM computation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FomOutcome {
    Value { value: f64 },
    Undefined { reason: String },
    Skipped,
}

/// Silhouette results under one distance metric
#[derive(Debug, Clone, Serialize)]
pub struct MetricSilhouette {
    pub metric: Metric,
    pub summary: SilhouetteSummary,
    pub clusters: Vec<ClusterSilhouette>,
}

/// Agreement with one external clustering
#[derive(Debug, Clone, Serialize)]
pub struct ExternalComparison {
    pub name: String,
    /// Items clustered in both clusterings
    pub common_items: usize,
    pub rand_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of evaluating one clustering
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub total_items: usize,
    pub clustered_items: usize,
    pub num_clusters: usize,
    pub aggregate_fom: FomOutcome,
    pub silhouettes: Vec<MetricSilhouette>,
    pub cluster_sizes: Option<ClusterSizeStats>,
    pub external: Vec<ExternalComparison>,
}

/// Evaluate `clusters` over `data`
///
/// The aggregate FOM re-clusters `data` with `fom_clusterer` and is skipped
/// when none is given. Each external clustering is compared after
/// restricting both clusterings to their common clustered items.
pub fn evaluate(
    data: &ExpressionMatrix,
    clusters: &Partition,
    external: &[(String, Partition)],
    config: &EvaluationConfig,
    fom_clusterer: Option<&(dyn ClusteringFn + Sync)>,
) -> Result<EvaluationReport> {
    let aggregate_fom = if let Some(cluster_fn) = fom_clusterer {
        tracing::debug!("Calculating aggregate FOM over {} conditions", data.n_cols());
        let result = if config.parallel {
            aggregate_fom_parallel(data, cluster_fn, config.adjust_fom)
        } else {
            aggregate_fom(data, cluster_fn, config.adjust_fom)
        };
        match result {
            Ok(value) => FomOutcome::Value { value },
            Err(e) if e.is_undefined() => {
                tracing::warn!("Cannot calculate aggregate FOM: {}", e);
                FomOutcome::Undefined {
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        }
    } else {
        FomOutcome::Skipped
    };

    let mut silhouettes = Vec::with_capacity(config.metrics.len());
    for &metric in &config.metrics {
        let widths = silhouette_widths(clusters, DistanceSource::Data { data, metric })?;
        let (stats, summary) = silhouette_stats(clusters, &widths)?;
        silhouettes.push(MetricSilhouette {
            metric,
            summary,
            clusters: stats,
        });
    }

    let cluster_sizes = silhouettes
        .first()
        .and_then(|s| cluster_size_stats(&s.clusters));

    let mut comparisons = Vec::with_capacity(external.len());
    for (name, other) in external {
        let (ours, theirs) = clusters.restrict_to_common(other)?;
        let common_items = ours.clustered_count();
        let (rand_index, error) = match rand_index_with(&ours, &theirs, config.unclustered_policy) {
            Ok(value) => (Some(value), None),
            Err(e) => {
                tracing::warn!("Cannot compare with {}: {}", name, e);
                (None, Some(e.to_string()))
            }
        };
        comparisons.push(ExternalComparison {
            name: name.clone(),
            common_items,
            rand_index,
            error,
        });
    }

    Ok(EvaluationReport {
        total_items: clusters.len(),
        clustered_items: clusters.clustered_count(),
        num_clusters: clusters.num_clusters(),
        aggregate_fom,
        silhouettes,
        cluster_sizes,
        external: comparisons,
    })
}

impl EvaluationReport {
    /// Format the report for display
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("\n=== Cluster Evaluation Report ===\n");

        match &self.aggregate_fom {
            FomOutcome::Value { value } => {
                output.push_str(&format!("Aggregate FOM = {:.6}\n", value));
            }
            FomOutcome::Undefined { reason } => {
                output.push_str(&format!("Cannot calculate aggregate FOM: {}\n", reason));
            }
            FomOutcome::Skipped => {}
        }

        output.push_str(&format!("{} clusters\n", self.num_clusters));
        let percent = if self.total_items > 0 {
            100.0 * self.clustered_items as f64 / self.total_items as f64
        } else {
            0.0
        };
        output.push_str(&format!(
            "{} of {} items clustered ({:.0}%)\n",
            self.clustered_items, self.total_items, percent
        ));

        output.push_str("\nSilhouette statistics:\n");
        output.push_str(&format!(
            "{:11} {:>13} {:>9} {:>9}\n",
            "metric", "weighted_mean", "min", "max"
        ));
        for s in &self.silhouettes {
            output.push_str(&format!(
                "{:11} {:13.3} {:9.3} {:9.3}\n",
                s.metric.name(),
                s.summary.weighted_mean,
                s.summary.min,
                s.summary.max
            ));
        }

        for s in &self.silhouettes {
            output.push_str(&format!("\nPer-cluster silhouette ({}):\n", s.metric));
            output.push_str("cluster count mean min max\n");
            for c in &s.clusters {
                output.push_str(&format!(
                    "{} {:3} {:6.3} {:6.3} {:6.3}\n",
                    c.cluster, c.count, c.mean, c.min, c.max
                ));
            }
        }

        if let Some(sizes) = &self.cluster_sizes {
            output.push_str("\nCluster size:\n");
            output.push_str(&format!("{:>8} {:>8} {:>8}\n", "mean", "min", "max"));
            output.push_str(&format!(
                "{:8.2} {:8} {:8}\n",
                sizes.mean, sizes.min, sizes.max
            ));
        }

        if !self.external.is_empty() {
            output.push('\n');
        }
        for cmp in &self.external {
            match (cmp.rand_index, &cmp.error) {
                (Some(value), _) => {
                    output.push_str(&format!("Rand index = {} ({})\n", value, cmp.name));
                }
                (None, Some(error)) => {
                    output.push_str(&format!("Rand index unavailable ({}): {}\n", cmp.name, error));
                }
                (None, None) => {}
            }
        }

        output
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
