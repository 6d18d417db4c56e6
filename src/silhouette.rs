//! Silhouette widths (Rousseeuw, 1987)
//!
//! For a clustered item `i`, `a` is the mean distance to the other members of
//! its cluster and `b` the smallest mean distance to the members of any other
//! non-empty cluster. The width is `(b - a) / max(a, b)`.
//!
//! Width 0 is used whenever the score has no meaning:
//! - the item is unclustered
//! - the item is the only member of its cluster (no `a`)
//! - no other cluster has members (no `b`)
//! - `a == b == 0` (all involved items coincide)
//!
//! Each item needs one pass over its distance row, accumulating per-cluster
//! sums and counts in scratch buffers of size k, so the whole computation is
//! O(n²) time and O(k) extra space.

use crate::distance::{DistanceMatrix, Metric};
use crate::error::{ClusterEvaluationError, Result};
use crate::matrix::ExpressionMatrix;
use crate::partition::Partition;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Where pairwise distances come from
#[derive(Debug, Clone, Copy)]
pub enum DistanceSource<'a> {
    /// Derive distances between the rows of an expression matrix
    Data {
        data: &'a ExpressionMatrix,
        metric: Metric,
    },
    /// Use a precomputed distance matrix
    Precomputed(&'a DistanceMatrix),
}

impl<'a> DistanceSource<'a> {
    fn resolve(self) -> Cow<'a, DistanceMatrix> {
        match self {
            DistanceSource::Data { data, metric } => {
                Cow::Owned(DistanceMatrix::from_data(data, metric))
            }
            DistanceSource::Precomputed(dmatrix) => Cow::Borrowed(dmatrix),
        }
    }
}

impl<'a> From<&'a DistanceMatrix> for DistanceSource<'a> {
    fn from(dmatrix: &'a DistanceMatrix) -> Self {
        DistanceSource::Precomputed(dmatrix)
    }
}

/// Silhouette details for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilhouetteRecord {
    /// Cluster of the item (None = unclustered)
    pub cluster: Option<usize>,
    /// Number of members in the item's cluster (0 when unclustered)
    pub cluster_size: usize,
    /// Mean distance to the other members of the cluster
    pub a: f64,
    /// Smallest mean distance to another non-empty cluster
    pub b: f64,
    /// Silhouette width in [-1, 1]
    pub width: f64,
}

impl SilhouetteRecord {
    fn zero(cluster: Option<usize>, cluster_size: usize) -> Self {
        Self {
            cluster,
            cluster_size,
            a: 0.0,
            b: 0.0,
            width: 0.0,
        }
    }
}

/// Width statistics for one non-empty cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSilhouette {
    pub cluster: usize,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Width statistics over all clustered items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilhouetteSummary {
    /// Number of clustered items
    pub clustered: usize,
    /// Mean of the per-cluster means weighted by cluster size
    pub weighted_mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Cluster size statistics over the non-empty clusters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSizeStats {
    pub mean: f64,
    pub min: usize,
    pub max: usize,
}

/// Calculate the silhouette width of every item
///
/// # Errors
/// `DimensionMismatch` if the distances do not cover exactly the items of
/// `clusters`.
///
/// # Example
/// ```
/// use ngeval::distance::Metric;
/// use ngeval::matrix::ExpressionMatrix;
/// use ngeval::partition::Partition;
/// use ngeval::silhouette::{silhouette_widths, DistanceSource};
///
/// let data = ExpressionMatrix::from_rows(&[vec![0.0], vec![1.0], vec![10.0], vec![11.0]]).unwrap();
/// let clusters = Partition::new(vec![0, 0, 1, 1]);
/// let widths = silhouette_widths(
///     &clusters,
///     DistanceSource::Data { data: &data, metric: Metric::Euclidean },
/// )
/// .unwrap();
/// assert!(widths.iter().all(|&w| w > 0.8));
/// ```
pub fn silhouette_widths(clusters: &Partition, source: DistanceSource<'_>) -> Result<Vec<f64>> {
    Ok(silhouette_records(clusters, source)?
        .into_iter()
        .map(|r| r.width)
        .collect())
}

/// Calculate the full silhouette record of every item
pub fn silhouette_records(
    clusters: &Partition,
    source: DistanceSource<'_>,
) -> Result<Vec<SilhouetteRecord>> {
    let dmatrix = source.resolve();
    if dmatrix.len() != clusters.len() {
        return Err(ClusterEvaluationError::DimensionMismatch {
            expected: clusters.len(),
            actual: dmatrix.len(),
        });
    }

    compute_records(&dmatrix, clusters)
}

fn compute_records(
    dmatrix: &DistanceMatrix,
    clusters: &Partition,
) -> Result<Vec<SilhouetteRecord>> {
    let labels = clusters.labels();
    let n = labels.len();
    let k = clusters.num_clusters();
    let sizes = clusters.cluster_sizes()?;

    // Scratch buffers, reset for every item
    let mut dsum = clusters.cluster_buffer(0.0_f64)?;
    let mut dcount = clusters.cluster_buffer(0usize)?;

    let mut records = Vec::with_capacity(n);

    for i in 0..n {
        let Some(own) = clusters.label(i) else {
            records.push(SilhouetteRecord::zero(None, 0));
            continue;
        };

        dsum.fill(0.0);
        dcount.fill(0);

        let row = dmatrix.row(i);
        for (j, (&c, &d)) in labels.iter().zip(row).enumerate() {
            if j == i || c < 0 {
                continue;
            }
            dsum[c as usize] += d;
            dcount[c as usize] += 1;
        }

        // Sole member of its cluster
        if dcount[own] == 0 {
            records.push(SilhouetteRecord::zero(Some(own), sizes[own]));
            continue;
        }

        let a = dsum[own] / dcount[own] as f64;
        let mut b = f64::INFINITY;
        for c in 0..k {
            if c == own || dcount[c] == 0 {
                continue;
            }
            let d = dsum[c] / dcount[c] as f64;
            if d < b {
                b = d;
            }
        }

        let record = if b.is_infinite() {
            SilhouetteRecord {
                a,
                ..SilhouetteRecord::zero(Some(own), sizes[own])
            }
        } else {
            let max_ab = a.max(b);
            SilhouetteRecord {
                cluster: Some(own),
                cluster_size: sizes[own],
                a,
                b,
                width: if max_ab > 0.0 { (b - a) / max_ab } else { 0.0 },
            }
        };
        records.push(record);
    }

    Ok(records)
}

/// Group silhouette widths by cluster
///
/// Returns one row per non-empty cluster (ascending cluster ID) and a summary
/// over all clustered items. Unclustered items are ignored.
pub fn silhouette_stats(
    clusters: &Partition,
    widths: &[f64],
) -> Result<(Vec<ClusterSilhouette>, SilhouetteSummary)> {
    if clusters.len() != widths.len() {
        return Err(ClusterEvaluationError::LengthMismatch {
            expected: clusters.len(),
            actual: widths.len(),
        });
    }

    let k = clusters.num_clusters();
    let mut sums = clusters.cluster_buffer(0.0_f64)?;
    let mut counts = clusters.cluster_buffer(0usize)?;
    let mut mins = clusters.cluster_buffer(f64::INFINITY)?;
    let mut maxs = clusters.cluster_buffer(f64::NEG_INFINITY)?;

    for (&c, &w) in clusters.labels().iter().zip(widths) {
        if c < 0 {
            continue;
        }
        let c = c as usize;
        sums[c] += w;
        counts[c] += 1;
        mins[c] = mins[c].min(w);
        maxs[c] = maxs[c].max(w);
    }

    let stats: Vec<ClusterSilhouette> = (0..k)
        .filter(|&c| counts[c] > 0)
        .map(|c| ClusterSilhouette {
            cluster: c,
            count: counts[c],
            mean: sums[c] / counts[c] as f64,
            min: mins[c],
            max: maxs[c],
        })
        .collect();

    let clustered: usize = stats.iter().map(|s| s.count).sum();
    let summary = if clustered == 0 {
        SilhouetteSummary {
            clustered: 0,
            weighted_mean: 0.0,
            min: 0.0,
            max: 0.0,
        }
    } else {
        let weighted: f64 = stats.iter().map(|s| s.mean * s.count as f64).sum();
        SilhouetteSummary {
            clustered,
            weighted_mean: weighted / clustered as f64,
            min: stats.iter().map(|s| s.min).fold(f64::INFINITY, f64::min),
            max: stats.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max),
        }
    };

    Ok((stats, summary))
}

/// Mean, min and max cluster size over the rows of [`silhouette_stats`]
pub fn cluster_size_stats(stats: &[ClusterSilhouette]) -> Option<ClusterSizeStats> {
    if stats.is_empty() {
        return None;
    }

    let sizes: Vec<f32> = stats.iter().map(|s| s.count as f32).collect();
    let v = trueno::Vector::from_slice(&sizes);

    Some(ClusterSizeStats {
        mean: f64::from(v.mean().unwrap_or(0.0)),
        min: v.min().unwrap_or(0.0) as usize,
        max: v.max().unwrap_or(0.0) as usize,
    })
}
