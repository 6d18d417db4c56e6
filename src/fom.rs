//! Figure of merit (Yeung et al., 2000)
//!
//! The 2-norm FOM scores a clustering against a condition that was hidden
//! from the clustering: the root-mean-square deviation of the hidden values
//! from their cluster means. The aggregate FOM repeats this for every
//! condition with leave-one-condition-out clustering.
//!
//! The item count used for normalization is the number of *clustered* items,
//! so clusterings that leave some items unclustered are scored over the
//! clustered ones only.

use crate::error::{ClusterEvaluationError, Result};
use crate::matrix::ExpressionMatrix;
use crate::partition::Partition;
use rayon::prelude::*;

/// Capability: map an expression matrix to a partition of its rows
///
/// Extra clustering parameters live in the implementor (struct fields or
/// closure captures).
pub trait ClusteringFn {
    fn cluster(&self, data: &ExpressionMatrix) -> Result<Partition>;
}

impl<F> ClusteringFn for F
where
    F: Fn(&ExpressionMatrix) -> Result<Partition>,
{
    fn cluster(&self, data: &ExpressionMatrix) -> Result<Partition> {
        self(data)
    }
}

/// Calculate the 2-norm figure of merit of `clusters` against `hidden_data`
///
/// With `adjust`, the result is divided by `sqrt((n - k) / n)` to correct for
/// the bias towards many clusters, where `n` is the clustered item count and
/// `k` the number of cluster IDs.
///
/// # Errors
/// - `LengthMismatch` if the inputs differ in length
/// - `Undefined` if no item is clustered, or if `adjust` is set and there is
///   exactly one item per cluster (`n == k`)
///
/// # Example
/// ```
/// use ngeval::fom::fom;
/// use ngeval::partition::Partition;
///
/// let clusters = Partition::new(vec![0, 0, 1, 1]);
/// let value = fom(&clusters, &[1.0, 3.0, 5.0, 5.0], false).unwrap();
/// assert!((value - 0.5_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn fom(clusters: &Partition, hidden_data: &[f64], adjust: bool) -> Result<f64> {
    if clusters.len() != hidden_data.len() {
        return Err(ClusterEvaluationError::LengthMismatch {
            expected: clusters.len(),
            actual: hidden_data.len(),
        });
    }

    let num_clusters = clusters.num_clusters();

    // Per-cluster sums first, then squared deviations from the means
    let mut sums = clusters.cluster_buffer(0.0_f64)?;
    let mut counts = clusters.cluster_buffer(0usize)?;
    for (&c, &value) in clusters.labels().iter().zip(hidden_data) {
        if c >= 0 {
            sums[c as usize] += value;
            counts[c as usize] += 1;
        }
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &n)| if n > 0 { s / n as f64 } else { f64::NAN })
        .collect();

    let empty = counts.iter().filter(|&&n| n == 0).count();
    if empty > 0 {
        tracing::debug!("Skipping {} cluster IDs with no members", empty);
    }

    let mut cluster_ssd = clusters.cluster_buffer(0.0_f64)?;
    for (&c, &value) in clusters.labels().iter().zip(hidden_data) {
        if c >= 0 {
            let deviation = value - means[c as usize];
            cluster_ssd[c as usize] += deviation * deviation;
        }
    }

    let mut ssd = 0.0;
    let mut num_clustered = 0usize;
    for c in 0..num_clusters {
        if counts[c] == 0 {
            continue;
        }
        ssd += cluster_ssd[c];
        num_clustered += counts[c];
    }

    if num_clustered == 0 {
        return Err(ClusterEvaluationError::Undefined(
            "FOM is undefined when no items are clustered".to_string(),
        ));
    }

    let mut result = (ssd / num_clustered as f64).sqrt();

    if adjust {
        if num_clustered == num_clusters {
            return Err(ClusterEvaluationError::Undefined(
                "adjusted FOM is undefined for 1 item per cluster".to_string(),
            ));
        }
        if num_clustered < num_clusters {
            return Err(ClusterEvaluationError::Undefined(format!(
                "adjusted FOM is undefined for {} clustered items in {} cluster IDs",
                num_clustered, num_clusters
            )));
        }
        result /= ((num_clustered - num_clusters) as f64 / num_clustered as f64).sqrt();
    }

    Ok(result)
}

/// Leave-one-condition-out evaluation of a single column
fn column_fom<C>(data: &ExpressionMatrix, e: usize, cluster_fn: &C, adjust: bool) -> Result<f64>
where
    C: ClusteringFn + ?Sized,
{
    let data_to_cluster = data.without_column(e)?;
    let hidden_data = data.column(e)?;

    let clusters = cluster_fn.cluster(&data_to_cluster)?;
    if clusters.len() != data.n_rows() {
        return Err(ClusterEvaluationError::LengthMismatch {
            expected: data.n_rows(),
            actual: clusters.len(),
        });
    }

    let value = fom(&clusters, &hidden_data, adjust)?;
    tracing::debug!("FOM with condition {} hidden = {}", e, value);
    Ok(value)
}

/// FOM for each condition of `data`, hiding one condition at a time
///
/// Stops at the first column whose clustering or FOM fails.
pub fn fom_per_column<C>(data: &ExpressionMatrix, cluster_fn: &C, adjust: bool) -> Result<Vec<f64>>
where
    C: ClusteringFn + ?Sized,
{
    (0..data.n_cols())
        .map(|e| column_fom(data, e, cluster_fn, adjust))
        .collect()
}

/// Calculate the aggregate 2-norm figure of merit
///
/// For each condition `e`, column `e` is removed, the remaining data is
/// clustered with `cluster_fn`, and the clustering is scored by [`fom`]
/// against the removed column. The result is the sum over all conditions.
/// Any failing column aborts the whole computation with its error.
pub fn aggregate_fom<C>(data: &ExpressionMatrix, cluster_fn: &C, adjust: bool) -> Result<f64>
where
    C: ClusteringFn + ?Sized,
{
    let mut result = 0.0;
    for e in 0..data.n_cols() {
        result += column_fom(data, e, cluster_fn, adjust)?;
    }
    Ok(result)
}

/// Parallel [`aggregate_fom`]
///
/// Columns are clustered concurrently, but the per-column values are summed
/// in column order, so the result is identical to the sequential version.
/// On failure the error of the lowest failing column is returned.
pub fn aggregate_fom_parallel<C>(data: &ExpressionMatrix, cluster_fn: &C, adjust: bool) -> Result<f64>
where
    C: ClusteringFn + Sync + ?Sized,
{
    let values: Vec<Result<f64>> = (0..data.n_cols())
        .into_par_iter()
        .map(|e| column_fom(data, e, cluster_fn, adjust))
        .collect();

    let mut result = 0.0;
    for value in values {
        result += value?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fom_two_clusters() {
        let clusters = Partition::new(vec![0, 0, 1, 1]);
        let value = fom(&clusters, &[1.0, 3.0, 5.0, 5.0], false).unwrap();
        assert!((value - (2.0_f64 / 4.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_fom_adjusted() {
        let clusters = Partition::new(vec![0, 0, 1, 1]);
        let value = fom(&clusters, &[1.0, 3.0, 5.0, 5.0], true).unwrap();
        // sqrt(2/4) / sqrt((4 - 2) / 4) = 1
        assert!((value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fom_singletons() {
        let clusters = Partition::new(vec![0, 1, 2]);
        assert_eq!(fom(&clusters, &[4.0, 7.0, 1.0], false).unwrap(), 0.0);

        let err = fom(&clusters, &[4.0, 7.0, 1.0], true).unwrap_err();
        assert!(err.is_undefined());
        assert!(err.to_string().contains("1 item per cluster"));
    }

    #[test]
    fn test_fom_skips_empty_and_unclustered() {
        // Cluster 1 has no members, item 4 is unclustered
        let clusters = Partition::new(vec![0, 0, 2, 2, -1]);
        let value = fom(&clusters, &[1.0, 3.0, 5.0, 5.0, 100.0], false).unwrap();
        assert!((value - (2.0_f64 / 4.0).sqrt()).abs() < 1e-12);
        assert!(value.is_finite());
    }

    #[test]
    fn test_fom_adjusted_counts_empty_ids() {
        // n = 4 clustered, k = 3 IDs (one empty): divisor sqrt(1/4)
        let clusters = Partition::new(vec![0, 0, 2, 2]);
        let value = fom(&clusters, &[1.0, 3.0, 5.0, 5.0], true).unwrap();
        assert!((value - (0.5_f64).sqrt() / 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fom_adjusted_more_ids_than_items() {
        let clusters = Partition::new(vec![0, 4]);
        let err = fom(&clusters, &[1.0, 2.0], true).unwrap_err();
        assert!(err.is_undefined());
    }

    #[test]
    fn test_fom_nothing_clustered() {
        let clusters = Partition::new(vec![-1, -1]);
        let err = fom(&clusters, &[1.0, 2.0], false).unwrap_err();
        assert!(err.is_undefined());
    }

    #[test]
    fn test_fom_huge_cluster_id() {
        let clusters = Partition::new(vec![0, i64::MAX]);
        assert_eq!(
            fom(&clusters, &[1.0, 2.0], false).unwrap_err(),
            ClusterEvaluationError::ClusterIdOutOfRange { id: i64::MAX }
        );
    }

    #[test]
    fn test_fom_length_mismatch() {
        let clusters = Partition::new(vec![0, 1]);
        assert!(matches!(
            fom(&clusters, &[1.0], false),
            Err(ClusterEvaluationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_aggregate_fom_calls_once_per_column() {
        let data = ExpressionMatrix::from_rows(&[
            vec![1.0, 10.0, 100.0],
            vec![2.0, 20.0, 200.0],
            vec![3.0, 30.0, 300.0],
            vec![4.0, 40.0, 400.0],
        ])
        .unwrap();

        let calls = AtomicUsize::new(0);
        let cluster_fn = |m: &ExpressionMatrix| -> Result<Partition> {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(m.shape(), (4, 2));
            Ok(Partition::new(vec![0, 0, 1, 1]))
        };

        let total = aggregate_fom(&data, &cluster_fn, false).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Each column has within-cluster deviations of +-0.5 * scale
        let expected = 0.5 + 5.0 + 50.0;
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_fom_propagates_domain_error() {
        let data = ExpressionMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let cluster_fn = |_: &ExpressionMatrix| -> Result<Partition> {
            Ok(Partition::new(vec![0, 1]))
        };
        let err = aggregate_fom(&data, &cluster_fn, true).unwrap_err();
        assert!(err.is_undefined());
    }

    #[test]
    fn test_aggregate_fom_rejects_wrong_partition_length() {
        let data = ExpressionMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let cluster_fn = |_: &ExpressionMatrix| -> Result<Partition> {
            Ok(Partition::new(vec![0]))
        };
        assert!(matches!(
            aggregate_fom(&data, &cluster_fn, false),
            Err(ClusterEvaluationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = ExpressionMatrix::from_rows(&[
            vec![0.3, 1.7, 2.2, 9.1],
            vec![0.1, 1.9, 2.5, 8.7],
            vec![5.3, 0.2, 7.7, 1.1],
            vec![5.1, 0.4, 7.2, 1.6],
            vec![2.9, 3.3, 4.4, 5.5],
        ])
        .unwrap();
        let cluster_fn = |_: &ExpressionMatrix| -> Result<Partition> {
            Ok(Partition::new(vec![0, 0, 1, 1, 1]))
        };

        let sequential = aggregate_fom(&data, &cluster_fn, true).unwrap();
        let parallel = aggregate_fom_parallel(&data, &cluster_fn, true).unwrap();
        assert_eq!(sequential.to_bits(), parallel.to_bits());
    }

    #[test]
    fn test_fom_per_column_sums_to_aggregate() {
        let data = ExpressionMatrix::from_rows(&[
            vec![1.0, 4.0],
            vec![2.0, 6.0],
            vec![8.0, 1.0],
            vec![9.0, 2.0],
        ])
        .unwrap();
        let cluster_fn = |_: &ExpressionMatrix| -> Result<Partition> {
            Ok(Partition::new(vec![0, 0, 1, 1]))
        };

        let per_column = fom_per_column(&data, &cluster_fn, false).unwrap();
        assert_eq!(per_column.len(), 2);
        let total = aggregate_fom(&data, &cluster_fn, false).unwrap();
        assert!((per_column.iter().sum::<f64>() - total).abs() < 1e-12);
    }
}
