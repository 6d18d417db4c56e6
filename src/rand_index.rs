//! Rand index between two clusterings of the same items
//!
//! Exhaustive O(n²) scan over unordered item pairs. A pair is an agreement
//! when both clusterings put the two items together, or both keep them apart.

use crate::error::{ClusterEvaluationError, Result};
use crate::partition::Partition;
use serde::{Deserialize, Serialize};

/// How pairs involving unclustered items are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclusteredPolicy {
    /// Compare raw labels: two unclustered items with the same negative label
    /// count as "same cluster"
    #[default]
    AsLabel,
    /// Skip every pair in which either item is unclustered in either clustering
    ExcludePairs,
}

/// Calculate the (unadjusted) Rand index of `x` and `y`
///
/// Unclustered items are compared by label like any other item
/// ([`UnclusteredPolicy::AsLabel`]). Restrict both clusterings with
/// [`Partition::restrict_to_common`] or use [`rand_index_with`] to change that.
///
/// # Errors
/// - `LengthMismatch` if the clusterings differ in length
/// - `InsufficientItems` for fewer than 2 items (no pairs)
pub fn rand_index(x: &Partition, y: &Partition) -> Result<f64> {
    rand_index_with(x, y, UnclusteredPolicy::AsLabel)
}

/// Calculate the Rand index with an explicit policy for unclustered items
pub fn rand_index_with(x: &Partition, y: &Partition, policy: UnclusteredPolicy) -> Result<f64> {
    if x.len() != y.len() {
        return Err(ClusterEvaluationError::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(ClusterEvaluationError::InsufficientItems {
            required: 2,
            actual: n,
        });
    }

    let (agreements, total_pairs) = count_agreements(x.labels(), y.labels(), policy);

    if total_pairs == 0 {
        return Err(ClusterEvaluationError::InsufficientItems {
            required: 2,
            actual: x
                .labels()
                .iter()
                .zip(y.labels())
                .filter(|(&a, &b)| a >= 0 && b >= 0)
                .count(),
        });
    }

    Ok(agreements as f64 / total_pairs as f64)
}

fn count_agreements(x: &[i64], y: &[i64], policy: UnclusteredPolicy) -> (u64, u64) {
    let n = x.len();
    let mut agreements = 0u64;
    let mut total_pairs = 0u64;

    for i in 0..n.saturating_sub(1) {
        let (xi, yi) = (x[i], y[i]);
        if policy == UnclusteredPolicy::ExcludePairs && (xi < 0 || yi < 0) {
            continue;
        }
        for j in (i + 1)..n {
            let (xj, yj) = (x[j], y[j]);
            if policy == UnclusteredPolicy::ExcludePairs && (xj < 0 || yj < 0) {
                continue;
            }
            if (xi == xj) == (yi == yj) {
                agreements += 1;
            }
            total_pairs += 1;
        }
    }

    (agreements, total_pairs)
}
