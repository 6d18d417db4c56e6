// Rand index: scenario tests
//
// Expected values are computed by an independent, explicit enumeration of all
// item pairs rather than hard-coded.

use ngeval::rand_index::{rand_index, rand_index_with, UnclusteredPolicy};
use ngeval::{ClusterEvaluationError, Partition};

/// Reference: enumerate every unordered pair and classify it
fn expected_rand(x: &[i64], y: &[i64]) -> f64 {
    let mut pairs = Vec::new();
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            pairs.push((i, j));
        }
    }
    let agreements = pairs
        .iter()
        .filter(|&&(i, j)| {
            let same_x = x[i] == x[j];
            let same_y = y[i] == y[j];
            (same_x && same_y) || (!same_x && !same_y)
        })
        .count();
    agreements as f64 / pairs.len() as f64
}

#[test]
fn test_crossed_two_by_two() {
    let x = vec![0, 0, 1, 1];
    let y = vec![0, 1, 0, 1];
    let value = rand_index(&Partition::new(x.clone()), &Partition::new(y.clone())).unwrap();
    assert_eq!(value, expected_rand(&x, &y));
    assert!((value - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_against_reference_enumeration() {
    let cases: Vec<(Vec<i64>, Vec<i64>)> = vec![
        (vec![0, 0, 0, 1, 1, 2], vec![0, 0, 1, 1, 2, 2]),
        (vec![3, 1, 3, 1, 0], vec![0, 0, 0, 1, 1]),
        (vec![0, 1, 2, 3, 4], vec![0, 0, 0, 0, 0]),
        (vec![-1, -1, 0, 0], vec![0, 1, 1, -1]),
    ];

    for (x, y) in cases {
        let value = rand_index(&Partition::new(x.clone()), &Partition::new(y.clone())).unwrap();
        assert!(
            (value - expected_rand(&x, &y)).abs() < 1e-12,
            "x={:?} y={:?}",
            x,
            y
        );
    }
}

#[test]
fn test_singletons_agree_with_themselves() {
    let x = Partition::new((0..25).collect());
    assert_eq!(rand_index(&x, &x).unwrap(), 1.0);
}

#[test]
fn test_all_together_vs_all_apart() {
    let together = Partition::new(vec![0; 6]);
    let apart = Partition::new((0..6).collect());
    assert_eq!(rand_index(&together, &apart).unwrap(), 0.0);
}

#[test]
fn test_symmetry() {
    let x = Partition::new(vec![0, 1, 1, 2, 2, 2, -1]);
    let y = Partition::new(vec![1, 1, 0, 0, 2, -1, -1]);
    assert_eq!(rand_index(&x, &y).unwrap(), rand_index(&y, &x).unwrap());
}

#[test]
fn test_unclustered_pairs_inflate_literal_agreement() {
    // Both unclustered in both clusterings: counted as "same cluster" twice
    let x = Partition::new(vec![-1, -1, 0, 1]);
    let y = Partition::new(vec![-1, -1, 2, 2]);

    let literal = rand_index(&x, &y).unwrap();
    let excluded = rand_index_with(&x, &y, UnclusteredPolicy::ExcludePairs).unwrap();

    // Literal: (0,1) agrees, (2,3) disagrees, the four cross pairs agree -> 5/6
    assert!((literal - expected_rand(x.labels(), y.labels())).abs() < 1e-12);
    // Excluded: only (2,3) remains and it disagrees
    assert_eq!(excluded, 0.0);
    assert!(literal > excluded);
}

#[test]
fn test_restricted_comparison() {
    let ours = Partition::new(vec![0, 0, 1, 1, 2]);
    let theirs = Partition::new(vec![5, 5, 6, -1, -1]);

    let (a, b) = ours.restrict_to_common(&theirs).unwrap();
    assert_eq!(a.labels(), &[0, 0, 1, -1, -1]);
    assert_eq!(b.labels(), &[5, 5, 6, -1, -1]);
    assert_eq!(rand_index(&a, &b).unwrap(), 1.0);
}

#[test]
fn test_requires_two_items() {
    let empty = Partition::new(vec![]);
    assert!(matches!(
        rand_index(&empty, &empty),
        Err(ClusterEvaluationError::InsufficientItems {
            required: 2,
            actual: 0
        })
    ));
}
