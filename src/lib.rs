//! ngeval - cluster quality evaluation for gene expression data
//!
//! This library scores a partition of genes into clusters:
//! - [`fom`]: figure of merit against held-out conditions, and its
//!   leave-one-condition-out aggregate
//! - [`rand_index`]: pairwise agreement between two partitions
//! - [`silhouette`]: per-gene silhouette widths and per-cluster summaries
//!
//! All metrics are pure functions over in-memory data. Clustering algorithms
//! are injected through [`fom::ClusteringFn`].

pub mod cli;
pub mod clusterer;
pub mod config;
pub mod distance;
pub mod error;
pub mod fom;
pub mod io;
pub mod matrix;
pub mod partition;
pub mod rand_index;
pub mod report;
pub mod silhouette;

pub use error::{ClusterEvaluationError, Result};
pub use partition::Partition;
