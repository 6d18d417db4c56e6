//! CLI argument parsing for ngeval

use crate::distance::Metric;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the evaluation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ngeval")]
#[command(version)]
#[command(about = "Evaluate gene expression clusterings: FOM, Rand index and silhouette widths", long_about = None)]
pub struct Cli {
    /// Expression matrix: one whitespace-separated row per gene
    #[arg(short, long, value_name = "FILE")]
    pub data: PathBuf,

    /// Gene names, one per line (required for --external)
    #[arg(short, long, value_name = "FILE")]
    pub names: Option<PathBuf>,

    /// Cluster assignment per gene, one integer per line (negative = unclustered).
    /// Without it the configured clusterer clusters the full matrix
    #[arg(short, long, value_name = "FILE")]
    pub clusters: Option<PathBuf>,

    /// External clustering to compare against: "<gene> <label>" per line (repeatable)
    #[arg(short, long = "external", value_name = "FILE")]
    pub external: Vec<PathBuf>,

    /// Evaluation configuration (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Silhouette distance metric, overrides the configuration (repeatable)
    #[arg(short, long = "metric", value_enum)]
    pub metrics: Vec<Metric>,

    /// Skip the aggregate FOM (it re-clusters the data once per condition)
    #[arg(long = "skip-fom")]
    pub skip_fom: bool,

    /// Evaluate leave-one-out FOM conditions in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_data() {
        assert!(Cli::try_parse_from(["ngeval"]).is_err());
    }

    #[test]
    fn test_cli_minimal() {
        let cli = Cli::parse_from(["ngeval", "--data", "yeastEx.txt"]);
        assert_eq!(cli.data, PathBuf::from("yeastEx.txt"));
        assert!(cli.clusters.is_none());
        assert!(cli.external.is_empty());
        assert!(cli.metrics.is_empty());
        assert!(!cli.skip_fom);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_repeatable_external() {
        let cli = Cli::parse_from([
            "ngeval", "-d", "x.txt", "-n", "names.txt", "-e", "a.txt", "-e", "b.txt",
        ]);
        assert_eq!(cli.external.len(), 2);
        assert_eq!(cli.names, Some(PathBuf::from("names.txt")));
    }

    #[test]
    fn test_cli_metrics() {
        let cli = Cli::parse_from([
            "ngeval",
            "-d",
            "x.txt",
            "--metric",
            "correlation",
            "--metric",
            "sqeuclidean",
        ]);
        assert_eq!(cli.metrics, vec![Metric::Correlation, Metric::SqEuclidean]);
    }

    #[test]
    fn test_cli_rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["ngeval", "-d", "x.txt", "--metric", "hamming"]).is_err());
    }

    #[test]
    fn test_cli_json_and_flags() {
        let cli = Cli::parse_from([
            "ngeval",
            "-d",
            "x.txt",
            "--format",
            "json",
            "--skip-fom",
            "--parallel",
            "--debug",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.skip_fom);
        assert!(cli.parallel);
        assert!(cli.debug);
    }
}
