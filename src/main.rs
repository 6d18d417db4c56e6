use anyhow::{bail, Context, Result};
use clap::Parser;
use ngeval::cli::{Cli, OutputFormat};
use ngeval::config::EvaluationConfig;
use ngeval::fom::ClusteringFn;
use ngeval::{io, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<EvaluationConfig> {
    let mut config = match &args.config {
        Some(path) => EvaluationConfig::load(path)?,
        None => EvaluationConfig::default(),
    };

    if !args.metrics.is_empty() {
        config.metrics = args.metrics.clone();
    }
    if args.parallel {
        config.parallel = true;
    }

    Ok(config)
}

fn run(args: Cli) -> Result<()> {
    let config = load_config(&args)?;
    let data = io::load_matrix(&args.data)?;
    tracing::debug!("Loaded {}x{} expression matrix", data.n_rows(), data.n_cols());

    let clusters = match &args.clusters {
        Some(path) => io::load_assignments(path)?,
        None => {
            tracing::debug!("Clustering entire dataset");
            config
                .clusterer
                .cluster(&data)
                .context("Failed to cluster the expression matrix")?
        }
    };

    if clusters.len() != data.n_rows() {
        bail!(
            "Cluster assignments cover {} genes, expression matrix has {}",
            clusters.len(),
            data.n_rows()
        );
    }
    if clusters.num_clusters() == 0 {
        bail!("There are no clusters");
    }

    let mut external = Vec::with_capacity(args.external.len());
    if !args.external.is_empty() {
        let Some(names_path) = &args.names else {
            bail!("--external requires --names");
        };
        let names = io::load_names(names_path)?;
        if names.len() != data.n_rows() {
            bail!(
                "{} gene names for {} expression rows",
                names.len(),
                data.n_rows()
            );
        }
        for path in &args.external {
            let partition = io::load_external_clusters(&names, path)?;
            external.push((path.display().to_string(), partition));
        }
    }

    let fom_clusterer: Option<&(dyn ClusteringFn + Sync)> = if args.skip_fom {
        None
    } else {
        Some(&config.clusterer)
    };

    let report = report::evaluate(&data, &clusters, &external, &config, fom_clusterer)
        .context("Evaluation failed")?;

    match args.format {
        OutputFormat::Text => print!("{}", report.format()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);
    run(args)
}
