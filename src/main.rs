use anyhow::Context;
use chokepoint::algorithm::{fit, MwuParams};
use chokepoint::io;
use chokepoint::report::{
    assemble_report, mixture_cuts, mixture_records, read_mixture, recompute_expected, MixtureFile,
    Parameters,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chokepoint", version, about = "Finds congestion bottlenecks in capacitated networks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a tree mixture and write mixture.json and report.json.
    Fit {
        /// Path to an undirected weighted edge list.
        #[arg(long)]
        graph: PathBuf,
        /// Number of multiplicative-weights iterations.
        #[arg(long, default_value_t = 80)]
        iters: usize,
        /// Candidate trees per iteration.
        #[arg(long, default_value_t = 8)]
        candidates: usize,
        /// Random seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output directory.
        #[arg(long, default_value = "outputs")]
        out: PathBuf,
    },
    /// Recompute report.json from a stored mixture.
    Report {
        /// Path to the graph edge list the mixture was fitted on.
        #[arg(long)]
        graph: PathBuf,
        /// Path to a previously written mixture.json.
        #[arg(long)]
        mixture: PathBuf,
        /// Output directory.
        #[arg(long, default_value = "outputs")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Fit {
            graph,
            iters,
            candidates,
            seed,
            out,
        } => run_fit(&graph, iters, candidates, seed, &out),
        Command::Report {
            graph,
            mixture,
            out,
        } => run_report(&graph, &mixture, &out),
    }
}

fn run_fit(
    graph_path: &Path,
    iters: usize,
    candidates: usize,
    seed: u64,
    out: &Path,
) -> anyhow::Result<()> {
    anyhow::ensure!(candidates > 0, "--candidates must be at least 1");
    let graph = io::load_graph(graph_path)
        .with_context(|| format!("loading graph from {}", graph_path.display()))?;

    let params = MwuParams {
        iters,
        candidates,
        seed,
        ..MwuParams::default()
    };
    let outcome = fit(&graph, &params)?;
    let records = mixture_records(&graph, &outcome.mixture, iters as u64);

    let mixture_file = MixtureFile {
        graph: graph_path.display().to_string(),
        iters,
        candidates,
        seed,
        alpha: outcome.alpha,
        trees: records.clone(),
    };
    write_json(&out.join("mixture.json"), &mixture_file)?;

    let cuts = mixture_cuts(&graph, &records)?;
    let report = assemble_report(
        &graph,
        Parameters {
            iters,
            candidates,
            seed,
            alpha: outcome.alpha,
        },
        records,
        &outcome.expected_congestion,
        &cuts,
    );
    write_json(&out.join("report.json"), &report)?;

    info!(
        "wrote {} and {}",
        out.join("mixture.json").display(),
        out.join("report.json").display()
    );
    Ok(())
}

fn run_report(graph_path: &Path, mixture_path: &Path, out: &Path) -> anyhow::Result<()> {
    let graph = io::load_graph(graph_path)
        .with_context(|| format!("loading graph from {}", graph_path.display()))?;
    let stored: MixtureFile = read_mixture(mixture_path)
        .with_context(|| format!("reading mixture from {}", mixture_path.display()))?;

    let expected = recompute_expected(&graph, &stored.trees)?;
    let cuts = mixture_cuts(&graph, &stored.trees)?;
    let report = assemble_report(
        &graph,
        Parameters {
            iters: stored.iters,
            candidates: stored.candidates,
            seed: stored.seed,
            alpha: stored.alpha,
        },
        stored.trees,
        &expected,
        &cuts,
    );
    write_json(&out.join("report.json"), &report)?;

    info!("wrote {}", out.join("report.json").display());
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, payload: &T) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(payload)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
