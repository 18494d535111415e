//! Standalone benchmark runner: loads one or more snapshots and times a
//! battery of routers over the same fixed-seed query set, printing each
//! summary and (optionally) writing its raw distribution to a result file.
//!
//! Grounded on `original_source/cmd/benchmarks/main.go`'s `BenchmarkTask` /
//! `RunBenchmarks` / `SaveBenchmark` shape: a named list of router tasks run
//! back to back over the same `n`, each summary printed as it completes and
//! the raw per-run distribution written out for later analysis.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use meridian_route::bench::{self, BenchmarkResult, Summary};
use meridian_route::formats::snapshot;
use meridian_route::graph::csr::Csr;
use meridian_route::graph::edge::{FlaggedEdge64, WeightedEdge};
use meridian_route::graph::node::{GeoPoint, PartitionedGeoPoint};
use meridian_route::heuristic::Haversine;
use meridian_route::router::{AStarRouter, ArcFlagRouter, BidirectionalRouter, DijkstraRouter, Router};

#[derive(Parser)]
#[command(name = "meridian-bench")]
#[command(about = "Runs the router battery over a snapshot and reports timing", long_about = None)]
struct Args {
    /// Plain weighted snapshot (GeoPoint nodes, WeightedEdge edges), used
    /// for the dijkstra/astar/bidirectional tasks.
    #[arg(long)]
    plain: PathBuf,

    /// Arc-flag-preprocessed snapshot (PartitionedGeoPoint nodes,
    /// FlaggedEdge64 edges), for the arcflag-dijkstra task. Skipped if
    /// omitted.
    #[arg(long)]
    arcflag: Option<PathBuf>,

    /// Queries per task.
    #[arg(short, long, default_value = "1000")]
    runs: usize,

    /// Directory to write each task's raw distribution as `<task>.json`.
    #[arg(short, long)]
    outdir: Option<PathBuf>,
}

struct Task {
    name: &'static str,
    summary: Summary,
    raw: BenchmarkResult,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut file = std::fs::File::open(&args.plain).with_context(|| format!("opening {}", args.plain.display()))?;
    let plain: Csr<GeoPoint, WeightedEdge<u32>> = snapshot::read(&mut file)?;
    let transpose = plain.transpose();
    let n = plain.node_count();

    let mut tasks = Vec::new();

    let mut dijkstra = DijkstraRouter { graph: &plain };
    tasks.push(run_task("dijkstra", &mut dijkstra, n, args.runs));

    let mut astar = AStarRouter { graph: &plain, heuristic: Haversine::new(plain.nodes(), 1.0) };
    tasks.push(run_task("astar", &mut astar, n, args.runs));

    let mut bidirectional = BidirectionalRouter { forward: &plain, backward: &transpose };
    tasks.push(run_task("bidirectional-dijkstra", &mut bidirectional, n, args.runs));

    if let Some(arcflag_path) = &args.arcflag {
        let mut file = std::fs::File::open(arcflag_path).with_context(|| format!("opening {}", arcflag_path.display()))?;
        let flagged: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> = snapshot::read(&mut file)?;
        let mut arcflag = ArcFlagRouter { graph: &flagged };
        tasks.push(run_task("arcflag-dijkstra", &mut arcflag, flagged.node_count(), args.runs));
    }

    for task in &tasks {
        println!(
            "{}: runs={} mean={:.3}ms p50={:.3}ms p99={:.3}ms mean_pq_pops={:.1}",
            task.name,
            task.summary.runs,
            task.summary.mean_time_ms,
            task.summary.p50_time_ms,
            task.summary.p99_time_ms,
            task.summary.mean_pq_pops,
        );
        if let Some(outdir) = &args.outdir {
            let path = outdir.join(format!("{}.json", task.name));
            let json = serde_json::to_string_pretty(&task.raw).context("serializing benchmark result")?;
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        }
    }

    Ok(())
}

fn run_task<W, R>(name: &'static str, router: &mut R, node_count: usize, runs: usize) -> Task
where
    W: meridian_route::graph::Weight,
    R: Router<W>,
{
    println!("running {name}");
    let (summary, raw) = bench::run(router, node_count, runs);
    Task { name, summary, raw }
}
