///! CLI commands for meridian-route: build a graph from a `.fmi` file, run
///! arc-flag/ALT preprocessing over it, route a single query, or benchmark
///! a router over random query pairs.
///!
///! Grounded on `tools/butterfly-route/src/cli.rs`'s shape: a `Cli` wrapping
///! a `Commands` subcommand enum, with `Cli::run` doing the dispatch and
///! printing progress with plain `println!` rather than a progress bar.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::formats::{fmi, landmarks, snapshot};
use crate::graph::csr::Csr;
use crate::graph::edge::{FlaggedEdge64, TwoLevelFlaggedEdge, WeightedEdge};
use crate::graph::node::{GeoPoint, PartitionedGeoPoint, TwoLevelPartitionedGeoPoint};
use crate::graph::Geo;
use crate::heuristic::Haversine;
use crate::partition::grid::{grid_partition, two_level_grid_partition};
use crate::preprocess::alt::AltTable;
use crate::preprocess::arcflags::{
    compute_arc_flags, compute_two_level_arc_flags, flagged_transpose, two_level_flagged_transpose,
};
use crate::router::{
    AStarRouter, AltRouter, ArcFlagAStarRouter, ArcFlagBidirectionalRouter, ArcFlagRouter, BidirectionalAStarRouter,
    BidirectionalRouter, DijkstraRouter, Router, TwoLevelArcFlagRouter,
};

#[derive(Parser)]
#[command(name = "meridian-route")]
#[command(about = "Shortest-path queries over static road/geo networks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a `.fmi` file into a binary CSR snapshot.
    BuildCsr {
        /// Input `.fmi` file (plain weighted graph).
        #[arg(short, long)]
        input: PathBuf,

        /// Output snapshot path.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Grid-partition a `.fmi` graph and compute single-level arc flags.
    PreprocessArcflags {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Grid rows.
        #[arg(long, default_value = "8")]
        lat_cells: u16,

        /// Grid columns.
        #[arg(long, default_value = "8")]
        lon_cells: u16,
    },

    /// Two-level grid-partition a `.fmi` graph and compute two-level arc
    /// flags.
    PreprocessTwoLevelArcflags {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "4")]
        l1_lat_cells: u16,

        #[arg(long, default_value = "4")]
        l1_lon_cells: u16,

        #[arg(long, default_value = "8")]
        l2_lat_cells: u16,

        #[arg(long, default_value = "8")]
        l2_lon_cells: u16,
    },

    /// Select `count` random landmarks and build an ALT table over a
    /// weighted `.fmi` graph.
    PreprocessAlt {
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the landmark id list (JSON).
        #[arg(long)]
        landmarks_output: PathBuf,

        /// Where to write the serialized landmark table (bincode).
        #[arg(long)]
        table_output: PathBuf,

        #[arg(short, long, default_value = "16")]
        count: usize,
    },

    /// Route a single source/target query over a snapshot, printing the
    /// path length, node count, and pq-pop count.
    Route {
        /// Primary graph snapshot; its node/edge types must match
        /// `algorithm`'s requirements (see below).
        #[arg(short, long)]
        snapshot: PathBuf,

        #[arg(long)]
        source: u32,

        #[arg(long)]
        target: u32,

        /// One of: dijkstra, astar, bidirectional, bidirectional-astar, alt,
        /// arcflag, arcflag-astar, arcflag-bidirectional, arcflag-two-level.
        #[arg(long, default_value = "dijkstra")]
        algorithm: String,

        /// Independently arc-flag-preprocessed backward snapshot, required
        /// by arcflag-bidirectional (spec.md §9's directed-graph fix: the
        /// backward search needs its own flags, not the forward graph's
        /// transpose with flags reused).
        #[arg(long)]
        backward_snapshot: Option<PathBuf>,

        /// Forward and backward ALT landmark tables, required by `alt`.
        #[arg(long)]
        table: Option<PathBuf>,

        #[arg(long)]
        backward_table: Option<PathBuf>,
    },

    /// Benchmark a plain-Dijkstra router over `runs` random query pairs
    /// drawn from a snapshot.
    Bench {
        #[arg(short, long)]
        snapshot: PathBuf,

        #[arg(short, long, default_value = "1000")]
        runs: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildCsr { input, output } => build_csr(&input, &output),
            Commands::PreprocessArcflags {
                input,
                output,
                lat_cells,
                lon_cells,
            } => preprocess_arcflags(&input, &output, lat_cells, lon_cells),
            Commands::PreprocessTwoLevelArcflags {
                input,
                output,
                l1_lat_cells,
                l1_lon_cells,
                l2_lat_cells,
                l2_lon_cells,
            } => preprocess_two_level_arcflags(
                &input,
                &output,
                l1_lat_cells,
                l1_lon_cells,
                l2_lat_cells,
                l2_lon_cells,
            ),
            Commands::PreprocessAlt {
                input,
                landmarks_output,
                table_output,
                count,
            } => preprocess_alt(&input, &landmarks_output, &table_output, count),
            Commands::Route {
                snapshot,
                source,
                target,
                algorithm,
                backward_snapshot,
                table,
                backward_table,
            } => route(
                &snapshot,
                source,
                target,
                &algorithm,
                backward_snapshot.as_deref(),
                table.as_deref(),
                backward_table.as_deref(),
            ),
            Commands::Bench { snapshot, runs, output } => bench(&snapshot, runs, output.as_deref()),
        }
    }
}

fn build_csr(input: &std::path::Path, output: &std::path::Path) -> Result<()> {
    println!("loading {}", input.display());
    let graph: Csr<GeoPoint, WeightedEdge<u32>> =
        fmi::load(input, fmi::parse_geo_point, fmi::parse_weighted_edge).with_context(|| format!("loading {}", input.display()))?;
    println!(
        "parsed {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let mut file = std::fs::File::create(output).with_context(|| format!("creating {}", output.display()))?;
    snapshot::write(&mut file, &graph)?;
    println!("wrote snapshot to {}", output.display());
    Ok(())
}

fn preprocess_arcflags(
    input: &std::path::Path,
    output: &std::path::Path,
    lat_cells: u16,
    lon_cells: u16,
) -> Result<()> {
    println!("loading {}", input.display());
    let graph: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> =
        fmi::load(input, fmi::parse_partitioned_geo_point, fmi::parse_flagged_edge_64).with_context(|| {
            format!("loading {}", input.display())
        })?;

    println!("grid-partitioning into {lat_cells}x{lon_cells} cells");
    let partitions = grid_partition(graph.nodes(), lat_cells, lon_cells);
    let nodes: Vec<PartitionedGeoPoint> = graph
        .nodes()
        .iter()
        .zip(&partitions)
        .map(|(n, &p)| PartitionedGeoPoint::new(n.lat(), n.lon(), p))
        .collect();
    let forward = Csr::from_parts(nodes, graph.all_edges().to_vec(), graph.offsets().to_vec());

    println!("computing arc flags over {} partitions", lat_cells as u32 * lon_cells as u32);
    let backward = flagged_transpose(&forward);
    let flagged = compute_arc_flags(&forward, &backward, lat_cells * lon_cells);

    let mut file = std::fs::File::create(output).with_context(|| format!("creating {}", output.display()))?;
    snapshot::write(&mut file, &flagged)?;
    println!("wrote flagged snapshot to {}", output.display());
    Ok(())
}

fn preprocess_two_level_arcflags(
    input: &std::path::Path,
    output: &std::path::Path,
    l1_lat_cells: u16,
    l1_lon_cells: u16,
    l2_lat_cells: u16,
    l2_lon_cells: u16,
) -> Result<()> {
    println!("loading {}", input.display());
    let graph: Csr<TwoLevelPartitionedGeoPoint, TwoLevelFlaggedEdge<u32>> = fmi::load(
        input,
        fmi::parse_two_level_partitioned_geo_point,
        fmi::parse_two_level_flagged_edge,
    )
    .with_context(|| format!("loading {}", input.display()))?;

    println!("two-level grid-partitioning");
    let (l1, l2) =
        two_level_grid_partition(graph.nodes(), l1_lat_cells, l1_lon_cells, l2_lat_cells, l2_lon_cells);
    let nodes: Vec<TwoLevelPartitionedGeoPoint> = graph
        .nodes()
        .iter()
        .zip(l1.iter().zip(&l2))
        .map(|(n, (&l1, &l2))| TwoLevelPartitionedGeoPoint::new(n.lat(), n.lon(), l1, l2))
        .collect();
    let forward = Csr::from_parts(nodes, graph.all_edges().to_vec(), graph.offsets().to_vec());

    println!("computing two-level arc flags");
    let backward = two_level_flagged_transpose(&forward);
    let flagged = compute_two_level_arc_flags(&forward, &backward, l1_lat_cells * l1_lon_cells);

    let mut file = std::fs::File::create(output).with_context(|| format!("creating {}", output.display()))?;
    snapshot::write(&mut file, &flagged)?;
    println!("wrote flagged snapshot to {}", output.display());
    Ok(())
}

fn preprocess_alt(
    input: &std::path::Path,
    landmarks_output: &std::path::Path,
    table_output: &std::path::Path,
    count: usize,
) -> Result<()> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    println!("loading {}", input.display());
    let forward: Csr<GeoPoint, WeightedEdge<u32>> =
        fmi::load(input, fmi::parse_geo_point, fmi::parse_weighted_edge).with_context(|| format!("loading {}", input.display()))?;
    let backward = forward.transpose();

    let mut rng = StdRng::seed_from_u64(crate::bench::DEFAULT_SEED);
    let selected: Vec<u32> = (0..count)
        .map(|_| rng.gen_range(0..forward.node_count() as u32))
        .collect();
    println!("selected {} landmarks", selected.len());

    let table: AltTable<u32> = AltTable::build(&forward, &backward, &selected);

    landmarks::save(landmarks_output, &selected)?;
    let bytes = bincode::serialize(&table).context("serializing landmark table")?;
    std::fs::write(table_output, bytes).with_context(|| format!("writing {}", table_output.display()))?;
    println!(
        "wrote {} and {}",
        landmarks_output.display(),
        table_output.display()
    );
    Ok(())
}

fn open_snapshot<N, E>(path: &std::path::Path) -> Result<Csr<N, E>>
where
    N: serde::de::DeserializeOwned + Clone,
    E: serde::de::DeserializeOwned + Copy,
{
    let mut file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(snapshot::read(&mut file)?)
}

fn route(
    snapshot_path: &std::path::Path,
    source: u32,
    target: u32,
    algorithm: &str,
    backward_snapshot: Option<&std::path::Path>,
    table_path: Option<&std::path::Path>,
    backward_table_path: Option<&std::path::Path>,
) -> Result<()> {
    let result = match algorithm {
        "dijkstra" => {
            let graph: Csr<GeoPoint, WeightedEdge<u32>> = open_snapshot(snapshot_path)?;
            let mut router = DijkstraRouter { graph: &graph };
            router.route(source, target, false)
        }
        "astar" => {
            let graph: Csr<GeoPoint, WeightedEdge<u32>> = open_snapshot(snapshot_path)?;
            let heuristic = Haversine::new(graph.nodes(), 1.0);
            let mut router = AStarRouter { graph: &graph, heuristic };
            router.route(source, target, false)
        }
        "bidirectional" => {
            let graph: Csr<GeoPoint, WeightedEdge<u32>> = open_snapshot(snapshot_path)?;
            let transpose = graph.transpose();
            let mut router = BidirectionalRouter { forward: &graph, backward: &transpose };
            router.route(source, target, false)
        }
        "bidirectional-astar" => {
            let graph: Csr<GeoPoint, WeightedEdge<u32>> = open_snapshot(snapshot_path)?;
            let transpose = graph.transpose();
            let mut router = BidirectionalAStarRouter {
                forward: &graph,
                backward: &transpose,
                forward_heuristic: Haversine::new(graph.nodes(), 1.0),
                backward_heuristic: Haversine::new(graph.nodes(), 1.0),
            };
            router.route(source, target, false)
        }
        "alt" => {
            let table_path = table_path.context("alt requires --table")?;
            let backward_table_path = backward_table_path.context("alt requires --backward-table")?;
            let graph: Csr<GeoPoint, WeightedEdge<u32>> = open_snapshot(snapshot_path)?;
            let transpose = graph.transpose();
            let forward_table: AltTable<u32> = bincode::deserialize(
                &std::fs::read(table_path).with_context(|| format!("reading {}", table_path.display()))?,
            )
            .context("decoding forward landmark table")?;
            let backward_table: AltTable<u32> = bincode::deserialize(
                &std::fs::read(backward_table_path)
                    .with_context(|| format!("reading {}", backward_table_path.display()))?,
            )
            .context("decoding backward landmark table")?;
            let mut router = AltRouter {
                forward: &graph,
                backward: &transpose,
                forward_table: &forward_table,
                backward_table: &backward_table,
            };
            router.route(source, target, false)
        }
        "arcflag" => {
            let graph: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> = open_snapshot(snapshot_path)?;
            let mut router = ArcFlagRouter { graph: &graph };
            router.route(source, target, false)
        }
        "arcflag-astar" => {
            let graph: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> = open_snapshot(snapshot_path)?;
            let heuristic = Haversine::new(graph.nodes(), 1.0);
            let mut router = ArcFlagAStarRouter { graph: &graph, heuristic };
            router.route(source, target, false)
        }
        "arcflag-bidirectional" => {
            let backward_path = backward_snapshot.context("arcflag-bidirectional requires --backward-snapshot")?;
            let forward: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> = open_snapshot(snapshot_path)?;
            let backward: Csr<PartitionedGeoPoint, FlaggedEdge64<u32>> = open_snapshot(backward_path)?;
            let mut router = ArcFlagBidirectionalRouter { forward: &forward, backward: &backward };
            router.route(source, target, false)
        }
        "arcflag-two-level" => {
            let graph: Csr<TwoLevelPartitionedGeoPoint, TwoLevelFlaggedEdge<u32>> = open_snapshot(snapshot_path)?;
            let mut router = TwoLevelArcFlagRouter { graph: &graph };
            router.route(source, target, false)
        }
        other => anyhow::bail!(
            "unknown algorithm {other:?}, expected one of: dijkstra, astar, bidirectional, \
             bidirectional-astar, alt, arcflag, arcflag-astar, arcflag-bidirectional, arcflag-two-level"
        ),
    };

    match result.length {
        Some(length) => println!(
            "length={length} path_nodes={} pq_pops={}",
            result.path.len(),
            result.pq_pops
        ),
        None => println!("no path (pq_pops={})", result.pq_pops),
    }
    Ok(())
}

fn bench(snapshot_path: &std::path::Path, runs: usize, output: Option<&std::path::Path>) -> Result<()> {
    let mut file = std::fs::File::open(snapshot_path).with_context(|| format!("opening {}", snapshot_path.display()))?;
    let graph: Csr<GeoPoint, WeightedEdge<u32>> = snapshot::read(&mut file)?;

    let mut router = DijkstraRouter { graph: &graph };
    let (summary, raw) = crate::bench::run(&mut router, graph.node_count(), runs);

    println!(
        "{}: runs={} mean={:.3}ms p50={:.3}ms p99={:.3}ms mean_pq_pops={:.1}",
        summary.name, summary.runs, summary.mean_time_ms, summary.p50_time_ms, summary.p99_time_ms, summary.mean_pq_pops
    );

    if let Some(output) = output {
        let report = serde_json::json!({ "summary": summary, "raw": raw });
        let json = serde_json::to_string_pretty(&report).context("serializing bench results")?;
        std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
        println!("wrote {}", output.display());
    }
    Ok(())
}
