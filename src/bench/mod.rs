//! Benchmark harness: draws fixed-seed random `(source, target)` pairs,
//! times each query, and reports wall-clock and pq-pop distributions.
//!
//! Grounded on `original_source/benchmarks/benchmark.go` and
//! `benchmarker.go`: a `BenchmarkResult` accumulating raw per-run
//! observations, summarized into a `{runs, mean_time_ms, mean_pq_pops}`
//! triple, driven by a `Benchmarker` that owns a router and a node range
//! and seeds `math/rand` once per run with a fixed constant. This port uses
//! `rand`'s seedable `StdRng` in place of the global seeded RNG (Rust has
//! no mutable global RNG to seed the way Go's `rand.Seed` does), and
//! `hdrhistogram` for percentiles beyond the mean, since a mean alone
//! hides tail latency on the query paths this crate cares about.

use std::time::Instant;

use hdrhistogram::Histogram;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::graph::{NodeId, Weight};
use crate::router::Router;

/// Default seed, matching `benchmarker.go`'s `DEFAULT_SEED`, so that two
/// runs over the same graph draw the same `(source, target)` pairs.
pub const DEFAULT_SEED: u64 = 314159265359;

/// Raw per-run observations, kept so percentiles can be computed after the
/// fact without re-running the benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    #[serde(rename = "times")]
    pub time_distribution_ms: Vec<f64>,
    #[serde(rename = "pq-pops")]
    pub pq_pops_distribution: Vec<u64>,
}

impl BenchmarkResult {
    pub fn new() -> Self {
        Self {
            time_distribution_ms: Vec::new(),
            pq_pops_distribution: Vec::new(),
        }
    }

    pub fn add(&mut self, time_ms: f64, pq_pops: u64) {
        self.time_distribution_ms.push(time_ms);
        self.pq_pops_distribution.push(pq_pops);
    }

    /// Rolls up the raw distributions into a mean-based summary plus
    /// p50/p99 latency read off an `hdrhistogram`.
    pub fn summarize(&self, name: &str) -> Summary {
        let runs = self.time_distribution_ms.len();
        let mean_time_ms = mean(&self.time_distribution_ms);
        let mean_pq_pops = mean_u64(&self.pq_pops_distribution);

        let mut hist = Histogram::<u64>::new(3).expect("valid hdrhistogram precision");
        for &t in &self.time_distribution_ms {
            let micros = (t * 1000.0).round() as u64;
            let _ = hist.record(micros);
        }

        Summary {
            name: name.to_string(),
            runs,
            mean_time_ms,
            mean_pq_pops,
            p50_time_ms: hist.value_at_quantile(0.50) as f64 / 1000.0,
            p99_time_ms: hist.value_at_quantile(0.99) as f64 / 1000.0,
        }
    }
}

impl Default for BenchmarkResult {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn mean_u64(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<u64>() as f64 / values.len() as f64
    }
}

/// Summary of one benchmark run, the unit reported to the CLI and written
/// to the results file.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub name: String,
    pub runs: usize,
    pub mean_time_ms: f64,
    pub mean_pq_pops: f64,
    pub p50_time_ms: f64,
    pub p99_time_ms: f64,
}

/// Runs `n` randomly-sampled point-to-point queries against `router`,
/// drawing `(source, target)` uniformly from `0..node_count` with a
/// fixed-seed RNG so repeated runs are comparable.
pub fn run<W, R>(router: &mut R, node_count: usize, n: usize) -> (Summary, BenchmarkResult)
where
    W: Weight,
    R: Router<W>,
{
    assert!(node_count > 0, "cannot benchmark an empty graph");
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
    let mut result = BenchmarkResult::new();

    for _ in 0..n {
        let source: NodeId = rng.gen_range(0..node_count as u32);
        let target: NodeId = rng.gen_range(0..node_count as u32);

        let start = Instant::now();
        let routed = router.route(source, target, false);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        result.add(elapsed_ms, routed.pq_pops);
    }

    let summary = result.summarize(router.name());
    (summary, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::csr::Csr;
    use crate::graph::edge::WeightedEdge;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::Plain;
    use crate::router::DijkstraRouter;

    fn diamond() -> Csr<Plain, WeightedEdge<u32>> {
        let mut g: AdjacencyList<Plain, WeightedEdge<u32>> = AdjacencyList::new();
        for _ in 0..4 {
            g.append_node(Plain);
        }
        g.insert_edge(0, WeightedEdge::new(1, 7));
        g.insert_edge(0, WeightedEdge::new(2, 8));
        g.insert_edge(1, WeightedEdge::new(3, 8));
        g.insert_edge(2, WeightedEdge::new(3, 7));
        g.freeze()
    }

    #[test]
    fn run_collects_one_observation_per_query() {
        let g = diamond();
        let mut router = DijkstraRouter { graph: &g };
        let (summary, raw) = run(&mut router, g.node_count(), 20);
        assert_eq!(summary.runs, 20);
        assert_eq!(raw.time_distribution_ms.len(), 20);
        assert_eq!(raw.pq_pops_distribution.len(), 20);
    }

    #[test]
    fn same_seed_draws_same_pairs_across_runs() {
        let g = diamond();
        let mut router_a = DijkstraRouter { graph: &g };
        let mut router_b = DijkstraRouter { graph: &g };
        let (_, a) = run(&mut router_a, g.node_count(), 10);
        let (_, b) = run(&mut router_b, g.node_count(), 10);
        assert_eq!(a.pq_pops_distribution, b.pq_pops_distribution);
    }
}
