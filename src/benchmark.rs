//! Benchmarking and cross-validation harness.
//!
//! Times every solver on seeded random routes of several sizes, measures how
//! far each one lands from the optimum and checks the dynamic program against
//! the exhaustive search wherever the route is short enough for it.

use crate::exact::{ExhaustiveSearch, PairTableDP};
use crate::heuristics::LocalExtremaHeuristic;
use crate::route::{Route, RouteGenerator};
use crate::solution::{RouteSolver, Solution};

use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm on a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    pub algorithm: String,
    pub route: String,
    pub num_towns: usize,
    pub seed: u64,
    pub profit: i64,
    /// Optimal profit from the dynamic program
    pub optimal_profit: i64,
    /// `optimal_profit - profit`
    pub gap: i64,
    /// Computation time in seconds
    pub time: f64,
    pub evaluations: Option<u64>,
    /// Whether the dynamic program matched the exhaustive search on this route
    pub agrees_with_exhaustive: Option<bool>,
}

/// Aggregated statistics for one algorithm at one route size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_towns: usize,
    pub runs: usize,
    /// Runs that reached the optimum
    pub optimal_runs: usize,
    pub avg_profit: f64,
    pub avg_gap: f64,
    pub worst_gap: i64,
    pub avg_time: f64,
    pub std_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Route lengths to test
    pub sizes: Vec<usize>,
    /// Random routes per size
    pub num_runs: usize,
    /// Base seed, run `r` of size `n` uses `seed + n * 1000 + r`
    pub seed: u64,
    /// Largest route the exhaustive search is run on
    pub exhaustive_limit: usize,
    /// Evaluate the runs of one size in parallel
    pub parallel: bool,
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![5, 10, 15, 20, 100, 1000],
            num_runs: 10,
            seed: 42,
            exhaustive_limit: 16,
            parallel: true,
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    fn route_seed(&self, num_towns: usize, run: usize) -> u64 {
        self.config.seed
            .wrapping_add(num_towns as u64 * 1000)
            .wrapping_add(run as u64)
    }

    /// Run every solver on one route
    pub fn evaluate_route(&self, route: &Route, seed: u64) -> Result<Vec<AlgorithmResult>, String> {
        let optimal = PairTableDP::new().solve(route)?;

        let oracle = if route.len() <= self.config.exhaustive_limit {
            Some(ExhaustiveSearch::without_trace().solve(route)?)
        } else {
            None
        };

        let agrees = oracle.as_ref().map(|o| o.profit == optimal.profit);
        if agrees == Some(false) {
            log::error!(
                "Exact solvers disagree on {}: dp={} exhaustive={:?}",
                route.name,
                optimal.profit,
                oracle.as_ref().map(|o| o.profit)
            );
        }

        let greedy = LocalExtremaHeuristic::new().solve(route)?;

        let mut solutions: Vec<Solution> = vec![optimal.clone(), greedy];
        solutions.extend(oracle);

        Ok(solutions
            .into_iter()
            .map(|sol| AlgorithmResult {
                algorithm: sol.algorithm.clone(),
                route: route.name.clone(),
                num_towns: route.len(),
                seed,
                profit: sol.profit,
                optimal_profit: optimal.profit,
                gap: optimal.profit - sol.profit,
                time: sol.computation_time,
                evaluations: sol.evaluations,
                agrees_with_exhaustive: agrees,
            })
            .collect())
    }

    /// Run all configured route sizes
    pub fn run(&mut self) -> Result<(), String> {
        let total = (self.config.sizes.len() * self.config.num_runs) as u64;
        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} routes ({elapsed})") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let sizes = self.config.sizes.clone();
        for num_towns in sizes {
            log::info!("Benchmarking routes of {} towns ({} runs)", num_towns, self.config.num_runs);

            let evaluate = |run: usize| {
                let seed = self.route_seed(num_towns, run);
                let route = RouteGenerator::new(seed).generate(num_towns);
                let results = self.evaluate_route(&route, seed);
                progress.inc(1);
                results
            };

            let batches: Vec<Result<Vec<AlgorithmResult>, String>> = if self.config.parallel {
                (0..self.config.num_runs).into_par_iter().map(evaluate).collect()
            } else {
                (0..self.config.num_runs).map(evaluate).collect()
            };

            for batch in batches {
                self.results.extend(batch?);
            }
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// Results where the exact solvers disagreed
    pub fn mismatches(&self) -> Vec<&AlgorithmResult> {
        self.results
            .iter()
            .filter(|r| r.agrees_with_exhaustive == Some(false))
            .collect()
    }

    /// Compute statistics for each (algorithm, size)
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut groups: BTreeMap<(usize, String), Vec<&AlgorithmResult>> = BTreeMap::new();
        for result in &self.results {
            groups
                .entry((result.num_towns, result.algorithm.clone()))
                .or_default()
                .push(result);
        }

        groups
            .into_iter()
            .map(|((num_towns, algorithm), results)| {
                let profits: Vec<f64> = results.iter().map(|r| r.profit as f64).collect();
                let gaps: Vec<f64> = results.iter().map(|r| r.gap as f64).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();

                let std_time = if times.len() > 1 { times.iter().std_dev() } else { 0.0 };

                AlgorithmStatistics {
                    algorithm,
                    num_towns,
                    runs: results.len(),
                    optimal_runs: results.iter().filter(|r| r.gap == 0).count(),
                    avg_profit: profits.iter().mean(),
                    avg_gap: gaps.iter().mean(),
                    worst_gap: results.iter().map(|r| r.gap).fold(0, i64::max),
                    avg_time: times.iter().mean(),
                    std_time,
                }
            })
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Truck Delivery Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let stats = self.compute_statistics();

        report.push_str(&format!(
            "{:<14} {:>6} {:>10} {:>12} {:>10} {:>10} {:>12}\n",
            "Algorithm", "Towns", "Optimal", "Avg Profit", "Avg Gap", "Worst Gap", "Avg Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in &stats {
            report.push_str(&format!(
                "{:<14} {:>6} {:>10} {:>12.2} {:>10.2} {:>10} {:>11.6}s\n",
                stat.algorithm,
                stat.num_towns,
                format!("{}/{}", stat.optimal_runs, stat.runs),
                stat.avg_profit,
                stat.avg_gap,
                stat.worst_gap,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report.push_str("\nFastest algorithm per size:\n");
        let mut by_size: BTreeMap<usize, Vec<&AlgorithmStatistics>> = BTreeMap::new();
        for stat in &stats {
            by_size.entry(stat.num_towns).or_default().push(stat);
        }
        for (num_towns, group) in &by_size {
            if let Some(fastest) = group.iter().min_by_key(|s| OrderedFloat(s.avg_time)) {
                report.push_str(&format!(
                    "  n={}: {} ({:.6}s)\n",
                    num_towns, fastest.algorithm, fastest.avg_time
                ));
            }
        }

        let mismatches = self.mismatches();
        if mismatches.is_empty() {
            report.push_str("\nExact solvers agreed on every cross-validated route.\n");
        } else {
            report.push_str(&format!(
                "\nWARNING: exact solvers disagreed on {} results\n",
                mismatches.len()
            ));
        }

        report
    }

    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::fixtures;

    fn small_config() -> BenchmarkConfig {
        BenchmarkConfig {
            sizes: vec![0, 1, 6, 30],
            num_runs: 3,
            exhaustive_limit: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 10);
        assert!(config.parallel);
    }

    #[test]
    fn test_evaluate_route() {
        let bench = Benchmark::new(small_config());
        let results = bench.evaluate_route(&fixtures::discussion_example(), 0).unwrap();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert_eq!(r.optimal_profit, 60);
            assert_eq!(r.agrees_with_exhaustive, Some(true));
            assert!(r.gap >= 0);
        }
    }

    #[test]
    fn test_exhaustive_skipped_above_limit() {
        let bench = Benchmark::new(small_config());
        let route = RouteGenerator::new(1).generate(11);
        let results = bench.evaluate_route(&route, 1).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.agrees_with_exhaustive.is_none()));
    }

    #[test]
    fn test_run_and_statistics() {
        let mut bench = Benchmark::new(small_config());
        bench.run().unwrap();

        // 3 solvers on sizes <= 10, 2 above
        assert_eq!(bench.results().len(), 3 * 3 * 3 + 3 * 2);
        assert!(bench.mismatches().is_empty());

        let stats = bench.compute_statistics();
        assert_eq!(stats.len(), 3 * 3 + 2);
        for stat in &stats {
            if stat.algorithm != "LocalExtrema" {
                assert_eq!(stat.optimal_runs, stat.runs);
                assert_eq!(stat.worst_gap, 0);
            }
        }

        let report = bench.generate_report();
        assert!(report.contains("PairTableDP"));
        assert!(report.contains("agreed"));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let mut par = Benchmark::new(small_config());
        let mut seq = Benchmark::new(BenchmarkConfig { parallel: false, ..small_config() });
        par.run().unwrap();
        seq.run().unwrap();

        let profits = |b: &Benchmark| b.results().iter().map(|r| (r.seed, r.algorithm.clone(), r.profit)).collect::<Vec<_>>();
        assert_eq!(profits(&par), profits(&seq));
    }

    #[test]
    fn test_csv_export() {
        let mut bench = Benchmark::new(BenchmarkConfig { sizes: vec![4], num_runs: 2, ..small_config() });
        bench.run().unwrap();

        let path = std::env::temp_dir().join("truck_delivery_bench_test.csv");
        bench.export_to_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(text.starts_with("algorithm,route,num_towns"));
        assert_eq!(text.lines().count(), 1 + 2 * 3);
    }
}
