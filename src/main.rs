//! Truck Delivery Solver - Command Line Interface
//!
//! Computes the most profitable pickup/drop-off plan for a truck on a linear route.

use clap::{Parser, Subcommand, ValueEnum};
use truck_delivery::benchmark::{Benchmark, BenchmarkConfig};
use truck_delivery::exact::{ExhaustiveSearch, PairTableDP, DEFAULT_MAX_TOWNS};
use truck_delivery::heuristics::LocalExtremaHeuristic;
use truck_delivery::route::{fixtures, Route, RouteGenerator};
use truck_delivery::solution::{RouteSolver, Solution};
use truck_delivery::visualization::Visualizer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "truck-delivery")]
#[command(version = "0.1")]
#[command(about = "Maximize the profit of a truck picking up and dropping off loads along a route")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the route comes from. Exactly one of the options is used, in the
/// order file, fixture, random.
#[derive(clap::Args, Debug)]
struct RouteArgs {
    /// Route file (.txt, .csv or .json)
    #[arg(short, long)]
    route: Option<PathBuf>,

    /// Built-in route: single-town, two-towns, discussion-example, eighteen-towns
    #[arg(long)]
    fixture: Option<String>,

    /// Number of towns of a random route
    #[arg(short = 'n', long, default_value = "10")]
    towns: usize,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Highest price of a random route
    #[arg(long, default_value = "99")]
    max_price: i64,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single route
    Solve {
        #[command(flatten)]
        route: RouteArgs,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "dp")]
        algorithm: Algorithm,

        /// Longest route the exhaustive search accepts
        #[arg(long, default_value_t = DEFAULT_MAX_TOWNS)]
        max_exhaustive: usize,

        /// Output solution to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG price profile
        #[arg(long)]
        visualize: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Time every algorithm on random routes of several sizes
    Benchmark {
        /// Route sizes
        #[arg(long, value_delimiter = ',', default_value = "5,10,15,20,100,1000")]
        sizes: Vec<usize>,

        /// Random routes per size
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Base seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Longest route cross-validated with the exhaustive search
        #[arg(long, default_value = "16")]
        exhaustive_limit: usize,

        /// Run sequentially
        #[arg(long)]
        sequential: bool,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Print statistics about a route
    Analyze {
        #[command(flatten)]
        route: RouteArgs,

        /// Save the route as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run every algorithm on one route
    Compare {
        #[command(flatten)]
        route: RouteArgs,

        /// Number of timed repetitions
        #[arg(long, default_value = "5")]
        runs: usize,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Exhaustive recursive search
    Exhaustive,
    /// Local-extrema greedy heuristic
    Greedy,
    /// Pair-table dynamic program
    Dp,
    /// All three
    All,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { route, algorithm, max_exhaustive, output, visualize, verbose } => {
            solve_route(&route, algorithm, max_exhaustive, output, visualize, verbose)
        }

        Commands::Benchmark { sizes, runs, seed, exhaustive_limit, sequential, output } => {
            run_benchmark(sizes, runs, seed, exhaustive_limit, !sequential, &output)
        }

        Commands::Analyze { route, save } => analyze_route(&route, save),

        Commands::Compare { route, runs, output } => compare_algorithms(&route, runs, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_route(args: &RouteArgs) -> Result<Route, String> {
    if let Some(path) = &args.route {
        println!("Loading route from {:?}...", path);
        return Route::from_file(path);
    }

    if let Some(name) = &args.fixture {
        return fixtures::by_name(name).ok_or_else(|| {
            format!("Unknown fixture {:?}, expected one of {:?}", name, fixtures::NAMES)
        });
    }

    let generator = RouteGenerator { max_price: args.max_price, seed: args.seed };
    Ok(generator.generate(args.towns))
}

fn solvers(algorithm: Algorithm, max_exhaustive: usize) -> Vec<Box<dyn RouteSolver>> {
    let exhaustive = || -> Box<dyn RouteSolver> {
        Box::new(ExhaustiveSearch { max_towns: max_exhaustive, trace_actions: true })
    };

    match algorithm {
        Algorithm::Exhaustive => vec![exhaustive()],
        Algorithm::Greedy => vec![Box::new(LocalExtremaHeuristic::new())],
        Algorithm::Dp => vec![Box::new(PairTableDP::new())],
        Algorithm::All => vec![
            exhaustive(),
            Box::new(LocalExtremaHeuristic::new()),
            Box::new(PairTableDP::new()),
        ],
    }
}

fn solve_route(
    args: &RouteArgs,
    algorithm: Algorithm,
    max_exhaustive: usize,
    output: Option<PathBuf>,
    visualize: Option<PathBuf>,
    verbose: bool,
) -> Result<(), String> {
    let route = load_route(args)?;

    if verbose {
        println!("{}", route.statistics());
    }

    let mut solutions: Vec<Solution> = Vec::new();
    for solver in solvers(algorithm, max_exhaustive) {
        println!("Solving with {}...", solver.name());
        solutions.push(solver.solve(&route)?);
    }

    println!("\n========== Results ==========");
    println!("Route: {} ({} towns)", route.name, route.len());
    for solution in &solutions {
        println!("{}: profit {} in {:.6}s", solution.algorithm, solution.profit, solution.computation_time);
        if verbose {
            print!("{}", solution);
        }
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solutions)
            .map_err(|e| format!("Cannot serialize solution: {}", e))?;
        std::fs::write(&out_path, json).map_err(|e| format!("Failed to write output: {}", e))?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if let Some(svg_path) = visualize {
        // Prefer a solution that carries a trace
        let traced = solutions
            .iter()
            .find(|s| s.actions.is_some())
            .or_else(|| solutions.first());
        if let Some(solution) = traced {
            let viz = Visualizer::new();
            let svg = viz.generate_svg(&route, solution);
            viz.save_svg(&svg, &svg_path)
                .map_err(|e| format!("Failed to save SVG: {}", e))?;
            println!("Visualization saved to {:?}", svg_path);
        }
    }

    Ok(())
}

fn run_benchmark(
    sizes: Vec<usize>,
    runs: usize,
    seed: u64,
    exhaustive_limit: usize,
    parallel: bool,
    output: &PathBuf,
) -> Result<(), String> {
    if exhaustive_limit > DEFAULT_MAX_TOWNS {
        log::warn!(
            "Cross-validating routes of up to {} towns will take a long time",
            exhaustive_limit
        );
    }

    std::fs::create_dir_all(output)
        .map_err(|e| format!("Failed to create output directory: {}", e))?;

    let config = BenchmarkConfig {
        sizes,
        num_runs: runs,
        seed,
        exhaustive_limit,
        parallel,
        show_progress: true,
    };

    let mut benchmark = Benchmark::new(config);
    benchmark.run()?;

    let results_path = output.join("results.csv");
    benchmark
        .export_to_csv(&results_path)
        .map_err(|e| format!("Failed to export results: {}", e))?;
    println!("Results exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark
        .export_statistics_csv(&stats_path)
        .map_err(|e| format!("Failed to export statistics: {}", e))?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report).map_err(|e| format!("Failed to save report: {}", e))?;
    println!("Report saved to {:?}", report_path);

    if benchmark.mismatches().is_empty() {
        Ok(())
    } else {
        Err("Exact solvers disagreed, see the report".to_string())
    }
}

fn analyze_route(args: &RouteArgs, save: Option<PathBuf>) -> Result<(), String> {
    let route = load_route(args)?;

    println!("========== Route Analysis ==========\n");
    println!("{}", route.statistics());

    let above_pickup = route.towns().iter().filter(|t| t.drop_off > t.pickup).count();
    if above_pickup > 0 {
        println!("Towns paying more on drop-off than they charge for pickup: {}", above_pickup);
    }

    let dp = PairTableDP::new().solve(&route)?;
    let greedy = LocalExtremaHeuristic::new().solve(&route)?;

    println!("\nQuick Solution Estimates:");
    println!("  PairTableDP (optimal): {}", dp.profit);
    println!("  LocalExtrema: {} (gap {})", greedy.profit, dp.profit - greedy.profit);

    if let Some(path) = save {
        route.save_json(&path)?;
        println!("\nRoute saved to {:?}", path);
    }

    Ok(())
}

fn compare_algorithms(args: &RouteArgs, runs: usize, output: Option<PathBuf>) -> Result<(), String> {
    let route = load_route(args)?;

    println!("Comparing algorithms on {} (n={})...\n", route.name, route.len());

    let mut results: Vec<(String, i64, Vec<f64>)> = Vec::new();

    for solver in solvers(Algorithm::All, DEFAULT_MAX_TOWNS) {
        let mut times = Vec::with_capacity(runs);
        let mut profit = None;

        for _ in 0..runs.max(1) {
            match solver.solve(&route) {
                Ok(sol) => {
                    times.push(sol.computation_time);
                    profit = Some(sol.profit);
                }
                Err(e) => {
                    println!("{}: skipped ({})", solver.name(), e);
                    break;
                }
            }
        }

        if let Some(profit) = profit {
            results.push((solver.name().to_string(), profit, times));
        }
    }

    println!("\n========== Summary ==========");
    println!("{:<15} {:>10} {:>12} {:>12}", "Algorithm", "Profit", "Best Time", "Avg Time");
    println!("{}", "-".repeat(52));

    for (name, profit, times) in &results {
        let best = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        println!("{:<15} {:>10} {:>11.6}s {:>11.6}s", name, profit, best, avg);
    }

    if let Some(out_path) = output {
        let mut writer = csv::Writer::from_path(&out_path)
            .map_err(|e| format!("Failed to create CSV: {}", e))?;
        writer
            .write_record(["algorithm", "run", "profit", "time"])
            .map_err(|e| format!("Failed to write CSV: {}", e))?;

        for (name, profit, times) in &results {
            for (i, time) in times.iter().enumerate() {
                writer
                    .write_record([name.clone(), i.to_string(), profit.to_string(), format!("{:.9}", time)])
                    .map_err(|e| format!("Failed to write CSV: {}", e))?;
            }
        }
        writer.flush().map_err(|e| format!("Failed to write CSV: {}", e))?;
        println!("\nResults exported to {:?}", out_path);
    }

    Ok(())
}
