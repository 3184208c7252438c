//! Truck Delivery Solver Library
//!
//! Maximizes the profit of a truck driving a fixed, linear route of towns. At
//! every town the truck may pick up a load at the town's pickup price or drop
//! off the load it carries at the town's drop-off price. It carries at most one
//! load at a time.
//!
//! # Features
//!
//! - Exhaustive recursive search with an optimal action trace (exponential, reference)
//! - Greedy local-extrema heuristic (linear, approximate)
//! - Pair-table dynamic program (quadratic, optimal)
//! - Seeded route generation, route files (text, CSV, JSON)
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```
//! use truck_delivery::route::fixtures;
//! use truck_delivery::exact::{ExhaustiveSearch, PairTableDP};
//! use truck_delivery::heuristics::LocalExtremaHeuristic;
//! use truck_delivery::solution::RouteSolver;
//!
//! let route = fixtures::two_towns();
//!
//! let exact = PairTableDP::new().solve(&route).unwrap();
//! let oracle = ExhaustiveSearch::new().solve(&route).unwrap();
//! let greedy = LocalExtremaHeuristic::new().solve(&route).unwrap();
//!
//! assert_eq!(exact.profit, 10);
//! assert_eq!(oracle.profit, exact.profit);
//! assert!(greedy.profit <= exact.profit);
//! ```

pub mod route;
pub mod solution;
pub mod heuristics;
pub mod exact;
pub mod benchmark;
pub mod visualization;

pub use route::{Route, Town};
pub use solution::{Action, RouteSolver, Solution};
