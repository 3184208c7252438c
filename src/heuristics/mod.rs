//! Heuristics module for the truck delivery problem.
//!
//! Fast solvers that trade the optimality guarantee for a single linear scan.

pub mod local_extrema;

pub use local_extrema::*;
