//! Exact solvers module.
//!
//! Both solvers return the optimal profit. The exhaustive search is exponential
//! and serves as the reference the dynamic program is checked against.

pub mod exhaustive;
pub mod dynamic;

pub use exhaustive::*;
pub use dynamic::*;
