//! Solution representation for the truck delivery problem.
//!
//! This module provides the result type shared by every solver, the optional
//! per-town action trace, and the `RouteSolver` trait the solvers implement.

use crate::route::Route;
use serde::{Deserialize, Serialize};

/// What the truck did at a town on the optimal path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Bought a load (selling the held one first, if any)
    PickedUp,
    /// Sold the held load
    DroppedOff,
}

/// Result of running a solver on a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Total realized profit
    pub profit: i64,
    /// Algorithm that produced this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// One slot per town, filled only by solvers that trace their decisions
    pub actions: Option<Vec<Option<Action>>>,
    /// Work counter (recursive calls, table cells, scan steps)
    pub evaluations: Option<u64>,
}

impl Solution {
    pub fn new(profit: i64, algorithm: &str) -> Self {
        Solution {
            profit,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            actions: None,
            evaluations: None,
        }
    }

    /// Pickup/drop-off index pairs implied by the action trace.
    ///
    /// A pickup while already loaded closes the open pair at that town
    /// before opening a new one. A load still held at the end is not a pair.
    pub fn realized_pairs(&self) -> Vec<(usize, usize)> {
        let Some(actions) = &self.actions else {
            return Vec::new();
        };

        let mut pairs = Vec::new();
        let mut open: Option<usize> = None;
        for (idx, action) in actions.iter().enumerate() {
            match action {
                Some(Action::PickedUp) => {
                    if let Some(start) = open {
                        pairs.push((start, idx));
                    }
                    open = Some(idx);
                }
                Some(Action::DroppedOff) => {
                    if let Some(start) = open.take() {
                        pairs.push((start, idx));
                    }
                }
                None => {}
            }
        }
        pairs
    }

    /// Recompute the profit of the action trace against the route
    pub fn trace_profit(&self, route: &Route) -> i64 {
        self.realized_pairs()
            .iter()
            .map(|&(i, j)| route.pair_profit(i, j))
            .sum()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Profit: {}", self.profit)?;
        writeln!(f, "  Time: {:.6}s", self.computation_time)?;
        if let Some(evaluations) = self.evaluations {
            writeln!(f, "  Evaluations: {}", evaluations)?;
        }
        if let Some(actions) = &self.actions {
            writeln!(f, "  Actions:")?;
            for (idx, action) in actions.iter().enumerate() {
                match action {
                    Some(Action::PickedUp) => writeln!(f, "    Picked up at town {}", idx)?,
                    Some(Action::DroppedOff) => writeln!(f, "    Dropped off at town {}", idx)?,
                    None => {}
                }
            }
        }
        Ok(())
    }
}

/// Common interface of the three profit solvers
pub trait RouteSolver {
    fn solve(&self, route: &Route) -> Result<Solution, String>;
    fn name(&self) -> &str;
}
