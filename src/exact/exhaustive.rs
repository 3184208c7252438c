//! Exhaustive recursive search.
//!
//! Enumerates pick up / drop off / skip at every town. The search is the
//! correctness oracle for the other solvers and grows as 3^n, so routes longer
//! than `max_towns` are refused.

use crate::route::{Route, Town};
use crate::solution::{Action, RouteSolver, Solution};

/// Routes longer than this are refused unless the limit is raised
pub const DEFAULT_MAX_TOWNS: usize = 22;

pub struct ExhaustiveSearch {
    /// Largest route the search accepts
    pub max_towns: usize,
    /// Record the action trace along the optimal path
    pub trace_actions: bool,
}

impl ExhaustiveSearch {
    pub fn new() -> Self {
        ExhaustiveSearch {
            max_towns: DEFAULT_MAX_TOWNS,
            trace_actions: true,
        }
    }

    pub fn without_trace() -> Self {
        ExhaustiveSearch {
            trace_actions: false,
            ..Self::new()
        }
    }

    /// Best total profit obtainable from `idx` onward.
    ///
    /// `load` is the price paid for the held load, `None` when empty.
    fn search(towns: &[Town], idx: usize, load: Option<i64>, profit: i64, calls: &mut u64) -> i64 {
        *calls += 1;

        if idx == towns.len() {
            return profit;
        }

        let town = &towns[idx];
        let next = idx + 1;
        let sale = load.map(|bought| town.drop_off - bought);

        let skip = Self::search(towns, next, load, profit, calls);
        let drop_off = sale.map_or(i64::MIN, |gain| Self::search(towns, next, None, profit + gain, calls));
        // Buying while loaded sells the held load here first
        let pick_up = Self::search(towns, next, Some(town.pickup), profit + sale.unwrap_or(0), calls);

        skip.max(drop_off).max(pick_up)
    }

    /// Same enumeration as `search`, recording the path to the first optimal
    /// leaf. Branches are visited skip, drop off, pick up and a leaf only
    /// replaces the incumbent when strictly better, so skip wins every tie it
    /// is part of and drop-off wins ties with pick-up.
    fn search_traced(towns: &[Town], idx: usize, load: Option<i64>, profit: i64, trace: &mut Trace) {
        trace.calls += 1;

        if idx == towns.len() {
            if trace.best.map_or(true, |best| profit > best) {
                trace.best = Some(profit);
                trace.best_path.copy_from_slice(&trace.path);
            }
            return;
        }

        let town = &towns[idx];
        let next = idx + 1;
        let sale = load.map(|bought| town.drop_off - bought);

        trace.path[idx] = None;
        Self::search_traced(towns, next, load, profit, trace);

        if let Some(gain) = sale {
            trace.path[idx] = Some(Action::DroppedOff);
            Self::search_traced(towns, next, None, profit + gain, trace);
        }

        trace.path[idx] = Some(Action::PickedUp);
        Self::search_traced(towns, next, Some(town.pickup), profit + sale.unwrap_or(0), trace);

        trace.path[idx] = None;
    }

    /// Optimal profit, the decisions along one optimal path and the number of
    /// search nodes visited.
    pub fn solve_with_actions(&self, route: &Route) -> (i64, Vec<Option<Action>>, u64) {
        let towns = route.towns();
        let mut trace = Trace {
            path: vec![None; towns.len()],
            best_path: vec![None; towns.len()],
            best: None,
            calls: 0,
        };

        Self::search_traced(towns, 0, None, 0, &mut trace);

        (trace.best.unwrap_or(0), trace.best_path, trace.calls)
    }

    /// Optimal profit without recording a trace
    pub fn best_profit(route: &Route) -> i64 {
        let mut calls = 0u64;
        Self::search(route.towns(), 0, None, 0, &mut calls)
    }
}

/// Scratch state of a traced search
struct Trace {
    path: Vec<Option<Action>>,
    best_path: Vec<Option<Action>>,
    best: Option<i64>,
    calls: u64,
}

impl Default for ExhaustiveSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSolver for ExhaustiveSearch {
    fn solve(&self, route: &Route) -> Result<Solution, String> {
        if route.len() > self.max_towns {
            log::warn!(
                "Refusing exhaustive search on {} towns (limit {})",
                route.len(),
                self.max_towns
            );
            return Err(format!(
                "Route has {} towns, exhaustive search is limited to {}",
                route.len(),
                self.max_towns
            ));
        }

        let start = std::time::Instant::now();

        let mut solution = if self.trace_actions {
            let (profit, actions, calls) = self.solve_with_actions(route);
            let mut sol = Solution::new(profit, self.name());
            sol.actions = Some(actions);
            sol.evaluations = Some(calls);
            sol
        } else {
            let mut calls = 0u64;
            let profit = Self::search(route.towns(), 0, None, 0, &mut calls);
            let mut sol = Solution::new(profit, self.name());
            sol.evaluations = Some(calls);
            sol
        };

        solution.computation_time = start.elapsed().as_secs_f64();
        log::debug!(
            "{}: n={} profit={} calls={:?}",
            self.name(),
            route.len(),
            solution.profit,
            solution.evaluations
        );
        Ok(solution)
    }

    fn name(&self) -> &str {
        "Exhaustive"
    }
}
