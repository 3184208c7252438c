//! Greedy local-extrema heuristic.
//!
//! Scans the route once, buying where the pickup price is a strict local
//! minimum and selling where the drop-off price is a strict local maximum.
//! Runs in O(n) time and O(1) space but does not guarantee the optimum.

use crate::route::{Route, Town};
use crate::solution::{RouteSolver, Solution};

pub struct LocalExtremaHeuristic;

impl LocalExtremaHeuristic {
    pub fn new() -> Self {
        LocalExtremaHeuristic
    }

    /// Price compared at a town: drop-off while loaded, pickup while empty
    #[inline]
    fn value(town: &Town, loaded: bool) -> i64 {
        if loaded {
            town.drop_off
        } else {
            town.pickup
        }
    }

    /// Strict local maximum. A missing previous neighbor counts as +inf and a
    /// missing next neighbor as -inf, so the last town can always sell.
    fn is_peak(current: i64, prev: Option<i64>, next: Option<i64>) -> bool {
        prev.map_or(false, |p| current > p) && next.map_or(true, |n| current > n)
    }

    /// Strict local minimum. Missing neighbors count as +inf, so the first
    /// town can always buy.
    fn is_valley(current: i64, prev: Option<i64>, next: Option<i64>) -> bool {
        prev.map_or(true, |p| current < p) && next.map_or(true, |n| current < n)
    }

    /// Realized profit and the number of scan steps taken
    pub fn scan(route: &Route) -> (i64, u64) {
        let towns = route.towns();
        let n = towns.len();
        if n <= 1 {
            return (0, 0);
        }

        let mut load: Option<i64> = None;
        let mut profit = 0i64;
        let mut steps = 0u64;
        let mut i = 0usize;

        while i < n {
            steps += 1;
            let loaded = load.is_some();
            let current = Self::value(&towns[i], loaded);
            let prev = i.checked_sub(1).map(|p| Self::value(&towns[p], loaded));
            let next = towns.get(i + 1).map(|t| Self::value(t, loaded));

            match load {
                Some(bought) if Self::is_peak(current, prev, next) => {
                    profit += current - bought;
                    load = None;
                    // Look at the same town again, it may be a valley now
                    continue;
                }
                None if Self::is_valley(current, prev, next) => {
                    load = Some(current);
                }
                _ => {}
            }
            i += 1;
        }

        (profit, steps)
    }
}

impl Default for LocalExtremaHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSolver for LocalExtremaHeuristic {
    fn solve(&self, route: &Route) -> Result<Solution, String> {
        let start = std::time::Instant::now();

        let (profit, steps) = Self::scan(route);

        let mut solution = Solution::new(profit, self.name());
        solution.evaluations = Some(steps);
        solution.computation_time = start.elapsed().as_secs_f64();

        log::debug!("{}: n={} profit={} steps={}", self.name(), route.len(), profit, steps);
        Ok(solution)
    }

    fn name(&self) -> &str {
        "LocalExtrema"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::fixtures;

    #[test]
    fn test_degenerate_sizes() {
        let h = LocalExtremaHeuristic::new();
        assert_eq!(h.solve(&Route::new("empty", Vec::new())).unwrap().profit, 0);
        assert_eq!(h.solve(&fixtures::single_town()).unwrap().profit, 0);
        assert_eq!(LocalExtremaHeuristic::scan(&fixtures::single_town()).1, 0);
    }

    #[test]
    fn test_single_valley_single_peak() {
        assert_eq!(LocalExtremaHeuristic::scan(&fixtures::two_towns()).0, 10);

        let route = Route::from_pairs("v", &[(50, 40), (20, 10), (60, 50), (90, 80), (70, 60)]);
        // buy@1 (20), drop-offs 50, 80, 60: peak at 3
        assert_eq!(LocalExtremaHeuristic::scan(&route).0, 60);
    }

    #[test]
    fn test_discussion_example() {
        // buy@0 (100); drop-offs 110, 120, 90: peak at 2 (+20); 2 again empty:
        // pickup 140 is no valley; buy@3 (110); sell@4 (+40); 4 again empty
        let (profit, steps) = LocalExtremaHeuristic::scan(&fixtures::discussion_example());
        assert_eq!(profit, 60);
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_resell_and_rebuy_same_town() {
        // Town 2 is a drop-off peak and, once empty, a pickup valley
        let route = Route::from_pairs("rebuy", &[(5, 0), (20, 0), (10, 40), (30, 0), (50, 70)]);
        let (profit, steps) = LocalExtremaHeuristic::scan(&route);
        // buy@0 5, sell@2 40 (+35), buy@2 10, sell@4 70 (+60)
        assert_eq!(profit, 95);
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_can_lose_money() {
        // Drop-offs are below pickups everywhere, yet the last town always sells
        let route = Route::from_pairs("loss", &[(100, 80), (120, 90)]);
        assert_eq!(LocalExtremaHeuristic::scan(&route).0, -10);
    }

    #[test]
    fn test_zero_priced_pickup() {
        let route = Route::from_pairs("free", &[(0, 0), (50, 30)]);
        assert_eq!(LocalExtremaHeuristic::scan(&route).0, 30);
    }
}
