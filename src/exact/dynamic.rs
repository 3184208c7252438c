//! Exact dynamic programming over (pickup, drop-off) pairs.
//!
//! `profit[i][j]` holds the best total of a chain of non-overlapping trips whose
//! last trip buys at town `i` and sells at town `j`. A trip bought at `i` can
//! follow any trip sold at or before `i`, so each row starts from the best cell
//! with pickup `< i` and drop-off `<= i`.

use crate::route::Route;
use crate::solution::{RouteSolver, Solution};

pub struct PairTableDP;

/// Filled profit table. Row `i` holds drop-off columns `i + 1..n`.
#[derive(Debug, Clone)]
pub struct ProfitTable {
    rows: Vec<Vec<i64>>,
    /// Best value found anywhere in the table
    pub best: i64,
}

impl ProfitTable {
    /// Cell for pickup `i`, drop-off `j` (`j > i`)
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.rows[i][j - i - 1]
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of filled cells
    pub fn num_cells(&self) -> u64 {
        self.rows.iter().map(|r| r.len() as u64).sum()
    }
}

impl PairTableDP {
    pub fn new() -> Self {
        PairTableDP
    }

    #[inline]
    fn cell(best_before: i64, raw: i64) -> i64 {
        if raw > 0 {
            best_before + raw
        } else {
            best_before
        }
    }

    /// Fill the table in O(n²).
    ///
    /// `column_best[j]` is the best cell sold at `j` among the rows filled so
    /// far. Every cell with drop-off `i` lives in a row above `i`, so it is
    /// final by the time row `i` starts and can be folded into `best_before`.
    pub fn build_table(route: &Route) -> ProfitTable {
        let n = route.len();
        if n <= 1 {
            return ProfitTable { rows: Vec::new(), best: 0 };
        }

        let mut rows: Vec<Vec<i64>> = Vec::with_capacity(n - 1);
        let mut column_best = vec![0i64; n];
        let mut best_before = 0i64;
        let mut best = 0i64;

        for i in 0..n - 1 {
            best_before = best_before.max(column_best[i]);

            let mut row = Vec::with_capacity(n - i - 1);
            for j in i + 1..n {
                let value = Self::cell(best_before, route.pair_profit(i, j));
                column_best[j] = column_best[j].max(value);
                best = best.max(value);
                row.push(value);
            }
            rows.push(row);
        }

        ProfitTable { rows, best }
    }

    /// Same table, with the best-before value rescanned from the filled cells
    /// for every row. O(n⁴); kept to check the incremental version against.
    pub fn build_table_rescan(route: &Route) -> ProfitTable {
        let n = route.len();
        if n <= 1 {
            return ProfitTable { rows: Vec::new(), best: 0 };
        }

        let mut rows: Vec<Vec<i64>> = Vec::with_capacity(n - 1);
        let mut best = 0i64;

        for i in 0..n - 1 {
            let best_before = if i == 0 { 0 } else { Self::find_past_max(&rows, i) };

            let mut row = Vec::with_capacity(n - i - 1);
            for j in i + 1..n {
                let value = Self::cell(best_before, route.pair_profit(i, j));
                best = best.max(value);
                row.push(value);
            }
            rows.push(row);
        }

        ProfitTable { rows, best }
    }

    /// Best cell with pickup `< limit` and drop-off `<= limit`
    fn find_past_max(rows: &[Vec<i64>], limit: usize) -> i64 {
        let mut best = 0i64;
        for (i, row) in rows.iter().enumerate().take(limit) {
            for (offset, &value) in row.iter().enumerate() {
                if i + 1 + offset > limit {
                    break;
                }
                best = best.max(value);
            }
        }
        best
    }
}

impl Default for PairTableDP {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSolver for PairTableDP {
    fn solve(&self, route: &Route) -> Result<Solution, String> {
        let start = std::time::Instant::now();

        let table = Self::build_table(route);

        let mut solution = Solution::new(table.best, self.name());
        solution.evaluations = Some(table.num_cells());
        solution.computation_time = start.elapsed().as_secs_f64();

        log::debug!(
            "{}: n={} profit={} cells={}",
            self.name(),
            route.len(),
            solution.profit,
            table.num_cells()
        );
        Ok(solution)
    }

    fn name(&self) -> &str {
        "PairTableDP"
    }
}
