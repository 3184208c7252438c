use truck_delivery::exact::{ExhaustiveSearch, PairTableDP};
use truck_delivery::heuristics::LocalExtremaHeuristic;
use truck_delivery::route::{fixtures, Route, RouteGenerator, Town};
use truck_delivery::solution::RouteSolver;

fn profits(route: &Route) -> (i64, i64, i64) {
    let exhaustive = ExhaustiveSearch::new().solve(route).unwrap();
    let greedy = LocalExtremaHeuristic::new().solve(route).unwrap();
    let dp = PairTableDP::new().solve(route).unwrap();
    (exhaustive.profit, greedy.profit, dp.profit)
}

#[test]
fn dp_matches_exhaustive_on_random_routes() {
    for seed in 0..150u64 {
        let n = (seed % 14) as usize;
        let route = RouteGenerator::new(seed).generate(n);
        let (exhaustive, _, dp) = profits(&route);
        assert_eq!(dp, exhaustive, "route {} ({:?})", route.name, route.towns());
    }
}

#[test]
fn dp_matches_exhaustive_on_unconstrained_prices() {
    // Drop-off may exceed pickup here, the generator never does that
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..100 {
        let n = rng.gen_range(0..12);
        let towns = (0..n)
            .map(|_| Town::new(rng.gen_range(0..20), rng.gen_range(0..20)))
            .collect();
        let route = Route::new("unconstrained", towns);
        let (exhaustive, _, dp) = profits(&route);
        assert_eq!(dp, exhaustive, "{:?}", route.towns());
    }
}

#[test]
fn exhaustive_trace_reproduces_profit() {
    for seed in 0..60u64 {
        let route = RouteGenerator::new(seed).generate(10);
        let solution = ExhaustiveSearch::new().solve(&route).unwrap();
        assert_eq!(solution.trace_profit(&route), solution.profit);
        for (i, j) in solution.realized_pairs() {
            assert!(i < j);
        }
    }
}

#[test]
fn greedy_never_beats_optimum() {
    for seed in 0..200u64 {
        let route = RouteGenerator::new(seed).generate(3 + (seed % 40) as usize);
        let greedy = LocalExtremaHeuristic::new().solve(&route).unwrap().profit;
        let dp = PairTableDP::new().solve(&route).unwrap().profit;
        assert!(greedy <= dp, "seed {}: greedy {} > dp {}", seed, greedy, dp);
    }
}

#[test]
fn optimal_profits_are_never_negative() {
    for seed in 0..100u64 {
        let route = RouteGenerator::new(seed).generate((seed % 12) as usize);
        let (exhaustive, _, dp) = profits(&route);
        assert!(exhaustive >= 0);
        assert!(dp >= 0);
    }
}

#[test]
fn degenerate_routes_yield_zero() {
    let empty = Route::new("empty", Vec::new());
    assert_eq!(profits(&empty), (0, 0, 0));
    assert_eq!(profits(&fixtures::single_town()), (0, 0, 0));
    assert_eq!(profits(&Route::from_pairs("one", &[(0, 99)])), (0, 0, 0));
}

#[test]
fn literal_scenarios() {
    let (exhaustive, greedy, dp) = profits(&fixtures::two_towns());
    assert_eq!((exhaustive, dp), (10, 10));
    assert!(greedy <= dp);

    let (exhaustive, _, dp) = profits(&fixtures::discussion_example());
    assert_eq!((exhaustive, dp), (60, 60));
}

#[test]
fn eighteen_town_route() {
    let route = fixtures::eighteen_towns();
    let (exhaustive, greedy, dp) = profits(&route);
    assert_eq!(dp, exhaustive);
    assert!(greedy <= dp);
}

#[test]
fn appending_unprofitable_town_keeps_optimum() {
    for seed in 0..30u64 {
        let route = RouteGenerator::new(seed).generate(12);
        let max_pickup = route.towns().iter().map(|t| t.pickup).max().unwrap_or(0);
        let extended = route.with_town(Town::new(max_pickup + 1, 0));

        let before = PairTableDP::new().solve(&route).unwrap().profit;
        let after = PairTableDP::new().solve(&extended).unwrap().profit;
        assert_eq!(before, after);
        assert_eq!(ExhaustiveSearch::best_profit(&extended), after);
    }
}

#[test]
fn dp_scales_to_long_routes() {
    let route = RouteGenerator::new(9).generate(2_000);
    let dp = PairTableDP::new().solve(&route).unwrap();
    let greedy = LocalExtremaHeuristic::new().solve(&route).unwrap();
    assert!(dp.profit >= 0);
    assert!(greedy.profit <= dp.profit);
    assert_eq!(dp.evaluations, Some(2_000 * 1_999 / 2));
}
