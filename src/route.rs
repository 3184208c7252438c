//! Module for parsing, generating and representing truck delivery routes.
//!
//! A route is a fixed, ordered sequence of towns. Each town quotes a price for
//! picking up a load and a price for dropping one off. Routes can be built from
//! literal price pairs, generated from a seed, or loaded from JSON, CSV or a
//! plain whitespace text format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// A single stop along the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Town {
    /// Price paid to pick up a load here
    pub pickup: i64,
    /// Price received for dropping off a load here
    pub drop_off: i64,
}

impl Town {
    pub fn new(pickup: i64, drop_off: i64) -> Self {
        Town { pickup, drop_off }
    }
}

/// An immutable, ordered sequence of towns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Name of the route (file stem, fixture name or generator tag)
    pub name: String,
    towns: Vec<Town>,
}

impl Route {
    pub fn new(name: &str, towns: Vec<Town>) -> Self {
        Route { name: name.to_string(), towns }
    }

    /// Build a route from `(pickup, drop_off)` pairs
    pub fn from_pairs(name: &str, pairs: &[(i64, i64)]) -> Self {
        let towns = pairs.iter().map(|&(p, d)| Town::new(p, d)).collect();
        Route::new(name, towns)
    }

    #[inline]
    pub fn towns(&self) -> &[Town] {
        &self.towns
    }

    #[inline]
    pub fn town(&self, idx: usize) -> &Town {
        &self.towns[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.towns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.towns.is_empty()
    }

    /// Return a new route with one more town at the end
    pub fn with_town(&self, town: Town) -> Self {
        let mut towns = self.towns.clone();
        towns.push(town);
        Route { name: self.name.clone(), towns }
    }

    /// Load a route from disk. The format is picked from the extension:
    /// `.json` for a serialized route, `.csv` for a `pickup,drop_off` table,
    /// anything else for the text format (one `pickup drop_off` pair per line).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let route = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let file = File::open(path).map_err(|e| format!("Cannot open file: {}", e))?;
                serde_json::from_reader(BufReader::new(file))
                    .map_err(|e| format!("Invalid route JSON: {}", e))?
            }
            Some("csv") => Self::from_csv(path, &stem)?,
            _ => Self::from_text(path, &stem)?,
        };

        route.validate()?;
        log::debug!("Loaded route {} with {} towns", route.name, route.len());
        Ok(route)
    }

    fn from_csv(path: &Path, name: &str) -> Result<Self, String> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| format!("Cannot open file: {}", e))?;

        let mut towns = Vec::new();
        for (line, record) in reader.deserialize::<Town>().enumerate() {
            let town = record.map_err(|e| format!("Invalid town on row {}: {}", line + 1, e))?;
            towns.push(town);
        }

        Ok(Route::new(name, towns))
    }

    fn from_text(path: &Path, default_name: &str) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut name = default_name.to_string();
        let mut towns = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line == "EOF" {
                continue;
            }

            if let Some(rest) = line.strip_prefix("NAME:") {
                name = rest.trim().to_string();
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return Err(format!("Line {}: expected `pickup drop_off`", line_no + 1));
            }
            let pickup: i64 = parts[0]
                .parse()
                .map_err(|_| format!("Line {}: invalid pickup price", line_no + 1))?;
            let drop_off: i64 = parts[1]
                .parse()
                .map_err(|_| format!("Line {}: invalid drop-off price", line_no + 1))?;
            towns.push(Town::new(pickup, drop_off));
        }

        Ok(Route::new(&name, towns))
    }

    /// Reject negative prices. The solvers never crash on them but their
    /// profit figures carry no meaning, so loaders refuse them here.
    pub fn validate(&self) -> Result<(), String> {
        for (i, town) in self.towns.iter().enumerate() {
            if town.pickup < 0 || town.drop_off < 0 {
                return Err(format!(
                    "Town {} has a negative price ({}, {})",
                    i, town.pickup, town.drop_off
                ));
            }
        }
        Ok(())
    }

    /// Write the route as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Cannot serialize route: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Cannot write route: {}", e))
    }

    /// Profit of buying at `pickup_idx` and selling at `drop_off_idx`
    #[inline]
    pub fn pair_profit(&self, pickup_idx: usize, drop_off_idx: usize) -> i64 {
        self.towns[drop_off_idx].drop_off - self.towns[pickup_idx].pickup
    }

    /// Get statistics about the route
    pub fn statistics(&self) -> RouteStatistics {
        let n = self.len();
        let min_pickup = self.towns.iter().map(|t| t.pickup).min().unwrap_or(0);
        let max_pickup = self.towns.iter().map(|t| t.pickup).max().unwrap_or(0);
        let min_drop_off = self.towns.iter().map(|t| t.drop_off).min().unwrap_or(0);
        let max_drop_off = self.towns.iter().map(|t| t.drop_off).max().unwrap_or(0);

        let mut profitable_pairs = 0usize;
        let mut best_pair: Option<(usize, usize, i64)> = None;
        for i in 0..n {
            for j in i + 1..n {
                let profit = self.pair_profit(i, j);
                if profit > 0 {
                    profitable_pairs += 1;
                    if best_pair.map_or(true, |(_, _, best)| profit > best) {
                        best_pair = Some((i, j, profit));
                    }
                }
            }
        }

        RouteStatistics {
            name: self.name.clone(),
            num_towns: n,
            min_pickup,
            max_pickup,
            min_drop_off,
            max_drop_off,
            profitable_pairs,
            best_pair,
        }
    }
}

/// Seeded random route generator.
///
/// Every generated town satisfies `0 <= drop_off <= pickup <= max_price`.
#[derive(Debug, Clone)]
pub struct RouteGenerator {
    pub max_price: i64,
    pub seed: u64,
}

impl Default for RouteGenerator {
    fn default() -> Self {
        RouteGenerator { max_price: 99, seed: 42 }
    }
}

impl RouteGenerator {
    pub fn new(seed: u64) -> Self {
        RouteGenerator { seed, ..Default::default() }
    }

    pub fn generate(&self, num_towns: usize) -> Route {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let upper = self.max_price.max(0);

        let towns = (0..num_towns)
            .map(|_| {
                let pickup = rng.gen_range(0..=upper);
                let drop_off = rng.gen_range(0..=pickup);
                Town::new(pickup, drop_off)
            })
            .collect();

        Route::new(&format!("random-n{}-s{}", num_towns, self.seed), towns)
    }
}

/// Literal routes used by the CLI and the test-suite
pub mod fixtures {
    use super::Route;

    pub fn single_town() -> Route {
        Route::from_pairs("single-town", &[(100, 80)])
    }

    pub fn two_towns() -> Route {
        Route::from_pairs("two-towns", &[(100, 80), (120, 110)])
    }

    /// Best chain: buy at 0, sell at 2 (+20), buy at 3, sell at 4 (+40)
    pub fn discussion_example() -> Route {
        Route::from_pairs(
            "discussion-example",
            &[(100, 80), (120, 110), (140, 120), (110, 90), (180, 150)],
        )
    }

    pub fn eighteen_towns() -> Route {
        Route::from_pairs(
            "eighteen-towns",
            &[
                (140, 80), (110, 100), (120, 100), (170, 120), (110, 90), (170, 80),
                (140, 80), (160, 110), (150, 140), (140, 140), (160, 110), (160, 110),
                (110, 80), (170, 130), (110, 80), (150, 130), (120, 90), (160, 80),
            ],
        )
    }

    pub fn by_name(name: &str) -> Option<Route> {
        match name {
            "single-town" => Some(single_town()),
            "two-towns" => Some(two_towns()),
            "discussion-example" => Some(discussion_example()),
            "eighteen-towns" => Some(eighteen_towns()),
            _ => None,
        }
    }

    pub const NAMES: [&str; 4] = ["single-town", "two-towns", "discussion-example", "eighteen-towns"];
}

/// Statistics about a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStatistics {
    pub name: String,
    pub num_towns: usize,
    pub min_pickup: i64,
    pub max_pickup: i64,
    pub min_drop_off: i64,
    pub max_drop_off: i64,
    /// Number of (pickup, later drop-off) pairs with positive profit
    pub profitable_pairs: usize,
    /// Best single pair as (pickup index, drop-off index, profit)
    pub best_pair: Option<(usize, usize, i64)>,
}

impl std::fmt::Display for RouteStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route: {}", self.name)?;
        writeln!(f, "  Towns: {}", self.num_towns)?;
        writeln!(f, "  Pickup prices: {}..={}", self.min_pickup, self.max_pickup)?;
        writeln!(f, "  Drop-off prices: {}..={}", self.min_drop_off, self.max_drop_off)?;
        writeln!(f, "  Profitable pairs: {}", self.profitable_pairs)?;
        match self.best_pair {
            Some((i, j, profit)) => writeln!(f, "  Best single pair: town {} -> town {} (+{})", i, j, profit),
            None => writeln!(f, "  Best single pair: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generator_respects_price_order() {
        let route = RouteGenerator::new(7).generate(200);
        assert_eq!(route.len(), 200);
        for town in route.towns() {
            assert!(town.drop_off >= 0);
            assert!(town.drop_off <= town.pickup);
            assert!(town.pickup <= 99);
        }
    }

    #[test]
    fn test_generator_is_deterministic() {
        let a = RouteGenerator::new(3).generate(30);
        let b = RouteGenerator::new(3).generate(30);
        let c = RouteGenerator::new(4).generate(30);
        assert_eq!(a, b);
        assert_ne!(a.towns(), c.towns());
    }

    #[test]
    fn test_statistics() {
        let stats = fixtures::discussion_example().statistics();
        assert_eq!(stats.num_towns, 5);
        assert_eq!(stats.min_pickup, 100);
        assert_eq!(stats.max_drop_off, 150);
        // 100->110, 100->120, 100->150, 120->150, 140->150, 110->150
        assert_eq!(stats.profitable_pairs, 6);
        assert_eq!(stats.best_pair, Some((0, 4, 50)));
    }

    #[test]
    fn test_text_format() {
        let dir = std::env::temp_dir();
        let path = dir.join("truck_delivery_route_test.txt");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "NAME: sample").unwrap();
            writeln!(file, "# pickup drop_off").unwrap();
            writeln!(file, "100 80").unwrap();
            writeln!(file).unwrap();
            writeln!(file, "120 110").unwrap();
        }
        let route = Route::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(route.name, "sample");
        assert_eq!(route, Route::from_pairs("sample", &[(100, 80), (120, 110)]));
    }

    #[test]
    fn test_csv_format() {
        let path = std::env::temp_dir().join("truck_delivery_route_test.csv");
        std::fs::write(&path, "pickup,drop_off\n100,80\n120,110\n").unwrap();
        let route = Route::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(route.towns(), fixtures::two_towns().towns());
    }

    #[test]
    fn test_json_round_trip() {
        let path = std::env::temp_dir().join("truck_delivery_route_test.json");
        let route = fixtures::eighteen_towns();
        route.save_json(&path).unwrap();
        let loaded = Route::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, route);
    }

    #[test]
    fn test_negative_prices_rejected() {
        let path = std::env::temp_dir().join("truck_delivery_negative_test.txt");
        std::fs::write(&path, "100 80\n-5 10\n").unwrap();
        let result = Route::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_line() {
        let path = std::env::temp_dir().join("truck_delivery_malformed_test.txt");
        std::fs::write(&path, "100\n").unwrap();
        let result = Route::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.unwrap_err().contains("Line 1"));
    }
}
