//! Visualization utilities for truck delivery solutions.
//!
//! Generates an SVG chart of the pickup and drop-off prices along a route,
//! with the towns where the truck picked up or dropped off marked.

use crate::route::Route;
use crate::solution::{Action, Solution};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Price marker radius
    pub point_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 900.0,
            height: 400.0,
            margin: 50.0,
            point_radius: 4.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the price profile of a route with the solution's actions
    pub fn generate_svg(&self, route: &Route, solution: &Solution) -> String {
        let mut svg = String::new();

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .pickup {{ stroke: #2980b9; stroke-width: 2; fill: none; }}
    .dropoff {{ stroke: #27ae60; stroke-width: 2; fill: none; }}
    .picked {{ fill: #e67e22; stroke: #d35400; stroke-width: 1; }}
    .dropped {{ fill: #8e44ad; stroke: #6c3483; stroke-width: 1; }}
    .axis {{ stroke: #2c3e50; stroke-width: 1; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Route: {} | Towns: {} | {}: profit {}</text>
"##,
            self.margin,
            route.name,
            route.len(),
            solution.algorithm,
            solution.profit
        ));

        let plot_width = self.width - 2.0 * self.margin;
        let plot_height = self.height - 2.0 * self.margin;
        let max_price = route
            .towns()
            .iter()
            .map(|t| t.pickup.max(t.drop_off))
            .max()
            .unwrap_or(1)
            .max(1) as f64;
        let step = plot_width / (route.len().max(2) - 1) as f64;

        let to_x = |idx: usize| self.margin + idx as f64 * step;
        let to_y = |price: i64| self.height - self.margin - (price as f64 / max_price) * plot_height;

        svg.push_str(&format!(
            r##"<line x1="{m}" y1="{b}" x2="{r}" y2="{b}" class="axis"/>
<line x1="{m}" y1="{m}" x2="{m}" y2="{b}" class="axis"/>
<text x="{lx}" y="{ty}" class="label" text-anchor="end">{max}</text>
<text x="{lx}" y="{b}" class="label" text-anchor="end">0</text>
"##,
            m = self.margin,
            b = self.height - self.margin,
            r = self.width - self.margin,
            lx = self.margin - 5.0,
            ty = self.margin + 4.0,
            max = max_price
        ));

        let polyline = |price: &dyn Fn(usize) -> i64| -> String {
            (0..route.len())
                .map(|i| format!("{:.2},{:.2}", to_x(i), to_y(price(i))))
                .collect::<Vec<_>>()
                .join(" ")
        };

        if !route.is_empty() {
            svg.push_str(&format!(
                r##"<polyline points="{}" class="pickup"/>
<polyline points="{}" class="dropoff"/>
"##,
                polyline(&|i| route.town(i).pickup),
                polyline(&|i| route.town(i).drop_off)
            ));
        }

        for (idx, town) in route.towns().iter().enumerate() {
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                to_x(idx),
                self.height - self.margin + 15.0,
                idx
            ));

            let action = solution
                .actions
                .as_ref()
                .and_then(|actions| actions.get(idx).copied().flatten());

            let marker = match action {
                Some(Action::PickedUp) => Some((town.pickup, "picked")),
                Some(Action::DroppedOff) => Some((town.drop_off, "dropped")),
                None => None,
            };

            if let Some((price, class)) = marker {
                svg.push_str(&format!(
                    r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                    to_x(idx),
                    to_y(price),
                    self.point_radius * 1.5,
                    class
                ));
            }
        }

        let legend_y = self.height - 20.0;
        svg.push_str(&format!(
            r##"<rect x="{}" y="{}" width="15" height="3" fill="#2980b9"/>
<text x="{}" y="{}" class="label">Pickup price</text>
<rect x="{}" y="{}" width="15" height="3" fill="#27ae60"/>
<text x="{}" y="{}" class="label">Drop-off price</text>
<circle cx="{}" cy="{}" r="5" class="picked"/>
<text x="{}" y="{}" class="label">Picked up</text>
<circle cx="{}" cy="{}" r="5" class="dropped"/>
<text x="{}" y="{}" class="label">Dropped off</text>
"##,
            self.margin, legend_y, self.margin + 20.0, legend_y + 4.0,
            self.margin + 110.0, legend_y, self.margin + 130.0, legend_y + 4.0,
            self.margin + 227.0, legend_y, self.margin + 240.0, legend_y + 4.0,
            self.margin + 317.0, legend_y, self.margin + 330.0, legend_y + 4.0
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }
}
