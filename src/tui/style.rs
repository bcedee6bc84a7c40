//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Charted series line color.
pub const SERIES_COLOR: Color = Color::Cyan;
/// SOC gauge color when high (>= 50%).
pub const SOC_HIGH: Color = Color::Green;
/// SOC gauge color when medium (>= 20%).
pub const SOC_MID: Color = Color::Yellow;
/// SOC gauge color when low (< 20%).
pub const SOC_LOW: Color = Color::Red;
pub const HEADER_FG: Color = Color::White;
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Harvesting models in the status panel.
pub const HARVEST_FG: Color = Color::Green;
/// Consuming models in the status panel.
pub const CONSUME_FG: Color = Color::LightRed;
pub const ERROR_FG: Color = Color::Red;

/// Returns a color based on the battery state of charge.
pub fn soc_color(soc: f64) -> Color {
    if soc >= 0.5 {
        SOC_HIGH
    } else if soc >= 0.2 {
        SOC_MID
    } else {
        SOC_LOW
    }
}

/// Color for a model's cumulative energy by sign.
pub fn energy_color(energy_j: f64) -> Color {
    if energy_j >= 0.0 { HARVEST_FG } else { CONSUME_FG }
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(points: &[(f64, f64)]) -> [f64; 2] {
    let ys = points.iter().map(|&(_, y)| y);
    let min = ys.clone().fold(f64::INFINITY, f64::min);
    let max = ys.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
