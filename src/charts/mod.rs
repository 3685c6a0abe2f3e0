/// Chart builders: pure functions from the merged table and the current
/// selections to plain chart descriptions.
///
/// Nothing in here touches egui; `ui::plot` turns these descriptions into
/// widgets.

pub mod comparison;
pub mod correlation;
pub mod intro;

use crate::stats::{LinearFit, MinMax};

/// sRGB colour, converted to the UI colour type at render time.
pub type Rgb = [u8; 3];

pub const PRIMARY_COLOR: Rgb = [0x00, 0x72, 0xB2];
pub const COMPARE_COLOR: Rgb = [0xD5, 0x5E, 0x00];
pub const TOP_COLOR: Rgb = [30, 150, 255];
pub const BOTTOM_COLOR: Rgb = [255, 160, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

impl Marker {
    /// Alternating markers for the n-th series.
    pub fn nth(n: usize) -> Self {
        if n % 2 == 0 {
            Marker::Circle
        } else {
            Marker::Square
        }
    }
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub marker: Marker,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub y_range: Option<(f64, f64)>,
    /// Dashed vertical marker, e.g. the selected year.
    pub marker_x: Option<f64>,
}

impl TimeSeriesChart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<BarItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCountry {
    pub code: String,
    pub country: String,
    pub value: f64,
}

/// Most and least affected countries for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingChart {
    pub title: String,
    pub y_label: String,
    pub top: Vec<RankedCountry>,
    pub bottom: Vec<RankedCountry>,
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub code: String,
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethChart {
    pub title: String,
    pub unit: String,
    pub regions: Vec<Region>,
    /// Colour scale domain; `None` when there are no regions.
    pub range: Option<MinMax>,
}

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RadarTrace {
    pub name: String,
    /// One value in `[0, 1]` per axis.
    pub values: Vec<f64>,
    pub color: Rgb,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarChart {
    pub title: String,
    pub axes: Vec<&'static str>,
    pub traces: Vec<RadarTrace>,
}

// ---------------------------------------------------------------------------
// Correlation views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub trend: Option<LinearFit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub labels: Vec<&'static str>,
    /// Row-major square matrix.
    pub cells: Vec<Vec<Option<f64>>>,
    pub range: (f64, f64),
}
