use std::path::Path;

use crate::charts::comparison;
use crate::charts::correlation::YearWindow;
use crate::config::Config;
use crate::data::loader;
use crate::data::model::{Indicator, MentalHealthTable};
use crate::geo::WorldShapes;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Merged table (None until a source loads successfully).
    pub table: Option<MentalHealthTable>,

    /// Country outlines for the map; empty means tile-grid fallback.
    pub shapes: WorldShapes,

    /// Disorder shown on the map, bars and ranking.
    pub illness: Indicator,

    /// Year of the map, bars and ranking.
    pub year: i32,

    /// First country of the comparison section (also set by clicking the map).
    pub primary: Option<String>,

    /// Optional second country.
    pub compare: Option<String>,

    /// Indicators drawn as time series.
    pub indicators: Vec<Indicator>,

    pub radar_year: i32,

    pub correlation_year: i32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let window = config.correlation_window;
        Self {
            config,
            table: None,
            shapes: WorldShapes::default(),
            illness: Indicator::ILLNESSES[0],
            year: window.max,
            primary: None,
            compare: None,
            indicators: vec![Indicator::Anxiety],
            radar_year: window.max,
            correlation_year: window.max,
            status_message: None,
        }
    }

    pub fn window(&self) -> YearWindow {
        self.config.correlation_window
    }

    /// Load the configured sources and shapes; failures end up in the status line.
    pub fn load_initial(&mut self) {
        let data_path = self.config.data_path.clone();
        self.load_path(&data_path);

        if let Some(geojson) = self.config.geojson_path.clone() {
            match WorldShapes::load(&geojson) {
                Ok(shapes) => {
                    log::info!("Loaded {} country outlines from {}", shapes.shapes.len(), geojson.display());
                    self.shapes = shapes;
                }
                Err(e) => {
                    log::error!("Failed to load country outlines: {e:#}");
                    self.status_message = Some(format!("Map outlines unavailable: {e:#}"));
                }
            }
        }
    }

    /// Load a source directory or snapshot and make it current.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path, self.config.composite_mode) {
            Ok(table) => {
                log::info!(
                    "Loaded {} country-year rows from {} (years {:?}, composite {})",
                    table.len(),
                    path.display(),
                    table.year_range(),
                    table.composite_mode
                );
                self.set_table(table);
                if let Some(export) = self.config.export_path.clone() {
                    self.export(&export);
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table and reset the selections that depend on it.
    pub fn set_table(&mut self, table: MentalHealthTable) {
        if let Some((_, max_year)) = table.year_range() {
            self.year = max_year;
        }
        let window = self.window();
        self.radar_year = window.max;
        self.correlation_year = window.max;
        self.primary = None;
        self.compare = None;
        self.table = Some(table);
        self.status_message = None;
    }

    pub fn export(&mut self, path: &Path) {
        if let Some(table) = self.table.take() {
            self.export_to(&table, path);
            self.table = Some(table);
        }
    }

    fn export_to(&mut self, table: &MentalHealthTable, path: &Path) {
        match loader::export(table, path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", table.len(), path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export merged table: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Change the primary country; keeps the compare selection consistent.
    pub fn select_primary(&mut self, code: Option<String>) {
        self.primary = code;
        self.compare = comparison::reconcile_compare(self.primary.as_deref(), self.compare.take());
    }

    pub fn select_compare(&mut self, code: Option<String>) {
        self.compare = comparison::reconcile_compare(self.primary.as_deref(), code);
    }

    /// Toggle an indicator of the time-series selection. An empty selection
    /// shows no time series.
    pub fn toggle_indicator(&mut self, indicator: Indicator) {
        if let Some(pos) = self.indicators.iter().position(|&i| i == indicator) {
            self.indicators.remove(pos);
        } else {
            self.indicators.push(indicator);
        }
    }
}
