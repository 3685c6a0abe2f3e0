//! # Dashboard configuration
//!
//! Environment-based configuration. Invalid values fall back to defaults
//! with a warning.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::charts::correlation::YearWindow;
use crate::data::composite::CompositeMode;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory with the five source CSVs, or a merged snapshot file
    pub data_path: PathBuf,

    /// Optional GeoJSON with country outlines for the map
    pub geojson_path: Option<PathBuf>,

    /// How the composite index is computed
    pub composite_mode: CompositeMode,

    /// Years selectable in the correlation section
    pub correlation_window: YearWindow,

    /// Write the merged table here after loading
    pub export_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data"),
            geojson_path: None,
            composite_mode: CompositeMode::default(),
            correlation_window: YearWindow::default(),
            export_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        let window_min = parse_or(&lookup, "ATLAS_CORRELATION_MIN_YEAR", defaults.correlation_window.min);
        let window_max = parse_or(&lookup, "ATLAS_CORRELATION_MAX_YEAR", defaults.correlation_window.max);
        if window_min > window_max {
            log::warn!("correlation window {window_min}..{window_max} is inverted, swapping bounds");
        }

        Self {
            data_path: path("ATLAS_DATA_DIR").unwrap_or(defaults.data_path),
            geojson_path: path("ATLAS_GEOJSON"),
            composite_mode: parse_or(&lookup, "ATLAS_COMPOSITE", defaults.composite_mode),
            correlation_window: YearWindow::new(window_min, window_max),
            export_path: path("ATLAS_EXPORT_PATH"),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("ATLAS_DATA_DIR", "/srv/atlas"),
            ("ATLAS_GEOJSON", "world.geojson"),
            ("ATLAS_COMPOSITE", "sum"),
            ("ATLAS_CORRELATION_MIN_YEAR", "1995"),
            ("ATLAS_CORRELATION_MAX_YEAR", "2015"),
            ("ATLAS_EXPORT_PATH", "merged.parquet"),
        ]);
        assert_eq!(cfg.data_path, PathBuf::from("/srv/atlas"));
        assert_eq!(cfg.geojson_path, Some(PathBuf::from("world.geojson")));
        assert_eq!(cfg.composite_mode, CompositeMode::Sum);
        assert_eq!(cfg.correlation_window, YearWindow { min: 1995, max: 2015 });
        assert_eq!(cfg.export_path, Some(PathBuf::from("merged.parquet")));
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config(&[
            ("ATLAS_COMPOSITE", "median"),
            ("ATLAS_CORRELATION_MIN_YEAR", "soon"),
            ("ATLAS_GEOJSON", "  "),
        ]);
        assert_eq!(cfg.composite_mode, CompositeMode::MinMax);
        assert_eq!(cfg.correlation_window.min, 2000);
        assert_eq!(cfg.geojson_path, None);
    }

    #[test]
    fn inverted_window_is_swapped() {
        let cfg = config(&[
            ("ATLAS_CORRELATION_MIN_YEAR", "2019"),
            ("ATLAS_CORRELATION_MAX_YEAR", "2001"),
        ]);
        assert_eq!(cfg.correlation_window, YearWindow { min: 2001, max: 2019 });
    }
}
