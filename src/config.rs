use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CALIDAD_AIRE_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "calidad_aire.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Every field has a default, so a config file only needs the overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub window_title: String,
    pub map: MapConfig,
    pub charts: ChartConfig,
    pub colors: ColorConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("ambiente_calidad_aire.csv"),
            window_title: "Análisis de Calidad del Aire".to_string(),
            map: MapConfig::default(),
            charts: ChartConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    /// Pixel size the initial viewport is computed for.
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub default_point_size: u32,
    pub default_opacity: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 4.5709,
            center_lon: -74.2973,
            zoom: 6,
            viewport_width: 800.0,
            viewport_height: 600.0,
            default_point_size: 8,
            default_opacity: 0.7,
        }
    }
}

pub const POINT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=20;
pub const OPACITY_RANGE: std::ops::RangeInclusive<f32> = 0.1..=1.0;
pub const MAX_ZOOM: u8 = 18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub histogram_bins: usize,
    /// Step of the value-range slider.
    pub value_step: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            value_step: 0.01,
        }
    }
}

/// Hex colour strings, parsed by [`crate::color::Theme::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    /// Marker colour for categories missing from `categories`.
    pub fallback: String,
    pub categories: BTreeMap<String, String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        let primary = "#2E8B57".to_string();
        let secondary = "#4682B4".to_string();
        let accent = "#FF6B6B".to_string();
        let categories = BTreeMap::from([
            ("A".to_string(), primary.clone()),
            ("B".to_string(), secondary.clone()),
            ("C".to_string(), accent.clone()),
        ]);
        Self {
            primary,
            secondary,
            accent,
            background: "#F8F9FA".to_string(),
            text: "#2C3E50".to_string(),
            fallback: "#666666".to_string(),
            categories,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file and clamp out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config.validated())
    }

    /// Locate and load the config: `$CALIDAD_AIRE_CONFIG`, then
    /// `calidad_aire.json` in the working directory, then defaults.
    pub fn resolve() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            log::info!("Using config from ${CONFIG_ENV}: {}", path.display());
            return Self::load(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            log::info!("Using config file {}", local.display());
            return Self::load(local);
        }
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Clamp numeric settings to what the widgets accept.
    pub fn validated(mut self) -> Self {
        let map = &mut self.map;

        let size = map
            .default_point_size
            .clamp(*POINT_SIZE_RANGE.start(), *POINT_SIZE_RANGE.end());
        if size != map.default_point_size {
            log::warn!("default_point_size {} clamped to {size}", map.default_point_size);
            map.default_point_size = size;
        }

        let opacity = if map.default_opacity.is_finite() {
            map.default_opacity
                .clamp(*OPACITY_RANGE.start(), *OPACITY_RANGE.end())
        } else {
            MapConfig::default().default_opacity
        };
        if opacity != map.default_opacity {
            log::warn!("default_opacity {} clamped to {opacity}", map.default_opacity);
            map.default_opacity = opacity;
        }

        if map.zoom > MAX_ZOOM {
            log::warn!("zoom {} clamped to {MAX_ZOOM}", map.zoom);
            map.zoom = MAX_ZOOM;
        }

        if self.charts.histogram_bins == 0 {
            log::warn!("histogram_bins must be at least 1");
            self.charts.histogram_bins = 1;
        }
        if !(self.charts.value_step.is_finite() && self.charts.value_step > 0.0) {
            log::warn!("value_step {} replaced by default", self.charts.value_step);
            self.charts.value_step = ChartConfig::default().value_step;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calidad_aire.json");
        std::fs::write(
            &path,
            r##"{ "data_path": "otra.csv", "map": { "zoom": 7 }, "colors": { "accent": "#FF0000" } }"##,
        )
        .unwrap();

        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("otra.csv"));
        assert_eq!(cfg.map.zoom, 7);
        assert_eq!(cfg.map.center_lat, 4.5709);
        assert_eq!(cfg.colors.accent, "#FF0000");
        assert_eq!(cfg.colors.primary, "#2E8B57");
        assert_eq!(cfg.charts.histogram_bins, 20);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut cfg = DashboardConfig::default();
        cfg.map.default_point_size = 50;
        cfg.map.default_opacity = 0.0;
        cfg.map.zoom = 30;
        cfg.charts.histogram_bins = 0;
        cfg.charts.value_step = -1.0;

        let cfg = cfg.validated();
        assert_eq!(cfg.map.default_point_size, 20);
        assert_eq!(cfg.map.default_opacity, 0.1);
        assert_eq!(cfg.map.zoom, MAX_ZOOM);
        assert_eq!(cfg.charts.histogram_bins, 1);
        assert_eq!(cfg.charts.value_step, 0.01);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let cfg = DashboardConfig::default();
        let text = serde_json::to_string_pretty(&cfg).unwrap();
        let back: DashboardConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
