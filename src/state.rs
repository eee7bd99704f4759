use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::cache::load_cached;
use crate::data::filter::{MeasurementFilter, Selection, filtered_indices};
use crate::data::model::MeasurementTable;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Analysis,
    Map,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Analysis, Page::Map];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "🏠 Inicio",
            Page::Analysis => "📊 Análisis Descriptivo",
            Page::Map => "🗺 Mapa Interactivo",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-page state
// ---------------------------------------------------------------------------

/// Filter widgets of the descriptive-analysis page.
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub department: Selection,
    pub category: Selection,
    /// Inclusive slider bounds.
    pub value_range: (f64, f64),
    /// Rows passing the current filters (cached).
    pub indices: Vec<usize>,
}

impl AnalysisState {
    pub fn filter(&self) -> MeasurementFilter {
        MeasurementFilter {
            department: self.department.clone(),
            category: self.category.clone(),
            value_range: Some(self.value_range),
        }
    }
}

/// Settings widgets of the map page.
#[derive(Debug, Clone)]
pub struct MapState {
    pub category: Selection,
    pub point_size: u32,
    pub opacity: f32,
    /// Rows shown on the map (cached).
    pub indices: Vec<usize>,
    /// Table row of the marker whose popup is pinned.
    pub selected: Option<usize>,
}

impl MapState {
    fn new(config: &DashboardConfig) -> Self {
        Self {
            category: Selection::All,
            point_size: config.map.default_point_size,
            opacity: config.map.default_opacity,
            indices: Vec::new(),
            selected: None,
        }
    }

    pub fn filter(&self) -> MeasurementFilter {
        MeasurementFilter::by_category(self.category.clone())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub theme: Theme,

    /// Loaded table (None until a file loads successfully).
    pub dataset: Option<Arc<MeasurementTable>>,
    /// Where `dataset` came from.
    pub data_path: Option<PathBuf>,

    pub page: Page,
    pub analysis: AnalysisState,
    pub map: MapState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            theme: Theme::from_config(&config.colors),
            map: MapState::new(&config),
            config,
            dataset: None,
            data_path: None,
            page: Page::default(),
            analysis: AnalysisState::default(),
            status_message: None,
        }
    }

    /// Load (or fetch from the cache) the table at `path`.
    ///
    /// On failure the previous table stays in place and the error is shown
    /// in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match load_cached(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} measurements from {} ({} skipped, {} departments, categories {:?})",
                    table.len(),
                    path.display(),
                    table.skipped_rows,
                    table.departments.len(),
                    table.categories
                );
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error al cargar {}: {e}", path.display()));
            }
        }
    }

    /// Ingest a newly loaded table and reset every widget to "show all".
    pub fn set_dataset(&mut self, table: Arc<MeasurementTable>) {
        self.analysis = AnalysisState {
            value_range: table.value_bounds.unwrap_or((0.0, 0.0)),
            ..Default::default()
        };
        self.map.category = Selection::All;
        self.map.selected = None;

        self.status_message = (table.skipped_rows > 0)
            .then(|| format!("{} filas con valores no numéricos omitidas", table.skipped_rows));

        self.dataset = Some(table);
        self.refilter_analysis();
        self.refilter_map();
    }

    /// Recompute the analysis page rows after a filter change.
    pub fn refilter_analysis(&mut self) {
        if let Some(table) = &self.dataset {
            self.analysis.indices = filtered_indices(table, &self.analysis.filter());
            log::debug!("Analysis view: {} rows", self.analysis.indices.len());
        }
    }

    /// Recompute the map rows after a category change.
    pub fn refilter_map(&mut self) {
        if let Some(table) = &self.dataset {
            self.map.indices = filtered_indices(table, &self.map.filter());
            log::debug!("Map view: {} rows", self.map.indices.len());
        }
        self.map.selected = self
            .map
            .selected
            .filter(|row| self.map.indices.contains(row));
    }

    /// Keep `lo ≤ hi` after one slider moved past the other.
    ///
    /// Stepped sliders can stop short of the table bounds, so a value within
    /// one step of a bound is moved onto it.
    pub fn set_value_range(&mut self, lo: f64, hi: f64) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let (lo, hi) = match self.dataset.as_ref().and_then(|t| t.value_bounds) {
            Some((min, max)) => {
                let step = self.config.charts.value_step;
                let snap = |v: f64| {
                    if v - min < step {
                        min
                    } else if max - v < step {
                        max
                    } else {
                        v
                    }
                };
                (snap(lo), snap(hi))
            }
            None => (lo, hi),
        };
        self.analysis.value_range = (lo, hi);
        self.refilter_analysis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;

    fn table() -> Arc<MeasurementTable> {
        Arc::new(MeasurementTable::from_rows(vec![
            Measurement::new("Atlántico", "A", 0.5, 10.9, -74.8),
            Measurement::new("Atlántico", "B", 1.5, 10.9, -74.8),
            Measurement::new("Santander", "A", 2.5, 7.1, -73.1),
        ]))
    }

    #[test]
    fn test_set_dataset_resets_filters() {
        let mut state = AppState::default();
        state.analysis.category = Selection::only("B");
        state.set_dataset(table());

        assert_eq!(state.analysis.category, Selection::All);
        assert_eq!(state.analysis.value_range, (0.5, 2.5));
        assert_eq!(state.analysis.indices, vec![0, 1, 2]);
        assert_eq!(state.map.indices, vec![0, 1, 2]);
        assert_eq!(state.map.point_size, 8);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_refilter_analysis() {
        let mut state = AppState::default();
        state.set_dataset(table());

        state.analysis.department = Selection::only("Atlántico");
        state.refilter_analysis();
        assert_eq!(state.analysis.indices, vec![0, 1]);

        state.set_value_range(2.0, 1.0);
        assert_eq!(state.analysis.value_range, (1.0, 2.0));
        assert_eq!(state.analysis.indices, vec![1]);
    }

    #[test]
    fn test_value_range_reaches_table_bounds() {
        let mut state = AppState::default();
        state.set_dataset(Arc::new(MeasurementTable::from_rows(vec![
            Measurement::new("Meta", "A", 0.0041, 4.1, -73.6),
            Measurement::new("Meta", "B", 0.0950, 4.1, -73.6),
            Measurement::new("Meta", "C", 0.1884, 4.1, -73.6),
        ])));
        assert_eq!(state.config.charts.value_step, 0.01);

        // Where a 0.01-step slider over 0.0041..=0.1884 stops at either end.
        state.set_value_range(0.0041, 0.1841);
        assert_eq!(state.analysis.value_range, (0.0041, 0.1884));
        assert_eq!(state.analysis.indices, vec![0, 1, 2]);

        state.set_value_range(0.0541, 0.1841);
        assert_eq!(state.analysis.value_range, (0.0541, 0.1884));
        assert_eq!(state.analysis.indices, vec![1, 2]);

        state.set_value_range(0.0100, 0.0941);
        assert_eq!(state.analysis.value_range, (0.0041, 0.0941));
        assert_eq!(state.analysis.indices, vec![0]);
    }

    #[test]
    fn test_refilter_map_drops_hidden_selection() {
        let mut state = AppState::default();
        state.set_dataset(table());
        state.map.selected = Some(1);

        state.map.category = Selection::only("A");
        state.refilter_map();
        assert_eq!(state.map.indices, vec![0, 2]);
        assert_eq!(state.map.selected, None);
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut state = AppState::default();
        state.set_dataset(table());
        state.load_path(Path::new("/nonexistent/ambiente_calidad_aire.csv"));

        assert_eq!(state.dataset.as_ref().map(|t| t.len()), Some(3));
        assert!(state.status_message.as_deref().unwrap_or("").contains("Error"));
    }
}
