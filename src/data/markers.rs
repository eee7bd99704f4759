use eframe::egui::Color32;

use super::model::{Measurement, View};
use crate::color::{Theme, with_opacity};

// ---------------------------------------------------------------------------
// Marker – one circle on the map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Row index in the source table.
    pub row: usize,
    pub lat: f64,
    pub lon: f64,
    /// Screen-space radius in points.
    pub radius: f32,
    pub color: Color32,
    pub popup: String,
}

/// How marker radii were derived for a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `radius = base × value / max_value`.
    Scaled { max_value: f64 },
    /// Empty view or a max value ≤ 0: every marker got the base size.
    Degenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    pub markers: Vec<Marker>,
    pub normalization: Normalization,
}

/// `base × value / max`, clamped at zero.
///
/// `None` when `max` is not a positive finite number.
pub fn marker_radius(base: f32, value: f64, max: f64) -> Option<f32> {
    if !(max.is_finite() && max > 0.0) {
        return None;
    }
    Some((base as f64 * value / max).max(0.0) as f32)
}

pub fn popup_text(m: &Measurement) -> String {
    format!(
        "Departamento: {}\nCategoría: {}\nValor: {:.4}\nCoordenadas: {:.4}, {:.4}",
        m.department, m.category, m.value, m.latitude, m.longitude
    )
}

/// Build one marker per row of `view`, coloured by category and sized by
/// value relative to the view's maximum.
pub fn build_markers(view: &View<'_>, base_size: f32, opacity: f32, theme: &Theme) -> MarkerLayer {
    let normalization = match view.max_value() {
        Some(max) if marker_radius(base_size, max, max).is_some() => {
            Normalization::Scaled { max_value: max }
        }
        _ => Normalization::Degenerate,
    };

    let markers = view
        .indices()
        .iter()
        .zip(view.rows())
        .map(|(&row, m)| {
            let radius = match normalization {
                Normalization::Scaled { max_value } => {
                    marker_radius(base_size, m.value, max_value).unwrap_or(base_size)
                }
                Normalization::Degenerate => base_size,
            };
            Marker {
                row,
                lat: m.latitude,
                lon: m.longitude,
                radius,
                color: with_opacity(theme.category_color(&m.category), opacity),
                popup: popup_text(m),
            }
        })
        .collect();

    MarkerLayer {
        markers,
        normalization,
    }
}

/// Marker closest to `(lon, lat)`, if any lies within `max_distance` degrees.
pub fn nearest_marker(
    markers: &[Marker],
    lon: f64,
    lat: f64,
    max_distance: f64,
) -> Option<&Marker> {
    markers
        .iter()
        .map(|m| (m, (m.lon - lon).hypot(m.lat - lat)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m)
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Geographic bounds of the initial map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Span a web map shows at `zoom` for a `width × height` pixel canvas of
/// 256-pixel tiles, centred on `(center_lat, center_lon)`.
pub fn viewport(center_lat: f64, center_lon: f64, zoom: u8, width: f32, height: f32) -> Viewport {
    let degrees_per_px = 360.0 / 256.0 / 2f64.powi(zoom as i32);
    let half_lon = width as f64 * degrees_per_px / 2.0;
    let half_lat = height as f64 * degrees_per_px / 2.0;
    Viewport {
        min_lon: center_lon - half_lon,
        max_lon: center_lon + half_lon,
        min_lat: (center_lat - half_lat).max(-90.0),
        max_lat: (center_lat + half_lat).min(90.0),
    }
}
