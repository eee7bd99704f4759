use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, Points};

use super::analysis::selection_combo;
use super::widgets::{format_mean, measurement_table, metric_card};
use crate::config::{OPACITY_RANGE, POINT_SIZE_RANGE};
use crate::data::markers::{MarkerLayer, Normalization, build_markers, nearest_marker, viewport};
use crate::data::model::{MeasurementTable, View};
use crate::data::stats::summarize;
use crate::state::AppState;

/// How far (in degrees) a click may land from a marker and still pick it.
const PICK_DISTANCE: f64 = 0.25;

// ---------------------------------------------------------------------------
// Interactive map page
// ---------------------------------------------------------------------------

pub fn map_page(ui: &mut Ui, state: &mut AppState, table: &MeasurementTable) {
    ui.label(
        RichText::new("🗺 Mapa Interactivo de Calidad del Aire")
            .color(state.theme.primary)
            .size(30.0)
            .strong(),
    );
    ui.add_space(6.0);

    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.set_width(220.0);
            settings(ui, state, table);
        });

        ui.vertical(|ui: &mut Ui| {
            let view = View::with_indices(table, &state.map.indices);
            let layer = build_markers(
                &view,
                state.map.point_size as f32,
                state.map.opacity,
                &state.theme,
            );
            if let Some(row) = map_plot(ui, state, &layer) {
                state.map.selected = row;
            }
            selected_popup(ui, state, &layer);
        });
    });

    let view = View::with_indices(table, &state.map.indices);
    let summary = summarize(&view);
    let theme = &state.theme;

    ui.separator();
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], theme, "Puntos en el mapa", &summary.rows.to_string());
        metric_card(&mut cols[1], theme, "Valor promedio", &format_mean(summary.mean_value, 4));
        metric_card(
            &mut cols[2],
            theme,
            "Departamentos representados",
            &summary.departments.to_string(),
        );
    });

    ui.add_space(6.0);
    ui.label(RichText::new("Datos del Mapa").strong());
    measurement_table(ui, "map_table", &view, 240.0);
}

/// Category, point size and opacity widgets.
fn settings(ui: &mut Ui, state: &mut AppState, table: &MeasurementTable) {
    ui.label(RichText::new("Configuración del Mapa").strong());
    ui.add_space(4.0);

    if selection_combo(
        ui,
        "Categoría para el mapa:",
        "map_category",
        "Todas",
        &mut state.map.category,
        table.categories.iter(),
    ) {
        state.refilter_map();
    }

    ui.add_space(4.0);
    ui.label("Tamaño de los puntos:");
    ui.add(egui::Slider::new(&mut state.map.point_size, POINT_SIZE_RANGE));
    ui.label("Opacidad de los puntos:");
    ui.add(egui::Slider::new(&mut state.map.opacity, OPACITY_RANGE).step_by(0.01));

    ui.add_space(8.0);
    for (cat, color) in state.theme.legend_entries() {
        ui.label(RichText::new(format!("● Categoría {cat}")).color(color));
    }
}

const DEGENERATE_WARNING: &str =
    "⚠ El valor máximo no es positivo: los puntos se muestran con tamaño fijo";

/// Draw the markers on a lat/lon plot.
///
/// Returns `Some(selection)` when the map was clicked: the nearest marker's
/// row, or `None` if the click missed every marker.
fn map_plot(ui: &mut Ui, state: &AppState, layer: &MarkerLayer) -> Option<Option<usize>> {
    if layer.normalization == Normalization::Degenerate && !layer.markers.is_empty() {
        ui.label(RichText::new(DEGENERATE_WARNING).color(Color32::from_rgb(0xC0, 0x80, 0x00)));
    }
    if layer.markers.is_empty() {
        ui.label(
            RichText::new("No hay puntos para la categoría seleccionada").color(Color32::GRAY),
        );
    }

    let map = &state.config.map;
    let vp = viewport(
        map.center_lat,
        map.center_lon,
        map.zoom,
        map.viewport_width,
        map.viewport_height,
    );

    let clicked_at = Plot::new("air_quality_map")
        .width(map.viewport_width)
        .height(map.viewport_height)
        .data_aspect(1.0)
        .include_x(vp.min_lon)
        .include_x(vp.max_lon)
        .include_y(vp.min_lat)
        .include_y(vp.max_lat)
        .x_axis_label("Longitud")
        .y_axis_label("Latitud")
        .label_formatter(|name: &str, value: &PlotPoint| {
            if name.is_empty() {
                format!("{:.4}, {:.4}", value.y, value.x)
            } else {
                name.to_owned()
            }
        })
        .show(ui, |plot_ui| {
            for m in &layer.markers {
                plot_ui.points(
                    Points::new(vec![[m.lon, m.lat]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(m.radius)
                        .color(m.color)
                        .name(&m.popup),
                );
            }
            if plot_ui.response().clicked() {
                plot_ui.pointer_coordinate()
            } else {
                None
            }
        })
        .inner;

    clicked_at.map(|p| nearest_marker(&layer.markers, p.x, p.y, PICK_DISTANCE).map(|m| m.row))
}

/// Popup of the marker pinned by the last click.
fn selected_popup(ui: &mut Ui, state: &AppState, layer: &MarkerLayer) {
    let Some(row) = state.map.selected else {
        ui.small("Haga clic en un punto para ver sus detalles.");
        return;
    };
    if let Some(marker) = layer.markers.iter().find(|m| m.row == row) {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(&marker.popup).color(state.theme.text));
        });
    }
}
