use eframe::egui::{self, RichText, Ui};

use super::plot::{category_bar_chart, category_box_plot, value_histogram};
use super::widgets::{measurement_table, section_header};
use crate::data::filter::Selection;
use crate::data::model::{MeasurementTable, View};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Descriptive-analysis page
// ---------------------------------------------------------------------------

pub fn analysis_page(ui: &mut Ui, state: &mut AppState, table: &MeasurementTable) {
    ui.label(
        RichText::new("📊 Análisis Descriptivo")
            .color(state.theme.primary)
            .size(30.0)
            .strong(),
    );
    ui.add_space(6.0);

    filter_row(ui, state, table);

    let view = View::with_indices(table, &state.analysis.indices);
    let theme = &state.theme;

    section_header(ui, theme, &format!("Datos Filtrados ({} registros)", view.len()));
    measurement_table(ui, "analysis_table", &view, 260.0);

    if view.is_empty() {
        ui.add_space(12.0);
        ui.label(
            RichText::new("No hay datos para los filtros seleccionados")
                .color(egui::Color32::GRAY)
                .size(16.0),
        );
        return;
    }

    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new("Distribución por Categoría").strong());
        category_bar_chart(&mut cols[0], &view, theme);

        cols[1].label(RichText::new("Distribución de Valores").strong());
        value_histogram(&mut cols[1], &view, theme, state.config.charts.histogram_bins);
    });

    ui.add_space(8.0);
    ui.label(RichText::new("Distribución de Valores por Categoría").strong());
    category_box_plot(ui, &view, theme);
}

/// Department and category dropdowns plus the value-range sliders.
fn filter_row(ui: &mut Ui, state: &mut AppState, table: &MeasurementTable) {
    let mut changed = false;
    let (mut lo, mut hi) = state.analysis.value_range;
    let (min, max) = table.value_bounds.unwrap_or((0.0, 0.0));
    let step = state.config.charts.value_step;

    ui.columns(3, |cols: &mut [Ui]| {
        changed |= selection_combo(
            &mut cols[0],
            "Seleccionar Departamento:",
            "analysis_department",
            "Todos",
            &mut state.analysis.department,
            table.departments.iter(),
        );
        changed |= selection_combo(
            &mut cols[1],
            "Seleccionar Categoría:",
            "analysis_category",
            "Todas",
            &mut state.analysis.category,
            table.categories.iter(),
        );

        let ui = &mut cols[2];
        ui.label("Rango de Valor:");
        changed |= ui
            .add(egui::Slider::new(&mut lo, min..=max).text("mín").step_by(step))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut hi, min..=max).text("máx").step_by(step))
            .changed();
    });

    if changed {
        state.set_value_range(lo, hi);
    }
}

/// A dropdown listing `all_label` followed by `options`.
/// Returns whether the selection changed.
pub fn selection_combo<'a>(
    ui: &mut Ui,
    label: &str,
    id: &str,
    all_label: &str,
    selection: &mut Selection,
    options: impl Iterator<Item = &'a String>,
) -> bool {
    let before = selection.clone();
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selection.label(all_label).to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selection, Selection::All, all_label);
            for opt in options {
                ui.selectable_value(selection, Selection::Only(opt.clone()), opt.as_str());
            }
        });
    *selection != before
}
