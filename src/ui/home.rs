use eframe::egui::{RichText, Ui};

use super::widgets::{format_mean, metric_card, section_header, thousands};
use crate::data::model::MeasurementTable;
use crate::data::stats::summarize;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Landing page
// ---------------------------------------------------------------------------

pub fn home_page(ui: &mut Ui, state: &AppState, table: &MeasurementTable) {
    let theme = &state.theme;

    ui.label(
        RichText::new("Sistema de Análisis de Calidad del Aire")
            .color(theme.primary)
            .size(30.0)
            .strong(),
    );
    ui.label(
        RichText::new("Plataforma de monitoreo y análisis de indicadores ambientales").size(18.0),
    );
    ui.add_space(8.0);

    ui.label(
        "Esta aplicación permite analizar y visualizar datos de calidad del aire recolectados \
         en diferentes departamentos de Colombia. Explore las diferentes secciones para:",
    );
    ui.label("  • 📊 Análisis descriptivo de los indicadores ambientales");
    ui.label("  • 🗺 Visualización geográfica de la calidad del aire");
    ui.label("  • 📈 Tendencias y patrones por categorías y departamentos");

    ui.add_space(8.0);
    ui.separator();
    section_header(ui, theme, "Resumen Ejecutivo");

    let summary = summarize(&table.view());
    let cards = [
        ("📈 Total de Registros", thousands(summary.rows)),
        ("🏙 Departamentos", summary.departments.to_string()),
        ("📊 Valor Promedio", format_mean(summary.mean_value, 3)),
        ("📋 Categorías", summary.categories.to_string()),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(&cards) {
            metric_card(col, theme, label, value);
        }
    });
}
