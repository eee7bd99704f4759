use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{Theme, lighten};
use crate::data::model::{COLUMNS, View};

// ---------------------------------------------------------------------------
// Metric card
// ---------------------------------------------------------------------------

/// A label over a large value, framed with the primary colour.
pub fn metric_card(ui: &mut Ui, theme: &Theme, label: &str, value: &str) {
    egui::Frame::group(ui.style())
        .fill(lighten(theme.primary, 0.92))
        .stroke(Stroke::new(1.5, theme.primary))
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(label).color(theme.text).strong());
            ui.label(RichText::new(value).color(theme.primary).size(28.0).strong());
        });
}

/// Section heading in the primary colour, followed by a separator.
pub fn section_header(ui: &mut Ui, theme: &Theme, text: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(text).color(theme.primary).size(20.0).strong());
    ui.separator();
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an optional mean; empty views read "Sin datos".
pub fn format_mean(mean: Option<f64>, decimals: usize) -> String {
    match mean {
        Some(v) => format!("{v:.decimals$}"),
        None => "Sin datos".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Measurement table
// ---------------------------------------------------------------------------

/// Scrollable table of every row in `view`.
pub fn measurement_table(ui: &mut Ui, id: &str, view: &View<'_>, max_height: f32) {
    if view.is_empty() {
        ui.label(RichText::new("Sin registros").color(Color32::GRAY));
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(80.0), COLUMNS.len() - 1)
            .max_scroll_height(max_height)
            .header(20.0, |mut header| {
                for col in COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, view.len(), |mut row| {
                    let Some(m) = view.get(row.index()) else {
                        return;
                    };
                    row.col(|ui: &mut Ui| {
                        ui.label(&m.department);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&m.category);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", m.value));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", m.latitude));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", m.longitude));
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_mean() {
        assert_eq!(format_mean(Some(0.123456), 3), "0.123");
        assert_eq!(format_mean(Some(2.0), 4), "2.0000");
        assert_eq!(format_mean(None, 3), "Sin datos");
    }
}
