use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Plot};

use crate::color::Theme;
use crate::data::model::View;
use crate::data::stats::{box_stats_by_category, histogram, value_counts};

const CHART_HEIGHT: f32 = 300.0;

/// Axis labels for charts whose x positions are category slots `0, 1, 2…`.
fn category_axis(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let slot = mark.value.round();
        if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
            return String::new();
        }
        names.get(slot as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Category frequency bar chart
// ---------------------------------------------------------------------------

pub fn category_bar_chart(ui: &mut Ui, view: &View<'_>, theme: &Theme) {
    let counts = value_counts(view);
    let names: Vec<String> = counts.iter().map(|(c, _)| c.clone()).collect();

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (cat, n))| {
            Bar::new(i as f64, *n as f64)
                .width(0.7)
                .name(cat)
                .fill(theme.sequence_color(i))
        })
        .collect();

    Plot::new("category_bar_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Categoría")
        .y_axis_label("Cantidad")
        .x_axis_formatter(category_axis(names))
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Cantidad"));
        });
}

// ---------------------------------------------------------------------------
// Value histogram
// ---------------------------------------------------------------------------

pub fn value_histogram(ui: &mut Ui, view: &View<'_>, theme: &Theme, bins: usize) {
    let values: Vec<f64> = view.values().collect();
    let bars: Vec<Bar> = histogram(&values, bins)
        .into_iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.3} – {:.3}", bin.start, bin.end))
                .fill(theme.primary)
                .stroke(Stroke::new(1.0, Color32::WHITE))
        })
        .collect();

    Plot::new("value_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Valor")
        .y_axis_label("Frecuencia")
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Frecuencia"));
        });
}

// ---------------------------------------------------------------------------
// Per-category box plot
// ---------------------------------------------------------------------------

pub fn category_box_plot(ui: &mut Ui, view: &View<'_>, theme: &Theme) {
    let groups = box_stats_by_category(view);
    let names: Vec<String> = groups.iter().map(|(c, _)| c.clone()).collect();

    Plot::new("category_box_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Categoría")
        .y_axis_label("Valor")
        .x_axis_formatter(category_axis(names))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (cat, stats)) in groups.iter().enumerate() {
                let color = theme.sequence_color(i);
                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                let elem = BoxElem::new(i as f64, spread)
                    .name(cat)
                    .box_width(0.5)
                    .whisker_width(0.3)
                    .fill(color.gamma_multiply(0.5))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(cat).color(color));

                if !stats.outliers.is_empty() {
                    let points: Vec<[f64; 2]> =
                        stats.outliers.iter().map(|&v| [i as f64, v]).collect();
                    plot_ui.points(
                        egui_plot::Points::new(points)
                            .radius(3.0)
                            .color(color)
                            .name(format!("{cat} (atípicos)")),
                    );
                }
            }
        });
}
