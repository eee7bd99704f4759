use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page};

const SIDEBAR_ICON: &str = "https://cdn-icons-png.flaticon.com/512/2978/2978373.png";

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the navigation sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let primary = state.theme.primary;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(egui::Image::new(SIDEBAR_ICON).max_width(80.0).max_height(80.0));
        ui.heading(RichText::new("🌿 Calidad del Aire").color(primary).strong());
    });
    ui.add_space(8.0);

    ui.strong("Navegación");
    ui.separator();

    for page in Page::ALL {
        let selected = state.page == page;
        let text = if selected {
            RichText::new(page.title()).color(Color32::WHITE).strong()
        } else {
            RichText::new(page.title())
        };
        let button = egui::Button::new(text)
            .fill(if selected { primary } else { Color32::TRANSPARENT })
            .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(button).clicked() && !selected {
            log::debug!("Navigating to {page:?}");
            state.page = page;
        }
    }

    ui.add_space(8.0);
    ui.separator();

    if let Some(ds) = &state.dataset {
        if ds.is_empty() {
            ui.small(RichText::new("El archivo no contiene registros").color(Color32::GRAY));
        } else {
            ui.small(format!("{} registros cargados", ds.len()));
        }
    }
    if let Some(path) = &state.data_path {
        ui.small(path.display().to_string());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} registros · {} departamentos · {} categorías",
                ds.len(),
                ds.departments.len(),
                ds.categories.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("Sistema de Análisis de Calidad del Aire • Desarrollado con egui")
                .color(Color32::from_gray(0x66)),
        );
    });
}

/// Central-panel placeholder while no table is loaded.
pub fn no_data(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let mut text = String::from("No hay datos cargados.  (Archivo → Abrir…)");
        if let Some(msg) = &state.status_message {
            text.push_str("\n\n");
            text.push_str(msg);
        }
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de calidad del aire")
        .add_filter("Archivos soportados", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
