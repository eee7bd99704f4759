use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::{AppState, Page};
use crate::ui::{analysis, home, map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CalidadAireApp {
    pub state: AppState,
}

impl CalidadAireApp {
    /// Build the app and load the configured table.
    pub fn new(config: DashboardConfig) -> Self {
        let path = config.data_path.clone();
        let mut state = AppState::new(config);
        state.load_path(&path);
        Self { state }
    }
}

impl eframe::App for CalidadAireApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("nav_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active page ----
        let background = self.state.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(background))
            .show(ctx, |ui| {
                let Some(table) = self.state.dataset.clone() else {
                    panels::no_data(ui, &self.state);
                    return;
                };

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| match self.state.page {
                        Page::Home => home::home_page(ui, &self.state, &table),
                        Page::Analysis => analysis::analysis_page(ui, &mut self.state, &table),
                        Page::Map => map::map_page(ui, &mut self.state, &table),
                    });
            });
    }
}
