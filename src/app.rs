use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AtlasApp {
    pub state: AppState,
}

impl AtlasApp {
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.load_initial();
        Self { state }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: indicator notes ----
        egui::SidePanel::left("info_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::side_panel(ui, &self.state);
                });
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            // The table is read while selections change; lend it out for the frame.
            match self.state.table.take() {
                Some(table) => {
                    panels::dashboard(ui, &table, &mut self.state);
                    if self.state.table.is_none() {
                        self.state.table = Some(table);
                    }
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("No data loaded. Use File → Open data folder… to load the source CSVs.");
                    });
                }
            }
        });
    }
}
