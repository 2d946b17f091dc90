use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FlexVoltApp {
    pub state: AppState,
}

impl FlexVoltApp {
    /// Create the app, loading `initial` right away if given.
    pub fn new(initial: Option<&Path>) -> Self {
        let mut state = AppState::new();
        if let Some(path) = initial {
            state.load_path(path);
        }
        Self { state }
    }
}

impl eframe::App for FlexVoltApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: metadata ----
        egui::SidePanel::left("metadata_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: signal plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::signal_plots(ui, &self.state);
        });
    }
}
