use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use flexvolt_viewer::classify;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – metadata and columns
// ---------------------------------------------------------------------------

/// Render the left panel: metadata header, column list and channel legend.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Metadata");
    ui.separator();

    let Some(loaded) = &state.loaded else {
        ui.label("No recording loaded.");
        return;
    };

    if loaded.recording.metadata.is_empty() {
        ui.label("(empty header)");
    } else {
        ui.push_id("metadata_table", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(280.0)
                .column(Column::auto())
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Key");
                    });
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                })
                .body(|mut body| {
                    for (key, value) in &loaded.recording.metadata {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(key.as_str());
                            });
                            row.col(|ui| {
                                ui.label(value.to_string());
                            });
                        });
                    }
                });
        });
    }

    if ui.button("Copy as JSON").clicked() {
        if let Some(json) = state.metadata_json() {
            ui.ctx().copy_text(json);
        }
    }

    ui.add_space(8.0);
    ui.heading("Columns");
    ui.separator();

    let Some(loaded) = &state.loaded else {
        return;
    };

    ScrollArea::vertical()
        .id_salt("columns")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in &loaded.recording.columns {
                let groups = classify(column);
                let tags = if groups.is_empty() {
                    "unassigned".to_string()
                } else {
                    groups
                        .iter()
                        .map(|g| g.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new(column.trim()).strong());
                    ui.label(RichText::new(tags).weak());
                });
            }

            egui::CollapsingHeader::new(RichText::new("Channels").strong())
                .id_salt("channel_legend")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for (title, palette) in [
                        ("Processed", &loaded.processed_palette),
                        ("Raw", &loaded.raw_palette),
                    ] {
                        ui.label(title);
                        for (name, color) in palette.legend_entries() {
                            ui.colored_label(color, format!("  ■ {name}"));
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(summary) = state.summary() {
            ui.label(summary);
        }

        ui.separator();

        if ui
            .selectable_label(state.link_x, "Link time axes")
            .clicked()
        {
            state.link_x = !state.link_x;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open FlexVolt recording")
        .add_filter("FlexVolt recordings", &["txt", "csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
