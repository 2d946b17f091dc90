use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use flexvolt_viewer::ColumnGroup;

use crate::color::channel_name;
use crate::state::{AppState, LoadedRecording};

// ---------------------------------------------------------------------------
// Signal plots (central panel)
// ---------------------------------------------------------------------------

const PLOTTED_GROUPS: [ColumnGroup; 2] = [ColumnGroup::Processed, ColumnGroup::Raw];

/// Render processed and raw signal vs. time, stacked.
pub fn signal_plots(ui: &mut Ui, state: &AppState) {
    let loaded = match &state.loaded {
        Some(loaded) => loaded,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a recording to view signals  (File → Open…)");
            });
            return;
        }
    };

    let spacing = ui.spacing().item_spacing.y;
    let height = ((ui.available_height() - spacing) / PLOTTED_GROUPS.len() as f32).max(120.0);

    for group in PLOTTED_GROUPS {
        group_plot(ui, loaded, group, height, state.link_x);
    }
}

fn group_plot(ui: &mut Ui, loaded: &LoadedRecording, group: ColumnGroup, height: f32, link_x: bool) {
    let (channels, palette) = loaded.series(group);
    let x_label = if loaded.has_time_column() { "Time" } else { "Sample" };

    Plot::new(("signal_plot", group))
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(group.label())
        .link_axis("signal_x", [link_x, false])
        .link_cursor("signal_x", [link_x, false])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, channel) in channels.iter().enumerate() {
                let points: PlotPoints = loaded
                    .time_axis
                    .iter()
                    .zip(channel.iter())
                    .map(|(&t, &v)| [t, v])
                    .collect();

                let line = Line::new(points)
                    .name(channel_name(idx))
                    .color(palette.color_for(idx))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
