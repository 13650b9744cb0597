use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::channel_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Telemetry chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected channels as lines over the time axis.
pub fn telemetry_plot(ui: &mut Ui, state: &AppState) {
    let Some(x_label) = state.time_axis_label() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a log to plot channels  (File → Open…)");
        });
        return;
    };

    let series = state.series();

    Plot::new("telemetry_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Value")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s
                    .x
                    .iter()
                    .zip(&s.y)
                    .map(|(&x, &y)| [x, y])
                    .collect();

                let line = Line::new(points)
                    .name(&s.label)
                    .color(channel_color(s.column))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
