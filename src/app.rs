use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TelemetryGrapherApp {
    pub state: AppState,
}

impl TelemetryGrapherApp {
    /// Scan the data directory and open the first log that parses, if any.
    pub fn new(mut state: AppState) -> Self {
        state.refresh_file_list();
        let files = state.available_files.clone();
        if let Some(path) = files.iter().find(|path| state.load_file(path)) {
            log::info!("Opened {} at startup", path.display());
        }
        Self { state }
    }
}

impl eframe::App for TelemetryGrapherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + panel toggle ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: file, channels, units ----
        if self.state.panel_visible {
            egui::SidePanel::left("selection_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::telemetry_plot(ui, &self.state);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::data::loader::TextEncoding;

    #[test]
    fn test_startup_skips_logs_that_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_truncated.csv"), "Time,A\ns\n").unwrap();
        std::fs::write(dir.path().join("b_run.csv"), "Time,A\ns,bar\n0,1\n").unwrap();

        let app = TelemetryGrapherApp::new(AppState::new(ViewerConfig {
            data_dir: dir.path().to_path_buf(),
            encoding: TextEncoding::Utf8,
            ..ViewerConfig::default()
        }));

        assert_eq!(
            app.state.current_file.as_deref(),
            Some(dir.path().join("b_run.csv").as_path())
        );
        assert_eq!(app.state.channel_options(), vec!["A (bar)"]);
        assert!(app.state.status_message.is_none());
    }
}
