use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::channel_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – file, channel and unit selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            file_selector(ui, state);
            ui.separator();
            channel_list(ui, state);
            ui.separator();
            unit_selectors(ui, state);
        });
}

fn file_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Log file");

    let current = state
        .current_file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "—".to_string());

    let mut picked: Option<PathBuf> = None;
    egui::ComboBox::from_id_salt("file_selector")
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for path in &state.available_files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let is_current = state.current_file.as_ref() == Some(path);
                if ui.selectable_label(is_current, name).clicked() && !is_current {
                    picked = Some(path.clone());
                }
            }
        });

    if state.available_files.is_empty() {
        ui.label(format!("No .csv files in {}", state.config.data_dir.display()));
    }

    if let Some(path) = picked {
        // Failures land in the status line.
        state.load_file(&path);
    }
}

fn channel_list(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Channels");

    let options = state.channel_options();
    if options.is_empty() {
        ui.label("No log loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_channels();
        }
        if ui.small_button("None").clicked() {
            state.select_no_channels();
        }
    });

    // Column 0 is time, so option i is column i + 1.
    for (i, label) in options.iter().enumerate() {
        let mut checked = state.selected_channels.contains(label);
        let text = RichText::new(label).color(channel_color(i + 1));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_channel(label);
        }
    }
}

fn unit_selectors(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Units");

    for (kind, units) in state.unit_options() {
        let Some(&current) = state.unit_selection.get(&kind) else {
            continue;
        };
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("{kind}:"));
            egui::ComboBox::from_id_salt(("unit", kind))
                .selected_text(current.symbol())
                .show_ui(ui, |ui: &mut Ui| {
                    for &unit in units {
                        if ui.selectable_label(unit == current, unit.symbol()).clicked() {
                            state.set_unit(kind, unit);
                        }
                    }
                });
        });
    }
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
            if ui.button("Rescan folder").clicked() {
                state.refresh_file_list();
                ui.close_menu();
            }
        });

        ui.separator();

        let toggle_text = if state.panel_visible { "Hide Panel" } else { "Show Panel" };
        if ui.button(toggle_text).clicked() {
            state.toggle_panel();
        }

        if state.compact() {
            ui.label(RichText::new("default units").italics());
        }

        ui.separator();

        if let Some(table) = state.table.current() {
            ui.label(format!(
                "{} channels, {} rows, {} plotted",
                table.column_count().saturating_sub(1),
                table.row_count(),
                state.selected_channels.len()
            ));
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
        .set_title("Open telemetry log")
        .set_directory(&state.config.data_dir)
        .add_filter("CSV logs", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if state.load_file(&path) && !state.available_files.contains(&path) {
            state.available_files.push(path);
        }
    }
}
