use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::data::classifier::ChannelClassifier;
use crate::data::loader::{list_logs, load_file};
use crate::data::resolver::{Series, SeriesResolver};
use crate::data::snapshot::TableHandle;
use crate::units::{MeasurementType, Unit, UnitRegistry, UnitSelection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,
    pub registry: UnitRegistry,
    pub classifier: ChannelClassifier,

    /// Currently loaded log (empty until a file loads successfully).
    pub table: TableHandle,

    /// `.csv` files found in the data directory.
    pub available_files: Vec<PathBuf>,

    /// File the current table came from.
    pub current_file: Option<PathBuf>,

    /// Display labels ticked in the channel list.
    pub selected_channels: BTreeSet<String>,

    /// Target unit per family, as chosen in the side panel.
    pub unit_selection: UnitSelection,

    /// Hiding the panel switches to compact mode (default units only).
    pub panel_visible: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let registry = config.registry();
        let classifier = config.classifier();
        let unit_selection = registry.default_selection();
        Self {
            config,
            registry,
            classifier,
            table: TableHandle::default(),
            available_files: Vec::new(),
            current_file: None,
            selected_channels: BTreeSet::new(),
            unit_selection,
            panel_visible: true,
            status_message: None,
        }
    }

    /// Rescan the data directory for logs.
    pub fn refresh_file_list(&mut self) {
        match list_logs(&self.config.data_dir) {
            Ok(files) => self.available_files = files,
            Err(e) => {
                log::error!("{e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Parse `path` and make it the current table. Returns whether it loaded.
    ///
    /// On failure the previous table stays loaded and the error goes to the
    /// status line.
    pub fn load_file(&mut self, path: &Path) -> bool {
        match load_file(path, self.config.encoding) {
            Ok(table) => {
                log::info!(
                    "Loaded {} with {} channels and {} rows",
                    path.display(),
                    table.data_labels().len(),
                    table.row_count()
                );
                // Every data channel starts ticked.
                self.selected_channels = table.data_labels().iter().cloned().collect();
                self.table.replace(table);
                self.current_file = Some(path.to_path_buf());
                self.status_message = None;
                true
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    pub fn compact(&self) -> bool {
        !self.panel_visible
    }

    pub fn toggle_panel(&mut self) {
        self.panel_visible = !self.panel_visible;
    }

    /// Units the chart should use right now.
    pub fn effective_units(&self) -> UnitSelection {
        if self.compact() {
            self.registry.default_selection()
        } else {
            self.unit_selection.clone()
        }
    }

    pub fn set_unit(&mut self, kind: MeasurementType, unit: Unit) {
        if kind.contains(unit) {
            self.unit_selection.insert(kind, unit);
        } else {
            log::warn!("{unit} is not a {kind} unit");
        }
    }

    /// Data channel display labels in file order.
    pub fn channel_options(&self) -> Vec<String> {
        self.table
            .current()
            .map(|table| table.data_labels().to_vec())
            .unwrap_or_default()
    }

    /// Unit choices for every family the classifier knows about.
    pub fn unit_options(&self) -> BTreeMap<MeasurementType, &'static [Unit]> {
        self.classifier
            .families()
            .into_iter()
            .map(|kind| (kind, self.registry.units_for(kind)))
            .collect()
    }

    pub fn toggle_channel(&mut self, label: &str) {
        if !self.selected_channels.remove(label) {
            self.selected_channels.insert(label.to_string());
        }
    }

    pub fn select_all_channels(&mut self) {
        self.selected_channels = self.channel_options().into_iter().collect();
    }

    pub fn select_no_channels(&mut self) {
        self.selected_channels.clear();
    }

    /// Title for the x axis: the time column's display label.
    pub fn time_axis_label(&self) -> Option<String> {
        let table = self.table.current()?;
        table.display_labels().first().cloned()
    }

    /// Series for the chart, in file order.
    pub fn series(&self) -> Vec<Series> {
        let Some(table) = self.table.current() else {
            return Vec::new();
        };
        let resolver = SeriesResolver::new(&table, &self.classifier, &self.registry);
        let selected = table
            .data_labels()
            .iter()
            .filter(|label| self.selected_channels.contains(*label))
            .map(String::as_str);
        resolver.resolve_all(selected, &self.effective_units())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOG: &str = "Time,Engine temperature,Engine oil level,Engine oil level\n\
                       s,°C,l,mm\n\
                       0,80,4.0,25.4\n\
                       1,90,4.0,25.4\n";

    fn utf8_config() -> ViewerConfig {
        ViewerConfig {
            encoding: crate::data::loader::TextEncoding::Utf8,
            ..ViewerConfig::default()
        }
    }

    fn write_log(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_empty_state_has_nothing_to_plot() {
        let state = AppState::new(utf8_config());
        assert!(state.series().is_empty());
        assert!(state.channel_options().is_empty());
        assert_eq!(state.unit_options().len(), MeasurementType::REGISTERED.len());
    }

    #[test]
    fn test_load_selects_all_channels() {
        let file = write_log(LOG);
        let mut state = AppState::new(utf8_config());
        assert!(state.load_file(file.path()));

        assert_eq!(
            state.channel_options(),
            vec![
                "Engine temperature (°C)",
                "Engine oil level (l)",
                "Engine oil level_2 (mm)"
            ]
        );
        assert_eq!(state.series().len(), 3);
        assert_eq!(state.time_axis_label().as_deref(), Some("Time (s)"));
    }

    #[test]
    fn test_zero_selection_yields_no_series() {
        let file = write_log(LOG);
        let mut state = AppState::new(utf8_config());
        assert!(state.load_file(file.path()));

        state.select_no_channels();
        assert!(state.series().is_empty());

        state.toggle_channel("Engine temperature (°C)");
        assert_eq!(state.series().len(), 1);
        state.select_all_channels();
        assert_eq!(state.series().len(), 3);
    }

    #[test]
    fn test_compact_mode_forces_default_units() {
        let file = write_log(LOG);
        let mut state = AppState::new(utf8_config());
        assert!(state.load_file(file.path()));
        state.select_no_channels();
        state.toggle_channel("Engine temperature (°C)");
        state.set_unit(MeasurementType::Temperature, Unit::Kelvin);

        let series = state.series();
        assert_eq!(series[0].label, "Engine temperature (K)");
        assert_eq!(series[0].y, vec![353.15, 363.15]);

        state.toggle_panel();
        assert!(state.compact());
        let series = state.series();
        assert_eq!(series[0].label, "Engine temperature (°C)");
        assert_eq!(series[0].y, vec![80.0, 90.0]);
    }

    #[test]
    fn test_colliding_labels_plot_their_own_columns() {
        let file = write_log("Time,A,A,A_2\ns,bar,bar,bar\n0,1,2,3\n");
        let mut state = AppState::new(utf8_config());
        assert!(state.load_file(file.path()));

        let series = state.series();
        let plotted: Vec<(usize, Vec<f64>)> =
            series.iter().map(|s| (s.column, s.y.clone())).collect();
        assert_eq!(
            plotted,
            vec![(1, vec![1.0]), (2, vec![2.0]), (3, vec![3.0])]
        );
    }

    #[test]
    fn test_set_unit_rejects_foreign_unit() {
        let mut state = AppState::new(utf8_config());
        state.set_unit(MeasurementType::Pressure, Unit::Kelvin);
        assert_eq!(state.unit_selection[&MeasurementType::Pressure], Unit::Bar);
    }

    #[test]
    fn test_failed_reload_keeps_previous_table() {
        let good = write_log(LOG);
        let bad = write_log("Time,A\ns\n0,1\n");
        let mut state = AppState::new(utf8_config());
        assert!(state.load_file(good.path()));

        assert!(!state.load_file(bad.path()));
        assert!(state.status_message.is_some());
        assert_eq!(state.channel_options().len(), 3);
        assert_eq!(state.current_file.as_deref(), Some(good.path()));
    }

    #[test]
    fn test_refresh_file_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run1.csv"), LOG).unwrap();
        let mut state = AppState::new(ViewerConfig {
            data_dir: dir.path().to_path_buf(),
            ..utf8_config()
        });
        state.refresh_file_list();
        assert_eq!(state.available_files.len(), 1);
    }
}
