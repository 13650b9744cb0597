//! Session configuration: where logs live, how they are encoded and which
//! units each family starts in.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::classifier::ChannelClassifier;
use crate::data::loader::TextEncoding;
use crate::units::{MeasurementType, Unit, UnitRegistry};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "telemetry-grapher.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory scanned for `.csv` logs.
    pub data_dir: PathBuf,
    pub encoding: TextEncoding,
    /// Family → unit symbol shown by default (and in compact mode).
    pub default_units: BTreeMap<MeasurementType, String>,
    /// Extra or replacement channel classifications, keyed by channel label.
    pub channel_types: BTreeMap<String, MeasurementType>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            encoding: TextEncoding::default(),
            default_units: BTreeMap::new(),
            channel_types: BTreeMap::new(),
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Like [`ViewerConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Registry with the configured default units. Unknown symbols are skipped.
    pub fn registry(&self) -> UnitRegistry {
        let overrides = self.default_units.iter().filter_map(|(&kind, symbol)| {
            let unit = Unit::from_symbol(symbol);
            if unit.is_none() {
                log::warn!("Ignoring unknown default unit '{symbol}' for {kind}");
            }
            unit.map(|u| (kind, u))
        });
        UnitRegistry::with_defaults(overrides)
    }

    pub fn classifier(&self) -> ChannelClassifier {
        ChannelClassifier::with_overrides(self.channel_types.clone())
    }
}
