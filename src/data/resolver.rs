use std::collections::BTreeSet;

use super::classifier::ChannelClassifier;
use super::model::{channel_of, display_label, LogTable};
use crate::units::{convert_series, Unit, UnitRegistry, UnitSelection};

// ---------------------------------------------------------------------------
// Series – one renderable line
// ---------------------------------------------------------------------------

/// A line ready for the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Time axis, never converted.
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Legend text, carrying the unit actually plotted.
    pub label: String,
    /// Source column index, used for stable colouring.
    pub column: usize,
}

// ---------------------------------------------------------------------------
// SeriesResolver
// ---------------------------------------------------------------------------

/// Turns selected display labels into converted, relabelled series.
pub struct SeriesResolver<'a> {
    table: &'a LogTable,
    classifier: &'a ChannelClassifier,
    registry: &'a UnitRegistry,
}

impl<'a> SeriesResolver<'a> {
    pub fn new(table: &'a LogTable, classifier: &'a ChannelClassifier, registry: &'a UnitRegistry) -> Self {
        Self {
            table,
            classifier,
            registry,
        }
    }

    /// Resolve a single display label against the target units.
    ///
    /// Channels whose family or source unit is not registered, and targets
    /// outside the channel's family, pass through with their original label.
    /// Returns `None` only when the label is not a column of the table.
    pub fn resolve(&self, display: &str, targets: &UnitSelection) -> Option<Series> {
        let column = self.table.position_of(display)?;
        self.resolve_column(column, targets)
    }

    /// Resolve the column at `column`, always from that column's own values.
    ///
    /// Returns `None` for the time axis or an out-of-range index.
    pub fn resolve_column(&self, column: usize, targets: &UnitSelection) -> Option<Series> {
        if column == 0 {
            return None;
        }
        let display = self.table.display_labels().get(column)?;
        let channel = channel_of(display);
        let x = self.table.time_column()?.values.clone();
        let values = &self.table.columns()[column].values;

        let kind = self.classifier.classify(channel);
        let source = self.table.unit_of(channel).and_then(Unit::from_symbol);

        let converted = source
            .filter(|&unit| kind.contains(unit))
            .and_then(|from| {
                let to = targets
                    .get(&kind)
                    .copied()
                    .or_else(|| self.registry.default_unit(kind))?;
                if to == from {
                    return None;
                }
                let y = convert_series(kind, from, to, values)?;
                log::debug!("{channel}: {from} -> {to} ({kind})");
                Some((y, display_label(channel, to.symbol())))
            });

        let (y, label) = converted.unwrap_or_else(|| (values.clone(), display.clone()));
        Some(Series { x, y, label, column })
    }

    /// Resolve every selected label in order. Unknown labels are skipped.
    ///
    /// A label shared by several columns yields one series per column, each
    /// from its own values; a column is never emitted twice.
    pub fn resolve_all<'s, I>(&self, selected: I, targets: &UnitSelection) -> Vec<Series>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let labels = self.table.display_labels();
        let mut emitted = BTreeSet::new();
        let mut series = Vec::new();
        for display in selected {
            let Some(first) = self.resolve(display, targets) else {
                log::warn!("Selected channel '{display}' is not in the loaded log");
                continue;
            };
            let later: Vec<usize> = (first.column + 1..labels.len())
                .filter(|&c| labels[c] == display)
                .collect();
            if emitted.insert(first.column) {
                series.push(first);
            }
            for column in later {
                if emitted.insert(column) {
                    series.extend(self.resolve_column(column, targets));
                }
            }
        }
        series
    }
}
