use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// RawColumn – one CSV column
// ---------------------------------------------------------------------------

/// A single column of the log, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    /// Channel name from the first header row (may repeat across columns).
    pub name: String,
    /// Unit symbol from the second header row, kept verbatim.
    pub unit: String,
    /// One sample per data row.
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Make channel names unique: the first occurrence keeps its name, later ones
/// get `_2`, `_3`, … in order of appearance.
pub fn dedup_labels<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.to_string()
            } else {
                format!("{name}_{count}")
            }
        })
        .collect()
}

/// `"<channel> (<unit>)"`
pub fn display_label(channel: &str, unit: &str) -> String {
    format!("{channel} ({unit})")
}

/// Channel part of a display label: everything before the first `" ("`.
pub fn channel_of(display: &str) -> &str {
    display.split_once(" (").map_or(display, |(channel, _)| channel)
}

// ---------------------------------------------------------------------------
// LogTable – a parsed log
// ---------------------------------------------------------------------------

/// A fully loaded log. Column 0 is the time axis; all columns have the same
/// number of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTable {
    columns: Vec<RawColumn>,
    channel_labels: Vec<String>,
    display_labels: Vec<String>,
    /// ChannelLabel → unit symbol as found in the file.
    units: BTreeMap<String, String>,
}

impl LogTable {
    /// Derive labels from the columns. Callers guarantee equal column lengths.
    pub fn from_columns(columns: Vec<RawColumn>) -> Self {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let channel_labels = dedup_labels(&names);
        let display_labels = channel_labels
            .iter()
            .zip(&columns)
            .map(|(channel, col)| display_label(channel, &col.unit))
            .collect();
        let units = channel_labels
            .iter()
            .zip(&columns)
            .map(|(channel, col)| (channel.clone(), col.unit.clone()))
            .collect();

        LogTable {
            columns,
            channel_labels,
            display_labels,
            units,
        }
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }

    pub fn display_labels(&self) -> &[String] {
        &self.display_labels
    }

    /// Display labels of the data channels (everything but the time axis).
    pub fn data_labels(&self) -> &[String] {
        self.display_labels.get(1..).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn units(&self) -> &BTreeMap<String, String> {
        &self.units
    }

    /// Unit symbol recorded for a channel label.
    pub fn unit_of(&self, channel: &str) -> Option<&str> {
        self.units.get(channel).map(String::as_str)
    }

    pub fn time_column(&self) -> Option<&RawColumn> {
        self.columns.first()
    }

    /// Column index of a display label.
    pub fn position_of(&self, display: &str) -> Option<usize> {
        self.display_labels.iter().position(|label| label == display)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, unit: &str) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            unit: unit.to_string(),
            values: vec![0.0, 1.0],
        }
    }

    #[test]
    fn test_dedup_engine_header() {
        let labels = dedup_labels(&["Time", "Boost pressure", "Engine oil level", "Engine oil level"]);
        assert_eq!(
            labels,
            vec!["Time", "Boost pressure", "Engine oil level", "Engine oil level_2"]
        );
    }

    #[test]
    fn test_dedup_counts_each_name_separately() {
        let labels = dedup_labels(&["A", "B", "A", "A", "B"]);
        assert_eq!(labels, vec!["A", "B", "A_2", "A_3", "B_2"]);
    }

    #[test]
    fn test_channel_of_splits_at_first_paren() {
        assert_eq!(channel_of("Engine oil level_2 (mm)"), "Engine oil level_2");
        assert_eq!(channel_of("Fuel pressure (Measured) (bar)"), "Fuel pressure");
        assert_eq!(channel_of("TAG"), "TAG");
    }

    #[test]
    fn test_table_labels_and_units() {
        let table = LogTable::from_columns(vec![
            column("Time", "s"),
            column("Engine oil level", "l"),
            column("Engine oil level", "mm"),
        ]);

        assert_eq!(
            table.display_labels(),
            &["Time (s)", "Engine oil level (l)", "Engine oil level_2 (mm)"]
        );
        assert_eq!(table.data_labels().len(), 2);
        assert_eq!(table.unit_of("Engine oil level_2"), Some("mm"));
        assert_eq!(table.unit_of("Engine oil level"), Some("l"));
        assert_eq!(table.position_of("Engine oil level_2 (mm)"), Some(2));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.units().len(), 3);
    }
}
