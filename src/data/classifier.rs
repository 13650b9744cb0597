use std::collections::{BTreeSet, HashMap};

use crate::units::MeasurementType;

/// Engine channels known out of the box.
///
/// Keys are exact channel labels, suffix included: the second
/// "Engine oil level" column is a dipstick distance, not a volume.
const ENGINE_CHANNELS: &[(&str, MeasurementType)] = &[
    ("Boost pressure", MeasurementType::Pressure),
    ("Engine oil pressure", MeasurementType::Pressure),
    ("Fuel pressure (Measured)", MeasurementType::Pressure),
    ("Fuel pressure (Calculated)", MeasurementType::Pressure),
    ("Engine oil level", MeasurementType::Volume),
    ("Engine oil level_2", MeasurementType::Distance),
    ("Cam position", MeasurementType::Angle),
    ("Spark advance", MeasurementType::Angle),
    ("Spark advance (calculated)", MeasurementType::Angle),
    ("Spark advance reduction (Cyl. 1)", MeasurementType::Angle),
    ("Spark advance reduction (Cyl. 2)", MeasurementType::Angle),
    ("Spark advance reduction (Cyl. 3)", MeasurementType::Angle),
    ("Spark advance reduction (Cyl. 4)", MeasurementType::Angle),
    ("Battery voltage", MeasurementType::Voltage),
    ("Vehicle speed", MeasurementType::Speed),
    ("Engine speed", MeasurementType::RotationalSpeed),
    ("Engine temperature", MeasurementType::Temperature),
    ("Air temperature", MeasurementType::Temperature),
    ("Air temperature (Boost/Manifold)", MeasurementType::Temperature),
    ("Engine oil temperature", MeasurementType::Temperature),
    ("UniAir oil temperature", MeasurementType::Temperature),
    ("Injection time", MeasurementType::Time),
    ("Injection time correction", MeasurementType::Time),
    ("Coil 1 charge time", MeasurementType::Time),
    ("Coil 2 charge time", MeasurementType::Time),
    ("Coil 3 charge time", MeasurementType::Time),
    ("Coil 4 charge time", MeasurementType::Time),
    ("Knock sensor signal", MeasurementType::Signal),
    ("Knock sensor signal (Cyl. 1)", MeasurementType::Signal),
    ("Knock sensor signal (Cyl. 2)", MeasurementType::Signal),
    ("Knock sensor signal (Cyl. 3)", MeasurementType::Signal),
    ("TAG", MeasurementType::Identifier),
];

/// Maps channel labels to measurement families.
#[derive(Debug, Clone)]
pub struct ChannelClassifier {
    table: HashMap<String, MeasurementType>,
}

impl Default for ChannelClassifier {
    fn default() -> Self {
        Self {
            table: ENGINE_CHANNELS
                .iter()
                .map(|&(label, kind)| (label.to_string(), kind))
                .collect(),
        }
    }
}

impl ChannelClassifier {
    /// Built-in table plus extra entries; extras win on conflict.
    pub fn with_overrides<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, MeasurementType)>,
    {
        let mut classifier = Self::default();
        classifier.table.extend(extra);
        classifier
    }

    /// Exact lookup; a suffixed label never falls back to its root name.
    pub fn classify(&self, label: &str) -> MeasurementType {
        self.table
            .get(label)
            .copied()
            .unwrap_or(MeasurementType::Unclassified)
    }

    /// Families that at least one table entry maps to.
    pub fn families(&self) -> BTreeSet<MeasurementType> {
        self.table
            .values()
            .copied()
            .filter(|kind| kind.is_registered())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oil_level_occurrences_classify_independently() {
        let classifier = ChannelClassifier::default();
        assert_eq!(classifier.classify("Engine oil level"), MeasurementType::Volume);
        assert_eq!(classifier.classify("Engine oil level_2"), MeasurementType::Distance);
    }

    #[test]
    fn test_unknown_and_unlisted_suffix_are_unclassified() {
        let classifier = ChannelClassifier::default();
        assert_eq!(classifier.classify("Lambda"), MeasurementType::Unclassified);
        assert_eq!(classifier.classify("Boost pressure_2"), MeasurementType::Unclassified);
        assert_eq!(classifier.classify("Time"), MeasurementType::Unclassified);
    }

    #[test]
    fn test_overrides_extend_and_replace() {
        let classifier = ChannelClassifier::with_overrides([
            ("Lambda".to_string(), MeasurementType::Signal),
            ("TAG".to_string(), MeasurementType::Time),
        ]);
        assert_eq!(classifier.classify("Lambda"), MeasurementType::Signal);
        assert_eq!(classifier.classify("TAG"), MeasurementType::Time);
        assert_eq!(classifier.classify("Boost pressure"), MeasurementType::Pressure);
    }

    #[test]
    fn test_families_cover_builtin_table() {
        let families = ChannelClassifier::default().families();
        assert_eq!(families.len(), MeasurementType::REGISTERED.len());
        assert!(!families.contains(&MeasurementType::Unclassified));
    }
}
