use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MeasurementType – physical quantity family of a channel
// ---------------------------------------------------------------------------

/// The physical quantity a channel measures. Units are only interchangeable
/// within one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeasurementType {
    Pressure,
    Volume,
    Distance,
    Angle,
    Voltage,
    Speed,
    #[serde(alias = "Rotational Speed")]
    RotationalSpeed,
    Temperature,
    Time,
    Signal,
    Identifier,
    Unclassified,
}

impl MeasurementType {
    /// Every family that has a conversion table, in UI order.
    pub const REGISTERED: [MeasurementType; 11] = [
        MeasurementType::Pressure,
        MeasurementType::Volume,
        MeasurementType::Distance,
        MeasurementType::Angle,
        MeasurementType::Voltage,
        MeasurementType::Speed,
        MeasurementType::RotationalSpeed,
        MeasurementType::Temperature,
        MeasurementType::Time,
        MeasurementType::Signal,
        MeasurementType::Identifier,
    ];

    /// Units of this family, default unit first. Empty for `Unclassified`.
    pub fn units(self) -> &'static [Unit] {
        use Unit::*;
        match self {
            MeasurementType::Pressure => &[Bar, Millibar, Psi],
            MeasurementType::Volume => &[Liter, Milliliter, Gallon],
            MeasurementType::Distance => &[Millimeter, Centimeter, Meter, Inch],
            MeasurementType::Angle => &[Degree, Radian],
            MeasurementType::Voltage => &[Volt, Millivolt],
            MeasurementType::Speed => &[KilometersPerHour, MetersPerSecond, MilesPerHour],
            MeasurementType::RotationalSpeed => &[Rpm, Hertz],
            MeasurementType::Temperature => &[Celsius, Fahrenheit, Kelvin],
            MeasurementType::Time => &[Millisecond, Second],
            MeasurementType::Signal => &[SignalUnit],
            MeasurementType::Identifier => &[NoUnit],
            MeasurementType::Unclassified => &[],
        }
    }

    pub fn is_registered(self) -> bool {
        !self.units().is_empty()
    }

    pub fn contains(self, unit: Unit) -> bool {
        self.units().contains(&unit)
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementType::Pressure => "Pressure",
            MeasurementType::Volume => "Volume",
            MeasurementType::Distance => "Distance",
            MeasurementType::Angle => "Angle",
            MeasurementType::Voltage => "Voltage",
            MeasurementType::Speed => "Speed",
            MeasurementType::RotationalSpeed => "Rotational Speed",
            MeasurementType::Temperature => "Temperature",
            MeasurementType::Time => "Time",
            MeasurementType::Signal => "Signal",
            MeasurementType::Identifier => "Identifier",
            MeasurementType::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Unit – every unit symbol the conversion tables know about
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Bar,
    Millibar,
    Psi,
    Liter,
    Milliliter,
    Gallon,
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Degree,
    Radian,
    Volt,
    Millivolt,
    KilometersPerHour,
    MetersPerSecond,
    MilesPerHour,
    Rpm,
    Hertz,
    Celsius,
    Fahrenheit,
    Kelvin,
    Millisecond,
    Second,
    /// Dimensionless sensor output ("unit").
    SignalUnit,
    /// Identifier columns carry no unit ("none").
    NoUnit,
}

impl Unit {
    /// Symbol as written in log headers.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Bar => "bar",
            Unit::Millibar => "mbar",
            Unit::Psi => "psi",
            Unit::Liter => "l",
            Unit::Milliliter => "ml",
            Unit::Gallon => "gal",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Inch => "inch",
            Unit::Degree => "deg.",
            Unit::Radian => "rad",
            Unit::Volt => "V",
            Unit::Millivolt => "mV",
            Unit::KilometersPerHour => "km/h",
            Unit::MetersPerSecond => "m/s",
            Unit::MilesPerHour => "mph",
            Unit::Rpm => "RPM",
            Unit::Hertz => "Hz",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::Millisecond => "ms",
            Unit::Second => "s",
            Unit::SignalUnit => "unit",
            Unit::NoUnit => "none",
        }
    }

    /// Parse a header symbol. Matching is exact; anything else is not convertible.
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        MeasurementType::REGISTERED
            .iter()
            .flat_map(|kind| kind.units().iter().copied())
            .find(|unit| unit.symbol() == symbol)
    }

    /// How many of this unit make up one base unit of its family
    /// (bar, l, mm, deg., V, km/h, RPM, °C, ms).
    fn per_base(self) -> f64 {
        match self {
            Unit::Bar => 1.0,
            Unit::Millibar => 1000.0,
            Unit::Psi => 14.5038,
            Unit::Liter => 1.0,
            Unit::Milliliter => 1000.0,
            Unit::Gallon => 0.264172,
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 0.1,
            Unit::Meter => 0.001,
            Unit::Inch => 1.0 / 25.4,
            Unit::Degree => 1.0,
            Unit::Radian => PI / 180.0,
            Unit::Volt => 1.0,
            Unit::Millivolt => 1000.0,
            Unit::KilometersPerHour => 1.0,
            Unit::MetersPerSecond => 1.0 / 3.6,
            Unit::MilesPerHour => 0.621371,
            Unit::Rpm => 1.0,
            Unit::Hertz => 1.0 / 60.0,
            Unit::Millisecond => 1.0,
            Unit::Second => 0.001,
            // Affine temperature units are handled in to_base/from_base.
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => 1.0,
            Unit::SignalUnit | Unit::NoUnit => 1.0,
        }
    }

    fn to_base(self, x: f64) -> f64 {
        match self {
            Unit::Fahrenheit => (x - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => x - 273.15,
            other => x / other.per_base(),
        }
    }

    fn from_base(self, x: f64) -> f64 {
        match self {
            Unit::Fahrenheit => x * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => x + 273.15,
            other => x * other.per_base(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Whether `(kind, from, to)` is a declared conversion.
pub fn is_registered(kind: MeasurementType, from: Unit, to: Unit) -> bool {
    kind.contains(from) && kind.contains(to)
}

/// Convert one value. Unregistered triples return `value` untouched.
pub fn convert(kind: MeasurementType, from: Unit, to: Unit, value: f64) -> f64 {
    if from == to || !is_registered(kind, from, to) {
        return value;
    }
    to.from_base(from.to_base(value))
}

/// Convert a whole series element-wise.
///
/// Returns `None` when the triple is not registered so the caller can keep
/// both the original values and the original label.
pub fn convert_series(kind: MeasurementType, from: Unit, to: Unit, values: &[f64]) -> Option<Vec<f64>> {
    if !is_registered(kind, from, to) {
        return None;
    }
    Some(values.iter().map(|&v| convert(kind, from, to, v)).collect())
}

// ---------------------------------------------------------------------------
// UnitRegistry – default units per family
// ---------------------------------------------------------------------------

/// Target unit chosen for each family.
pub type UnitSelection = BTreeMap<MeasurementType, Unit>;

/// Immutable per-session view of the conversion tables, including any
/// configured default-unit overrides.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    defaults: BTreeMap<MeasurementType, Unit>,
}

impl UnitRegistry {
    /// Build a registry with default-unit overrides. Overrides naming a unit
    /// outside the family are dropped.
    pub fn with_defaults<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (MeasurementType, Unit)>,
    {
        let mut defaults = BTreeMap::new();
        for (kind, unit) in overrides {
            if kind.contains(unit) {
                defaults.insert(kind, unit);
            } else {
                log::warn!("Ignoring default unit {unit} for {kind}: not a {kind} unit");
            }
        }
        UnitRegistry { defaults }
    }

    pub fn units_for(&self, kind: MeasurementType) -> &'static [Unit] {
        kind.units()
    }

    /// Configured default, else the first unit of the family.
    pub fn default_unit(&self, kind: MeasurementType) -> Option<Unit> {
        self.defaults
            .get(&kind)
            .copied()
            .or_else(|| kind.units().first().copied())
    }

    /// The default unit of every registered family.
    pub fn default_selection(&self) -> UnitSelection {
        MeasurementType::REGISTERED
            .iter()
            .filter_map(|&kind| self.default_unit(kind).map(|unit| (kind, unit)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_temperature_examples() {
        use MeasurementType::Temperature;
        assert_eq!(convert(Temperature, Unit::Celsius, Unit::Kelvin, 0.0), 273.15);
        assert_eq!(convert(Temperature, Unit::Celsius, Unit::Fahrenheit, 100.0), 212.0);
        assert_eq!(convert(Temperature, Unit::Fahrenheit, Unit::Celsius, -40.0), -40.0);
    }

    #[test]
    fn test_bar_to_psi() {
        let psi = convert(MeasurementType::Pressure, Unit::Bar, Unit::Psi, 1.0);
        assert!((psi - 14.5038).abs() < 1e-9);
    }

    #[test]
    fn test_identity_is_exact() {
        for kind in MeasurementType::REGISTERED {
            for &unit in kind.units() {
                for x in [0.0, -3.75, 1234.5678, f64::MIN_POSITIVE] {
                    assert_eq!(convert(kind, unit, unit, x).to_bits(), x.to_bits());
                }
            }
        }
    }

    #[test]
    fn test_every_declared_pair_round_trips() {
        for kind in MeasurementType::REGISTERED {
            for &a in kind.units() {
                for &b in kind.units() {
                    for x in [0.0, 1.0, -40.0, 12.345, 98765.4321] {
                        let there = convert(kind, a, b, x);
                        let back = convert(kind, b, a, there);
                        assert!(close(back, x), "{kind}: {a} -> {b} -> {a} gave {back} for {x}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_cross_family_request_is_noop() {
        let x = 3.3;
        let y = convert(MeasurementType::Pressure, Unit::Bar, Unit::Celsius, x);
        assert_eq!(y.to_bits(), x.to_bits());
        assert!(convert_series(MeasurementType::Pressure, Unit::Bar, Unit::Celsius, &[x]).is_none());
        assert!(convert_series(MeasurementType::Unclassified, Unit::Bar, Unit::Psi, &[x]).is_none());
    }

    #[test]
    fn test_convert_series_preserves_order_and_count() {
        let out = convert_series(
            MeasurementType::Time,
            Unit::Second,
            Unit::Millisecond,
            &[0.5, 1.0, 2.25],
        )
        .unwrap();
        assert_eq!(out, vec![500.0, 1000.0, 2250.0]);
    }

    #[test]
    fn test_symbols_round_trip_through_parser() {
        for kind in MeasurementType::REGISTERED {
            for &unit in kind.units() {
                assert_eq!(Unit::from_symbol(unit.symbol()), Some(unit));
            }
        }
        assert_eq!(Unit::from_symbol("°R"), None);
        assert_eq!(Unit::from_symbol("Bar"), None);
    }

    #[test]
    fn test_default_unit_is_first_unless_overridden() {
        let registry = UnitRegistry::default();
        assert_eq!(registry.default_unit(MeasurementType::Pressure), Some(Unit::Bar));
        assert_eq!(registry.default_unit(MeasurementType::Unclassified), None);

        let registry = UnitRegistry::with_defaults([
            (MeasurementType::Pressure, Unit::Psi),
            (MeasurementType::Speed, Unit::Kelvin),
        ]);
        assert_eq!(registry.default_unit(MeasurementType::Pressure), Some(Unit::Psi));
        assert_eq!(registry.default_unit(MeasurementType::Speed), Some(Unit::KilometersPerHour));
        assert_eq!(registry.default_selection().len(), MeasurementType::REGISTERED.len());
    }

    #[test]
    fn test_measurement_type_accepts_spaced_name() {
        let kind: MeasurementType = serde_json::from_str("\"Rotational Speed\"").unwrap();
        assert_eq!(kind, MeasurementType::RotationalSpeed);
        assert_eq!(kind.to_string(), "Rotational Speed");
    }
}
