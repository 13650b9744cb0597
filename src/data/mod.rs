/// Data layer: log parsing, channel classification and series resolution.
///
/// Architecture:
/// ```text
///  two-row-header .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → LogTable (deduplicated labels, units)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ snapshot  │  Arc<LogTable>, swapped whole on every load
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐   classifier: label → MeasurementType
///   │ resolver  │   units:      per-family conversion
///   └──────────┘
///        │
///        ▼
///     Vec<Series>  → plot
/// ```

pub mod classifier;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod snapshot;
