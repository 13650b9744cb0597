//! Writes a synthetic engine log in the logger's export format: UTF-16LE
//! with BOM, a channel-name row, a unit row, then one sample per row.
//!
//! Usage: `generate_sample [output.csv] [seconds]`

use std::f64::consts::TAU;
use std::path::PathBuf;

use anyhow::{Context, Result};

const SAMPLE_RATE_HZ: f64 = 10.0;

/// Channel name, unit, and a generator over (time, noise).
struct Channel {
    name: &'static str,
    unit: &'static str,
    value: fn(f64, f64) -> f64,
}

const CHANNELS: &[Channel] = &[
    Channel {
        name: "Engine speed",
        unit: "RPM",
        value: |t, n| 2500.0 + 1500.0 * (TAU * t / 20.0).sin() + 25.0 * n,
    },
    Channel {
        name: "Vehicle speed",
        unit: "km/h",
        value: |t, n| (60.0 + 40.0 * (TAU * t / 20.0).sin() + 0.5 * n).max(0.0),
    },
    Channel {
        name: "Boost pressure",
        unit: "bar",
        value: |t, n| 1.0 + 0.6 * (TAU * t / 20.0).sin().max(0.0) + 0.02 * n,
    },
    Channel {
        name: "Engine temperature",
        unit: "°C",
        value: |t, n| 90.0 - 60.0 * (-t / 120.0).exp() + 0.1 * n,
    },
    Channel {
        name: "Air temperature",
        unit: "°C",
        value: |_, n| 24.0 + 0.2 * n,
    },
    Channel {
        name: "Battery voltage",
        unit: "V",
        value: |t, n| 13.8 - 0.3 * (TAU * t / 7.0).cos() + 0.02 * n,
    },
    Channel {
        name: "Spark advance",
        unit: "deg.",
        value: |t, n| 12.0 + 8.0 * (TAU * t / 20.0).sin() + 0.3 * n,
    },
    Channel {
        name: "Injection time",
        unit: "ms",
        value: |t, n| 3.0 + 1.5 * (TAU * t / 20.0).sin() + 0.05 * n,
    },
    Channel {
        name: "Engine oil level",
        unit: "l",
        value: |t, n| 4.2 - 0.0005 * t + 0.005 * n,
    },
    // Second oil level sensor: dipstick depth.
    Channel {
        name: "Engine oil level",
        unit: "mm",
        value: |t, n| 42.0 - 0.005 * t + 0.05 * n,
    },
    Channel {
        name: "Knock sensor signal",
        unit: "unit",
        value: |_, n| n.abs() * 0.4,
    },
    Channel {
        name: "Lambda",
        unit: "-",
        value: |t, n| 1.0 + 0.03 * (TAU * t / 3.0).sin() + 0.005 * n,
    },
];

/// Deterministic noise source (splitmix64 mapped to [-1, 1)).
struct Noise(u64);

impl Noise {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "sample_log.csv".to_string()));
    let seconds: f64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration '{s}'"))?,
        None => 120.0,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(std::iter::once("Time").chain(CHANNELS.iter().map(|c| c.name)))?;
    writer.write_record(std::iter::once("s").chain(CHANNELS.iter().map(|c| c.unit)))?;

    let mut noise = Noise(42);
    let rows = (seconds * SAMPLE_RATE_HZ).round() as usize;
    for i in 0..rows {
        let t = i as f64 / SAMPLE_RATE_HZ;
        let mut record = vec![format!("{t:.1}")];
        record.extend(
            CHANNELS
                .iter()
                .map(|c| format!("{:.3}", (c.value)(t, noise.next()))),
        );
        writer.write_record(&record)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {e}"))?;
    let text = String::from_utf8(buffer).context("CSV output is not UTF-8")?;
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    std::fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
    log::info!("Wrote {rows} rows × {} channels", CHANNELS.len() + 1);
    println!("Wrote {}", output.display());
    Ok(())
}
