use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::model::{LogTable, RawColumn};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Text encoding
// ---------------------------------------------------------------------------

/// Text encoding of a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// UTF-16 with byte-order sniffing; little-endian when no BOM is present.
    #[default]
    #[serde(rename = "utf-16", alias = "utf16")]
    Utf16,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16 => "UTF-16",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Latin1 => "Latin-1",
        };
        f.write_str(name)
    }
}

/// Decode raw file bytes, stripping any byte-order mark.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, ParseError> {
    let invalid = |reason: String| ParseError::Encoding { encoding, reason };

    let text = match encoding {
        TextEncoding::Utf8 => {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            std::str::from_utf8(body)
                .map_err(|e| invalid(e.to_string()))?
                .to_string()
        }
        TextEncoding::Utf16 => match bytes {
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map_err(invalid)?,
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map_err(invalid)?,
            _ => decode_utf16(bytes, u16::from_le_bytes).map_err(invalid)?,
        },
        TextEncoding::Utf16Le => {
            let body = bytes.strip_prefix(b"\xFF\xFE").unwrap_or(bytes);
            decode_utf16(body, u16::from_le_bytes).map_err(invalid)?
        }
        TextEncoding::Utf16Be => {
            let body = bytes.strip_prefix(b"\xFE\xFF").unwrap_or(bytes);
            decode_utf16(body, u16::from_be_bytes).map_err(invalid)?
        }
        TextEncoding::Latin1 => {
            // Multi-byte UTF-8 read byte-wise would turn "°C" into "Â°C".
            if !bytes.is_ascii() && std::str::from_utf8(bytes).is_ok() {
                return Err(invalid("looks like UTF-8".to_string()));
            }
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    };

    // Wide text read as a narrow encoding shows up as interleaved NULs.
    if text.contains('\0') {
        return Err(invalid("text contains NUL characters".to_string()));
    }
    Ok(text)
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("odd byte count {}", bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Log parser
// ---------------------------------------------------------------------------

/// Load a telemetry log from disk.
///
/// Layout: row 1 = channel names, row 2 = unit symbols, then one numeric row
/// per sample. Column 0 is the time axis.
pub fn load_file(path: &Path, encoding: TextEncoding) -> Result<LogTable, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes, encoding)
}

/// Parse an in-memory log. No partial table is ever returned.
pub fn parse_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<LogTable, ParseError> {
    let text = decode(bytes, encoding)?;
    parse_text(&text)
}

fn parse_text(text: &str) -> Result<LogTable, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let names = records
        .next()
        .transpose()?
        .ok_or(ParseError::MissingHeader("column name"))?;
    if names.iter().all(str::is_empty) {
        return Err(ParseError::MissingHeader("column name"));
    }
    let units = records
        .next()
        .transpose()?
        .ok_or(ParseError::MissingHeader("unit"))?;
    if units.len() != names.len() {
        return Err(ParseError::UnitCountMismatch {
            names: names.len(),
            units: units.len(),
        });
    }

    let mut columns: Vec<RawColumn> = names
        .iter()
        .zip(units.iter())
        .map(|(name, unit)| RawColumn {
            name: name.to_string(),
            unit: unit.to_string(),
            values: Vec::new(),
        })
        .collect();

    for (row_no, result) in records.enumerate() {
        let record = result?;
        // Header rows are lines 1 and 2.
        let line = record
            .position()
            .map_or(row_no as u64 + 3, |pos| pos.line());

        if record.len() != columns.len() {
            return Err(ParseError::RowLength {
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }

        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.values.push(parse_sample(field).ok_or_else(|| {
                ParseError::InvalidNumber {
                    line,
                    column: column.name.clone(),
                    value: field.to_string(),
                }
            })?);
        }
    }

    let table = LogTable::from_columns(columns);
    let renamed: Vec<&str> = table
        .columns()
        .iter()
        .zip(table.channel_labels())
        .filter(|(column, label)| column.name != **label)
        .map(|(_, label)| label.as_str())
        .collect();
    if !renamed.is_empty() {
        log::debug!("Repeated channel names renamed to {}", renamed.join(", "));
    }
    Ok(table)
}

/// Empty fields are missing samples.
fn parse_sample(field: &str) -> Option<f64> {
    if field.is_empty() {
        return Some(f64::NAN);
    }
    field.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

/// CSV files in `dir`, sorted by file name.
pub fn list_logs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing log directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("reading directory entry")?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
