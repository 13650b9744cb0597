//! Errors raised while loading a telemetry log.
//!
//! Only structural problems with a file are errors. Unknown channels,
//! unregistered conversions and empty selections all resolve to pass-through
//! behaviour and never show up here.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::loader::TextEncoding;

/// Reasons a log file cannot be turned into a table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes do not decode in the configured encoding.
    #[error("file is not valid {encoding} text: {reason}")]
    Encoding {
        encoding: TextEncoding,
        reason: String,
    },

    /// Name row or unit row absent.
    #[error("missing {0} row")]
    MissingHeader(&'static str),

    #[error("header has {names} column names but {units} unit symbols")]
    UnitCountMismatch { names: usize, units: usize },

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowLength {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("CSV syntax error: {0}")]
    Csv(#[from] csv::Error),
}
