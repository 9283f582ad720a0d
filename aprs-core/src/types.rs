//! Shared types and error enum for aprs-core.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by aprs-core.
///
/// Three kinds: malformed wire input (`Parse`), in-memory values that cannot
/// be represented in the requested wire form (`Encode`), and recognized but
/// unimplemented data type identifiers (`Unsupported`, strict dispatch only).
#[derive(Debug, Error)]
pub enum AprsError {
    #[error("parse error in {field}: {reason}")]
    Parse { field: &'static str, reason: String },
    #[error("cannot encode {field}: {reason}")]
    Encode { field: &'static str, reason: String },
    #[error("unsupported data type identifier {0:?}")]
    Unsupported(char),
}

impl AprsError {
    /// Malformed or out-of-domain input. `field` names the wire field,
    /// `reason` includes the offending substring.
    pub fn parse(field: &'static str, reason: impl Into<String>) -> Self {
        AprsError::Parse {
            field,
            reason: reason.into(),
        }
    }

    /// Value cannot be represented in the requested wire form.
    pub fn encode(field: &'static str, reason: impl Into<String>) -> Self {
        AprsError::Encode {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AprsError>;

/// APRS symbol table selector and symbol code.
///
/// The table is `/` (primary), `\` (alternate), or an overlay character; the
/// id selects the symbol within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolRef {
    pub table: char,
    pub id: char,
}

impl SymbolRef {
    pub fn new(table: char, id: char) -> Self {
        SymbolRef { table, id }
    }

    /// True for the `/` + `\` pair that marks a DF (direction-finding) report.
    pub fn is_df_report(&self) -> bool {
        self.table == '/' && self.id == '\\'
    }

    /// True for the `_` symbol id that marks a weather report.
    pub fn is_weather(&self) -> bool {
        (self.table == '/' || self.table == '\\') && self.id == '_'
    }
}

/// Round to 6 decimal places. Coordinate precision used throughout.
pub(crate) fn round6(val: f64) -> f64 {
    (val * 1_000_000.0).round() / 1_000_000.0
}

/// Round to 2 decimal places.
pub(crate) fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// Round to 1 decimal place.
pub(crate) fn round1(val: f64) -> f64 {
    (val * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
