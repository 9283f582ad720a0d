//! Status report codec (data type identifier `>`).
//!
//! A status report is free text, optionally preceded by either a `DDHHMMz`
//! timestamp or a Maidenhead locator with a symbol pair, never both. See
//! APRS 1.01 chapter 16.

use serde::Serialize;

use crate::timestamp::{Timestamp, TimestampKind};
use crate::types::{AprsError, Result, SymbolRef};

/// A decoded status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub timestamp: Option<Timestamp>,
    /// 4- or 6-character Maidenhead locator.
    pub maidenhead: Option<String>,
    /// Symbol pair, present with a locator.
    pub symbol: Option<SymbolRef>,
    pub text: String,
}

/// Symbol table identifiers valid in a status report locator.
fn valid_symbol_table(b: u8) -> bool {
    b == b'/' || b == b'\\' || b.is_ascii_digit() || b.is_ascii_uppercase()
}

/// `GGnn` or `GGnngg` locator prefix check.
fn locator_prefix(b: &[u8], len: usize) -> bool {
    if b.len() < len + 2 {
        return false;
    }
    let grid = &b[..len];
    let field_ok = grid[0].is_ascii_uppercase()
        && grid[1].is_ascii_uppercase()
        && grid[2].is_ascii_digit()
        && grid[3].is_ascii_digit();
    let subsquare_ok =
        len == 4 || (grid[4].is_ascii_uppercase() && grid[5].is_ascii_uppercase());
    field_ok && subsquare_ok && valid_symbol_table(b[len]) && b[len + 1].is_ascii()
}

impl StatusReport {
    /// Decode from the information field with the `>` type identifier already
    /// stripped.
    pub fn decode(info: &str) -> Result<StatusReport> {
        let b = info.as_bytes();

        // A locator must come first and carries a symbol pair
        for grid_len in [6usize, 4] {
            if locator_prefix(b, grid_len) {
                let mut report = StatusReport {
                    timestamp: None,
                    maidenhead: Some(info[..grid_len].to_string()),
                    symbol: Some(SymbolRef::new(
                        b[grid_len] as char,
                        b[grid_len + 1] as char,
                    )),
                    text: String::new(),
                };
                let after = grid_len + 2;
                if info.len() > after {
                    // Status text after a locator starts with one space
                    if b[after] != b' ' {
                        return Err(AprsError::parse(
                            "status",
                            format!("missing space before status text in {info:?}"),
                        ));
                    }
                    report.text = info[after + 1..].to_string();
                }
                return Ok(report);
            }
        }

        // Otherwise an optional leading zulu timestamp
        if b.len() >= 7 && b[..6].iter().all(u8::is_ascii_digit) && b[6] == b'z' {
            let timestamp = Timestamp::parse(&info[..7]).ok().map(|(ts, _)| ts);
            return Ok(StatusReport {
                timestamp,
                maidenhead: None,
                symbol: None,
                text: info[7..].to_string(),
            });
        }

        Ok(StatusReport {
            timestamp: None,
            maidenhead: None,
            symbol: None,
            text: info.to_string(),
        })
    }

    /// Encode as an information field, type identifier included.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::from(">");

        if let Some(grid) = &self.maidenhead {
            if self.timestamp.is_some() {
                return Err(AprsError::encode(
                    "status",
                    "cannot carry both a locator and a timestamp".to_string(),
                ));
            }
            let symbol = self.symbol.ok_or_else(|| {
                AprsError::encode("status", "locator requires a symbol pair".to_string())
            })?;
            let b = grid.as_bytes();
            let grid_ok = (b.len() == 4 || b.len() == 6)
                && b[0].is_ascii_uppercase()
                && b[1].is_ascii_uppercase()
                && b[2].is_ascii_digit()
                && b[3].is_ascii_digit()
                && (b.len() == 4 || (b[4].is_ascii_uppercase() && b[5].is_ascii_uppercase()));
            if !grid_ok {
                return Err(AprsError::encode(
                    "status",
                    format!("{grid:?} is not a valid locator"),
                ));
            }
            if !valid_symbol_table(symbol.table as u8) {
                return Err(AprsError::encode(
                    "status",
                    format!("invalid symbol table {:?}", symbol.table),
                ));
            }
            out.push_str(grid);
            out.push(symbol.table);
            out.push(symbol.id);
            if !self.text.is_empty() {
                out.push(' ');
                out.push_str(&self.text);
            }
            return Ok(out);
        }

        if let Some(ts) = &self.timestamp {
            if ts.kind != (TimestampKind::DayHourMinute { zulu: true }) {
                return Err(AprsError::encode(
                    "status",
                    "status timestamps must be day/hour/minute zulu".to_string(),
                ));
            }
            out.push_str(&ts.to_string());
        }
        out.push_str(&self.text);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
