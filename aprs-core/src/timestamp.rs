//! APRS 7-byte timestamps.
//!
//! Wire form is 6 digits plus a format letter: `DDHHMMz` (day/hour/minute,
//! zulu), `DDHHMM/` (day/hour/minute, station local time) or `HHMMSSh`
//! (hour/minute/second, zulu). The packet carries no month, year or zone
//! offset, so the value is kept as raw calendar fields rather than resolved
//! against a clock.

use std::fmt;

use serde::Serialize;

use crate::types::{AprsError, Result};

/// Which of the three wire forms the timestamp was written in.
///
/// Local (`/`) day/hour/minute is kept distinct from zulu so re-encoding
/// reproduces the original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimestampKind {
    /// `DDHHMMz` or `DDHHMM/`.
    DayHourMinute { zulu: bool },
    /// `HHMMSSh`, always zulu.
    HourMinuteSecond,
}

/// A parsed 7-byte timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub kind: TimestampKind,
    /// Day of month for day/hour/minute forms, 0 otherwise.
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds for the `HHMMSSh` form, 0 otherwise.
    pub second: u8,
}

impl Timestamp {
    /// Parse a timestamp from the front of `s`, returning it together with
    /// the unconsumed remainder. Exactly 7 bytes are taken.
    pub fn parse(s: &str) -> Result<(Timestamp, &str)> {
        let b = s.as_bytes();
        if b.len() < 7 {
            return Err(AprsError::parse(
                "timestamp",
                format!("expected 7 bytes, got {s:?}"),
            ));
        }
        if !b[..6].iter().all(u8::is_ascii_digit) {
            return Err(AprsError::parse(
                "timestamp",
                format!("non-digit in {s:?}"),
            ));
        }

        let f1 = (b[0] - b'0') * 10 + (b[1] - b'0');
        let f2 = (b[2] - b'0') * 10 + (b[3] - b'0');
        let f3 = (b[4] - b'0') * 10 + (b[5] - b'0');

        let ts = match b[6] {
            b'z' | b'/' => {
                check_range("timestamp day", f1, 1, 31)?;
                check_range("timestamp hour", f2, 0, 23)?;
                check_range("timestamp minute", f3, 0, 59)?;
                Timestamp {
                    kind: TimestampKind::DayHourMinute { zulu: b[6] == b'z' },
                    day: f1,
                    hour: f2,
                    minute: f3,
                    second: 0,
                }
            }
            b'h' => {
                check_range("timestamp hour", f1, 0, 23)?;
                check_range("timestamp minute", f2, 0, 59)?;
                check_range("timestamp second", f3, 0, 59)?;
                Timestamp {
                    kind: TimestampKind::HourMinuteSecond,
                    day: 0,
                    hour: f1,
                    minute: f2,
                    second: f3,
                }
            }
            other => {
                return Err(AprsError::parse(
                    "timestamp",
                    format!("unknown format letter {:?}", other as char),
                ))
            }
        };

        Ok((ts, &s[7..]))
    }
}

fn check_range(field: &'static str, val: u8, min: u8, max: u8) -> Result<()> {
    if (min..=max).contains(&val) {
        Ok(())
    } else {
        Err(AprsError::parse(field, format!("{val} outside {min}-{max}")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TimestampKind::DayHourMinute { zulu } => write!(
                f,
                "{:02}{:02}{:02}{}",
                self.day,
                self.hour,
                self.minute,
                if zulu { 'z' } else { '/' }
            ),
            TimestampKind::HourMinuteSecond => {
                write!(f, "{:02}{:02}{:02}h", self.hour, self.minute, self.second)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zulu() {
        let (ts, rest) = Timestamp::parse("092345z4903.50N/07201.75W>").unwrap();
        assert_eq!(ts.kind, TimestampKind::DayHourMinute { zulu: true });
        assert_eq!((ts.day, ts.hour, ts.minute), (9, 23, 45));
        assert_eq!(rest, "4903.50N/07201.75W>");
    }

    #[test]
    fn test_parse_local() {
        let (ts, rest) = Timestamp::parse("092345/rest").unwrap();
        assert_eq!(ts.kind, TimestampKind::DayHourMinute { zulu: false });
        assert_eq!((ts.day, ts.hour, ts.minute), (9, 23, 45));
        assert_eq!(rest, "rest");
    }

    #[test]
    fn test_parse_hms() {
        let (ts, rest) = Timestamp::parse("234517h").unwrap();
        assert_eq!(ts.kind, TimestampKind::HourMinuteSecond);
        assert_eq!((ts.hour, ts.minute, ts.second), (23, 45, 17));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        assert!(Timestamp::parse("002345z").is_err()); // day 0
        assert!(Timestamp::parse("322345z").is_err()); // day 32
        assert!(Timestamp::parse("092445z").is_err()); // hour 24
        assert!(Timestamp::parse("092360z").is_err()); // minute 60
        assert!(Timestamp::parse("246045h").is_err()); // hour 24
        assert!(Timestamp::parse("09234").is_err()); // short
        assert!(Timestamp::parse("09a345z").is_err()); // non-digit
        assert!(Timestamp::parse("092345x").is_err()); // unknown letter
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["092345z", "092345/", "234517h", "010000z"] {
            let (ts, _) = Timestamp::parse(raw).unwrap();
            assert_eq!(ts.to_string(), raw);
        }
    }
}
