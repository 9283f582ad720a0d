//! Position report codec.
//!
//! Covers the four position data type identifiers:
//!
//! - `!` — no timestamp, no messaging capability
//! - `=` — no timestamp, messaging capability
//! - `/` — timestamp, no messaging capability
//! - `@` — timestamp, messaging capability
//!
//! The coordinate itself may be uncompressed (`4903.50N/07201.75W`) or
//! compressed (4+4 base-91 characters). Uncompressed reports may carry one
//! extension token (course/speed, PHG, RNG or DFS) at the front of the
//! comment; compressed reports pack course/speed, radio range or altitude
//! into the two bytes after the symbol id.

use serde::Serialize;

use crate::coord::{
    decode_compressed_latitude, decode_compressed_longitude, decode_latitude, decode_longitude,
    encode_compressed_latitude, encode_compressed_longitude, encode_latitude, encode_longitude,
    CompressionType, NmeaSource,
};
use crate::radio::{decode_dfs, decode_nrq, decode_phg, encode_dfs, encode_nrq, encode_phg};
use crate::radio::{DfsData, NrqData, PhgData};
use crate::timestamp::Timestamp;
use crate::types::{round1, round2, AprsError, Result, SymbolRef};

const LN_1_08: f64 = 0.076_961_041_136_128_325; // ln(1.08), speed/range base
const LN_1_002: f64 = 0.001_998_002_662_673_058_3; // ln(1.002), altitude base

/// The one extension token a position report may carry.
///
/// The wire format has a single slot, so these are mutually exclusive by
/// construction. Speed is in knots, range in miles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PositionExtension {
    CourseSpeed { course: u16, speed: f64 },
    Phg(PhgData),
    RadioRange { miles: f64 },
    Dfs(DfsData),
}

/// Bearing and NRQ values from a DF report (symbol table `/`, symbol `\`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DfReport {
    pub bearing: u16,
    pub nrq: NrqData,
}

/// A decoded position report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    /// Digits of position ambiguity, 0-4.
    pub ambiguity: u8,
    pub symbol: SymbolRef,
    /// True for the `=` and `@` data type identifiers.
    pub messaging: bool,
    pub timestamp: Option<Timestamp>,
    /// Selects compressed wire form on encode.
    pub compressed: bool,
    pub compression_type: Option<CompressionType>,
    pub extension: Option<PositionExtension>,
    pub df: Option<DfReport>,
    /// Altitude in feet, from `/A=` or the compressed altitude bytes.
    pub altitude: Option<f64>,
    pub comment: String,
}

impl PositionReport {
    /// A report at the given coordinate with no timestamp, extension or
    /// comment.
    pub fn new(latitude: f64, longitude: f64, symbol: SymbolRef) -> Self {
        PositionReport {
            latitude,
            longitude,
            ambiguity: 0,
            symbol,
            messaging: false,
            timestamp: None,
            compressed: false,
            compression_type: None,
            extension: None,
            df: None,
            altitude: None,
            comment: String::new(),
        }
    }

    /// Decode a position report from its data type identifier and the rest of
    /// the information field.
    pub fn decode(data_type_id: char, info: &str) -> Result<PositionReport> {
        let (messaging, has_timestamp) = match data_type_id {
            '!' => (false, false),
            '=' => (true, false),
            '/' => (false, true),
            '@' => (true, true),
            other => {
                return Err(AprsError::parse(
                    "position",
                    format!("unknown position data type {other:?}"),
                ))
            }
        };

        let (timestamp, data) = if has_timestamp {
            let (ts, rest) = Timestamp::parse(info)?;
            (Some(ts), rest)
        } else {
            (None, info)
        };

        let mut report = if looks_uncompressed(data.as_bytes()) {
            decode_uncompressed(data)?
        } else {
            decode_compressed(data)?
        };
        report.messaging = messaging;
        report.timestamp = timestamp;
        Ok(report)
    }

    /// Encode as an information field, data type identifier included.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        out.push(match (self.timestamp.is_some(), self.messaging) {
            (false, false) => '!',
            (false, true) => '=',
            (true, false) => '/',
            (true, true) => '@',
        });
        if let Some(ts) = &self.timestamp {
            out.push_str(&ts.to_string());
        }

        if self.df.is_some() && !self.symbol.is_df_report() {
            return Err(AprsError::encode(
                "DF report",
                "bearing/NRQ requires the / table and \\ symbol".to_string(),
            ));
        }

        if self.compressed {
            self.encode_compressed(&mut out)?;
        } else {
            self.encode_uncompressed(&mut out)?;
        }
        Ok(out)
    }

    fn encode_uncompressed(&self, out: &mut String) -> Result<()> {
        out.push_str(&encode_latitude(self.latitude, self.ambiguity)?);
        out.push(self.symbol.table);
        out.push_str(&encode_longitude(self.longitude, self.ambiguity)?);
        out.push(self.symbol.id);

        if let Some(ext) = &self.extension {
            out.push_str(&encode_extension_token(ext)?);
        }

        if self.symbol.is_df_report() {
            let df = self.df.as_ref().ok_or_else(|| {
                AprsError::encode("DF report", "missing bearing/NRQ values".to_string())
            })?;
            if df.bearing > 360 {
                return Err(AprsError::encode(
                    "DF bearing",
                    format!("{} degrees out of range", df.bearing),
                ));
            }
            out.push_str(&format!("/{:03}/{}", df.bearing, encode_nrq(&df.nrq)?));
        }

        if let Some(alt) = self.altitude {
            out.push_str(&altitude_token(alt)?);
        }
        out.push_str(&self.comment);
        Ok(())
    }

    fn encode_compressed(&self, out: &mut String) -> Result<()> {
        if self.ambiguity != 0 {
            return Err(AprsError::encode(
                "ambiguity",
                "compressed positions cannot carry ambiguity".to_string(),
            ));
        }
        if self.df.is_some() {
            return Err(AprsError::encode(
                "DF report",
                "bearing/NRQ has no slot in the compressed form".to_string(),
            ));
        }

        out.push(self.symbol.table);
        out.push_str(&encode_compressed_latitude(self.latitude)?);
        out.push_str(&encode_compressed_longitude(self.longitude)?);
        out.push(self.symbol.id);

        let ctype = self.compression_type.unwrap_or_default();
        let mut altitude_in_cs = false;

        let cs: [u8; 2] = match &self.extension {
            Some(PositionExtension::CourseSpeed { course, speed }) => {
                if course % 4 != 0 {
                    return Err(AprsError::encode(
                        "course",
                        format!("{course} degrees is not a multiple of 4"),
                    ));
                }
                let c = (course % 360) / 4;
                let s = log_round(speed + 1.0, LN_1_08, "speed")?;
                [33 + c as u8, 33 + s]
            }
            Some(PositionExtension::RadioRange { miles }) => {
                let s = log_round(miles / 2.0, LN_1_08, "radio range")?;
                [b'{', 33 + s]
            }
            Some(PositionExtension::Phg(_)) | Some(PositionExtension::Dfs(_)) => {
                return Err(AprsError::encode(
                    "extension",
                    "PHG/DFS has no slot in the compressed form".to_string(),
                ));
            }
            None => match self.altitude {
                Some(alt) if ctype.nmea_source == NmeaSource::Gga => {
                    if alt <= 0.0 {
                        return Err(AprsError::encode(
                            "altitude",
                            format!("{alt} feet cannot be compressed"),
                        ));
                    }
                    let x = (alt.ln() / LN_1_002).round();
                    if !(0.0..8281.0).contains(&x) {
                        return Err(AprsError::encode(
                            "altitude",
                            format!("{alt} feet out of compressed range"),
                        ));
                    }
                    altitude_in_cs = true;
                    let x = x as u16;
                    [33 + (x / 91) as u8, 33 + (x % 91) as u8]
                }
                _ => [b' ', b' '],
            },
        };
        out.push(cs[0] as char);
        out.push(cs[1] as char);
        out.push(ctype.to_wire() as char);

        if let Some(alt) = self.altitude {
            if !altitude_in_cs {
                out.push_str(&altitude_token(alt)?);
            }
        }
        out.push_str(&self.comment);
        Ok(())
    }
}

/// `round(ln(value) / base)` as a compressed byte value, checked to 0-90.
fn log_round(value: f64, ln_base: f64, field: &'static str) -> Result<u8> {
    if value <= 0.0 {
        return Err(AprsError::encode(field, format!("{value} cannot be compressed")));
    }
    let s = (value.ln() / ln_base).round();
    if !(0.0..=90.0).contains(&s) {
        return Err(AprsError::encode(field, format!("{value} out of compressed range")));
    }
    Ok(s as u8)
}

/// Structural check for `DDMM.mmN/DDDMM.mmW` with possible ambiguity blanks.
fn looks_uncompressed(b: &[u8]) -> bool {
    let ds = |x: u8| x.is_ascii_digit() || x == b' ';
    b.len() >= 18
        && b[..4].iter().all(|&x| ds(x))
        && b[4] == b'.'
        && ds(b[5])
        && ds(b[6])
        && (b[7] == b'N' || b[7] == b'S')
        && b[8].is_ascii()
        && b[9..14].iter().all(|&x| ds(x))
        && b[14] == b'.'
        && ds(b[15])
        && ds(b[16])
        && (b[17] == b'E' || b[17] == b'W')
}

fn decode_uncompressed(data: &str) -> Result<PositionReport> {
    let (latitude, ambiguity) = decode_latitude(&data[..8])?;
    let symbol_table = data.as_bytes()[8] as char;
    let longitude = decode_longitude(&data[9..18], ambiguity)?;
    let symbol_id = data[18..]
        .chars()
        .next()
        .ok_or_else(|| AprsError::parse("symbol", "missing symbol identifier".to_string()))?;
    let symbol = SymbolRef::new(symbol_table, symbol_id);
    let rest = &data[18 + symbol_id.len_utf8()..];

    let mut report = PositionReport::new(latitude, longitude, symbol);
    report.ambiguity = ambiguity;
    if rest.is_empty() {
        return Ok(report);
    }

    let (extension, mut comment) = take_extension_token(rest)?;
    report.extension = extension;

    if symbol.is_df_report() {
        let (df, after) = take_df_values(comment)?;
        report.df = Some(df);
        comment = after;
    }

    let (altitude, comment) = extract_altitude(comment);
    report.altitude = altitude;
    report.comment = comment;
    Ok(report)
}

/// Scan for a single leading extension token; the first match wins and any
/// second token stays in the comment.
fn take_extension_token(rest: &str) -> Result<(Option<PositionExtension>, &str)> {
    let b = rest.as_bytes();
    if b.len() < 7 {
        return Ok((None, rest));
    }
    let digits4 = b[3..7].iter().all(u8::is_ascii_digit);

    if rest.starts_with("PHG") && digits4 {
        let phg = decode_phg(&rest[3..7])?;
        return Ok((Some(PositionExtension::Phg(phg)), &rest[7..]));
    }
    if rest.starts_with("RNG") && digits4 {
        let miles = parse_digits(&rest[3..7], "radio range")?;
        return Ok((
            Some(PositionExtension::RadioRange {
                miles: f64::from(miles),
            }),
            &rest[7..],
        ));
    }
    if rest.starts_with("DFS") && digits4 {
        let dfs = decode_dfs(&rest[3..7])?;
        return Ok((Some(PositionExtension::Dfs(dfs)), &rest[7..]));
    }
    if b[..3].iter().all(u8::is_ascii_digit) && b[3] == b'/' && b[4..7].iter().all(u8::is_ascii_digit)
    {
        let course = parse_digits(&rest[..3], "course")?;
        let speed = parse_digits(&rest[4..7], "speed")?;
        return Ok((
            Some(PositionExtension::CourseSpeed {
                course,
                speed: f64::from(speed),
            }),
            &rest[7..],
        ));
    }
    Ok((None, rest))
}

fn parse_digits(s: &str, field: &'static str) -> Result<u16> {
    s.parse()
        .map_err(|_| AprsError::parse(field, format!("bad digits {s:?}")))
}

/// `/BRG/NRQ` immediately after the extension token of a DF report.
fn take_df_values(comment: &str) -> Result<(DfReport, &str)> {
    let b = comment.as_bytes();
    if b.len() < 8 {
        return Err(AprsError::parse(
            "DF report",
            format!("missing bearing/NRQ values in {comment:?}"),
        ));
    }
    if b[0] != b'/' || b[4] != b'/' || !b[1..4].iter().all(u8::is_ascii_digit) {
        return Err(AprsError::parse(
            "DF report",
            format!("invalid bearing/NRQ values in {comment:?}"),
        ));
    }
    let bearing = parse_digits(&comment[1..4], "DF bearing")?;
    let nrq = decode_nrq(&comment[5..8])?;
    Ok((DfReport { bearing, nrq }, &comment[8..]))
}

/// Extract a `/A=` altitude token (1-6 digits, feet) from anywhere in the
/// comment, stripping it from the text.
fn extract_altitude(comment: &str) -> (Option<f64>, String) {
    if let Some(idx) = comment.find("/A=") {
        let digits = comment[idx + 3..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .take(6)
            .count();
        if digits > 0 {
            if let Ok(value) = comment[idx + 3..idx + 3 + digits].parse::<u32>() {
                let mut stripped = String::with_capacity(comment.len());
                stripped.push_str(&comment[..idx]);
                stripped.push_str(&comment[idx + 3 + digits..]);
                return (Some(f64::from(value)), stripped);
            }
        }
    }
    (None, comment.to_string())
}

fn altitude_token(altitude: f64) -> Result<String> {
    if altitude.fract() != 0.0 || !(0.0..=999_999.0).contains(&altitude) {
        return Err(AprsError::encode(
            "altitude",
            format!("{altitude} feet does not fit /A= (0-999999 whole feet)"),
        ));
    }
    Ok(format!("/A={:06}", altitude as u32))
}

fn encode_extension_token(ext: &PositionExtension) -> Result<String> {
    match ext {
        PositionExtension::CourseSpeed { course, speed } => {
            if *course > 999 {
                return Err(AprsError::encode(
                    "course",
                    format!("{course} does not fit 3 digits"),
                ));
            }
            if speed.fract() != 0.0 || !(0.0..=999.0).contains(speed) {
                return Err(AprsError::encode(
                    "speed",
                    format!("{speed} knots does not fit 3 digits"),
                ));
            }
            Ok(format!("{:03}/{:03}", course, *speed as u16))
        }
        PositionExtension::Phg(phg) => Ok(format!("PHG{}", encode_phg(phg)?)),
        PositionExtension::RadioRange { miles } => {
            if miles.fract() != 0.0 || !(0.0..=9999.0).contains(miles) {
                return Err(AprsError::encode(
                    "radio range",
                    format!("{miles} miles does not fit 4 digits"),
                ));
            }
            Ok(format!("RNG{:04}", *miles as u16))
        }
        PositionExtension::Dfs(dfs) => Ok(format!("DFS{}", encode_dfs(dfs)?)),
    }
}

fn decode_compressed(data: &str) -> Result<PositionReport> {
    let b = data.as_bytes();
    if b.len() < 13 || !b[..13].is_ascii() {
        return Err(AprsError::parse(
            "compressed position",
            format!("need at least 13 ASCII bytes in {data:?}"),
        ));
    }

    let latitude = decode_compressed_latitude(&data[1..5])?;
    let longitude = decode_compressed_longitude(&data[5..9])?;
    let symbol = SymbolRef::new(b[0] as char, b[9] as char);

    let mut report = PositionReport::new(latitude, longitude, symbol);
    report.compressed = true;
    report.comment = data[13..].to_string();

    if b[10] == b' ' {
        // Blank course/speed slot; the compression type byte is not
        // meaningful in this case
        report.compression_type = CompressionType::from_wire(b[12]).ok();
    } else {
        let ctype = CompressionType::from_wire(b[12])?;
        report.compression_type = Some(ctype);

        let c = i32::from(b[10]) - 33;
        let s = i32::from(b[11]) - 33;
        if ctype.nmea_source == NmeaSource::Gga {
            report.altitude = Some(round2(1.002f64.powi(c * 91 + s)));
        } else if (0..=89).contains(&c) {
            report.extension = Some(PositionExtension::CourseSpeed {
                course: (c * 4) as u16,
                speed: round1(1.08f64.powi(s) - 1.0),
            });
        } else if b[10] == b'{' {
            report.extension = Some(PositionExtension::RadioRange {
                miles: round2(2.0 * 1.08f64.powi(s)),
            });
        } else {
            return Err(AprsError::parse(
                "compressed position",
                format!("invalid course/speed lead-in {:?}", b[10] as char),
            ));
        }
    }

    let (altitude, comment) = extract_altitude(&report.comment);
    if let Some(alt) = altitude {
        report.altitude = Some(alt);
        report.comment = comment;
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{CompressionOrigin, GpsFix};

    #[test]
    fn test_decode_plain() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W-Test 001234").unwrap();
        assert_eq!(p.latitude, 49.058333);
        assert_eq!(p.longitude, -72.029167);
        assert_eq!(p.ambiguity, 0);
        assert_eq!(p.symbol, SymbolRef::new('/', '-'));
        assert!(!p.messaging);
        assert!(p.timestamp.is_none());
        assert_eq!(p.comment, "Test 001234");
    }

    #[test]
    fn test_decode_timestamped_with_messaging() {
        let p = PositionReport::decode('@', "092345z4903.50N/07201.75W>Test1234").unwrap();
        assert!(p.messaging);
        let ts = p.timestamp.unwrap();
        assert_eq!((ts.day, ts.hour, ts.minute), (9, 23, 45));
        assert_eq!(p.symbol.id, '>');
        assert_eq!(p.comment, "Test1234");
    }

    #[test]
    fn test_decode_course_speed() {
        let p = PositionReport::decode('/', "092345z4903.50N/07201.75W>088/036").unwrap();
        assert_eq!(
            p.extension,
            Some(PositionExtension::CourseSpeed {
                course: 88,
                speed: 36.0
            })
        );
        assert_eq!(p.comment, "");
    }

    #[test]
    fn test_decode_phg_extension() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W#PHG5132").unwrap();
        match p.extension {
            Some(PositionExtension::Phg(phg)) => {
                assert_eq!(phg.power_watts, 25);
                assert_eq!(phg.height_feet, 20);
                assert_eq!(phg.gain_db, 3);
                assert_eq!(phg.directivity_degrees, Some(90));
            }
            other => panic!("expected PHG, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rng_extension() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W#RNG0050 comment").unwrap();
        assert_eq!(
            p.extension,
            Some(PositionExtension::RadioRange { miles: 50.0 })
        );
        assert_eq!(p.comment, " comment");
    }

    #[test]
    fn test_decode_dfs_extension() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W#DFS2360").unwrap();
        match p.extension {
            Some(PositionExtension::Dfs(dfs)) => {
                assert_eq!(dfs.strength, 2);
                assert_eq!(dfs.height_feet, 80);
                assert_eq!(dfs.gain_db, 6);
                assert_eq!(dfs.directivity_degrees, None);
            }
            other => panic!("expected DFS, got {other:?}"),
        }
    }

    #[test]
    fn test_second_token_stays_in_comment() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W#PHG5132RNG0050").unwrap();
        assert!(matches!(p.extension, Some(PositionExtension::Phg(_))));
        assert_eq!(p.comment, "RNG0050");
    }

    #[test]
    fn test_decode_df_report() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W\\088/036/270/729").unwrap();
        assert_eq!(
            p.extension,
            Some(PositionExtension::CourseSpeed {
                course: 88,
                speed: 36.0
            })
        );
        let df = p.df.unwrap();
        assert_eq!(df.bearing, 270);
        assert_eq!(df.nrq.range_miles, Some(4));
        assert_eq!(df.nrq.quality_degrees, Some(1));
        assert_eq!(p.comment, "");
    }

    #[test]
    fn test_decode_df_report_invalid() {
        // Missing values entirely
        assert!(PositionReport::decode('!', "4903.50N/07201.75W\\088/036").is_err());
        // Wrong separators
        assert!(PositionReport::decode('!', "4903.50N/07201.75W\\088/036x270/729").is_err());
    }

    #[test]
    fn test_decode_altitude_token() {
        let p = PositionReport::decode('!', "4903.50N/07201.75W-Test/A=001234").unwrap();
        assert_eq!(p.altitude, Some(1234.0));
        assert_eq!(p.comment, "Test");

        // Short form from older trackers
        let p = PositionReport::decode('!', "4903.50N/07201.75W-/A=005Test packet").unwrap();
        assert_eq!(p.altitude, Some(5.0));
        assert_eq!(p.comment, "Test packet");
    }

    #[test]
    fn test_decode_ambiguous() {
        let p = PositionReport::decode('!', "490 .  N/0720 .  W-").unwrap();
        assert_eq!(p.ambiguity, 3);
        assert_eq!(p.latitude, 49.0);
        assert_eq!(p.longitude, -72.0);
    }

    #[test]
    fn test_decode_compressed() {
        let p = PositionReport::decode('!', "/5L!!<*e7>7P[").unwrap();
        assert!(p.compressed);
        assert_eq!(p.latitude, 49.5);
        assert_eq!(p.longitude, -72.75);
        assert_eq!(p.symbol, SymbolRef::new('/', '>'));
        assert_eq!(
            p.extension,
            Some(PositionExtension::CourseSpeed {
                course: 88,
                speed: 36.2
            })
        );
        let ctype = p.compression_type.unwrap();
        assert_eq!(ctype.gps_fix, GpsFix::Current);
        assert_eq!(ctype.nmea_source, NmeaSource::Rmc);
        assert_eq!(ctype.origin, CompressionOrigin::Software);
    }

    #[test]
    fn test_decode_compressed_blank_cs() {
        let p = PositionReport::decode('=', "/5L!!<*e7> sT").unwrap();
        assert_eq!(p.latitude, 49.5);
        assert_eq!(p.extension, None);
        assert_eq!(p.altitude, None);
        assert_eq!(p.comment, "");
    }

    #[test]
    fn test_decode_compressed_radio_range() {
        let p = PositionReport::decode('!', "/5L!!<*e7>{?[").unwrap();
        // 2 * 1.08^30
        assert_eq!(
            p.extension,
            Some(PositionExtension::RadioRange { miles: 20.13 })
        );
    }

    #[test]
    fn test_decode_compressed_altitude() {
        // Compression type 'S' has NMEA source GGA; cs "!\"" encodes 1.002^1
        let p = PositionReport::decode('=', "/5L!!<*e7>!\"S").unwrap();
        assert_eq!(p.altitude, Some(1.0));
        assert_eq!(p.extension, None);
    }

    #[test]
    fn test_decode_compressed_too_short() {
        assert!(PositionReport::decode('!', "/5L!!<*e7>").is_err());
    }

    #[test]
    fn test_encode_plain() {
        let mut p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '-'));
        p.comment = "Test 001234".to_string();
        assert_eq!(p.encode().unwrap(), "!4903.50N/07201.75W-Test 001234");
    }

    #[test]
    fn test_encode_data_type_ids() {
        let mut p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '-'));
        assert!(p.encode().unwrap().starts_with('!'));
        p.messaging = true;
        assert!(p.encode().unwrap().starts_with('='));
        p.timestamp = Some(Timestamp::parse("092345z").unwrap().0);
        let encoded = p.encode().unwrap();
        assert!(encoded.starts_with("@092345z"));
        p.messaging = false;
        assert!(p.encode().unwrap().starts_with("/092345z"));
    }

    #[test]
    fn test_encode_extension_and_altitude() {
        let mut p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '>'));
        p.extension = Some(PositionExtension::CourseSpeed {
            course: 88,
            speed: 36.0,
        });
        p.altitude = Some(1234.0);
        p.comment = "Test".to_string();
        assert_eq!(
            p.encode().unwrap(),
            "!4903.50N/07201.75W>088/036/A=001234Test"
        );
    }

    #[test]
    fn test_encode_df_report() {
        let mut p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '\\'));
        p.extension = Some(PositionExtension::CourseSpeed {
            course: 88,
            speed: 36.0,
        });
        p.df = Some(DfReport {
            bearing: 270,
            nrq: decode_nrq("729").unwrap(),
        });
        assert_eq!(p.encode().unwrap(), "!4903.50N/07201.75W\\088/036/270/729");
    }

    #[test]
    fn test_encode_df_requires_symbol_pair() {
        let mut p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '-'));
        p.df = Some(DfReport {
            bearing: 270,
            nrq: decode_nrq("729").unwrap(),
        });
        assert!(p.encode().is_err());

        // DF symbol pair without the values is also unencodable
        let p = PositionReport::new(49.058333, -72.029167, SymbolRef::new('/', '\\'));
        assert!(p.encode().is_err());
    }

    #[test]
    fn test_encode_compressed_round_trip() {
        let p = PositionReport::decode('!', "/5L!!<*e7>7P[").unwrap();
        assert_eq!(p.encode().unwrap(), "!/5L!!<*e7>7P[");
    }

    #[test]
    fn test_encode_compressed_blank_cs() {
        let mut p = PositionReport::new(49.5, -72.75, SymbolRef::new('/', '>'));
        p.compressed = true;
        let encoded = p.encode().unwrap();
        assert_eq!(&encoded[..11], "!/5L!!<*e7>");
        assert_eq!(&encoded[11..13], "  ");
    }

    #[test]
    fn test_encode_compressed_rejects_ambiguity_and_phg() {
        let mut p = PositionReport::new(49.5, -72.75, SymbolRef::new('/', '>'));
        p.compressed = true;
        p.ambiguity = 2;
        assert!(p.encode().is_err());

        p.ambiguity = 0;
        p.extension = Some(PositionExtension::Phg(decode_phg("5132").unwrap()));
        assert!(p.encode().is_err());
    }

    #[test]
    fn test_uncompressed_round_trip() {
        for raw in [
            "!4903.50N/07201.75W-Test 001234",
            "=4903.50N/07201.75W-",
            "@092345z4903.50N/07201.75W>088/036",
            "!4903.50N/07201.75W#PHG5132",
            "!4903.50N/07201.75W#RNG0050",
            "!4903.50N/07201.75W#DFS2360",
            "!4903.50N/07201.75W\\088/036/270/729",
            "!490 .  N/0720 .  W-",
        ] {
            let p = PositionReport::decode(
                raw.chars().next().unwrap(),
                &raw[1..],
            )
            .unwrap();
            assert_eq!(p.encode().unwrap(), raw, "raw {raw}");
        }
    }
}
