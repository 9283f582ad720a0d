//! Latitude/longitude codecs for both APRS position encodings.
//!
//! Two wire forms coexist for the same physical quantity:
//! - Uncompressed: `DDMM.mmH` / `DDDMM.mmH` degrees-and-minutes text, where
//!   trailing digit positions may be blanked with spaces for deliberate
//!   precision reduction (ambiguity 0-4).
//! - Compressed: 4 base-91 characters per axis, plus a compression type byte
//!   describing the GPS fix and the software origin of the report.
//!
//! Decoded values are signed decimal degrees rounded to 6 places. Encoding is
//! the exact inverse, reproducing the same blanked-digit string.

use serde::Serialize;

use crate::base91;
use crate::types::{round6, AprsError, Result};

/// Latitude scale factor: 91^4 / 180.
const COMP_LAT_SCALE: f64 = 380_926.0;

/// Longitude scale factor: 91^4 / 360.
const COMP_LON_SCALE: f64 = 190_463.0;

// ---------------------------------------------------------------------------
// Uncompressed form
// ---------------------------------------------------------------------------

/// Decode an uncompressed latitude (`DDMM.mmH`) into signed degrees and an
/// ambiguity level.
///
/// Spaces in the minute digits blank precision right-to-left; each one
/// increases the ambiguity count and decodes as 0.
pub fn decode_latitude(s: &str) -> Result<(f64, u8)> {
    let b = s.as_bytes();
    let valid = b.len() == 8
        && b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && is_digit_or_space(b[2])
        && is_digit_or_space(b[3])
        && b[4] == b'.'
        && is_digit_or_space(b[5])
        && is_digit_or_space(b[6])
        && (b[7] == b'N' || b[7] == b'S');
    if !valid {
        return Err(AprsError::parse("latitude", format!("malformed {s:?}")));
    }

    let ambiguity = check_blanking(&[b[6], b[5], b[3], b[2]], "latitude", s)?;

    let degrees: f64 = s[0..2].parse().expect("validated digits");
    if degrees > 90.0 {
        return Err(AprsError::parse(
            "latitude",
            format!("degrees out of range in {s:?}"),
        ));
    }

    let minutes: f64 = s[2..7].replace(' ', "0").parse().expect("validated digits");
    let mut lat = round6(degrees + round6(minutes / 60.0));
    if b[7] == b'S' {
        lat = -lat;
    }

    Ok((lat, ambiguity))
}

/// Decode an uncompressed longitude (`DDDMM.mmH`) into signed degrees.
///
/// Ambiguity is governed by the latitude field: the level decoded there is
/// applied here as well, and a longitude carrying its own blanked digits must
/// agree with it.
pub fn decode_longitude(s: &str, ambiguity: u8) -> Result<f64> {
    let b = s.as_bytes();
    let valid = b.len() == 9
        && (b[0] == b'0' || b[0] == b'1')
        && b[1].is_ascii_digit()
        && b[2].is_ascii_digit()
        && is_digit_or_space(b[3])
        && is_digit_or_space(b[4])
        && b[5] == b'.'
        && is_digit_or_space(b[6])
        && is_digit_or_space(b[7])
        && (b[8] == b'E' || b[8] == b'W');
    if !valid {
        return Err(AprsError::parse("longitude", format!("malformed {s:?}")));
    }
    if ambiguity > 4 {
        return Err(AprsError::parse(
            "longitude",
            format!("ambiguity level {ambiguity} exceeds 4"),
        ));
    }

    let own = check_blanking(&[b[7], b[6], b[4], b[3]], "longitude", s)?;
    if own != 0 && own != ambiguity {
        return Err(AprsError::parse(
            "longitude",
            format!("ambiguity {own} in {s:?} does not match latitude ambiguity {ambiguity}"),
        ));
    }

    let degrees: f64 = s[0..3].parse().expect("validated digits");
    if degrees > 180.0 {
        return Err(AprsError::parse(
            "longitude",
            format!("degrees out of range in {s:?}"),
        ));
    }

    // Apply the latitude's ambiguity by zeroing digit positions right-to-left
    // (hundredths, tenths, minute units, minute tens).
    let mut min_digits: Vec<u8> = s[3..8].replace(' ', "0").into_bytes();
    let blank_order = [4usize, 3, 1, 0]; // indices within "MM.mm", skipping the dot
    for &idx in blank_order.iter().take(usize::from(ambiguity)) {
        min_digits[idx] = b'0';
    }
    let minutes: f64 = String::from_utf8(min_digits)
        .expect("ascii digits")
        .parse()
        .expect("validated digits");

    let mut lng = round6(degrees + round6(minutes / 60.0));
    if b[8] == b'W' {
        lng = -lng;
    }

    Ok(lng)
}

/// Encode signed degrees as `DDMM.mmH`, blanking `ambiguity` digit positions.
pub fn encode_latitude(latitude: f64, ambiguity: u8) -> Result<String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AprsError::encode(
            "latitude",
            format!("{latitude} outside [-90, 90]"),
        ));
    }
    let hemisphere = if latitude < 0.0 { 'S' } else { 'N' };
    let (degrees, minutes) = to_degrees_minutes(latitude.abs())?;
    Ok(format!(
        "{degrees:02}{}{hemisphere}",
        blank_minutes(&minutes, ambiguity)?
    ))
}

/// Encode signed degrees as `DDDMM.mmH`, blanking `ambiguity` digit positions.
pub fn encode_longitude(longitude: f64, ambiguity: u8) -> Result<String> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AprsError::encode(
            "longitude",
            format!("{longitude} outside [-180, 180]"),
        ));
    }
    let hemisphere = if longitude < 0.0 { 'W' } else { 'E' };
    let (degrees, minutes) = to_degrees_minutes(longitude.abs())?;
    Ok(format!(
        "{degrees:03}{}{hemisphere}",
        blank_minutes(&minutes, ambiguity)?
    ))
}

fn is_digit_or_space(b: u8) -> bool {
    b.is_ascii_digit() || b == b' '
}

/// Count blanked digits, given the digit positions in least-significant-first
/// order. Blanking must be contiguous from the least significant digit.
fn check_blanking(lsb_first: &[u8; 4], field: &'static str, s: &str) -> Result<u8> {
    let mut count = 0u8;
    let mut seen_digit = false;
    for &b in lsb_first.iter() {
        if b == b' ' {
            if seen_digit {
                return Err(AprsError::parse(
                    field,
                    format!("non-trailing blanked digit in {s:?}"),
                ));
            }
            count += 1;
        } else {
            seen_digit = true;
        }
    }
    Ok(count)
}

/// Split absolute degrees into whole degrees and a `MM.mm` minute string.
fn to_degrees_minutes(abs: f64) -> Result<(u16, String)> {
    let mut degrees = abs.floor() as u16;
    let mut minutes = ((abs - f64::from(degrees)) * 60.0 * 100.0).round() / 100.0;
    // Rounding can push the minutes to 60.00; carry into the degrees.
    if minutes >= 60.0 {
        minutes = 0.0;
        degrees += 1;
    }
    Ok((degrees, format!("{minutes:05.2}")))
}

/// Blank the trailing `ambiguity` digits of a `MM.mm` minute string with
/// spaces, right-to-left, skipping the decimal point.
fn blank_minutes(minutes: &str, ambiguity: u8) -> Result<String> {
    match ambiguity {
        0 => Ok(minutes.to_string()),
        1 => Ok(format!("{} ", &minutes[..4])),
        2 => Ok(format!("{}  ", &minutes[..3])),
        3 => Ok(format!("{} .  ", &minutes[..1])),
        4 => Ok("  .  ".to_string()),
        _ => Err(AprsError::encode(
            "ambiguity",
            format!("level {ambiguity} exceeds 4"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Compressed form
// ---------------------------------------------------------------------------

/// Decode a 4-character compressed latitude: `90 - b91/380926`.
pub fn decode_compressed_latitude(s: &str) -> Result<f64> {
    if s.len() != 4 {
        return Err(AprsError::parse(
            "compressed latitude",
            format!("expected 4 characters, got {s:?}"),
        ));
    }
    Ok(round6(90.0 - base91::decode(s)? as f64 / COMP_LAT_SCALE))
}

/// Decode a 4-character compressed longitude: `-180 + b91/190463`.
pub fn decode_compressed_longitude(s: &str) -> Result<f64> {
    if s.len() != 4 {
        return Err(AprsError::parse(
            "compressed longitude",
            format!("expected 4 characters, got {s:?}"),
        ));
    }
    Ok(round6(-180.0 + base91::decode(s)? as f64 / COMP_LON_SCALE))
}

/// Encode signed degrees as a 4-character compressed latitude.
pub fn encode_compressed_latitude(latitude: f64) -> Result<String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AprsError::encode(
            "compressed latitude",
            format!("{latitude} outside [-90, 90]"),
        ));
    }
    base91::encode(((90.0 - latitude) * COMP_LAT_SCALE).round() as u32, 4)
}

/// Encode signed degrees as a 4-character compressed longitude.
pub fn encode_compressed_longitude(longitude: f64) -> Result<String> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AprsError::encode(
            "compressed longitude",
            format!("{longitude} outside [-180, 180]"),
        ));
    }
    base91::encode(((longitude + 180.0) * COMP_LON_SCALE).round() as u32, 4)
}

// ---------------------------------------------------------------------------
// Compression type byte
// ---------------------------------------------------------------------------

/// GPS fix age, bit 5 of the compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpsFix {
    Old,
    Current,
}

/// NMEA sentence the position came from, bits 4-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NmeaSource {
    Other,
    Gll,
    Gga,
    Rmc,
}

/// Software origin of the compressed report, bits 2-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompressionOrigin {
    Compressed,
    TncBText,
    Software,
    Tbd,
    Kpc3,
    Pico,
    OtherTracker,
    Digipeater,
}

/// Decoded compression type byte from a compressed position report.
///
/// The wire byte carries the value plus 33; bits 7-6 are unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionType {
    pub gps_fix: GpsFix,
    pub nmea_source: NmeaSource,
    pub origin: CompressionOrigin,
}

impl CompressionType {
    pub fn from_wire(byte: u8) -> Result<Self> {
        if !(0x21..=0x7B).contains(&byte) && byte != b' ' {
            return Err(AprsError::parse(
                "compression type",
                format!("byte 0x{byte:02X} out of range"),
            ));
        }
        let val = byte.saturating_sub(33);
        let gps_fix = if val & (1 << 5) != 0 {
            GpsFix::Current
        } else {
            GpsFix::Old
        };
        let nmea_source = match (val >> 3) & 0b11 {
            0b00 => NmeaSource::Other,
            0b01 => NmeaSource::Gll,
            0b10 => NmeaSource::Gga,
            _ => NmeaSource::Rmc,
        };
        let origin = match val & 0b111 {
            0 => CompressionOrigin::Compressed,
            1 => CompressionOrigin::TncBText,
            2 => CompressionOrigin::Software,
            3 => CompressionOrigin::Tbd,
            4 => CompressionOrigin::Kpc3,
            5 => CompressionOrigin::Pico,
            6 => CompressionOrigin::OtherTracker,
            _ => CompressionOrigin::Digipeater,
        };
        Ok(CompressionType {
            gps_fix,
            nmea_source,
            origin,
        })
    }

    pub fn to_wire(self) -> u8 {
        let mut val = 0u8;
        if self.gps_fix == GpsFix::Current {
            val |= 1 << 5;
        }
        val |= match self.nmea_source {
            NmeaSource::Other => 0b00,
            NmeaSource::Gll => 0b01,
            NmeaSource::Gga => 0b10,
            NmeaSource::Rmc => 0b11,
        } << 3;
        val |= match self.origin {
            CompressionOrigin::Compressed => 0,
            CompressionOrigin::TncBText => 1,
            CompressionOrigin::Software => 2,
            CompressionOrigin::Tbd => 3,
            CompressionOrigin::Kpc3 => 4,
            CompressionOrigin::Pico => 5,
            CompressionOrigin::OtherTracker => 6,
            CompressionOrigin::Digipeater => 7,
        };
        val + 33
    }
}

impl Default for CompressionType {
    fn default() -> Self {
        CompressionType {
            gps_fix: GpsFix::Current,
            nmea_source: NmeaSource::Other,
            origin: CompressionOrigin::Software,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Uncompressed latitude --

    #[test]
    fn test_decode_latitude() {
        assert_eq!(decode_latitude("4903.55N").unwrap(), (49.059167, 0));
        assert!(decode_latitude("4903.50W").is_err()); // W is not a latitude hemisphere
    }

    #[test]
    fn test_decode_latitude_ambiguity_levels() {
        assert_eq!(decode_latitude("4903.5 N").unwrap(), (49.058333, 1));
        assert_eq!(decode_latitude("4903.  N").unwrap(), (49.05, 2));
        assert_eq!(decode_latitude("490 .  N").unwrap(), (49.0, 3));
        assert_eq!(decode_latitude("49  .  N").unwrap(), (49.0, 4));
    }

    #[test]
    fn test_decode_latitude_south() {
        assert_eq!(decode_latitude("5030.50S").unwrap(), (-50.508333, 0));
    }

    #[test]
    fn test_decode_latitude_rejects_out_of_range() {
        assert!(decode_latitude("9100.00N").is_err());
    }

    #[test]
    fn test_decode_latitude_rejects_malformed() {
        assert!(decode_latitude("49035.0N").is_err()); // misplaced dot
        assert!(decode_latitude("GARBAGE!").is_err());
        assert!(decode_latitude("4903.50").is_err()); // missing hemisphere
    }

    #[test]
    fn test_decode_latitude_rejects_non_trailing_blank() {
        // A blanked tens-of-minutes digit with intact hundredths
        assert!(decode_latitude("49 3.55N").is_err());
    }

    #[test]
    fn test_encode_latitude() {
        assert_eq!(encode_latitude(51.473821, 0).unwrap(), "5128.43N");
        assert_eq!(encode_latitude(51.473821, 1).unwrap(), "5128.4 N");
        assert_eq!(encode_latitude(51.473821, 2).unwrap(), "5128.  N");
        assert_eq!(encode_latitude(51.473821, 3).unwrap(), "512 .  N");
        assert_eq!(encode_latitude(51.473821, 4).unwrap(), "51  .  N");
    }

    #[test]
    fn test_encode_latitude_south_and_whole() {
        assert_eq!(encode_latitude(51.0, 0).unwrap(), "5100.00N");
        assert_eq!(encode_latitude(-51.0, 0).unwrap(), "5100.00S");
        assert_eq!(encode_latitude(5.0, 0).unwrap(), "0500.00N");
    }

    #[test]
    fn test_encode_latitude_minute_carry() {
        // 49.99999 rounds to 60.00 minutes; must carry, not emit "4960.00N"
        assert_eq!(encode_latitude(49.99999, 0).unwrap(), "5000.00N");
    }

    #[test]
    fn test_encode_latitude_rejects_invalid() {
        assert!(encode_latitude(91.0, 0).is_err());
        assert!(encode_latitude(51.0, 5).is_err());
    }

    // -- Uncompressed longitude --

    #[test]
    fn test_decode_longitude() {
        assert_eq!(decode_longitude("07211.75W", 0).unwrap(), -72.195833);
        assert_eq!(decode_longitude("10020.30E", 0).unwrap(), 100.338333);
    }

    #[test]
    fn test_decode_longitude_applies_latitude_ambiguity() {
        assert_eq!(decode_longitude("07211.75W", 1).unwrap(), -72.195);
        assert_eq!(decode_longitude("07211.75W", 2).unwrap(), -72.183333);
        assert_eq!(decode_longitude("07211.75W", 3).unwrap(), -72.166667);
        assert_eq!(decode_longitude("07211.75W", 4).unwrap(), -72.0);
    }

    #[test]
    fn test_decode_longitude_blanked_matching() {
        assert_eq!(decode_longitude("072  .  W", 4).unwrap(), -72.0);
    }

    #[test]
    fn test_decode_longitude_ambiguity_mismatch() {
        // Longitude blanked to level 2, latitude said level 1
        assert!(decode_longitude("07211.  W", 1).is_err());
    }

    #[test]
    fn test_decode_longitude_rejects_invalid() {
        assert!(decode_longitude("18100.00W", 0).is_err());
        assert!(decode_longitude("07201.75N", 0).is_err());
        assert!(decode_longitude("072017.5W", 0).is_err());
        assert!(decode_longitude("07211.75W", 5).is_err());
    }

    #[test]
    fn test_encode_longitude() {
        assert_eq!(encode_longitude(-114.434325, 0).unwrap(), "11426.06W");
        assert_eq!(encode_longitude(-114.434325, 1).unwrap(), "11426.0 W");
        assert_eq!(encode_longitude(-114.434325, 2).unwrap(), "11426.  W");
        assert_eq!(encode_longitude(-114.434325, 3).unwrap(), "1142 .  W");
        assert_eq!(encode_longitude(-114.434325, 4).unwrap(), "114  .  W");
        assert_eq!(encode_longitude(114.434325, 4).unwrap(), "114  .  E");
        assert_eq!(encode_longitude(72.0, 0).unwrap(), "07200.00E");
    }

    #[test]
    fn test_uncompressed_round_trip() {
        for &(lat, lng) in &[
            (49.058333, -72.029167),
            (-50.508333, 100.338333),
            (51.038833, -114.073667),
            (0.0, 0.0),
        ] {
            let enc_lat = encode_latitude(lat, 0).unwrap();
            let enc_lng = encode_longitude(lng, 0).unwrap();
            let (dec_lat, amb) = decode_latitude(&enc_lat).unwrap();
            let dec_lng = decode_longitude(&enc_lng, amb).unwrap();
            assert!((dec_lat - lat).abs() < 1e-4, "{lat} -> {enc_lat} -> {dec_lat}");
            assert!((dec_lng - lng).abs() < 1e-4, "{lng} -> {enc_lng} -> {dec_lng}");
        }
    }

    #[test]
    fn test_ambiguity_blanked_string_round_trip() {
        // Re-encoding a decoded ambiguous position reproduces the blanks
        let (lat, amb) = decode_latitude("4903.  N").unwrap();
        assert_eq!(encode_latitude(lat, amb).unwrap(), "4903.  N");
    }

    // -- Compressed --

    #[test]
    fn test_decode_compressed() {
        assert_eq!(decode_compressed_latitude("5L!!").unwrap(), 49.5);
        assert_eq!(decode_compressed_longitude("<*e7").unwrap(), -72.750004);
    }

    #[test]
    fn test_decode_compressed_rejects_bad_width() {
        assert!(decode_compressed_latitude("5L!!!").is_err());
        assert!(decode_compressed_longitude("<*e").is_err());
    }

    #[test]
    fn test_decode_compressed_rejects_space() {
        assert!(decode_compressed_latitude("5L! ").is_err());
    }

    #[test]
    fn test_compressed_round_trip() {
        for &(lat, lng) in &[(49.5, -72.75), (0.0, 0.0), (-35.123456, 138.6)] {
            let enc_lat = encode_compressed_latitude(lat).unwrap();
            let enc_lng = encode_compressed_longitude(lng).unwrap();
            assert!((decode_compressed_latitude(&enc_lat).unwrap() - lat).abs() < 1e-5);
            assert!((decode_compressed_longitude(&enc_lng).unwrap() - lng).abs() < 1e-5);
        }
    }

    #[test]
    fn test_compressed_matches_known_encoding() {
        assert_eq!(encode_compressed_latitude(49.5).unwrap(), "5L!!");
    }

    // -- Compression type --

    #[test]
    fn test_compression_type_bits() {
        // 'S' - 33 = 50 = 0b110010: current fix, GGA, software origin
        let t = CompressionType::from_wire(b'S').unwrap();
        assert_eq!(t.gps_fix, GpsFix::Current);
        assert_eq!(t.nmea_source, NmeaSource::Gga);
        assert_eq!(t.origin, CompressionOrigin::Software);
        assert_eq!(t.to_wire(), b'S');
    }

    #[test]
    fn test_compression_type_round_trip() {
        for val in 0..64u8 {
            let byte = val + 33;
            let t = CompressionType::from_wire(byte).unwrap();
            assert_eq!(t.to_wire(), byte);
        }
    }
}
