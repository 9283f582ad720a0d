//! Mic-E position codec.
//!
//! Mic-E packs a full position report into the destination callsign plus a
//! short binary information field:
//!
//! - Destination: 6 substitution-alphabet characters carrying the latitude
//!   digits, the three message bits, N/S and E/W hemispheres and the +100
//!   degree longitude offset flag.
//! - Information: a 1-byte type identifier, 3 longitude bytes, 3 speed/course
//!   bytes, symbol id and table, then optional status text with an embedded
//!   base-91 altitude block.
//!
//! See APRS 1.01 chapter 10.

use serde::Serialize;

use crate::base91;
use crate::coord::{decode_latitude, decode_longitude, encode_latitude};
use crate::types::{AprsError, Result, SymbolRef};

/// Information field type identifiers that mark a Mic-E packet.
pub const TYPE_IDS: [char; 4] = ['\u{1c}', '\u{1d}', '`', '\''];

/// The Mic-E message, selected by the three destination message bits and the
/// standard/custom alphabet used for the set bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MicEMessageType {
    OffDuty,
    EnRoute,
    InService,
    Returning,
    Committed,
    Special,
    Priority,
    Emergency,
    Custom0,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Custom6,
}

impl MicEMessageType {
    fn from_bits(a: u8, b: u8, c: u8, custom: bool) -> Self {
        use MicEMessageType::*;
        match (a, b, c, custom) {
            (1, 1, 1, false) => OffDuty,
            (1, 1, 0, false) => EnRoute,
            (1, 0, 1, false) => InService,
            (1, 0, 0, false) => Returning,
            (0, 1, 1, false) => Committed,
            (0, 1, 0, false) => Special,
            (0, 0, 1, false) => Priority,
            (1, 1, 1, true) => Custom0,
            (1, 1, 0, true) => Custom1,
            (1, 0, 1, true) => Custom2,
            (1, 0, 0, true) => Custom3,
            (0, 1, 1, true) => Custom4,
            (0, 1, 0, true) => Custom5,
            (0, 0, 1, true) => Custom6,
            _ => Emergency,
        }
    }

    fn bits(self) -> (u8, u8, u8, bool) {
        use MicEMessageType::*;
        match self {
            OffDuty => (1, 1, 1, false),
            EnRoute => (1, 1, 0, false),
            InService => (1, 0, 1, false),
            Returning => (1, 0, 0, false),
            Committed => (0, 1, 1, false),
            Special => (0, 1, 0, false),
            Priority => (0, 0, 1, false),
            Emergency => (0, 0, 0, false),
            Custom0 => (1, 1, 1, true),
            Custom1 => (1, 1, 0, true),
            Custom2 => (1, 0, 1, true),
            Custom3 => (1, 0, 0, true),
            Custom4 => (0, 1, 1, true),
            Custom5 => (0, 1, 0, true),
            Custom6 => (0, 0, 1, true),
        }
    }
}

/// A decoded Mic-E position report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicEReport {
    pub latitude: f64,
    pub longitude: f64,
    pub ambiguity: u8,
    pub symbol: SymbolRef,
    pub message_type: MicEMessageType,
    /// Speed in knots, 0-799.
    pub speed: u16,
    /// Course in degrees, 0-399 on the wire.
    pub course: u16,
    pub altitude_metres: Option<i32>,
    /// The first status byte (radio model code, or `,`/0x1D telemetry
    /// marker), kept verbatim for re-encoding.
    pub radio_type: Option<char>,
    pub comment: String,
    /// SSID from the destination field, kept for re-encoding.
    pub ssid: Option<String>,
}

/// Which alphabet a destination character came from.
#[derive(Clone, Copy, PartialEq)]
enum CharSet {
    /// `0-9` and `L`: digit as-is, bit value 0.
    Plain,
    /// `A-J` and `K`: bit value 1, custom message set.
    Custom,
    /// `P-Y` and `Z`: bit value 1, standard message set.
    Standard,
}

/// Look up one destination character: the latitude digit (or blank) and the
/// alphabet it belongs to.
fn decode_dest_char(c: char) -> Result<(char, CharSet)> {
    match c {
        '0'..='9' => Ok((c, CharSet::Plain)),
        'A'..='J' => Ok((((c as u8 - b'A') + b'0') as char, CharSet::Custom)),
        'P'..='Y' => Ok((((c as u8 - b'P') + b'0') as char, CharSet::Standard)),
        'K' => Ok((' ', CharSet::Custom)),
        'L' => Ok((' ', CharSet::Plain)),
        'Z' => Ok((' ', CharSet::Standard)),
        other => Err(AprsError::parse(
            "Mic-E destination",
            format!("unexpected character {other:?}"),
        )),
    }
}

/// True when the first 6 characters of a destination field are all within
/// the Mic-E substitution alphabet.
pub(crate) fn destination_matches(destination: &str) -> bool {
    let field = destination.split('-').next().unwrap_or(destination);
    field.len() == 6 && field.chars().all(|c| decode_dest_char(c).is_ok())
}

impl MicEReport {
    /// Decode from the raw destination field and the information field with
    /// the type identifier already stripped.
    pub fn decode(destination: &str, info: &str) -> Result<MicEReport> {
        let (field, ssid) = match destination.split_once('-') {
            Some((field, ssid)) => (field, Some(ssid.to_string())),
            None => (destination, None),
        };
        if field.chars().count() != 6 {
            return Err(AprsError::parse(
                "Mic-E destination",
                format!("expected 6 characters, got {field:?}"),
            ));
        }

        let mut digits = String::with_capacity(8);
        let mut sets = [CharSet::Plain; 6];
        for (i, c) in field.chars().enumerate() {
            let (digit, set) = decode_dest_char(c)?;
            digits.push(digit);
            if i == 3 {
                digits.push('.');
            }
            sets[i] = set;
        }

        // Message bits from the three highest-order characters. A one-bit is
        // standard or custom depending on its alphabet; the two cannot mix.
        let mut custom_ones = 0;
        let mut standard_ones = 0;
        let mut bits = [0u8; 3];
        for i in 0..3 {
            match sets[i] {
                CharSet::Plain => {}
                CharSet::Custom => {
                    bits[i] = 1;
                    custom_ones += 1;
                }
                CharSet::Standard => {
                    bits[i] = 1;
                    standard_ones += 1;
                }
            }
        }
        if custom_ones > 0 && standard_ones > 0 {
            return Err(AprsError::parse(
                "Mic-E destination",
                format!("mixed standard and custom message bits in {field:?}"),
            ));
        }
        let message_type =
            MicEMessageType::from_bits(bits[0], bits[1], bits[2], custom_ones > 0);

        let north_south = if sets[3] == CharSet::Plain { 'S' } else { 'N' };
        let lng_offset = sets[4] != CharSet::Plain;
        let east_west = if sets[5] == CharSet::Plain { 'E' } else { 'W' };

        let (latitude, ambiguity) = decode_latitude(&format!("{digits}{north_south}"))?;

        let chars: Vec<char> = info.chars().collect();
        if chars.len() < 8 {
            return Err(AprsError::parse(
                "Mic-E information",
                format!("expected at least 8 bytes, got {info:?}"),
            ));
        }

        let longitude = decode_mice_longitude(&chars[..3], lng_offset, east_west)?;
        let (speed, course) = decode_speed_and_course(&chars[3..6]);
        let symbol = SymbolRef::new(chars[7], chars[6]);

        let mut report = MicEReport {
            latitude,
            longitude,
            ambiguity,
            symbol,
            message_type,
            speed,
            course,
            altitude_metres: None,
            radio_type: chars.get(8).copied(),
            comment: String::new(),
            ssid,
        };

        if chars.len() >= 10 {
            let telemetry = matches!(chars[8], ',' | '\u{1d}');
            let status: String = chars[9..].iter().collect();
            if telemetry {
                // Telemetry values are not decoded; keep the raw bytes
                report.comment = status;
            } else if status.len() >= 4 && status.as_bytes()[3] == b'}' {
                match base91::decode(&status[..3]) {
                    Ok(value) => {
                        report.altitude_metres = Some(value as i32 - 10_000);
                        report.comment = status[4..].to_string();
                    }
                    Err(_) => report.comment = status,
                }
            } else {
                report.comment = status;
            }
        }
        Ok(report)
    }

    /// Encode as a (destination field, information field) pair. The
    /// information field starts with the given type identifier.
    pub fn encode(&self, data_type_id: char) -> Result<(String, String)> {
        if !TYPE_IDS.contains(&data_type_id) {
            return Err(AprsError::encode(
                "Mic-E information",
                format!("{data_type_id:?} is not a Mic-E type identifier"),
            ));
        }
        if self.speed > 799 {
            return Err(AprsError::encode(
                "speed",
                format!("{} knots exceeds 799", self.speed),
            ));
        }
        if self.course > 399 {
            return Err(AprsError::encode(
                "course",
                format!("{} degrees exceeds 399", self.course),
            ));
        }

        // Longitude split into degrees, minutes and hundredths
        let lng = self.longitude.abs();
        let total = (lng * 6000.0).round() as u32;
        let (deg, min, hmin) = (total / 6000, (total % 6000) / 100, total % 100);
        // The decoder applies the +100 offset before the band corrections,
        // so the low bands encode to 90-99 and 80-89 pre-offset
        let (lng_offset, deg_val) = match deg {
            0..=9 => (true, deg + 90),
            10..=99 => (false, deg),
            100..=109 => (true, deg - 20),
            110..=179 => (true, deg - 100),
            _ => {
                return Err(AprsError::encode(
                    "longitude",
                    format!("{} degrees out of range", deg),
                ))
            }
        };
        let min_val = if min <= 9 { min + 60 } else { min };

        let destination = self.encode_destination(lng_offset)?;

        let mut info = String::new();
        info.push(data_type_id);
        info.push(ascii(deg_val + 28));
        info.push(ascii(min_val + 28));
        info.push(ascii(hmin + 28));

        // Speed and course, mixed radix with the +800/+400 offsets
        let sp = u32::from(self.speed) / 10 + 80;
        let dc = (u32::from(self.speed) % 10) * 10 + u32::from(self.course) / 100 + 4;
        let se = u32::from(self.course) % 100;
        info.push(ascii(sp + 28));
        info.push(ascii(dc + 28));
        info.push(ascii(se + 28));

        info.push(self.symbol.id);
        info.push(self.symbol.table);

        match self.radio_type {
            Some(rt) => {
                info.push(rt);
                if let Some(metres) = self.altitude_metres {
                    let value = metres + 10_000;
                    if !(0..91i32.pow(3)).contains(&value) {
                        return Err(AprsError::encode(
                            "altitude",
                            format!("{metres} metres out of range"),
                        ));
                    }
                    info.push_str(&base91::encode(value as u32, 3)?);
                    info.push('}');
                }
                info.push_str(&self.comment);
            }
            None => {
                if self.altitude_metres.is_some() || !self.comment.is_empty() {
                    return Err(AprsError::encode(
                        "Mic-E status",
                        "status text requires a leading radio type byte".to_string(),
                    ));
                }
            }
        }

        Ok((destination, info))
    }

    fn encode_destination(&self, lng_offset: bool) -> Result<String> {
        let lat = encode_latitude(self.latitude, self.ambiguity)?;
        let lat = lat.as_bytes();
        // DDMM.mmH with the dot skipped
        let digits = [lat[0], lat[1], lat[2], lat[3], lat[5], lat[6]];
        let south = lat[7] == b'S';
        let west = self.longitude < 0.0;

        let (a, b, c, custom) = self.message_type.bits();
        let one_set = if custom { CharSet::Custom } else { CharSet::Standard };
        let bit_set = |bit: u8| if bit == 1 { one_set } else { CharSet::Plain };

        let sets = [
            bit_set(a),
            bit_set(b),
            bit_set(c),
            if south { CharSet::Plain } else { CharSet::Standard },
            if lng_offset { CharSet::Standard } else { CharSet::Plain },
            if west { CharSet::Standard } else { CharSet::Plain },
        ];

        let mut out = String::with_capacity(9);
        for (digit, set) in digits.into_iter().zip(sets) {
            out.push(encode_dest_char(digit, set));
        }
        if let Some(ssid) = &self.ssid {
            out.push('-');
            out.push_str(ssid);
        }
        Ok(out)
    }
}

fn encode_dest_char(digit: u8, set: CharSet) -> char {
    match (digit, set) {
        (b' ', CharSet::Plain) => 'L',
        (b' ', CharSet::Custom) => 'K',
        (b' ', CharSet::Standard) => 'Z',
        (d, CharSet::Plain) => d as char,
        (d, CharSet::Custom) => (b'A' + (d - b'0')) as char,
        (d, CharSet::Standard) => (b'P' + (d - b'0')) as char,
    }
}

fn ascii(val: u32) -> char {
    (val as u8) as char
}

/// Longitude from the 3 information bytes plus the destination-field offset
/// flag and hemisphere.
fn decode_mice_longitude(chars: &[char], lng_offset: bool, east_west: char) -> Result<f64> {
    let mut deg = i32::try_from(u32::from(chars[0])).unwrap_or(i32::MAX) - 28;
    let min = i32::try_from(u32::from(chars[1])).unwrap_or(i32::MAX) - 28;
    let hmin = i32::try_from(u32::from(chars[2])).unwrap_or(i32::MAX) - 28;

    if lng_offset {
        deg += 100;
    }
    if (180..=189).contains(&deg) {
        deg -= 80;
    } else if (190..=199).contains(&deg) {
        deg -= 190;
    }
    let min = if min >= 60 { min - 60 } else { min };

    if !(0..=180).contains(&deg) || !(0..=59).contains(&min) || !(0..=99).contains(&hmin) {
        return Err(AprsError::parse(
            "Mic-E longitude",
            format!("decoded values out of range: {deg} {min} {hmin}"),
        ));
    }

    decode_longitude(
        &format!("{deg:03}{min:02}.{hmin:02}{east_west}"),
        0,
    )
}

/// Speed (knots) and course (degrees) from the 3 mixed-radix bytes.
fn decode_speed_and_course(chars: &[char]) -> (u16, u16) {
    let sp = u32::from(chars[0]).saturating_sub(28);
    let dc = u32::from(chars[1]).saturating_sub(28);
    let se = u32::from(chars[2]).saturating_sub(28);

    let mut speed = sp * 10 + dc / 10;
    let mut course = (dc % 10) * 100 + se;
    if speed >= 800 {
        speed -= 800;
    }
    if course >= 400 {
        course -= 400;
    }
    (speed as u16, course as u16)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
