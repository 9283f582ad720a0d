//! PHG, DFS and NRQ radio-parameter codecs.
//!
//! All three are short digit fields with table-driven meanings:
//! - PHG: transmitter power, antenna height/gain/directivity.
//! - DFS: received signal strength plus the same height/gain/directivity.
//! - NRQ: direction-finding hit ratio, search range and bearing quality.

use serde::Serialize;

use crate::types::{AprsError, Result};

/// Decoded PHG (Power-Height-Gain-Directivity) extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhgData {
    pub power_watts: u16,
    pub height_feet: u64,
    pub gain_db: u8,
    /// `None` means omnidirectional.
    pub directivity_degrees: Option<u16>,
}

/// Decoded DFS (Omni-DF Signal Strength) extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DfsData {
    /// Received signal strength in S-points.
    pub strength: u8,
    pub height_feet: u64,
    pub gain_db: u8,
    pub directivity_degrees: Option<u16>,
}

/// DF hit ratio: either a percentage of the sampling period, or a manually
/// reported bearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HitRatio {
    Manual,
    Percent(f64),
}

/// Decoded NRQ (Number/Range/Quality) value from a DF report.
///
/// An N digit of 0 means no valid reading: all fields are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NrqData {
    pub hits: Option<HitRatio>,
    pub range_miles: Option<u32>,
    /// Bearing accuracy in degrees; `None` means the quality is useless.
    pub quality_degrees: Option<u16>,
}

// ---------------------------------------------------------------------------
// PHG / DFS
// ---------------------------------------------------------------------------

/// Decode the 4 characters following a `PHG` token.
pub fn decode_phg(code: &str) -> Result<PhgData> {
    let [p, h, g, d] = split4(code, "PHG")?;
    let power = digit(p, "PHG power")?;
    Ok(PhgData {
        power_watts: u16::from(power) * u16::from(power),
        height_feet: decode_height(h, "PHG height")?,
        gain_db: digit(g, "PHG gain")?,
        directivity_degrees: decode_directivity(d, "PHG directivity")?,
    })
}

/// Encode a PHG value as its 4-character wire form.
pub fn encode_phg(phg: &PhgData) -> Result<String> {
    let p = encode_power(phg.power_watts)?;
    let h = encode_height(phg.height_feet, "PHG height")?;
    let g = encode_gain(phg.gain_db, "PHG gain")?;
    let d = encode_directivity(phg.directivity_degrees, "PHG directivity")?;
    Ok(format!("{p}{h}{g}{d}"))
}

/// Decode the 4 characters following a `DFS` token.
pub fn decode_dfs(code: &str) -> Result<DfsData> {
    let [s, h, g, d] = split4(code, "DFS")?;
    Ok(DfsData {
        strength: digit(s, "DFS strength")?,
        height_feet: decode_height(h, "DFS height")?,
        gain_db: digit(g, "DFS gain")?,
        directivity_degrees: decode_directivity(d, "DFS directivity")?,
    })
}

/// Encode a DFS value as its 4-character wire form.
pub fn encode_dfs(dfs: &DfsData) -> Result<String> {
    if dfs.strength > 9 {
        return Err(AprsError::encode(
            "DFS strength",
            format!("{} exceeds 9 S-points", dfs.strength),
        ));
    }
    let h = encode_height(dfs.height_feet, "DFS height")?;
    let g = encode_gain(dfs.gain_db, "DFS gain")?;
    let d = encode_directivity(dfs.directivity_degrees, "DFS directivity")?;
    Ok(format!("{}{h}{g}{d}", dfs.strength))
}

fn split4(code: &str, field: &'static str) -> Result<[u8; 4]> {
    let b = code.as_bytes();
    if b.len() != 4 {
        return Err(AprsError::parse(
            match field {
                "PHG" => "PHG value",
                _ => "DFS value",
            },
            format!("expected 4 characters, got {code:?}"),
        ));
    }
    Ok([b[0], b[1], b[2], b[3]])
}

fn digit(b: u8, field: &'static str) -> Result<u8> {
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(AprsError::parse(field, format!("{:?} is not a digit", b as char)))
    }
}

/// Height code: any character from `0` upward; height = 10 * 2^(code - '0').
fn decode_height(code: u8, field: &'static str) -> Result<u64> {
    if !(b'0'..=b'~').contains(&code) {
        return Err(AprsError::parse(
            field,
            format!("{:?} is not a valid height code", code as char),
        ));
    }
    let exp = u32::from(code - b'0');
    2u64.checked_pow(exp)
        .and_then(|v| v.checked_mul(10))
        .ok_or_else(|| AprsError::parse(field, format!("height code {:?} overflows", code as char)))
}

fn encode_height(height_feet: u64, field: &'static str) -> Result<char> {
    for exp in 0u32..=59 {
        if 2u64.pow(exp) * 10 == height_feet {
            let code = b'0' + exp as u8;
            if code <= b'~' {
                return Ok(code as char);
            }
        }
    }
    Err(AprsError::encode(
        field,
        format!("{height_feet} feet is not on the 10*2^n table"),
    ))
}

fn encode_power(power_watts: u16) -> Result<char> {
    for p in 0u16..=9 {
        if p * p == power_watts {
            return Ok((b'0' + p as u8) as char);
        }
    }
    Err(AprsError::encode(
        "PHG power",
        format!("{power_watts} watts is not a perfect square of 0-9"),
    ))
}

fn encode_gain(gain_db: u8, field: &'static str) -> Result<char> {
    if gain_db > 9 {
        return Err(AprsError::encode(field, format!("{gain_db} dB exceeds 9")));
    }
    Ok((b'0' + gain_db) as char)
}

/// Directivity: digit * 45 degrees, 0 = omnidirectional. Codes past 8 (360
/// degrees) are outside the defined set.
fn decode_directivity(code: u8, field: &'static str) -> Result<Option<u16>> {
    let d = digit(code, field)?;
    match d {
        0 => Ok(None),
        1..=8 => Ok(Some(u16::from(d) * 45)),
        _ => Err(AprsError::parse(
            field,
            format!("code {d} is outside the defined set"),
        )),
    }
}

fn encode_directivity(directivity: Option<u16>, field: &'static str) -> Result<char> {
    match directivity {
        None => Ok('0'),
        Some(deg) if deg % 45 == 0 && (45..=360).contains(&deg) => {
            Ok((b'0' + (deg / 45) as u8) as char)
        }
        Some(deg) => Err(AprsError::encode(
            field,
            format!("{deg} degrees is not a multiple of 45 within 45-360"),
        )),
    }
}

// ---------------------------------------------------------------------------
// NRQ
// ---------------------------------------------------------------------------

/// Decode a 3-digit NRQ value from a DF report.
pub fn decode_nrq(code: &str) -> Result<NrqData> {
    let b = code.as_bytes();
    if b.len() != 3 || !b.iter().all(u8::is_ascii_digit) {
        return Err(AprsError::parse(
            "NRQ value",
            format!("expected 3 digits, got {code:?}"),
        ));
    }
    let (n, r, q) = (b[0] - b'0', b[1] - b'0', b[2] - b'0');

    if n == 0 {
        // No valid reading; the rest of the digits carry no meaning
        return Ok(NrqData {
            hits: None,
            range_miles: None,
            quality_degrees: None,
        });
    }

    let hits = if n == 9 {
        HitRatio::Manual
    } else {
        HitRatio::Percent(f64::from(n) * 12.5)
    };

    // Quality 9 down to 3 doubles from 1 degree; 2 and 1 are 120 and 240.
    let quality = match q {
        3..=9 => Some(2u16.pow(u32::from(9 - q))),
        2 => Some(120),
        1 => Some(240),
        _ => None,
    };

    Ok(NrqData {
        hits: Some(hits),
        range_miles: Some(2u32.pow(u32::from(r))),
        quality_degrees: quality,
    })
}

/// Encode an NRQ value as its 3-digit wire form.
pub fn encode_nrq(nrq: &NrqData) -> Result<String> {
    let n = match nrq.hits {
        None => return Ok("000".to_string()),
        Some(HitRatio::Manual) => 9,
        Some(HitRatio::Percent(pct)) => {
            let n = pct / 12.5;
            if n.fract() != 0.0 || !(1.0..=8.0).contains(&n) {
                return Err(AprsError::encode(
                    "NRQ hits",
                    format!("{pct}% is not a multiple of 12.5 within 12.5-100"),
                ));
            }
            n as u8
        }
    };

    let range = nrq.range_miles.ok_or_else(|| {
        AprsError::encode("NRQ range", "range is required with a valid reading".to_string())
    })?;
    let r = (0u8..=9)
        .find(|&r| 2u32.pow(u32::from(r)) == range)
        .ok_or_else(|| {
            AprsError::encode("NRQ range", format!("{range} miles is not a power of 2"))
        })?;

    let q = match nrq.quality_degrees {
        None => 0,
        Some(240) => 1,
        Some(120) => 2,
        Some(deg) => (3u8..=9)
            .find(|&q| 2u16.pow(u32::from(9 - q)) == deg)
            .ok_or_else(|| {
                AprsError::encode("NRQ quality", format!("{deg} degrees is not on the table"))
            })?,
    };

    Ok(format!("{n}{r}{q}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
