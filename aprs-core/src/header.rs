//! TNC2-style packet header: `SOURCE>DESTINATION,PATH:information`.

use std::fmt;

use serde::Serialize;

use crate::types::{AprsError, Result};

/// A station identifier: callsign plus optional SSID.
///
/// SSIDs other than 1-15 are only valid on APRS-IS, not AX.25, so the SSID is
/// kept as the 1-2 alphanumeric characters it arrived as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub callsign: String,
    pub ssid: Option<String>,
}

impl Station {
    /// Parse `CALL` or `CALL-SSID`: callsign 1-6 alphanumeric, SSID 1-2
    /// alphanumeric.
    pub fn parse(s: &str) -> Result<Station> {
        let (callsign, ssid) = match s.split_once('-') {
            Some((call, ssid)) => (call, Some(ssid)),
            None => (s, None),
        };

        if callsign.is_empty()
            || callsign.len() > 6
            || !callsign.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(AprsError::parse("callsign", format!("invalid in {s:?}")));
        }
        if let Some(ssid) = ssid {
            if ssid.is_empty() || ssid.len() > 2 || !ssid.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(AprsError::parse("SSID", format!("invalid in {s:?}")));
            }
        }

        Ok(Station {
            callsign: callsign.to_string(),
            ssid: ssid.map(str::to_string),
        })
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ssid {
            Some(ssid) => write!(f, "{}-{}", self.callsign, ssid),
            None => f.write_str(&self.callsign),
        }
    }
}

/// One hop in a digipeater path; `used` reflects a trailing `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathHop {
    pub station: Station,
    pub used: bool,
}

impl PathHop {
    pub fn parse(s: &str) -> Result<PathHop> {
        if s.len() > 9 {
            return Err(AprsError::parse(
                "path hop",
                format!("{s:?} is longer than 9 characters"),
            ));
        }
        let (station, used) = match s.strip_suffix('*') {
            Some(station) => (station, true),
            None => (s, false),
        };
        Ok(PathHop {
            station: Station::parse(station)?,
            used,
        })
    }
}

impl fmt::Display for PathHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.used {
            write!(f, "{}*", self.station)
        } else {
            write!(f, "{}", self.station)
        }
    }
}

/// A digipeater path: comma-separated hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub hops: Vec<PathHop>,
}

impl Path {
    pub fn parse(s: &str) -> Result<Path> {
        let hops = s.split(',').map(PathHop::parse).collect::<Result<_>>()?;
        Ok(Path { hops })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}

/// Header fields split out of a raw packet.
///
/// The destination is kept as the verbatim wire string: for Mic-E packets it
/// is an encoded data field, not an address.
#[derive(Debug)]
pub struct ParsedHeader<'a> {
    pub source: Station,
    pub destination: String,
    pub path: Path,
    pub info: &'a str,
}

/// Split `SOURCE>DESTINATION,PATH:information` into its parts.
///
/// Source is at most 9 characters; the destination must be 1-6 uppercase
/// alphanumerics with an optional 1-2 digit SSID.
pub fn parse_header(raw: &str) -> Result<ParsedHeader<'_>> {
    let (header, info) = raw
        .split_once(':')
        .ok_or_else(|| AprsError::parse("packet", format!("no information field in {raw:?}")))?;
    let (source, rest) = header
        .split_once('>')
        .ok_or_else(|| AprsError::parse("packet", format!("no destination in {raw:?}")))?;
    let (destination, path) = rest
        .split_once(',')
        .ok_or_else(|| AprsError::parse("packet", format!("no path in {raw:?}")))?;

    if source.len() > 9 {
        return Err(AprsError::parse(
            "source",
            format!("{source:?} is longer than 9 characters"),
        ));
    }
    if destination.len() > 9 {
        return Err(AprsError::parse(
            "destination",
            format!("{destination:?} is longer than 9 characters"),
        ));
    }
    if !valid_destination(destination) {
        return Err(AprsError::parse(
            "destination",
            format!("{destination:?} is not a valid address"),
        ));
    }

    Ok(ParsedHeader {
        source: Station::parse(source)?,
        destination: destination.to_string(),
        path: Path::parse(path)?,
        info,
    })
}

/// `[A-Z0-9]{1,6}` with optional `-[0-9]{1,2}` SSID.
fn valid_destination(dest: &str) -> bool {
    let (call, ssid) = match dest.split_once('-') {
        Some((call, ssid)) => (call, Some(ssid)),
        None => (dest, None),
    };
    let call_ok = !call.is_empty()
        && call.len() <= 6
        && call.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());
    let ssid_ok = match ssid {
        None => true,
        Some(s) => !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit()),
    };
    call_ok && ssid_ok
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
