//! Packet-level parse and encode dispatch.
//!
//! `AprsPacket::parse` splits the TNC2 header, then routes the information
//! field by its data type identifier. Mic-E packets are recognized earlier
//! than the identifier switch, from the destination field matching the
//! substitution alphabet together with a Mic-E type byte.

use serde::Serialize;

use crate::header::{parse_header, Path, Station};
use crate::message::MessageData;
use crate::mice::{self, MicEReport};
use crate::position::PositionReport;
use crate::status::StatusReport;
use crate::types::{AprsError, Result};

/// Decoded payload of a packet.
///
/// Recognized-but-unimplemented data types (objects, telemetry, station
/// capabilities) and unknown identifiers fall back to `Generic` with the raw
/// information field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PacketData {
    Position(PositionReport),
    MicE(MicEReport),
    Message(MessageData),
    Status(StatusReport),
    Generic { info: String },
}

/// A parsed APRS packet: header fields plus the decoded payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AprsPacket {
    pub source: Station,
    /// Raw destination field; for Mic-E this is encoded data, not an address.
    pub destination: String,
    pub path: Path,
    pub data_type_id: char,
    pub data: PacketData,
}

impl AprsPacket {
    /// Parse a raw TNC2 packet. Unknown data types decode to
    /// [`PacketData::Generic`] rather than failing.
    pub fn parse(raw: &str) -> Result<AprsPacket> {
        Self::parse_inner(raw, false)
    }

    /// Like [`AprsPacket::parse`], but recognized-but-unimplemented and
    /// unknown data types fail with [`AprsError::Unsupported`].
    pub fn parse_strict(raw: &str) -> Result<AprsPacket> {
        Self::parse_inner(raw, true)
    }

    fn parse_inner(raw: &str, strict: bool) -> Result<AprsPacket> {
        let header = parse_header(raw)?;
        let info = header.info;

        let mut chars = info.chars();
        let data_type_id = chars.next().ok_or_else(|| {
            AprsError::parse("packet", format!("empty information field in {raw:?}"))
        })?;
        let rest = chars.as_str();

        // Mic-E hides its data type in the destination field
        let data = if mice::destination_matches(&header.destination)
            && mice::TYPE_IDS.contains(&data_type_id)
        {
            PacketData::MicE(MicEReport::decode(&header.destination, rest)?)
        } else {
            match data_type_id {
                '!' | '=' | '/' | '@' => {
                    if rest.len() < 4 {
                        return Err(AprsError::parse(
                            "position",
                            format!("packet is too short: {info:?}"),
                        ));
                    }
                    PacketData::Position(PositionReport::decode(data_type_id, rest)?)
                }
                ':' => PacketData::Message(MessageData::decode(rest)?),
                '>' => PacketData::Status(StatusReport::decode(rest)?),
                // Position-without-timestamp reports may bury the `!` up to
                // 40 characters into the information field, behind an X1J
                // TNC header
                _ => match info.find('!') {
                    Some(idx) if idx <= 40 => {
                        PacketData::Position(PositionReport::decode('!', &info[idx + 1..])?)
                    }
                    _ if strict => return Err(AprsError::Unsupported(data_type_id)),
                    _ => PacketData::Generic {
                        info: info.to_string(),
                    },
                },
            }
        };

        Ok(AprsPacket {
            source: header.source,
            destination: header.destination,
            path: header.path,
            data_type_id,
            data,
        })
    }

    /// Build a packet from its parts, deriving the data type identifier from
    /// the payload.
    pub fn new(source: Station, destination: &str, path: Path, data: PacketData) -> AprsPacket {
        let data_type_id = match &data {
            PacketData::Position(p) => match (p.timestamp.is_some(), p.messaging) {
                (false, false) => '!',
                (false, true) => '=',
                (true, false) => '/',
                (true, true) => '@',
            },
            PacketData::MicE(_) => '`',
            PacketData::Message(_) => ':',
            PacketData::Status(_) => '>',
            PacketData::Generic { info } => info.chars().next().unwrap_or(' '),
        };
        AprsPacket {
            source,
            destination: destination.to_string(),
            path,
            data_type_id,
            data,
        }
    }

    /// Encode back to TNC2 form. The Mic-E arm regenerates the destination
    /// field from the packet data.
    pub fn encode(&self) -> Result<String> {
        let (destination, info) = match &self.data {
            PacketData::Position(p) => (self.destination.clone(), p.encode()?),
            PacketData::MicE(m) => m.encode(self.data_type_id)?,
            PacketData::Message(m) => (self.destination.clone(), m.encode()?),
            PacketData::Status(s) => (self.destination.clone(), s.encode()?),
            PacketData::Generic { info } => (self.destination.clone(), info.clone()),
        };
        Ok(format!(
            "{}>{},{}:{}",
            self.source, destination, self.path, info
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
