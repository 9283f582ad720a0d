//! Message packet codec (data type identifier `:`).
//!
//! Covers station-to-station messages plus the three broadcast forms that
//! reuse the addressee field: bulletins (`BLNn`), group bulletins (`BLNnggggg`)
//! and announcements (`BLNa`). See APRS 1.01 chapter 14.

use serde::Serialize;

use crate::types::{AprsError, Result};

/// Who a message is for, from the fixed 9-character addressee field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Recipient {
    /// A station callsign, trailing padding stripped.
    Station(String),
    /// `BLNn` general bulletin, id 0-9.
    Bulletin { id: u8 },
    /// `BLNnggggg` group bulletin.
    GroupBulletin { id: u8, group: String },
    /// `BLNa` announcement, id A-Z.
    Announcement { id: char },
}

/// A decoded message packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub recipient: Recipient,
    pub text: String,
    /// Trailing `{xxxxx` identifier, up to 5 characters.
    pub message_id: Option<String>,
}

impl MessageData {
    /// Decode from the information field with the `:` type identifier already
    /// stripped.
    pub fn decode(info: &str) -> Result<MessageData> {
        let addressee = info.get(..9).ok_or_else(|| {
            AprsError::parse("message", format!("packet too short: {info:?}"))
        })?;
        if info.as_bytes().get(9) != Some(&b':') {
            return Err(AprsError::parse(
                "message",
                format!("missing : in 9th position of {info:?}"),
            ));
        }
        let body = &info[10..];

        let recipient = decode_addressee(addressee)?;

        let (text, message_id) = match body.split_once('{') {
            Some((text, id)) => {
                if id.len() > 5 {
                    return Err(AprsError::parse(
                        "message id",
                        format!("{id:?} is longer than 5 characters"),
                    ));
                }
                (text.to_string(), Some(id.to_string()))
            }
            None => (body.to_string(), None),
        };

        Ok(MessageData {
            recipient,
            text,
            message_id,
        })
    }

    /// Encode as an information field, type identifier included.
    pub fn encode(&self) -> Result<String> {
        let addressee = match &self.recipient {
            Recipient::Station(callsign) => {
                if callsign.len() > 9 {
                    return Err(AprsError::encode(
                        "addressee",
                        format!("{callsign:?} is longer than 9 characters"),
                    ));
                }
                callsign.clone()
            }
            Recipient::Bulletin { id } => {
                check_bulletin_id(*id)?;
                format!("BLN{id}")
            }
            Recipient::GroupBulletin { id, group } => {
                check_bulletin_id(*id)?;
                if group.is_empty() || group.len() > 5 {
                    return Err(AprsError::encode(
                        "group bulletin",
                        format!("group name {group:?} must be 1-5 characters"),
                    ));
                }
                format!("BLN{id}{group}")
            }
            Recipient::Announcement { id } => {
                if !id.is_ascii_uppercase() {
                    return Err(AprsError::encode(
                        "announcement",
                        format!("id {id:?} must be A-Z"),
                    ));
                }
                format!("BLN{id}")
            }
        };

        let mut out = format!(":{addressee:<9}:{}", self.text);
        if let Some(id) = &self.message_id {
            if id.len() > 5 {
                return Err(AprsError::encode(
                    "message id",
                    format!("{id:?} is longer than 5 characters"),
                ));
            }
            out.push('{');
            out.push_str(id);
        }
        Ok(out)
    }
}

fn check_bulletin_id(id: u8) -> Result<()> {
    if id > 9 {
        return Err(AprsError::encode(
            "bulletin",
            format!("id {id} must be 0-9"),
        ));
    }
    Ok(())
}

fn decode_addressee(addressee: &str) -> Result<Recipient> {
    let b = addressee.as_bytes();
    if addressee.starts_with("BLN") {
        let tail = addressee.get(4..9).unwrap_or_default();
        if b[3].is_ascii_digit() {
            let id = b[3] - b'0';
            if tail == "     " {
                return Ok(Recipient::Bulletin { id });
            }
            return Ok(Recipient::GroupBulletin {
                id,
                group: tail.trim_end().to_string(),
            });
        }
        if b[3].is_ascii_uppercase() {
            if tail == "     " {
                return Ok(Recipient::Announcement { id: b[3] as char });
            }
            return Err(AprsError::parse(
                "message",
                format!("incorrectly-formatted announcement: {addressee:?}"),
            ));
        }
        return Err(AprsError::parse(
            "message",
            format!("incorrectly-formatted bulletin: {addressee:?}"),
        ));
    }
    Ok(Recipient::Station(addressee.trim_end().to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
