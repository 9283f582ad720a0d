//! aprs-core: Pure APRS packet codec.
//!
//! No async, no I/O — just the information-field grammar. Parses TNC2-form
//! packets (`SOURCE>DEST,PATH:info`) into typed reports and encodes them
//! back: plain/timestamped positions (uncompressed and base-91 compressed),
//! Mic-E, messages/bulletins and status reports.

pub mod base91;
pub mod coord;
pub mod header;
pub mod message;
pub mod mice;
pub mod packet;
pub mod position;
pub mod radio;
pub mod status;
pub mod timestamp;
pub mod types;

// Re-export commonly used types at crate root
pub use header::{Path, PathHop, Station};
pub use message::{MessageData, Recipient};
pub use mice::{MicEMessageType, MicEReport};
pub use packet::{AprsPacket, PacketData};
pub use position::{DfReport, PositionExtension, PositionReport};
pub use status::StatusReport;
pub use timestamp::{Timestamp, TimestampKind};
pub use types::*;
