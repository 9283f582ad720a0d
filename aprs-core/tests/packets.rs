//! End-to-end packet vectors through the public API.

use aprs_core::{
    AprsPacket, MicEMessageType, PacketData, PositionExtension, PositionReport, SymbolRef,
};

#[test]
fn decodes_position_with_course_speed_and_altitude() {
    let p = AprsPacket::parse(
        "XX1XX>APRS,TCPIP*,qAC,FOURTH:=5030.50N/10020.30W$221/000/A=005Test packet",
    )
    .unwrap();

    assert_eq!(p.source.to_string(), "XX1XX");
    assert_eq!(p.destination, "APRS");
    assert_eq!(p.path.to_string(), "TCPIP*,qAC,FOURTH");

    let pos = match &p.data {
        PacketData::Position(pos) => pos,
        other => panic!("expected position, got {other:?}"),
    };
    assert_eq!(pos.latitude, 50.508333);
    assert_eq!(pos.longitude, -100.338333);
    assert_eq!(pos.symbol, SymbolRef::new('/', '$'));
    assert_eq!(
        pos.extension,
        Some(PositionExtension::CourseSpeed {
            course: 221,
            speed: 0.0
        })
    );
    assert_eq!(pos.altitude, Some(5.0));
    assert_eq!(pos.comment, "Test packet");
}

#[test]
fn compressed_and_uncompressed_agree() {
    let mut uncompressed = PositionReport::new(49.5, -72.75, SymbolRef::new('/', '>'));
    let mut compressed = uncompressed.clone();
    compressed.compressed = true;

    let a = AprsPacket::parse(&format!(
        "XX1XX>APRS,TCPIP*:{}",
        uncompressed.encode().unwrap()
    ))
    .unwrap();
    let b = AprsPacket::parse(&format!(
        "XX1XX>APRS,TCPIP*:{}",
        compressed.encode().unwrap()
    ))
    .unwrap();

    let (a, b) = match (&a.data, &b.data) {
        (PacketData::Position(a), PacketData::Position(b)) => (a, b),
        other => panic!("expected positions, got {other:?}"),
    };
    assert!((a.latitude - b.latitude).abs() < 1e-4);
    assert!((a.longitude - b.longitude).abs() < 1e-4);

    // Round trips hold independently of the wire form
    uncompressed.comment = "hi".to_string();
    let encoded = uncompressed.encode().unwrap();
    assert_eq!(
        PositionReport::decode('!', &encoded[1..]).unwrap().encode().unwrap(),
        encoded
    );
}

#[test]
fn mice_destination_round_trips_byte_for_byte() {
    let raw = "XX1XX-1>U1PRSS-1,WIDE1-1,WIDE2-2,qAR,CALGRY:`*\\Fl\"Bk/]\"?l}Test Mic-E packet";
    let p = AprsPacket::parse(raw).unwrap();

    let m = match &p.data {
        PacketData::MicE(m) => m,
        other => panic!("expected Mic-E, got {other:?}"),
    };
    assert_eq!(m.latitude, 51.038833);
    assert_eq!(m.longitude, -114.073667);
    assert_eq!(m.message_type, MicEMessageType::InService);
    assert_eq!(m.speed, 0);
    assert_eq!(m.course, 238);
    assert_eq!(m.altitude_metres, Some(1086));

    assert_eq!(p.encode().unwrap(), raw);
}

#[test]
fn compressed_latitude_with_space_fails() {
    assert!(AprsPacket::parse("XX1XX>APRS,TCPIP*:!/5L! <*e7>7P[").is_err());
}

#[test]
fn json_output_is_tagged_by_packet_type() {
    let p = AprsPacket::parse("XX1XX>APRS,TCPIP*:>092345zNet Control Center").unwrap();
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["data"]["type"], "Status");
    assert_eq!(json["data"]["text"], "Net Control Center");
    assert_eq!(json["source"]["callsign"], "XX1XX");
}
