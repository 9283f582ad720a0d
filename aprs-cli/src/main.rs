//! aprs-cli: decode APRS packet logs from the command line.

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};

use aprs_core::{AprsPacket, PacketData, PositionExtension};

#[derive(Parser)]
#[command(name = "aprs", version, about = "APRS packet decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode TNC2 packets from a file and print a station table
    Decode {
        /// Path to file containing packets (one per line), or - for stdin
        file: PathBuf,

        /// Print each packet as a JSON line instead of a summary table
        #[arg(short, long)]
        json: bool,

        /// Fail on recognized-but-unimplemented data types
        #[arg(long)]
        strict: bool,
    },

    /// Parse and re-encode each packet, reporting mismatches
    Roundtrip {
        /// Path to file containing packets (one per line), or - for stdin
        file: PathBuf,
    },
}

/// Accumulated per-station state from decoded packets.
struct StationState {
    packets: u32,
    last_type: &'static str,
    lat: Option<f64>,
    lon: Option<f64>,
    course: Option<u16>,
    speed: Option<f64>,
    altitude: Option<f64>,
    text: String,
}

impl StationState {
    fn new() -> Self {
        StationState {
            packets: 0,
            last_type: "-",
            lat: None,
            lon: None,
            course: None,
            speed: None,
            altitude: None,
            text: String::new(),
        }
    }

    fn update(&mut self, data: &PacketData) {
        self.packets += 1;
        match data {
            PacketData::Position(p) => {
                self.last_type = "position";
                self.lat = Some(p.latitude);
                self.lon = Some(p.longitude);
                if let Some(PositionExtension::CourseSpeed { course, speed }) = p.extension {
                    self.course = Some(course);
                    self.speed = Some(speed);
                }
                if let Some(alt) = p.altitude {
                    self.altitude = Some(alt);
                }
                self.text = p.comment.clone();
            }
            PacketData::MicE(m) => {
                self.last_type = "mic-e";
                self.lat = Some(m.latitude);
                self.lon = Some(m.longitude);
                self.course = Some(m.course);
                self.speed = Some(f64::from(m.speed));
                if let Some(metres) = m.altitude_metres {
                    // Report in feet like the other packet types
                    self.altitude = Some((f64::from(metres) * 3.28084).round());
                }
                self.text = m.comment.clone();
            }
            PacketData::Message(m) => {
                self.last_type = "message";
                self.text = m.text.clone();
            }
            PacketData::Status(s) => {
                self.last_type = "status";
                self.text = s.text.clone();
            }
            PacketData::Generic { .. } => {
                self.last_type = "generic";
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file, json, strict } => cmd_decode(file, json, strict),
        Commands::Roundtrip { file } => cmd_roundtrip(file),
    }
}

fn open_reader(file: &PathBuf) -> Box<dyn BufRead> {
    if file.to_str() == Some("-") {
        Box::new(io::stdin().lock())
    } else {
        let f = std::fs::File::open(file).unwrap_or_else(|e| {
            eprintln!("Error opening {}: {e}", file.display());
            std::process::exit(1);
        });
        Box::new(io::BufReader::new(f))
    }
}

fn cmd_decode(file: PathBuf, json: bool, strict: bool) {
    let reader = open_reader(&file);

    let mut stations: HashMap<String, StationState> = HashMap::new();
    let mut total = 0u64;
    let mut decoded = 0u64;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        total += 1;

        let packet = if strict {
            AprsPacket::parse_strict(raw)
        } else {
            AprsPacket::parse(raw)
        };
        let packet = match packet {
            Ok(p) => p,
            Err(e) => {
                eprintln!("line {total}: {e}");
                continue;
            }
        };
        decoded += 1;

        if json {
            match serde_json::to_string(&packet) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("line {total}: {e}"),
            }
        }

        stations
            .entry(packet.source.to_string())
            .or_insert_with(StationState::new)
            .update(&packet.data);
    }

    if !json {
        print_summary(&stations, total, decoded);
    }
}

fn cmd_roundtrip(file: PathBuf) {
    let reader = open_reader(&file);

    let mut total = 0u64;
    let mut exact = 0u64;
    let mut mismatched = 0u64;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        total += 1;

        let packet = match AprsPacket::parse(raw) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("line {total}: parse: {e}");
                continue;
            }
        };
        match packet.encode() {
            Ok(encoded) if encoded == raw => exact += 1,
            Ok(encoded) => {
                mismatched += 1;
                println!("- {raw}");
                println!("+ {encoded}");
            }
            Err(e) => {
                eprintln!("line {total}: encode: {e}");
            }
        }
    }

    println!();
    println!("Packets: {total} read, {exact} byte-exact, {mismatched} re-encoded differently");
}

fn print_summary(stations: &HashMap<String, StationState>, total: u64, decoded: u64) {
    println!();
    println!(
        "Packets: {total} read, {decoded} decoded, {} stations",
        stations.len()
    );
    println!();

    if stations.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Station", "Pkts", "Type", "Lat", "Lon", "Course", "Speed (kts)", "Alt (ft)", "Text",
    ]);

    let mut sorted: Vec<_> = stations.iter().collect();
    sorted.sort_by_key(|(_, s)| std::cmp::Reverse(s.packets));

    for (callsign, s) in sorted {
        table.add_row(vec![
            Cell::new(callsign),
            Cell::new(s.packets),
            Cell::new(s.last_type),
            Cell::new(
                s.lat
                    .map(|l| format!("{l:.6}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                s.lon
                    .map(|l| format!("{l:.6}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                s.course
                    .map(|c| c.to_string())
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                s.speed
                    .map(|v| format!("{v:.0}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                s.altitude
                    .map(|a| format!("{a:.0}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(&s.text),
        ]);
    }

    println!("{table}");
}
