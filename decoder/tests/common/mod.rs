#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::{write::GzEncoder, Compression};
use tracecvt_decoder::{
    convert, DecoderConfig, OpcodeCategory, Outcome, TraceInstruction, RECORD_LEN,
};

/// Gzip-compresses `payload` the way the MacSim trace generator does.
pub fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

/// Serializes records back to back.
pub fn encode(records: &[TraceInstruction]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(records.len() * RECORD_LEN);
    for record in records {
        payload.extend_from_slice(&record.to_bytes());
    }
    payload
}

/// Runs the full conversion over `compressed` and returns the output text.
pub fn convert_bytes(compressed: &[u8], config: DecoderConfig) -> (String, Outcome) {
    let mut out = Vec::new();
    let outcome =
        convert(Cursor::new(compressed), &mut out, config).expect("conversion should succeed");
    (String::from_utf8(out).expect("output is ASCII"), outcome)
}

/// Straightforward restatement of the conversion rules, used as an oracle.
pub fn expected_output(records: &[TraceInstruction]) -> String {
    let mut out = String::new();
    for (cycle, record) in records.iter().enumerate() {
        if record.num_loads > 0 {
            let prefetch = record.opcode == u8::from(OpcodeCategory::Prefetch)
                || (61..=64).contains(&record.opcode);
            let tag = if prefetch { "P_FETCH" } else { "P_MEM_RD" };
            out.push_str(&format!("0x{:x} {tag} {cycle}\n", record.load_addr_1));
        }
        if record.has_store != 0 {
            out.push_str(&format!("0x{:x} P_MEM_WR {cycle}\n", record.store_addr));
        }
    }
    out
}

pub fn load(opcode: OpcodeCategory, addr: u32) -> TraceInstruction {
    TraceInstruction {
        opcode: opcode.into(),
        num_loads: 1,
        load_addr_1: addr,
        ..Default::default()
    }
}

pub fn store(opcode: OpcodeCategory, addr: u32) -> TraceInstruction {
    TraceInstruction {
        opcode: opcode.into(),
        has_store: 1,
        store_addr: addr,
        ..Default::default()
    }
}

pub fn nop() -> TraceInstruction {
    TraceInstruction {
        opcode: OpcodeCategory::Nop.into(),
        ..Default::default()
    }
}
