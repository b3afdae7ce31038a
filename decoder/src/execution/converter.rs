use std::io::{Read, Write};

use tracing::{instrument, trace};

use crate::{
    error::Result,
    event::{classify, MemoryEvents},
    record::TraceInstruction,
    stats::ConversionStats,
    stream::{DecoderConfig, StreamDecoder},
};

/// One conversion session over a decompressed record stream.
///
/// The session owns the decoder and the cycle counter. The counter indexes
/// records: it advances by exactly one per decoded record, whether or not the
/// record produced any memory event.
pub struct TraceConverter<R> {
    decoder: StreamDecoder<R>,
    cycle: u64,
    stats: ConversionStats,
}

impl<R: Read> TraceConverter<R> {
    /// Creates a session reading raw (already decompressed) records from
    /// `source`.
    pub fn new(source: R, config: DecoderConfig) -> Result<Self> {
        Ok(Self {
            decoder: StreamDecoder::new(source, config)?,
            cycle: 0,
            stats: ConversionStats::default(),
        })
    }

    /// Cycle value that the next decoded record will be stamped with.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    pub const fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    /// Decodes and classifies the next record.
    ///
    /// Returns `None` at the end of the stream. The opcode is validated for
    /// every record, including those that produce no events. On an invalid
    /// opcode the cycle counter is left untouched and the error is returned.
    pub fn step(&mut self) -> Result<Option<MemoryEvents>> {
        let Some(raw) = self.decoder.next_record()? else {
            return Ok(None);
        };

        let instr = TraceInstruction::parse(&raw);
        let category = instr.opcode_category(self.cycle)?;
        let events = classify(&instr, category, self.cycle);
        trace!(
            cycle = self.cycle,
            opcode = category.name(),
            pc = %format!("0x{:x}", instr.instruction_addr),
            events = events.len(),
            "decoded record"
        );

        self.stats.record(category, &events);
        self.cycle += 1;
        Ok(Some(events))
    }

    /// Converts the whole stream, writing one line per memory event to
    /// `sink`.
    #[instrument(level = "debug", skip_all)]
    pub fn run<W: Write>(&mut self, mut sink: W) -> Result<ConversionStats> {
        while let Some(events) = self.step()? {
            for event in &events {
                writeln!(sink, "{event}")?;
            }
        }
        sink.flush()?;

        self.stats.bytes = self.decoder.position();
        self.stats.truncated_bytes = self.decoder.residual() as u64;
        Ok(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{error::TraceError, opcodes::OpcodeCategory, record::RECORD_LEN};

    fn encode(records: &[TraceInstruction]) -> Vec<u8> {
        records.iter().flat_map(|r| r.to_bytes()).collect()
    }

    fn run_to_string(data: Vec<u8>) -> (String, ConversionStats) {
        let mut converter = TraceConverter::new(Cursor::new(data), DecoderConfig::default())
            .expect("valid config");
        let mut out = Vec::new();
        let stats = converter.run(&mut out).expect("conversion should succeed");
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_cycle_counts_records_not_events() {
        let records = [
            TraceInstruction {
                opcode: OpcodeCategory::Binary.into(),
                ..Default::default()
            },
            TraceInstruction {
                opcode: OpcodeCategory::DataXfer.into(),
                num_loads: 1,
                load_addr_1: 0x2000,
                has_store: 1,
                store_addr: 0x3000,
                ..Default::default()
            },
            TraceInstruction {
                opcode: OpcodeCategory::PrefetchT1.into(),
                num_loads: 1,
                load_addr_1: 0x4000,
                ..Default::default()
            },
        ];
        let (output, stats) = run_to_string(encode(&records));

        assert_eq!(
            output,
            "0x2000 P_MEM_RD 1\n0x3000 P_MEM_WR 1\n0x4000 P_FETCH 2\n"
        );
        assert_eq!(stats.records, 3);
        assert_eq!(stats.bytes, 3 * RECORD_LEN as u64);
        assert_eq!(stats.truncated_bytes, 0);
    }

    #[test]
    fn test_step_advances_cycle() {
        let data = encode(&[TraceInstruction::default(); 4]);
        let mut converter =
            TraceConverter::new(Cursor::new(data), DecoderConfig::default()).unwrap();

        for expected in 0..4 {
            assert_eq!(converter.cycle(), expected);
            assert!(converter.step().unwrap().unwrap().is_empty());
        }
        assert!(converter.step().unwrap().is_none());
        assert_eq!(converter.cycle(), 4);
        assert_eq!(converter.stats().category(OpcodeCategory::Invalid), 4);
    }

    #[test]
    fn test_invalid_opcode_stops_run() {
        let records = [
            TraceInstruction {
                opcode: OpcodeCategory::Pop.into(),
                num_loads: 1,
                load_addr_1: 0x10,
                ..Default::default()
            },
            TraceInstruction {
                opcode: 0xff,
                ..Default::default()
            },
        ];
        let mut converter =
            TraceConverter::new(Cursor::new(encode(&records)), DecoderConfig::default()).unwrap();
        let mut out = Vec::new();

        let err = converter.run(&mut out).unwrap_err();
        assert!(matches!(
            err,
            TraceError::InvalidOpcode {
                code: 0xff,
                cycle: 1
            }
        ));
        assert_eq!(converter.cycle(), 1);
    }

    #[test]
    fn test_invalid_opcode_without_memory_access() {
        let records = [
            TraceInstruction::default(),
            TraceInstruction {
                opcode: OpcodeCategory::LAST,
                ..Default::default()
            },
        ];
        let mut converter =
            TraceConverter::new(Cursor::new(encode(&records)), DecoderConfig::default()).unwrap();

        assert!(converter.step().unwrap().unwrap().is_empty());
        assert!(matches!(
            converter.step(),
            Err(TraceError::InvalidOpcode { code: 66, cycle: 1 })
        ));
        assert_eq!(converter.stats().records, 1);
    }

    #[test]
    fn test_truncated_tail_is_reported_in_stats() {
        let mut data = encode(&[TraceInstruction::default()]);
        data.extend_from_slice(&[1, 2, 3]);
        let (output, stats) = run_to_string(data);

        assert!(output.is_empty());
        assert_eq!(stats.records, 1);
        assert_eq!(stats.truncated_bytes, 3);
    }
}
